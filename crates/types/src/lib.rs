//! Foundation types for the estree analyzer.
//!
//! This crate provides the shared vocabulary used across the analyzer stack.
//! Its only external dependency is serde, for the JSON wire shapes of fixes
//! and source locations.
//!
//! # Type Categories
//!
//! - **Position types**: [`Position`], [`Range`], [`OffsetRange`]
//! - **Severity types**: [`Severity`]
//! - **Edit types**: [`Fix`]

mod edits;
mod position;
mod severity;

pub use edits::Fix;
pub use position::{OffsetRange, Position, Range};
pub use severity::Severity;
