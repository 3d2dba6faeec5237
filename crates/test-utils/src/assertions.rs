//! Snapshot testing assertions for linter problems
//!
//! This module provides helpers for snapshot testing with insta.
//! Problems are formatted consistently for readable snapshots.

/// Format a list of problems for snapshot testing.
///
/// # Example
///
/// ```ignore
/// use estree_test_utils::assertions::format_problems;
///
/// let problems = linter.verify(file, &config, None)?;
/// insta::assert_snapshot!(format_problems(&problems));
/// ```
pub fn format_problems<P: std::fmt::Debug>(problems: &[P]) -> String {
    if problems.is_empty() {
        return String::from("(no problems)");
    }

    problems
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] {p:?}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
