use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyntaxError>;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("Expected a JSON object for a tree node, got: {0}")]
    NotAnObject(String),

    #[error("Tree node is missing a \"type\" field")]
    MissingNodeType,

    #[error("Node \"{0}\" has no span (expected \"range\" or \"start\"/\"end\")")]
    MissingSpan(String),

    /// Span is inverted, out of bounds, or not on a character boundary.
    #[error("Node \"{kind}\" has an invalid span [{start}, {end}]")]
    InvalidSpan {
        /// Node type the span belongs to
        kind: String,
        start: usize,
        end: usize,
    },

    #[error("Node \"{kind}\" has a malformed \"{field}\" field")]
    MalformedField {
        /// Node type the field belongs to
        kind: String,
        /// Name of the offending field
        field: String,
    },
}
