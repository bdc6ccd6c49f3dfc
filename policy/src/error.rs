use thiserror::Error;

pub type Result<T> = std::result::Result<T, PolicyError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// A resource pattern that cannot be compiled or split. Such patterns
    /// fail closed at evaluation time; this error only surfaces through
    /// validation.
    #[error("invalid resource pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid directive: {0}")]
    InvalidDirective(String),
}
