use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthzError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthzError {
    /// The named pipeline does not appear in any pipeline group of the
    /// snapshot.
    #[error("pipeline '{0}' is not part of any pipeline group")]
    PipelineNotFound(String),
}
