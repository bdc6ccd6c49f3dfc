use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManagerError>;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}
