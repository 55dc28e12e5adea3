use thiserror::Error;

use crate::logging::LoggingError;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Failures at the fallible edges of the board: terminal I/O and log sinks.
/// Layout operations themselves never fail.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
