use std::io;

// Errors raised by the terminal platform while executing commands or running
// its event loop.
#[derive(Debug)]
pub enum PlatformError {
    /// Failure while setting up the platform before the first event.
    InitializationFailed(String),
    /// A command could not be carried out.
    OperationFailed(String),
    /// Writing to the terminal or a download file failed.
    Io(io::Error),
}

impl From<io::Error> for PlatformError {
    fn from(err: io::Error) -> Self {
        PlatformError::Io(err)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::InitializationFailed(s) => write!(f, "Initialization Failed: {s}"),
            PlatformError::OperationFailed(s) => write!(f, "Operation Failed: {s}"),
            PlatformError::Io(e) => write!(f, "I/O Error: {e}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for platform layer operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
