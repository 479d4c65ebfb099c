use thiserror::Error;

/// Failures reported by a host service
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{0} is not supported by this compositor")]
    Unsupported(&'static str),

    #[error("registration failed: {0}")]
    Registration(String),
}

#[derive(Debug, Error)]
pub enum DockError {
    #[error("dock manager has already been initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
