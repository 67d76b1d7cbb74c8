//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to initialize platform
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// Failed to create event loop
    #[error("Failed to create event loop: {0}")]
    EventLoop(String),

    /// Failed to create window
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Failed to create or configure the drawing surface
    #[error("Surface setup failed: {0}")]
    Surface(String),

    /// Failed to hand a frame to the display
    #[error("Frame presentation failed: {0}")]
    Present(String),

    /// Platform not supported on this OS or adapter
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// Unknown key name in a key binding
    #[error("Unknown key name: {0:?}")]
    UnknownKey(String),

    /// Unknown control name in a key binding
    #[error("Unknown control name: {0:?}")]
    UnknownControl(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
