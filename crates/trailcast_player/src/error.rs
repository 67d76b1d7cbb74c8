//! Error taxonomy for loading, configuring, rendering and exporting replays

use std::path::PathBuf;

use thiserror::Error;
use trailcast_platform::PlatformError;

/// The replay file is missing, unreadable or malformed.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read replay {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed replay JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed replay frame #{frame}: {reason}")]
    Frame { frame: usize, reason: String },

    #[error("Replay contains no samples")]
    Empty,
}

/// Setup values that make rendering undefined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Replay bounds ({max_x}, {max_y}) cannot be scaled: both maxima must be positive")]
    DegenerateBounds { max_x: f32, max_y: f32 },

    #[error("Canvas size {width}x{height} is empty")]
    ZeroCanvas { width: u32, height: u32 },

    #[error("Trail capacity {0} must be a non-zero even number")]
    TrailCapacity(usize),

    #[error("Cursor size {0} must be a positive finite number")]
    CursorSize(f32),

    #[error("Playback rate {rate} is below the floor of {floor}")]
    PlaybackRate { rate: u32, floor: u32 },

    #[error("Playback rate floor {0} is below the minimum of 5")]
    RateFloor(u32),

    #[error("Playback rate ceiling {max} is below the starting rate {rate}")]
    RateCeiling { max: u32, rate: u32 },

    #[error("Base tick rate must be at least 1")]
    TickRate,
}

/// Frame capture or image export failures.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid export prefix {0:?}: must be a non-empty file name without separators")]
    InvalidPrefix(String),

    #[error("Failed to create export directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    #[error("Frame for tick {tick} is {actual} bytes, expected {expected}")]
    FrameSize {
        tick: usize,
        expected: usize,
        actual: usize,
    },
}

/// Any failure surfaced by the player.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
