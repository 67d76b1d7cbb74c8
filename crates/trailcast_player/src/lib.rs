//! trailcast Player
//!
//! Replays a recorded cursor path as an animation: a cursor marker with a
//! fading trail, drawn tick by tick, with scrubbing, looping, speed control
//! and PNG export of captured frames.
//!
//! - [`replay`]: samples, loaders, scaling, the trail, the renderer and the
//!   playback controller
//! - [`capture`]: the per-tick frame store and the PNG exporter
//! - [`config`]: the `[playback]`, `[trail]` and `[export]` settings

pub mod capture;
pub mod config;
pub mod error;
pub mod replay;

pub use capture::{ExportReport, Exporter, FrameStore};
pub use config::{CapturePolicy, ExportConfig, ExportNaming, PlaybackConfig, TrailStyle};
pub use error::{ConfigError, ExportError, PlayerError, ReplayError, Result};
pub use replay::{
    load_replay, PlaybackController, PlaybackMode, Replay, Sample, TickClock,
};
