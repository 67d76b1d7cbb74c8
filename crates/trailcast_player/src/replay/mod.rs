//! Replay playback.
//!
//! This module provides:
//! - `Sample` / `Replay` - the recorded cursor path and its loaders
//! - `Scaler` - replay space to canvas space
//! - `TrailBuffer` - the fading tail behind the cursor
//! - `FrameRenderer` - draws one tick into the canvas
//! - `PlaybackController` - modes, stepping, speed and capture
//! - `TickClock` - pacing for the host loop
//!
//! # Example
//!
//! ```no_run
//! use trailcast_player::capture::Exporter;
//! use trailcast_player::config::{ExportNaming, PlaybackConfig, TrailStyle};
//! use trailcast_player::replay::{load_replay, PlaybackController};
//! use trailcast_platform::HeadlessPresenter;
//!
//! # fn main() -> trailcast_player::Result<()> {
//! let replay = load_replay("session.json")?;
//! let exporter = Exporter::new("out", "session", ExportNaming::Sequential)?;
//! let mut player = PlaybackController::new(
//!     replay,
//!     1280,
//!     720,
//!     PlaybackConfig::default(),
//!     TrailStyle::default(),
//!     exporter,
//! )?;
//!
//! let mut presenter = HeadlessPresenter::new();
//! player.render_range(0..120, &mut presenter)?;
//! let report = player.export()?;
//! println!("wrote {} frames", report.written.len());
//! # Ok(())
//! # }
//! ```

mod clock;
mod loader;
mod player;
mod renderer;
mod sample;
mod scale;
mod trail;

pub use clock::TickClock;
pub use loader::{load_replay, parse_action_stream, parse_json, ReplayFormat};
pub use player::{PlaybackController, PlaybackMode, PlaybackState, TickReport};
pub use renderer::{FrameRenderer, TRAIL_RAMP_SPREAD};
pub use sample::{Replay, Sample};
pub use scale::{ScaleFactor, Scaler};
pub use trail::TrailBuffer;
