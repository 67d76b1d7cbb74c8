//! trailcast Platform
//!
//! The seam between the replay engine and a windowing backend:
//!
//! - **Input**: platform-agnostic [`Key`]s, playback [`Control`]s, key bindings
//!   and per-tick edge/level tracking
//! - **Presentation**: the [`FramePresenter`] trait the renderer draws through
//! - **Lifecycle**: [`Event`], [`ControlFlow`] and the [`EventLoop`] contract
//!   implemented by backends such as `trailcast_platform_desktop`

pub mod error;
pub mod event;
pub mod input;
pub mod present;

pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event, EventLoop, Window, WindowConfig, WindowEvent};
pub use input::{Control, ControlInput, InputState, Key, KeyMap};
pub use present::{FramePresenter, HeadlessPresenter};
