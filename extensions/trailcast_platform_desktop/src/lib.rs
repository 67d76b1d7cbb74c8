//! trailcast Desktop Platform
//!
//! Windowing, keyboard input and frame presentation for macOS, Windows and
//! Linux. Frames rendered on the CPU are uploaded straight into the swapchain
//! texture.

pub mod event_loop;
pub mod input;
pub mod present;
pub mod window;

pub use event_loop::DesktopEventLoop;
pub use present::SurfacePresenter;
pub use window::DesktopWindow;
