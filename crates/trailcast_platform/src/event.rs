//! Window configuration, platform events and the event loop contract

use std::time::Instant;

use crate::error::Result;
use crate::input::Key;

/// Window creation settings
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in physical pixels
    pub width: u32,
    /// Inner height in physical pixels
    pub height: u32,
    pub resizable: bool,
    pub decorations: bool,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
    /// Hide the system cursor over the window
    pub hide_cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "trailcast".to_string(),
            width: 1280,
            height: 720,
            resizable: false,
            decorations: true,
            vsync: false,
            hide_cursor: true,
        }
    }
}

/// Window-level notifications
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowEvent {
    CloseRequested,
    Resized { width: u32, height: u32 },
    /// Outer position of the window on the desktop
    Moved { x: i32, y: i32 },
    Focused(bool),
}

/// Events delivered to the application handler
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Time to produce the next frame
    Frame,
    Key { key: Key, pressed: bool },
    Window(WindowEvent),
}

/// What the event loop should do after a handler returns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep running, wake on the next platform event
    Continue,
    /// Sleep until the given instant, then deliver [`Event::Frame`]
    WaitUntil(Instant),
    /// Stop the loop and return from `run`
    Exit,
}

/// A window the application can retitle and redraw
pub trait Window {
    /// Inner size in physical pixels
    fn size(&self) -> (u32, u32);

    fn set_title(&self, title: &str);

    fn request_redraw(&self);
}

/// A platform event loop that owns one window
pub trait EventLoop {
    type Window: Window;

    /// Run until the handler returns [`ControlFlow::Exit`] or the platform quits.
    ///
    /// # Errors
    ///
    /// Returns an error when the window or its surface cannot be created or the
    /// platform loop fails.
    fn run<F>(self, handler: F) -> Result<()>
    where
        F: FnMut(Event, &mut Self::Window) -> ControlFlow + 'static;
}
