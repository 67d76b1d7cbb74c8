//! Desktop window implementation using winit

use std::sync::Arc;

use trailcast_platform::{FramePresenter, PlatformError, Result, Window, WindowConfig};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

use crate::present::SurfacePresenter;

/// Desktop window wrapping a winit window and its surface
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
    presenter: SurfacePresenter,
    focused: bool,
}

impl DesktopWindow {
    /// Create a new desktop window with a presentable surface
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_decorations(config.decorations);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| PlatformError::WindowCreation(e.to_string()))?,
        );
        if config.hide_cursor {
            window.set_cursor_visible(false);
        }

        let presenter = SurfacePresenter::new(Arc::clone(&window), config.vsync)?;

        Ok(Self {
            window,
            presenter,
            focused: true,
        })
    }

    /// Get the underlying winit window
    pub fn winit_window(&self) -> &WinitWindow {
        &self.window
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Set focus state (called by event loop)
    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Reconfigure the surface (called by event loop)
    pub(crate) fn resize_surface(&mut self, width: u32, height: u32) {
        self.presenter.resize(width, height);
    }
}

impl Window for DesktopWindow {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl FramePresenter for DesktopWindow {
    fn present(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        self.presenter.present(pixels, width, height)
    }

    /// Top of the client area on the desktop. Platforms that cannot report it
    /// (Wayland) yield 0.
    fn vertical_offset(&self) -> f32 {
        self.window
            .inner_position()
            .map(|pos| pos.y as f32)
            .unwrap_or(0.0)
    }
}
