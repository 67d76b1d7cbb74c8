//! Frame presentation: handing a finished RGBA8 frame to whatever shows it.

use crate::error::{PlatformError, Result};

/// Something that can display a finished frame.
pub trait FramePresenter {
    /// Show a tightly packed RGBA8 frame of `width * height` pixels.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame cannot be handed to the display.
    fn present(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()>;

    /// Vertical offset of the drawing area on the desktop, in pixels.
    ///
    /// Replay coordinates are recorded in absolute display space, so the
    /// renderer subtracts this before scaling.
    fn vertical_offset(&self) -> f32 {
        0.0
    }
}

/// Presenter for offscreen rendering: validates and counts frames.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    frames_presented: u64,
    vertical_offset: f32,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the drawing area sits `offset` pixels down the desktop.
    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.vertical_offset = offset;
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl FramePresenter for HeadlessPresenter {
    fn present(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(PlatformError::Present(format!(
                "frame is {} bytes, expected {expected} for {width}x{height}",
                pixels.len()
            )));
        }
        self.frames_presented += 1;
        Ok(())
    }

    fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }
}
