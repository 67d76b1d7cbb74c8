//! Captured frames, keyed by tick.

use std::collections::BTreeMap;

use crate::error::ExportError;

/// Raw captured framebuffer data.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    /// Raw pixel data (RGBA8)
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tick the frame was rendered for
    pub tick: usize,
}

impl CapturedFrame {
    /// Get the number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get a pixel at (x, y) as RGBA.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Check if two frames are identical.
    pub fn is_identical_to(&self, other: &CapturedFrame) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

/// Frames captured during a session, iterated in ascending tick order.
///
/// Capturing a tick that is already stored replaces the earlier frame.
#[derive(Debug)]
pub struct FrameStore {
    width: u32,
    height: u32,
    frames: BTreeMap<usize, CapturedFrame>,
}

impl FrameStore {
    /// Create a store for frames of `width x height` RGBA8 pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: BTreeMap::new(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Store a copy of `pixels` for `tick`.
    ///
    /// Returns `true` when an earlier capture of the same tick was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::FrameSize`] when `pixels` is not exactly one
    /// frame long.
    pub fn capture(&mut self, tick: usize, pixels: &[u8]) -> Result<bool, ExportError> {
        let expected = self.expected_len();
        if pixels.len() != expected {
            return Err(ExportError::FrameSize {
                tick,
                expected,
                actual: pixels.len(),
            });
        }
        let frame = CapturedFrame {
            data: pixels.to_vec(),
            width: self.width,
            height: self.height,
            tick,
        };
        let replaced = self.frames.insert(tick, frame).is_some();
        tracing::debug!("Captured tick {} ({} stored)", tick, self.frames.len());
        Ok(replaced)
    }

    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, tick: usize) -> Option<&CapturedFrame> {
        self.frames.get(&tick)
    }

    pub fn contains(&self, tick: usize) -> bool {
        self.frames.contains_key(&tick)
    }

    /// Frames in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = &CapturedFrame> + '_ {
        self.frames.values()
    }

    /// Stored ticks in ascending order.
    pub fn ticks(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.keys().copied()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
