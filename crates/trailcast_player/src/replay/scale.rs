//! Mapping from replay space to canvas space.

use trailcast_paint::Point;

use super::sample::{Replay, Sample};
use crate::error::ConfigError;

/// Per-axis multipliers from replay units to canvas pixels.
///
/// Both components are finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactor {
    sx: f32,
    sy: f32,
}

impl ScaleFactor {
    /// Fit `[0, max_x] x [0, max_y]` onto a `width x height` canvas.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCanvas`] for an empty canvas and
    /// [`ConfigError::DegenerateBounds`] when either maximum is not a positive
    /// finite number.
    pub fn from_bounds(max_x: f32, max_y: f32, width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroCanvas { width, height });
        }
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(max_x) || !usable(max_y) {
            return Err(ConfigError::DegenerateBounds { max_x, max_y });
        }

        let sx = width as f32 / max_x;
        let sy = height as f32 / max_y;
        if !usable(sx) || !usable(sy) {
            return Err(ConfigError::DegenerateBounds { max_x, max_y });
        }
        Ok(Self { sx, sy })
    }

    pub fn sx(&self) -> f32 {
        self.sx
    }

    pub fn sy(&self) -> f32 {
        self.sy
    }
}

/// Converts samples to canvas points.
#[derive(Clone, Copy, Debug)]
pub struct Scaler {
    factor: ScaleFactor,
    vertical_offset: f32,
}

impl Scaler {
    pub fn new(factor: ScaleFactor) -> Self {
        Self {
            factor,
            vertical_offset: 0.0,
        }
    }

    /// Build a scaler fitted to the bounds of a whole replay.
    ///
    /// # Errors
    ///
    /// See [`ScaleFactor::from_bounds`].
    pub fn for_replay(replay: &Replay, width: u32, height: u32) -> Result<Self, ConfigError> {
        let (max_x, max_y) = replay.bounds();
        let factor = ScaleFactor::from_bounds(max_x, max_y, width, height)?;
        tracing::debug!("Scale factor {}x{} for canvas {}x{}", factor.sx, factor.sy, width, height);
        Ok(Self::new(factor))
    }

    pub fn factor(&self) -> ScaleFactor {
        self.factor
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    /// Set the window's vertical position on the desktop, subtracted from
    /// every sample's `y` before scaling.
    pub fn set_vertical_offset(&mut self, offset: f32) {
        self.vertical_offset = offset;
    }

    pub fn scale(&self, sample: &Sample) -> Point {
        Point::new(
            sample.x * self.factor.sx,
            (sample.y - self.vertical_offset) * self.factor.sy,
        )
    }
}
