//! Replay samples and the immutable sample sequence.

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;

/// One recorded pointer position with button state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub left_click: bool,
    #[serde(default)]
    pub right_click: bool,
}

impl Sample {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            left_click: false,
            right_click: false,
        }
    }

    pub fn with_buttons(mut self, left: bool, right: bool) -> Self {
        self.left_click = left;
        self.right_click = right;
        self
    }

    /// Either button is down.
    pub fn is_pressed(&self) -> bool {
        self.left_click || self.right_click
    }
}

/// A loaded replay: one sample per tick, never empty.
#[derive(Clone, Debug)]
pub struct Replay {
    samples: Vec<Sample>,
    /// Recorded milliseconds between samples, when the source format has them.
    frame_deltas: Vec<i64>,
}

impl Replay {
    /// Wrap a sample sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Empty`] when `samples` is empty.
    pub fn new(samples: Vec<Sample>) -> Result<Self, ReplayError> {
        if samples.is_empty() {
            return Err(ReplayError::Empty);
        }
        Ok(Self {
            samples,
            frame_deltas: Vec::new(),
        })
    }

    /// Attach per-sample recorded deltas.
    pub fn with_frame_deltas(mut self, deltas: Vec<i64>) -> Self {
        self.frame_deltas = deltas;
        self
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn frame_deltas(&self) -> &[i64] {
        &self.frame_deltas
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed replay.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, tick: usize) -> Option<&Sample> {
        self.samples.get(tick)
    }

    /// Sample at `tick`, clamped to the last tick.
    pub fn sample_clamped(&self, tick: usize) -> &Sample {
        &self.samples[tick.min(self.last_index())]
    }

    pub fn last_index(&self) -> usize {
        self.samples.len() - 1
    }

    /// Largest `x` and `y` over all samples, starting from zero.
    pub fn bounds(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((0.0f32, 0.0f32), |(mx, my), s| (mx.max(s.x), my.max(s.y)))
    }

    /// Number of recorded deltas that stray from `nominal_ms` by more than
    /// `tolerance_ms`. Zero-length deltas are ignored.
    pub fn irregular_frames(&self, nominal_ms: f64, tolerance_ms: f64) -> usize {
        self.frame_deltas
            .iter()
            .filter(|d| **d > 0)
            .filter(|d| (**d as f64 - nominal_ms).abs() > tolerance_ms)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_replay_rejected() {
        assert!(matches!(Replay::new(Vec::new()), Err(ReplayError::Empty)));
    }

    #[test]
    fn test_bounds_start_at_zero() {
        let replay = Replay::new(vec![Sample::new(-5.0, -3.0), Sample::new(-1.0, -2.0)]).unwrap();
        assert_eq!(replay.bounds(), (0.0, 0.0));

        let replay = Replay::new(vec![
            Sample::new(3.0, 40.0),
            Sample::new(12.0, 7.0),
            Sample::new(-2.0, 1.0),
        ])
        .unwrap();
        assert_eq!(replay.bounds(), (12.0, 40.0));
    }

    #[test]
    fn test_sample_clamped() {
        let replay = Replay::new(vec![Sample::new(1.0, 1.0), Sample::new(2.0, 2.0)]).unwrap();
        assert_eq!(replay.sample_clamped(0).x, 1.0);
        assert_eq!(replay.sample_clamped(99).x, 2.0);
        assert_eq!(replay.last_index(), 1);
    }

    #[test]
    fn test_irregular_frames() {
        let replay = Replay::new(vec![Sample::new(0.0, 0.0); 5])
            .unwrap()
            .with_frame_deltas(vec![0, 16, 17, 40, 16]);
        assert_eq!(replay.irregular_frames(16.67, 2.0), 1);
    }

    #[test]
    fn test_is_pressed() {
        assert!(!Sample::new(0.0, 0.0).is_pressed());
        assert!(Sample::new(0.0, 0.0).with_buttons(false, true).is_pressed());
    }
}
