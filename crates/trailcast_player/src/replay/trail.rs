//! Fixed-capacity FIFO of recent cursor positions.

use std::collections::VecDeque;

use trailcast_paint::Point;

use crate::error::ConfigError;

/// Sliding window of the most recent canvas points, oldest first.
///
/// Once full, every insert evicts the oldest point.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    points: VecDeque<Point>,
    capacity: usize,
}

impl TrailBuffer {
    /// # Errors
    ///
    /// Returns [`ConfigError::TrailCapacity`] unless `capacity` is even and
    /// non-zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 || capacity % 2 != 0 {
            return Err(ConfigError::TrailCapacity(capacity));
        }
        Ok(Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn add(&mut self, point: Point) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.points.len() == self.capacity
    }

    pub fn newest(&self) -> Option<Point> {
        self.points.back().copied()
    }

    pub fn oldest(&self) -> Option<Point> {
        self.points.front().copied()
    }
}
