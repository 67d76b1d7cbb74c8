//! Geometric primitives

/// A 2D point in screen space (pixels, origin top-left, y grows downward)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A circle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        (dx * dx + dy * dy) <= (self.radius * self.radius)
    }
}

/// A straight line segment between two points
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Projection parameter of `point` onto the infinite line through the segment.
    ///
    /// 0.0 is `from`, 1.0 is `to`. Returns `None` for a zero-length segment.
    pub fn project(&self, point: Point) -> Option<f32> {
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        let len2 = dx * dx + dy * dy;
        if len2 <= f32::EPSILON {
            return None;
        }
        Some(((point.x - self.from.x) * dx + (point.y - self.from.y) * dy) / len2)
    }

    /// Perpendicular distance from `point` to the infinite line through the segment.
    pub fn perpendicular_distance(&self, point: Point) -> f32 {
        let len = self.length();
        if len <= f32::EPSILON {
            return self.from.distance(point);
        }
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        ((point.x - self.from.x) * dy - (point.y - self.from.y) * dx).abs() / len
    }

    /// Point at parameter `t` along the segment
    pub fn at(&self, t: f32) -> Point {
        Point::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_contains_boundary() {
        let c = Circle::new(Point::new(0.0, 0.0), 5.0);
        assert!(c.contains(Point::new(3.0, 4.0)));
        assert!(!c.contains(Point::new(4.0, 4.0)));
    }

    #[test]
    fn line_projection_and_distance() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(line.project(Point::new(5.0, 3.0)), Some(0.5));
        assert_eq!(line.perpendicular_distance(Point::new(5.0, 3.0)), 3.0);
        assert_eq!(line.at(0.25), Point::new(2.5, 0.0));

        let dot = Line::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0));
        assert_eq!(dot.project(Point::ZERO), None);
    }
}
