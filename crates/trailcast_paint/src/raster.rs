//! CPU rasterizer for paint commands.
//!
//! Coverage is binary: a pixel is painted when its center lies inside the
//! shape's signed-distance boundary. There is no anti-aliasing.

use crate::color::Color;
use crate::context::{LineCap, PaintCommand, StrokeStyle};
use crate::primitives::{Circle, Line, Point};

/// An RGBA8 pixel buffer, row-major, origin at the top-left corner.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Get a pixel at (x, y) as RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Run a list of paint commands in order.
    pub fn execute(&mut self, commands: &[PaintCommand]) {
        for command in commands {
            match command {
                PaintCommand::Clear { color } => self.clear(*color),
                PaintCommand::FillCircle { circle, color } => self.fill_circle(*circle, *color),
                PaintCommand::StrokeLine { line, style } => self.stroke_line(*line, style),
            }
        }
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in bytemuck::cast_slice_mut::<u8, [u8; 4]>(&mut self.pixels) {
            *px = rgba;
        }
    }

    pub fn fill_circle(&mut self, circle: Circle, color: Color) {
        if circle.radius <= 0.0 {
            return;
        }
        let r = circle.radius;
        let c = circle.center;
        self.fill_where(c.x - r, c.y - r, c.x + r, c.y + r, color, |p| {
            circle.contains(p)
        });
    }

    pub fn stroke_line(&mut self, line: Line, style: &StrokeStyle) {
        let half = style.width / 2.0;
        if half <= 0.0 {
            return;
        }
        let min_x = line.from.x.min(line.to.x) - half;
        let min_y = line.from.y.min(line.to.y) - half;
        let max_x = line.from.x.max(line.to.x) + half;
        let max_y = line.from.y.max(line.to.y) + half;
        let cap = style.line_cap;
        self.fill_where(min_x, min_y, max_x, max_y, style.color, |p| {
            stroke_covers(&line, half, cap, p)
        });
    }

    /// Paint pixels inside the given bounds whose centers satisfy `inside`.
    fn fill_where(
        &mut self,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        color: Color,
        inside: impl Fn(Point) -> bool,
    ) {
        let Some((x0, x1)) = pixel_span(min_x, max_x, self.width) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(min_y, max_y, self.height) else {
            return;
        };

        let rgba = color.to_rgba8();
        let width = self.width as usize;
        let pixels = bytemuck::cast_slice_mut::<u8, [u8; 4]>(&mut self.pixels);
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(center) {
                    if let Some(px) = pixels.get_mut(y * width + x) {
                        *px = rgba;
                    }
                }
            }
        }
    }
}

/// Clamp a float range to pixel indices `[start, end)` within `0..limit`.
fn pixel_span(min: f32, max: f32, limit: u32) -> Option<(usize, usize)> {
    if !min.is_finite() || !max.is_finite() || max < 0.0 || min > limit as f32 {
        return None;
    }
    let start = min.floor().max(0.0) as usize;
    let end = (max.ceil().max(0.0) as usize).min(limit as usize);
    (start < end).then_some((start, end))
}

fn stroke_covers(line: &Line, half: f32, cap: LineCap, p: Point) -> bool {
    let Some(t) = line.project(p) else {
        // Zero-length segment: only caps give it area
        return match cap {
            LineCap::Butt => false,
            LineCap::Round => line.from.distance(p) <= half,
            LineCap::Square => {
                (p.x - line.from.x).abs() <= half && (p.y - line.from.y).abs() <= half
            }
        };
    };

    match cap {
        LineCap::Round => line.at(t.clamp(0.0, 1.0)).distance(p) <= half,
        LineCap::Butt => (0.0..=1.0).contains(&t) && line.perpendicular_distance(p) <= half,
        LineCap::Square => {
            let ext = half / line.length();
            (-ext..=1.0 + ext).contains(&t) && line.perpendicular_distance(p) <= half
        }
    }
}
