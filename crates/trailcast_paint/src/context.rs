//! Paint context - the immediate-mode drawing API
//!
//! Commands are recorded per frame, executed by a [`Canvas`](crate::Canvas),
//! and cleared before the next frame.

use crate::color::Color;
use crate::primitives::{Circle, Line, Point};

/// Stroke style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub line_cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            line_cap: LineCap::Butt,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// A paint command for the rasterizer
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    Clear { color: Color },
    FillCircle { circle: Circle, color: Color },
    StrokeLine { line: Line, style: StrokeStyle },
}

/// The paint context used for per-frame drawing
#[derive(Debug, Default)]
pub struct PaintContext {
    commands: Vec<PaintCommand>,
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drop all recorded commands, keeping the allocation
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    // === Shape drawing ===

    pub fn clear(&mut self, color: Color) {
        self.commands.push(PaintCommand::Clear { color });
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(PaintCommand::FillCircle {
            circle: Circle::new(center, radius),
            color,
        });
    }

    pub fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32, cap: LineCap) {
        self.commands.push(PaintCommand::StrokeLine {
            line: Line::new(from, to),
            style: StrokeStyle {
                color,
                width,
                line_cap: cap,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut ctx = PaintContext::new();
        ctx.clear(Color::BLACK);
        ctx.stroke_line(Point::ZERO, Point::new(1.0, 1.0), Color::WHITE, 2.0, LineCap::Round);
        ctx.fill_circle(Point::new(1.0, 1.0), 3.0, Color::RED);

        assert_eq!(ctx.len(), 3);
        assert!(matches!(ctx.commands()[0], PaintCommand::Clear { .. }));
        assert!(matches!(
            ctx.commands()[1],
            PaintCommand::StrokeLine {
                style: StrokeStyle {
                    line_cap: LineCap::Round,
                    ..
                },
                ..
            }
        ));
        assert!(matches!(ctx.commands()[2], PaintCommand::FillCircle { .. }));
    }

    #[test]
    fn reset_and_take_empty_the_list() {
        let mut ctx = PaintContext::new();
        ctx.clear(Color::BLACK);
        let taken = ctx.take_commands();
        assert_eq!(taken.len(), 1);
        assert!(ctx.is_empty());

        ctx.clear(Color::WHITE);
        ctx.reset();
        assert!(ctx.is_empty());
    }
}
