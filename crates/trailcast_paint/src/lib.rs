//! trailcast Paint API
//!
//! A small immediate-mode 2D drawing API used by the replay renderer.
//!
//! # Features
//!
//! - Colors with linear ramps for fading trails
//! - Shape primitives (points, circles, line segments)
//! - A command list (`PaintContext`) that is filled per frame and cleared afterwards
//! - A CPU `Canvas` that rasterizes commands into an RGBA8 buffer
//!
//! # Example
//!
//! ```
//! use trailcast_paint::{Canvas, Color, LineCap, PaintContext, Point};
//!
//! let mut ctx = PaintContext::new();
//! ctx.clear(Color::BLACK);
//! ctx.stroke_line(Point::new(2.0, 2.0), Point::new(12.0, 2.0), Color::WHITE, 3.0, LineCap::Round);
//! ctx.fill_circle(Point::new(8.0, 8.0), 4.0, Color::RED);
//!
//! let mut canvas = Canvas::new(16, 16);
//! canvas.execute(ctx.commands());
//! assert_eq!(canvas.pixel(8, 8), Some([255, 0, 0, 255]));
//! ```

pub mod color;
pub mod context;
pub mod primitives;
pub mod raster;

pub use color::Color;
pub use context::{LineCap, PaintCommand, PaintContext, StrokeStyle};
pub use primitives::{Circle, Line, Point};
pub use raster::Canvas;
