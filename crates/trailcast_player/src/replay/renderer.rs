//! Draws the cursor and its fading trail for one tick.

use trailcast_paint::{Canvas, Color, LineCap, PaintContext, Point};
use trailcast_platform::{FramePresenter, PlatformError};

use super::sample::Sample;
use super::scale::Scaler;
use super::trail::TrailBuffer;
use crate::config::TrailStyle;
use crate::error::ConfigError;

/// Divisor spreading the trail ramp so even the newest segment stays below
/// full intensity.
pub const TRAIL_RAMP_SPREAD: f32 = 1.3;

/// Renders ticks into a CPU canvas and hands each frame to a presenter.
pub struct FrameRenderer {
    scaler: Scaler,
    trail: TrailBuffer,
    style: TrailStyle,
    paint: PaintContext,
    canvas: Canvas,
}

impl FrameRenderer {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the style is invalid.
    pub fn new(scaler: Scaler, style: TrailStyle, width: u32, height: u32) -> Result<Self, ConfigError> {
        style.validate()?;
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroCanvas { width, height });
        }
        Ok(Self {
            scaler,
            trail: TrailBuffer::new(style.capacity)?,
            style,
            paint: PaintContext::new(),
            canvas: Canvas::new(width, height),
        })
    }

    /// Draw `sample` on top of the current trail and present the frame.
    ///
    /// Returns the canvas point the cursor was drawn at.
    ///
    /// # Errors
    ///
    /// Returns the presenter's error when the frame cannot be shown. The trail
    /// and canvas are already updated in that case.
    pub fn render_tick(
        &mut self,
        sample: &Sample,
        presenter: &mut dyn FramePresenter,
    ) -> Result<Point, PlatformError> {
        self.scaler.set_vertical_offset(presenter.vertical_offset());
        let point = self.scaler.scale(sample);
        self.trail.add(point);

        self.paint.clear(self.style.background);
        self.draw_trail();
        let cursor_color = if sample.is_pressed() {
            self.style.active_color
        } else {
            self.style.trail_color
        };
        self.paint.fill_circle(point, self.style.cursor_size, cursor_color);

        self.canvas.execute(self.paint.commands());
        self.paint.reset();

        presenter.present(self.canvas.pixels(), self.canvas.width(), self.canvas.height())?;
        Ok(point)
    }

    fn draw_trail(&mut self) {
        let capacity = self.trail.capacity() as f32;
        let size = self.style.cursor_size;
        let points = self.trail.snapshot();

        for (i, pair) in points.windows(2).enumerate() {
            let i = (i + 1) as f32;
            let color = segment_color(self.style.trail_color, i, capacity);
            let width = size + i * size / capacity;
            self.paint.stroke_line(pair[0], pair[1], color, width, LineCap::Round);
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn style(&self) -> &TrailStyle {
        &self.style
    }

    /// The most recently rendered frame.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn pixels(&self) -> &[u8] {
        self.canvas.pixels()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

/// Color of trail segment `index`, dimmer the older it is.
fn segment_color(base: Color, index: f32, capacity: f32) -> Color {
    base.scale(index / (capacity * TRAIL_RAMP_SPREAD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::sample::Replay;
    use trailcast_platform::HeadlessPresenter;

    fn renderer(samples: &[(f32, f32)], size: u32, style: TrailStyle) -> FrameRenderer {
        let replay = Replay::new(samples.iter().map(|&(x, y)| Sample::new(x, y)).collect()).unwrap();
        let scaler = Scaler::for_replay(&replay, size, size).unwrap();
        FrameRenderer::new(scaler, style, size, size).unwrap()
    }

    #[test]
    fn test_segment_ramp_brightens_toward_newest() {
        let older = segment_color(Color::MAGENTA, 1.0, 50.0);
        let newer = segment_color(Color::MAGENTA, 49.0, 50.0);
        assert!(older.r < newer.r);
        assert_eq!(older.g, 0.0);
        assert!(newer.r < 1.0);
    }

    #[test]
    fn test_render_draws_cursor_and_presents() {
        let style = TrailStyle {
            cursor_size: 4.0,
            ..Default::default()
        };
        let mut renderer = renderer(&[(50.0, 50.0), (100.0, 100.0)], 100, style);
        let mut presenter = HeadlessPresenter::new();

        let point = renderer
            .render_tick(&Sample::new(50.0, 50.0), &mut presenter)
            .unwrap();
        assert_eq!(point, Point::new(50.0, 50.0));
        assert_eq!(presenter.frames_presented(), 1);
        assert_eq!(renderer.trail().len(), 1);

        // Cursor in the idle color, background elsewhere.
        assert_eq!(renderer.canvas().pixel(50, 50), Some(Color::MAGENTA.to_rgba8()));
        assert_eq!(renderer.canvas().pixel(5, 5), Some(Color::BLACK.to_rgba8()));
    }

    #[test]
    fn test_pressed_sample_uses_active_color() {
        let style = TrailStyle {
            cursor_size: 4.0,
            ..Default::default()
        };
        let mut renderer = renderer(&[(100.0, 100.0)], 100, style);
        let mut presenter = HeadlessPresenter::new();
        renderer
            .render_tick(&Sample::new(20.0, 20.0).with_buttons(true, false), &mut presenter)
            .unwrap();
        assert_eq!(renderer.canvas().pixel(20, 20), Some(Color::YELLOW.to_rgba8()));
    }

    #[test]
    fn test_previous_frame_is_cleared() {
        let style = TrailStyle {
            cursor_size: 3.0,
            capacity: 2,
            ..Default::default()
        };
        let mut renderer = renderer(&[(100.0, 100.0)], 100, style);
        let mut presenter = HeadlessPresenter::new();
        renderer.render_tick(&Sample::new(10.0, 10.0), &mut presenter).unwrap();
        renderer.render_tick(&Sample::new(80.0, 80.0), &mut presenter).unwrap();
        renderer.render_tick(&Sample::new(80.0, 10.0), &mut presenter).unwrap();

        // The first point fell out of the two-point trail.
        assert_eq!(renderer.canvas().pixel(10, 10), Some(Color::BLACK.to_rgba8()));
        assert_eq!(renderer.trail().len(), 2);
    }

    #[test]
    fn test_vertical_offset_from_presenter() {
        let style = TrailStyle {
            cursor_size: 2.0,
            ..Default::default()
        };
        let mut renderer = renderer(&[(100.0, 100.0)], 100, style);
        let mut presenter = HeadlessPresenter::new().with_vertical_offset(30.0);
        let point = renderer
            .render_tick(&Sample::new(40.0, 70.0), &mut presenter)
            .unwrap();
        assert_eq!(point, Point::new(40.0, 40.0));
    }
}
