//! Playback controller.
//!
//! Owns the replay, the renderer and the captured frames, and turns one tick
//! of control input into at most one rendered frame.
//!
//! `tick_index` always names the tick currently on screen once the first
//! frame has been rendered. Automatic advance moves to the next tick and then
//! renders it; steps capture the frame being left, move, then render.

use std::fmt;
use std::ops::Range;

use trailcast_platform::{Control, ControlInput, FramePresenter};

use super::renderer::FrameRenderer;
use super::sample::Replay;
use super::scale::Scaler;
use crate::capture::{ExportReport, Exporter, FrameStore};
use crate::config::{CapturePolicy, PlaybackConfig, TrailStyle};
use crate::error::{ExportError, Result};

/// Tolerance, in milliseconds, before a recorded frame delta counts as
/// irregular.
const IRREGULAR_DELTA_TOLERANCE_MS: f64 = 4.0;

/// Playback mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    /// Advance at the base tick rate, wrapping at the end.
    #[default]
    Idle,
    /// No automatic advance; ticks move only on step input.
    PausedScrub,
    /// Advance at the playback rate and stop on the last tick.
    AutoPlay,
    /// Advance at the playback rate, restarting after the last tick.
    Loop,
}

impl PlaybackMode {
    /// Modes in which speed controls apply.
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackMode::AutoPlay | PlaybackMode::Loop)
    }

    /// Modes in which step controls apply.
    pub fn allows_stepping(self) -> bool {
        matches!(self, PlaybackMode::Idle | PlaybackMode::PausedScrub)
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackMode::Idle => f.write_str("idle"),
            PlaybackMode::PausedScrub => f.write_str("paused"),
            PlaybackMode::AutoPlay => f.write_str("playing"),
            PlaybackMode::Loop => f.write_str("looping"),
        }
    }
}

/// Mutable playback position, rate and mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    pub tick_index: usize,
    /// Ticks per second in auto-play and loop modes.
    pub playback_rate: u32,
    pub mode: PlaybackMode,
}

/// What one call to [`PlaybackController::update`] did.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Quit was pressed; nothing else was processed.
    pub exit_requested: bool,
    /// Tick rendered this update, if any.
    pub rendered: Option<usize>,
    /// Result of an export triggered this update.
    pub export: Option<std::result::Result<ExportReport, ExportError>>,
}

/// Drives playback of one replay.
pub struct PlaybackController {
    replay: Replay,
    renderer: FrameRenderer,
    frames: FrameStore,
    exporter: Exporter,
    config: PlaybackConfig,
    state: PlaybackState,
    /// Mode restored when leaving [`PlaybackMode::PausedScrub`].
    resume_mode: PlaybackMode,
    /// Whether `tick_index` has been rendered at least once.
    displayed: bool,
    /// Auto-play was started on an already displayed last tick; the next
    /// advance starts over from tick 0 instead of stopping.
    rewind_on_play: bool,
}

impl PlaybackController {
    /// Set up playback of `replay` on a `width x height` canvas.
    ///
    /// # Errors
    ///
    /// Returns a config error when the rates, trail style or replay bounds
    /// cannot be used.
    pub fn new(
        replay: Replay,
        width: u32,
        height: u32,
        config: PlaybackConfig,
        style: TrailStyle,
        exporter: Exporter,
    ) -> Result<Self> {
        config.validate()?;
        let scaler = Scaler::for_replay(&replay, width, height)?;
        let renderer = FrameRenderer::new(scaler, style, width, height)?;

        let nominal_ms = 1000.0 / f64::from(config.base_tick_rate);
        let irregular = replay.irregular_frames(nominal_ms, IRREGULAR_DELTA_TOLERANCE_MS);
        if irregular > 0 {
            tracing::warn!(
                "{} of {} frames deviate from the {:.2}ms tick; playback assumes uniform ticks",
                irregular,
                replay.len(),
                nominal_ms
            );
        }

        tracing::info!(
            "Playback ready: {} ticks on {}x{}, base rate {}/s",
            replay.len(),
            width,
            height,
            config.base_tick_rate
        );

        let state = PlaybackState {
            tick_index: 0,
            playback_rate: config.playback_rate,
            mode: PlaybackMode::Idle,
        };

        Ok(Self {
            replay,
            renderer,
            frames: FrameStore::new(width, height),
            exporter,
            config,
            state,
            resume_mode: PlaybackMode::Idle,
            displayed: false,
            rewind_on_play: false,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.state.mode
    }

    pub fn tick_index(&self) -> usize {
        self.state.tick_index
    }

    pub fn playback_rate(&self) -> u32 {
        self.state.playback_rate
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut FrameStore {
        &mut self.frames
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Ticks per second the host loop should run at in the current mode.
    pub fn current_rate(&self) -> u32 {
        if self.state.mode.is_playing() {
            self.state.playback_rate
        } else {
            self.config.base_tick_rate
        }
    }

    /// Process one tick of input, then advance unless a step already moved.
    ///
    /// # Errors
    ///
    /// Returns an error when a frame cannot be presented or captured. Export
    /// failures are reported in [`TickReport::export`] instead.
    pub fn update(
        &mut self,
        input: &dyn ControlInput,
        presenter: &mut dyn FramePresenter,
    ) -> Result<TickReport> {
        let mut report = TickReport::default();
        if input.just_pressed(Control::Quit) {
            tracing::debug!("Quit requested at tick {}", self.state.tick_index);
            report.exit_requested = true;
            return Ok(report);
        }

        if input.just_pressed(Control::PlayToggle) {
            self.toggle_play();
        }
        if input.just_pressed(Control::LoopToggle) {
            self.toggle_loop();
        }
        if input.just_pressed(Control::Pause) {
            self.toggle_pause();
        }
        if input.just_pressed(Control::Export) {
            report.export = Some(self.export());
        }

        if input.is_held(Control::SpeedUp) {
            self.speed_up();
        }
        if input.is_held(Control::SpeedDown) {
            self.speed_down();
        }

        let stepped = if input.just_pressed(Control::StepForward) {
            self.step_forward(presenter)?
        } else if input.just_pressed(Control::StepBackward) {
            self.step_backward(presenter)?
        } else {
            None
        };

        report.rendered = match stepped {
            Some(tick) => Some(tick),
            None => self.advance(presenter)?,
        };
        Ok(report)
    }

    /// Automatic progress for the current mode.
    ///
    /// Returns the tick rendered, or `None` when paused (the current frame is
    /// presented again).
    ///
    /// # Errors
    ///
    /// Returns an error when the frame cannot be presented or captured.
    pub fn advance(&mut self, presenter: &mut dyn FramePresenter) -> Result<Option<usize>> {
        if !self.displayed {
            if self.state.mode == PlaybackMode::PausedScrub {
                return Ok(None);
            }
            return self.render_current(presenter).map(Some);
        }

        let last = self.replay.last_index();
        match self.state.mode {
            PlaybackMode::PausedScrub => {
                self.present_current(presenter)?;
                return Ok(None);
            }
            PlaybackMode::Idle | PlaybackMode::Loop => {
                if self.state.tick_index >= last {
                    self.restart();
                } else {
                    self.state.tick_index += 1;
                }
            }
            PlaybackMode::AutoPlay if self.rewind_on_play => {
                self.rewind_on_play = false;
                if self.state.tick_index >= last {
                    self.restart();
                } else {
                    self.state.tick_index += 1;
                }
            }
            PlaybackMode::AutoPlay => {
                if self.state.tick_index >= last {
                    tracing::debug!("Reached last tick {}, stopping", last);
                    self.set_mode(PlaybackMode::Idle);
                    self.present_current(presenter)?;
                    return Ok(None);
                }
                self.state.tick_index += 1;
            }
        }
        self.render_current(presenter).map(Some)
    }

    /// Show the last rendered canvas again without touching the trail.
    fn present_current(&self, presenter: &mut dyn FramePresenter) -> Result<()> {
        let (width, height) = self.renderer.size();
        presenter.present(self.renderer.pixels(), width, height)?;
        Ok(())
    }

    fn restart(&mut self) {
        tracing::debug!("Wrapping to tick 0");
        self.state.tick_index = 0;
        self.renderer.clear_trail();
    }

    fn set_mode(&mut self, mode: PlaybackMode) {
        if self.state.mode != mode {
            tracing::debug!("Mode {} -> {}", self.state.mode, mode);
            self.state.mode = mode;
        }
    }

    /// `AutoPlay` goes back to `Idle`; any other mode starts auto-play.
    ///
    /// The tick index is left alone. Starting auto-play while the last tick
    /// is on screen plays again from tick 0 on the next advance.
    pub fn toggle_play(&mut self) {
        let next = match self.state.mode {
            PlaybackMode::AutoPlay => PlaybackMode::Idle,
            _ => PlaybackMode::AutoPlay,
        };
        self.rewind_on_play = next == PlaybackMode::AutoPlay
            && self.displayed
            && self.state.tick_index >= self.replay.last_index();
        self.set_mode(next);
    }

    /// `Loop` goes back to `Idle`; any other mode starts looping.
    pub fn toggle_loop(&mut self) {
        let next = match self.state.mode {
            PlaybackMode::Loop => PlaybackMode::Idle,
            _ => PlaybackMode::Loop,
        };
        self.set_mode(next);
    }

    /// Pause into scrub mode, or resume the mode that was paused.
    pub fn toggle_pause(&mut self) {
        match self.state.mode {
            PlaybackMode::PausedScrub => self.set_mode(self.resume_mode),
            mode => {
                self.resume_mode = mode;
                self.set_mode(PlaybackMode::PausedScrub);
            }
        }
    }

    /// Raise the playback rate by one, up to the configured ceiling.
    /// Ignored outside auto-play and loop.
    pub fn speed_up(&mut self) {
        if self.state.mode.is_playing() {
            self.set_rate(self.state.playback_rate.saturating_add(1));
        }
    }

    /// Lower the playback rate by one, down to the floor.
    /// Ignored outside auto-play and loop.
    pub fn speed_down(&mut self) {
        if self.state.mode.is_playing() {
            self.set_rate(self.state.playback_rate.saturating_sub(1));
        }
    }

    fn set_rate(&mut self, rate: u32) {
        let rate = self.config.clamp_rate(rate);
        if rate != self.state.playback_rate {
            tracing::debug!("Playback rate {} -> {}", self.state.playback_rate, rate);
            self.state.playback_rate = rate;
        }
    }

    /// Move one tick forward and render it.
    ///
    /// Returns the tick rendered, or `None` when the step was ignored (wrong
    /// mode or already on the last tick).
    ///
    /// # Errors
    ///
    /// Returns an error when the frame cannot be presented or captured.
    pub fn step_forward(&mut self, presenter: &mut dyn FramePresenter) -> Result<Option<usize>> {
        if self.state.tick_index >= self.replay.last_index() {
            return Ok(None);
        }
        self.step_to(self.state.tick_index + 1, presenter)
    }

    /// Move one tick backward and render it. See [`Self::step_forward`].
    ///
    /// # Errors
    ///
    /// Returns an error when the frame cannot be presented or captured.
    pub fn step_backward(&mut self, presenter: &mut dyn FramePresenter) -> Result<Option<usize>> {
        if self.state.tick_index == 0 {
            return Ok(None);
        }
        self.step_to(self.state.tick_index - 1, presenter)
    }

    fn step_to(&mut self, tick: usize, presenter: &mut dyn FramePresenter) -> Result<Option<usize>> {
        if !self.state.mode.allows_stepping() {
            return Ok(None);
        }
        if self.displayed && self.config.capture_policy == CapturePolicy::OnLeave {
            self.frames.capture(self.state.tick_index, self.renderer.pixels())?;
        }
        tracing::debug!("Step {} -> {}", self.state.tick_index, tick);
        self.state.tick_index = tick;
        self.render_current(presenter).map(Some)
    }

    /// Jump to `tick` (clamped) without rendering and start a fresh trail.
    pub fn seek(&mut self, tick: usize) {
        self.state.tick_index = tick.min(self.replay.last_index());
        self.displayed = false;
        self.rewind_on_play = false;
        self.renderer.clear_trail();
    }

    fn render_current(&mut self, presenter: &mut dyn FramePresenter) -> Result<usize> {
        let tick = self.state.tick_index;
        let sample = *self.replay.sample_clamped(tick);
        self.renderer.render_tick(&sample, presenter)?;
        self.displayed = true;
        if self.config.capture_policy == CapturePolicy::EveryRender {
            self.frames.capture(tick, self.renderer.pixels())?;
        }
        Ok(tick)
    }

    /// Render and capture every tick in `range` (clamped to the replay),
    /// regardless of mode and capture policy.
    ///
    /// The trail carries over when `range` continues directly from the tick
    /// on screen, and starts fresh otherwise.
    ///
    /// Returns the number of ticks rendered.
    ///
    /// # Errors
    ///
    /// Returns an error when a frame cannot be presented or captured.
    pub fn render_range(
        &mut self,
        range: Range<usize>,
        presenter: &mut dyn FramePresenter,
    ) -> Result<usize> {
        let end = range.end.min(self.replay.len());
        let start = range.start.min(end);
        if start == end {
            return Ok(0);
        }

        let continues = self.displayed && start > 0 && self.state.tick_index == start - 1;
        if !continues {
            self.renderer.clear_trail();
        }

        for tick in start..end {
            self.state.tick_index = tick;
            let sample = *self.replay.sample_clamped(tick);
            self.renderer.render_tick(&sample, presenter)?;
            self.displayed = true;
            self.frames.capture(tick, self.renderer.pixels())?;
        }
        tracing::debug!("Rendered ticks {}..{}", start, end);
        Ok(end - start)
    }

    /// Write all captured frames with the exporter's prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the export directory cannot be created.
    pub fn export(&self) -> std::result::Result<ExportReport, ExportError> {
        if self.frames.is_empty() {
            tracing::warn!("Export requested with no captured frames");
        }
        self.exporter.dump(&self.frames)
    }
}
