//! Interactive playback in a desktop window

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use trailcast_platform::{ControlFlow, Event, EventLoop, InputState, Window, WindowEvent};
use trailcast_platform_desktop::DesktopEventLoop;
use trailcast_player::{
    load_replay, ExportReport, ExportError, Exporter, PlaybackController, PlayerError, TickClock,
};

use crate::config::{default_prefix, TrailcastConfig};

/// Open a window and play `replay_path` until the window closes or quit is pressed.
pub fn run(replay_path: &Path, config: &TrailcastConfig) -> Result<()> {
    let replay = load_replay(replay_path)
        .with_context(|| format!("Failed to load replay {}", replay_path.display()))?;

    let window_config = config.window_config(replay_path);
    let exporter = Exporter::from_config(&config.export, &default_prefix(replay_path))?;
    let mut player = PlaybackController::new(
        replay,
        window_config.width,
        window_config.height,
        config.playback.clone(),
        config.trail.clone(),
        exporter,
    )?;
    let mut input = InputState::new(config.keymap()?);
    let mut clock = TickClock::new(player.current_rate());
    let base_title = window_config.title.clone();
    let mut shown_title = String::new();

    let failure: Rc<RefCell<Option<PlayerError>>> = Rc::new(RefCell::new(None));
    let loop_failure = Rc::clone(&failure);

    let event_loop = DesktopEventLoop::new(window_config)?;
    event_loop.run(move |event, window| match event {
        Event::Key { key, pressed: true } => {
            input.key_down(key);
            ControlFlow::Continue
        }
        Event::Key { key, pressed: false } => {
            input.key_up(key);
            ControlFlow::Continue
        }
        Event::Window(WindowEvent::Focused(false)) => {
            input.release_all();
            ControlFlow::Continue
        }
        Event::Window(WindowEvent::CloseRequested) => ControlFlow::Exit,
        Event::Window(_) => ControlFlow::Continue,
        Event::Frame => {
            let now = Instant::now();
            if !clock.is_due(now) {
                return match clock.deadline() {
                    Some(deadline) => ControlFlow::WaitUntil(deadline),
                    None => ControlFlow::Continue,
                };
            }

            let report = match player.update(&input, window) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!("Playback failed: {}", e);
                    *loop_failure.borrow_mut() = Some(e);
                    return ControlFlow::Exit;
                }
            };
            input.end_tick();

            if report.exit_requested {
                return ControlFlow::Exit;
            }
            if let Some(result) = report.export {
                log_export(result);
            }

            let state = player.state();
            let title = format!(
                "{} [{}/{} {} {} tps]",
                base_title,
                state.tick_index,
                player.replay().last_index(),
                state.mode,
                player.current_rate()
            );
            if title != shown_title {
                window.set_title(&title);
                shown_title = title;
            }

            clock.set_rate(player.current_rate());
            ControlFlow::WaitUntil(clock.tick(now))
        }
    })?;

    let failure = failure.borrow_mut().take();
    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn log_export(result: std::result::Result<ExportReport, ExportError>) {
    match result {
        Ok(report) if report.is_success() => {
            tracing::info!("Exported {} frames", report.written.len());
        }
        Ok(report) => {
            tracing::warn!(
                "Exported {} frames, {} failed",
                report.written.len(),
                report.failed.len()
            );
        }
        Err(e) => tracing::error!("Export failed: {}", e),
    }
}
