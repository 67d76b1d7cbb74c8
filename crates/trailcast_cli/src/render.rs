//! Headless rendering of a replay to a PNG sequence

use std::path::Path;

use anyhow::{Context, Result};
use trailcast_platform::HeadlessPresenter;
use trailcast_player::{load_replay, Exporter, PlaybackController};

use crate::config::{default_prefix, TrailcastConfig};

/// Frames held in memory between exports.
const RENDER_CHUNK: usize = 256;

/// Tick range and output overrides for `trailcast render`.
#[derive(Debug, Default)]
pub struct RenderOptions {
    pub from: usize,
    /// Exclusive end tick; the whole replay when unset.
    pub to: Option<usize>,
    pub prefix: Option<String>,
}

/// Totals for one render.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub written: usize,
    pub failed: usize,
}

/// Render `replay_path` offscreen and export every tick in the range.
pub fn run(
    replay_path: &Path,
    config: &TrailcastConfig,
    options: RenderOptions,
) -> Result<RenderSummary> {
    let replay = load_replay(replay_path)
        .with_context(|| format!("Failed to load replay {}", replay_path.display()))?;

    let len = replay.len();
    let end = options.to.map_or(len, |to| to.min(len));
    if options.from >= end {
        anyhow::bail!(
            "Tick range {}..{} is empty (replay has {} ticks)",
            options.from,
            end,
            len
        );
    }

    let prefix = options
        .prefix
        .or_else(|| config.export.prefix.clone())
        .unwrap_or_else(|| default_prefix(replay_path));
    let exporter = Exporter::new(config.export.out_dir.clone(), prefix, config.export.naming)?;

    let mut player = PlaybackController::new(
        replay,
        config.window.width,
        config.window.height,
        config.playback.clone(),
        config.trail.clone(),
        exporter,
    )?;
    let mut presenter = HeadlessPresenter::new();
    let mut summary = RenderSummary::default();

    tracing::info!(
        "Rendering ticks {}..{} to {}",
        options.from,
        end,
        player.exporter().target_dir(player.exporter().prefix()).display()
    );

    let mut start = options.from;
    while start < end {
        let chunk_end = (start + RENDER_CHUNK).min(end);
        summary.rendered += player.render_range(start..chunk_end, &mut presenter)?;

        let exporter = player.exporter();
        let report = exporter.dump_from(
            player.frames(),
            exporter.prefix(),
            summary.written + summary.failed,
        )?;
        summary.written += report.written.len();
        summary.failed += report.failed.len();

        player.frames_mut().clear();
        start = chunk_end;
    }

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} frames failed to export",
            summary.failed,
            summary.rendered
        );
    }
    tracing::info!("Wrote {} frames", summary.written);
    Ok(summary)
}
