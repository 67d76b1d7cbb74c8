//! trailcast - replay cursor trails
//!
//! Commands:
//! - `play`: play a replay in a window with keyboard controls
//! - `render`: render a tick range offscreen to a PNG sequence
//! - `init`: write a commented default `trailcast.toml`

mod config;
mod play;
mod render;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::TrailcastConfig;

#[derive(Parser)]
#[command(name = "trailcast")]
#[command(about = "Play and render recorded cursor trails")]
#[command(version)]
struct Cli {
    /// Configuration file or directory containing trailcast.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a replay in a window
    Play {
        /// Replay file (.json, or frame-delta action stream)
        replay: PathBuf,
    },

    /// Render a replay to PNG frames without opening a window
    Render {
        /// Replay file (.json, or frame-delta action stream)
        replay: PathBuf,

        /// First tick to render
        #[arg(long, default_value_t = 0)]
        from: usize,

        /// Tick to stop before (defaults to the end of the replay)
        #[arg(long)]
        to: Option<usize>,

        /// File name prefix for exported frames
        #[arg(short, long)]
        prefix: Option<String>,

        /// Directory the frame folder is created in
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Write a default trailcast.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Play { replay } => {
            let config = TrailcastConfig::load(cli.config.as_deref())?;
            play::run(&replay, &config)
        }
        Commands::Render {
            replay,
            from,
            to,
            prefix,
            out_dir,
        } => {
            let mut config = TrailcastConfig::load(cli.config.as_deref())?;
            if let Some(dir) = out_dir {
                config.export.out_dir = dir;
            }
            let options = render::RenderOptions { from, to, prefix };
            let summary = render::run(&replay, &config, options)?;
            println!("Rendered {} frames", summary.written);
            Ok(())
        }
        Commands::Init { dir } => {
            let path = TrailcastConfig::write_default(&dir)?;
            println!("Created {}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_arguments_parse() {
        let cli = Cli::parse_from([
            "trailcast", "-vv", "render", "run.json", "--from", "3", "--to", "9", "-p", "clip",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Render {
                replay,
                from,
                to,
                prefix,
                out_dir,
            } => {
                assert_eq!(replay, PathBuf::from("run.json"));
                assert_eq!((from, to), (3, Some(9)));
                assert_eq!(prefix.as_deref(), Some("clip"));
                assert!(out_dir.is_none());
            }
            _ => panic!("expected render"),
        }
    }
}
