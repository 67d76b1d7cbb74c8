//! trailcast configuration file handling

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use trailcast_platform::{Control, Key, KeyMap, WindowConfig};
use trailcast_player::{ExportConfig, PlaybackConfig, TrailStyle};

pub const CONFIG_FILE: &str = "trailcast.toml";

const CONFIG_HEADER: &str = "\
# trailcast configuration
#
# [window]    canvas and window size in physical pixels
# [playback]  base_tick_rate drives idle/paused modes, playback_rate auto-play
#             and loop; capture_policy is \"on-leave\" or \"every-render\"
# [trail]     capacity must be even; colors are {r, g, b, a} in 0.0..=1.0
# [export]    frames go to <out_dir>/<prefix>/<prefix>NNNNNN.png; naming is
#             \"sequential\" or \"tick-index\"
# [keys]      control = [\"Key\", ...]; listed controls replace their defaults
";

/// Top-level configuration (trailcast.toml)
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TrailcastConfig {
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub trail: TrailStyle,
    #[serde(default)]
    pub export: ExportConfig,
    /// Control name to key names
    #[serde(default)]
    pub keys: BTreeMap<String, Vec<String>>,
}

/// Window and canvas settings
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct WindowSection {
    /// Window title; defaults to the replay file name
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub vsync: bool,
    #[serde(default = "default_true")]
    pub hide_cursor: bool,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_true() -> bool {
    true
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: None,
            width: default_width(),
            height: default_height(),
            vsync: false,
            hide_cursor: true,
        }
    }
}

impl TrailcastConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `trailcast.toml` in the
    /// working directory is used if present, and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if path.is_dir() => path.join(CONFIG_FILE),
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.exists() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                local
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: TrailcastConfig = toml::from_str(content)?;
        config.playback.validate()?;
        config.trail.validate()?;
        config.keymap()?;
        Ok(config)
    }

    /// The default configuration, with every key binding spelled out.
    pub fn documented_default() -> Self {
        let defaults = KeyMap::default();
        let keys = Control::ALL
            .iter()
            .map(|control| {
                let mut names: Vec<String> =
                    defaults.keys_for(*control).map(|k| k.to_string()).collect();
                names.sort();
                (control.name().to_string(), names)
            })
            .collect();
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write a commented default `trailcast.toml` into `dir`.
    pub fn write_default(dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        let body = Self::documented_default().to_toml()?;
        fs::write(&path, format!("{CONFIG_HEADER}\n{body}"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Default bindings with the `[keys]` overrides applied.
    pub fn keymap(&self) -> Result<KeyMap> {
        let mut map = KeyMap::default();
        for (control_name, key_names) in &self.keys {
            let control: Control = control_name
                .parse()
                .with_context(|| format!("Invalid [keys] entry {control_name:?}"))?;
            map.unbind(control);
            for key_name in key_names {
                let key: Key = key_name
                    .parse()
                    .with_context(|| format!("Invalid key for {control_name}"))?;
                map.bind(key, control);
            }
        }
        Ok(map)
    }

    /// Window settings for playing `replay`.
    pub fn window_config(&self, replay: &Path) -> WindowConfig {
        let title = self.window.title.clone().unwrap_or_else(|| {
            let name = replay
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("trailcast - {name}")
        });
        WindowConfig {
            title,
            width: self.window.width,
            height: self.window.height,
            vsync: self.window.vsync,
            hide_cursor: self.window.hide_cursor,
            ..Default::default()
        }
    }
}

/// Export prefix derived from the replay file name.
pub fn default_prefix(replay: &Path) -> String {
    let stem: String = replay
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "replay".to_string()
    } else {
        stem
    }
}
