//! Playback, trail and export settings.
//!
//! Each struct maps onto one section of `trailcast.toml`; every field has a
//! default so partial sections deserialize.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use trailcast_paint::Color;

use crate::error::ConfigError;

/// Lowest playback rate the speed controls can reach, in ticks per second.
pub const MIN_PLAYBACK_RATE: u32 = 5;

/// When the controller copies a rendered frame into the frame store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapturePolicy {
    /// Capture the displayed frame when a step moves away from it.
    #[default]
    OnLeave,
    /// Capture every rendered tick, replacing earlier captures.
    EveryRender,
}

/// How exported files are numbered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportNaming {
    /// Ordinal position in ascending tick order (000000, 000001, ...).
    #[default]
    Sequential,
    /// The tick number the frame was captured at.
    TickIndex,
}

/// Tick pacing and capture behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Rate used in idle and paused modes, in ticks per second.
    #[serde(default = "default_base_tick_rate")]
    pub base_tick_rate: u32,
    /// Starting rate for auto-play and loop modes.
    #[serde(default = "default_playback_rate")]
    pub playback_rate: u32,
    /// Floor for speed-down.
    #[serde(default = "default_min_playback_rate")]
    pub min_playback_rate: u32,
    /// Optional ceiling for speed-up.
    pub max_playback_rate: Option<u32>,
    pub capture_policy: CapturePolicy,
}

fn default_base_tick_rate() -> u32 {
    60
}

fn default_playback_rate() -> u32 {
    60
}

fn default_min_playback_rate() -> u32 {
    MIN_PLAYBACK_RATE
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_tick_rate: default_base_tick_rate(),
            playback_rate: default_playback_rate(),
            min_playback_rate: default_min_playback_rate(),
            max_playback_rate: None,
            capture_policy: CapturePolicy::default(),
        }
    }
}

impl PlaybackConfig {
    /// Check the rates are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero base rate, a floor below
    /// [`MIN_PLAYBACK_RATE`], a starting rate below the floor, or a ceiling
    /// below the starting rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_tick_rate == 0 {
            return Err(ConfigError::TickRate);
        }
        if self.min_playback_rate < MIN_PLAYBACK_RATE {
            return Err(ConfigError::RateFloor(self.min_playback_rate));
        }
        if self.playback_rate < self.min_playback_rate {
            return Err(ConfigError::PlaybackRate {
                rate: self.playback_rate,
                floor: self.min_playback_rate,
            });
        }
        if let Some(max) = self.max_playback_rate {
            if max < self.playback_rate {
                return Err(ConfigError::RateCeiling {
                    max,
                    rate: self.playback_rate,
                });
            }
        }
        Ok(())
    }

    /// Clamp a requested rate into `[min_playback_rate, max_playback_rate]`.
    /// Never returns less than [`MIN_PLAYBACK_RATE`].
    pub fn clamp_rate(&self, rate: u32) -> u32 {
        let rate = rate.max(self.min_playback_rate.max(MIN_PLAYBACK_RATE));
        match self.max_playback_rate {
            Some(max) => rate.min(max),
            None => rate,
        }
    }
}

/// Look of the cursor and its trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailStyle {
    /// Number of points kept in the trail. Must be even.
    pub capacity: usize,
    /// Cursor radius and base trail width, in canvas pixels.
    pub cursor_size: f32,
    /// Trail ramp color, also the cursor color when no button is down.
    pub trail_color: Color,
    /// Cursor color while a button is pressed.
    pub active_color: Color,
    pub background: Color,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            capacity: 50,
            cursor_size: 25.0,
            trail_color: Color::MAGENTA,
            active_color: Color::YELLOW,
            background: Color::BLACK,
        }
    }
}

impl TrailStyle {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an odd or zero capacity, or a cursor size
    /// that is not a positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity % 2 != 0 {
            return Err(ConfigError::TrailCapacity(self.capacity));
        }
        if !self.cursor_size.is_finite() || self.cursor_size <= 0.0 {
            return Err(ConfigError::CursorSize(self.cursor_size));
        }
        Ok(())
    }
}

/// Where and how captured frames are written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File prefix and subdirectory name. Falls back to the replay file stem.
    pub prefix: Option<String>,
    /// Directory the prefix subdirectory is created in.
    pub out_dir: PathBuf,
    pub naming: ExportNaming,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            out_dir: PathBuf::from("."),
            naming: ExportNaming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_defaults_validate() {
        let config = PlaybackConfig::default();
        assert_eq!(config.base_tick_rate, 60);
        assert_eq!(config.min_playback_rate, MIN_PLAYBACK_RATE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_playback_rate_below_floor() {
        let config = PlaybackConfig {
            playback_rate: 3,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PlaybackRate { rate: 3, floor: 5 })
        );
    }

    #[test]
    fn test_floor_cannot_go_below_minimum() {
        let config = PlaybackConfig {
            playback_rate: 6,
            min_playback_rate: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RateFloor(1)));
        assert_eq!(config.clamp_rate(1), MIN_PLAYBACK_RATE);

        let raised = PlaybackConfig {
            min_playback_rate: 10,
            ..Default::default()
        };
        assert!(raised.validate().is_ok());
        assert_eq!(raised.clamp_rate(7), 10);
    }

    #[test]
    fn test_ceiling_below_rate() {
        let config = PlaybackConfig {
            max_playback_rate: Some(30),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RateCeiling { max: 30, rate: 60 })
        );
    }

    #[test]
    fn test_clamp_rate() {
        let mut config = PlaybackConfig::default();
        assert_eq!(config.clamp_rate(1), 5);
        assert_eq!(config.clamp_rate(500), 500);
        config.max_playback_rate = Some(120);
        assert_eq!(config.clamp_rate(500), 120);
    }

    #[test]
    fn test_trail_capacity_must_be_even() {
        let mut style = TrailStyle::default();
        assert!(style.validate().is_ok());

        style.capacity = 7;
        assert_eq!(style.validate(), Err(ConfigError::TrailCapacity(7)));

        style.capacity = 0;
        assert_eq!(style.validate(), Err(ConfigError::TrailCapacity(0)));
    }

    #[test]
    fn test_cursor_size_positive() {
        let style = TrailStyle {
            cursor_size: 0.0,
            ..Default::default()
        };
        assert_eq!(style.validate(), Err(ConfigError::CursorSize(0.0)));
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let playback: PlaybackConfig =
            toml::from_str("capture_policy = \"every-render\"").unwrap();
        assert_eq!(playback.capture_policy, CapturePolicy::EveryRender);
        assert_eq!(playback.playback_rate, 60);

        let trail: TrailStyle = toml::from_str(
            "capacity = 10\ntrail_color = { r = 0.0, g = 1.0, b = 0.0 }",
        )
        .unwrap();
        assert_eq!(trail.capacity, 10);
        assert_eq!(trail.trail_color, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(trail.cursor_size, 25.0);

        let export: ExportConfig = toml::from_str("naming = \"tick-index\"").unwrap();
        assert_eq!(export.naming, ExportNaming::TickIndex);
        assert_eq!(export.out_dir, PathBuf::from("."));
    }
}
