use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use song_schema::InputMode;

use crate::error::ConfigError;
use crate::gameplay::judge::ScoringRules;
use crate::gameplay::scheduler::SchedulerConfig;

/// Whether the player's input is judged or every note plays itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    Player,
    AutoPlay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Track units per second.
    pub scroll_speed: f64,
    pub target_position: f64,
    /// Half-width of the judgment window, in seconds.
    pub hit_window: f64,
    /// Seconds past the target before an unhit note counts as missed.
    pub miss_tolerance: f64,
    pub preview_seconds: f64,
    /// Track units before the target at which an auto-played note sounds.
    pub autoplay_epsilon: f64,
    /// Trailing seconds after the last note before the session ends.
    pub end_grace: f64,
    pub visible_top: f64,
    pub visible_bottom: f64,
    pub base_points: u32,
    pub combo_cap: u32,
    pub play_mode: PlayMode,
    pub input_mode: InputMode,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            scroll_speed: 150.0,
            target_position: 340.0,
            hit_window: 0.15,
            miss_tolerance: 0.15,
            preview_seconds: 1.5,
            autoplay_epsilon: 5.0,
            end_grace: 3.0,
            visible_top: -50.0,
            visible_bottom: 450.0,
            base_points: 100,
            combo_cap: 10,
            play_mode: PlayMode::Player,
            input_mode: InputMode::Keys,
        }
    }
}

impl TrainerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("scroll_speed", self.scroll_speed)?;
        positive("hit_window", self.hit_window)?;
        non_negative("preview_seconds", self.preview_seconds)?;
        non_negative("autoplay_epsilon", self.autoplay_epsilon)?;
        non_negative("end_grace", self.end_grace)?;

        // A note must never be missed while still inside its judgment window.
        if !(self.miss_tolerance >= self.hit_window) {
            return Err(ConfigError::Invalid {
                field: "miss_tolerance",
                reason: format!(
                    "must be >= hit_window ({}), got {}",
                    self.hit_window, self.miss_tolerance
                ),
            });
        }
        if !(self.visible_top < self.visible_bottom) {
            return Err(ConfigError::Invalid {
                field: "visible_top",
                reason: format!("must be < visible_bottom ({})", self.visible_bottom),
            });
        }
        if self.combo_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "combo_cap",
                reason: "must be >= 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            target_position: self.target_position,
            scroll_speed: self.scroll_speed,
            hit_window: self.hit_window,
            miss_tolerance: self.miss_tolerance,
            preview_seconds: self.preview_seconds,
            autoplay_epsilon: self.autoplay_epsilon,
            visible_top: self.visible_top,
            visible_bottom: self.visible_bottom,
        }
    }

    pub fn scoring(&self) -> ScoringRules {
        ScoringRules {
            base_points: self.base_points,
            combo_cap: self.combo_cap,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be > 0, got {value}"),
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be >= 0, got {value}"),
        });
    }
    Ok(())
}
