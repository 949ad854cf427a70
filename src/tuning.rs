//! Game balance configuration
//!
//! Every knob here has a default matching the shipped game. A JSON file may
//! override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    /// File could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid tuning JSON
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed RNG seed; `None` lets the host pick one
    pub seed: Option<u64>,

    // === Player ===
    /// Starting and maximum player health
    pub starting_health: i32,
    /// Health lost per tick spent outside the screen bounds
    pub bound_penalty: i32,

    // === Economy ===
    /// Coins spent to open an upgrade chest
    pub potion_cost: u32,

    // === Combat ===
    /// Damage dealt by an explosive's splash
    pub splash_damage: i32,

    // === Boss ===
    /// Boss starting health
    pub boss_health: i32,
    /// Health lost between Missile -> Swarm transitions
    pub boss_breakpoint_step: i32,
    /// Projectile damage is divided by this before reaching the boss
    pub boss_damage_divisor: i32,

    // === Levels ===
    /// Platform budget of the tutorial level
    pub tutorial_platforms: u32,
    /// Extra platforms per level number
    pub platforms_per_level: u32,
    /// Hard cap on any level's platform budget
    pub max_platforms: u32,

    // === Camera ===
    /// Scroll speed once the player pushes forward (px/tick)
    pub scroll_fast: f32,
    /// Idle scroll speed (px/tick)
    pub scroll_slow: f32,
    /// Player x at which scrolling speeds up
    pub scroll_push_x: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: None,

            starting_health: 100,
            bound_penalty: 10,

            potion_cost: 10,

            splash_damage: 160,

            boss_health: 750,
            boss_breakpoint_step: 250,
            boss_damage_divisor: 3,

            tutorial_platforms: 8,
            platforms_per_level: 5,
            max_platforms: 100,

            scroll_fast: 1.0,
            scroll_slow: 0.5,
            scroll_push_x: 200.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.starting_health <= 0 {
            return Err(TuningError::Invalid {
                field: "starting_health",
                reason: "must be positive",
            });
        }
        if self.boss_health <= 0 {
            return Err(TuningError::Invalid {
                field: "boss_health",
                reason: "must be positive",
            });
        }
        if self.boss_breakpoint_step <= 0 {
            return Err(TuningError::Invalid {
                field: "boss_breakpoint_step",
                reason: "must be positive",
            });
        }
        if self.boss_damage_divisor <= 0 {
            return Err(TuningError::Invalid {
                field: "boss_damage_divisor",
                reason: "must be positive",
            });
        }
        if self.tutorial_platforms == 0 || self.max_platforms == 0 {
            return Err(TuningError::Invalid {
                field: "max_platforms",
                reason: "platform budgets must be at least 1",
            });
        }
        if self.scroll_slow < 0.0 || self.scroll_fast < self.scroll_slow {
            return Err(TuningError::Invalid {
                field: "scroll_fast",
                reason: "scroll rates must satisfy 0 <= slow <= fast",
            });
        }
        Ok(())
    }

    /// Platform budget for a level number
    pub fn level_budget(&self, level: u32) -> u32 {
        if level == 0 {
            self.tutorial_platforms
        } else {
            (level * self.platforms_per_level + self.platforms_per_level).min(self.max_platforms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "potion_cost": 5, "seed": 42 }"#).unwrap();
        assert_eq!(tuning.potion_cost, 5);
        assert_eq!(tuning.seed, Some(42));
        assert_eq!(tuning.boss_health, 750);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "boss_damage_divisor": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "boss_damage_divisor",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/nonexistent/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_level_budget() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_budget(0), 8);
        assert_eq!(tuning.level_budget(1), 10);
        assert_eq!(tuning.level_budget(4), 25);
        assert_eq!(tuning.level_budget(30), 100);
    }
}
