//! Data-driven game balance
//!
//! Defaults mirror the shipped game; a JSON file can override any field.
//! A missing or malformed file falls back to defaults, never an error.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable round parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seconds of survival needed to win
    pub win_time_secs: i32,
    /// World scroll speed
    pub fall_speed: f32,
    /// Horizontal velocity per unit of smoothed tilt
    pub tilt_gain: f32,
    /// Playfield dimensions
    pub field_width: f32,
    pub field_height: f32,
    /// Seconds between obstacle spawns
    pub spawn_interval_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            win_time_secs: WIN_TIME_SECS,
            fall_speed: FALL_SPEED,
            tilt_gain: TILT_GAIN,
            field_width: PLAYFIELD_WIDTH,
            field_height: PLAYFIELD_HEIGHT,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
        }
    }
}

impl Tuning {
    /// Parse a tuning document; unknown fields are ignored, a malformed
    /// document yields defaults.
    pub fn from_json(payload: &str) -> Self {
        match serde_json::from_str(payload) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("tuning document rejected ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Load tuning from a file, defaulting if it is absent or malformed
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(payload) => Self::from_json(&payload),
            Err(_) => {
                log::info!("no tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tuning = Tuning::default();
        assert_eq!(tuning.win_time_secs, 30);
        assert_eq!(tuning.fall_speed, 200.0);
        assert_eq!(tuning.tilt_gain, 1000.0);
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{"win_time_secs": 10}"#);
        assert_eq!(tuning.win_time_secs, 10);
        assert_eq!(tuning.fall_speed, 200.0);
    }

    #[test]
    fn test_malformed_falls_back() {
        assert_eq!(Tuning::from_json("{nope"), Tuning::default());
    }
}
