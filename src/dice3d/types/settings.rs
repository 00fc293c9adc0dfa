//! Roller settings types and persistence
//!
//! Detection thresholds, the roll timeout, spawn tuning and history capacity.
//! Settings are stored as JSON; any missing field falls back to its default.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DiceType, RollError, RollResult};

/// Default number of finished rolls kept in memory.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

// ============================================================================
// Settle detection
// ============================================================================

/// Thresholds driving each die's settle detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Linear speed above which a die counts as moving.
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f32,

    /// Angular speed above which a die counts as moving.
    #[serde(default = "default_angular_threshold")]
    pub angular_threshold: f32,

    /// Seconds a die must stay still before it may resolve.
    #[serde(default = "default_required_stable_time")]
    pub required_stable_time: f32,

    /// Minimum alignment between the best face and straight up.
    #[serde(default = "default_stability_dot_threshold")]
    pub stability_dot_threshold: f32,

    /// How far below `stability_dot_threshold` the secondary tier still accepts.
    #[serde(default = "default_secondary_margin")]
    pub secondary_margin: f32,

    /// Seconds after the first collision before stability checks begin.
    #[serde(default = "default_detection_delay")]
    pub detection_delay: f32,

    /// Seconds between a force-stop and the forced resolution.
    #[serde(default = "default_force_grace")]
    pub force_grace: f32,

    /// Height above the die centre the downward face ray starts from.
    #[serde(default = "default_ray_height")]
    pub ray_height: f32,

    /// Maximum length of the downward face ray.
    #[serde(default = "default_ray_length")]
    pub ray_length: f32,
}

fn default_velocity_threshold() -> f32 {
    0.05
}
fn default_angular_threshold() -> f32 {
    0.05
}
fn default_required_stable_time() -> f32 {
    0.3
}
fn default_stability_dot_threshold() -> f32 {
    0.98
}
fn default_secondary_margin() -> f32 {
    0.1
}
fn default_detection_delay() -> f32 {
    0.5
}
fn default_force_grace() -> f32 {
    0.1
}
fn default_ray_height() -> f32 {
    2.0
}
fn default_ray_length() -> f32 {
    3.0
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            velocity_threshold: default_velocity_threshold(),
            angular_threshold: default_angular_threshold(),
            required_stable_time: default_required_stable_time(),
            stability_dot_threshold: default_stability_dot_threshold(),
            secondary_margin: default_secondary_margin(),
            detection_delay: default_detection_delay(),
            force_grace: default_force_grace(),
            ray_height: default_ray_height(),
            ray_length: default_ray_length(),
        }
    }
}

impl DetectionSettings {
    /// The looser alignment band used once the primary tier has failed.
    pub fn secondary_threshold(&self) -> f32 {
        self.stability_dot_threshold - self.secondary_margin
    }
}

// ============================================================================
// Spawn placement
// ============================================================================

/// Where dice appear and how hard they are thrown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSettings {
    /// Centre of the spawn grid in world space.
    #[serde(default = "default_spawn_anchor")]
    pub anchor: [f32; 3],

    /// Distance between neighbouring grid cells.
    #[serde(default = "default_spawn_spacing")]
    pub spacing: f32,

    /// Magnitude of the launch impulse.
    #[serde(default = "default_throw_impulse")]
    pub throw_impulse: f32,

    /// Magnitude bound of the random torque impulse.
    #[serde(default = "default_torque_impulse")]
    pub torque_impulse: f32,

    /// Horizontal randomisation of the launch direction, relative to its upward part.
    #[serde(default = "default_horizontal_jitter")]
    pub horizontal_jitter: f32,
}

fn default_spawn_anchor() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_spawn_spacing() -> f32 {
    0.8
}
fn default_throw_impulse() -> f32 {
    0.6
}
fn default_torque_impulse() -> f32 {
    0.08
}
fn default_horizontal_jitter() -> f32 {
    0.3
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            anchor: default_spawn_anchor(),
            spacing: default_spawn_spacing(),
            throw_impulse: default_throw_impulse(),
            torque_impulse: default_torque_impulse(),
            horizontal_jitter: default_horizontal_jitter(),
        }
    }
}

impl SpawnSettings {
    pub fn anchor(&self) -> Vec3 {
        Vec3::from_array(self.anchor)
    }
}

// ============================================================================
// Roller settings
// ============================================================================

/// Top-level settings for the dice roller.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollerSettings {
    #[serde(default)]
    pub detection: DetectionSettings,

    #[serde(default)]
    pub spawn: SpawnSettings,

    /// Simulation seconds to wait before forcing unsettled dice.
    #[serde(default = "default_roll_timeout_secs")]
    pub roll_timeout_secs: f32,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default)]
    pub default_die: DiceType,

    #[serde(default = "default_die_count")]
    pub default_count: i32,
}

fn default_roll_timeout_secs() -> f32 {
    10.0
}
fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}
fn default_die_count() -> i32 {
    1
}

impl Default for RollerSettings {
    fn default() -> Self {
        Self {
            detection: DetectionSettings::default(),
            spawn: SpawnSettings::default(),
            roll_timeout_secs: default_roll_timeout_secs(),
            history_capacity: default_history_capacity(),
            default_die: DiceType::default(),
            default_count: default_die_count(),
        }
    }
}

impl RollerSettings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RollResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RollError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| RollError::SettingsFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from a JSON file, or use defaults when it is absent.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> RollResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Save settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> RollResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            RollError::SettingsFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(|source| RollError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detection_thresholds() {
        let detection = DetectionSettings::default();
        assert_eq!(detection.velocity_threshold, 0.05);
        assert_eq!(detection.angular_threshold, 0.05);
        assert_eq!(detection.required_stable_time, 0.3);
        assert_eq!(detection.stability_dot_threshold, 0.98);
        assert!((detection.secondary_threshold() - 0.88).abs() < 1e-6);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings = RollerSettings::from_json("{}").unwrap();
        assert_eq!(settings, RollerSettings::default());
        assert_eq!(settings.roll_timeout_secs, 10.0);
        assert_eq!(settings.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings = RollerSettings::from_json(
            r#"{ "roll_timeout_secs": 4.0, "detection": { "stability_dot_threshold": 0.95 }, "default_die": "d20" }"#,
        )
        .unwrap();

        assert_eq!(settings.roll_timeout_secs, 4.0);
        assert_eq!(settings.detection.stability_dot_threshold, 0.95);
        assert_eq!(settings.detection.required_stable_time, 0.3);
        assert_eq!(settings.default_die, DiceType::D20);
        assert_eq!(settings.spawn, SpawnSettings::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(RollerSettings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("dicerollgen-settings-that-does-not-exist.json");
        let settings = RollerSettings::load_or_default(&path).unwrap();
        assert_eq!(settings, RollerSettings::default());
        assert!(matches!(
            RollerSettings::load(&path),
            Err(RollError::SettingsIo { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "dicerollgen-settings-{}.json",
            std::process::id()
        ));
        let mut settings = RollerSettings::default();
        settings.default_count = 4;
        settings.spawn.spacing = 1.2;

        settings.save(&path).unwrap();
        let loaded = RollerSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }
}
