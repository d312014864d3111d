//! Gameplay configuration
//!
//! Every tunable constant lives here. A config is validated once, before the
//! first tick; the simulation never recomputes or re-checks it afterwards.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Scrolling ===
    /// Scroll speed at the start of a run
    pub initial_scroll_speed: f32,
    /// Added to the scroll speed on every running tick
    pub scroll_speed_ramp: f32,
    /// Lateral distance per tick while a direction is held
    pub lateral_step: f32,

    // === Collision ===
    pub collision_threshold: f32,

    // === Entities ===
    pub obstacle_scale_min: f32,
    pub obstacle_scale_max: f32,
    pub pickup_value_min: u32,
    pub pickup_value_max: u32,
    /// Pickup scale when its value equals `pickup_value_max`
    pub pickup_size_factor: f32,

    // === Placement window ===
    pub lateral_spread: f32,
    pub far_bound: f32,
    pub depth_spread: f32,

    // === Health ===
    pub max_health: u32,
    pub obstacle_damage: u32,
    pub health_pickup_heal: u32,

    // === Pool ===
    pub obstacle_count: usize,
    pub bonus_count: usize,
    pub health_pickup_count: usize,

    // === Flow ===
    /// Seconds between game over and the automatic reset
    pub reset_delay: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_scroll_speed: INITIAL_SCROLL_SPEED,
            scroll_speed_ramp: SCROLL_SPEED_RAMP,
            lateral_step: LATERAL_STEP,

            collision_threshold: COLLISION_THRESHOLD,

            obstacle_scale_min: OBSTACLE_SCALE_MIN,
            obstacle_scale_max: OBSTACLE_SCALE_MAX,
            pickup_value_min: PICKUP_VALUE_MIN,
            pickup_value_max: PICKUP_VALUE_MAX,
            pickup_size_factor: PICKUP_SIZE_FACTOR,

            lateral_spread: LATERAL_SPREAD,
            far_bound: FAR_BOUND,
            depth_spread: DEPTH_SPREAD,

            max_health: MAX_HEALTH,
            obstacle_damage: OBSTACLE_DAMAGE,
            health_pickup_heal: HEALTH_PICKUP_HEAL,

            obstacle_count: OBSTACLE_COUNT,
            bonus_count: BONUS_COUNT,
            health_pickup_count: HEALTH_PICKUP_COUNT,

            reset_delay: RESET_DELAY,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range constants
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_scroll_speed", self.initial_scroll_speed)?;
        non_negative("scroll_speed_ramp", self.scroll_speed_ramp)?;
        positive("lateral_step", self.lateral_step)?;
        non_negative("collision_threshold", self.collision_threshold)?;

        positive("obstacle_scale_min", self.obstacle_scale_min)?;
        range(
            "obstacle scale",
            self.obstacle_scale_min,
            self.obstacle_scale_max,
        )?;

        if self.pickup_value_min == 0 {
            return Err(ConfigError::Zero {
                name: "pickup_value_min",
            });
        }
        range(
            "pickup value",
            self.pickup_value_min as f32,
            self.pickup_value_max as f32,
        )?;
        positive("pickup_size_factor", self.pickup_size_factor)?;

        non_negative("lateral_spread", self.lateral_spread)?;
        non_negative("far_bound", self.far_bound)?;
        non_negative("depth_spread", self.depth_spread)?;

        if self.max_health == 0 {
            return Err(ConfigError::Zero { name: "max_health" });
        }
        if self.obstacle_damage == 0 {
            return Err(ConfigError::Zero {
                name: "obstacle_damage",
            });
        }
        if self.health_pickup_heal == 0 {
            return Err(ConfigError::Zero {
                name: "health_pickup_heal",
            });
        }

        if self.total_entities() == 0 {
            return Err(ConfigError::EmptyPool);
        }

        non_negative("reset_delay", self.reset_delay)?;
        Ok(())
    }

    /// Pool size across all categories
    pub fn total_entities(&self) -> usize {
        self.obstacle_count + self.bonus_count + self.health_pickup_count
    }

    /// Config key in LocalStorage
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "grid_runner_config";

    /// Load overrides from LocalStorage (WASM only)
    ///
    /// Missing or unparsable overrides fall back to the defaults; an override
    /// that parses but fails validation is returned as an error.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, ConfigError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(config) => {
                        config.validate()?;
                        log::info!("Loaded config overrides from LocalStorage");
                        return Ok(config);
                    }
                    Err(e) => log::warn!("Ignoring unparsable config override: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Ok(Self::default())
    }

    /// Load overrides from the file named by `GRID_RUNNER_CONFIG` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("GRID_RUNNER_CONFIG") {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(json) => {
                    log::info!("Loading config overrides from {}", path);
                    Self::from_json(&json)
                }
                Err(e) => {
                    log::warn!("Cannot read {}: {}, using defaults", path, e);
                    Ok(Self::default())
                }
            },
            Err(_) => Ok(Self::default()),
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::BadRange { name, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_scale_range_rejected() {
        let config = GameConfig {
            obstacle_scale_min: 3.0,
            obstacle_scale_max: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadRange { .. })
        ));
    }

    #[test]
    fn test_negative_scale_rejected() {
        let config = GameConfig {
            obstacle_scale_min: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "obstacle_scale_min",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let config = GameConfig {
            obstacle_count: 0,
            bonus_count: 0,
            health_pickup_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPool)));
    }

    #[test]
    fn test_partial_json_override() {
        let config = GameConfig::from_json(r#"{ "max_health": 100, "obstacle_count": 4 }"#)
            .expect("valid override");
        assert_eq!(config.max_health, 100);
        assert_eq!(config.obstacle_count, 4);
        assert_eq!(config.bonus_count, BONUS_COUNT);
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "pickup_value_min": 30, "pickup_value_max": 20 }"#),
            Err(ConfigError::BadRange { .. })
        ));
    }
}
