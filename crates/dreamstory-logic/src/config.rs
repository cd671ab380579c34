//! Engine configuration.
//!
//! Every field has a default matching the shipped game, so a JSON file only
//! needs the fields it overrides. Load with [`EngineConfig::from_json`],
//! which validates before returning.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::{ATTRIBUTE_MAX, ATTRIBUTE_START};
use crate::clock::{default_start_time, DEFAULT_TICK_MINUTES, MAX_TICK_MINUTES};
use crate::rooms::RoomId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Simulated time at session start.
    pub start_time: NaiveDateTime,
    /// Simulated minutes per tick.
    pub tick_minutes: u32,
    /// Starting value of every attribute.
    pub initial_attribute: u8,
    /// Chance that a Relax request becomes an outside event.
    pub relax_redirect_chance: f64,
    /// Chance that an outside event goes well.
    pub outside_favorable_chance: f64,
    /// Reject actions not offered by the current room.
    pub enforce_location: bool,
    pub start_room: RoomId,
    /// Where Alex ends up after an outside event.
    pub return_room: RoomId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            tick_minutes: DEFAULT_TICK_MINUTES,
            initial_attribute: ATTRIBUTE_START,
            relax_redirect_chance: 0.5,
            outside_favorable_chance: 0.5,
            enforce_location: false,
            start_room: RoomId::Bedroom,
            return_room: RoomId::Living,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[error("tick_minutes must be in 1..={max}, got {value}")]
    TickMinutes { value: u32, max: u32 },
    #[error("initial_attribute must be at most {max}, got {value}")]
    InitialAttribute { value: u8, max: u8 },
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("relax_redirect_chance", self.relax_redirect_chance)?;
        check_probability("outside_favorable_chance", self.outside_favorable_chance)?;
        if self.tick_minutes == 0 || self.tick_minutes > MAX_TICK_MINUTES {
            return Err(ConfigError::TickMinutes {
                value: self.tick_minutes,
                max: MAX_TICK_MINUTES,
            });
        }
        if self.initial_attribute > ATTRIBUTE_MAX {
            return Err(ConfigError::InitialAttribute {
                value: self.initial_attribute,
                max: ATTRIBUTE_MAX,
            });
        }
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = EngineConfig::from_json(
            r#"{ "tickMinutes": 30, "enforceLocation": true, "startRoom": "kitchen",
                 "startTime": "2024-03-10T22:00:00" }"#,
        )
        .unwrap();
        assert_eq!(config.tick_minutes, 30);
        assert!(config.enforce_location);
        assert_eq!(config.start_room, RoomId::Kitchen);
        assert_eq!(config.start_time.format("%H:%M").to_string(), "22:00");
        assert_eq!(config.return_room, RoomId::Living);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = EngineConfig::from_json(r#"{ "relaxRedirectChance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Probability {
                field: "relax_redirect_chance",
                ..
            }
        ));
        let config = EngineConfig {
            outside_favorable_chance: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_tick() {
        let err = EngineConfig::from_json(r#"{ "tickMinutes": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TickMinutes { value: 0, .. }));
        let err = EngineConfig::from_json(r#"{ "tickMinutes": 1441 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TickMinutes { value: 1441, .. }));
    }

    #[test]
    fn test_rejects_bad_initial_attribute() {
        let err = EngineConfig::from_json(r#"{ "initialAttribute": 101 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InitialAttribute { value: 101, .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EngineConfig::from_json("{ tickMinutes: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = EngineConfig::from_json(r#"{ "startRoom": "attic" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::TickMinutes { value: 0, max: 1440 };
        assert_eq!(err.to_string(), "tick_minutes must be in 1..=1440, got 0");
    }
}
