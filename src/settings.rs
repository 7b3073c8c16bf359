//! Physics settings
//!
//! Tunables for the collision core, stored as JSON next to the game.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{PhysicsError, PhysicsResult};

/// Physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Kinetic energy kept on a bounce (1.0 = lossless)
    pub elasticity: f64,
    /// Simulation ticks per second
    pub fps: u32,
    /// Sample points when a circle is flattened into a polygon
    pub polygon_accuracy: usize,

    // === Ball ===
    pub ball_radius: f64,
    /// Launch speed (units per second)
    pub ball_speed: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            elasticity: consts::ELASTICITY,
            fps: consts::FPS,
            polygon_accuracy: consts::POLYGON_ACCURACY,

            ball_radius: consts::BALL_RADIUS,
            ball_speed: consts::BALL_SPEED,
        }
    }
}

impl PhysicsSettings {
    /// Seconds per tick
    pub fn dt(&self) -> f64 {
        1.0 / self.fps as f64
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.elasticity.is_finite() || self.elasticity < 0.0 {
            return Err(PhysicsError::InvalidSettings(format!(
                "elasticity must be finite and non-negative, got {}",
                self.elasticity
            )));
        }
        if self.fps == 0 {
            return Err(PhysicsError::InvalidSettings("fps must be positive".into()));
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(PhysicsError::InvalidSettings(format!(
                "ball_radius must be positive, got {}",
                self.ball_radius
            )));
        }
        if !self.ball_speed.is_finite() {
            return Err(PhysicsError::InvalidSettings("ball_speed must be finite".into()));
        }
        Ok(())
    }

    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> PhysicsResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> PhysicsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(PhysicsError::from)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded physics settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default physics settings ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> PhysicsResult<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Physics settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PhysicsSettings::default();
        assert_eq!(settings.elasticity, 1.0);
        assert_eq!(settings.fps, 120);
        assert!((settings.dt() - 1.0 / 120.0).abs() < 1e-12);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = PhysicsSettings::from_json(r#"{ "elasticity": 0.8 }"#).unwrap();
        assert_eq!(settings.elasticity, 0.8);
        assert_eq!(settings.fps, consts::FPS);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = PhysicsSettings {
            fps: 60,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(PhysicsSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            PhysicsSettings::from_json(r#"{ "elasticity": -1.0 }"#),
            Err(PhysicsError::InvalidSettings(_))
        ));
        assert!(PhysicsSettings::from_json(r#"{ "fps": 0 }"#).is_err());
        assert!(matches!(
            PhysicsSettings::from_json("not json"),
            Err(PhysicsError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = PhysicsSettings::load("/nonexistent/brick-physics/settings.json");
        assert_eq!(settings, PhysicsSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "brick-physics-settings-{}.json",
            std::process::id()
        ));
        let settings = PhysicsSettings {
            elasticity: 0.9,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(PhysicsSettings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
