//! Scene tunables.
//!
//! Every field has a default matching the stock farm scene, so a config file
//! only needs the values it changes:
//!
//! ```
//! use pasture_engine::config::SceneConfig;
//!
//! let config = SceneConfig::from_json_str(r#"{ "move_speed": 8.0, "animals": ["cow", "pig"] }"#).unwrap();
//! assert_eq!(config.move_speed, 8.0);
//! assert_eq!(config.turn_speed, 4.0);
//! assert_eq!(config.animals, vec!["cow", "pig"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Default translation speed in units per second.
pub const DEFAULT_MOVE_SPEED: f32 = 16.0;

// ---------------------------------------------------------------------------
// CameraConfig
// ---------------------------------------------------------------------------

/// Perspective camera mounted on the camera rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width / height of the output surface.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position relative to the rig. The camera looks at the rig
    /// origin.
    pub offset: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 2.0,
            near: 0.1,
            far: 400.0,
            offset: [30.0, 40.0, 30.0],
        }
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Tunables for the pasture scene and its frame driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Player translation speed, units per second.
    pub move_speed: f32,
    /// Player yaw speed, radians per second.
    pub turn_speed: f32,
    /// Playback-rate multiplier for animal animations.
    pub animal_time_scale: f32,
    /// Upper bound on a single frame's delta time, in seconds.
    pub max_delta_time: f32,
    /// Seconds the player may spend outside the view frustum before being
    /// returned to the origin.
    pub max_time_offscreen: f32,
    pub camera: CameraConfig,
    /// Library name of the player's model.
    pub player_model: String,
    /// Library names of the animals to place, in order along +X.
    pub animals: Vec<String>,
    /// Distance between consecutive animals along +X.
    pub animal_spacing: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            turn_speed: DEFAULT_MOVE_SPEED / 4.0,
            animal_time_scale: DEFAULT_MOVE_SPEED / 4.0,
            max_delta_time: 1.0 / 20.0,
            max_time_offscreen: 3.0,
            camera: CameraConfig::default(),
            player_model: "knight".to_owned(),
            animals: vec!["pig".to_owned()],
            animal_spacing: 5.0,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), EngineError> {
        positive("move_speed", self.move_speed)?;
        positive("turn_speed", self.turn_speed)?;
        positive("animal_time_scale", self.animal_time_scale)?;
        positive("max_delta_time", self.max_delta_time)?;
        positive("max_time_offscreen", self.max_time_offscreen)?;
        positive("camera.aspect", self.camera.aspect)?;
        positive("camera.near", self.camera.near)?;
        positive("camera.far", self.camera.far)?;

        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(EngineError::InvalidConfig {
                field: "camera.fov_degrees",
                details: format!("must be in (0, 180), got {}", self.camera.fov_degrees),
            });
        }
        if self.camera.near >= self.camera.far {
            return Err(EngineError::InvalidConfig {
                field: "camera.near",
                details: format!(
                    "near plane {} must be closer than far plane {}",
                    self.camera.near, self.camera.far
                ),
            });
        }
        if self.camera.offset.iter().any(|c| !c.is_finite()) {
            return Err(EngineError::InvalidConfig {
                field: "camera.offset",
                details: format!("must be finite, got {:?}", self.camera.offset),
            });
        }
        if self.camera.offset == [0.0; 3] {
            return Err(EngineError::InvalidConfig {
                field: "camera.offset",
                details: "camera cannot sit on the point it looks at".to_owned(),
            });
        }
        if !self.animal_spacing.is_finite() {
            return Err(EngineError::InvalidConfig {
                field: "animal_spacing",
                details: format!("must be finite, got {}", self.animal_spacing),
            });
        }
        if self.player_model.is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "player_model",
                details: "must name a model".to_owned(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), EngineError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig {
            field,
            details: format!("must be positive and finite, got {value}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.move_speed, 16.0);
        assert_eq!(config.turn_speed, 4.0);
        assert_eq!(config.animal_time_scale, 4.0);
        assert!((config.max_delta_time - 0.05).abs() < f32::EPSILON);
        assert_eq!(config.max_time_offscreen, 3.0);
        assert_eq!(config.camera.offset, [30.0, 40.0, 30.0]);
        assert_eq!(config.player_model, "knight");
        assert_eq!(config.animals, vec!["pig"]);
        config.validate().unwrap();
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SceneConfig::from_json_str("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn nested_camera_fields_merge_with_defaults() {
        let config = SceneConfig::from_json_str(r#"{ "camera": { "far": 1000.0 } }"#).unwrap();
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.camera.fov_degrees, 45.0);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let err = SceneConfig::from_json_str(r#"{ "move_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfig {
                field: "move_speed",
                ..
            }
        ));
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let err =
            SceneConfig::from_json_str(r#"{ "camera": { "near": 10.0, "far": 5.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfig {
                field: "camera.near",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SceneConfig::from_json_str("{ move_speed: }").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
        assert!(err.to_string().starts_with("failed to parse scene configuration"));
    }

    #[test]
    fn serializes_round_trip() {
        let mut config = SceneConfig::default();
        config.animals = vec!["horse".into(), "zebra".into()];
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SceneConfig::from_json_str(&json).unwrap(), config);
    }
}
