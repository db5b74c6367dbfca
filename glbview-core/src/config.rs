/// Viewer configuration with defaults matching the stock viewer
use serde::Deserialize;

use crate::accessor::UnknownComponentPolicy;
use crate::error::ConfigError;

/// Orbit camera limits
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Largest allowed `|eye - center|`
    pub max_elevation: f32,
    /// Smallest allowed `|eye - center|`
    pub min_elevation: f32,
    /// Elevation changes toward the pole stop once the eye is within this
    /// angle (radians) of the up axis
    pub max_camera_angle: f32,
    /// Orbiting never takes the eye below this height
    pub min_eye_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            max_elevation: 100.0,
            min_elevation: 4.0,
            max_camera_angle: 0.5,
            min_eye_height: 2.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all_finite = [
            self.max_elevation,
            self.min_elevation,
            self.max_camera_angle,
            self.min_eye_height,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::Invalid("camera limits must be finite".to_string()));
        }
        if self.min_elevation <= 0.0 || self.min_elevation > self.max_elevation {
            return Err(ConfigError::Invalid(format!(
                "expected 0 < min_elevation <= max_elevation, got {} and {}",
                self.min_elevation, self.max_elevation
            )));
        }
        if !(0.0..std::f32::consts::PI).contains(&self.max_camera_angle) {
            return Err(ConfigError::Invalid(format!(
                "max_camera_angle {} must be within [0, PI)",
                self.max_camera_angle
            )));
        }
        Ok(())
    }
}

/// Geometry extraction settings, passed explicitly to every load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Assets with fewer buffer views are rejected as incomplete
    pub min_buffer_views: usize,
    pub unknown_component: UnknownComponentPolicy,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_buffer_views: 5,
            unknown_component: UnknownComponentPolicy::FallbackToU8,
        }
    }
}

/// Perspective projection parameters; the aspect ratio comes from the host
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            z_near: 0.5,
            z_far: 1000.0,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_y_degrees {} must be within (0, 180)",
                self.fov_y_degrees
            )));
        }
        if !(self.z_near > 0.0 && self.z_near < self.z_far && self.z_far.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "expected 0 < z_near < z_far, got {} and {}",
                self.z_near, self.z_far
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub extractor: ExtractorConfig,
    pub projection: ProjectionConfig,
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.projection.validate()
    }
}
