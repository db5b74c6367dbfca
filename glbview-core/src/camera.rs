/// Orbit camera driven by pan, orbit and zoom input deltas
use nalgebra::Vector2;

use crate::config::CameraConfig;
use crate::error::{ConfigError, MathError};
use crate::transform::Matrix4;
use crate::vector::Vector3;

/// Result of a camera operation.
///
/// Constraint violations are not errors: the state is left untouched and
/// the operation reports `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraOutcome {
    Applied,
    /// Applied, but the requested value was limited to a bound
    Clamped,
    Rejected,
}

impl CameraOutcome {
    pub fn is_rejected(self) -> bool {
        self == CameraOutcome::Rejected
    }
}

/// Camera looking at `center` from `eye`, with `up` as the reference
/// orientation
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    eye: Vector3,
    center: Vector3,
    up: Vector3,
    config: CameraConfig,
}

impl OrbitCamera {
    /// Camera at the given eye position looking at the origin, +Y up,
    /// with the default limits
    pub fn new(eye_x: f32, eye_y: f32, eye_z: f32) -> Self {
        Self {
            eye: Vector3::new(eye_x, eye_y, eye_z),
            center: Vector3::zeros(),
            up: Vector3::unit_y(),
            config: CameraConfig::default(),
        }
    }

    pub fn with_config(eye: Vector3, config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            eye,
            center: Vector3::zeros(),
            up: Vector3::unit_y(),
            config,
        })
    }

    pub fn eye(&self) -> &Vector3 {
        &self.eye
    }

    pub fn center(&self) -> &Vector3 {
        &self.center
    }

    pub fn up(&self) -> &Vector3 {
        &self.up
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn set_center(&mut self, center: Vector3) {
        self.center = center;
    }

    pub fn set_up(&mut self, up: Vector3) {
        self.up = up;
    }

    /// Move the eye without applying any constraint
    pub fn reset(&mut self, eye: Vector3) {
        self.eye = eye;
    }

    /// Offset from the target to the eye
    pub fn to_eye(&self) -> Vector3 {
        *self.eye.copy().subtract(&self.center)
    }

    /// Current `|eye - center|`
    pub fn distance(&self) -> f32 {
        self.to_eye().magnitude()
    }

    pub fn view_matrix(&self) -> Result<Matrix4, MathError> {
        Matrix4::look_at(&self.eye, &self.center, &self.up)
    }

    /// Signed angle from +Z to the horizontal part of the view offset,
    /// positive toward +X. Zero when the eye is straight above or below the
    /// target.
    fn azimuth(&self) -> f32 {
        let to_eye = self.to_eye();
        to_eye.x().atan2(to_eye.z())
    }

    /// Translate eye and center together in the horizontal plane. The
    /// delta is first rotated into the camera's azimuthal frame so panning
    /// follows the current view.
    pub fn pan(&mut self, delta: Vector2<f32>) -> CameraOutcome {
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            return CameraOutcome::Rejected;
        }

        let (sin, cos) = self.azimuth().sin_cos();
        let rotated = Vector2::new(delta.x * cos + delta.y * sin, -delta.x * sin + delta.y * cos);

        let shift = Vector3::new(-rotated.x, 0.0, -rotated.y);
        self.eye.add(&shift);
        self.center.add(&shift);
        CameraOutcome::Applied
    }

    /// Rotate the eye around the center. `delta.x` is azimuth about the up
    /// axis, `delta.y` is elevation; positive elevation moves toward the
    /// pole.
    pub fn orbit(&mut self, delta: Vector2<f32>) -> CameraOutcome {
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            return CameraOutcome::Rejected;
        }

        let mut to_eye = self.to_eye();
        let rotation = match self.orbit_rotation(&to_eye, delta) {
            Ok(rotation) => rotation,
            Err(err) => {
                log::trace!("orbit rejected: {}", err);
                return CameraOutcome::Rejected;
            }
        };
        to_eye.transform(&rotation);

        if self.center.y() + to_eye.y() < self.config.min_eye_height {
            log::trace!("orbit rejected: eye would drop below {}", self.config.min_eye_height);
            return CameraOutcome::Rejected;
        }
        self.eye = *self.center.copy().add(&to_eye);
        CameraOutcome::Applied
    }

    /// Azimuth about Y, followed by elevation about the horizontal axis
    /// perpendicular to the view. Elevation is skipped while the eye is
    /// within `max_camera_angle` of the pole, unless it moves away from it.
    fn orbit_rotation(&self, to_eye: &Vector3, delta: Vector2<f32>) -> Result<Matrix4, MathError> {
        let mut rotation = Matrix4::new();
        rotation.rotate(-delta.x, 0.0, 1.0, 0.0)?;

        let pole_angle = to_eye.angle_between(&self.up)?;
        if pole_angle > self.config.max_camera_angle || delta.y < 0.0 {
            let axis = Vector3::new(to_eye.z(), 0.0, -to_eye.x());
            if axis.magnitude() > f32::EPSILON {
                rotation.rotate(-delta.y, axis.x(), 0.0, axis.z())?;
            } else {
                rotation.rotate(-delta.y, 1.0, 0.0, 0.0)?;
            }
        }
        Ok(rotation)
    }

    /// Move the eye along the view direction. Positive deltas move away.
    /// Overshooting `max_elevation` is rejected; undershooting
    /// `min_elevation` clamps.
    pub fn zoom(&mut self, delta: f32) -> CameraOutcome {
        if !delta.is_finite() {
            return CameraOutcome::Rejected;
        }

        let mut to_eye = self.to_eye();
        let mut distance = to_eye.magnitude() + delta;
        if distance > self.config.max_elevation {
            log::trace!("zoom rejected: {} exceeds {}", distance, self.config.max_elevation);
            return CameraOutcome::Rejected;
        }

        let mut outcome = CameraOutcome::Applied;
        if distance < self.config.min_elevation {
            distance = self.config.min_elevation;
            outcome = CameraOutcome::Clamped;
        }

        if to_eye.normalize().is_err() {
            log::trace!("zoom rejected: eye coincides with center");
            return CameraOutcome::Rejected;
        }
        to_eye.scale(distance);
        self.eye = *self.center.copy().add(&to_eye);
        outcome
    }
}
