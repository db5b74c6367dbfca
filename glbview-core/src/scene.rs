/// A loaded model viewed through an orbit camera
use nalgebra::Vector2;

use crate::camera::{CameraOutcome, OrbitCamera};
use crate::config::{ExtractorConfig, ProjectionConfig, ViewerConfig};
use crate::error::{AssetError, ConfigError, MathError};
use crate::geometry::ModelGeometry;
use crate::source::{self, AssetSource};
use crate::transform::Matrix4;
use crate::vector::Vector3;

/// Device-independent input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer drag; `pan` is set while the host's pan modifier is held
    Drag { delta: Vector2<f32>, pan: bool },
    /// Signed zoom step, positive moves away from the target
    Wheel(f32),
}

pub struct Scene {
    camera: OrbitCamera,
    geometry: Option<ModelGeometry>,
    extractor: ExtractorConfig,
    projection: ProjectionConfig,
}

impl Scene {
    pub fn new(eye: Vector3, config: &ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            camera: OrbitCamera::with_config(eye, config.camera)?,
            geometry: None,
            extractor: config.extractor,
            projection: config.projection,
        })
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn geometry(&self) -> Option<&ModelGeometry> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: ModelGeometry) {
        self.geometry = Some(geometry);
    }

    /// Load a model, replacing the current one only on success
    pub fn load(&mut self, source: &dyn AssetSource) -> Result<&ModelGeometry, AssetError> {
        let geometry = source::load_model(source, &self.extractor)?;
        Ok(self.geometry.insert(geometry))
    }

    pub fn handle_input(&mut self, event: InputEvent) -> CameraOutcome {
        match event {
            InputEvent::Drag { delta, pan: true } => self.camera.pan(delta),
            InputEvent::Drag { delta, pan: false } => self.camera.orbit(delta),
            InputEvent::Wheel(delta) => self.camera.zoom(delta),
        }
    }

    /// The camera view with the model's static transform applied first
    pub fn model_view_matrix(&self) -> Result<Matrix4, MathError> {
        let mut model_view = self.camera.view_matrix()?;
        if let Some(geometry) = &self.geometry {
            model_view.multiply_right(geometry.transformation());
        }
        Ok(model_view)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Result<Matrix4, MathError> {
        Matrix4::perspective(
            self.projection.fov_y_degrees,
            aspect,
            self.projection.z_near,
            self.projection.z_far,
        )
    }
}
