/// glbview web - WASM bindings for browser hosts
///
/// The browser owns the canvas, the GL context and the event listeners; this
/// module exposes the camera and the extracted geometry as typed arrays the
/// host uploads itself.

use glbview_core::{
    AttributeData, CameraOutcome, InputEvent, MathError, MemorySource, Scene, Vector3, ViewerConfig,
};
use js_sys::{Float32Array, Int16Array, Int32Array, Int8Array, Uint16Array, Uint32Array, Uint8Array};
use nalgebra::Vector2;
use wasm_bindgen::prelude::*;

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn matrix_to_js(matrix: Result<glbview_core::Matrix4, MathError>) -> Result<Vec<f32>, JsValue> {
    matrix.map(|m| m.as_slice().to_vec()).map_err(to_js)
}

#[wasm_bindgen]
pub struct WebViewer {
    scene: Scene,
}

impl WebViewer {
    fn build(
        eye_x: f32,
        eye_y: f32,
        eye_z: f32,
        config: &ViewerConfig,
    ) -> Result<WebViewer, JsValue> {
        let scene = Scene::new(Vector3::new(eye_x, eye_y, eye_z), config).map_err(to_js)?;
        Ok(WebViewer { scene })
    }

    fn input(&mut self, event: InputEvent) -> bool {
        self.scene.handle_input(event) != CameraOutcome::Rejected
    }
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(eye_x: f32, eye_y: f32, eye_z: f32) -> Result<WebViewer, JsValue> {
        Self::build(eye_x, eye_y, eye_z, &ViewerConfig::default())
    }

    /// Same as the constructor, with tuning read from a JSON string
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        eye_x: f32,
        eye_y: f32,
        eye_z: f32,
        json: &str,
    ) -> Result<WebViewer, JsValue> {
        let config = ViewerConfig::from_json(json).map_err(to_js)?;
        Self::build(eye_x, eye_y, eye_z, &config)
    }

    /// Extract a GLB the host already fetched. A failed load keeps the
    /// previous model.
    #[wasm_bindgen(js_name = loadModel)]
    pub fn load_model(&mut self, name: &str, bytes: &[u8]) -> Result<usize, JsValue> {
        let source = MemorySource::new(name, bytes.to_vec());
        match self.scene.load(&source) {
            Ok(geometry) => Ok(geometry.vertex_count()),
            Err(err) => {
                log::error!("failed to load {}: {}", name, err);
                Err(to_js(err))
            }
        }
    }

    /// Returns false when the camera ignored the input
    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        self.input(InputEvent::Drag {
            delta: Vector2::new(dx, dy),
            pan: true,
        })
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) -> bool {
        self.input(InputEvent::Drag {
            delta: Vector2::new(dx, dy),
            pan: false,
        })
    }

    pub fn zoom(&mut self, delta: f32) -> bool {
        self.input(InputEvent::Wheel(delta))
    }

    pub fn eye(&self) -> Vec<f32> {
        self.scene.camera().eye().to_array().to_vec()
    }

    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.scene.geometry().map_or(0, |g| g.vertex_count())
    }

    /// Components per vertex of a named attribute, 0 if absent
    #[wasm_bindgen(js_name = attributeComponents)]
    pub fn attribute_components(&self, name: &str) -> usize {
        self.scene
            .geometry()
            .and_then(|g| g.attribute(name))
            .map_or(0, |a| a.components)
    }

    /// Whether the host should upload a named attribute with
    /// `normalize = true`; false if absent
    #[wasm_bindgen(js_name = attributeNormalized)]
    pub fn attribute_normalized(&self, name: &str) -> bool {
        self.scene
            .geometry()
            .and_then(|g| g.attribute(name))
            .is_some_and(|a| a.normalized)
    }

    /// A named attribute as a typed array matching its component type
    pub fn attribute(&self, name: &str) -> Result<JsValue, JsValue> {
        let attribute = self
            .scene
            .geometry()
            .and_then(|g| g.attribute(name))
            .ok_or_else(|| JsValue::from_str(&format!("no attribute {}", name)))?;

        let array: JsValue = match &attribute.data {
            AttributeData::I8(v) => Int8Array::from(v.as_slice()).into(),
            AttributeData::U8(v) => Uint8Array::from(v.as_slice()).into(),
            AttributeData::I16(v) => Int16Array::from(v.as_slice()).into(),
            AttributeData::U16(v) => Uint16Array::from(v.as_slice()).into(),
            AttributeData::I32(v) => Int32Array::from(v.as_slice()).into(),
            AttributeData::U32(v) => Uint32Array::from(v.as_slice()).into(),
            AttributeData::F32(v) => Float32Array::from(v.as_slice()).into(),
        };
        Ok(array)
    }

    /// Column-major model-view matrix
    #[wasm_bindgen(js_name = modelViewMatrix)]
    pub fn model_view_matrix(&self) -> Result<Vec<f32>, JsValue> {
        matrix_to_js(self.scene.model_view_matrix())
    }

    #[wasm_bindgen(js_name = projectionMatrix)]
    pub fn projection_matrix(&self, aspect: f32) -> Result<Vec<f32>, JsValue> {
        matrix_to_js(self.scene.projection_matrix(aspect))
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(to_js)?;
    Ok(())
}
