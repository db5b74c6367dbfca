/// glbview core library - shared math, camera and asset extraction
///
/// This library provides the host-independent core of the viewer: the
/// vector/matrix types, the orbit camera, and the extractor that turns a
/// GLB asset into flat per-vertex attribute arrays.

pub mod accessor;
pub mod camera;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod glb;
pub mod scene;
pub mod source;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use accessor::{
    AttributeData, BufferViewDescriptor, ComponentType, ElementShape, UnknownComponentPolicy,
};
pub use camera::{CameraOutcome, OrbitCamera};
pub use config::{CameraConfig, ExtractorConfig, ProjectionConfig, ViewerConfig};
pub use error::{AssetError, ConfigError, MathError};
pub use geometry::{extract, Attribute, ModelGeometry};
pub use scene::{InputEvent, Scene};
pub use source::{load_model, AssetSource, FileSource, MemorySource};
pub use transform::Matrix4;
pub use vector::Vector3;
