/// The subset of the glTF JSON document the extractor reads
use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A contiguous byte range of a buffer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    #[serde(default)]
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

/// How to read a buffer view as typed elements
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: Option<usize>,
    /// Element shape tag: `SCALAR`, `VEC2`, `VEC3` or `VEC4`
    #[serde(rename = "type")]
    pub shape: String,
    /// Integer components are normalized when read
    #[serde(default)]
    pub normalized: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Primitive {
    /// Attribute name to accessor index
    #[serde(default)]
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    /// Unit quaternion `[x, y, z, w]`
    pub rotation: Option<[f32; 4]>,
}
