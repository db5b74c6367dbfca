use serde_json::{json, Value};

const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Builds small GLB assets. Every accessor gets its own buffer view, and
/// four unused views keep the asset above the default view minimum.
pub struct GlbBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    attributes: serde_json::Map<String, Value>,
    indices: Option<usize>,
    with_bin: bool,
}

impl GlbBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            bin: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
            attributes: serde_json::Map::new(),
            indices: None,
            with_bin: true,
        };
        for _ in 0..4 {
            builder.view(&[0; 4]);
        }
        builder
    }

    fn view(&mut self, bytes: &[u8]) -> usize {
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        }));
        self.bin.extend_from_slice(bytes);
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        self.views.len() - 1
    }

    fn accessor(&mut self, bytes: &[u8], component_type: u32, shape: &str) -> usize {
        let view = self.view(bytes);
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": component_type,
            "type": shape,
        }));
        self.accessors.len() - 1
    }

    pub fn floats(mut self, name: &str, values: &[f32], shape: &str) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let accessor = self.accessor(&bytes, 5126, shape);
        self.attributes.insert(name.to_string(), json!(accessor));
        self
    }

    pub fn u16s(mut self, name: &str, values: &[u16], shape: &str) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let accessor = self.accessor(&bytes, 5123, shape);
        self.attributes.insert(name.to_string(), json!(accessor));
        self
    }

    pub fn indices(mut self, values: &[u16]) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.indices = Some(self.accessor(&bytes, 5123, "SCALAR"));
        self
    }

    pub fn without_bin(mut self) -> Self {
        self.with_bin = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut primitive = json!({ "attributes": self.attributes });
        if let Some(indices) = self.indices {
            primitive["indices"] = json!(indices);
        }
        let document = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": self.bin.len() }],
            "bufferViews": self.views,
            "accessors": self.accessors,
            "meshes": [{ "primitives": [primitive] }],
        });

        let mut json = serde_json::to_vec(&document).unwrap();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let mut body = chunk(CHUNK_JSON, &json);
        if self.with_bin {
            body.extend(chunk(CHUNK_BIN, &self.bin));
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&((12 + body.len()) as u32).to_le_bytes());
        out.extend(body);
        out
    }
}

fn chunk(kind: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(data);
    out
}
