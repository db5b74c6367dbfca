/// Typed decoding of accessor byte ranges
use serde::Deserialize;

use crate::error::AssetError;

/// Numeric encoding of one scalar component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
}

/// What to do with a component type code outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownComponentPolicy {
    /// Decode as unsigned bytes and log a warning
    #[default]
    FallbackToU8,
    /// Fail the load with `AssetError::UnsupportedComponentType`
    Reject,
}

impl ComponentType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            5120 => Some(Self::I8),
            5121 => Some(Self::U8),
            5122 => Some(Self::I16),
            5123 => Some(Self::U16),
            5124 => Some(Self::I32),
            5125 => Some(Self::U32),
            5126 => Some(Self::F32),
            _ => None,
        }
    }

    /// Resolve `code` for `accessor`, applying `policy` to unknown codes
    pub fn resolve(
        code: u32,
        accessor: usize,
        policy: UnknownComponentPolicy,
    ) -> Result<Self, AssetError> {
        match (Self::from_code(code), policy) {
            (Some(component_type), _) => Ok(component_type),
            (None, UnknownComponentPolicy::FallbackToU8) => {
                log::warn!(
                    "accessor {} has unknown component type {}, decoding as unsigned bytes",
                    accessor,
                    code
                );
                Ok(Self::U8)
            }
            (None, UnknownComponentPolicy::Reject) => {
                Err(AssetError::UnsupportedComponentType { accessor, code })
            }
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::I8 => 5120,
            Self::U8 => 5121,
            Self::I16 => 5122,
            Self::U16 => 5123,
            Self::I32 => 5124,
            Self::U32 => 5125,
            Self::F32 => 5126,
        }
    }

    /// Width of one component in bytes
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
        }
    }
}

/// Number of components forming one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl ElementShape {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SCALAR" => Some(Self::Scalar),
            "VEC2" => Some(Self::Vec2),
            "VEC3" => Some(Self::Vec3),
            "VEC4" => Some(Self::Vec4),
            _ => None,
        }
    }

    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }
}

/// A flat array of decoded components, keeping the source encoding
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

macro_rules! for_each_variant {
    ($value:expr, $data:ident => $body:expr) => {
        match $value {
            AttributeData::I8($data) => $body,
            AttributeData::U8($data) => $body,
            AttributeData::I16($data) => $body,
            AttributeData::U16($data) => $body,
            AttributeData::I32($data) => $body,
            AttributeData::U32($data) => $body,
            AttributeData::F32($data) => $body,
        }
    };
}

macro_rules! map_variant {
    ($value:expr, $data:ident => $body:expr) => {
        match $value {
            AttributeData::I8($data) => AttributeData::I8($body),
            AttributeData::U8($data) => AttributeData::U8($body),
            AttributeData::I16($data) => AttributeData::I16($body),
            AttributeData::U16($data) => AttributeData::U16($body),
            AttributeData::I32($data) => AttributeData::I32($body),
            AttributeData::U32($data) => AttributeData::U32($body),
            AttributeData::F32($data) => AttributeData::F32($body),
        }
    };
}

impl AttributeData {
    /// Number of scalar components (not elements)
    pub fn len(&self) -> usize {
        for_each_variant!(self, data => data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::I8(_) => ComponentType::I8,
            Self::U8(_) => ComponentType::U8,
            Self::I16(_) => ComponentType::I16,
            Self::U16(_) => ComponentType::U16,
            Self::I32(_) => ComponentType::I32,
            Self::U32(_) => ComponentType::U32,
            Self::F32(_) => ComponentType::F32,
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::F32(data) => Some(data),
            _ => None,
        }
    }

    /// Interpret the components as element indices. Only unsigned integer
    /// encodings are valid.
    pub fn to_indices(&self) -> Result<Vec<usize>, AssetError> {
        match self {
            Self::U8(data) => Ok(data.iter().map(|&i| i as usize).collect()),
            Self::U16(data) => Ok(data.iter().map(|&i| i as usize).collect()),
            Self::U32(data) => Ok(data.iter().map(|&i| i as usize).collect()),
            other => Err(AssetError::InvalidIndexType(other.component_type())),
        }
    }

    /// Expand indexed elements into one copy per index position.
    ///
    /// Output element `k` is source element `indices[k]`; each element is
    /// `components` wide.
    pub fn gather(
        &self,
        name: &str,
        components: usize,
        indices: &[usize],
    ) -> Result<AttributeData, AssetError> {
        let elements = self.len() / components;
        if let Some(&index) = indices.iter().find(|&&i| i >= elements) {
            return Err(AssetError::IndexOutOfRange {
                attribute: name.to_string(),
                index,
                elements,
            });
        }

        Ok(map_variant!(self, data => {
            let mut out = Vec::with_capacity(indices.len() * components);
            for &index in indices {
                let start = index * components;
                out.extend_from_slice(&data[start..start + components]);
            }
            out
        }))
    }
}

/// A typed view over one accessor's bytes inside the binary chunk
#[derive(Debug, Clone, Copy)]
pub struct BufferViewDescriptor<'a> {
    pub component_type: ComponentType,
    pub shape: ElementShape,
    /// Integer components map to `[0, 1]` or `[-1, 1]` when uploaded
    pub normalized: bool,
    pub bytes: &'a [u8],
}

impl<'a> BufferViewDescriptor<'a> {
    pub fn components(&self) -> usize {
        self.shape.components()
    }

    /// Number of whole elements covered by the byte range
    pub fn element_count(&self) -> usize {
        self.bytes.len() / (self.component_type.size() * self.components())
    }

    /// Decode every component, little-endian
    pub fn decode(&self) -> AttributeData {
        let bytes = self.bytes;
        match self.component_type {
            ComponentType::I8 => AttributeData::I8(bytes.iter().map(|&b| b as i8).collect()),
            ComponentType::U8 => AttributeData::U8(bytes.to_vec()),
            ComponentType::I16 => AttributeData::I16(
                bytes.chunks_exact(2).map(|c| i16::from_le_bytes([c[0], c[1]])).collect(),
            ),
            ComponentType::U16 => AttributeData::U16(
                bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect(),
            ),
            ComponentType::I32 => AttributeData::I32(
                bytes
                    .chunks_exact(4)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ComponentType::U32 => AttributeData::U32(
                bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ComponentType::F32 => AttributeData::F32(
                bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
        }
    }
}
