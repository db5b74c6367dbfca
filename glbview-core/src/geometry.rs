/// Flat per-vertex geometry extracted from a GLB asset
use crate::accessor::{AttributeData, BufferViewDescriptor, ComponentType, ElementShape};
use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::AssetError;
use crate::glb;
use crate::transform::Matrix4;

pub const POSITION: &str = "POSITION";
pub const NORMAL: &str = "NORMAL";
pub const COLOR_0: &str = "COLOR_0";

/// Well-known attributes come first in this order; anything else follows
/// in lexical order.
const ATTRIBUTE_ORDER: [&str; 6] =
    [POSITION, NORMAL, COLOR_0, "TEXCOORD_0", "TEXCOORD_1", "TANGENT"];

fn attribute_rank(name: &str) -> usize {
    ATTRIBUTE_ORDER
        .iter()
        .position(|known| *known == name)
        .unwrap_or(ATTRIBUTE_ORDER.len())
}

/// One named vertex attribute as a flat array
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// Components per vertex
    pub components: usize,
    /// Integer data is meant to be normalized on upload
    pub normalized: bool,
    pub data: AttributeData,
}

/// Renderable geometry of a single static mesh.
///
/// Every attribute holds exactly `vertex_count * components` values, and
/// `POSITION` and `COLOR_0` are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGeometry {
    attributes: Vec<Attribute>,
    vertex_count: usize,
    transformation: Matrix4,
}

impl ModelGeometry {
    /// Attributes in their fixed order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn positions(&self) -> Option<&Attribute> {
        self.attribute(POSITION)
    }

    pub fn colors(&self) -> Option<&Attribute> {
        self.attribute(COLOR_0)
    }

    pub fn normals(&self) -> Option<&Attribute> {
        self.attribute(NORMAL)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// The node's static transform, applied before the camera view
    pub fn transformation(&self) -> &Matrix4 {
        &self.transformation
    }
}

/// Parse a GLB file and extract its geometry
pub fn extract(data: &[u8], config: &ExtractorConfig) -> Result<ModelGeometry, AssetError> {
    let container = glb::parse_glb(data)?;
    let bin = container.bin.ok_or(AssetError::MissingBinaryChunk)?;
    let document = container.document()?;
    extract_from_document(&document, bin, config)
}

/// Extract geometry from an already parsed document and its binary chunk
pub fn extract_from_document(
    document: &Document,
    bin: &[u8],
    config: &ExtractorConfig,
) -> Result<ModelGeometry, AssetError> {
    let views = resolve_buffer_views(document, bin, config)?;

    let mesh = document.meshes.first().ok_or(AssetError::MissingMesh)?;
    let primitive = mesh.primitives.first().ok_or(AssetError::MissingPrimitive)?;

    let mut ordered: Vec<(&String, usize)> =
        primitive.attributes.iter().map(|(k, &v)| (k, v)).collect();
    ordered.sort_by(|a, b| {
        attribute_rank(a.0)
            .cmp(&attribute_rank(b.0))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut sources = Vec::with_capacity(ordered.len());
    for (name, accessor) in ordered {
        let descriptor = describe_accessor(document, &views, accessor, config)?;
        sources.push((name.clone(), descriptor));
    }

    let indices = match primitive.indices {
        Some(accessor) => {
            let descriptor = describe_accessor(document, &views, accessor, config)?;
            Some(descriptor.decode().to_indices()?)
        }
        None => None,
    };

    let (attributes, vertex_count) = match indices {
        Some(indices) => flatten_indexed(&sources, &indices)?,
        None => collect_verbatim(&sources)?,
    };

    for required in [POSITION, COLOR_0] {
        if !attributes.iter().any(|a| a.name == required) {
            return Err(AssetError::MissingAttribute(required.to_string()));
        }
    }

    let transformation = node_transformation(document)?;

    log::debug!(
        "extracted {} vertices with attributes [{}]",
        vertex_count,
        attributes.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    );

    Ok(ModelGeometry {
        attributes,
        vertex_count,
        transformation,
    })
}

/// Resolve every buffer view to its byte range in the binary chunk
fn resolve_buffer_views<'a>(
    document: &Document,
    bin: &'a [u8],
    config: &ExtractorConfig,
) -> Result<Vec<&'a [u8]>, AssetError> {
    if document.buffer_views.len() < config.min_buffer_views {
        return Err(AssetError::TooFewBufferViews {
            found: document.buffer_views.len(),
            required: config.min_buffer_views,
        });
    }

    document
        .buffer_views
        .iter()
        .enumerate()
        .map(|(index, view)| {
            if view.buffer != 0 {
                return Err(AssetError::ExternalBuffer {
                    index,
                    buffer: view.buffer,
                });
            }
            view.byte_offset
                .checked_add(view.byte_length)
                .and_then(|end| bin.get(view.byte_offset..end))
                .ok_or(AssetError::BufferViewOutOfBounds {
                    index,
                    offset: view.byte_offset,
                    length: view.byte_length,
                    available: bin.len(),
                })
        })
        .collect()
}

/// Map an accessor to a typed view over its bytes
fn describe_accessor<'a>(
    document: &Document,
    views: &[&'a [u8]],
    index: usize,
    config: &ExtractorConfig,
) -> Result<BufferViewDescriptor<'a>, AssetError> {
    let accessor = document
        .accessors
        .get(index)
        .ok_or(AssetError::MissingAccessor(index))?;
    let view_index = accessor.buffer_view.ok_or(AssetError::MissingBufferView(index))?;
    let view = *views.get(view_index).ok_or(AssetError::MissingBufferView(index))?;

    let component_type =
        ComponentType::resolve(accessor.component_type, index, config.unknown_component)?;
    let shape = ElementShape::from_tag(&accessor.shape).ok_or_else(|| {
        AssetError::UnsupportedElementShape {
            accessor: index,
            shape: accessor.shape.clone(),
        }
    })?;
    let element_size = component_type.size() * shape.components();

    if let Some(stride) = document.buffer_views[view_index].byte_stride {
        if stride != element_size {
            return Err(AssetError::UnsupportedStride {
                index: view_index,
                stride,
            });
        }
    }

    let out_of_bounds = |length: usize| AssetError::BufferViewOutOfBounds {
        index: view_index,
        offset: accessor.byte_offset,
        length,
        available: view.len(),
    };
    let bytes = match accessor.count {
        Some(count) => {
            let length = count.checked_mul(element_size).ok_or_else(|| out_of_bounds(usize::MAX))?;
            accessor
                .byte_offset
                .checked_add(length)
                .and_then(|end| view.get(accessor.byte_offset..end))
                .ok_or_else(|| out_of_bounds(length))?
        }
        None => view
            .get(accessor.byte_offset..)
            .ok_or_else(|| out_of_bounds(0))?,
    };

    if bytes.len() % element_size != 0 {
        return Err(AssetError::MisalignedBufferView {
            accessor: index,
            length: bytes.len(),
            element_size,
        });
    }

    Ok(BufferViewDescriptor {
        component_type,
        shape,
        normalized: accessor.normalized,
        bytes,
    })
}

fn flatten_indexed(
    sources: &[(String, BufferViewDescriptor<'_>)],
    indices: &[usize],
) -> Result<(Vec<Attribute>, usize), AssetError> {
    let attributes = sources
        .iter()
        .map(|(name, descriptor)| -> Result<Attribute, AssetError> {
            let components = descriptor.components();
            let data = descriptor.decode().gather(name, components, indices)?;
            Ok(Attribute {
                name: name.clone(),
                components,
                normalized: descriptor.normalized,
                data,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((attributes, indices.len()))
}

fn collect_verbatim(
    sources: &[(String, BufferViewDescriptor<'_>)],
) -> Result<(Vec<Attribute>, usize), AssetError> {
    let vertex_count = sources
        .iter()
        .find(|(name, _)| name == POSITION)
        .map(|(_, descriptor)| descriptor.element_count())
        .ok_or_else(|| AssetError::MissingAttribute(POSITION.to_string()))?;

    let attributes = sources
        .iter()
        .map(|(name, descriptor)| -> Result<Attribute, AssetError> {
            let found = descriptor.element_count();
            if found != vertex_count {
                return Err(AssetError::AttributeLengthMismatch {
                    attribute: name.clone(),
                    expected: vertex_count,
                    found,
                });
            }
            Ok(Attribute {
                name: name.clone(),
                components: descriptor.components(),
                normalized: descriptor.normalized,
                data: descriptor.decode(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((attributes, vertex_count))
}

/// Identity, or the first node's rotation when it declares one
fn node_transformation(document: &Document) -> Result<Matrix4, AssetError> {
    let mut transformation = Matrix4::new();
    if let Some([x, y, z, w]) = document.nodes.first().and_then(|node| node.rotation) {
        transformation.rotate_with_quaternion(x, y, z, w)?;
    }
    Ok(transformation)
}
