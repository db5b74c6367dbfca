/// Error types for math, asset extraction and configuration
use thiserror::Error;

/// Degenerate inputs to the vector/matrix routines.
///
/// These indicate a caller bug rather than a recoverable runtime condition,
/// so they are surfaced instead of producing NaN-filled results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("cannot normalize a zero-length or non-finite vector")]
    ZeroLength,

    #[error("look-at eye and center coincide")]
    DegenerateView,

    #[error("look-at up vector is parallel to the view direction")]
    ParallelUp,

    #[error("invalid perspective projection: {reason}")]
    InvalidProjection { reason: String },
}

/// Structural failures while loading a model asset. Every variant is fatal
/// to the load; no partial geometry is produced.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("invalid GLB container: {0}")]
    InvalidContainer(String),

    #[error("the asset doesn't contain a binary chunk")]
    MissingBinaryChunk,

    #[error("wrong set of buffer views: found {found}, at least {required} required")]
    TooFewBufferViews { found: usize, required: usize },

    #[error("buffer view {index} ({offset}+{length} bytes) exceeds the {available}-byte chunk")]
    BufferViewOutOfBounds {
        index: usize,
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("buffer view {index} has stride {stride}, interleaved data is not supported")]
    UnsupportedStride { index: usize, stride: usize },

    #[error("accessor {accessor} covers {length} bytes, not a multiple of {element_size}")]
    MisalignedBufferView {
        accessor: usize,
        length: usize,
        element_size: usize,
    },

    #[error("buffer view {index} references buffer {buffer}, only the binary chunk is supported")]
    ExternalBuffer { index: usize, buffer: usize },

    #[error("accessor {0} has not been found")]
    MissingAccessor(usize),

    #[error("accessor {0} doesn't reference a valid buffer view")]
    MissingBufferView(usize),

    #[error("the asset doesn't contain a mesh")]
    MissingMesh,

    #[error("the mesh doesn't contain a primitive")]
    MissingPrimitive,

    #[error("model doesn't contain the {0} attribute")]
    MissingAttribute(String),

    #[error("accessor {accessor} has unsupported element shape {shape:?}")]
    UnsupportedElementShape { accessor: usize, shape: String },

    #[error("accessor {accessor} has unsupported component type {code}")]
    UnsupportedComponentType { accessor: usize, code: u32 },

    #[error("index accessor uses component type {0:?}, expected an unsigned integer")]
    InvalidIndexType(crate::accessor::ComponentType),

    #[error("index {index} is out of range for attribute {attribute} with {elements} elements")]
    IndexOutOfRange {
        attribute: String,
        index: usize,
        elements: usize,
    },

    #[error("attribute {attribute} has {found} elements, expected {expected}")]
    AttributeLengthMismatch {
        attribute: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid node rotation: {0}")]
    InvalidRotation(#[from] MathError),

    #[error("failed to parse the glTF document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read asset from {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

/// Invalid viewer configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
