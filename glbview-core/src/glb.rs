/// GLB (binary glTF) container parser
use nom::{
    bytes::complete::{tag, take},
    multi::many0,
    number::complete::le_u32,
    IResult,
};

use crate::document::Document;
use crate::error::AssetError;

const GLB_MAGIC: &[u8] = b"glTF";
const GLB_VERSION: u32 = 2;
const HEADER_LENGTH: usize = 12;

const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// The JSON and binary chunks of a GLB file, borrowed from the input
#[derive(Debug, Clone, Copy)]
pub struct GlbContainer<'a> {
    pub json: &'a [u8],
    pub bin: Option<&'a [u8]>,
}

impl<'a> GlbContainer<'a> {
    /// Deserialize the JSON chunk
    pub fn document(&self) -> Result<Document, AssetError> {
        Ok(serde_json::from_slice(self.json)?)
    }
}

struct Header {
    version: u32,
    length: u32,
}

struct Chunk<'a> {
    kind: u32,
    data: &'a [u8],
}

fn parse_header(input: &[u8]) -> IResult<&[u8], Header> {
    let (input, _) = tag(GLB_MAGIC)(input)?;
    let (input, version) = le_u32(input)?;
    let (input, length) = le_u32(input)?;
    Ok((input, Header { version, length }))
}

fn parse_chunk(input: &[u8]) -> IResult<&[u8], Chunk<'_>> {
    let (input, length) = le_u32(input)?;
    let (input, kind) = le_u32(input)?;
    let (input, data) = take(length)(input)?;
    Ok((input, Chunk { kind, data }))
}

/// Split a GLB file into its chunks.
///
/// Input that starts with `{` is taken as a bare JSON glTF document, which
/// has no binary chunk.
pub fn parse_glb(data: &[u8]) -> Result<GlbContainer<'_>, AssetError> {
    let first = data.iter().position(|b| !b.is_ascii_whitespace());
    if first.map(|i| data[i]) == Some(b'{') {
        return Ok(GlbContainer { json: data, bin: None });
    }

    if data.len() < HEADER_LENGTH {
        return Err(AssetError::InvalidContainer(
            "file too small to be a valid GLB".to_string(),
        ));
    }

    let (_, header) = parse_header(data)
        .map_err(|_| AssetError::InvalidContainer("missing glTF magic".to_string()))?;
    if header.version != GLB_VERSION {
        return Err(AssetError::InvalidContainer(format!(
            "unsupported GLB version {}",
            header.version
        )));
    }

    let length = header.length as usize;
    if length < HEADER_LENGTH || length > data.len() {
        return Err(AssetError::InvalidContainer(format!(
            "declared length {} doesn't fit the {}-byte input",
            length,
            data.len()
        )));
    }

    let (rest, chunks) = many0(parse_chunk)(&data[HEADER_LENGTH..length])
        .map_err(|e| AssetError::InvalidContainer(format!("failed to read chunks: {:?}", e)))?;
    if !rest.is_empty() {
        return Err(AssetError::InvalidContainer(format!(
            "truncated chunk ({} trailing bytes)",
            rest.len()
        )));
    }

    let json = match chunks.first() {
        Some(chunk) if chunk.kind == CHUNK_JSON => chunk.data,
        _ => {
            return Err(AssetError::InvalidContainer(
                "first chunk must be JSON".to_string(),
            ))
        }
    };
    let bin = chunks[1..]
        .iter()
        .find(|chunk| chunk.kind == CHUNK_BIN)
        .map(|chunk| chunk.data);

    log::debug!(
        "GLB container: {} bytes of JSON, {} bytes of binary data",
        json.len(),
        bin.map_or(0, <[u8]>::len)
    );

    Ok(GlbContainer { json, bin })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(kind: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    fn glb(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&((HEADER_LENGTH + body.len()) as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn test_parse_json_and_bin_chunks() {
        let data = glb(&[chunk(CHUNK_JSON, b"{}  "), chunk(CHUNK_BIN, &[1, 2, 3, 4])]);
        let container = parse_glb(&data).unwrap();
        assert_eq!(container.json, b"{}  ");
        assert_eq!(container.bin, Some(&[1u8, 2, 3, 4][..]));
        assert!(container.document().unwrap().meshes.is_empty());
    }

    #[test]
    fn test_missing_bin_chunk() {
        let data = glb(&[chunk(CHUNK_JSON, b"{}  ")]);
        assert!(parse_glb(&data).unwrap().bin.is_none());
    }

    #[test]
    fn test_unknown_chunks_are_skipped() {
        let data = glb(&[
            chunk(CHUNK_JSON, b"{}  "),
            chunk(0x1234_5678, &[0; 4]),
            chunk(CHUNK_BIN, &[9; 8]),
        ]);
        assert_eq!(parse_glb(&data).unwrap().bin.map(<[u8]>::len), Some(8));
    }

    #[test]
    fn test_bare_json_document() {
        let container = parse_glb(b"  { \"nodes\": [] }").unwrap();
        assert!(container.bin.is_none());
        assert!(container.document().is_ok());
    }

    #[test]
    fn test_rejects_malformed_containers() {
        assert!(matches!(parse_glb(b"glTF"), Err(AssetError::InvalidContainer(_))));
        assert!(matches!(
            parse_glb(b"NOPE\x02\0\0\0\x0c\0\0\0"),
            Err(AssetError::InvalidContainer(_))
        ));

        let mut wrong_version = glb(&[chunk(CHUNK_JSON, b"{}  ")]);
        wrong_version[4] = 1;
        assert!(parse_glb(&wrong_version).is_err());

        let mut too_long = glb(&[chunk(CHUNK_JSON, b"{}  ")]);
        too_long[8] = 0xff;
        assert!(parse_glb(&too_long).is_err());

        let bin_first = glb(&[chunk(CHUNK_BIN, &[0; 4]), chunk(CHUNK_JSON, b"{}  ")]);
        assert!(parse_glb(&bin_first).is_err());
    }

    #[test]
    fn test_truncated_chunk() {
        let mut data = glb(&[chunk(CHUNK_JSON, b"{}  ")]);
        // Claim 8 bytes of JSON while only 4 follow.
        data[12] = 8;
        assert!(matches!(parse_glb(&data), Err(AssetError::InvalidContainer(_))));
    }
}
