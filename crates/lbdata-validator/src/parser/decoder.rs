//! Transparent decoding of rank files.
//!
//! Producers may or may not brotli-compress their output, and the `.br`
//! extension is not reliable. Decompression is therefore always attempted
//! first, falling back to treating the bytes as plain JSON text.

use crate::utils::error::DecodeError;
use log::debug;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

const BROTLI_BUFFER_SIZE: usize = 4096;

/// A decoded rank file
///
/// `text` is the document exactly as the producer wrote it (after
/// decompression); it is never re-serialized.
#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub path: PathBuf,
    pub text: String,
    pub tree: Value,
}

/// Decode raw bytes into a parsed JSON tree
///
/// **Public** - main entry point for decoding
///
/// # Errors
/// * `DecodeError::MalformedInput` - bytes are neither a brotli payload
///   wrapping JSON nor JSON text themselves
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    decode_text(bytes).map(|(_, tree)| tree)
}

/// Read a file from disk and decode it
///
/// **Public** - used by the facade and the dataset assembler
pub fn read_record(path: impl AsRef<Path>) -> Result<DecodedRecord, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, tree) = decode_text(&bytes).map_err(|e| match e {
        DecodeError::MalformedInput(msg) => {
            DecodeError::MalformedInput(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    Ok(DecodedRecord {
        path: path.to_path_buf(),
        text,
        tree,
    })
}

/// Decode bytes, keeping the document text alongside its tree
///
/// **Private** - shared by `decode` and `read_record`
fn decode_text(bytes: &[u8]) -> Result<(String, Value), DecodeError> {
    match decompress(bytes) {
        Ok(inflated) => match parse_utf8_json(inflated) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => debug!("Decompressed payload is not JSON, retrying as plain text: {}", e),
        },
        Err(e) => debug!("No decompression applied: {}", e),
    }

    parse_utf8_json(bytes.to_vec()).map_err(DecodeError::MalformedInput)
}

/// Attempt brotli decompression
///
/// **Private** - internal helper for decode_text
fn decompress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decompressor = brotli::Decompressor::new(bytes, BROTLI_BUFFER_SIZE);
    let mut out = Vec::new();
    decompressor.read_to_end(&mut out)?;
    Ok(out)
}

/// Interpret bytes as UTF-8 JSON text
///
/// **Private** - internal helper for decode_text
fn parse_utf8_json(bytes: Vec<u8>) -> Result<(String, Value), String> {
    let text = String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))?;
    let tree = serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))?;
    Ok((text, tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn compress(text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 9, 22);
            writer.write_all(text.as_bytes()).unwrap();
        }
        out
    }

    #[test]
    fn test_decode_plain_json() {
        let tree = decode(br#"{"phases": []}"#).unwrap();
        assert_eq!(tree, json!({"phases": []}));
    }

    #[test]
    fn test_decode_compressed_matches_plain() {
        let text = r#"{"type": "LBDatafile", "phases": [{"id": 0, "tasks": []}]}"#;
        let plain = decode(text.as_bytes()).unwrap();
        let compressed = decode(&compress(text)).unwrap();
        assert_eq!(plain, compressed);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(&[0xff, 0x00, 0x13, 0x37]).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput(_)));
    }

    #[test]
    fn test_decode_rejects_compressed_non_json() {
        let err = decode(&compress("this is not json")).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput(_)));
    }

    #[test]
    fn test_read_record_keeps_original_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.0.json.br");
        let text = "{\n  \"phases\" : [ ]\n}";
        std::fs::write(&path, compress(text)).unwrap();

        let record = read_record(&path).unwrap();
        assert_eq!(record.text, text);
        assert_eq!(record.tree, json!({"phases": []}));
        assert_eq!(record.path, path);
    }

    #[test]
    fn test_read_record_missing_file() {
        let err = read_record("/no/such/file.json").unwrap_err();
        assert!(matches!(err, DecodeError::Read { .. }));
    }
}
