//! Input decoding and record discrimination.
//!
//! This module handles:
//! - Decoding raw bytes (optionally brotli-compressed) into JSON
//! - Identifying which record schema a document declares

pub mod decoder;
pub mod record;

// Re-export main types
pub use decoder::{decode, read_record, DecodedRecord};
pub use record::{declared_kind, DeclaredKind, RecordKind};
