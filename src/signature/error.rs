// Fri Oct 16 2026 - Alex

use crate::binary::BinaryError;
use crate::codec::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Binary(#[from] BinaryError),
    #[error("Detected a faulty value {hex} (offset {offset}) that was generated but not found in the lib file. Check that the hex value or AOB comes from the same lib file")]
    ZeroOccurrence { hex: String, offset: usize },
    #[error("Failed to make group search: could not find enough static bytes. Try reading more bytes or starting at a different offset")]
    InsufficientStaticBytes,
    #[error("Internal bug in offset calculation: value at offset {offset} should be {expected} but the AOB holds {found}")]
    OffsetBookkeeping {
        offset: usize,
        expected: String,
        found: String,
    },
    #[error("Invalid search options: {0}")]
    InvalidOptions(String),
}
