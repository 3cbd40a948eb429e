// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Offset {offset:X} not found in file {library}")]
    OffsetNotFound { offset: u64, library: String },
    #[error("Failed to determine architecture of lib file: {0}")]
    UnknownArchitecture(String),
    #[error("Invalid offset: {0}. Please provide a hexadecimal value")]
    InvalidOffset(String),
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}
