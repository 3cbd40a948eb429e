// Fri Oct 16 2026 - Alex

pub mod error;
pub mod hex;
pub mod library;

pub use error::BinaryError;
pub use hex::{parse_hex, parse_offset, to_hex_string};
pub use library::LibraryFile;
