// Fri Oct 16 2026 - Alex

//! Fixed-width instruction codecs.
//!
//! Both supported architectures use 4-byte little-endian instruction words. A codec turns one
//! word into capstone-style lowercase text and turns register-only text back into a word. The
//! signature engine only ever asks for the inverse direction on text that carries no address
//! or immediate, so the assemblers stop at that subset.

pub mod arm32;
pub mod arm64;
pub mod error;
pub mod operands;

pub use arm32::Arm32Codec;
pub use arm64::Arm64Codec;
pub use error::CodecError;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    Arm32,
    Arm64,
}

impl Architecture {
    pub const INSTRUCTION_WIDTH: usize = 4;

    pub fn instruction_width(&self) -> usize {
        Self::INSTRUCTION_WIDTH
    }

    pub fn name(&self) -> &'static str {
        match self {
            Architecture::Arm32 => "32bit",
            Architecture::Arm64 => "64bit",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "32bit" | "32" | "arm" | "arm32" | "armv7" => Ok(Architecture::Arm32),
            "64bit" | "64" | "arm64" | "aarch64" | "armv8" => Ok(Architecture::Arm64),
            other => Err(format!(
                "architecture must be '32bit' or '64bit', got '{}'",
                other
            )),
        }
    }
}

pub trait InstructionCodec: Send + Sync {
    fn architecture(&self) -> Architecture;

    /// Disassembles exactly one instruction word.
    fn disassemble(&self, bytes: &[u8]) -> Result<String, CodecError>;

    /// Assembles one line of instruction text into its machine bytes.
    fn assemble(&self, text: &str) -> Result<Vec<u8>, CodecError>;
}

pub(crate) fn read_word(architecture: Architecture, bytes: &[u8]) -> Result<u32, CodecError> {
    let word: [u8; 4] = bytes
        .try_into()
        .map_err(|_| CodecError::decode(architecture, bytes))?;
    Ok(u32::from_le_bytes(word))
}

/// Process-wide codec handles, created on first use and shared read-only afterwards.
pub struct CodecRegistry {
    codecs: RwLock<HashMap<Architecture, Arc<dyn InstructionCodec>>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self {
            codecs: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a codec in place of the built-in one for its architecture.
    pub fn with_codec(self, codec: Arc<dyn InstructionCodec>) -> Self {
        self.codecs.write().insert(codec.architecture(), codec);
        self
    }

    pub fn get(&self, architecture: Architecture) -> Arc<dyn InstructionCodec> {
        if let Some(codec) = self.codecs.read().get(&architecture) {
            return codec.clone();
        }

        let mut codecs = self.codecs.write();
        codecs
            .entry(architecture)
            .or_insert_with(|| {
                log::debug!("Constructing {} instruction codec", architecture);
                Self::build(architecture)
            })
            .clone()
    }

    fn build(architecture: Architecture) -> Arc<dyn InstructionCodec> {
        match architecture {
            Architecture::Arm32 => Arc::new(Arm32Codec::new()),
            Architecture::Arm64 => Arc::new(Arm64Codec::new()),
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_parsing() {
        assert_eq!("32bit".parse::<Architecture>(), Ok(Architecture::Arm32));
        assert_eq!(" AArch64 ".parse::<Architecture>(), Ok(Architecture::Arm64));
        assert_eq!("64BIT".parse::<Architecture>(), Ok(Architecture::Arm64));
        assert!("x86".parse::<Architecture>().is_err());
        assert_eq!(Architecture::Arm32.to_string(), "32bit");
    }

    #[test]
    fn test_registry_builds_once() {
        let registry = CodecRegistry::new();
        assert!(registry.codecs.read().is_empty());

        let first = registry.get(Architecture::Arm64);
        let second = registry.get(Architecture::Arm64);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.codecs.read().len(), 1);
        assert_eq!(first.architecture(), Architecture::Arm64);
    }

    #[test]
    fn test_read_word_rejects_partial_chunk() {
        assert!(read_word(Architecture::Arm64, &[0x1F, 0x20, 0x03]).is_err());
        assert_eq!(
            read_word(Architecture::Arm64, &[0x1F, 0x20, 0x03, 0xD5]),
            Ok(0xD503201F)
        );
    }
}
