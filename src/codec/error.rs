// Fri Oct 16 2026 - Alex

use crate::codec::Architecture;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to disassemble {bytes} with {architecture} architecture. Check that the bytes come from the right lib file at the right offset, and that the architecture is correct")]
    Decode {
        architecture: Architecture,
        bytes: String,
    },
    #[error("Failed to assemble '{text}' with {architecture} architecture: {reason}")]
    Encode {
        architecture: Architecture,
        text: String,
        reason: String,
    },
}

impl CodecError {
    pub fn decode(architecture: Architecture, bytes: &[u8]) -> Self {
        let bytes = bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        CodecError::Decode { architecture, bytes }
    }

    pub fn encode(architecture: Architecture, text: &str, reason: impl Into<String>) -> Self {
        CodecError::Encode {
            architecture,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
