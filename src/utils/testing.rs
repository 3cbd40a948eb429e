// Fri Oct 16 2026 - Alex

//! Table-driven codec for exercising the pipeline without real instruction encodings.

use crate::codec::{Architecture, CodecError, InstructionCodec};
use std::collections::HashMap;

pub struct ScriptedCodec {
    architecture: Architecture,
    decodes: HashMap<Vec<u8>, String>,
    encodes: HashMap<String, Vec<u8>>,
}

impl ScriptedCodec {
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            decodes: HashMap::new(),
            encodes: HashMap::new(),
        }
    }

    /// Scripts `bytes` to disassemble as `text`, and `text` to assemble back to `bytes`
    /// unless it carries an immediate.
    pub fn instruction(self, bytes: [u8; 4], text: &str) -> Self {
        let round_trip = !text.contains('#') && !text.contains("0x");
        let codec = self.decodes(bytes, text);
        if round_trip {
            codec.encodes(text, &bytes)
        } else {
            codec
        }
    }

    pub fn decodes(mut self, bytes: [u8; 4], text: &str) -> Self {
        self.decodes.insert(bytes.to_vec(), text.to_string());
        self
    }

    pub fn encodes(mut self, text: &str, bytes: &[u8]) -> Self {
        self.encodes.insert(text.to_string(), bytes.to_vec());
        self
    }
}

impl InstructionCodec for ScriptedCodec {
    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn disassemble(&self, bytes: &[u8]) -> Result<String, CodecError> {
        self.decodes
            .get(bytes)
            .cloned()
            .ok_or_else(|| CodecError::decode(self.architecture, bytes))
    }

    fn assemble(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        self.encodes
            .get(text)
            .cloned()
            .ok_or_else(|| CodecError::encode(self.architecture, text, "not scripted"))
    }
}
