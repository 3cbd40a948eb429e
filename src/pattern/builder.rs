// Fri Oct 16 2026 - Alex

use crate::binary::to_hex_string;
use crate::codec::operands::has_immediate;
use crate::codec::{Architecture, CodecError, CodecRegistry, InstructionCodec};
use crate::pattern::AobPattern;
use std::sync::Arc;

/// Turns raw function bytes into an AOB, wildcarding every instruction whose text carries an
/// address or immediate.
pub struct PatternBuilder {
    codec: Arc<dyn InstructionCodec>,
}

impl PatternBuilder {
    pub fn new(registry: &CodecRegistry, architecture: Architecture) -> Self {
        Self {
            codec: registry.get(architecture),
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.codec.architecture()
    }

    pub fn is_position_dependent(text: &str) -> bool {
        has_immediate(text)
    }

    pub fn build(&self, bytes: &[u8]) -> Result<AobPattern, CodecError> {
        let width = self.architecture().instruction_width();
        let dropped = bytes.len() % width;
        if dropped != 0 {
            log::debug!("Ignoring {} trailing bytes that do not form a full instruction", dropped);
        }

        let mut aob = AobPattern::new();

        for (index, chunk) in bytes.chunks_exact(width).enumerate() {
            let text = self.codec.disassemble(chunk)?;

            if Self::is_position_dependent(&text) {
                log::debug!("#{:<4} {}  {:<32} -> wildcard", index, to_hex_string(chunk), text);
                aob.push_wildcards(width);
                continue;
            }

            let encoded = self.codec.assemble(&text)?;
            if encoded != chunk {
                log::debug!(
                    "#{:<4} {} re-encodes '{}' as {}",
                    index,
                    to_hex_string(chunk),
                    text,
                    to_hex_string(&encoded)
                );
            } else {
                log::debug!("#{:<4} {}  {}", index, to_hex_string(chunk), text);
            }
            aob.push_bytes(&encoded);
        }

        log::info!(
            "Generated AOB with {} bytes ({} wildcards)",
            aob.len(),
            aob.wildcard_byte_count()
        );
        log::debug!("AOB: {}", aob);
        Ok(aob)
    }
}
