// Fri Oct 16 2026 - Alex

pub mod decoder;
pub mod encoder;

pub use decoder::Arm32Decoder;
pub use encoder::Arm32Encoder;

use crate::codec::{read_word, Architecture, CodecError, InstructionCodec};

const REGISTERS: [&str; 16] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "sb", "sl", "fp", "ip", "sp", "lr", "pc",
];

pub(crate) fn reg(n: u32) -> &'static str {
    REGISTERS[(n & 0xF) as usize]
}

pub(crate) fn parse_reg(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(pos) = REGISTERS.iter().position(|&r| r == s) {
        return Some(pos as u32);
    }
    crate::codec::operands::parse_numbered(s, "r", 15)
}

pub(crate) fn sreg(n: u32) -> String {
    format!("s{}", n)
}

pub(crate) fn dreg(n: u32) -> String {
    format!("d{}", n)
}

/// A VFP register operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VfpReg {
    Single(u32),
    Double(u32),
}

impl VfpReg {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(n) = crate::codec::operands::parse_numbered(s, "s", 31) {
            return Some(VfpReg::Single(n));
        }
        crate::codec::operands::parse_numbered(s, "d", 31).map(VfpReg::Double)
    }

    pub fn is_double(&self) -> bool {
        matches!(self, VfpReg::Double(_))
    }

    /// Splits the register number into the 4-bit field and the extra bit, as laid out in
    /// VFP encodings: `Vx:X` for singles and `X:Vx` for doubles.
    pub fn fields(&self) -> (u32, u32) {
        match *self {
            VfpReg::Single(n) => (n >> 1, n & 1),
            VfpReg::Double(n) => (n & 0xF, n >> 4),
        }
    }
}

pub(crate) fn reg_list(mask: u32) -> String {
    let names = (0..16)
        .filter(|i| mask & (1 << i) != 0)
        .map(reg)
        .collect::<Vec<_>>();
    format!("{{{}}}", names.join(", "))
}

#[derive(Debug, Default)]
pub struct Arm32Codec;

impl Arm32Codec {
    pub fn new() -> Self {
        Self
    }
}

impl InstructionCodec for Arm32Codec {
    fn architecture(&self) -> Architecture {
        Architecture::Arm32
    }

    fn disassemble(&self, bytes: &[u8]) -> Result<String, CodecError> {
        let raw = read_word(Architecture::Arm32, bytes)?;
        Arm32Decoder::decode(raw).ok_or_else(|| CodecError::decode(Architecture::Arm32, bytes))
    }

    fn assemble(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        Arm32Encoder::encode(text)
            .map(|raw| raw.to_le_bytes().to_vec())
            .map_err(|reason| CodecError::encode(Architecture::Arm32, text, reason))
    }
}
