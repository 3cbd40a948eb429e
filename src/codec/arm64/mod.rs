// Fri Oct 16 2026 - Alex

pub mod decoder;
pub mod encoder;
pub(crate) mod simd;

pub use decoder::Arm64Decoder;
pub use encoder::Arm64Encoder;

use crate::codec::{read_word, Architecture, CodecError, InstructionCodec};

pub(crate) fn gpr(n: u32, wide: bool) -> String {
    match (n & 0x1F, wide) {
        (31, true) => "xzr".to_string(),
        (31, false) => "wzr".to_string(),
        (n, true) => format!("x{}", n),
        (n, false) => format!("w{}", n),
    }
}

pub(crate) fn gpr_sp(n: u32, wide: bool) -> String {
    match (n & 0x1F, wide) {
        (31, true) => "sp".to_string(),
        (31, false) => "wsp".to_string(),
        (n, wide) => gpr(n, wide),
    }
}

pub(crate) fn fpr(n: u32, kind: char) -> String {
    format!("{}{}", kind, n & 0x1F)
}

/// Scalar FP register class selected by the `type` field (bits 23:22).
pub(crate) fn fp_kind(ftype: u32) -> Option<char> {
    match ftype & 0x3 {
        0b00 => Some('s'),
        0b01 => Some('d'),
        0b11 => Some('h'),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GpKind {
    Reg,
    Zr,
    Sp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GpReg {
    pub num: u32,
    pub wide: bool,
    pub kind: GpKind,
}

impl GpReg {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let reg = |num, wide, kind| Some(GpReg { num, wide, kind });
        match s {
            "sp" => reg(31, true, GpKind::Sp),
            "wsp" => reg(31, false, GpKind::Sp),
            "xzr" => reg(31, true, GpKind::Zr),
            "wzr" => reg(31, false, GpKind::Zr),
            "fp" => reg(29, true, GpKind::Reg),
            "lr" => reg(30, true, GpKind::Reg),
            _ => {
                if let Some(n) = super::operands::parse_numbered(s, "x", 30) {
                    reg(n, true, GpKind::Reg)
                } else {
                    super::operands::parse_numbered(s, "w", 30).and_then(|n| reg(n, false, GpKind::Reg))
                }
            }
        }
    }

    pub fn is_sp(&self) -> bool {
        self.kind == GpKind::Sp
    }

    pub fn is_zr(&self) -> bool {
        self.kind == GpKind::Zr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FpReg {
    pub num: u32,
    pub kind: char,
}

impl FpReg {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let kind = s.chars().next()?;
        if !matches!(kind, 'b' | 'h' | 's' | 'd' | 'q') {
            return None;
        }
        let num = super::operands::parse_numbered(s, &kind.to_string(), 31)?;
        Some(FpReg { num, kind })
    }

    /// The scalar FP `type` field for this register class.
    pub fn ftype(&self) -> Option<u32> {
        match self.kind {
            's' => Some(0b00),
            'd' => Some(0b01),
            'h' => Some(0b11),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Arm64Codec;

impl Arm64Codec {
    pub fn new() -> Self {
        Self
    }
}

impl InstructionCodec for Arm64Codec {
    fn architecture(&self) -> Architecture {
        Architecture::Arm64
    }

    fn disassemble(&self, bytes: &[u8]) -> Result<String, CodecError> {
        let raw = read_word(Architecture::Arm64, bytes)?;
        Arm64Decoder::decode(raw).ok_or_else(|| CodecError::decode(Architecture::Arm64, bytes))
    }

    fn assemble(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        Arm64Encoder::encode(text)
            .map(|raw| raw.to_le_bytes().to_vec())
            .map_err(|reason| CodecError::encode(Architecture::Arm64, text, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_parsing() {
        assert_eq!(
            GpReg::parse("x29"),
            Some(GpReg { num: 29, wide: true, kind: GpKind::Reg })
        );
        assert!(GpReg::parse("sp").unwrap().is_sp());
        assert!(GpReg::parse("wzr").unwrap().is_zr());
        assert!(GpReg::parse("x31").is_none());
        assert_eq!(FpReg::parse("d8"), Some(FpReg { num: 8, kind: 'd' }));
        assert!(FpReg::parse("v0").is_none());
    }

    #[test]
    fn test_codec_round_trip_register_forms() {
        let codec = Arm64Codec::new();
        // mov x29, sp / ldr x0, [x1] / ret / mrs x8, tpidr_el0
        for word in [0x910003FDu32, 0xF9400020, 0xD65F03C0, 0xD53BD048] {
            let bytes = word.to_le_bytes();
            let text = codec.disassemble(&bytes).unwrap();
            assert_eq!(codec.assemble(&text).unwrap(), bytes.to_vec(), "{}", text);
        }
    }

    #[test]
    fn test_codec_rejects_unallocated() {
        let codec = Arm64Codec::new();
        // Top-level group 0b0001 is unallocated.
        let err = codec.disassemble(&0x02000000u32.to_le_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::Decode { architecture: Architecture::Arm64, .. }));
    }
}
