// Fri Oct 16 2026 - Alex

use super::decoder::{DATA_OPCODES, SHIFT_NAMES};
use super::{parse_reg, VfpReg};
use crate::codec::operands::{
    expand_fp_imm8, parse_barrier_option, parse_condition, parse_imm, split_instruction,
    split_memory, split_register_list,
};
use std::cmp::Reverse;

type EncodeResult = Result<u32, String>;

const AL: u32 = 0xE;

/// Base mnemonics and whether they accept an `s` suffix.
const BASES: &[(&str, bool)] = &[
    ("and", true), ("eor", true), ("sub", true), ("rsb", true), ("add", true), ("adc", true),
    ("sbc", true), ("rsc", true), ("tst", false), ("teq", false), ("cmp", false), ("cmn", false),
    ("orr", true), ("mov", true), ("bic", true), ("mvn", true), ("lsl", true), ("lsr", true),
    ("asr", true), ("ror", true), ("rrx", true), ("movw", false), ("movt", false),
    ("mul", true), ("mla", true), ("mls", false), ("umull", true), ("umlal", true),
    ("smull", true), ("smlal", true), ("nop", false), ("yield", false), ("wfe", false),
    ("wfi", false), ("sev", false), ("bx", false), ("blx", false), ("clz", false),
    ("mrs", false), ("bkpt", false), ("ldrex", false), ("strex", false), ("ldrexb", false),
    ("strexb", false), ("ldrexh", false), ("strexh", false), ("strh", false), ("ldrh", false),
    ("ldrd", false), ("ldrsb", false), ("strd", false), ("ldrsh", false), ("ldr", false),
    ("str", false), ("ldrb", false), ("strb", false), ("push", false), ("pop", false),
    ("ldm", false), ("ldmia", false), ("ldmib", false), ("ldmda", false), ("ldmdb", false),
    ("stm", false), ("stmia", false), ("stmib", false), ("stmda", false), ("stmdb", false),
    ("sxtb", false), ("sxth", false), ("uxtb", false), ("uxth", false), ("rev", false),
    ("rev16", false), ("revsh", false), ("rbit", false), ("sdiv", false), ("udiv", false),
    ("ubfx", false), ("sbfx", false), ("bfi", false), ("bfc", false), ("udf", false),
    ("b", false), ("bl", false), ("svc", false), ("vadd", false), ("vsub", false),
    ("vmul", false), ("vnmul", false), ("vmla", false), ("vmls", false), ("vnmla", false),
    ("vnmls", false), ("vdiv", false), ("vmov", false), ("vabs", false), ("vneg", false),
    ("vsqrt", false), ("vcmp", false), ("vcmpe", false), ("vcvt", false), ("vcvtr", false),
    ("vmrs", false), ("vmsr", false), ("vldr", false), ("vstr", false), ("vpush", false),
    ("vpop", false), ("dmb", false), ("dsb", false), ("isb", false), ("clrex", false),
    ("pld", false),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Mnemonic {
    base: &'static str,
    set_flags: bool,
    cond: u32,
    data_type: Option<String>,
}

impl Mnemonic {
    /// Splits `addseq`, `vaddne.f32` and friends into base, flags, condition and data type.
    fn parse(text: &str) -> Option<Self> {
        let (head, data_type) = match text.split_once('.') {
            Some((head, dt)) => (head, Some(dt.to_string())),
            None => (text, None),
        };

        let mut bases = BASES.to_vec();
        bases.sort_by_key(|(base, _)| Reverse(base.len()));

        bases.into_iter().find_map(|(base, allows_s)| {
            let rest = head.strip_prefix(base)?;
            let (set_flags, rest) = match rest.strip_prefix('s') {
                Some(after) if allows_s => (true, after),
                _ => (false, rest),
            };
            let cond = match rest {
                "" => AL,
                "nv" => return None,
                other => parse_condition(other)?,
            };
            Some(Mnemonic {
                base,
                set_flags,
                cond,
                data_type: data_type.clone(),
            })
        })
    }

    fn cond_bits(&self) -> u32 {
        self.cond << 28
    }

    fn s_bit(&self) -> u32 {
        (self.set_flags as u32) << 20
    }
}

pub struct Arm32Encoder;

impl Arm32Encoder {
    pub fn encode(text: &str) -> EncodeResult {
        let (mnemonic, operands) = split_instruction(text);
        let ops = operands.iter().map(String::as_str).collect::<Vec<_>>();
        let m = Mnemonic::parse(&mnemonic).ok_or_else(|| format!("unsupported mnemonic '{}'", mnemonic))?;

        if m.data_type.is_some() && !m.base.starts_with('v') {
            return Err(format!("unexpected data type on '{}'", mnemonic));
        }

        match m.base {
            "and" | "eor" | "sub" | "rsb" | "add" | "adc" | "sbc" | "rsc" | "orr" | "bic" | "tst"
            | "teq" | "cmp" | "cmn" | "mov" | "mvn" => Self::encode_data_processing(&m, &ops),
            "lsl" | "lsr" | "asr" | "ror" | "rrx" => Self::encode_shift(&m, &ops),
            "movw" | "movt" => Self::encode_wide_move(&m, &ops),
            "nop" | "yield" | "wfe" | "wfi" | "sev" => {
                expect_count(&ops, 0)?;
                let hint = ["nop", "yield", "wfe", "wfi", "sev"]
                    .iter()
                    .position(|&h| h == m.base)
                    .unwrap_or(0) as u32;
                Ok(m.cond_bits() | 0x0320F000 | hint)
            }
            "bx" | "blx" | "clz" | "mrs" | "bkpt" => Self::encode_miscellaneous(&m, &ops),
            "mul" | "mla" | "mls" | "umull" | "umlal" | "smull" | "smlal" => Self::encode_multiply(&m, &ops),
            "ldrex" | "strex" | "ldrexb" | "strexb" | "ldrexh" | "strexh" => Self::encode_exclusive(&m, &ops),
            "strh" | "ldrh" | "ldrd" | "ldrsb" | "strd" | "ldrsh" => Self::encode_extra_load_store(&m, &ops),
            "ldr" | "str" | "ldrb" | "strb" => Self::encode_load_store(&m, &ops),
            "push" | "pop" => Self::encode_push_pop(&m, &ops),
            "ldm" | "ldmia" | "ldmib" | "ldmda" | "ldmdb" | "stm" | "stmia" | "stmib" | "stmda"
            | "stmdb" => Self::encode_block_transfer(&m, &ops),
            "sxtb" | "sxth" | "uxtb" | "uxth" | "rev" | "rev16" | "revsh" | "rbit" | "sdiv" | "udiv"
            | "ubfx" | "sbfx" | "bfi" | "bfc" | "udf" => Self::encode_media(&m, &ops),
            "b" | "bl" | "svc" => Self::encode_branch(&m, &ops),
            "dmb" | "dsb" | "isb" | "clrex" | "pld" => Self::encode_unconditional(&m, &ops),
            _ => Self::encode_vfp(&m, &ops),
        }
    }

    fn encode_data_processing(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let opcode = DATA_OPCODES
            .iter()
            .position(|&op| op == m.base)
            .ok_or_else(|| format!("unknown data-processing opcode '{}'", m.base))? as u32;

        let (rd, rn, operand, s) = match opcode {
            8..=11 => {
                expect_at_least(ops, 2)?;
                (0, reg(ops[0])?, &ops[1..], 1 << 20)
            }
            13 | 15 => {
                expect_at_least(ops, 2)?;
                (reg(ops[0])?, 0, &ops[1..], m.s_bit())
            }
            _ => {
                expect_at_least(ops, 3)?;
                (reg(ops[0])?, reg(ops[1])?, &ops[2..], m.s_bit())
            }
        };

        Ok(m.cond_bits() | (opcode << 21) | s | (rn << 16) | (rd << 12) | encode_operand2(operand)?)
    }

    fn encode_shift(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let base = m.cond_bits() | (13 << 21) | m.s_bit();

        if m.base == "rrx" {
            expect_count(ops, 2)?;
            return Ok(base | (reg(ops[0])? << 12) | (3 << 5) | reg(ops[1])?);
        }

        expect_count(ops, 3)?;
        let kind = SHIFT_NAMES.iter().position(|&s| s == m.base).unwrap_or(0) as u32;
        let (rd, rm) = (reg(ops[0])?, reg(ops[1])?);

        if ops[2].starts_with('#') {
            let amount = shift_amount(kind, parse_imm(ops[2])?)?;
            return Ok(base | (rd << 12) | (amount << 7) | (kind << 5) | rm);
        }

        let rs = reg(ops[2])?;
        Ok(base | (rd << 12) | (rs << 8) | (kind << 5) | (1 << 4) | rm)
    }

    fn encode_wide_move(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let rd = reg(ops[0])?;
        let imm = bounded_imm(ops[1], 0, 0xFFFF)?;
        let base = if m.base == "movt" { 0x03400000 } else { 0x03000000 };
        Ok(m.cond_bits() | base | ((imm & 0xF000) << 4) | (rd << 12) | (imm & 0xFFF))
    }

    fn encode_miscellaneous(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let cond = m.cond_bits();
        expect_at_least(ops, 1)?;

        match m.base {
            "bx" => Ok(cond | 0x012FFF10 | reg(ops[0])?),
            "blx" if ops[0].starts_with('#') => {
                if m.cond != AL {
                    return Err("blx with an immediate cannot be conditional".to_string());
                }
                let offset = parse_imm(ops[0])? - 8;
                if offset % 2 != 0 {
                    return Err(format!("misaligned blx target {}", offset + 8));
                }
                let h = ((offset >> 1) & 1) as u32;
                Ok(0xFA000000 | (h << 24) | (((offset >> 2) as u32) & 0xFFFFFF))
            }
            "blx" => Ok(cond | 0x012FFF30 | reg(ops[0])?),
            "clz" => {
                expect_count(ops, 2)?;
                Ok(cond | 0x016F0F10 | (reg(ops[0])? << 12) | reg(ops[1])?)
            }
            "mrs" => {
                expect_count(ops, 2)?;
                let spsr = match ops[1] {
                    "apsr" | "cpsr" => 0,
                    "spsr" => 1,
                    other => return Err(format!("unknown status register '{}'", other)),
                };
                Ok(cond | 0x010F0000 | (spsr << 22) | (reg(ops[0])? << 12))
            }
            _ => {
                let imm = bounded_imm(ops[0], 0, 0xFFFF)?;
                Ok(0xE1200070 | ((imm & 0xFFF0) << 4) | (imm & 0xF))
            }
        }
    }

    fn encode_multiply(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let cond = m.cond_bits() | m.s_bit() | 0x90;

        match m.base {
            "mul" => {
                expect_count(ops, 3)?;
                Ok(cond | (reg(ops[0])? << 16) | (reg(ops[2])? << 8) | reg(ops[1])?)
            }
            "mla" | "mls" => {
                expect_count(ops, 4)?;
                let op = if m.base == "mla" { 0x00200000 } else { 0x00600000 };
                Ok(cond
                    | op
                    | (reg(ops[0])? << 16)
                    | (reg(ops[3])? << 12)
                    | (reg(ops[2])? << 8)
                    | reg(ops[1])?)
            }
            _ => {
                expect_count(ops, 4)?;
                let op = match m.base {
                    "umull" => 0x00800000,
                    "umlal" => 0x00A00000,
                    "smull" => 0x00C00000,
                    _ => 0x00E00000,
                };
                Ok(cond
                    | op
                    | (reg(ops[1])? << 16)
                    | (reg(ops[0])? << 12)
                    | (reg(ops[3])? << 8)
                    | reg(ops[2])?)
            }
        }
    }

    fn encode_exclusive(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let cond = m.cond_bits();
        let size = match m.base.chars().last() {
            Some('b') => 0x00400000,
            Some('h') => 0x00600000,
            _ => 0,
        };

        if m.base.starts_with("ldrex") {
            expect_count(ops, 2)?;
            let rn = plain_base(ops[1])?;
            Ok(cond | 0x01900F9F | size | (rn << 16) | (reg(ops[0])? << 12))
        } else {
            expect_count(ops, 3)?;
            let rn = plain_base(ops[2])?;
            Ok(cond | 0x01800F90 | size | (rn << 16) | (reg(ops[0])? << 12) | reg(ops[1])?)
        }
    }

    fn encode_extra_load_store(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let (op2, load) = match m.base {
            "strh" => (0b01, 0),
            "ldrh" => (0b01, 1),
            "ldrd" => (0b10, 0),
            "ldrsb" => (0b10, 1),
            "strd" => (0b11, 0),
            _ => (0b11, 1),
        };

        let dual = m.base.ends_with('d');
        let (rt, address_ops) = if dual {
            expect_at_least(ops, 3)?;
            let (rt, rt2) = (reg(ops[0])?, reg(ops[1])?);
            if rt & 1 == 1 || rt2 != rt + 1 {
                return Err("dual transfers need an even/odd register pair".to_string());
            }
            (rt, &ops[2..])
        } else {
            expect_at_least(ops, 2)?;
            (reg(ops[0])?, &ops[1..])
        };

        let address = parse_address(address_ops)?;
        let offset_bits = match address.offset {
            Offset::Immediate(imm) => {
                if imm > 0xFF {
                    return Err(format!("offset {} out of range", imm));
                }
                (1 << 22) | ((imm & 0xF0) << 4) | (imm & 0xF)
            }
            Offset::Register { rm, shift: 0, .. } => rm,
            Offset::Register { .. } => return Err("halfword transfers take no shift".to_string()),
        };

        Ok(m.cond_bits()
            | address.mode_bits()
            | (load << 20)
            | (address.rn << 16)
            | (rt << 12)
            | 0x90
            | (op2 << 5)
            | offset_bits)
    }

    fn encode_load_store(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        expect_at_least(ops, 2)?;
        let rt = reg(ops[0])?;
        let load = m.base.starts_with("ldr") as u32;
        let byte = m.base.ends_with('b') as u32;
        let address = parse_address(&ops[1..])?;

        let offset_bits = match address.offset {
            Offset::Immediate(imm) => {
                if imm > 0xFFF {
                    return Err(format!("offset {} out of range", imm));
                }
                imm
            }
            Offset::Register { rm, shift, .. } => (1 << 25) | shift | rm,
        };

        Ok(m.cond_bits()
            | 0x04000000
            | address.mode_bits()
            | (byte << 22)
            | (load << 20)
            | (address.rn << 16)
            | (rt << 12)
            | offset_bits)
    }

    fn encode_push_pop(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 1)?;
        let list = register_mask(ops[0])?;
        let push = m.base == "push";

        if list.count_ones() == 1 {
            let rt = list.trailing_zeros();
            let base = if push { 0x052D0004 } else { 0x049D0004 };
            return Ok(m.cond_bits() | base | (rt << 12));
        }

        let base = if push { 0x092D0000 } else { 0x08BD0000 };
        Ok(m.cond_bits() | base | list)
    }

    fn encode_block_transfer(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let load = m.base.starts_with("ldm") as u32;
        let (p, u) = match &m.base[3..] {
            "" | "ia" => (0, 1),
            "ib" => (1, 1),
            "da" => (0, 0),
            _ => (1, 0),
        };
        let (rn, writeback) = match ops[0].strip_suffix('!') {
            Some(rn) => (reg(rn)?, 1),
            None => (reg(ops[0])?, 0),
        };
        let list = register_mask(ops[1])?;

        Ok(m.cond_bits()
            | 0x08000000
            | (p << 24)
            | (u << 23)
            | (writeback << 21)
            | (load << 20)
            | (rn << 16)
            | list)
    }

    fn encode_media(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let cond = m.cond_bits();

        match m.base {
            "sxtb" | "sxth" | "uxtb" | "uxth" => {
                expect_at_least(ops, 2)?;
                let base = match m.base {
                    "sxtb" => 0x06AF0070,
                    "sxth" => 0x06BF0070,
                    "uxtb" => 0x06EF0070,
                    _ => 0x06FF0070,
                };
                let rotation = match ops.get(2) {
                    None => 0,
                    Some(op) => match op.strip_prefix("ror") {
                        Some(amount) => match parse_imm(amount)? {
                            0 => 0,
                            8 => 1,
                            16 => 2,
                            24 => 3,
                            other => return Err(format!("invalid rotation {}", other)),
                        },
                        None => return Err(format!("invalid rotation '{}'", op)),
                    },
                };
                Ok(cond | base | (reg(ops[0])? << 12) | (rotation << 10) | reg(ops[1])?)
            }
            "rev" | "rev16" | "revsh" | "rbit" => {
                expect_count(ops, 2)?;
                let base = match m.base {
                    "rev" => 0x06BF0F30,
                    "rev16" => 0x06BF0FB0,
                    "revsh" => 0x06FF0FB0,
                    _ => 0x06FF0F30,
                };
                Ok(cond | base | (reg(ops[0])? << 12) | reg(ops[1])?)
            }
            "sdiv" | "udiv" => {
                expect_count(ops, 3)?;
                let base = if m.base == "sdiv" { 0x0710F010 } else { 0x0730F010 };
                Ok(cond | base | (reg(ops[0])? << 16) | (reg(ops[2])? << 8) | reg(ops[1])?)
            }
            "ubfx" | "sbfx" => {
                expect_count(ops, 4)?;
                let (lsb, width) = bitfield(ops[2], ops[3])?;
                let base = if m.base == "ubfx" { 0x07E00050 } else { 0x07A00050 };
                Ok(cond | base | ((width - 1) << 16) | (reg(ops[0])? << 12) | (lsb << 7) | reg(ops[1])?)
            }
            "bfi" | "bfc" => {
                let (rn, field) = if m.base == "bfc" {
                    expect_count(ops, 3)?;
                    (15, &ops[1..])
                } else {
                    expect_count(ops, 4)?;
                    (reg(ops[1])?, &ops[2..])
                };
                let (lsb, width) = bitfield(field[0], field[1])?;
                let msb = lsb + width - 1;
                Ok(cond | 0x07C00010 | (msb << 16) | (reg(ops[0])? << 12) | (lsb << 7) | rn)
            }
            _ => {
                expect_count(ops, 1)?;
                let imm = bounded_imm(ops[0], 0, 0xFFFF)?;
                Ok(0xE7F000F0 | ((imm & 0xFFF0) << 4) | (imm & 0xF))
            }
        }
    }

    fn encode_branch(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 1)?;

        if m.base == "svc" {
            let imm = bounded_imm(ops[0], 0, 0xFFFFFF)?;
            return Ok(m.cond_bits() | 0x0F000000 | imm);
        }

        let offset = parse_imm(ops[0])? - 8;
        if offset % 4 != 0 {
            return Err(format!("misaligned branch target {}", offset + 8));
        }
        let link = (m.base == "bl") as u32;
        Ok(m.cond_bits() | 0x0A000000 | (link << 24) | (((offset >> 2) as u32) & 0xFFFFFF))
    }

    fn encode_unconditional(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        if m.cond != AL {
            return Err(format!("{} cannot be conditional", m.base));
        }

        match m.base {
            "clrex" => Ok(0xF57FF01F),
            "isb" => match ops {
                [] => Ok(0xF57FF06F),
                [option] => Ok(0xF57FF060 | barrier(option)?),
                _ => Err("isb takes at most one option".to_string()),
            },
            "dmb" | "dsb" => {
                expect_count(ops, 1)?;
                let base = if m.base == "dmb" { 0xF57FF050 } else { 0xF57FF040 };
                Ok(base | barrier(ops[0])?)
            }
            _ => {
                expect_count(ops, 1)?;
                let address = parse_address(ops)?;
                match (address.offset, address.index) {
                    (Offset::Immediate(imm), Indexing::Offset) if imm <= 0xFFF => {
                        Ok(0xF550F000 | ((address.up as u32) << 23) | (address.rn << 16) | imm)
                    }
                    _ => Err("pld takes a base register and an immediate offset".to_string()),
                }
            }
        }
    }

    fn encode_vfp(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let cond = m.cond_bits();

        match m.base {
            "vmrs" => {
                expect_count(ops, 2)?;
                let rt = match ops[0] {
                    "apsr_nzcv" => 15,
                    other => reg(other)?,
                };
                Ok(cond | 0x0EF10A10 | (rt << 12))
            }
            "vmsr" => {
                expect_count(ops, 2)?;
                Ok(cond | 0x0EE10A10 | (reg(ops[1])? << 12))
            }
            "vldr" | "vstr" => {
                expect_count(ops, 2)?;
                let vd = vfp(ops[0])?;
                let address = parse_address(&ops[1..])?;
                let imm = match (address.offset, address.index) {
                    (Offset::Immediate(imm), Indexing::Offset) if imm % 4 == 0 && imm / 4 <= 0xFF => imm / 4,
                    _ => return Err("vldr/vstr take an aligned immediate offset".to_string()),
                };
                let load = (m.base == "vldr") as u32;
                let (v, x) = vd.fields();
                Ok(cond
                    | 0x0D000A00
                    | ((address.up as u32) << 23)
                    | (x << 22)
                    | (load << 20)
                    | (address.rn << 16)
                    | (v << 12)
                    | ((vd.is_double() as u32) << 8)
                    | imm)
            }
            "vpush" | "vpop" => {
                expect_count(ops, 1)?;
                let regs = split_register_list(ops[0])
                    .ok_or_else(|| format!("expected register list, got '{}'", ops[0]))?
                    .iter()
                    .map(|r| vfp(r))
                    .collect::<Result<Vec<_>, _>>()?;
                let first = *regs.first().ok_or("empty register list")?;
                let consecutive = regs.windows(2).all(|w| match (w[0], w[1]) {
                    (VfpReg::Single(a), VfpReg::Single(b)) | (VfpReg::Double(a), VfpReg::Double(b)) => b == a + 1,
                    _ => false,
                });
                if !consecutive {
                    return Err("vpush/vpop need consecutive registers".to_string());
                }
                let count = regs.len() as u32;
                let words = if first.is_double() { count * 2 } else { count };
                let (v, x) = first.fields();
                let base = if m.base == "vpush" { 0x0D2D0A00 } else { 0x0CBD0A00 };
                Ok(cond | base | (x << 22) | (v << 12) | ((first.is_double() as u32) << 8) | words)
            }
            "vmov" if m.data_type.is_none() => Self::encode_vfp_transfer(m, ops),
            "vcvt" | "vcvtr" => Self::encode_vfp_convert(m, ops),
            _ => Self::encode_vfp_arithmetic(m, ops),
        }
    }

    fn encode_vfp_transfer(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let cond = m.cond_bits();

        match ops {
            [a, b] => {
                let (sn, rt, to_core) = match (VfpReg::parse(a), VfpReg::parse(b)) {
                    (Some(VfpReg::Single(_)), None) => (vfp(a)?, reg(b)?, 0),
                    (None, Some(VfpReg::Single(_))) => (vfp(b)?, reg(a)?, 1),
                    _ => return Err("vmov needs one core and one single register".to_string()),
                };
                let (v, x) = sn.fields();
                Ok(cond | 0x0E000A10 | (to_core << 20) | (v << 16) | (rt << 12) | (x << 7))
            }
            [a, b, c] => {
                let (dm, rt, rt2, to_core) = match VfpReg::parse(a) {
                    Some(dm @ VfpReg::Double(_)) => (dm, reg(b)?, reg(c)?, 0),
                    Some(_) => return Err("vmov pair transfers use a double register".to_string()),
                    None => match VfpReg::parse(c) {
                        Some(dm @ VfpReg::Double(_)) => (dm, reg(a)?, reg(b)?, 1),
                        _ => return Err("vmov pair transfers use a double register".to_string()),
                    },
                };
                let (v, x) = dm.fields();
                Ok(cond | 0x0C400B10 | (to_core << 20) | (rt2 << 16) | (rt << 12) | (x << 5) | v)
            }
            _ => Err(format!("vmov takes two or three operands, got {}", ops.len())),
        }
    }

    fn encode_vfp_convert(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let (vd, vm) = (vfp(ops[0])?, vfp(ops[1])?);
        let data_type = m.data_type.as_deref().ok_or("vcvt needs a data type")?;
        let round_zero = (m.base == "vcvt") as u32;

        let (double, opc2, bit7) = match data_type {
            "f64.f32" => (0, 0b0111, 1),
            "f32.f64" => (1, 0b0111, 1),
            "f32.s32" | "f64.s32" => (data_type.starts_with("f64") as u32, 0b1000, 1),
            "f32.u32" | "f64.u32" => (data_type.starts_with("f64") as u32, 0b1000, 0),
            "s32.f32" | "s32.f64" => (data_type.ends_with("f64") as u32, 0b1101, round_zero),
            "u32.f32" | "u32.f64" => (data_type.ends_with("f64") as u32, 0b1100, round_zero),
            other => return Err(format!("unsupported conversion '{}'", other)),
        };
        if m.base == "vcvtr" && opc2 & 0b1100 != 0b1100 {
            return Err("vcvtr only converts to integers".to_string());
        }

        let (dv, dx) = vd.fields();
        let (mv, mx) = vm.fields();
        Ok(m.cond_bits()
            | 0x0EB00A40
            | (dx << 22)
            | (opc2 << 16)
            | (dv << 12)
            | (double << 8)
            | (bit7 << 7)
            | (mx << 5)
            | mv)
    }

    fn encode_vfp_arithmetic(m: &Mnemonic, ops: &[&str]) -> EncodeResult {
        let double = match m.data_type.as_deref() {
            Some("f32") => false,
            Some("f64") => true,
            _ => return Err(format!("{} needs .f32 or .f64", m.base)),
        };
        let sz = (double as u32) << 8;
        let cond = m.cond_bits();

        let check = |r: VfpReg| {
            if r.is_double() == double {
                Ok(r)
            } else {
                Err(format!("register size does not match .{}", if double { "f64" } else { "f32" }))
            }
        };

        let three = match m.base {
            "vmla" => Some((0b000, 0)),
            "vmls" => Some((0b000, 1)),
            "vnmls" => Some((0b001, 0)),
            "vnmla" => Some((0b001, 1)),
            "vmul" => Some((0b010, 0)),
            "vnmul" => Some((0b010, 1)),
            "vadd" => Some((0b011, 0)),
            "vsub" => Some((0b011, 1)),
            "vdiv" => Some((0b100, 0)),
            _ => None,
        };

        if let Some((opc1, op)) = three {
            expect_count(ops, 3)?;
            let (vd, vn, vm) = (check(vfp(ops[0])?)?, check(vfp(ops[1])?)?, check(vfp(ops[2])?)?);
            let ((dv, dx), (nv, nx), (mv, mx)) = (vd.fields(), vn.fields(), vm.fields());
            return Ok(cond
                | 0x0E000A00
                | ((opc1 >> 2) << 23)
                | (dx << 22)
                | ((opc1 & 0x3) << 20)
                | (nv << 16)
                | (dv << 12)
                | sz
                | (nx << 7)
                | (op << 6)
                | (mx << 5)
                | mv);
        }

        expect_count(ops, 2)?;
        let vd = check(vfp(ops[0])?)?;
        let (dv, dx) = vd.fields();

        if ops[1].starts_with('#') {
            let (opc2, opc3_high) = match m.base {
                "vmov" => {
                    let value = parse_float(ops[1])?;
                    let imm8 = (0..=0xFFu32)
                        .find(|&imm| expand_fp_imm8(imm) == value)
                        .ok_or_else(|| format!("{} is not a VFP immediate", ops[1]))?;
                    return Ok(cond
                        | 0x0EB00A00
                        | (dx << 22)
                        | ((imm8 >> 4) << 16)
                        | (dv << 12)
                        | sz
                        | (imm8 & 0xF));
                }
                "vcmp" => (0b0101, 0),
                "vcmpe" => (0b0101, 1),
                _ => return Err(format!("{} has no immediate form", m.base)),
            };
            if parse_float(ops[1])? != 0.0 {
                return Err("compare immediate must be zero".to_string());
            }
            return Ok(cond | 0x0EB00A40 | (dx << 22) | (opc2 << 16) | (dv << 12) | sz | (opc3_high << 7));
        }

        let (opc2, opc3_high) = match m.base {
            "vmov" => (0b0000, 0),
            "vabs" => (0b0000, 1),
            "vneg" => (0b0001, 0),
            "vsqrt" => (0b0001, 1),
            "vcmp" => (0b0100, 0),
            "vcmpe" => (0b0100, 1),
            other => return Err(format!("unsupported VFP instruction '{}'", other)),
        };
        let vm = check(vfp(ops[1])?)?;
        let (mv, mx) = vm.fields();

        Ok(cond
            | 0x0EB00A40
            | (dx << 22)
            | (opc2 << 16)
            | (dv << 12)
            | sz
            | (opc3_high << 7)
            | (mx << 5)
            | mv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Indexing {
    Offset,
    Pre,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Offset {
    Immediate(u32),
    Register { rm: u32, shift: u32 },
}

struct Address {
    rn: u32,
    up: bool,
    offset: Offset,
    index: Indexing,
}

impl Address {
    /// P, U and W bits shared by every single-register transfer.
    fn mode_bits(&self) -> u32 {
        let (p, w) = match self.index {
            Indexing::Offset => (1, 0),
            Indexing::Pre => (1, 1),
            Indexing::Post => (0, 0),
        };
        (p << 24) | ((self.up as u32) << 23) | (w << 21)
    }
}

/// Parses `[rn]`, `[rn, off]`, `[rn, off]!` and `[rn], off` where `off` is `#imm`,
/// `rm`, `-rm` or a shifted register.
fn parse_address(ops: &[&str]) -> Result<Address, String> {
    let (parts, writeback) =
        split_memory(ops[0]).ok_or_else(|| format!("expected memory operand, got '{}'", ops[0]))?;
    let rn = reg(&parts[0])?;

    let (index, offset_parts) = match (parts.len(), ops.len(), writeback) {
        (1, 1, false) => (Indexing::Offset, Vec::new()),
        (1, 1, true) => (Indexing::Pre, Vec::new()),
        (1, _, false) => (Indexing::Post, ops[1..].iter().map(|s| s.to_string()).collect()),
        (_, 1, wb) => {
            let index = if wb { Indexing::Pre } else { Indexing::Offset };
            (index, parts[1..].to_vec())
        }
        _ => return Err("invalid addressing mode".to_string()),
    };

    let (up, offset) = match offset_parts.first() {
        None => (true, Offset::Immediate(0)),
        Some(first) if first.starts_with('#') => {
            if offset_parts.len() > 1 {
                return Err("immediate offsets take no shift".to_string());
            }
            let imm = parse_imm(first)?;
            (imm >= 0, Offset::Immediate(imm.unsigned_abs() as u32))
        }
        Some(first) => {
            let (up, name) = match first.strip_prefix('-') {
                Some(name) => (false, name),
                None => (true, first.trim_start_matches('+')),
            };
            let rm = reg(name)?;
            let shift = match offset_parts.get(1) {
                None => 0,
                Some(shift) => immediate_shift(shift)?,
            };
            (up, Offset::Register { rm, shift })
        }
    };

    Ok(Address { rn, up, offset, index })
}

/// Encodes the flexible second operand: `#imm`, `rm`, `rm, <shift> #n`, `rm, <shift> rs`
/// or `rm, rrx`.
fn encode_operand2(ops: &[&str]) -> EncodeResult {
    match ops {
        [imm] if imm.starts_with('#') => {
            let value = parse_imm(imm)? as u32;
            (0..16u32)
                .find(|rot| value.rotate_left(rot * 2) <= 0xFF)
                .map(|rot| (1 << 25) | (rot << 8) | value.rotate_left(rot * 2))
                .ok_or_else(|| format!("{} is not a modified immediate", imm))
        }
        [rm] => reg(rm),
        [rm, shift] => {
            let rm = reg(rm)?;
            let mut words = shift.split_whitespace();
            let kind_name = words.next().unwrap_or("");
            if kind_name == "rrx" {
                return Ok((3 << 5) | rm);
            }
            let kind = SHIFT_NAMES
                .iter()
                .position(|&s| s == kind_name)
                .ok_or_else(|| format!("invalid shift '{}'", shift))? as u32;
            let amount = words.next().ok_or_else(|| format!("shift '{}' has no amount", shift))?;
            if amount.starts_with('#') {
                let amount = shift_amount(kind, parse_imm(amount)?)?;
                Ok((amount << 7) | (kind << 5) | rm)
            } else {
                Ok((reg(amount)? << 8) | (kind << 5) | (1 << 4) | rm)
            }
        }
        _ => Err(format!("invalid operand list {:?}", ops)),
    }
}

fn immediate_shift(shift: &str) -> EncodeResult {
    if shift == "rrx" {
        return Ok(3 << 5);
    }
    let mut words = shift.split_whitespace();
    let name = words.next().unwrap_or("");
    let kind = SHIFT_NAMES
        .iter()
        .position(|&s| s == name)
        .ok_or_else(|| format!("invalid shift '{}'", shift))? as u32;
    let amount = words.next().ok_or_else(|| format!("shift '{}' has no amount", shift))?;
    let amount = shift_amount(kind, parse_imm(amount)?)?;
    Ok((amount << 7) | (kind << 5))
}

/// Maps a shift amount onto the 5-bit field, where 32 is stored as 0 for `lsr`/`asr`.
fn shift_amount(kind: u32, amount: i64) -> EncodeResult {
    match (kind, amount) {
        (0, 0..=31) => Ok(amount as u32),
        (1 | 2, 1..=31) => Ok(amount as u32),
        (1 | 2, 32) => Ok(0),
        (3, 1..=31) => Ok(amount as u32),
        _ => Err(format!("shift amount {} out of range", amount)),
    }
}

fn register_mask(op: &str) -> EncodeResult {
    let regs = split_register_list(op).ok_or_else(|| format!("expected register list, got '{}'", op))?;
    regs.iter().try_fold(0u32, |mask, r| Ok(mask | (1 << reg(r)?)))
}

fn bitfield(lsb: &str, width: &str) -> Result<(u32, u32), String> {
    let lsb = bounded_imm(lsb, 0, 31)?;
    let width = bounded_imm(width, 1, 32)?;
    if lsb + width > 32 {
        return Err(format!("bitfield #{}, #{} exceeds 32 bits", lsb, width));
    }
    Ok((lsb, width))
}

fn barrier(op: &str) -> EncodeResult {
    if op.starts_with('#') {
        return bounded_imm(op, 0, 15);
    }
    parse_barrier_option(op).ok_or_else(|| format!("unknown barrier option '{}'", op))
}

fn plain_base(op: &str) -> EncodeResult {
    match split_memory(op) {
        Some((parts, false)) if parts.len() == 1 => reg(&parts[0]),
        _ => Err(format!("expected plain base register, got '{}'", op)),
    }
}

fn reg(op: &str) -> EncodeResult {
    parse_reg(op).ok_or_else(|| format!("expected core register, got '{}'", op))
}

fn vfp(op: &str) -> Result<VfpReg, String> {
    VfpReg::parse(op).ok_or_else(|| format!("expected VFP register, got '{}'", op))
}

fn bounded_imm(op: &str, min: i64, max: i64) -> EncodeResult {
    let value = parse_imm(op)?;
    if (min..=max).contains(&value) {
        Ok(value as u32)
    } else {
        Err(format!("immediate {} out of range", op))
    }
}

fn parse_float(op: &str) -> Result<f64, String> {
    op.trim_start_matches('#')
        .parse::<f64>()
        .map_err(|_| format!("invalid floating-point immediate '{}'", op))
}

fn expect_count(ops: &[&str], count: usize) -> Result<(), String> {
    if ops.len() == count {
        Ok(())
    } else {
        Err(format!("expected {} operands, got {}", count, ops.len()))
    }
}

fn expect_at_least(ops: &[&str], count: usize) -> Result<(), String> {
    if ops.len() >= count {
        Ok(())
    } else {
        Err(format!("expected at least {} operands, got {}", count, ops.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::arm32::Arm32Decoder;

    fn encode(text: &str) -> u32 {
        Arm32Encoder::encode(text).unwrap()
    }

    #[test]
    fn test_mnemonic_parsing() {
        let m = Mnemonic::parse("addseq").unwrap();
        assert_eq!((m.base, m.set_flags, m.cond), ("add", true, 0));

        let m = Mnemonic::parse("bls").unwrap();
        assert_eq!((m.base, m.set_flags, m.cond), ("b", false, 9));

        let m = Mnemonic::parse("vaddne.f32").unwrap();
        assert_eq!((m.base, m.cond), ("vadd", 1));
        assert_eq!(m.data_type.as_deref(), Some("f32"));

        assert_eq!(Mnemonic::parse("bics").unwrap().base, "bic");
        assert_eq!(Mnemonic::parse("strexh").unwrap().base, "strexh");
        assert!(Mnemonic::parse("frob").is_none());
        assert!(Mnemonic::parse("movnv").is_none());
    }

    #[test]
    fn test_encode_known_words() {
        assert_eq!(encode("mov r0, r1"), 0xE1A00001);
        assert_eq!(encode("add r0, r1, r2"), 0xE0810002);
        assert_eq!(encode("add r0, r0, #1"), 0xE2800001);
        assert_eq!(encode("cmp r0, r1"), 0xE1500001);
        assert_eq!(encode("push {r4, r5, r6, lr}"), 0xE92D4070);
        assert_eq!(encode("push {r4}"), 0xE52D4004);
        assert_eq!(encode("bx lr"), 0xE12FFF1E);
        assert_eq!(encode("mul r0, r1, r2"), 0xE0000291);
        assert_eq!(encode("ldrex r0, [r1]"), 0xE1910F9F);
        assert_eq!(encode("sxtb r0, r1"), 0xE6AF0071);
        assert_eq!(encode("movw r0, #0x1234"), 0xE3010234);
        assert_eq!(encode("dmb ish"), 0xF57FF05B);
    }

    #[test]
    fn test_encode_vfp() {
        assert_eq!(encode("vadd.f32 s0, s1, s2"), 0xEE300A81);
        assert_eq!(encode("vmov.f32 s0, s1"), 0xEEB00A60);
        assert_eq!(encode("vcmpe.f32 s0, s1"), 0xEEB40AE0);
        assert_eq!(encode("vcvt.f64.f32 d0, s0"), 0xEEB70AC0);
        assert_eq!(encode("vcvt.s32.f32 s0, s0"), 0xEEBD0AC0);
        assert_eq!(encode("vmov r0, s1"), 0xEE100A90);
        assert_eq!(encode("vmrs apsr_nzcv, fpscr"), 0xEEF1FA10);
        assert_eq!(encode("vpush {d8, d9}"), 0xED2D8B04);
    }

    #[test]
    fn test_register_forms_survive_round_trip() {
        let words = [
            0xE0910002u32, // adds r0, r1, r2
            0x00810002,    // addeq r0, r1, r2
            0xE1A00211,    // lsl r0, r1, r2
            0xE0810102,    // add r0, r1, r2, lsl #2
            0xE7910002,    // ldr r0, [r1, r2]
            0xE5110004,    // ldr r0, [r1, #-4]
            0xE49D4004,    // pop {r4}
            0xE8BD8070,    // pop {r4, r5, r6, pc}
            0xE8900006,    // ldm r0, {r1, r2}
            0xE19100B2,    // ldrh r0, [r1, r2]
            0xE1C020D0,    // ldrd r2, r3, [r0]
            0xE1802F91,    // strex r2, r1, [r0]
            0xE0821394,    // umull r1, r2, r4, r3
            0xE710F110,    // sdiv r0, r0, r1
            0xE7E70251,    // ubfx r0, r1, #4, #8
            0xEC410B10,    // vmov d0, r0, r1
            0xED900B00,    // vldr d0, [r0]
            0xECBD8B04,    // vpop {d8, d9}
            0xEEB80AC0,    // vcvt.f32.s32 s0, s0
            0xEAFFFFFE,    // b #0x0
        ];
        for word in words {
            let text = Arm32Decoder::decode(word).unwrap();
            assert_eq!(Arm32Encoder::encode(&text), Ok(word), "{}", text);
        }
    }

    #[test]
    fn test_encode_rejects_garbage() {
        assert!(Arm32Encoder::encode("add r0, r1").is_err());
        assert!(Arm32Encoder::encode("mov r0, #0x101").is_err());
        assert!(Arm32Encoder::encode("ldrd r1, r2, [r0]").is_err());
        assert!(Arm32Encoder::encode(".inst 0xe7f000f0").is_err());
    }
}
