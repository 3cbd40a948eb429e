// Fri Oct 16 2026 - Alex

use super::simd::{decode_structure, decode_vector};
use super::{fp_kind, fpr, gpr, gpr_sp};
use crate::codec::operands::{
    barrier_option_name, condition_name, expand_fp_imm8, format_imm, format_target,
    invert_condition, sign_extend,
};

const EXTENDS: [&str; 8] = ["uxtb", "uxth", "uxtw", "uxtx", "sxtb", "sxth", "sxtw", "sxtx"];
const SHIFTS: [&str; 4] = ["lsl", "lsr", "asr", "ror"];

pub struct Arm64Decoder;

impl Arm64Decoder {
    /// Returns `None` for words in unallocated encoding space.
    pub fn decode(raw: u32) -> Option<String> {
        let op0 = (raw >> 25) & 0xF;

        match op0 {
            0b0000 => Self::decode_reserved(raw),
            0b0001 | 0b0010 | 0b0011 => None,
            0b1000 | 0b1001 => Some(Self::decode_data_processing_imm(raw)),
            0b1010 | 0b1011 => Some(Self::decode_branch_system(raw)),
            0b0100 | 0b0110 | 0b1100 | 0b1110 => Some(Self::decode_load_store(raw)),
            0b0101 | 0b1101 => Some(Self::decode_data_processing_reg(raw)),
            _ => Some(Self::decode_simd_fp(raw)),
        }
    }

    fn unknown(raw: u32) -> String {
        format!(".inst 0x{:08x}", raw)
    }

    fn decode_reserved(raw: u32) -> Option<String> {
        if raw >> 16 == 0 {
            Some(format!("udf {}", format_imm((raw & 0xFFFF) as i64)))
        } else {
            None
        }
    }

    fn decode_data_processing_imm(raw: u32) -> String {
        match (raw >> 23) & 0x7 {
            0b000 | 0b001 => Self::decode_pc_rel(raw),
            0b010 => Self::decode_add_sub_imm(raw),
            0b100 => Self::decode_logical_imm(raw),
            0b101 => Self::decode_move_wide(raw),
            0b110 => Self::decode_bitfield(raw),
            0b111 => Self::decode_extract(raw),
            _ => Self::unknown(raw),
        }
    }

    fn decode_pc_rel(raw: u32) -> String {
        let immlo = (raw >> 29) & 0x3;
        let immhi = (raw >> 5) & 0x7FFFF;
        let rd = raw & 0x1F;
        let imm = sign_extend((immhi << 2) | immlo, 21);

        if raw >> 31 == 1 {
            format!("adrp {}, {}", gpr(rd, true), format_target(imm << 12))
        } else {
            format!("adr {}, {}", gpr(rd, true), format_target(imm))
        }
    }

    fn decode_add_sub_imm(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op = (raw >> 30) & 1;
        let s = (raw >> 29) & 1;
        let sh = (raw >> 22) & 1;
        let imm12 = ((raw >> 10) & 0xFFF) as i64;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        let shift = if sh == 1 { ", lsl #12" } else { "" };

        if op == 0 && s == 0 && sh == 0 && imm12 == 0 && (rd == 31 || rn == 31) {
            return format!("mov {}, {}", gpr_sp(rd, sf), gpr_sp(rn, sf));
        }

        if s == 1 && rd == 31 {
            let mnemonic = if op == 1 { "cmp" } else { "cmn" };
            return format!("{} {}, {}{}", mnemonic, gpr_sp(rn, sf), format_imm(imm12), shift);
        }

        let mnemonic = match (op, s) {
            (0, 0) => "add",
            (0, _) => "adds",
            (_, 0) => "sub",
            _ => "subs",
        };
        let dest = if s == 1 { gpr(rd, sf) } else { gpr_sp(rd, sf) };

        format!("{} {}, {}, {}{}", mnemonic, dest, gpr_sp(rn, sf), format_imm(imm12), shift)
    }

    fn decode_logical_imm(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let opc = (raw >> 29) & 0x3;
        let n = (raw >> 22) & 1;
        let immr = (raw >> 16) & 0x3F;
        let imms = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if !sf && n == 1 {
            return Self::unknown(raw);
        }

        let width = if sf { 64 } else { 32 };
        let imm = match decode_bit_masks(n, imms, immr, width) {
            Some(imm) => imm,
            None => return Self::unknown(raw),
        };

        match opc {
            0b01 if rn == 31 => format!("mov {}, #0x{:x}", gpr_sp(rd, sf), imm),
            0b11 if rd == 31 => format!("tst {}, #0x{:x}", gpr(rn, sf), imm),
            _ => {
                let mnemonic = ["and", "orr", "eor", "ands"][opc as usize];
                let dest = if opc == 0b11 { gpr(rd, sf) } else { gpr_sp(rd, sf) };
                format!("{} {}, {}, #0x{:x}", mnemonic, dest, gpr(rn, sf), imm)
            }
        }
    }

    fn decode_move_wide(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let opc = (raw >> 29) & 0x3;
        let hw = (raw >> 21) & 0x3;
        let imm16 = ((raw >> 5) & 0xFFFF) as i64;
        let rd = raw & 0x1F;

        if !sf && hw >= 2 {
            return Self::unknown(raw);
        }

        let mnemonic = match opc {
            0b00 => "movn",
            0b10 => "movz",
            0b11 => "movk",
            _ => return Self::unknown(raw),
        };

        if opc == 0b10 && (hw == 0 || imm16 != 0) {
            return format!("mov {}, #0x{:x}", gpr(rd, sf), (imm16 as u64) << (hw * 16));
        }

        let shift = if hw != 0 { format!(", lsl #{}", hw * 16) } else { String::new() };
        format!("{} {}, {}{}", mnemonic, gpr(rd, sf), format_imm(imm16), shift)
    }

    fn decode_bitfield(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let opc = (raw >> 29) & 0x3;
        let n = (raw >> 22) & 1;
        let immr = (raw >> 16) & 0x3F;
        let imms = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        let width = if sf { 64 } else { 32 };
        if n != sf as u32 || immr >= width || imms >= width {
            return Self::unknown(raw);
        }

        match opc {
            0b00 => {
                if immr == 0 && imms == 7 {
                    format!("sxtb {}, {}", gpr(rd, sf), gpr(rn, false))
                } else if immr == 0 && imms == 15 {
                    format!("sxth {}, {}", gpr(rd, sf), gpr(rn, false))
                } else if sf && immr == 0 && imms == 31 {
                    format!("sxtw {}, {}", gpr(rd, sf), gpr(rn, false))
                } else if imms == width - 1 {
                    format!("asr {}, {}, {}", gpr(rd, sf), gpr(rn, sf), format_imm(immr as i64))
                } else {
                    format!(
                        "sbfm {}, {}, {}, {}",
                        gpr(rd, sf),
                        gpr(rn, sf),
                        format_imm(immr as i64),
                        format_imm(imms as i64)
                    )
                }
            }
            0b01 => format!(
                "bfm {}, {}, {}, {}",
                gpr(rd, sf),
                gpr(rn, sf),
                format_imm(immr as i64),
                format_imm(imms as i64)
            ),
            0b10 => {
                if !sf && immr == 0 && imms == 7 {
                    format!("uxtb {}, {}", gpr(rd, false), gpr(rn, false))
                } else if !sf && immr == 0 && imms == 15 {
                    format!("uxth {}, {}", gpr(rd, false), gpr(rn, false))
                } else if imms == width - 1 {
                    format!("lsr {}, {}, {}", gpr(rd, sf), gpr(rn, sf), format_imm(immr as i64))
                } else if imms + 1 == immr {
                    let shift = width - 1 - imms;
                    format!("lsl {}, {}, {}", gpr(rd, sf), gpr(rn, sf), format_imm(shift as i64))
                } else {
                    format!(
                        "ubfm {}, {}, {}, {}",
                        gpr(rd, sf),
                        gpr(rn, sf),
                        format_imm(immr as i64),
                        format_imm(imms as i64)
                    )
                }
            }
            _ => Self::unknown(raw),
        }
    }

    fn decode_extract(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let n = (raw >> 22) & 1;
        let o0 = (raw >> 21) & 1;
        let rm = (raw >> 16) & 0x1F;
        let imms = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if n != sf as u32 || o0 != 0 || (raw >> 29) & 0x3 != 0 || (!sf && imms >= 32) {
            return Self::unknown(raw);
        }

        if rn == rm {
            format!("ror {}, {}, {}", gpr(rd, sf), gpr(rn, sf), format_imm(imms as i64))
        } else {
            format!(
                "extr {}, {}, {}, {}",
                gpr(rd, sf),
                gpr(rn, sf),
                gpr(rm, sf),
                format_imm(imms as i64)
            )
        }
    }

    fn decode_branch_system(raw: u32) -> String {
        if raw & 0x7C000000 == 0x14000000 {
            let offset = sign_extend(raw & 0x03FFFFFF, 26) * 4;
            let mnemonic = if raw >> 31 == 1 { "bl" } else { "b" };
            return format!("{} {}", mnemonic, format_target(offset));
        }

        if raw & 0x7E000000 == 0x34000000 {
            let sf = raw >> 31 == 1;
            let mnemonic = if (raw >> 24) & 1 == 1 { "cbnz" } else { "cbz" };
            let offset = sign_extend((raw >> 5) & 0x7FFFF, 19) * 4;
            return format!("{} {}, {}", mnemonic, gpr(raw & 0x1F, sf), format_target(offset));
        }

        if raw & 0x7E000000 == 0x36000000 {
            let b5 = raw >> 31;
            let bit = (b5 << 5) | ((raw >> 19) & 0x1F);
            let mnemonic = if (raw >> 24) & 1 == 1 { "tbnz" } else { "tbz" };
            let offset = sign_extend((raw >> 5) & 0x3FFF, 14) * 4;
            return format!(
                "{} {}, {}, {}",
                mnemonic,
                gpr(raw & 0x1F, b5 == 1),
                format_imm(bit as i64),
                format_target(offset)
            );
        }

        if raw & 0xFF000010 == 0x54000000 {
            let offset = sign_extend((raw >> 5) & 0x7FFFF, 19) * 4;
            return format!("b.{} {}", condition_name(raw & 0xF), format_target(offset));
        }

        if raw & 0xFF000000 == 0xD4000000 {
            return Self::decode_exception(raw);
        }

        if raw & 0xFFC00000 == 0xD5000000 {
            return Self::decode_system(raw);
        }

        if raw & 0xFE000000 == 0xD6000000 {
            return Self::decode_branch_register(raw);
        }

        Self::unknown(raw)
    }

    fn decode_exception(raw: u32) -> String {
        let opc = (raw >> 21) & 0x7;
        let ll = raw & 0x3;
        let imm16 = ((raw >> 5) & 0xFFFF) as i64;
        if (raw >> 2) & 0x7 != 0 {
            return Self::unknown(raw);
        }

        let mnemonic = match (opc, ll) {
            (0b000, 0b01) => "svc",
            (0b000, 0b10) => "hvc",
            (0b000, 0b11) => "smc",
            (0b001, 0b00) => "brk",
            (0b010, 0b00) => "hlt",
            _ => return Self::unknown(raw),
        };

        format!("{} {}", mnemonic, format_imm(imm16))
    }

    fn decode_system(raw: u32) -> String {
        let l = (raw >> 21) & 1;
        let op0 = (raw >> 19) & 0x3;
        let op1 = (raw >> 16) & 0x7;
        let crn = (raw >> 12) & 0xF;
        let crm = (raw >> 8) & 0xF;
        let op2 = (raw >> 5) & 0x7;
        let rt = raw & 0x1F;

        if l == 0 && op0 == 0 && crn == 2 && op1 == 3 && rt == 31 {
            let hint = (crm << 3) | op2;
            return match hint_name(hint) {
                Some(name) => name.to_string(),
                None => format!("hint {}", format_imm(hint as i64)),
            };
        }

        if l == 0 && op0 == 0 && crn == 3 && op1 == 3 && rt == 31 {
            return match op2 {
                0b010 if crm == 0xF => "clrex".to_string(),
                0b010 => format!("clrex {}", format_imm(crm as i64)),
                0b100 | 0b101 => {
                    let mnemonic = if op2 == 0b100 { "dsb" } else { "dmb" };
                    match barrier_option_name(crm) {
                        Some(option) => format!("{} {}", mnemonic, option),
                        None => format!("{} {}", mnemonic, format_imm(crm as i64)),
                    }
                }
                0b110 if crm == 0xF => "isb".to_string(),
                0b110 => format!("isb {}", format_imm(crm as i64)),
                _ => Self::unknown(raw),
            };
        }

        if op0 >= 2 {
            let sysreg = system_register_name(op0, op1, crn, crm, op2);
            return if l == 1 {
                format!("mrs {}, {}", gpr(rt, true), sysreg)
            } else {
                format!("msr {}, {}", sysreg, gpr(rt, true))
            };
        }

        Self::unknown(raw)
    }

    fn decode_branch_register(raw: u32) -> String {
        let opc = (raw >> 21) & 0xF;
        let op2 = (raw >> 16) & 0x1F;
        let op3 = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let op4 = raw & 0x1F;

        if op2 != 0x1F || op3 != 0 || op4 != 0 {
            return Self::unknown(raw);
        }

        match opc {
            0b0000 => format!("br {}", gpr(rn, true)),
            0b0001 => format!("blr {}", gpr(rn, true)),
            0b0010 if rn == 30 => "ret".to_string(),
            0b0010 => format!("ret {}", gpr(rn, true)),
            0b0100 if rn == 31 => "eret".to_string(),
            0b0101 if rn == 31 => "drps".to_string(),
            _ => Self::unknown(raw),
        }
    }

    fn decode_load_store(raw: u32) -> String {
        if raw & 0x3F000000 == 0x08000000 {
            return Self::decode_exclusive(raw);
        }
        if raw & 0x3B000000 == 0x18000000 {
            return Self::decode_literal(raw);
        }
        if raw & 0x3A000000 == 0x28000000 {
            return Self::decode_pair(raw);
        }
        if raw & 0x3B000000 == 0x39000000 {
            return Self::decode_unsigned_offset(raw);
        }
        if raw & 0x3B200000 == 0x38000000 {
            return Self::decode_imm9(raw);
        }
        if raw & 0x3B200C00 == 0x38200800 {
            return Self::decode_register_offset(raw);
        }
        if raw & 0x3F200C00 == 0x38200000 {
            return Self::decode_atomic(raw);
        }
        if raw & 0xBF200000 == 0x0C000000 {
            return decode_structure(raw).unwrap_or_else(|| Self::unknown(raw));
        }

        Self::unknown(raw)
    }

    /// LSE atomic memory operations and their `st*` aliases.
    fn decode_atomic(raw: u32) -> String {
        let size = raw >> 30;
        let a = (raw >> 23) & 1;
        let r = (raw >> 22) & 1;
        let rs = (raw >> 16) & 0x1F;
        let o3 = (raw >> 15) & 1;
        let opc = (raw >> 12) & 0x7;
        let rn = (raw >> 5) & 0x1F;
        let rt = raw & 0x1F;

        let wide = size == 0b11;
        let suffix = size_suffix(size);
        let order = ORDERINGS[((r << 1) | a) as usize].2;
        let address = format!("[{}]", gpr_sp(rn, true));

        match (o3, opc) {
            (0, _) if a == 0 && rt == 31 => format!(
                "st{}{}{} {}, {}",
                ATOMIC_OPS[opc as usize],
                order,
                suffix,
                gpr(rs, wide),
                address
            ),
            (0, _) => format!(
                "ld{}{}{} {}, {}, {}",
                ATOMIC_OPS[opc as usize],
                order,
                suffix,
                gpr(rs, wide),
                gpr(rt, wide),
                address
            ),
            (1, 0b000) => format!("swp{}{} {}, {}, {}", order, suffix, gpr(rs, wide), gpr(rt, wide), address),
            _ => Self::unknown(raw),
        }
    }

    fn decode_exclusive(raw: u32) -> String {
        let size = raw >> 30;
        let o2 = (raw >> 23) & 1;
        let l = (raw >> 22) & 1;
        let o1 = (raw >> 21) & 1;
        let rs = (raw >> 16) & 0x1F;
        let o0 = (raw >> 15) & 1;
        let rt2 = (raw >> 10) & 0x1F;
        let rn = (raw >> 5) & 0x1F;
        let rt = raw & 0x1F;

        if rt2 != 31 {
            return Self::unknown(raw);
        }
        if o1 == 1 {
            if o2 == 0 {
                return Self::unknown(raw);
            }
            let order = ORDERINGS[((o0 << 1) | l) as usize].2;
            let wide = size == 0b11;
            return format!(
                "cas{}{} {}, {}, [{}]",
                order,
                size_suffix(size),
                gpr(rs, wide),
                gpr(rt, wide),
                gpr_sp(rn, true)
            );
        }

        let base = match (o2, l, o0) {
            (0, 0, 0) => "stxr",
            (0, 0, 1) => "stlxr",
            (0, 1, 0) => "ldxr",
            (0, 1, 1) => "ldaxr",
            (1, 0, 0) => "stllr",
            (1, 0, 1) => "stlr",
            (1, 1, 0) => "ldlar",
            _ => "ldar",
        };
        let suffix = match size {
            0b00 => "b",
            0b01 => "h",
            _ => "",
        };
        let target = gpr(rt, size == 0b11);
        let address = format!("[{}]", gpr_sp(rn, true));

        if o2 == 0 && l == 0 {
            format!("{}{} {}, {}, {}", base, suffix, gpr(rs, false), target, address)
        } else if rs == 31 {
            format!("{}{} {}, {}", base, suffix, target, address)
        } else {
            Self::unknown(raw)
        }
    }

    fn decode_literal(raw: u32) -> String {
        let opc = raw >> 30;
        let v = (raw >> 26) & 1;
        let rt = raw & 0x1F;
        let target = format_target(sign_extend((raw >> 5) & 0x7FFFF, 19) * 4);

        let (mnemonic, reg) = match (v, opc) {
            (0, 0b00) => ("ldr", gpr(rt, false)),
            (0, 0b01) => ("ldr", gpr(rt, true)),
            (0, 0b10) => ("ldrsw", gpr(rt, true)),
            (0, _) => ("prfm", prefetch_name(rt)),
            (_, 0b00) => ("ldr", fpr(rt, 's')),
            (_, 0b01) => ("ldr", fpr(rt, 'd')),
            (_, 0b10) => ("ldr", fpr(rt, 'q')),
            _ => return Self::unknown(raw),
        };

        format!("{} {}, {}", mnemonic, reg, target)
    }

    fn decode_pair(raw: u32) -> String {
        let opc = raw >> 30;
        let v = (raw >> 26) & 1;
        let kind = (raw >> 23) & 0x3;
        let l = (raw >> 22) & 1;
        let imm7 = (raw >> 15) & 0x7F;
        let rt2 = (raw >> 10) & 0x1F;
        let rn = (raw >> 5) & 0x1F;
        let rt = raw & 0x1F;

        let (reg_kind, scale, signed_word) = match (v, opc) {
            (0, 0b00) => ('w', 2, false),
            (0, 0b01) if l == 1 && kind != 0 => ('x', 2, true),
            (0, 0b10) => ('x', 3, false),
            (1, 0b00) => ('s', 2, false),
            (1, 0b01) => ('d', 3, false),
            (1, 0b10) => ('q', 4, false),
            _ => return Self::unknown(raw),
        };

        let reg = |n: u32| match reg_kind {
            'w' => gpr(n, false),
            'x' => gpr(n, true),
            k => fpr(n, k),
        };

        let mnemonic = match (signed_word, kind, l) {
            (true, _, _) => "ldpsw",
            (false, 0b00, 0) => "stnp",
            (false, 0b00, _) => "ldnp",
            (false, _, 0) => "stp",
            _ => "ldp",
        };

        let offset = sign_extend(imm7, 7) << scale;
        let base = gpr_sp(rn, true);
        let address = match kind {
            0b01 => format!("[{}], {}", base, format_imm(offset)),
            0b11 => format!("[{}, {}]!", base, format_imm(offset)),
            _ if offset == 0 => format!("[{}]", base),
            _ => format!("[{}, {}]", base, format_imm(offset)),
        };

        format!("{} {}, {}, {}", mnemonic, reg(rt), reg(rt2), address)
    }

    fn decode_unsigned_offset(raw: u32) -> String {
        let size = raw >> 30;
        let v = (raw >> 26) & 1;
        let opc = (raw >> 22) & 0x3;
        let imm12 = ((raw >> 10) & 0xFFF) as i64;
        let rn = (raw >> 5) & 0x1F;
        let rt = raw & 0x1F;

        let base = gpr_sp(rn, true);

        if v == 0 && size == 0b11 && opc == 0b10 {
            let offset = imm12 << 3;
            return if offset == 0 {
                format!("prfm {}, [{}]", prefetch_name(rt), base)
            } else {
                format!("prfm {}, [{}, {}]", prefetch_name(rt), base, format_imm(offset))
            };
        }

        let access = match single_access(size, v, opc) {
            Some(access) => access,
            None => return Self::unknown(raw),
        };

        let offset = imm12 << access.scale;
        if offset == 0 {
            format!("{} {}, [{}]", access.mnemonic, access.reg(rt), base)
        } else {
            format!("{} {}, [{}, {}]", access.mnemonic, access.reg(rt), base, format_imm(offset))
        }
    }

    fn decode_imm9(raw: u32) -> String {
        let size = raw >> 30;
        let v = (raw >> 26) & 1;
        let opc = (raw >> 22) & 0x3;
        let imm9 = sign_extend((raw >> 12) & 0x1FF, 9);
        let kind = (raw >> 10) & 0x3;
        let rn = (raw >> 5) & 0x1F;
        let rt = raw & 0x1F;

        let base = gpr_sp(rn, true);

        if v == 0 && size == 0b11 && opc == 0b10 {
            if kind != 0b00 {
                return Self::unknown(raw);
            }
            return if imm9 == 0 {
                format!("prfum {}, [{}]", prefetch_name(rt), base)
            } else {
                format!("prfum {}, [{}, {}]", prefetch_name(rt), base, format_imm(imm9))
            };
        }

        let access = match single_access(size, v, opc) {
            Some(access) => access,
            None => return Self::unknown(raw),
        };
        let reg = access.reg(rt);

        match kind {
            0b00 => {
                let mnemonic = unscaled_mnemonic(access.mnemonic);
                if imm9 == 0 {
                    format!("{} {}, [{}]", mnemonic, reg, base)
                } else {
                    format!("{} {}, [{}, {}]", mnemonic, reg, base, format_imm(imm9))
                }
            }
            0b01 => format!("{} {}, [{}], {}", access.mnemonic, reg, base, format_imm(imm9)),
            0b11 => format!("{} {}, [{}, {}]!", access.mnemonic, reg, base, format_imm(imm9)),
            _ => Self::unknown(raw),
        }
    }

    fn decode_register_offset(raw: u32) -> String {
        let size = raw >> 30;
        let v = (raw >> 26) & 1;
        let opc = (raw >> 22) & 0x3;
        let rm = (raw >> 16) & 0x1F;
        let option = (raw >> 13) & 0x7;
        let s = (raw >> 12) & 1;
        let rn = (raw >> 5) & 0x1F;
        let rt = raw & 0x1F;

        let (mnemonic, target, scale) = if v == 0 && size == 0b11 && opc == 0b10 {
            ("prfm", prefetch_name(rt), 3)
        } else {
            match single_access(size, v, opc) {
                Some(access) => (access.mnemonic, access.reg(rt), access.scale),
                None => return Self::unknown(raw),
            }
        };

        let index = match option {
            0b011 | 0b111 => gpr(rm, true),
            0b010 | 0b110 => gpr(rm, false),
            _ => return Self::unknown(raw),
        };

        let amount = if s == 1 { scale } else { 0 };
        let base = gpr_sp(rn, true);
        let extend = match (option, s) {
            (0b011, 0) => String::new(),
            (0b011, _) => format!(", lsl #{}", amount),
            (_, 0) => format!(", {}", EXTENDS[option as usize]),
            _ => format!(", {} #{}", EXTENDS[option as usize], amount),
        };

        format!("{} {}, [{}, {}{}]", mnemonic, target, base, index, extend)
    }

    fn decode_data_processing_reg(raw: u32) -> String {
        let op1 = (raw >> 28) & 1;
        let op2 = (raw >> 21) & 0xF;

        if op1 == 0 {
            return if op2 & 0b1000 == 0 {
                Self::decode_logical_shifted(raw)
            } else if op2 & 0b0001 == 0 {
                Self::decode_add_sub_shifted(raw)
            } else {
                Self::decode_add_sub_extended(raw)
            };
        }

        match op2 {
            0b0000 => Self::decode_add_sub_carry(raw),
            0b0010 => Self::decode_conditional_compare(raw),
            0b0100 => Self::decode_conditional_select(raw),
            0b0110 if (raw >> 30) & 1 == 0 => Self::decode_two_source(raw),
            0b0110 => Self::decode_one_source(raw),
            op2 if op2 & 0b1000 != 0 => Self::decode_three_source(raw),
            _ => Self::unknown(raw),
        }
    }

    fn decode_logical_shifted(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let opc = (raw >> 29) & 0x3;
        let shift = (raw >> 22) & 0x3;
        let n = (raw >> 21) & 1;
        let rm = (raw >> 16) & 0x1F;
        let imm6 = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if !sf && imm6 >= 32 {
            return Self::unknown(raw);
        }

        let shift_text = shift_suffix(shift, imm6);

        if opc == 0b01 && n == 0 && rn == 31 && shift == 0 && imm6 == 0 {
            return format!("mov {}, {}", gpr(rd, sf), gpr(rm, sf));
        }
        if opc == 0b01 && n == 1 && rn == 31 {
            return format!("mvn {}, {}{}", gpr(rd, sf), gpr(rm, sf), shift_text);
        }
        if opc == 0b11 && n == 0 && rd == 31 {
            return format!("tst {}, {}{}", gpr(rn, sf), gpr(rm, sf), shift_text);
        }

        let mnemonic = match (opc, n) {
            (0b00, 0) => "and",
            (0b00, _) => "bic",
            (0b01, 0) => "orr",
            (0b01, _) => "orn",
            (0b10, 0) => "eor",
            (0b10, _) => "eon",
            (_, 0) => "ands",
            _ => "bics",
        };

        format!("{} {}, {}, {}{}", mnemonic, gpr(rd, sf), gpr(rn, sf), gpr(rm, sf), shift_text)
    }

    fn decode_add_sub_shifted(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op = (raw >> 30) & 1;
        let s = (raw >> 29) & 1;
        let shift = (raw >> 22) & 0x3;
        let rm = (raw >> 16) & 0x1F;
        let imm6 = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if shift == 0b11 || (!sf && imm6 >= 32) {
            return Self::unknown(raw);
        }

        let shift_text = shift_suffix(shift, imm6);

        if s == 1 && rd == 31 {
            let mnemonic = if op == 1 { "cmp" } else { "cmn" };
            return format!("{} {}, {}{}", mnemonic, gpr(rn, sf), gpr(rm, sf), shift_text);
        }
        if op == 1 && rn == 31 {
            let mnemonic = if s == 1 { "negs" } else { "neg" };
            return format!("{} {}, {}{}", mnemonic, gpr(rd, sf), gpr(rm, sf), shift_text);
        }

        let mnemonic = ["add", "adds", "sub", "subs"][((op << 1) | s) as usize];
        format!("{} {}, {}, {}{}", mnemonic, gpr(rd, sf), gpr(rn, sf), gpr(rm, sf), shift_text)
    }

    fn decode_add_sub_extended(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op = (raw >> 30) & 1;
        let s = (raw >> 29) & 1;
        let opt = (raw >> 22) & 0x3;
        let rm = (raw >> 16) & 0x1F;
        let option = (raw >> 13) & 0x7;
        let imm3 = (raw >> 10) & 0x7;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if opt != 0 || imm3 > 4 {
            return Self::unknown(raw);
        }

        let index = gpr(rm, sf && option & 0b011 == 0b011);
        let sp_involved = rn == 31 || (s == 0 && rd == 31);
        let lsl_option = if sf { 0b011 } else { 0b010 };

        let extend = if sp_involved && option == lsl_option {
            if imm3 == 0 {
                String::new()
            } else {
                format!(", lsl #{}", imm3)
            }
        } else if imm3 == 0 {
            format!(", {}", EXTENDS[option as usize])
        } else {
            format!(", {} #{}", EXTENDS[option as usize], imm3)
        };

        if s == 1 && rd == 31 {
            let mnemonic = if op == 1 { "cmp" } else { "cmn" };
            return format!("{} {}, {}{}", mnemonic, gpr_sp(rn, sf), index, extend);
        }

        let mnemonic = ["add", "adds", "sub", "subs"][((op << 1) | s) as usize];
        let dest = if s == 1 { gpr(rd, sf) } else { gpr_sp(rd, sf) };
        format!("{} {}, {}, {}{}", mnemonic, dest, gpr_sp(rn, sf), index, extend)
    }

    fn decode_add_sub_carry(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op = (raw >> 30) & 1;
        let s = (raw >> 29) & 1;
        let rm = (raw >> 16) & 0x1F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if (raw >> 10) & 0x3F != 0 {
            return Self::unknown(raw);
        }

        let mnemonic = ["adc", "adcs", "sbc", "sbcs"][((op << 1) | s) as usize];
        format!("{} {}, {}, {}", mnemonic, gpr(rd, sf), gpr(rn, sf), gpr(rm, sf))
    }

    fn decode_conditional_compare(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op = (raw >> 30) & 1;
        let s = (raw >> 29) & 1;
        let rm = (raw >> 16) & 0x1F;
        let cond = (raw >> 12) & 0xF;
        let is_imm = (raw >> 11) & 1 == 1;
        let rn = (raw >> 5) & 0x1F;
        let nzcv = (raw & 0xF) as i64;

        if s == 0 || (raw >> 10) & 1 != 0 || (raw >> 4) & 1 != 0 {
            return Self::unknown(raw);
        }

        let mnemonic = if op == 1 { "ccmp" } else { "ccmn" };
        let second = if is_imm { format_imm(rm as i64) } else { gpr(rm, sf) };
        format!(
            "{} {}, {}, {}, {}",
            mnemonic,
            gpr(rn, sf),
            second,
            format_imm(nzcv),
            condition_name(cond)
        )
    }

    fn decode_conditional_select(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op = (raw >> 30) & 1;
        let s = (raw >> 29) & 1;
        let rm = (raw >> 16) & 0x1F;
        let cond = (raw >> 12) & 0xF;
        let op2 = (raw >> 10) & 0x3;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if s == 1 || op2 & 0b10 != 0 {
            return Self::unknown(raw);
        }

        let invertible = cond & 0xE != 0xE;
        let inverted = condition_name(invert_condition(cond));

        match (op, op2) {
            (0, 0) => format!(
                "csel {}, {}, {}, {}",
                gpr(rd, sf),
                gpr(rn, sf),
                gpr(rm, sf),
                condition_name(cond)
            ),
            (0, _) if invertible && rn == 31 && rm == 31 => {
                format!("cset {}, {}", gpr(rd, sf), inverted)
            }
            (0, _) if invertible && rn == rm => {
                format!("cinc {}, {}, {}", gpr(rd, sf), gpr(rn, sf), inverted)
            }
            (1, 0) if invertible && rn == 31 && rm == 31 => {
                format!("csetm {}, {}", gpr(rd, sf), inverted)
            }
            (1, 0) if invertible && rn == rm => {
                format!("cinv {}, {}, {}", gpr(rd, sf), gpr(rn, sf), inverted)
            }
            (1, 1) if invertible && rn == rm => {
                format!("cneg {}, {}, {}", gpr(rd, sf), gpr(rn, sf), inverted)
            }
            _ => {
                let mnemonic = ["csel", "csinc", "csinv", "csneg"][((op << 1) | op2) as usize];
                format!(
                    "{} {}, {}, {}, {}",
                    mnemonic,
                    gpr(rd, sf),
                    gpr(rn, sf),
                    gpr(rm, sf),
                    condition_name(cond)
                )
            }
        }
    }

    fn decode_two_source(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let rm = (raw >> 16) & 0x1F;
        let opcode = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if (raw >> 29) & 1 != 0 {
            return Self::unknown(raw);
        }

        let mnemonic = match opcode {
            0b000010 => "udiv",
            0b000011 => "sdiv",
            0b001000 => "lsl",
            0b001001 => "lsr",
            0b001010 => "asr",
            0b001011 => "ror",
            _ => return Self::unknown(raw),
        };

        format!("{} {}, {}, {}", mnemonic, gpr(rd, sf), gpr(rn, sf), gpr(rm, sf))
    }

    fn decode_one_source(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let opcode2 = (raw >> 16) & 0x1F;
        let opcode = (raw >> 10) & 0x3F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if (raw >> 29) & 1 != 0 || opcode2 != 0 {
            return Self::unknown(raw);
        }

        let mnemonic = match (opcode, sf) {
            (0, _) => "rbit",
            (1, _) => "rev16",
            (2, true) => "rev32",
            (2, false) => "rev",
            (3, true) => "rev",
            (4, _) => "clz",
            (5, _) => "cls",
            _ => return Self::unknown(raw),
        };

        format!("{} {}, {}", mnemonic, gpr(rd, sf), gpr(rn, sf))
    }

    fn decode_three_source(raw: u32) -> String {
        let sf = (raw >> 31) & 1 == 1;
        let op54 = (raw >> 29) & 0x3;
        let op31 = (raw >> 21) & 0x7;
        let rm = (raw >> 16) & 0x1F;
        let o0 = (raw >> 15) & 1;
        let ra = (raw >> 10) & 0x1F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if op54 != 0 {
            return Self::unknown(raw);
        }

        match (op31, o0) {
            (0b000, _) => {
                let (full, short) = if o0 == 0 { ("madd", "mul") } else { ("msub", "mneg") };
                if ra == 31 {
                    format!("{} {}, {}, {}", short, gpr(rd, sf), gpr(rn, sf), gpr(rm, sf))
                } else {
                    format!(
                        "{} {}, {}, {}, {}",
                        full,
                        gpr(rd, sf),
                        gpr(rn, sf),
                        gpr(rm, sf),
                        gpr(ra, sf)
                    )
                }
            }
            (0b001, _) | (0b101, _) if sf => {
                let signed = op31 == 0b001;
                let (full, short) = match (signed, o0) {
                    (true, 0) => ("smaddl", "smull"),
                    (true, _) => ("smsubl", "smnegl"),
                    (false, 0) => ("umaddl", "umull"),
                    (false, _) => ("umsubl", "umnegl"),
                };
                if ra == 31 {
                    format!("{} {}, {}, {}", short, gpr(rd, true), gpr(rn, false), gpr(rm, false))
                } else {
                    format!(
                        "{} {}, {}, {}, {}",
                        full,
                        gpr(rd, true),
                        gpr(rn, false),
                        gpr(rm, false),
                        gpr(ra, true)
                    )
                }
            }
            (0b010, 0) | (0b110, 0) if sf && ra == 31 => {
                let mnemonic = if op31 == 0b010 { "smulh" } else { "umulh" };
                format!("{} {}, {}, {}", mnemonic, gpr(rd, true), gpr(rn, true), gpr(rm, true))
            }
            _ => Self::unknown(raw),
        }
    }

    fn decode_simd_fp(raw: u32) -> String {
        if raw & 0x5F200000 == 0x1E200000 {
            return Self::decode_fp_data_processing(raw);
        }
        if raw & 0xDF000000 == 0x1F000000 {
            return Self::decode_fp_three_source(raw);
        }
        decode_vector(raw).unwrap_or_else(|| Self::unknown(raw))
    }

    fn decode_fp_data_processing(raw: u32) -> String {
        let kind = match fp_kind((raw >> 22) & 0x3) {
            Some(kind) => kind,
            None => return Self::unknown(raw),
        };

        if (raw >> 10) & 0x3F == 0 {
            return Self::decode_fp_conversion(raw, kind);
        }

        if raw >> 31 != 0 || (raw >> 29) & 1 != 0 {
            return Self::unknown(raw);
        }

        let rm = (raw >> 16) & 0x1F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        match (raw >> 10) & 0x3 {
            0b01 => {
                let mnemonic = if (raw >> 4) & 1 == 1 { "fccmpe" } else { "fccmp" };
                return format!(
                    "{} {}, {}, {}, {}",
                    mnemonic,
                    fpr(rn, kind),
                    fpr(rm, kind),
                    format_imm((raw & 0xF) as i64),
                    condition_name((raw >> 12) & 0xF)
                );
            }
            0b10 => {
                let mnemonic = match (raw >> 12) & 0xF {
                    0 => "fmul",
                    1 => "fdiv",
                    2 => "fadd",
                    3 => "fsub",
                    4 => "fmax",
                    5 => "fmin",
                    6 => "fmaxnm",
                    7 => "fminnm",
                    8 => "fnmul",
                    _ => return Self::unknown(raw),
                };
                return format!("{} {}, {}, {}", mnemonic, fpr(rd, kind), fpr(rn, kind), fpr(rm, kind));
            }
            0b11 => {
                return format!(
                    "fcsel {}, {}, {}, {}",
                    fpr(rd, kind),
                    fpr(rn, kind),
                    fpr(rm, kind),
                    condition_name((raw >> 12) & 0xF)
                );
            }
            _ => {}
        }

        if (raw >> 10) & 0x7 == 0b100 {
            if (raw >> 5) & 0x1F != 0 {
                return Self::unknown(raw);
            }
            let imm8 = (raw >> 13) & 0xFF;
            return format!("fmov {}, #{:.8}", fpr(rd, kind), expand_fp_imm8(imm8));
        }

        if (raw >> 10) & 0xF == 0b1000 {
            if (raw >> 14) & 0x3 != 0 {
                return Self::unknown(raw);
            }
            let mnemonic = match raw & 0x1F {
                0b00000 => return format!("fcmp {}, {}", fpr(rn, kind), fpr(rm, kind)),
                0b01000 => "fcmp",
                0b10000 => return format!("fcmpe {}, {}", fpr(rn, kind), fpr(rm, kind)),
                0b11000 => "fcmpe",
                _ => return Self::unknown(raw),
            };
            return format!("{} {}, #0.0", mnemonic, fpr(rn, kind));
        }

        if (raw >> 10) & 0x1F == 0b10000 {
            let opcode = (raw >> 15) & 0x3F;
            let mnemonic = match opcode {
                0b000000 => "fmov",
                0b000001 => "fabs",
                0b000010 => "fneg",
                0b000011 => "fsqrt",
                0b000100 | 0b000101 | 0b000111 => {
                    let dest = match fp_kind(opcode & 0x3) {
                        Some(dest) if dest != kind => dest,
                        _ => return Self::unknown(raw),
                    };
                    return format!("fcvt {}, {}", fpr(rd, dest), fpr(rn, kind));
                }
                0b001000 => "frintn",
                0b001001 => "frintp",
                0b001010 => "frintm",
                0b001011 => "frintz",
                0b001100 => "frinta",
                0b001110 => "frintx",
                0b001111 => "frinti",
                _ => return Self::unknown(raw),
            };
            return format!("{} {}, {}", mnemonic, fpr(rd, kind), fpr(rn, kind));
        }

        Self::unknown(raw)
    }

    fn decode_fp_conversion(raw: u32, kind: char) -> String {
        let sf = raw >> 31 == 1;
        let s = (raw >> 29) & 1;
        let rmode = (raw >> 19) & 0x3;
        let opcode = (raw >> 16) & 0x7;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        if s != 0 {
            return Self::unknown(raw);
        }

        match (rmode, opcode) {
            (_, 0b000) | (_, 0b001) => {
                let round = ['n', 'p', 'm', 'z'][rmode as usize];
                let sign = if opcode == 0 { 's' } else { 'u' };
                format!("fcvt{}{} {}, {}", round, sign, gpr(rd, sf), fpr(rn, kind))
            }
            (0b00, 0b010) => format!("scvtf {}, {}", fpr(rd, kind), gpr(rn, sf)),
            (0b00, 0b011) => format!("ucvtf {}, {}", fpr(rd, kind), gpr(rn, sf)),
            (0b00, 0b100) => format!("fcvtas {}, {}", gpr(rd, sf), fpr(rn, kind)),
            (0b00, 0b101) => format!("fcvtau {}, {}", gpr(rd, sf), fpr(rn, kind)),
            (0b00, 0b110) | (0b00, 0b111) => {
                let sizes_match = match kind {
                    's' => !sf,
                    'd' => sf,
                    _ => true,
                };
                if !sizes_match {
                    return Self::unknown(raw);
                }
                if opcode == 0b110 {
                    format!("fmov {}, {}", gpr(rd, sf), fpr(rn, kind))
                } else {
                    format!("fmov {}, {}", fpr(rd, kind), gpr(rn, sf))
                }
            }
            _ => Self::unknown(raw),
        }
    }

    fn decode_fp_three_source(raw: u32) -> String {
        let kind = match fp_kind((raw >> 22) & 0x3) {
            Some(kind) => kind,
            None => return Self::unknown(raw),
        };
        let o1 = (raw >> 21) & 1;
        let rm = (raw >> 16) & 0x1F;
        let o0 = (raw >> 15) & 1;
        let ra = (raw >> 10) & 0x1F;
        let rn = (raw >> 5) & 0x1F;
        let rd = raw & 0x1F;

        let mnemonic = ["fmadd", "fmsub", "fnmadd", "fnmsub"][((o1 << 1) | o0) as usize];
        format!(
            "{} {}, {}, {}, {}",
            mnemonic,
            fpr(rd, kind),
            fpr(rn, kind),
            fpr(rm, kind),
            fpr(ra, kind)
        )
    }
}

struct SingleAccess {
    mnemonic: &'static str,
    kind: char,
    scale: u32,
}

impl SingleAccess {
    fn reg(&self, n: u32) -> String {
        match self.kind {
            'w' => gpr(n, false),
            'x' => gpr(n, true),
            k => fpr(n, k),
        }
    }
}

/// Mnemonic, register class and offset scale for single-register loads and stores.
fn single_access(size: u32, v: u32, opc: u32) -> Option<SingleAccess> {
    let access = |mnemonic, kind, scale| Some(SingleAccess { mnemonic, kind, scale });

    if v == 0 {
        return match (size, opc) {
            (0b00, 0b00) => access("strb", 'w', 0),
            (0b00, 0b01) => access("ldrb", 'w', 0),
            (0b00, 0b10) => access("ldrsb", 'x', 0),
            (0b00, _) => access("ldrsb", 'w', 0),
            (0b01, 0b00) => access("strh", 'w', 1),
            (0b01, 0b01) => access("ldrh", 'w', 1),
            (0b01, 0b10) => access("ldrsh", 'x', 1),
            (0b01, _) => access("ldrsh", 'w', 1),
            (0b10, 0b00) => access("str", 'w', 2),
            (0b10, 0b01) => access("ldr", 'w', 2),
            (0b10, 0b10) => access("ldrsw", 'x', 2),
            (0b11, 0b00) => access("str", 'x', 3),
            (0b11, 0b01) => access("ldr", 'x', 3),
            _ => None,
        };
    }

    let mnemonic = if opc & 1 == 1 { "ldr" } else { "str" };
    match (opc >> 1, size) {
        (0, 0b00) => access(mnemonic, 'b', 0),
        (0, 0b01) => access(mnemonic, 'h', 1),
        (0, 0b10) => access(mnemonic, 's', 2),
        (0, _) => access(mnemonic, 'd', 3),
        (_, 0b00) => access(mnemonic, 'q', 4),
        _ => None,
    }
}

pub(crate) const ATOMIC_OPS: [&str; 8] = ["add", "clr", "eor", "set", "smax", "smin", "umax", "umin"];

/// (acquire, release, suffix), indexed by `release << 1 | acquire`.
pub(crate) const ORDERINGS: [(u32, u32, &str); 4] = [(0, 0, ""), (1, 0, "a"), (0, 1, "l"), (1, 1, "al")];

/// (size field, suffix) for sub-word accesses; `None` sizes follow the register width.
pub(crate) const SIZE_SUFFIXES: [(Option<u32>, &str); 3] = [(Some(0), "b"), (Some(1), "h"), (None, "")];

fn size_suffix(size: u32) -> &'static str {
    match size {
        0b00 => "b",
        0b01 => "h",
        _ => "",
    }
}

fn unscaled_mnemonic(mnemonic: &str) -> String {
    format!("{}u{}", &mnemonic[..2], &mnemonic[2..])
}

fn shift_suffix(shift: u32, amount: u32) -> String {
    if shift == 0 && amount == 0 {
        String::new()
    } else {
        format!(", {} #{}", SHIFTS[shift as usize], amount)
    }
}

fn hint_name(hint: u32) -> Option<&'static str> {
    match hint {
        0 => Some("nop"),
        1 => Some("yield"),
        2 => Some("wfe"),
        3 => Some("wfi"),
        4 => Some("sev"),
        5 => Some("sevl"),
        7 => Some("xpaclri"),
        0x19 => Some("paciasp"),
        0x1B => Some("pacibsp"),
        0x1D => Some("autiasp"),
        0x1F => Some("autibsp"),
        0x20 => Some("bti"),
        0x22 => Some("bti c"),
        0x24 => Some("bti j"),
        0x26 => Some("bti jc"),
        _ => None,
    }
}

pub(crate) fn hint_value(name: &str) -> Option<u32> {
    (0..128u32).find(|&h| hint_name(h) == Some(name))
}

const NAMED_SYSTEM_REGISTERS: [(&str, (u32, u32, u32, u32, u32)); 11] = [
    ("tpidr_el0", (3, 3, 13, 0, 2)),
    ("tpidrro_el0", (3, 3, 13, 0, 3)),
    ("nzcv", (3, 3, 4, 2, 0)),
    ("fpcr", (3, 3, 4, 4, 0)),
    ("fpsr", (3, 3, 4, 4, 1)),
    ("cntvct_el0", (3, 3, 14, 0, 2)),
    ("cntfrq_el0", (3, 3, 14, 0, 0)),
    ("ctr_el0", (3, 3, 0, 0, 1)),
    ("dczid_el0", (3, 3, 0, 0, 7)),
    ("midr_el1", (3, 0, 0, 0, 0)),
    ("tpidr_el1", (3, 0, 13, 0, 4)),
];

fn system_register_name(op0: u32, op1: u32, crn: u32, crm: u32, op2: u32) -> String {
    NAMED_SYSTEM_REGISTERS
        .iter()
        .find(|(_, fields)| *fields == (op0, op1, crn, crm, op2))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| format!("s{}_{}_c{}_c{}_{}", op0, op1, crn, crm, op2))
}

/// Parses a system register name back into (op0, op1, CRn, CRm, op2).
pub(crate) fn system_register_fields(name: &str) -> Option<(u32, u32, u32, u32, u32)> {
    if let Some((_, fields)) = NAMED_SYSTEM_REGISTERS.iter().find(|(n, _)| *n == name) {
        return Some(*fields);
    }

    let parts = name.strip_prefix('s')?.split('_').collect::<Vec<_>>();
    if parts.len() != 5 {
        return None;
    }
    let op0 = parts[0].parse::<u32>().ok()?;
    let op1 = parts[1].parse::<u32>().ok()?;
    let crn = parts[2].strip_prefix('c')?.parse::<u32>().ok()?;
    let crm = parts[3].strip_prefix('c')?.parse::<u32>().ok()?;
    let op2 = parts[4].parse::<u32>().ok()?;

    if !(2..=3).contains(&op0) || op1 > 7 || crn > 15 || crm > 15 || op2 > 7 {
        return None;
    }
    Some((op0, op1, crn, crm, op2))
}

fn prefetch_name(rt: u32) -> String {
    let kind = match rt >> 3 {
        0 => "pld",
        1 => "pli",
        2 => "pst",
        _ => return format_imm(rt as i64),
    };
    let target = (rt >> 1) & 0x3;
    if target == 3 {
        return format_imm(rt as i64);
    }
    let policy = if rt & 1 == 1 { "strm" } else { "keep" };
    format!("{}l{}{}", kind, target + 1, policy)
}

pub(crate) fn prefetch_value(name: &str) -> Option<u32> {
    (0..24u32).find(|&rt| prefetch_name(rt) == name)
}

fn decode_bit_masks(n: u32, imms: u32, immr: u32, width: u32) -> Option<u64> {
    let combined = (n << 6) | (!imms & 0x3F);
    if combined == 0 {
        return None;
    }
    let len = 31 - combined.leading_zeros();
    if len < 1 {
        return None;
    }

    let size = 1u32 << len;
    let levels = size - 1;
    let s = imms & levels;
    let r = immr & levels;
    if s == levels {
        return None;
    }

    let size_mask = if size == 64 { u64::MAX } else { (1u64 << size) - 1 };
    let welem = (1u64 << (s + 1)) - 1;
    let elem = if r == 0 {
        welem
    } else {
        ((welem >> r) | (welem << (size - r))) & size_mask
    };

    let mut result = 0u64;
    let mut position = 0;
    while position < width {
        result |= elem << position;
        position += size;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: u32) -> String {
        Arm64Decoder::decode(raw).unwrap()
    }

    #[test]
    fn test_decode_prologue() {
        assert_eq!(decode(0xA9BF7BFD), "stp x29, x30, [sp, #-0x10]!");
        assert_eq!(decode(0x910003FD), "mov x29, sp");
        assert_eq!(decode(0xA9407BFD), "ldp x29, x30, [sp]");
        assert_eq!(decode(0xA8C17BFD), "ldp x29, x30, [sp], #0x10");
        assert_eq!(decode(0xD65F03C0), "ret");
    }

    #[test]
    fn test_decode_data_processing() {
        assert_eq!(decode(0xAA0103E0), "mov x0, x1");
        assert_eq!(decode(0x8B020020), "add x0, x1, x2");
        assert_eq!(decode(0xEB01001F), "cmp x0, x1");
        assert_eq!(decode(0xD1004000), "sub x0, x0, #0x10");
        assert_eq!(decode(0x1A9F07E0), "cset w0, ne");
        assert_eq!(decode(0x9B027C20), "mul x0, x1, x2");
        assert_eq!(decode(0x1AC20C20), "sdiv w0, w1, w2");
        assert_eq!(decode(0x93407C20), "sxtw x0, w1");
        assert_eq!(decode(0x53001C20), "uxtb w0, w1");
        assert_eq!(decode(0xD37DF020), "lsl x0, x1, #3");
        assert_eq!(decode(0x52800020), "mov w0, #0x1");
        assert_eq!(decode(0x92401C20), "and x0, x1, #0xff");
    }

    #[test]
    fn test_decode_branches() {
        assert_eq!(decode(0x94000010), "bl #0x40");
        assert_eq!(decode(0x17FFFFFF), "b #0xfffffffffffffffc");
        assert_eq!(decode(0x54000040), "b.eq #0x8");
        assert_eq!(decode(0xB4000040), "cbz x0, #0x8");
        assert_eq!(decode(0xD63F0100), "blr x8");
        assert_eq!(decode(0x90000000), "adrp x0, #0x0");
    }

    #[test]
    fn test_decode_loads_and_stores() {
        assert_eq!(decode(0xF9400020), "ldr x0, [x1]");
        assert_eq!(decode(0xF9400820), "ldr x0, [x1, #0x10]");
        assert_eq!(decode(0xF8626820), "ldr x0, [x1, x2]");
        assert_eq!(decode(0xF8627820), "ldr x0, [x1, x2, lsl #3]");
        assert_eq!(decode(0xB9000020), "str w0, [x1]");
        assert_eq!(decode(0x39400020), "ldrb w0, [x1]");
        assert_eq!(decode(0xF85F8020), "ldur x0, [x1, #-8]");
        assert_eq!(decode(0x885FFC08), "ldaxr w8, [x0]");
        assert_eq!(decode(0x880AFC09), "stlxr w10, w9, [x0]");
        assert_eq!(decode(0xC8DFFC20), "ldar x0, [x1]");
        assert_eq!(decode(0x6D0027E8), "stp d8, d9, [sp]");
    }

    #[test]
    fn test_decode_system() {
        assert_eq!(decode(0xD503201F), "nop");
        assert_eq!(decode(0xD503233F), "paciasp");
        assert_eq!(decode(0xD5033BBF), "dmb ish");
        assert_eq!(decode(0xD5033FDF), "isb");
        assert_eq!(decode(0xD53BD048), "mrs x8, tpidr_el0");
        assert_eq!(decode(0xD51BD048), "msr tpidr_el0, x8");
        assert_eq!(decode(0xD4000001), "svc #0");
    }

    #[test]
    fn test_decode_floating_point() {
        assert_eq!(decode(0x1E222820), "fadd s0, s1, s2");
        assert_eq!(decode(0x1E204020), "fmov s0, s1");
        assert_eq!(decode(0x1E22C020), "fcvt d0, s1");
        assert_eq!(decode(0x1E620020), "scvtf d0, w1");
        assert_eq!(decode(0x1E380000), "fcvtzs w0, s0");
        assert_eq!(decode(0x9E660000), "fmov x0, d0");
        assert_eq!(decode(0x1E212000), "fcmp s0, s1");
        assert_eq!(decode(0x1E2E1000), "fmov s0, #1.00000000");
    }

    #[test]
    fn test_decode_reserved_space() {
        assert_eq!(decode(0x00000000), "udf #0");
        assert!(Arm64Decoder::decode(0x00010000).is_none());
        assert!(Arm64Decoder::decode(0x06000000).is_none());
        assert!(decode(0x0EE28420).starts_with(".inst"));
    }

    #[test]
    fn test_decode_vector_and_atomics() {
        assert_eq!(decode(0x4E208400), "add v0.16b, v0.16b, v0.16b");
        assert_eq!(decode(0x4EA11C20), "mov v0.16b, v1.16b");
        assert_eq!(decode(0x4EA28420), "add v0.4s, v1.4s, v2.4s");
        assert_eq!(decode(0x4E040C20), "dup v0.4s, w1");
        assert_eq!(decode(0x0E013C20), "umov w0, v1.b[0]");
        assert_eq!(decode(0x4C407000), "ld1 {v0.16b}, [x0]");
        assert_eq!(decode(0xF8200020), "ldadd x0, x0, [x1]");
        assert_eq!(decode(0xF8E08020), "swpal x0, x0, [x1]");
        assert_eq!(decode(0xB820303F), "stset w0, [x1]");
        assert_eq!(decode(0x38604020), "ldsmaxlb w0, w0, [x1]");
        assert_eq!(decode(0xC8E0FC20), "casal x0, x0, [x1]");
        assert_eq!(decode(0x88A07C20), "cas w0, w0, [x1]");
    }

    #[test]
    fn test_bit_masks() {
        assert_eq!(decode_bit_masks(1, 0b000111, 0, 64), Some(0xFF));
        assert_eq!(decode_bit_masks(0, 0b111100, 0, 32), Some(0x55555555));
        assert_eq!(decode_bit_masks(0, 0b111111, 0, 32), None);
        assert_eq!(system_register_fields("s3_3_c13_c0_2"), Some((3, 3, 13, 0, 2)));
        assert_eq!(prefetch_value("pldl1keep"), Some(0));
        assert_eq!(hint_value("bti c"), Some(0x22));
    }
}
