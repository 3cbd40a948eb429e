// Fri Oct 16 2026 - Alex

use super::decoder::{hint_value, prefetch_value, system_register_fields, ATOMIC_OPS, ORDERINGS, SIZE_SUFFIXES};
use super::simd::{encode_vector, is_vector_operand};
use super::{FpReg, GpReg};
use crate::codec::operands::{
    invert_condition, parse_barrier_option, parse_condition, parse_imm, split_instruction,
    split_memory,
};

type EncodeResult = Result<u32, String>;

pub struct Arm64Encoder;

impl Arm64Encoder {
    pub fn encode(text: &str) -> EncodeResult {
        let (mnemonic, operands) = split_instruction(text);
        let ops = operands.iter().map(String::as_str).collect::<Vec<_>>();

        if let Some(name) = hint_mnemonic(&mnemonic, &ops) {
            return hint_value(&name)
                .map(|hint| 0xD503201F | (hint << 5))
                .ok_or_else(|| format!("unknown hint '{}'", name));
        }
        if ops.iter().any(|op| is_vector_operand(op)) {
            return encode_vector(&mnemonic, &ops);
        }
        if let Some(fields) = atomic_fields(&mnemonic) {
            return Self::encode_atomic(fields, &ops);
        }

        match mnemonic.as_str() {
            "clrex" => Ok(0xD5033F5F),
            "isb" => Ok(0xD5033FDF),
            "dsb" | "dmb" => Self::encode_barrier(&mnemonic, &ops),
            "mrs" | "msr" => Self::encode_system_register(&mnemonic, &ops),
            "br" | "blr" | "ret" | "eret" | "drps" => Self::encode_branch_register(&mnemonic, &ops),

            "mov" => Self::encode_mov(&ops),
            "and" | "bic" | "orr" | "orn" | "eor" | "eon" | "ands" | "bics" | "mvn" | "tst" => {
                Self::encode_logical(&mnemonic, &ops)
            }
            "add" | "adds" | "sub" | "subs" | "cmp" | "cmn" | "neg" | "negs" => {
                Self::encode_add_sub(&mnemonic, &ops)
            }
            "adc" | "adcs" | "sbc" | "sbcs" => Self::encode_carry(&mnemonic, &ops),
            "csel" | "csinc" | "csinv" | "csneg" | "cset" | "csetm" | "cinc" | "cinv" | "cneg" => {
                Self::encode_conditional_select(&mnemonic, &ops)
            }
            "udiv" | "sdiv" | "lsl" | "lsr" | "asr" | "ror" => Self::encode_shift_or_divide(&mnemonic, &ops),
            "rbit" | "rev16" | "rev32" | "rev" | "clz" | "cls" => Self::encode_one_source(&mnemonic, &ops),
            "madd" | "msub" | "mul" | "mneg" => Self::encode_multiply(&mnemonic, &ops),
            "smaddl" | "smsubl" | "smull" | "smnegl" | "umaddl" | "umsubl" | "umull" | "umnegl" => {
                Self::encode_long_multiply(&mnemonic, &ops)
            }
            "smulh" | "umulh" => Self::encode_multiply_high(&mnemonic, &ops),
            "sxtb" | "sxth" | "sxtw" | "uxtb" | "uxth" => Self::encode_extend(&mnemonic, &ops),

            "stxr" | "stlxr" | "ldxr" | "ldaxr" | "stllr" | "stlr" | "ldlar" | "ldar" | "stxrb"
            | "stlxrb" | "ldxrb" | "ldaxrb" | "stllrb" | "stlrb" | "ldlarb" | "ldarb" | "stxrh"
            | "stlxrh" | "ldxrh" | "ldaxrh" | "stllrh" | "stlrh" | "ldlarh" | "ldarh" => {
                Self::encode_exclusive(&mnemonic, &ops)
            }
            "stp" | "ldp" | "stnp" | "ldnp" | "ldpsw" => Self::encode_pair(&mnemonic, &ops),
            "prfm" | "prfum" => Self::encode_prefetch(&mnemonic, &ops),
            "ldr" | "str" | "ldrb" | "strb" | "ldrh" | "strh" | "ldrsb" | "ldrsh" | "ldrsw" => {
                Self::encode_single(&mnemonic, &ops, false)
            }
            "ldur" | "stur" | "ldurb" | "sturb" | "ldurh" | "sturh" | "ldursb" | "ldursh"
            | "ldursw" => Self::encode_single(&mnemonic, &ops, true),

            "fmul" | "fdiv" | "fadd" | "fsub" | "fmax" | "fmin" | "fmaxnm" | "fminnm" | "fnmul" => {
                Self::encode_fp_two_source(&mnemonic, &ops)
            }
            "fmov" => Self::encode_fmov(&ops),
            "fabs" | "fneg" | "fsqrt" | "frintn" | "frintp" | "frintm" | "frintz" | "frinta"
            | "frintx" | "frinti" | "fcvt" => Self::encode_fp_one_source(&mnemonic, &ops),
            "fcmp" | "fcmpe" => Self::encode_fp_compare(&mnemonic, &ops),
            "fcsel" => Self::encode_fcsel(&ops),
            "fmadd" | "fmsub" | "fnmadd" | "fnmsub" => Self::encode_fp_three_source(&mnemonic, &ops),
            "scvtf" | "ucvtf" | "fcvtas" | "fcvtau" | "fcvtns" | "fcvtnu" | "fcvtps" | "fcvtpu"
            | "fcvtms" | "fcvtmu" | "fcvtzs" | "fcvtzu" => Self::encode_fp_conversion(&mnemonic, &ops),

            _ => Err(format!("unsupported mnemonic '{}'", mnemonic)),
        }
    }

    fn encode_barrier(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 1)?;
        let crm = parse_barrier_option(ops[0])
            .ok_or_else(|| format!("unknown barrier option '{}'", ops[0]))?;
        let op2 = if mnemonic == "dsb" { 0b100 } else { 0b101 };
        Ok(0xD5033000 | (crm << 8) | (op2 << 5) | 0x1F)
    }

    fn encode_system_register(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let (reg, sysreg, base) = if mnemonic == "mrs" {
            (ops[0], ops[1], 0xD5300000)
        } else {
            (ops[1], ops[0], 0xD5100000)
        };
        let rt = gp(reg)?;
        let (op0, op1, crn, crm, op2) = system_register_fields(sysreg)
            .ok_or_else(|| format!("unknown system register '{}'", sysreg))?;

        Ok(base
            | ((op0 - 2) << 19)
            | (op1 << 16)
            | (crn << 12)
            | (crm << 8)
            | (op2 << 5)
            | rt.num)
    }

    fn encode_branch_register(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        match mnemonic {
            "eret" => return Ok(0xD69F03E0),
            "drps" => return Ok(0xD6BF03E0),
            _ => {}
        }

        let rn = match (mnemonic, ops.len()) {
            ("ret", 0) => 30,
            (_, 1) => wide_gp(ops[0])?.num,
            _ => return Err(format!("{} takes one register", mnemonic)),
        };
        let base = match mnemonic {
            "br" => 0xD61F0000,
            "blr" => 0xD63F0000,
            _ => 0xD65F0000,
        };
        Ok(base | (rn << 5))
    }

    fn encode_mov(ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let rd = gp(ops[0])?;

        if ops[1].starts_with('#') {
            return Self::encode_mov_immediate(rd, parse_imm(ops[1])?);
        }

        let rn = gp(ops[1])?;
        same_width(&[rd, rn])?;

        if rd.is_sp() || rn.is_sp() {
            return Ok(sf(rd) | 0x11000000 | (rn.num << 5) | rd.num);
        }
        Ok(sf(rd) | 0x2A000000 | (rn.num << 16) | (31 << 5) | rd.num)
    }

    fn encode_mov_immediate(rd: GpReg, value: i64) -> EncodeResult {
        let value = value as u64;
        let halves = if rd.wide { 4 } else { 2 };
        for hw in 0..halves {
            let shift = hw * 16;
            if value & !(0xFFFFu64 << shift) == 0 {
                let imm16 = ((value >> shift) & 0xFFFF) as u32;
                return Ok(sf(rd) | 0x52800000 | ((hw as u32) << 21) | (imm16 << 5) | rd.num);
            }
        }
        Err(format!("immediate 0x{:x} needs more than one move", value))
    }

    fn encode_logical(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        let (opc, n, rd, rn, rm, rest) = match mnemonic {
            "mvn" => {
                expect_at_least(ops, 2)?;
                (0b01, 1, gp(ops[0])?, zr_like(ops[0])?, gp(ops[1])?, &ops[2..])
            }
            "tst" => {
                expect_at_least(ops, 2)?;
                (0b11, 0, zr_like(ops[0])?, gp(ops[0])?, gp(ops[1])?, &ops[2..])
            }
            _ => {
                expect_at_least(ops, 3)?;
                let (opc, n) = match mnemonic {
                    "and" => (0b00, 0),
                    "bic" => (0b00, 1),
                    "orr" => (0b01, 0),
                    "orn" => (0b01, 1),
                    "eor" => (0b10, 0),
                    "eon" => (0b10, 1),
                    "ands" => (0b11, 0),
                    _ => (0b11, 1),
                };
                (opc, n, gp(ops[0])?, gp(ops[1])?, gp(ops[2])?, &ops[3..])
            }
        };
        same_width(&[rd, rn, rm])?;
        let (shift, amount) = parse_shift(rest)?;

        Ok(sf(rd)
            | (opc << 29)
            | 0x0A000000
            | (shift << 22)
            | (n << 21)
            | (rm.num << 16)
            | (amount << 10)
            | (rn.num << 5)
            | rd.num)
    }

    fn encode_add_sub(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        let (op, s, rd, rn, rest) = match mnemonic {
            "cmp" | "cmn" => {
                expect_at_least(ops, 2)?;
                let op = (mnemonic == "cmp") as u32;
                (op, 1, zr_like(ops[0])?, gp(ops[0])?, &ops[1..])
            }
            "neg" | "negs" => {
                expect_at_least(ops, 2)?;
                let s = (mnemonic == "negs") as u32;
                (1, s, gp(ops[0])?, zr_like(ops[0])?, &ops[1..])
            }
            _ => {
                expect_at_least(ops, 3)?;
                let op = mnemonic.starts_with("sub") as u32;
                let s = mnemonic.ends_with('s') as u32;
                (op, s, gp(ops[0])?, gp(ops[1])?, &ops[2..])
            }
        };

        let base = sf(rd) | (op << 30) | (s << 29);

        if rest[0].starts_with('#') {
            let imm = parse_imm(rest[0])?;
            let sh = match rest.get(1) {
                None => 0,
                Some(&"lsl #12") => 1,
                Some(other) => return Err(format!("unexpected operand '{}'", other)),
            };
            if !(0..=0xFFF).contains(&imm) {
                return Err(format!("immediate {} out of range", imm));
            }
            return Ok(base | 0x11000000 | (sh << 22) | ((imm as u32) << 10) | (rn.num << 5) | rd.num);
        }

        let rm = gp(rest[0])?;
        let extended = rn.is_sp() || (s == 0 && rd.is_sp()) || rest.get(1).map_or(false, |e| is_extend(e));

        if extended {
            let (option, amount) = match rest.get(1) {
                Some(extend) => parse_extend(extend, rd.wide)?,
                None => (if rd.wide { 0b011 } else { 0b010 }, 0),
            };
            if amount > 4 {
                return Err(format!("extend amount {} out of range", amount));
            }
            return Ok(base
                | 0x0B200000
                | (rm.num << 16)
                | (option << 13)
                | (amount << 10)
                | (rn.num << 5)
                | rd.num);
        }

        same_width(&[rd, rn, rm])?;
        let (shift, amount) = parse_shift(&rest[1..])?;
        if shift == 0b11 {
            return Err("ror is not a valid add/sub shift".to_string());
        }

        Ok(base | 0x0B000000 | (shift << 22) | (rm.num << 16) | (amount << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_carry(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 3)?;
        let (rd, rn, rm) = (gp(ops[0])?, gp(ops[1])?, gp(ops[2])?);
        same_width(&[rd, rn, rm])?;
        let op = mnemonic.starts_with("sbc") as u32;
        let s = mnemonic.ends_with('s') as u32;
        Ok(sf(rd) | (op << 30) | (s << 29) | 0x1A000000 | (rm.num << 16) | (rn.num << 5) | rd.num)
    }

    fn encode_conditional_select(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        let (op, o2, rd, rn, rm, cond) = match mnemonic {
            "cset" | "csetm" => {
                expect_count(ops, 2)?;
                let cond = invert_condition(condition(ops[1])?);
                let op = (mnemonic == "csetm") as u32;
                let rd = gp(ops[0])?;
                let zr = zr_like(ops[0])?;
                (op, 1 - op, rd, zr, zr, cond)
            }
            "cinc" | "cinv" | "cneg" => {
                expect_count(ops, 3)?;
                let cond = invert_condition(condition(ops[2])?);
                let (op, o2) = match mnemonic {
                    "cinc" => (0, 1),
                    "cinv" => (1, 0),
                    _ => (1, 1),
                };
                let rn = gp(ops[1])?;
                (op, o2, gp(ops[0])?, rn, rn, cond)
            }
            _ => {
                expect_count(ops, 4)?;
                let (op, o2) = match mnemonic {
                    "csel" => (0, 0),
                    "csinc" => (0, 1),
                    "csinv" => (1, 0),
                    _ => (1, 1),
                };
                (op, o2, gp(ops[0])?, gp(ops[1])?, gp(ops[2])?, condition(ops[3])?)
            }
        };
        same_width(&[rd, rn, rm])?;

        Ok(sf(rd)
            | (op << 30)
            | 0x1A800000
            | (rm.num << 16)
            | (cond << 12)
            | (o2 << 10)
            | (rn.num << 5)
            | rd.num)
    }

    fn encode_shift_or_divide(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 3)?;
        let (rd, rn) = (gp(ops[0])?, gp(ops[1])?);

        if ops[2].starts_with('#') {
            return Self::encode_shift_immediate(mnemonic, rd, rn, parse_imm(ops[2])?);
        }

        let rm = gp(ops[2])?;
        same_width(&[rd, rn, rm])?;
        let opcode = match mnemonic {
            "udiv" => 0b000010,
            "sdiv" => 0b000011,
            "lsl" => 0b001000,
            "lsr" => 0b001001,
            "asr" => 0b001010,
            _ => 0b001011,
        };
        Ok(sf(rd) | 0x1AC00000 | (rm.num << 16) | (opcode << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_shift_immediate(mnemonic: &str, rd: GpReg, rn: GpReg, amount: i64) -> EncodeResult {
        same_width(&[rd, rn])?;
        let width = if rd.wide { 64 } else { 32 };
        if !(0..width).contains(&amount) {
            return Err(format!("shift amount {} out of range", amount));
        }
        let amount = amount as u32;
        let width = width as u32;
        let n = rd.wide as u32;

        let (opc, immr, imms) = match mnemonic {
            "lsl" => (0b10, (width - amount) % width, width - 1 - amount),
            "lsr" => (0b10, amount, width - 1),
            "asr" => (0b00, amount, width - 1),
            "ror" => {
                return Ok(sf(rd)
                    | 0x13800000
                    | (n << 22)
                    | (rn.num << 16)
                    | (amount << 10)
                    | (rn.num << 5)
                    | rd.num)
            }
            _ => return Err(format!("{} has no immediate form", mnemonic)),
        };

        Ok(sf(rd) | (opc << 29) | 0x13000000 | (n << 22) | (immr << 16) | (imms << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_one_source(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let (rd, rn) = (gp(ops[0])?, gp(ops[1])?);
        same_width(&[rd, rn])?;

        let opcode = match (mnemonic, rd.wide) {
            ("rbit", _) => 0,
            ("rev16", _) => 1,
            ("rev32", true) => 2,
            ("rev", false) => 2,
            ("rev", true) => 3,
            ("clz", _) => 4,
            ("cls", _) => 5,
            _ => return Err(format!("{} needs a 64-bit register", mnemonic)),
        };
        Ok(sf(rd) | 0x5AC00000 | (opcode << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_multiply(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        let short = matches!(mnemonic, "mul" | "mneg");
        expect_count(ops, if short { 3 } else { 4 })?;
        let (rd, rn, rm) = (gp(ops[0])?, gp(ops[1])?, gp(ops[2])?);
        let ra = if short { zr_like(ops[0])? } else { gp(ops[3])? };
        same_width(&[rd, rn, rm, ra])?;
        let o0 = matches!(mnemonic, "msub" | "mneg") as u32;

        Ok(sf(rd) | 0x1B000000 | (rm.num << 16) | (o0 << 15) | (ra.num << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_long_multiply(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        let short = matches!(mnemonic, "smull" | "smnegl" | "umull" | "umnegl");
        expect_count(ops, if short { 3 } else { 4 })?;
        let (rd, rn, rm) = (wide_gp(ops[0])?, narrow_gp(ops[1])?, narrow_gp(ops[2])?);
        let ra = if short { 31 } else { wide_gp(ops[3])?.num };
        let base = if mnemonic.starts_with('s') { 0x9B200000 } else { 0x9BA00000 };
        let o0 = matches!(mnemonic, "smsubl" | "smnegl" | "umsubl" | "umnegl") as u32;

        Ok(base | (rm.num << 16) | (o0 << 15) | (ra << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_multiply_high(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 3)?;
        let (rd, rn, rm) = (wide_gp(ops[0])?, wide_gp(ops[1])?, wide_gp(ops[2])?);
        let base = if mnemonic == "smulh" { 0x9B407C00 } else { 0x9BC07C00 };
        Ok(base | (rm.num << 16) | (rn.num << 5) | rd.num)
    }

    fn encode_extend(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let (rd, rn) = (gp(ops[0])?, narrow_gp(ops[1])?);
        let (opc, imms) = match mnemonic {
            "sxtb" => (0b00, 7),
            "sxth" => (0b00, 15),
            "sxtw" => (0b00, 31),
            "uxtb" => (0b10, 7),
            _ => (0b10, 15),
        };
        if (mnemonic == "sxtw" || opc == 0b10) && rd.wide != (mnemonic == "sxtw") {
            return Err(format!("invalid destination width for {}", mnemonic));
        }
        let n = rd.wide as u32;
        Ok(sf(rd) | (opc << 29) | 0x13000000 | (n << 22) | (imms << 10) | (rn.num << 5) | rd.num)
    }

    fn encode_exclusive(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        let (base, suffix_size) = match mnemonic.strip_suffix('b') {
            Some(base) => (base, Some(0)),
            None => match mnemonic.strip_suffix('h') {
                Some(base) => (base, Some(1)),
                None => (mnemonic, None),
            },
        };
        let (o2, l, o0) = match base {
            "stxr" => (0, 0, 0),
            "stlxr" => (0, 0, 1),
            "ldxr" => (0, 1, 0),
            "ldaxr" => (0, 1, 1),
            "stllr" => (1, 0, 0),
            "stlr" => (1, 0, 1),
            "ldlar" => (1, 1, 0),
            _ => (1, 1, 1),
        };

        let has_status = o2 == 0 && l == 0;
        expect_count(ops, if has_status { 3 } else { 2 })?;
        let (rs, rest) = if has_status {
            (narrow_gp(ops[0])?.num, &ops[1..])
        } else {
            (31, ops)
        };

        let rt = gp(rest[0])?;
        let rn = memory_base(rest[1])?;
        let size = match suffix_size {
            Some(size) => size,
            None if rt.wide => 0b11,
            None => 0b10,
        };

        Ok((size << 30)
            | 0x08000000
            | (o2 << 23)
            | (l << 22)
            | (rs << 16)
            | (o0 << 15)
            | (31 << 10)
            | (rn << 5)
            | rt.num)
    }

    fn encode_atomic(fields: AtomicFields, ops: &[&str]) -> EncodeResult {
        let (rs, rt, address) = match fields.kind {
            AtomicKind::Store => {
                expect_count(ops, 2)?;
                let rs = gp(ops[0])?;
                (rs, zr_like(ops[0])?, ops[1])
            }
            _ => {
                expect_count(ops, 3)?;
                (gp(ops[0])?, gp(ops[1])?, ops[2])
            }
        };
        same_width(&[rs, rt])?;
        if rs.is_sp() || rt.is_sp() {
            return Err("sp is not a valid atomic operand".to_string());
        }
        let rn = memory_base(address)?;
        let size = match fields.size {
            Some(_) if rt.wide => return Err("sub-word atomics take 32-bit registers".to_string()),
            Some(size) => size,
            None if rt.wide => 0b11,
            None => 0b10,
        };

        let word = match fields.kind {
            AtomicKind::CompareAndSwap => {
                (size << 30)
                    | 0x08A07C00
                    | (fields.acquire << 22)
                    | (rs.num << 16)
                    | (fields.release << 15)
                    | (rn << 5)
                    | rt.num
            }
            kind => {
                let o3 = u32::from(kind == AtomicKind::Swap);
                (size << 30)
                    | 0x38200000
                    | (fields.acquire << 23)
                    | (fields.release << 22)
                    | (rs.num << 16)
                    | (o3 << 15)
                    | (fields.opc << 12)
                    | (rn << 5)
                    | rt.num
            }
        };
        Ok(word)
    }

    fn encode_pair(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_at_least(ops, 3)?;
        let l = mnemonic.starts_with("ld") as u32;

        let (opc, v, scale, rt, rt2) = if let (Some(a), Some(b)) = (FpReg::parse(ops[0]), FpReg::parse(ops[1])) {
            if a.kind != b.kind {
                return Err("mismatched pair registers".to_string());
            }
            let (opc, scale) = match a.kind {
                's' => (0b00, 2),
                'd' => (0b01, 3),
                'q' => (0b10, 4),
                _ => return Err(format!("invalid pair register '{}'", ops[0])),
            };
            (opc, 1, scale, a.num, b.num)
        } else {
            let (a, b) = (gp(ops[0])?, gp(ops[1])?);
            same_width(&[a, b])?;
            let (opc, scale) = match (mnemonic, a.wide) {
                ("ldpsw", true) => (0b01, 2),
                ("ldpsw", false) => return Err("ldpsw needs 64-bit registers".to_string()),
                (_, true) => (0b10, 3),
                (_, false) => (0b00, 2),
            };
            (opc, 0, scale, a.num, b.num)
        };

        let (rn, offset, writeback) = parse_address(&ops[2..])?;
        let kind = match (mnemonic, writeback) {
            ("stnp" | "ldnp", Addressing::Offset) => 0b00,
            ("stnp" | "ldnp", _) => return Err("non-temporal pairs have no writeback form".to_string()),
            (_, Addressing::Post) => 0b01,
            (_, Addressing::Offset) => 0b10,
            (_, Addressing::Pre) => 0b11,
        };

        if offset % (1 << scale) != 0 {
            return Err(format!("offset {} is not a multiple of {}", offset, 1 << scale));
        }
        let imm7 = offset >> scale;
        if !(-64..=63).contains(&imm7) {
            return Err(format!("offset {} out of range", offset));
        }

        Ok((opc << 30)
            | 0x28000000
            | (v << 26)
            | (kind << 23)
            | (l << 22)
            | (((imm7 as u32) & 0x7F) << 15)
            | (rt2 << 10)
            | (rn << 5)
            | rt)
    }

    fn encode_prefetch(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let rt = prefetch_value(ops[0]).ok_or_else(|| format!("unknown prefetch operation '{}'", ops[0]))?;
        let (parts, _) = split_memory(ops[1]).ok_or_else(|| format!("expected memory operand, got '{}'", ops[1]))?;
        let rn = base_register(&parts[0])?;

        if mnemonic == "prfum" {
            let offset = parts.get(1).map(|p| parse_imm(p)).transpose()?.unwrap_or(0);
            return Ok(0xF8800000 | (imm9(offset)? << 12) | (rn << 5) | rt);
        }

        if parts.len() == 1 {
            return Ok(0xF9800000 | (rn << 5) | rt);
        }
        let (rm, option, s) = parse_index(&parts[1..], 3)?;
        Ok(0xF8A00800 | (rm << 16) | (option << 13) | (s << 12) | (rn << 5) | rt)
    }

    fn encode_single(mnemonic: &str, ops: &[&str], unscaled: bool) -> EncodeResult {
        expect_at_least(ops, 2)?;
        let scaled_name = if unscaled {
            format!("{}{}", &mnemonic[..2], &mnemonic[3..])
        } else {
            mnemonic.to_string()
        };
        let access = access_fields(&scaled_name, ops[0])?;
        let (parts, pre) = split_memory(ops[1]).ok_or_else(|| format!("expected memory operand, got '{}'", ops[1]))?;
        let rn = base_register(&parts[0])?;
        let base = (access.size << 30) | (access.v << 26) | (access.opc << 22) | (rn << 5) | access.rt;

        if unscaled {
            if pre || ops.len() > 2 {
                return Err(format!("{} has no writeback form", mnemonic));
            }
            let offset = parts.get(1).map(|p| parse_imm(p)).transpose()?.unwrap_or(0);
            return Ok(base | 0x38000000 | (imm9(offset)? << 12));
        }

        if let Some(post) = ops.get(2) {
            return Ok(base | 0x38000000 | (imm9(parse_imm(post)?)? << 12) | (0b01 << 10));
        }

        match parts.get(1) {
            None => Ok(base | 0x39000000),
            Some(part) if part.starts_with('#') => {
                let offset = parse_imm(part)?;
                if pre {
                    return Ok(base | 0x38000000 | (imm9(offset)? << 12) | (0b11 << 10));
                }
                let step = 1i64 << access.scale;
                if offset < 0 || offset % step != 0 || offset / step > 0xFFF {
                    return Err(format!("offset {} not encodable as a scaled immediate", offset));
                }
                Ok(base | 0x39000000 | (((offset / step) as u32) << 10))
            }
            Some(_) => {
                let (rm, option, s) = parse_index(&parts[1..], access.scale)?;
                Ok(base | 0x38200800 | (rm << 16) | (option << 13) | (s << 12))
            }
        }
    }

    fn encode_fp_two_source(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 3)?;
        let (rd, rn, rm) = (fp(ops[0])?, fp(ops[1])?, fp(ops[2])?);
        let ftype = fp_type(&[rd, rn, rm])?;
        let opcode = match mnemonic {
            "fmul" => 0,
            "fdiv" => 1,
            "fadd" => 2,
            "fsub" => 3,
            "fmax" => 4,
            "fmin" => 5,
            "fmaxnm" => 6,
            "fminnm" => 7,
            _ => 8,
        };
        Ok(0x1E200800 | (ftype << 22) | (rm.num << 16) | (opcode << 12) | (rn.num << 5) | rd.num)
    }

    fn encode_fmov(ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        match (FpReg::parse(ops[0]), FpReg::parse(ops[1])) {
            (Some(_), Some(_)) => Self::encode_fp_one_source("fmov", ops),
            (Some(rd), None) => {
                let rn = gp(ops[1])?;
                Self::encode_fp_move(rd, rn, 0b111, rn.num, rd.num)
            }
            (None, Some(rn)) => {
                let rd = gp(ops[0])?;
                Self::encode_fp_move(rn, rd, 0b110, rn.num, rd.num)
            }
            (None, None) => Err("fmov needs a floating-point register".to_string()),
        }
    }

    fn encode_fp_move(fpreg: FpReg, gpreg: GpReg, opcode: u32, rn: u32, rd: u32) -> EncodeResult {
        let ftype = fpreg.ftype().ok_or("fmov needs a scalar register")?;
        let sizes_match = match fpreg.kind {
            's' => !gpreg.wide,
            'd' => gpreg.wide,
            _ => true,
        };
        if !sizes_match {
            return Err("fmov register sizes differ".to_string());
        }
        Ok(sf(gpreg) | 0x1E200000 | (ftype << 22) | (opcode << 16) | (rn << 5) | rd)
    }

    fn encode_fp_one_source(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let (rd, rn) = (fp(ops[0])?, fp(ops[1])?);

        let (ftype, opcode) = if mnemonic == "fcvt" {
            let source = rn.ftype().ok_or("fcvt needs scalar registers")?;
            let dest = rd.ftype().ok_or("fcvt needs scalar registers")?;
            if source == dest {
                return Err("fcvt between identical precisions".to_string());
            }
            (source, 0b000100 | dest)
        } else {
            let opcode = match mnemonic {
                "fmov" => 0b000000,
                "fabs" => 0b000001,
                "fneg" => 0b000010,
                "fsqrt" => 0b000011,
                "frintn" => 0b001000,
                "frintp" => 0b001001,
                "frintm" => 0b001010,
                "frintz" => 0b001011,
                "frinta" => 0b001100,
                "frintx" => 0b001110,
                _ => 0b001111,
            };
            (fp_type(&[rd, rn])?, opcode)
        };

        Ok(0x1E204000 | (ftype << 22) | (opcode << 15) | (rn.num << 5) | rd.num)
    }

    fn encode_fp_compare(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;
        let rn = fp(ops[0])?;
        let signaling = if mnemonic == "fcmpe" { 0b10000 } else { 0 };

        if ops[1].starts_with('#') {
            let ftype = fp_type(&[rn])?;
            return Ok(0x1E202000 | (ftype << 22) | (rn.num << 5) | signaling | 0b01000);
        }

        let rm = fp(ops[1])?;
        let ftype = fp_type(&[rn, rm])?;
        Ok(0x1E202000 | (ftype << 22) | (rm.num << 16) | (rn.num << 5) | signaling)
    }

    fn encode_fcsel(ops: &[&str]) -> EncodeResult {
        expect_count(ops, 4)?;
        let (rd, rn, rm) = (fp(ops[0])?, fp(ops[1])?, fp(ops[2])?);
        let ftype = fp_type(&[rd, rn, rm])?;
        let cond = condition(ops[3])?;
        Ok(0x1E200C00 | (ftype << 22) | (rm.num << 16) | (cond << 12) | (rn.num << 5) | rd.num)
    }

    fn encode_fp_three_source(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 4)?;
        let (rd, rn, rm, ra) = (fp(ops[0])?, fp(ops[1])?, fp(ops[2])?, fp(ops[3])?);
        let ftype = fp_type(&[rd, rn, rm, ra])?;
        let (o1, o0) = match mnemonic {
            "fmadd" => (0, 0),
            "fmsub" => (0, 1),
            "fnmadd" => (1, 0),
            _ => (1, 1),
        };
        Ok(0x1F000000
            | (ftype << 22)
            | (o1 << 21)
            | (rm.num << 16)
            | (o0 << 15)
            | (ra.num << 10)
            | (rn.num << 5)
            | rd.num)
    }

    fn encode_fp_conversion(mnemonic: &str, ops: &[&str]) -> EncodeResult {
        expect_count(ops, 2)?;

        let (rmode, opcode, to_float) = match mnemonic {
            "scvtf" => (0, 0b010, true),
            "ucvtf" => (0, 0b011, true),
            "fcvtas" => (0, 0b100, false),
            "fcvtau" => (0, 0b101, false),
            _ => {
                let round = mnemonic.as_bytes()[4];
                let rmode = match round {
                    b'n' => 0,
                    b'p' => 1,
                    b'm' => 2,
                    _ => 3,
                };
                let opcode = mnemonic.ends_with('u') as u32;
                (rmode, opcode, false)
            }
        };

        let (fpreg, gpreg, rd, rn) = if to_float {
            let (rd, rn) = (fp(ops[0])?, gp(ops[1])?);
            (rd, rn, rd.num, rn.num)
        } else {
            let (rd, rn) = (gp(ops[0])?, fp(ops[1])?);
            (rn, rd, rd.num, rn.num)
        };
        let ftype = fpreg.ftype().ok_or("conversion needs a scalar register")?;

        Ok(sf(gpreg) | 0x1E200000 | (ftype << 22) | (rmode << 19) | (opcode << 16) | (rn << 5) | rd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Addressing {
    Offset,
    Pre,
    Post,
}

struct AccessFields {
    size: u32,
    v: u32,
    opc: u32,
    scale: u32,
    rt: u32,
}

fn access_fields(mnemonic: &str, reg: &str) -> Result<AccessFields, String> {
    if let Some(fpreg) = FpReg::parse(reg) {
        let load = match mnemonic {
            "ldr" => 1,
            "str" => 0,
            _ => return Err(format!("{} takes a general-purpose register", mnemonic)),
        };
        let (size, opc_high, scale) = match fpreg.kind {
            'b' => (0b00, 0, 0),
            'h' => (0b01, 0, 1),
            's' => (0b10, 0, 2),
            'd' => (0b11, 0, 3),
            _ => (0b00, 1, 4),
        };
        return Ok(AccessFields {
            size,
            v: 1,
            opc: (opc_high << 1) | load,
            scale,
            rt: fpreg.num,
        });
    }

    let rt = gp(reg)?;
    let (size, opc) = match (mnemonic, rt.wide) {
        ("strb", false) => (0b00, 0b00),
        ("ldrb", false) => (0b00, 0b01),
        ("ldrsb", true) => (0b00, 0b10),
        ("ldrsb", false) => (0b00, 0b11),
        ("strh", false) => (0b01, 0b00),
        ("ldrh", false) => (0b01, 0b01),
        ("ldrsh", true) => (0b01, 0b10),
        ("ldrsh", false) => (0b01, 0b11),
        ("str", false) => (0b10, 0b00),
        ("ldr", false) => (0b10, 0b01),
        ("ldrsw", true) => (0b10, 0b10),
        ("str", true) => (0b11, 0b00),
        ("ldr", true) => (0b11, 0b01),
        _ => return Err(format!("invalid register '{}' for {}", reg, mnemonic)),
    };

    Ok(AccessFields {
        size,
        v: 0,
        opc,
        scale: size,
        rt: rt.num,
    })
}

fn hint_mnemonic(mnemonic: &str, ops: &[&str]) -> Option<String> {
    match (mnemonic, ops) {
        ("nop" | "yield" | "wfe" | "wfi" | "sev" | "sevl" | "xpaclri" | "paciasp" | "pacibsp"
        | "autiasp" | "autibsp", []) => Some(mnemonic.to_string()),
        ("bti", []) => Some("bti".to_string()),
        ("bti", [target]) => Some(format!("bti {}", target)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomicKind {
    Load,
    Store,
    Swap,
    CompareAndSwap,
}

#[derive(Debug, Clone, Copy)]
struct AtomicFields {
    kind: AtomicKind,
    opc: u32,
    acquire: u32,
    release: u32,
    size: Option<u32>,
}

/// Resolves LSE names such as `ldaddal`, `stclrh`, `swpab` and `casl`.
fn atomic_fields(mnemonic: &str) -> Option<AtomicFields> {
    if !["ld", "st", "swp", "cas"].iter().any(|prefix| mnemonic.starts_with(prefix)) {
        return None;
    }
    for &(acquire, release, order) in ORDERINGS.iter() {
        for &(size, suffix) in SIZE_SUFFIXES.iter() {
            let fields = |kind, opc| AtomicFields {
                kind,
                opc,
                acquire,
                release,
                size,
            };
            if mnemonic == format!("swp{}{}", order, suffix) {
                return Some(fields(AtomicKind::Swap, 0));
            }
            if mnemonic == format!("cas{}{}", order, suffix) {
                return Some(fields(AtomicKind::CompareAndSwap, 0));
            }
            for (opc, op) in ATOMIC_OPS.iter().enumerate() {
                if mnemonic == format!("ld{}{}{}", op, order, suffix) {
                    return Some(fields(AtomicKind::Load, opc as u32));
                }
                if acquire == 0 && mnemonic == format!("st{}{}{}", op, order, suffix) {
                    return Some(fields(AtomicKind::Store, opc as u32));
                }
            }
        }
    }
    None
}

pub(super) fn gp(op: &str) -> Result<GpReg, String> {
    GpReg::parse(op).ok_or_else(|| format!("expected general-purpose register, got '{}'", op))
}

fn wide_gp(op: &str) -> Result<GpReg, String> {
    match gp(op)? {
        reg if reg.wide => Ok(reg),
        _ => Err(format!("expected 64-bit register, got '{}'", op)),
    }
}

fn narrow_gp(op: &str) -> Result<GpReg, String> {
    match gp(op)? {
        reg if !reg.wide => Ok(reg),
        _ => Err(format!("expected 32-bit register, got '{}'", op)),
    }
}

/// The zero register matching the width of `op`.
fn zr_like(op: &str) -> Result<GpReg, String> {
    let reg = gp(op)?;
    Ok(GpReg::parse(if reg.wide { "xzr" } else { "wzr" }).unwrap_or(reg))
}

fn fp(op: &str) -> Result<FpReg, String> {
    FpReg::parse(op).ok_or_else(|| format!("expected floating-point register, got '{}'", op))
}

fn fp_type(regs: &[FpReg]) -> Result<u32, String> {
    let first = regs[0];
    if regs.iter().any(|r| r.kind != first.kind) {
        return Err("mixed floating-point register sizes".to_string());
    }
    first
        .ftype()
        .ok_or_else(|| format!("{}-registers are not scalar floating point", first.kind))
}

fn sf(reg: GpReg) -> u32 {
    (reg.wide as u32) << 31
}

fn same_width(regs: &[GpReg]) -> Result<(), String> {
    if regs.windows(2).all(|w| w[0].wide == w[1].wide) {
        Ok(())
    } else {
        Err("mixed register widths".to_string())
    }
}

fn condition(op: &str) -> Result<u32, String> {
    parse_condition(op).ok_or_else(|| format!("unknown condition '{}'", op))
}

pub(super) fn expect_count(ops: &[&str], count: usize) -> Result<(), String> {
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

fn imm9(offset: i64) -> Result<u32, String> {
    if (-256..=255).contains(&offset) {
        Ok((offset as u32) & 0x1FF)
    } else {
        Err(format!("offset {} out of range", offset))
    }
}

fn base_register(op: &str) -> Result<u32, String> {
    let reg = wide_gp(op)?;
    if reg.is_zr() {
        return Err("xzr cannot be a base register".to_string());
    }
    Ok(reg.num)
}

pub(super) fn memory_base(op: &str) -> Result<u32, String> {
    let (parts, writeback) = split_memory(op).ok_or_else(|| format!("expected memory operand, got '{}'", op))?;
    if parts.len() != 1 || writeback {
        return Err(format!("expected plain base register, got '{}'", op));
    }
    base_register(&parts[0])
}

/// Parses `[base]`, `[base, #imm]`, `[base, #imm]!` and `[base], #imm`.
fn parse_address(ops: &[&str]) -> Result<(u32, i64, Addressing), String> {
    let (parts, pre) = split_memory(ops[0]).ok_or_else(|| format!("expected memory operand, got '{}'", ops[0]))?;
    let rn = base_register(&parts[0])?;
    let inner = parts.get(1).map(|p| parse_imm(p)).transpose()?;

    match (ops.get(1), inner, pre) {
        (Some(post), None, false) => Ok((rn, parse_imm(post)?, Addressing::Post)),
        (None, Some(offset), true) => Ok((rn, offset, Addressing::Pre)),
        (None, offset, false) => Ok((rn, offset.unwrap_or(0), Addressing::Offset)),
        _ => Err("invalid addressing mode".to_string()),
    }
}

/// Parses the index register and optional extend of a register-offset address.
fn parse_index(parts: &[String], scale: u32) -> Result<(u32, u32, u32), String> {
    let rm = gp(&parts[0])?;
    let (option, amount) = match parts.get(1) {
        None => (0b011, None),
        Some(extend) => {
            let mut words = extend.split_whitespace();
            let option = match words.next() {
                Some("lsl") => 0b011,
                Some("uxtw") => 0b010,
                Some("sxtw") => 0b110,
                Some("sxtx") => 0b111,
                _ => return Err(format!("invalid index extend '{}'", extend)),
            };
            (option, words.next().map(parse_imm).transpose()?)
        }
    };

    if rm.wide != (option & 0b001 == 1) {
        return Err(format!("index register '{}' does not match its extend", parts[0]));
    }

    let s = match amount {
        None => 0,
        Some(a) if a == scale as i64 => 1,
        Some(0) => 0,
        Some(a) => return Err(format!("shift amount {} must be 0 or {}", a, scale)),
    };

    Ok((rm.num, option, s))
}

fn parse_shift(rest: &[&str]) -> Result<(u32, u32), String> {
    match rest {
        [] => Ok((0, 0)),
        [shift] => {
            let mut words = shift.split_whitespace();
            let kind = match words.next() {
                Some("lsl") => 0,
                Some("lsr") => 1,
                Some("asr") => 2,
                Some("ror") => 3,
                _ => return Err(format!("invalid shift '{}'", shift)),
            };
            let amount = words
                .next()
                .map(parse_imm)
                .transpose()?
                .ok_or_else(|| format!("shift '{}' has no amount", shift))?;
            if !(0..64).contains(&amount) {
                return Err(format!("shift amount {} out of range", amount));
            }
            Ok((kind, amount as u32))
        }
        _ => Err("too many operands".to_string()),
    }
}

fn is_extend(op: &str) -> bool {
    let name = op.split_whitespace().next().unwrap_or("");
    matches!(name, "uxtb" | "uxth" | "uxtw" | "uxtx" | "sxtb" | "sxth" | "sxtw" | "sxtx")
}

fn parse_extend(op: &str, wide: bool) -> Result<(u32, u32), String> {
    let mut words = op.split_whitespace();
    let option = match words.next() {
        Some("uxtb") => 0,
        Some("uxth") => 1,
        Some("uxtw") => 2,
        Some("uxtx") => 3,
        Some("sxtb") => 4,
        Some("sxth") => 5,
        Some("sxtw") => 6,
        Some("sxtx") => 7,
        Some("lsl") => {
            if wide {
                3
            } else {
                2
            }
        }
        _ => return Err(format!("invalid extend '{}'", op)),
    };
    let amount = words.next().map(parse_imm).transpose()?.unwrap_or(0);
    if !(0..=4).contains(&amount) {
        return Err(format!("extend amount {} out of range", amount));
    }
    Ok((option, amount as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::arm64::Arm64Decoder;

    fn encode(text: &str) -> u32 {
        Arm64Encoder::encode(text).unwrap()
    }

    #[test]
    fn test_encode_known_words() {
        assert_eq!(encode("stp x29, x30, [sp, #-0x10]!"), 0xA9BF7BFD);
        assert_eq!(encode("ldp x29, x30, [sp]"), 0xA9407BFD);
        assert_eq!(encode("mov x29, sp"), 0x910003FD);
        assert_eq!(encode("mov x0, x1"), 0xAA0103E0);
        assert_eq!(encode("ldr x0, [x1, x2]"), 0xF8626820);
        assert_eq!(encode("ldaxr w8, [x0]"), 0x885FFC08);
        assert_eq!(encode("ldar x0, [x1]"), 0xC8DFFC20);
        assert_eq!(encode("sxtb x0, w1"), 0x93401C20);
        assert_eq!(encode("sxtw x0, w1"), 0x93407C20);
        assert_eq!(encode("uxtb w0, w1"), 0x53001C20);
        assert_eq!(encode("uxth w0, w1"), 0x53003C20);
        assert_eq!(encode("cset w0, ne"), 0x1A9F07E0);
        assert_eq!(encode("mul x0, x1, x2"), 0x9B027C20);
    }

    #[test]
    fn test_encode_system() {
        assert_eq!(encode("nop"), 0xD503201F);
        assert_eq!(encode("paciasp"), 0xD503233F);
        assert_eq!(encode("dmb ish"), 0xD5033BBF);
        assert_eq!(encode("dsb sy"), 0xD5033F9F);
        assert_eq!(encode("isb"), 0xD5033FDF);
        assert_eq!(encode("mrs x8, tpidr_el0"), 0xD53BD048);
        assert_eq!(encode("ret"), 0xD65F03C0);
        assert_eq!(encode("blr x8"), 0xD63F0100);
    }

    #[test]
    fn test_encode_floating_point() {
        assert_eq!(encode("fadd s0, s1, s2"), 0x1E222820);
        assert_eq!(encode("fmov s0, s1"), 0x1E204020);
        assert_eq!(encode("fcvt d0, s1"), 0x1E22C020);
        assert_eq!(encode("scvtf d0, w1"), 0x1E620020);
        assert_eq!(encode("fcvtzs w0, s0"), 0x1E380000);
        assert_eq!(encode("fmov x0, d0"), 0x9E660000);
        assert_eq!(encode("fcmp s0, s1"), 0x1E212000);
    }

    #[test]
    fn test_register_forms_survive_round_trip() {
        let words = [
            0x8B020020u32, // add x0, x1, x2
            0xEB01001F,    // cmp x0, x1
            0x1AC20C20,    // sdiv w0, w1, w2
            0xF8627820,    // ldr x0, [x1, x2, lsl #3]
            0x880AFC09,    // stlxr w10, w9, [x0]
            0x6D0027E8,    // stp d8, d9, [sp]
            0xB9000020,    // str w0, [x1]
            0x39400020,    // ldrb w0, [x1]
            0xD51BD048,    // msr tpidr_el0, x8
            0xD37DF020,    // lsl x0, x1, #3
        ];
        for word in words {
            let text = Arm64Decoder::decode(word).unwrap();
            assert_eq!(Arm64Encoder::encode(&text), Ok(word), "{}", text);
        }
    }

    #[test]
    fn test_encode_rejects_garbage() {
        assert!(Arm64Encoder::encode("frobnicate x0").is_err());
        assert!(Arm64Encoder::encode("add x0, w1, x2").is_err());
        assert!(Arm64Encoder::encode("ldr x0").is_err());
        assert!(Arm64Encoder::encode(".inst 0x12345678").is_err());
        assert!(Arm64Encoder::encode("ldaddb x0, x0, [x1]").is_err());
        assert!(Arm64Encoder::encode("ldadd x0, w0, [x1]").is_err());
        assert!(Arm64Encoder::encode("add v0.4s, v1.4s, x2").is_err());
    }

    #[test]
    fn test_encode_vector_and_atomics() {
        assert_eq!(encode("mov v0.16b, v1.16b"), 0x4EA11C20);
        assert_eq!(encode("add v0.4s, v1.4s, v2.4s"), 0x4EA28420);
        assert_eq!(encode("ld1 {v0.16b}, [x0]"), 0x4C407000);
        assert_eq!(encode("dup v0.4s, w1"), 0x4E040C20);
        assert_eq!(encode("umov w0, v1.b[0]"), 0x0E013C20);
        assert_eq!(encode("ldadd x0, x0, [x1]"), 0xF8200020);
        assert_eq!(encode("swpal x0, x0, [x1]"), 0xF8E08020);
        assert_eq!(encode("casal x0, x0, [x1]"), 0xC8E0FC20);
    }

    #[test]
    fn test_vector_and_atomic_forms_survive_round_trip() {
        let words = [
            0x4E208400u32, // add v0.16b, v0.16b, v0.16b
            0x4EA11C20,    // mov v0.16b, v1.16b
            0x4C407000,    // ld1 {v0.16b}, [x0]
            0x4C00A020,    // st1 {v0.16b, v1.16b}, [x1]
            0x4E040C20,    // dup v0.4s, w1
            0x0E0C3C20,    // mov w0, v1.s[1]
            0xF8200020,    // ldadd x0, x0, [x1]
            0xF8E08020,    // swpal x0, x0, [x1]
            0xB820303F,    // stset w0, [x1]
            0x38604020,    // ldsmaxlb w0, w0, [x1]
            0xC8E0FC20,    // casal x0, x0, [x1]
            0x88A07C20,    // cas w0, w0, [x1]
        ];
        for word in words {
            let text = Arm64Decoder::decode(word).unwrap();
            assert!(!text.starts_with(".inst"), "{:08x}", word);
            assert_eq!(Arm64Encoder::encode(&text), Ok(word), "{}", text);
        }
    }
}
