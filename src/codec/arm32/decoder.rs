// Fri Oct 16 2026 - Alex

use super::{dreg, reg, reg_list, sreg};
use crate::codec::operands::{
    barrier_option_name, condition_name, expand_fp_imm8, format_imm, format_target, sign_extend,
};

pub(crate) const DATA_OPCODES: [&str; 16] = [
    "and", "eor", "sub", "rsb", "add", "adc", "sbc", "rsc", "tst", "teq", "cmp", "cmn", "orr",
    "mov", "bic", "mvn",
];

pub(crate) const SHIFT_NAMES: [&str; 4] = ["lsl", "lsr", "asr", "ror"];

pub struct Arm32Decoder;

impl Arm32Decoder {
    /// Returns `None` for undefined words in the unconditional space.
    pub fn decode(raw: u32) -> Option<String> {
        let cond = raw >> 28;
        if cond == 0xF {
            return Self::decode_unconditional(raw);
        }

        let text = match (raw >> 25) & 0x7 {
            0b000 => Self::decode_group_zero(raw),
            0b001 => Self::decode_data_processing_imm(raw),
            0b010 => Self::decode_load_store(raw),
            0b011 if (raw >> 4) & 1 == 1 => Self::decode_media(raw),
            0b011 => Self::decode_load_store(raw),
            0b100 => Self::decode_block_transfer(raw),
            0b101 => Self::decode_branch(raw),
            0b110 => Self::decode_coprocessor_transfer(raw),
            _ => Self::decode_coprocessor_data(raw),
        };
        Some(text)
    }

    fn unknown(raw: u32) -> String {
        format!(".inst 0x{:08x}", raw)
    }

    fn cond(raw: u32) -> &'static str {
        match raw >> 28 {
            0xE => "",
            c => condition_name(c),
        }
    }

    fn decode_unconditional(raw: u32) -> Option<String> {
        if raw & 0xFFFFFFF0 == 0xF57FF050 || raw & 0xFFFFFFF0 == 0xF57FF040 {
            let mnemonic = if raw & 0xF0 == 0x50 { "dmb" } else { "dsb" };
            let option = match barrier_option_name(raw & 0xF) {
                Some(option) => option.to_string(),
                None => format_imm((raw & 0xF) as i64),
            };
            return Some(format!("{} {}", mnemonic, option));
        }

        if raw & 0xFFFFFFF0 == 0xF57FF060 {
            return Some(match raw & 0xF {
                0xF => "isb sy".to_string(),
                option => format!("isb {}", format_imm(option as i64)),
            });
        }

        if raw == 0xF57FF01F {
            return Some("clrex".to_string());
        }

        if raw & 0xFF70F000 == 0xF550F000 {
            let rn = (raw >> 16) & 0xF;
            let imm = (raw & 0xFFF) as i64;
            let up = (raw >> 23) & 1 == 1;
            return Some(match (imm, up) {
                (0, true) => format!("pld [{}]", reg(rn)),
                (imm, true) => format!("pld [{}, {}]", reg(rn), format_imm(imm)),
                (imm, false) => format!("pld [{}, {}]", reg(rn), format_imm(-imm)),
            });
        }

        // Advanced SIMD data processing and element/structure loads and stores.
        if raw & 0xFE000000 == 0xF2000000 || raw & 0xFF100000 == 0xF4000000 {
            return Some(Self::unknown(raw));
        }

        if raw & 0xFE000000 == 0xFA000000 {
            let h = (raw >> 24) & 1;
            let offset = (sign_extend(raw & 0xFFFFFF, 24) << 2) | ((h as i64) << 1);
            return Some(format!("blx {}", format_target(8 + offset)));
        }

        None
    }

    fn decode_group_zero(raw: u32) -> String {
        if raw & 0x0F0000F0 == 0x00000090 {
            return Self::decode_multiply(raw);
        }
        if raw & 0x0F0000F0 == 0x01000090 {
            return Self::decode_synchronization(raw);
        }
        if raw & 0x0E000090 == 0x00000090 {
            return Self::decode_extra_load_store(raw);
        }
        if raw & 0x0F900000 == 0x01000000 {
            return if (raw >> 7) & 1 == 0 {
                Self::decode_miscellaneous(raw)
            } else {
                Self::unknown(raw)
            };
        }
        Self::decode_data_processing_reg(raw)
    }

    fn data_mnemonic(raw: u32, opcode: u32) -> String {
        let s = (raw >> 20) & 1 == 1;
        let suffix = if s && !(8..=11).contains(&opcode) { "s" } else { "" };
        format!("{}{}{}", DATA_OPCODES[opcode as usize], suffix, Self::cond(raw))
    }

    fn decode_data_processing_reg(raw: u32) -> String {
        let opcode = (raw >> 21) & 0xF;
        let rn = (raw >> 16) & 0xF;
        let rd = (raw >> 12) & 0xF;
        let rm = raw & 0xF;
        let shift_type = (raw >> 5) & 0x3;
        let register_shift = (raw >> 4) & 1 == 1;
        let s_suffix = if (raw >> 20) & 1 == 1 { "s" } else { "" };

        if opcode == 13 {
            if register_shift {
                let rs = (raw >> 8) & 0xF;
                return format!(
                    "{}{}{} {}, {}, {}",
                    SHIFT_NAMES[shift_type as usize],
                    s_suffix,
                    Self::cond(raw),
                    reg(rd),
                    reg(rm),
                    reg(rs)
                );
            }

            let amount = (raw >> 7) & 0x1F;
            return match (shift_type, amount) {
                (0, 0) => format!("mov{}{} {}, {}", s_suffix, Self::cond(raw), reg(rd), reg(rm)),
                (3, 0) => format!("rrx{}{} {}, {}", s_suffix, Self::cond(raw), reg(rd), reg(rm)),
                (kind, amount) => {
                    let amount = if amount == 0 { 32 } else { amount };
                    format!(
                        "{}{}{} {}, {}, {}",
                        SHIFT_NAMES[kind as usize],
                        s_suffix,
                        Self::cond(raw),
                        reg(rd),
                        reg(rm),
                        format_imm(amount as i64)
                    )
                }
            };
        }

        let operand = Self::shifted_register(raw);
        let mnemonic = Self::data_mnemonic(raw, opcode);

        match opcode {
            8..=11 => format!("{} {}, {}", mnemonic, reg(rn), operand),
            15 => format!("{} {}, {}", mnemonic, reg(rd), operand),
            _ => format!("{} {}, {}, {}", mnemonic, reg(rd), reg(rn), operand),
        }
    }

    /// Formats `rm` with its optional immediate or register shift.
    fn shifted_register(raw: u32) -> String {
        let rm = raw & 0xF;
        let shift_type = (raw >> 5) & 0x3;

        if (raw >> 4) & 1 == 1 {
            let rs = (raw >> 8) & 0xF;
            return format!("{}, {} {}", reg(rm), SHIFT_NAMES[shift_type as usize], reg(rs));
        }

        let amount = (raw >> 7) & 0x1F;
        match (shift_type, amount) {
            (0, 0) => reg(rm).to_string(),
            (3, 0) => format!("{}, rrx", reg(rm)),
            (kind, amount) => {
                let amount = if amount == 0 { 32 } else { amount };
                format!("{}, {} #{}", reg(rm), SHIFT_NAMES[kind as usize], amount)
            }
        }
    }

    fn decode_data_processing_imm(raw: u32) -> String {
        let rd = (raw >> 12) & 0xF;

        match raw & 0x0FB00000 {
            0x03000000 | 0x03400000 => {
                let imm16 = ((raw >> 4) & 0xF000) | (raw & 0xFFF);
                let mnemonic = if (raw >> 22) & 1 == 1 { "movt" } else { "movw" };
                return format!("{}{} {}, {}", mnemonic, Self::cond(raw), reg(rd), format_imm(imm16 as i64));
            }
            0x03200000 => {
                if raw & 0x000FFF00 != 0x0000F000 {
                    return Self::unknown(raw);
                }
                let hint = match raw & 0xFF {
                    0 => "nop",
                    1 => "yield",
                    2 => "wfe",
                    3 => "wfi",
                    4 => "sev",
                    _ => return Self::unknown(raw),
                };
                return format!("{}{}", hint, Self::cond(raw));
            }
            0x03600000 => return Self::unknown(raw),
            _ => {}
        }

        let opcode = (raw >> 21) & 0xF;
        let rn = (raw >> 16) & 0xF;
        let rotation = ((raw >> 8) & 0xF) * 2;
        let value = (raw & 0xFF).rotate_right(rotation);
        let imm = format_imm(value as i64);
        let mnemonic = Self::data_mnemonic(raw, opcode);

        match opcode {
            8..=11 => format!("{} {}, {}", mnemonic, reg(rn), imm),
            13 | 15 => format!("{} {}, {}", mnemonic, reg(rd), imm),
            _ => format!("{} {}, {}, {}", mnemonic, reg(rd), reg(rn), imm),
        }
    }

    fn decode_miscellaneous(raw: u32) -> String {
        let cond = Self::cond(raw);
        let rd = (raw >> 12) & 0xF;
        let rm = raw & 0xF;

        if raw & 0x0FFFFFF0 == 0x012FFF10 {
            return format!("bx{} {}", cond, reg(rm));
        }
        if raw & 0x0FFFFFF0 == 0x012FFF30 {
            return format!("blx{} {}", cond, reg(rm));
        }
        if raw & 0x0FFF0FF0 == 0x016F0F10 {
            return format!("clz{} {}, {}", cond, reg(rd), reg(rm));
        }
        if raw & 0x0FBF0FFF == 0x010F0000 {
            let source = if (raw >> 22) & 1 == 1 { "spsr" } else { "apsr" };
            return format!("mrs{} {}, {}", cond, reg(rd), source);
        }
        if raw & 0xFFF000F0 == 0xE1200070 {
            let imm16 = ((raw >> 4) & 0xFFF0) | (raw & 0xF);
            return format!("bkpt {}", format_imm(imm16 as i64));
        }

        Self::unknown(raw)
    }

    fn decode_multiply(raw: u32) -> String {
        let op = (raw >> 21) & 0x7;
        let s = if (raw >> 20) & 1 == 1 { "s" } else { "" };
        let cond = Self::cond(raw);
        let rd_hi = (raw >> 16) & 0xF;
        let ra_lo = (raw >> 12) & 0xF;
        let rm = (raw >> 8) & 0xF;
        let rn = raw & 0xF;

        match op {
            0b000 => format!("mul{}{} {}, {}, {}", s, cond, reg(rd_hi), reg(rn), reg(rm)),
            0b001 => format!(
                "mla{}{} {}, {}, {}, {}",
                s,
                cond,
                reg(rd_hi),
                reg(rn),
                reg(rm),
                reg(ra_lo)
            ),
            0b011 if s.is_empty() => format!(
                "mls{} {}, {}, {}, {}",
                cond,
                reg(rd_hi),
                reg(rn),
                reg(rm),
                reg(ra_lo)
            ),
            0b100..=0b111 => {
                let mnemonic = ["umull", "umlal", "smull", "smlal"][(op - 0b100) as usize];
                format!(
                    "{}{}{} {}, {}, {}, {}",
                    mnemonic,
                    s,
                    cond,
                    reg(ra_lo),
                    reg(rd_hi),
                    reg(rn),
                    reg(rm)
                )
            }
            _ => Self::unknown(raw),
        }
    }

    fn decode_synchronization(raw: u32) -> String {
        let op = (raw >> 20) & 0xF;
        let rn = (raw >> 16) & 0xF;
        let rt = (raw >> 12) & 0xF;
        let cond = Self::cond(raw);

        if (raw >> 23) & 1 == 0 {
            return Self::unknown(raw);
        }

        let (mnemonic, load) = match op {
            0b1000 => ("strex", false),
            0b1001 => ("ldrex", true),
            0b1100 => ("strexb", false),
            0b1101 => ("ldrexb", true),
            0b1110 => ("strexh", false),
            0b1111 => ("ldrexh", true),
            _ => return Self::unknown(raw),
        };

        if load {
            if raw & 0xF0F != 0xF0F {
                return Self::unknown(raw);
            }
            format!("{}{} {}, [{}]", mnemonic, cond, reg(rt), reg(rn))
        } else {
            if raw & 0xF00 != 0xF00 {
                return Self::unknown(raw);
            }
            format!("{}{} {}, {}, [{}]", mnemonic, cond, reg(rt), reg(raw & 0xF), reg(rn))
        }
    }

    fn decode_extra_load_store(raw: u32) -> String {
        let p = (raw >> 24) & 1 == 1;
        let u = (raw >> 23) & 1 == 1;
        let immediate = (raw >> 22) & 1 == 1;
        let w = (raw >> 21) & 1 == 1;
        let l = (raw >> 20) & 1;
        let rn = (raw >> 16) & 0xF;
        let rt = (raw >> 12) & 0xF;
        let op2 = (raw >> 5) & 0x3;

        if !p && w {
            return Self::unknown(raw);
        }

        let mnemonic = match (op2, l) {
            (0b01, 0) => "strh",
            (0b01, _) => "ldrh",
            (0b10, 0) => "ldrd",
            (0b10, _) => "ldrsb",
            (0b11, 0) => "strd",
            _ => "ldrsh",
        };

        let offset = if immediate {
            let imm = (((raw >> 4) & 0xF0) | (raw & 0xF)) as i64;
            if imm == 0 && u {
                None
            } else if u {
                Some(format_imm(imm))
            } else {
                Some(format!("#-{}", &format_imm(imm)[1..]))
            }
        } else {
            if (raw >> 8) & 0xF != 0 {
                return Self::unknown(raw);
            }
            let sign = if u { "" } else { "-" };
            Some(format!("{}{}", sign, reg(raw & 0xF)))
        };

        let target = if mnemonic.ends_with('d') {
            if rt & 1 == 1 || rt == 14 {
                return Self::unknown(raw);
            }
            format!("{}, {}", reg(rt), reg(rt + 1))
        } else {
            reg(rt).to_string()
        };

        let address = format_address(reg(rn), offset, p, w);
        format!("{}{} {}, {}", mnemonic, Self::cond(raw), target, address)
    }

    fn decode_load_store(raw: u32) -> String {
        let register = (raw >> 25) & 1 == 1;
        let p = (raw >> 24) & 1 == 1;
        let u = (raw >> 23) & 1 == 1;
        let byte = (raw >> 22) & 1 == 1;
        let w = (raw >> 21) & 1 == 1;
        let l = (raw >> 20) & 1 == 1;
        let rn = (raw >> 16) & 0xF;
        let rt = (raw >> 12) & 0xF;

        if !p && w {
            return Self::unknown(raw);
        }

        let cond = Self::cond(raw);
        if raw & 0x0FFF0FFF == 0x052D0004 {
            return format!("push{} {{{}}}", cond, reg(rt));
        }
        if raw & 0x0FFF0FFF == 0x049D0004 {
            return format!("pop{} {{{}}}", cond, reg(rt));
        }

        let mnemonic = match (l, byte) {
            (false, false) => "str",
            (false, true) => "strb",
            (true, false) => "ldr",
            (true, true) => "ldrb",
        };

        let offset = if register {
            let sign = if u { "" } else { "-" };
            Some(format!("{}{}", sign, Self::shifted_register(raw & 0xFFF)))
        } else {
            let imm = (raw & 0xFFF) as i64;
            match (imm, u) {
                (0, true) => None,
                (imm, true) => Some(format_imm(imm)),
                (imm, false) => Some(format!("#-{}", &format_imm(imm)[1..])),
            }
        };

        let address = format_address(reg(rn), offset, p, w);
        format!("{}{} {}, {}", mnemonic, cond, reg(rt), address)
    }

    fn decode_media(raw: u32) -> String {
        let cond = Self::cond(raw);
        let rd = (raw >> 12) & 0xF;
        let rm = raw & 0xF;

        let extend = match raw & 0x0FFF03F0 {
            0x06AF0070 => Some("sxtb"),
            0x06BF0070 => Some("sxth"),
            0x06EF0070 => Some("uxtb"),
            0x06FF0070 => Some("uxth"),
            _ => None,
        };
        if let Some(mnemonic) = extend {
            let rotation = ((raw >> 10) & 0x3) * 8;
            return if rotation == 0 {
                format!("{}{} {}, {}", mnemonic, cond, reg(rd), reg(rm))
            } else {
                format!("{}{} {}, {}, ror #{}", mnemonic, cond, reg(rd), reg(rm), rotation)
            };
        }

        let reverse = match raw & 0x0FFF0FF0 {
            0x06BF0F30 => Some("rev"),
            0x06BF0FB0 => Some("rev16"),
            0x06FF0FB0 => Some("revsh"),
            0x06FF0F30 => Some("rbit"),
            _ => None,
        };
        if let Some(mnemonic) = reverse {
            return format!("{}{} {}, {}", mnemonic, cond, reg(rd), reg(rm));
        }

        match raw & 0x0FF0F0F0 {
            0x0710F010 | 0x0730F010 => {
                let mnemonic = if raw & 0x00200000 != 0 { "udiv" } else { "sdiv" };
                let rd = (raw >> 16) & 0xF;
                let rm = (raw >> 8) & 0xF;
                return format!("{}{} {}, {}, {}", mnemonic, cond, reg(rd), reg(raw & 0xF), reg(rm));
            }
            _ => {}
        }

        let lsb = (raw >> 7) & 0x1F;
        let high = (raw >> 16) & 0x1F;
        match raw & 0x0FE00070 {
            0x07A00050 | 0x07E00050 => {
                let mnemonic = if raw & 0x00400000 != 0 { "ubfx" } else { "sbfx" };
                return format!(
                    "{}{} {}, {}, {}, {}",
                    mnemonic,
                    cond,
                    reg(rd),
                    reg(rm),
                    format_imm(lsb as i64),
                    format_imm((high + 1) as i64)
                );
            }
            0x07C00010 => {
                if high < lsb {
                    return Self::unknown(raw);
                }
                let width = format_imm((high - lsb + 1) as i64);
                return if rm == 15 {
                    format!("bfc{} {}, {}, {}", cond, reg(rd), format_imm(lsb as i64), width)
                } else {
                    format!("bfi{} {}, {}, {}, {}", cond, reg(rd), reg(rm), format_imm(lsb as i64), width)
                };
            }
            _ => {}
        }

        if raw & 0xFFF000F0 == 0xE7F000F0 {
            let imm16 = ((raw >> 4) & 0xFFF0) | (raw & 0xF);
            return format!("udf {}", format_imm(imm16 as i64));
        }

        Self::unknown(raw)
    }

    fn decode_block_transfer(raw: u32) -> String {
        let p = (raw >> 24) & 1;
        let u = (raw >> 23) & 1;
        let s = (raw >> 22) & 1;
        let w = (raw >> 21) & 1 == 1;
        let l = (raw >> 20) & 1 == 1;
        let rn = (raw >> 16) & 0xF;
        let list = raw & 0xFFFF;
        let cond = Self::cond(raw);

        if s == 1 || list == 0 {
            return Self::unknown(raw);
        }

        let multiple = list.count_ones() >= 2;
        if rn == 13 && w && multiple {
            if !l && p == 1 && u == 0 {
                return format!("push{} {}", cond, reg_list(list));
            }
            if l && p == 0 && u == 1 {
                return format!("pop{} {}", cond, reg_list(list));
            }
        }

        let mode = match (p, u) {
            (0, 1) => "",
            (1, 1) => "ib",
            (0, _) => "da",
            _ => "db",
        };
        let base = if l { "ldm" } else { "stm" };
        let writeback = if w { "!" } else { "" };

        format!("{}{}{} {}{}, {}", base, mode, cond, reg(rn), writeback, reg_list(list))
    }

    fn decode_branch(raw: u32) -> String {
        let mnemonic = if (raw >> 24) & 1 == 1 { "bl" } else { "b" };
        let offset = sign_extend(raw & 0xFFFFFF, 24) << 2;
        format!("{}{} {}", mnemonic, Self::cond(raw), format_target(8 + offset))
    }

    fn decode_coprocessor_transfer(raw: u32) -> String {
        let cond = Self::cond(raw);

        if raw & 0x0FE00FD0 == 0x0C400B10 {
            let rt = (raw >> 12) & 0xF;
            let rt2 = (raw >> 16) & 0xF;
            let dm = dreg((((raw >> 5) & 1) << 4) | (raw & 0xF));
            return if (raw >> 20) & 1 == 1 {
                format!("vmov{} {}, {}, {}", cond, reg(rt), reg(rt2), dm)
            } else {
                format!("vmov{} {}, {}, {}", cond, dm, reg(rt), reg(rt2))
            };
        }

        if raw & 0x0E00 != 0x0A00 {
            return Self::unknown(raw);
        }

        let double = (raw >> 8) & 1 == 1;
        let d = (raw >> 22) & 1;
        let vd = (raw >> 12) & 0xF;
        let first = if double { (d << 4) | vd } else { (vd << 1) | d };
        let imm8 = raw & 0xFF;
        let vreg = |n: u32| if double { dreg(n) } else { sreg(n) };

        if raw & 0x0F200000 == 0x0D000000 {
            let rn = (raw >> 16) & 0xF;
            let mnemonic = if (raw >> 20) & 1 == 1 { "vldr" } else { "vstr" };
            let offset = (imm8 * 4) as i64;
            let up = (raw >> 23) & 1 == 1;
            let address = match (offset, up) {
                (0, true) => format!("[{}]", reg(rn)),
                (offset, true) => format!("[{}, {}]", reg(rn), format_imm(offset)),
                (offset, false) => format!("[{}, {}]", reg(rn), format_imm(-offset)),
            };
            return format!("{}{} {}, {}", mnemonic, cond, vreg(first), address);
        }

        let push = raw & 0x0FBF0E00 == 0x0D2D0A00;
        let pop = raw & 0x0FBF0E00 == 0x0CBD0A00;
        if push || pop {
            let count = if double { imm8 / 2 } else { imm8 };
            if count == 0 || (double && imm8 & 1 == 1) || first + count > 32 {
                return Self::unknown(raw);
            }
            let regs = (first..first + count).map(vreg).collect::<Vec<_>>();
            let mnemonic = if push { "vpush" } else { "vpop" };
            return format!("{}{} {{{}}}", mnemonic, cond, regs.join(", "));
        }

        Self::unknown(raw)
    }

    fn decode_coprocessor_data(raw: u32) -> String {
        let cond = Self::cond(raw);

        if (raw >> 24) & 1 == 1 {
            return format!("svc{} {}", cond, format_imm((raw & 0xFFFFFF) as i64));
        }

        if raw & 0x0FE00F7F == 0x0E000A10 {
            let rt = (raw >> 12) & 0xF;
            let sn = sreg((((raw >> 16) & 0xF) << 1) | ((raw >> 7) & 1));
            return if (raw >> 20) & 1 == 1 {
                format!("vmov{} {}, {}", cond, reg(rt), sn)
            } else {
                format!("vmov{} {}, {}", cond, sn, reg(rt))
            };
        }

        if raw & 0x0FFF0FFF == 0x0EF10A10 {
            let rt = (raw >> 12) & 0xF;
            return if rt == 15 {
                format!("vmrs{} apsr_nzcv, fpscr", cond)
            } else {
                format!("vmrs{} {}, fpscr", cond, reg(rt))
            };
        }

        if raw & 0x0FFF0FFF == 0x0EE10A10 {
            return format!("vmsr{} fpscr, {}", cond, reg((raw >> 12) & 0xF));
        }

        if raw & 0x0F000E10 == 0x0E000A00 {
            return Self::decode_vfp_data_processing(raw, cond);
        }

        Self::unknown(raw)
    }

    fn decode_vfp_data_processing(raw: u32, cond: &str) -> String {
        let double = (raw >> 8) & 1 == 1;
        let dt = if double { "f64" } else { "f32" };
        let opc1 = (((raw >> 23) & 1) << 2) | ((raw >> 20) & 0x3);
        let op = (raw >> 6) & 1;

        let field = |v: u32, x: u32, dbl: bool| {
            if dbl {
                dreg((x << 4) | v)
            } else {
                sreg((v << 1) | x)
            }
        };
        let vd = |dbl| field((raw >> 12) & 0xF, (raw >> 22) & 1, dbl);
        let vn = |dbl| field((raw >> 16) & 0xF, (raw >> 7) & 1, dbl);
        let vm = |dbl| field(raw & 0xF, (raw >> 5) & 1, dbl);

        let three = |mnemonic: &str| {
            format!("{}{}.{} {}, {}, {}", mnemonic, cond, dt, vd(double), vn(double), vm(double))
        };

        match (opc1, op) {
            (0b000, 0) => return three("vmla"),
            (0b000, _) => return three("vmls"),
            (0b001, 0) => return three("vnmls"),
            (0b001, _) => return three("vnmla"),
            (0b010, 0) => return three("vmul"),
            (0b010, _) => return three("vnmul"),
            (0b011, 0) => return three("vadd"),
            (0b011, _) => return three("vsub"),
            (0b100, 0) => return three("vdiv"),
            (0b111, _) => {}
            _ => return Self::unknown(raw),
        }

        let opc2 = (raw >> 16) & 0xF;
        let opc3 = (raw >> 6) & 0x3;

        if opc3 & 1 == 0 {
            let imm8 = (((raw >> 16) & 0xF) << 4) | (raw & 0xF);
            if (raw >> 4) & 0xF != 0 {
                return Self::unknown(raw);
            }
            return format!("vmov{}.{} {}, #{:.8}", cond, dt, vd(double), expand_fp_imm8(imm8));
        }

        let two = |mnemonic: &str| format!("{}{}.{} {}, {}", mnemonic, cond, dt, vd(double), vm(double));

        match (opc2, opc3) {
            (0b0000, 0b01) => two("vmov"),
            (0b0000, 0b11) => two("vabs"),
            (0b0001, 0b01) => two("vneg"),
            (0b0001, 0b11) => two("vsqrt"),
            (0b0100, _) => two(if opc3 == 0b11 { "vcmpe" } else { "vcmp" }),
            (0b0101, _) => {
                if raw & 0x2F != 0 {
                    return Self::unknown(raw);
                }
                let mnemonic = if opc3 == 0b11 { "vcmpe" } else { "vcmp" };
                format!("{}{}.{} {}, #0", mnemonic, cond, dt, vd(double))
            }
            (0b0111, 0b11) => {
                let (to, from) = if double { ("f32", "f64") } else { ("f64", "f32") };
                format!("vcvt{}.{}.{} {}, {}", cond, to, from, vd(!double), vm(double))
            }
            (0b1000, _) => {
                let source = if opc3 & 0b10 != 0 { "s32" } else { "u32" };
                format!("vcvt{}.{}.{} {}, {}", cond, dt, source, vd(double), vm(false))
            }
            (0b1100, _) | (0b1101, _) => {
                let target = if opc2 == 0b1101 { "s32" } else { "u32" };
                let mnemonic = if opc3 & 0b10 != 0 { "vcvt" } else { "vcvtr" };
                format!("{}{}.{}.{} {}, {}", mnemonic, cond, target, dt, vd(false), vm(double))
            }
            _ => Self::unknown(raw),
        }
    }
}

/// Renders an addressing mode: `[rn]`, `[rn, off]`, `[rn, off]!` or `[rn], off`.
fn format_address(rn: &str, offset: Option<String>, pre_indexed: bool, writeback: bool) -> String {
    match (offset, pre_indexed, writeback) {
        (None, true, false) => format!("[{}]", rn),
        (None, true, true) => format!("[{}]!", rn),
        (None, false, _) => format!("[{}], #0", rn),
        (Some(offset), true, false) => format!("[{}, {}]", rn, offset),
        (Some(offset), true, true) => format!("[{}, {}]!", rn, offset),
        (Some(offset), false, _) => format!("[{}], {}", rn, offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: u32) -> String {
        Arm32Decoder::decode(raw).unwrap()
    }

    #[test]
    fn test_decode_data_processing() {
        assert_eq!(decode(0xE1A00001), "mov r0, r1");
        assert_eq!(decode(0xE0810002), "add r0, r1, r2");
        assert_eq!(decode(0xE2800001), "add r0, r0, #1");
        assert_eq!(decode(0xE0910002), "adds r0, r1, r2");
        assert_eq!(decode(0x00810002), "addeq r0, r1, r2");
        assert_eq!(decode(0xE1500001), "cmp r0, r1");
        assert_eq!(decode(0xE1A00101), "lsl r0, r1, #2");
        assert_eq!(decode(0xE1A00211), "lsl r0, r1, r2");
        assert_eq!(decode(0xE0810102), "add r0, r1, r2, lsl #2");
        assert_eq!(decode(0xE3A000FF), "mov r0, #0xff");
        assert_eq!(decode(0xE3010234), "movw r0, #0x1234");
    }

    #[test]
    fn test_decode_branches_and_misc() {
        assert_eq!(decode(0xE12FFF1E), "bx lr");
        assert_eq!(decode(0xE12FFF33), "blx r3");
        assert_eq!(decode(0xEAFFFFFE), "b #0x0");
        assert_eq!(decode(0xEB000000), "bl #0x8");
        assert_eq!(decode(0xE16F0F11), "clz r0, r1");
        assert_eq!(decode(0xE320F000), "nop");
        assert_eq!(decode(0xEF000000), "svc #0");
    }

    #[test]
    fn test_decode_memory() {
        assert_eq!(decode(0xE5910000), "ldr r0, [r1]");
        assert_eq!(decode(0xE5910004), "ldr r0, [r1, #4]");
        assert_eq!(decode(0xE7910002), "ldr r0, [r1, r2]");
        assert_eq!(decode(0xE5110004), "ldr r0, [r1, #-4]");
        assert_eq!(decode(0xE52D4004), "push {r4}");
        assert_eq!(decode(0xE49D4004), "pop {r4}");
        assert_eq!(decode(0xE92D4070), "push {r4, r5, r6, lr}");
        assert_eq!(decode(0xE8BD8070), "pop {r4, r5, r6, pc}");
        assert_eq!(decode(0xE8900006), "ldm r0, {r1, r2}");
        assert_eq!(decode(0xE1D100B0), "ldrh r0, [r1]");
        assert_eq!(decode(0xE19100B2), "ldrh r0, [r1, r2]");
        assert_eq!(decode(0xE1C020D0), "ldrd r2, r3, [r0]");
        assert_eq!(decode(0xE1910F9F), "ldrex r0, [r1]");
        assert_eq!(decode(0xE1802F91), "strex r2, r1, [r0]");
    }

    #[test]
    fn test_decode_media_and_multiply() {
        assert_eq!(decode(0xE6AF0071), "sxtb r0, r1");
        assert_eq!(decode(0xE6FF0071), "uxth r0, r1");
        assert_eq!(decode(0xE6BF0F31), "rev r0, r1");
        assert_eq!(decode(0xE710F110), "sdiv r0, r0, r1");
        assert_eq!(decode(0xE0000291), "mul r0, r1, r2");
        assert_eq!(decode(0xE0821394), "umull r1, r2, r4, r3");
        assert_eq!(decode(0xE7E70251), "ubfx r0, r1, #4, #8");
    }

    #[test]
    fn test_decode_vfp() {
        assert_eq!(decode(0xEE300A81), "vadd.f32 s0, s1, s2");
        assert_eq!(decode(0xEEB00A60), "vmov.f32 s0, s1");
        assert_eq!(decode(0xEEB40A60), "vcmp.f32 s0, s1");
        assert_eq!(decode(0xEEB40AE0), "vcmpe.f32 s0, s1");
        assert_eq!(decode(0xEEB70AC0), "vcvt.f64.f32 d0, s0");
        assert_eq!(decode(0xEEB80AC0), "vcvt.f32.s32 s0, s0");
        assert_eq!(decode(0xEEBD0AC0), "vcvt.s32.f32 s0, s0");
        assert_eq!(decode(0xEE000A10), "vmov s0, r0");
        assert_eq!(decode(0xEE100A90), "vmov r0, s1");
        assert_eq!(decode(0xEC410B10), "vmov d0, r0, r1");
        assert_eq!(decode(0xEEF1FA10), "vmrs apsr_nzcv, fpscr");
        assert_eq!(decode(0xED900B00), "vldr d0, [r0]");
        assert_eq!(decode(0xED2D8B04), "vpush {d8, d9}");
        assert_eq!(decode(0xECBD8B04), "vpop {d8, d9}");
    }

    #[test]
    fn test_decode_unconditional() {
        assert_eq!(decode(0xF57FF05B), "dmb ish");
        assert_eq!(decode(0xF57FF04F), "dsb sy");
        assert_eq!(decode(0xF57FF06F), "isb sy");
        assert_eq!(decode(0xF57FF01F), "clrex");
        assert_eq!(decode(0xF5D1F000), "pld [r1]");
        assert!(Arm32Decoder::decode(0xF0000000).is_none());
        assert!(Arm32Decoder::decode(0xFFFFFFFF).is_none());
    }

    #[test]
    fn test_decode_neon_as_allocated() {
        // vld1.8 {d0, d1}, [r0] / vorr q0, q0, q0 / vmul.f32 q0, q0, q0
        assert_eq!(decode(0xF4200A0F), ".inst 0xf4200a0f");
        assert_eq!(decode(0xF2200150), ".inst 0xf2200150");
        assert_eq!(decode(0xF3000D50), ".inst 0xf3000d50");
        assert_eq!(decode(0xF5D1F000), "pld [r1]");
    }
}
