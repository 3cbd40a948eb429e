// Fri Oct 16 2026 - Alex

//! Advanced SIMD vector forms: three-same, two-register miscellaneous, element copy, and
//! multiple-structure loads/stores, in both directions.

use super::encoder::{expect_count, gp, memory_base};
use super::{gpr, gpr_sp, GpReg};
use crate::codec::operands::{format_imm, parse_numbered, split_register_list};

type EncodeResult = Result<u32, String>;

const ARRANGEMENTS: [&str; 8] = ["8b", "16b", "4h", "8h", "2s", "4s", "1d", "2d"];
const ELEMENT_KINDS: [char; 4] = ['b', 'h', 's', 'd'];

const LOGICAL: [&str; 8] = ["and", "bic", "orr", "orn", "eor", "bsl", "bit", "bif"];

/// (opcode, U, mnemonic) for integer three-same operations.
const INTEGER_THREE_SAME: [(u32, u32, &str); 18] = [
    (0b00110, 0, "cmgt"),
    (0b00110, 1, "cmhi"),
    (0b00111, 0, "cmge"),
    (0b00111, 1, "cmhs"),
    (0b01000, 0, "sshl"),
    (0b01000, 1, "ushl"),
    (0b01100, 0, "smax"),
    (0b01100, 1, "umax"),
    (0b01101, 0, "smin"),
    (0b01101, 1, "umin"),
    (0b10000, 0, "add"),
    (0b10000, 1, "sub"),
    (0b10001, 0, "cmtst"),
    (0b10001, 1, "cmeq"),
    (0b10010, 0, "mla"),
    (0b10010, 1, "mls"),
    (0b10011, 0, "mul"),
    (0b10111, 0, "addp"),
];

/// (opcode, U, a, mnemonic) for floating-point three-same operations; `a` is size<1>.
const FLOAT_THREE_SAME: [(u32, u32, u32, &str); 15] = [
    (0b11000, 0, 0, "fmaxnm"),
    (0b11001, 0, 0, "fmla"),
    (0b11010, 0, 0, "fadd"),
    (0b11100, 0, 0, "fcmeq"),
    (0b11110, 0, 0, "fmax"),
    (0b11000, 0, 1, "fminnm"),
    (0b11001, 0, 1, "fmls"),
    (0b11010, 0, 1, "fsub"),
    (0b11110, 0, 1, "fmin"),
    (0b11010, 1, 0, "faddp"),
    (0b11011, 1, 0, "fmul"),
    (0b11100, 1, 0, "fcmge"),
    (0b11111, 1, 0, "fdiv"),
    (0b11010, 1, 1, "fabd"),
    (0b11100, 1, 1, "fcmgt"),
];

/// (opcode, U, mnemonic) for two-register miscellaneous operations.
const TWO_REGISTER_MISC: [(u32, u32, &str); 14] = [
    (0b00000, 0, "rev64"),
    (0b00000, 1, "rev32"),
    (0b00001, 0, "rev16"),
    (0b00101, 0, "cnt"),
    (0b00101, 1, "mvn"),
    (0b01011, 0, "abs"),
    (0b01011, 1, "neg"),
    (0b01111, 0, "fabs"),
    (0b01111, 1, "fneg"),
    (0b11111, 1, "fsqrt"),
    (0b11101, 0, "scvtf"),
    (0b11101, 1, "ucvtf"),
    (0b11011, 0, "fcvtzs"),
    (0b11011, 1, "fcvtzu"),
];

/// (opcode, structure, registers) for multiple-structure loads and stores.
const STRUCTURES: [(u32, u32, u32); 7] = [
    (0b0000, 4, 4),
    (0b0010, 1, 4),
    (0b0100, 3, 3),
    (0b0110, 1, 3),
    (0b0111, 1, 1),
    (0b1000, 2, 2),
    (0b1010, 1, 2),
];

fn arrangement(size: u32, q: u32) -> &'static str {
    ARRANGEMENTS[(((size & 3) << 1) | (q & 1)) as usize]
}

/// `2s`/`4s`/`2d` for a floating-point `sz`; `1d` does not exist.
fn float_arrangement(sz: u32, q: u32) -> Option<&'static str> {
    if sz == 1 && q == 0 {
        None
    } else {
        Some(arrangement(2 + sz, q))
    }
}

fn vreg(n: u32, arrangement: &str) -> String {
    format!("v{}.{}", n & 0x1F, arrangement)
}

fn element(n: u32, size: u32, index: u32) -> String {
    format!("v{}.{}[{}]", n & 0x1F, ELEMENT_KINDS[size as usize], index)
}

/// Operands written with vector syntax route the whole instruction here.
pub(crate) fn is_vector_operand(op: &str) -> bool {
    let op = op.trim();
    op.starts_with('{') || (op.starts_with('v') && op.contains('.'))
}

pub(crate) fn decode_vector(raw: u32) -> Option<String> {
    if raw & 0x9F200400 == 0x0E200400 {
        return decode_three_same(raw);
    }
    if raw & 0x9F3E0C00 == 0x0E200800 {
        return decode_two_register_misc(raw);
    }
    if raw & 0x9FE08400 == 0x0E000400 {
        return decode_copy(raw);
    }
    None
}

fn decode_three_same(raw: u32) -> Option<String> {
    let q = (raw >> 30) & 1;
    let u = (raw >> 29) & 1;
    let size = (raw >> 22) & 0x3;
    let rm = (raw >> 16) & 0x1F;
    let opcode = (raw >> 11) & 0x1F;
    let rn = (raw >> 5) & 0x1F;
    let rd = raw & 0x1F;

    let (mnemonic, t) = if opcode == 0b00011 {
        let t = arrangement(0, q);
        if u == 0 && size == 0b10 && rm == rn {
            return Some(format!("mov {}, {}", vreg(rd, t), vreg(rn, t)));
        }
        (LOGICAL[((u << 2) | size) as usize], t)
    } else if opcode >= 0b11000 {
        let a = size >> 1;
        let (_, _, _, mnemonic) = FLOAT_THREE_SAME
            .iter()
            .find(|&&(op, uu, aa, _)| op == opcode && uu == u && aa == a)?;
        (*mnemonic, float_arrangement(size & 1, q)?)
    } else {
        let (_, _, mnemonic) = INTEGER_THREE_SAME
            .iter()
            .find(|&&(op, uu, _)| op == opcode && uu == u)?;
        if size == 0b11 && (q == 0 || matches!(*mnemonic, "mla" | "mls" | "mul")) {
            return None;
        }
        (*mnemonic, arrangement(size, q))
    };

    Some(format!("{} {}, {}, {}", mnemonic, vreg(rd, t), vreg(rn, t), vreg(rm, t)))
}

fn decode_two_register_misc(raw: u32) -> Option<String> {
    let q = (raw >> 30) & 1;
    let u = (raw >> 29) & 1;
    let size = (raw >> 22) & 0x3;
    let opcode = (raw >> 12) & 0x1F;
    let rn = (raw >> 5) & 0x1F;
    let rd = raw & 0x1F;

    let (_, _, mnemonic) = TWO_REGISTER_MISC
        .iter()
        .find(|&&(op, uu, _)| op == opcode && uu == u)?;

    let t = match *mnemonic {
        "rev64" if size != 0b11 => arrangement(size, q),
        "rev32" if size < 0b10 => arrangement(size, q),
        "rev16" | "cnt" | "mvn" if size == 0 => arrangement(size, q),
        "abs" | "neg" if size != 0b11 || q == 1 => arrangement(size, q),
        "fabs" | "fneg" | "fsqrt" | "fcvtzs" | "fcvtzu" if size >= 0b10 => float_arrangement(size & 1, q)?,
        "scvtf" | "ucvtf" if size < 0b10 => float_arrangement(size & 1, q)?,
        _ => return None,
    };

    Some(format!("{} {}, {}", mnemonic, vreg(rd, t), vreg(rn, t)))
}

fn decode_copy(raw: u32) -> Option<String> {
    let q = (raw >> 30) & 1;
    let op = (raw >> 29) & 1;
    let imm5 = (raw >> 16) & 0x1F;
    let imm4 = (raw >> 11) & 0xF;
    let rn = (raw >> 5) & 0x1F;
    let rd = raw & 0x1F;

    let size = imm5.trailing_zeros();
    if size > 3 {
        return None;
    }
    let index = imm5 >> (size + 1);

    match (op, imm4) {
        (1, _) if q == 1 => Some(format!(
            "mov {}, {}",
            element(rd, size, index),
            element(rn, size, imm4 >> size)
        )),
        (0, 0b0000) if size < 3 || q == 1 => Some(format!(
            "dup {}, {}",
            vreg(rd, arrangement(size, q)),
            element(rn, size, index)
        )),
        (0, 0b0001) if size < 3 || q == 1 => Some(format!(
            "dup {}, {}",
            vreg(rd, arrangement(size, q)),
            gpr(rn, size == 3)
        )),
        (0, 0b0011) if q == 1 => Some(format!(
            "mov {}, {}",
            element(rd, size, index),
            gpr(rn, size == 3)
        )),
        (0, 0b0101) if size < 2 || (size == 2 && q == 1) => Some(format!(
            "smov {}, {}",
            gpr(rd, q == 1),
            element(rn, size, index)
        )),
        (0, 0b0111) if (size < 3 && q == 0) || (size == 3 && q == 1) => {
            let mnemonic = if size >= 2 { "mov" } else { "umov" };
            Some(format!("{} {}, {}", mnemonic, gpr(rd, size == 3), element(rn, size, index)))
        }
        _ => None,
    }
}

/// Multiple-structure loads and stores, with and without post-index.
pub(crate) fn decode_structure(raw: u32) -> Option<String> {
    let q = (raw >> 30) & 1;
    let post = (raw >> 23) & 1;
    let l = (raw >> 22) & 1;
    let rm = (raw >> 16) & 0x1F;
    let opcode = (raw >> 12) & 0xF;
    let size = (raw >> 10) & 0x3;
    let rn = (raw >> 5) & 0x1F;
    let rt = raw & 0x1F;

    if post == 0 && rm != 0 {
        return None;
    }

    let &(_, structure, count) = STRUCTURES.iter().find(|&&(op, _, _)| op == opcode)?;
    if size == 0b11 && q == 0 && structure != 1 {
        return None;
    }

    let t = arrangement(size, q);
    let list = (0..count).map(|i| vreg(rt + i, t)).collect::<Vec<_>>().join(", ");
    let mnemonic = format!("{}{}", if l == 1 { "ld" } else { "st" }, structure);
    let address = format!("[{}]", gpr_sp(rn, true));

    Some(match (post, rm) {
        (0, _) => format!("{} {{{}}}, {}", mnemonic, list, address),
        (_, 31) => format!(
            "{} {{{}}}, {}, {}",
            mnemonic,
            list,
            address,
            format_imm((count * (8 << q)) as i64)
        ),
        _ => format!("{} {{{}}}, {}, {}", mnemonic, list, address, gpr(rm, true)),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VectorReg {
    num: u32,
    size: u32,
    q: u32,
}

impl VectorReg {
    fn parse(s: &str) -> Option<Self> {
        let (reg, name) = s.trim().split_once('.')?;
        let num = parse_numbered(reg, "v", 31)?;
        let position = ARRANGEMENTS.iter().position(|&a| a == name)? as u32;
        Some(Self {
            num,
            size: position >> 1,
            q: position & 1,
        })
    }

    fn same_shape(&self, other: &VectorReg) -> bool {
        self.size == other.size && self.q == other.q
    }

    /// The floating-point `sz` bit for `2s`/`4s`/`2d`.
    fn float_sz(&self) -> Result<u32, String> {
        match (self.size, self.q) {
            (0b10, _) => Ok(0),
            (0b11, 1) => Ok(1),
            _ => Err("expected a 2s, 4s or 2d arrangement".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VectorElement {
    num: u32,
    size: u32,
    index: u32,
}

impl VectorElement {
    fn parse(s: &str) -> Option<Self> {
        let (reg, rest) = s.trim().split_once('.')?;
        let num = parse_numbered(reg, "v", 31)?;
        let kind = rest.chars().next()?;
        let size = ELEMENT_KINDS.iter().position(|&k| k == kind)? as u32;
        let index = rest[1..].strip_prefix('[')?.strip_suffix(']')?.parse::<u32>().ok()?;
        if index >= 16 >> size {
            return None;
        }
        Some(Self { num, size, index })
    }

    fn imm5(&self) -> u32 {
        ((self.index << 1) | 1) << self.size
    }
}

fn vector(op: &str) -> Result<VectorReg, String> {
    VectorReg::parse(op).ok_or_else(|| format!("expected vector register, got '{}'", op))
}

fn same_shape(regs: &[VectorReg]) -> Result<(), String> {
    if regs.windows(2).all(|w| w[0].same_shape(&w[1])) {
        Ok(())
    } else {
        Err("mixed vector arrangements".to_string())
    }
}

/// Rejects words the decoder would not render back, so reserved arrangements never pass.
fn checked(word: u32) -> EncodeResult {
    match decode_vector(word).or_else(|| decode_structure(word)) {
        Some(_) => Ok(word),
        None => Err("reserved arrangement for this instruction".to_string()),
    }
}

pub(crate) fn encode_vector(mnemonic: &str, ops: &[&str]) -> EncodeResult {
    match mnemonic {
        "mov" => encode_mov(ops),
        "dup" => encode_dup(ops),
        "umov" | "smov" => encode_move_to_general(mnemonic, ops),
        "ld1" | "ld2" | "ld3" | "ld4" | "st1" | "st2" | "st3" | "st4" => encode_structure(mnemonic, ops),
        _ => {
            if ops.len() == 2 {
                encode_two_register_misc(mnemonic, ops)
            } else {
                encode_three_same(mnemonic, ops)
            }
        }
    }
}

fn encode_three_same(mnemonic: &str, ops: &[&str]) -> EncodeResult {
    expect_count(ops, 3)?;
    let regs = [vector(ops[0])?, vector(ops[1])?, vector(ops[2])?];
    same_shape(&regs)?;
    let [rd, rn, rm] = regs;

    let (u, size, opcode) = if let Some(position) = LOGICAL.iter().position(|&m| m == mnemonic) {
        if rd.size != 0 {
            return Err(format!("{} takes 8b or 16b registers", mnemonic));
        }
        let position = position as u32;
        (position >> 2, position & 3, 0b00011)
    } else if let Some(&(opcode, u, a, _)) = FLOAT_THREE_SAME.iter().find(|entry| entry.3 == mnemonic) {
        (u, (a << 1) | rd.float_sz()?, opcode)
    } else if let Some(&(opcode, u, _)) = INTEGER_THREE_SAME.iter().find(|entry| entry.2 == mnemonic) {
        (u, rd.size, opcode)
    } else {
        return Err(format!("unsupported vector mnemonic '{}'", mnemonic));
    };

    checked(
        (rd.q << 30)
            | (u << 29)
            | 0x0E200400
            | (size << 22)
            | (rm.num << 16)
            | (opcode << 11)
            | (rn.num << 5)
            | rd.num,
    )
}

fn encode_two_register_misc(mnemonic: &str, ops: &[&str]) -> EncodeResult {
    let &(opcode, u, _) = TWO_REGISTER_MISC
        .iter()
        .find(|entry| entry.2 == mnemonic)
        .ok_or_else(|| format!("unsupported vector mnemonic '{}'", mnemonic))?;
    let regs = [vector(ops[0])?, vector(ops[1])?];
    same_shape(&regs)?;
    let [rd, rn] = regs;

    let size = match mnemonic {
        "fabs" | "fneg" | "fsqrt" | "fcvtzs" | "fcvtzu" => 0b10 | rd.float_sz()?,
        "scvtf" | "ucvtf" => rd.float_sz()?,
        _ => rd.size,
    };

    checked(
        (rd.q << 30)
            | (u << 29)
            | 0x0E200800
            | (size << 22)
            | (opcode << 12)
            | (rn.num << 5)
            | rd.num,
    )
}

fn encode_mov(ops: &[&str]) -> EncodeResult {
    expect_count(ops, 2)?;

    if let Some(rd) = VectorReg::parse(ops[0]) {
        let rn = vector(ops[1])?;
        if !rd.same_shape(&rn) || rd.size != 0 {
            return Err("vector mov takes matching 8b or 16b registers".to_string());
        }
        return checked((rd.q << 30) | 0x0EA01C00 | (rn.num << 16) | (rn.num << 5) | rd.num);
    }

    if let Some(dest) = VectorElement::parse(ops[0]) {
        if let Some(source) = VectorElement::parse(ops[1]) {
            if source.size != dest.size {
                return Err("mixed element sizes".to_string());
            }
            let imm4 = source.index << source.size;
            return checked(
                0x6E000400 | (dest.imm5() << 16) | (imm4 << 11) | (source.num << 5) | dest.num,
            );
        }
        let rn = general_for(ops[1], dest.size)?;
        return checked(0x4E001C00 | (dest.imm5() << 16) | (rn.num << 5) | dest.num);
    }

    encode_move_to_general("umov", ops)
}

fn encode_dup(ops: &[&str]) -> EncodeResult {
    expect_count(ops, 2)?;
    let rd = vector(ops[0])?;

    let (imm4, imm5, rn) = match VectorElement::parse(ops[1]) {
        Some(source) => {
            if source.size != rd.size {
                return Err("element size does not match the arrangement".to_string());
            }
            (0b0000, source.imm5(), source.num)
        }
        None => (0b0001, 1 << rd.size, general_for(ops[1], rd.size)?.num),
    };

    checked((rd.q << 30) | 0x0E000400 | (imm5 << 16) | (imm4 << 11) | (rn << 5) | rd.num)
}

fn encode_move_to_general(mnemonic: &str, ops: &[&str]) -> EncodeResult {
    expect_count(ops, 2)?;
    let rd = gp(ops[0])?;
    let source = VectorElement::parse(ops[1])
        .ok_or_else(|| format!("expected vector element, got '{}'", ops[1]))?;
    if rd.is_sp() {
        return Err("sp cannot be a destination here".to_string());
    }

    let imm4 = if mnemonic == "smov" { 0b0101 } else { 0b0111 };
    let word = ((rd.wide as u32) << 30)
        | 0x0E000400
        | (source.imm5() << 16)
        | (imm4 << 11)
        | (source.num << 5)
        | rd.num;

    // `mov` is only the preferred spelling for 32- and 64-bit elements.
    let decoded = decode_copy(word).ok_or("reserved element size for this move")?;
    if decoded.split_whitespace().next() != Some(mnemonic) && !(mnemonic == "umov" && decoded.starts_with("mov")) {
        return Err(format!("'{}' does not encode this element move", mnemonic));
    }
    Ok(word)
}

/// The general-purpose source register for an element of `size`: `x` only for 64-bit elements.
fn general_for(op: &str, size: u32) -> Result<GpReg, String> {
    let reg = gp(op)?;
    if reg.is_sp() || reg.wide != (size == 3) {
        return Err(format!("'{}' does not match the element size", op));
    }
    Ok(reg)
}

fn encode_structure(mnemonic: &str, ops: &[&str]) -> EncodeResult {
    if ops.len() != 2 && ops.len() != 3 {
        return Err(format!("expected 2 or 3 operands, got {}", ops.len()));
    }

    let l = u32::from(mnemonic.starts_with("ld"));
    let structure = mnemonic[2..]
        .parse::<u32>()
        .map_err(|_| format!("unknown structure count in '{}'", mnemonic))?;

    let names = split_register_list(ops[0]).ok_or_else(|| format!("expected register list, got '{}'", ops[0]))?;
    let regs = names.iter().map(|name| vector(name)).collect::<Result<Vec<_>, _>>()?;
    same_shape(&regs)?;
    if regs.windows(2).any(|w| w[1].num != (w[0].num + 1) % 32) {
        return Err("register list must be consecutive".to_string());
    }

    let count = regs.len() as u32;
    let &(opcode, _, _) = STRUCTURES
        .iter()
        .find(|&&(_, s, c)| s == structure && c == count)
        .ok_or_else(|| format!("{} cannot take {} registers", mnemonic, count))?;

    let rn = memory_base(ops[1])?;
    let (post, rm) = match ops.get(2) {
        None => (0, 0),
        Some(index) => {
            let rm = gp(index)?;
            if !rm.wide || rm.is_zr() || rm.is_sp() {
                return Err(format!("invalid post-index register '{}'", index));
            }
            (1, rm.num)
        }
    };

    let first = regs[0];
    checked(
        (first.q << 30)
            | 0x0C000000
            | (post << 23)
            | (l << 22)
            | (rm << 16)
            | (opcode << 12)
            | (first.size << 10)
            | (rn << 5)
            | first.num,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: u32) -> String {
        decode_vector(raw).or_else(|| decode_structure(raw)).unwrap()
    }

    #[test]
    fn test_decode_three_same() {
        assert_eq!(decode(0x4EA11C20), "mov v0.16b, v1.16b");
        assert_eq!(decode(0x4EA28420), "add v0.4s, v1.4s, v2.4s");
        assert_eq!(decode(0x4E208400), "add v0.16b, v0.16b, v0.16b");
        assert_eq!(decode(0x6E221C20), "eor v0.16b, v1.16b, v2.16b");
        assert_eq!(decode(0x4E22D420), "fadd v0.4s, v1.4s, v2.4s");
        assert_eq!(decode(0x6E62DC20), "fmul v0.2d, v1.2d, v2.2d");
        assert!(decode_vector(0x0EE28420).is_none());
    }

    #[test]
    fn test_decode_two_register_misc_and_copy() {
        assert_eq!(decode(0x6E205820), "mvn v0.16b, v1.16b");
        assert_eq!(decode(0x4E205820), "cnt v0.16b, v1.16b");
        assert_eq!(decode(0x4EA0F820), "fabs v0.4s, v1.4s");
        assert_eq!(decode(0x4E040C20), "dup v0.4s, w1");
        assert_eq!(decode(0x0E013C20), "umov w0, v1.b[0]");
        assert_eq!(decode(0x0E0C3C20), "mov w0, v1.s[1]");
        assert_eq!(decode(0x4E0C1C20), "mov v0.s[1], w1");
        assert_eq!(decode(0x4E0C0420), "dup v0.4s, v1.s[1]");
    }

    #[test]
    fn test_decode_structures() {
        assert_eq!(decode(0x4C407000), "ld1 {v0.16b}, [x0]");
        assert_eq!(decode(0x4C00A020), "st1 {v0.16b, v1.16b}, [x1]");
        assert_eq!(decode(0x4CDF7000), "ld1 {v0.16b}, [x0], #0x10");
        assert_eq!(decode(0x4CC27000), "ld1 {v0.16b}, [x0], x2");
        assert!(decode_structure(0x0C408C00).is_none());
    }

    #[test]
    fn test_vector_words_round_trip() {
        let words = [
            0x4EA11C20u32, // mov v0.16b, v1.16b
            0x4EA28420,    // add v0.4s, v1.4s, v2.4s
            0x6EA28420,    // sub v0.4s, v1.4s, v2.4s
            0x0E221C20,    // and v0.8b, v1.8b, v2.8b
            0x6E221C20,    // eor v0.16b, v1.16b, v2.16b
            0x4E229C20,    // mul v0.16b, v1.16b, v2.16b
            0x6EE28C20,    // cmeq v0.2d, v1.2d, v2.2d
            0x4E22D420,    // fadd v0.4s, v1.4s, v2.4s
            0x6E62DC20,    // fmul v0.2d, v1.2d, v2.2d
            0x6E205820,    // mvn v0.16b, v1.16b
            0x4EA0F820,    // fabs v0.4s, v1.4s
            0x4E21D820,    // scvtf v0.4s, v1.4s
            0x4E040C20,    // dup v0.4s, w1
            0x4E0C0420,    // dup v0.4s, v1.s[1]
            0x0E013C20,    // umov w0, v1.b[0]
            0x0E0C3C20,    // mov w0, v1.s[1]
            0x4E183C20,    // mov x0, v1.d[1]
            0x0E032C20,    // smov w0, v1.b[1]
            0x4E0C1C20,    // mov v0.s[1], w1
            0x6E0C4420,    // mov v0.s[1], v1.s[2]
            0x4C407000,    // ld1 {v0.16b}, [x0]
            0x4C00A020,    // st1 {v0.16b, v1.16b}, [x1]
            0x4C402000,    // ld1 {v0.16b, v1.16b, v2.16b, v3.16b}, [x0]
            0x4CC27000,    // ld1 {v0.16b}, [x0], x2
        ];
        for word in words {
            let text = decode(word);
            let (mnemonic, operands) = crate::codec::operands::split_instruction(&text);
            let ops = operands.iter().map(String::as_str).collect::<Vec<_>>();
            assert_eq!(encode_vector(&mnemonic, &ops), Ok(word), "{}", text);
        }
    }

    #[test]
    fn test_encode_rejects_reserved_shapes() {
        assert!(encode_vector("add", &["v0.1d", "v1.1d", "v2.1d"]).is_err());
        assert!(encode_vector("mul", &["v0.2d", "v1.2d", "v2.2d"]).is_err());
        assert!(encode_vector("add", &["v0.4s", "v1.4s", "v2.8h"]).is_err());
        assert!(encode_vector("fadd", &["v0.8h", "v1.8h", "v2.8h"]).is_err());
        assert!(encode_vector("ld2", &["{v0.16b, v2.16b}", "[x0]"]).is_err());
        assert!(encode_vector("dup", &["v0.4s", "x1"]).is_err());
        assert!(encode_vector("umov", &["w0", "v1.s[1]"]).is_ok());
        assert!(encode_vector("smov", &["w0", "v1.s[1]"]).is_err());
    }
}
