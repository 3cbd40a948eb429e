// Fri Oct 16 2026 - Alex

//! Text helpers shared by the ARM32 and ARM64 codecs.

pub const CONDITIONS: [&str; 16] = [
    "eq", "ne", "hs", "lo", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt", "le", "al", "nv",
];

pub fn condition_name(cond: u32) -> &'static str {
    CONDITIONS[(cond & 0xF) as usize]
}

pub fn parse_condition(s: &str) -> Option<u32> {
    match s {
        "cs" => Some(0x2),
        "cc" => Some(0x3),
        _ => CONDITIONS.iter().position(|&c| c == s).map(|p| p as u32),
    }
}

pub fn invert_condition(cond: u32) -> u32 {
    (cond & 0xF) ^ 1
}

pub fn barrier_option_name(crm: u32) -> Option<&'static str> {
    match crm & 0xF {
        0xF => Some("sy"),
        0xE => Some("st"),
        0xD => Some("ld"),
        0xB => Some("ish"),
        0xA => Some("ishst"),
        0x9 => Some("ishld"),
        0x7 => Some("nsh"),
        0x6 => Some("nshst"),
        0x5 => Some("nshld"),
        0x3 => Some("osh"),
        0x2 => Some("oshst"),
        0x1 => Some("oshld"),
        _ => None,
    }
}

pub fn parse_barrier_option(s: &str) -> Option<u32> {
    (0..16u32).find(|&crm| barrier_option_name(crm) == Some(s))
}

/// Formats an immediate the way the disassemblers print it: decimal up to 9, hex above.
pub fn format_imm(value: i64) -> String {
    if value < 0 {
        if value > -10 {
            format!("#{}", value)
        } else {
            format!("#-0x{:x}", value.unsigned_abs())
        }
    } else if value > 9 {
        format!("#0x{:x}", value)
    } else {
        format!("#{}", value)
    }
}

pub fn format_target(target: i64) -> String {
    format!("#0x{:x}", target as u64)
}

/// Parses `#12`, `#-0x10` or a bare number.
pub fn parse_imm(op: &str) -> Result<i64, String> {
    let body = op.trim().trim_start_matches('#');
    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let value = match body.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => body.parse::<i64>(),
    }
    .map_err(|_| format!("invalid immediate '{}'", op))?;
    Ok(if negative { -value } else { value })
}

/// Expands an 8-bit VFP modified immediate into its floating-point value.
pub fn expand_fp_imm8(imm8: u32) -> f64 {
    let sign = if imm8 & 0x80 != 0 { -1.0 } else { 1.0 };
    let b = (imm8 >> 6) & 1;
    let exponent = ((((b ^ 1) << 2) | ((imm8 >> 4) & 0x3)) as i32) - 3;
    let fraction = 1.0 + (imm8 & 0xF) as f64 / 16.0;
    sign * fraction * 2f64.powi(exponent)
}

pub fn sign_extend(value: u32, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value as i64) << shift) >> shift
}

/// Splits `mnemonic op, op, ...` into a lowercase mnemonic and its top-level operands.
/// Commas inside `[...]` and `{...}` stay with their operand.
pub fn split_instruction(text: &str) -> (String, Vec<String>) {
    let text = text.trim();
    let (mnemonic, rest) = match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim()),
        None => (text, ""),
    };

    let mut operands = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in rest.chars() {
        match c {
            '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ']' | '}' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                operands.push(current.trim().to_lowercase());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() {
        operands.push(current.trim().to_lowercase());
    }

    (mnemonic.to_lowercase(), operands)
}

/// Breaks a bracketed memory operand into its inner comma-separated parts.
/// Returns the parts and whether a trailing `!` requested writeback.
pub fn split_memory(operand: &str) -> Option<(Vec<String>, bool)> {
    let operand = operand.trim();
    let (inner, writeback) = match operand.strip_suffix('!') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (operand, false),
    };

    let inner = inner.strip_prefix('[')?.strip_suffix(']')?;
    let parts = inner
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>();

    if parts.is_empty() {
        return None;
    }

    Some((parts, writeback))
}

pub fn split_register_list(operand: &str) -> Option<Vec<String>> {
    let inner = operand.trim().strip_prefix('{')?.strip_suffix('}')?;
    let regs = inner
        .split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>();
    if regs.is_empty() {
        None
    } else {
        Some(regs)
    }
}

pub fn parse_numbered(s: &str, prefix: &str, max: u32) -> Option<u32> {
    let digits = s.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n = digits.parse::<u32>().ok()?;
    if n <= max {
        Some(n)
    } else {
        None
    }
}

pub fn has_immediate(operand: &str) -> bool {
    operand.contains('#') || operand.contains("0x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_instruction_keeps_brackets_together() {
        let (mnemonic, ops) = split_instruction("LDR x0, [x1, x2, lsl #3]");
        assert_eq!(mnemonic, "ldr");
        assert_eq!(ops, vec!["x0".to_string(), "[x1, x2, lsl #3]".to_string()]);

        let (mnemonic, ops) = split_instruction("push {r4, r5, lr}");
        assert_eq!(mnemonic, "push");
        assert_eq!(ops, vec!["{r4, r5, lr}".to_string()]);

        let (mnemonic, ops) = split_instruction("ret");
        assert_eq!(mnemonic, "ret");
        assert!(ops.is_empty());
    }

    #[test]
    fn test_split_memory() {
        let (parts, wb) = split_memory("[sp, #-0x10]!").unwrap();
        assert_eq!(parts, vec!["sp".to_string(), "#-0x10".to_string()]);
        assert!(wb);

        let (parts, wb) = split_memory("[x8]").unwrap();
        assert_eq!(parts, vec!["x8".to_string()]);
        assert!(!wb);

        assert!(split_memory("x8").is_none());
    }

    #[test]
    fn test_format_imm() {
        assert_eq!(format_imm(4), "#4");
        assert_eq!(format_imm(16), "#0x10");
        assert_eq!(format_imm(-16), "#-0x10");
        assert_eq!(format_imm(-8), "#-8");
        assert_eq!(format_target(-4), "#0xfffffffffffffffc");
    }

    #[test]
    fn test_conditions() {
        assert_eq!(parse_condition("hs"), Some(2));
        assert_eq!(parse_condition("cs"), Some(2));
        assert_eq!(condition_name(invert_condition(0)), "ne");
        assert_eq!(parse_barrier_option("ish"), Some(0xB));
        assert_eq!(sign_extend(0x3FFFFFF, 26), -1);
    }

    #[test]
    fn test_immediates() {
        assert_eq!(parse_imm("#-0x10"), Ok(-16));
        assert_eq!(parse_imm("#12"), Ok(12));
        assert!(parse_imm("#zz").is_err());
        assert_eq!(expand_fp_imm8(0x70), 1.0);
        assert_eq!(expand_fp_imm8(0x00), 2.0);
        assert_eq!(expand_fp_imm8(0xF0), -1.0);
    }
}
