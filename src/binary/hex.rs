// Fri Oct 16 2026 - Alex

use crate::binary::BinaryError;

/// Parses a file offset written in hex, with or without a `0x` prefix.
pub fn parse_offset(text: &str) -> Result<u64, BinaryError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(BinaryError::InvalidOffset(text.to_string()));
    }

    u64::from_str_radix(digits, 16).map_err(|_| BinaryError::InvalidOffset(text.to_string()))
}

/// Parses hex bytes, either whitespace-separated (`1F B4 09`) or contiguous (`1fb409`).
pub fn parse_hex(text: &str) -> Result<Vec<u8>, BinaryError> {
    let digits = text.split_whitespace().collect::<String>();

    if digits.is_empty() {
        return Err(BinaryError::InvalidHex("empty input".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(BinaryError::InvalidHex(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(BinaryError::InvalidHex(format!("unexpected character '{}'", bad)));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| BinaryError::InvalidHex(digits[i..i + 2].to_string()))
        })
        .collect()
}

/// Renders bytes as uppercase, space-separated hex pairs.
pub fn to_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("1A2B").unwrap(), 0x1A2B);
        assert_eq!(parse_offset("0x1a2b").unwrap(), 0x1A2B);
        assert_eq!(parse_offset(" 0 ").unwrap(), 0);
        assert!(matches!(parse_offset("0x"), Err(BinaryError::InvalidOffset(_))));
        assert!(matches!(parse_offset("xyz"), Err(BinaryError::InvalidOffset(_))));
    }

    #[test]
    fn test_parse_hex_accepts_both_layouts() {
        assert_eq!(parse_hex("1F B4 09").unwrap(), vec![0x1F, 0xB4, 0x09]);
        assert_eq!(parse_hex("1fb409").unwrap(), vec![0x1F, 0xB4, 0x09]);
        assert_eq!(parse_hex("1f b4\n09").unwrap(), vec![0x1F, 0xB4, 0x09]);
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert!(matches!(parse_hex(""), Err(BinaryError::InvalidHex(_))));
        assert!(matches!(parse_hex("ABC"), Err(BinaryError::InvalidHex(_))));
        assert!(matches!(parse_hex("GG"), Err(BinaryError::InvalidHex(_))));
        assert!(matches!(parse_hex("??"), Err(BinaryError::InvalidHex(_))));
    }

    #[test]
    fn test_to_hex_string() {
        assert_eq!(to_hex_string(&[0x1F, 0x20, 0x03, 0xD5]), "1F 20 03 D5");
        assert_eq!(to_hex_string(&[]), "");
    }
}
