// Fri Oct 16 2026 - Alex

use crate::binary::to_hex_string;
use crate::pattern::{AobPattern, Segment};
use crate::signature::SignatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Qword,
    Dword,
    Word,
    Byte,
}

impl ValueType {
    /// Widest first.
    pub const ALL: [ValueType; 4] = [
        ValueType::Qword,
        ValueType::Dword,
        ValueType::Word,
        ValueType::Byte,
    ];

    pub fn width(&self) -> usize {
        match self {
            ValueType::Qword => 8,
            ValueType::Dword => 4,
            ValueType::Word => 2,
            ValueType::Byte => 1,
        }
    }

    /// Single-letter tag used in group search queries.
    pub fn tag(&self) -> char {
        match self {
            ValueType::Qword => 'Q',
            ValueType::Dword => 'D',
            ValueType::Word => 'W',
            ValueType::Byte => 'B',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Qword => "Qword",
            ValueType::Dword => "Dword",
            ValueType::Word => "Word",
            ValueType::Byte => "Byte",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ValueType::ALL
            .iter()
            .copied()
            .find(|t| t.name().to_lowercase() == wanted || t.tag().to_ascii_lowercase().to_string() == wanted)
            .ok_or_else(|| format!("Unrecognized value type: {}", s.trim()))
    }
}

/// A typed little-endian value carved out of a concrete AOB run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCandidate {
    pub hex: String,
    pub bytes: Vec<u8>,
    pub value: u64,
    pub value_type: ValueType,
    pub offset: usize,
}

impl ValueCandidate {
    pub fn new(bytes: &[u8], value_type: ValueType, offset: usize) -> Self {
        let value = bytes
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64);

        Self {
            hex: bytes.iter().map(|b| format!("{:02X}", b)).collect(),
            bytes: bytes.to_vec(),
            value,
            value_type,
            offset,
        }
    }

    pub fn width(&self) -> usize {
        self.value_type.width()
    }

    /// `<value><tag>`, e.g. `3573751839D`.
    pub fn token(&self) -> String {
        format!("{}{}", self.value, self.value_type.tag())
    }
}

impl fmt::Display for ValueCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (hex {}, offset {})", self.value, self.value_type, self.hex, self.offset)
    }
}

pub struct ValueExtractor {
    types: Vec<ValueType>,
}

impl ValueExtractor {
    pub fn new() -> Self {
        Self {
            types: ValueType::ALL.to_vec(),
        }
    }

    /// Restricts carving to `types`. Order and duplicates in the input do not matter.
    pub fn with_types(types: &[ValueType]) -> Result<Self, SignatureError> {
        let types = ValueType::ALL
            .iter()
            .copied()
            .filter(|t| types.contains(t))
            .collect::<Vec<_>>();

        if types.is_empty() {
            return Err(SignatureError::InvalidOptions(
                "at least one value type is required".to_string(),
            ));
        }

        Ok(Self { types })
    }

    pub fn types(&self) -> &[ValueType] {
        &self.types
    }

    /// Candidates in ascending offset order, first occurrence of each hex string only.
    pub fn extract(&self, aob: &AobPattern) -> Result<Vec<ValueCandidate>, SignatureError> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for segment in aob.segments() {
            for candidate in self.carve(&segment) {
                if !seen.insert(candidate.hex.clone()) {
                    log::debug!("Skipping duplicate value {} at offset {}", candidate.hex, candidate.offset);
                    continue;
                }
                Self::verify(aob, &candidate)?;
                candidates.push(candidate);
            }
        }

        log::info!("Extracted {} values from AOB", candidates.len());
        for candidate in &candidates {
            log::debug!("  {}", candidate);
        }
        Ok(candidates)
    }

    /// Greedily takes the widest allowed value from the front of the run until nothing
    /// allowed fits.
    fn carve(&self, segment: &Segment) -> Vec<ValueCandidate> {
        let mut candidates = Vec::new();
        let mut position = 0;

        for &value_type in &self.types {
            let width = value_type.width();
            while segment.bytes.len() - position >= width {
                let bytes = &segment.bytes[position..position + width];
                candidates.push(ValueCandidate::new(bytes, value_type, segment.start + position));
                position += width;
            }
        }

        candidates
    }

    fn verify(aob: &AobPattern, candidate: &ValueCandidate) -> Result<(), SignatureError> {
        match aob.concrete_bytes(candidate.offset, candidate.width()) {
            Some(bytes) if bytes == candidate.bytes => Ok(()),
            found => Err(SignatureError::OffsetBookkeeping {
                offset: candidate.offset,
                expected: candidate.hex.clone(),
                found: found
                    .map(|b| to_hex_string(&b))
                    .unwrap_or_else(|| "a wildcard or the pattern end".to_string()),
            }),
        }
    }
}

impl Default for ValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aob(text: &str) -> AobPattern {
        text.parse().unwrap()
    }

    #[test]
    fn test_value_type_parsing() {
        assert_eq!("dword".parse::<ValueType>(), Ok(ValueType::Dword));
        assert_eq!(" QWORD ".parse::<ValueType>(), Ok(ValueType::Qword));
        assert_eq!("b".parse::<ValueType>(), Ok(ValueType::Byte));
        assert!("nibble".parse::<ValueType>().is_err());
        assert_eq!(ValueType::Word.tag(), 'W');
    }

    #[test]
    fn test_candidate_value_is_little_endian() {
        let candidate = ValueCandidate::new(&[0x1F, 0x20, 0x03, 0xD5], ValueType::Dword, 4);
        assert_eq!(candidate.hex, "1F2003D5");
        assert_eq!(candidate.value, 0xD503201F);
        assert_eq!(candidate.token(), "3573751839D");
    }

    #[test]
    fn test_greedy_carving_widest_first() {
        // 15 concrete bytes split as 8 + 4 + 2 + 1
        let pattern = aob("00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E");
        let values = ValueExtractor::new().extract(&pattern).unwrap();
        let layout = values
            .iter()
            .map(|v| (v.value_type, v.offset))
            .collect::<Vec<_>>();
        assert_eq!(
            layout,
            vec![
                (ValueType::Qword, 0),
                (ValueType::Dword, 8),
                (ValueType::Word, 12),
                (ValueType::Byte, 14),
            ]
        );
    }

    #[test]
    fn test_offsets_are_relative_to_pattern_start() {
        let pattern = aob("?? ?? 11 22 ?? 33 44 55 66 ??");
        let values = ValueExtractor::new().extract(&pattern).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!((values[0].value_type, values[0].offset), (ValueType::Word, 2));
        assert_eq!((values[1].value_type, values[1].offset), (ValueType::Dword, 5));
        assert_eq!(values[1].hex, "33445566");
    }

    #[test]
    fn test_segment_ending_at_pattern_end() {
        let pattern = aob("?? AA BB CC");
        let values = ValueExtractor::new().extract(&pattern).unwrap();
        assert_eq!(values[0].offset, 1);
        assert_eq!(values[1].offset, 3);
        for value in &values {
            assert_eq!(pattern.concrete_bytes(value.offset, value.width()), Some(value.bytes.clone()));
        }
    }

    #[test]
    fn test_every_candidate_matches_its_slice() {
        let pattern = aob("01 02 03 ?? 04 05 06 07 08 09 0A 0B 0C ?? ?? 0D 0E 0F 10 11 12 13 ??");
        let values = ValueExtractor::new().extract(&pattern).unwrap();
        assert!(!values.is_empty());
        for value in &values {
            assert_eq!(
                pattern.concrete_bytes(value.offset, value.width()),
                Some(value.bytes.clone()),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let pattern = aob("AA BB ?? CC ?? AA BB");
        let values = ValueExtractor::new().extract(&pattern).unwrap();
        let hexes = values.iter().map(|v| (v.hex.as_str(), v.offset)).collect::<Vec<_>>();
        assert_eq!(hexes, vec![("AABB", 0), ("CC", 3)]);
    }

    #[test]
    fn test_type_filter() {
        let pattern = aob("00 01 02 03 04 05 06");
        let extractor = ValueExtractor::with_types(&[ValueType::Byte, ValueType::Dword]).unwrap();
        assert_eq!(extractor.types(), &[ValueType::Dword, ValueType::Byte]);

        let values = extractor.extract(&pattern).unwrap();
        let layout = values.iter().map(|v| v.value_type).collect::<Vec<_>>();
        assert_eq!(
            layout,
            vec![ValueType::Dword, ValueType::Byte, ValueType::Byte, ValueType::Byte]
        );

        let qwords_only = ValueExtractor::with_types(&[ValueType::Qword]).unwrap();
        assert!(qwords_only.extract(&pattern).unwrap().is_empty());

        assert!(matches!(
            ValueExtractor::with_types(&[]),
            Err(SignatureError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_all_wildcards_yield_nothing() {
        let values = ValueExtractor::new().extract(&aob("?? ?? ?? ??")).unwrap();
        assert!(values.is_empty());
    }
}
