// Fri Oct 16 2026 - Alex

use crate::pattern::PatternError;
use std::fmt;
use std::str::FromStr;

pub const WILDCARD: &str = "??";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AobToken {
    Byte(u8),
    Wildcard,
}

impl AobToken {
    pub fn byte(&self) -> Option<u8> {
        match *self {
            AobToken::Byte(b) => Some(b),
            AobToken::Wildcard => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, AobToken::Wildcard)
    }
}

impl fmt::Display for AobToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AobToken::Byte(b) => write!(f, "{:02X}", b),
            AobToken::Wildcard => f.write_str(WILDCARD),
        }
    }
}

/// A maximal run of concrete bytes inside a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub bytes: Vec<u8>,
}

impl Segment {
    pub fn end(&self) -> usize {
        self.start + self.bytes.len()
    }
}

/// Wildcard-tolerant array-of-bytes pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AobPattern {
    tokens: Vec<AobToken>,
}

impl AobPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.tokens.extend(bytes.iter().map(|&b| AobToken::Byte(b)));
    }

    pub fn push_wildcards(&mut self, count: usize) {
        self.tokens
            .extend(std::iter::repeat(AobToken::Wildcard).take(count));
    }

    pub fn tokens(&self) -> &[AobToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn significant_byte_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_wildcard()).count()
    }

    pub fn wildcard_byte_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_wildcard()).count()
    }

    /// Splits the pattern into maximal concrete runs, left to right.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current: Option<Segment> = None;

        for (position, token) in self.tokens.iter().enumerate() {
            match (token.byte(), current.as_mut()) {
                (Some(b), Some(segment)) => segment.bytes.push(b),
                (Some(b), None) => {
                    current = Some(Segment {
                        start: position,
                        bytes: vec![b],
                    })
                }
                (None, _) => segments.extend(current.take()),
            }
        }

        segments.extend(current);
        segments
    }

    /// The concrete bytes at `[offset, offset + width)`, or `None` if the span leaves the
    /// pattern or touches a wildcard.
    pub fn concrete_bytes(&self, offset: usize, width: usize) -> Option<Vec<u8>> {
        self.tokens
            .get(offset..offset.checked_add(width)?)?
            .iter()
            .map(AobToken::byte)
            .collect()
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() >= self.tokens.len()
            && self
                .tokens
                .iter()
                .zip(data)
                .all(|(token, &b)| token.byte().map_or(true, |expected| expected == b))
    }

    /// Number of offsets in `data` where the whole pattern matches. A pattern without concrete
    /// bytes matches nowhere.
    pub fn count_matches(&self, data: &[u8]) -> usize {
        let anchor = self
            .tokens
            .iter()
            .enumerate()
            .find_map(|(position, token)| token.byte().map(|b| (position, b)));
        let (anchor, byte) = match anchor {
            Some(anchor) => anchor,
            None => return 0,
        };
        if data.len() < self.tokens.len() {
            return 0;
        }

        let last_start = data.len() - self.tokens.len();

        memchr::memchr_iter(byte, &data[anchor..=last_start + anchor])
            .filter(|&start| self.matches(&data[start..]))
            .count()
    }
}

impl fmt::Display for AobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for AobPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split_whitespace()
            .enumerate()
            .map(|(position, part)| match part {
                "??" | "?" => Ok(AobToken::Wildcard),
                hex if hex.len() == 2 && hex.chars().all(|c| c.is_ascii_hexdigit()) => u8::from_str_radix(hex, 16)
                    .map(AobToken::Byte)
                    .map_err(|_| PatternError::InvalidToken {
                        token: part.to_string(),
                        position,
                    }),
                _ => Err(PatternError::InvalidToken {
                    token: part.to_string(),
                    position,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if tokens.is_empty() {
            return Err(PatternError::Empty);
        }

        Ok(Self { tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let aob: AobPattern = "1F 20 ?? ?? d5 ?".parse().unwrap();
        assert_eq!(aob.len(), 6);
        assert_eq!(aob.to_string(), "1F 20 ?? ?? D5 ??");
        assert_eq!(aob.significant_byte_count(), 3);
        assert_eq!(aob.wildcard_byte_count(), 3);
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert_eq!("".parse::<AobPattern>(), Err(PatternError::Empty));
        assert!(matches!(
            "1F GG".parse::<AobPattern>(),
            Err(PatternError::InvalidToken { position: 1, .. })
        ));
        assert!("1F2".parse::<AobPattern>().is_err());
    }

    #[test]
    fn test_segments() {
        let aob: AobPattern = "?? 01 02 ?? ?? 03 04 05".parse().unwrap();
        let segments = aob.segments();
        assert_eq!(
            segments,
            vec![
                Segment { start: 1, bytes: vec![1, 2] },
                Segment { start: 5, bytes: vec![3, 4, 5] },
            ]
        );
        assert_eq!(segments[1].end(), aob.len());
    }

    #[test]
    fn test_segments_with_trailing_wildcard() {
        let aob: AobPattern = "01 02 03 ??".parse().unwrap();
        assert_eq!(aob.segments(), vec![Segment { start: 0, bytes: vec![1, 2, 3] }]);

        let all_wild: AobPattern = "?? ??".parse().unwrap();
        assert!(all_wild.segments().is_empty());
    }

    #[test]
    fn test_concrete_bytes() {
        let aob: AobPattern = "01 02 ?? 03".parse().unwrap();
        assert_eq!(aob.concrete_bytes(0, 2), Some(vec![1, 2]));
        assert_eq!(aob.concrete_bytes(1, 2), None);
        assert_eq!(aob.concrete_bytes(3, 1), Some(vec![3]));
        assert_eq!(aob.concrete_bytes(3, 2), None);
    }

    #[test]
    fn test_count_matches() {
        let aob: AobPattern = "AA ?? CC".parse().unwrap();
        let data = [0xAA, 0x00, 0xCC, 0xAA, 0xFF, 0xCC, 0xAA, 0xBB];
        assert_eq!(aob.count_matches(&data), 2);
        assert_eq!(aob.count_matches(&[0xAA]), 0);

        // anchor after a leading wildcard, match flush with the end of the data
        let shifted: AobPattern = "?? 02 03".parse().unwrap();
        assert_eq!(shifted.count_matches(&[9, 2, 3, 7, 2, 3]), 2);
    }

    #[test]
    fn test_count_matches_without_concrete_bytes() {
        let wild: AobPattern = "?? ??".parse().unwrap();
        assert_eq!(wild.count_matches(&vec![0u8; 1 << 20]), 0);
        assert_eq!(AobPattern::new().count_matches(&[1, 2, 3]), 0);
    }
}
