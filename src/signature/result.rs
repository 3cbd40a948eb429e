// Fri Oct 16 2026 - Alex

use crate::signature::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multi-value query in the scanner's `v1T1;v2T2;...::RANGE` grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSearch {
    pub query: String,
    pub values: Vec<String>,
    pub range: usize,
    pub offset: usize,
}

impl GroupSearch {
    pub fn new(values: Vec<String>, range: usize, offset: usize) -> Self {
        Self {
            query: format!("{}::{}", values.join(";"), range),
            values,
            range,
            offset,
        }
    }
}

impl fmt::Display for GroupSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (offset from start = {})", self.query, self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleValue {
    pub value: u64,
    pub value_type: ValueType,
    pub occurrences: usize,
    pub offset: usize,
}

impl fmt::Display for SingleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (offset from start = {}) - {} occurrences",
            self.value, self.value_type, self.offset, self.occurrences
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    Group(GroupSearch),
    Single(SingleValue),
}

impl SearchResult {
    /// Offset of the first searched value from the start of the function.
    pub fn offset(&self) -> usize {
        match self {
            SearchResult::Group(group) => group.offset,
            SearchResult::Single(single) => single.offset,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchResult::Group(_) => "group search",
            SearchResult::Single(_) => "single value",
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchResult::Group(group) => group.fmt(f),
            SearchResult::Single(single) => single.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_search_display() {
        let group = GroupSearch::new(vec!["1Q".to_string(), "2D".to_string()], 10, 0);
        assert_eq!(group.query, "1Q;2D::10");
        assert_eq!(
            SearchResult::Group(group).to_string(),
            "1Q;2D::10 (offset from start = 0)"
        );
    }

    #[test]
    fn test_single_value_display() {
        let single = SingleValue {
            value: 3573751839,
            value_type: ValueType::Dword,
            occurrences: 12,
            offset: 4,
        };
        assert_eq!(
            single.to_string(),
            "3573751839 Dword (offset from start = 4) - 12 occurrences"
        );
    }

    #[test]
    fn test_serialization_is_tagged() {
        let result = SearchResult::Single(SingleValue {
            value: 7,
            value_type: ValueType::Byte,
            occurrences: 1,
            offset: 0,
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["value_type"], "Byte");

        let back: SearchResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
