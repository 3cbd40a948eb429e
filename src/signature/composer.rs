// Fri Oct 16 2026 - Alex

use crate::signature::{GroupSearch, RankedCandidate, SearchResult, SignatureError, SingleValue};
use serde::{Deserialize, Serialize};

/// Upper bound on values in one group search; the scanner rejects longer queries.
pub const MAX_GROUP_VALUES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub max_values: usize,
    pub prefer_no_offset: bool,
    pub single_value_max_occurrences: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_values: 8,
            prefer_no_offset: false,
            single_value_max_occurrences: 40,
        }
    }
}

pub struct SearchComposer {
    options: SearchOptions,
}

impl SearchComposer {
    pub fn new(options: SearchOptions) -> Result<Self, SignatureError> {
        if options.max_values < 1 {
            return Err(SignatureError::InvalidOptions(
                "max values cannot be less than 1".to_string(),
            ));
        }
        if options.max_values > MAX_GROUP_VALUES {
            return Err(SignatureError::InvalidOptions(format!(
                "max values cannot be greater than {}",
                MAX_GROUP_VALUES
            )));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn compose(&self, ranked: &[RankedCandidate]) -> Result<SearchResult, SignatureError> {
        if ranked.is_empty() {
            return Err(SignatureError::InsufficientStaticBytes);
        }

        let lone_rare_value = ranked.len() == 1
            && ranked[0].occurrences <= self.options.single_value_max_occurrences;

        if self.options.max_values == 1 || lone_rare_value {
            return Ok(SearchResult::Single(self.single_value(ranked)));
        }

        let mut by_rarity = ranked.iter().collect::<Vec<_>>();
        by_rarity.sort_by_key(|r| (r.occurrences, r.candidate.offset));
        let mut selected = by_rarity
            .into_iter()
            .take(self.options.max_values)
            .collect::<Vec<_>>();

        if self.options.prefer_no_offset {
            Self::prefer_zero_offset(ranked, &mut selected);
        }

        selected.sort_by_key(|r| r.candidate.offset);
        Ok(SearchResult::Group(Self::group_search(&selected)))
    }

    fn single_value(&self, ranked: &[RankedCandidate]) -> SingleValue {
        let rarest = ranked
            .iter()
            .min_by_key(|r| (r.occurrences, r.candidate.offset))
            .unwrap_or(&ranked[0]);

        if self.options.max_values == 1 {
            log::warn!("Using a single value because max values is 1. Increase it for a more precise group search");
        } else {
            log::warn!(
                "Failed to generate group search, but found a single value with only {} occurrences",
                rarest.occurrences
            );
        }

        SingleValue {
            value: rarest.candidate.value,
            value_type: rarest.candidate.value_type,
            occurrences: rarest.occurrences,
            offset: rarest.candidate.offset,
        }
    }

    /// Swaps the value at offset 0 in for the most common selected value, if such a value exists.
    fn prefer_zero_offset<'a>(ranked: &'a [RankedCandidate], selected: &mut Vec<&'a RankedCandidate>) {
        let first = ranked.iter().min_by_key(|r| r.candidate.offset);

        match first {
            Some(first) if first.candidate.offset == 0 => {
                if selected.iter().any(|s| s.candidate.offset == 0) {
                    log::debug!("Value at offset 0 is already part of the group search");
                } else {
                    selected.pop();
                    selected.insert(0, first);
                }
            }
            _ => log::warn!("Could not generate a group search with an offset of 0"),
        }
    }

    fn group_search(selected: &[&RankedCandidate]) -> GroupSearch {
        let values = selected
            .iter()
            .map(|r| r.candidate.token())
            .collect::<Vec<_>>();
        let min_offset = selected.iter().map(|r| r.candidate.offset).min().unwrap_or(0);
        let max_offset = selected.iter().map(|r| r.candidate.offset).max().unwrap_or(0);
        let range = min_offset + max_offset + 1;

        log::info!("Found values for group search: {}", values.join(", "));
        log::info!("Calculated group search range {} and offset {}", range, min_offset);
        GroupSearch::new(values, range, min_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{ValueCandidate, ValueType};

    fn ranked(bytes: &[u8], value_type: ValueType, offset: usize, occurrences: usize) -> RankedCandidate {
        RankedCandidate {
            candidate: ValueCandidate::new(bytes, value_type, offset),
            occurrences,
        }
    }

    fn composer(max_values: usize, prefer_no_offset: bool, threshold: usize) -> SearchComposer {
        SearchComposer::new(SearchOptions {
            max_values,
            prefer_no_offset,
            single_value_max_occurrences: threshold,
        })
        .unwrap()
    }

    fn pool() -> Vec<RankedCandidate> {
        vec![
            ranked(&[1; 8], ValueType::Qword, 0, 50),
            ranked(&[2; 4], ValueType::Dword, 8, 3),
            ranked(&[3; 2], ValueType::Word, 16, 9),
            ranked(&[4], ValueType::Byte, 20, 1),
            ranked(&[5; 4], ValueType::Dword, 24, 3),
        ]
    }

    fn offsets(result: &SearchResult, pool: &[RankedCandidate]) -> Vec<usize> {
        match result {
            SearchResult::Group(group) => group
                .values
                .iter()
                .map(|token| {
                    pool.iter()
                        .find(|r| &r.candidate.token() == token)
                        .map(|r| r.candidate.offset)
                        .unwrap()
                })
                .collect(),
            SearchResult::Single(_) => panic!("expected group search"),
        }
    }

    #[test]
    fn test_rejects_invalid_max_values() {
        let options = |max_values| SearchOptions {
            max_values,
            ..SearchOptions::default()
        };
        assert!(matches!(SearchComposer::new(options(0)), Err(SignatureError::InvalidOptions(_))));
        assert!(matches!(SearchComposer::new(options(65)), Err(SignatureError::InvalidOptions(_))));
        assert!(SearchComposer::new(options(64)).is_ok());
    }

    #[test]
    fn test_no_candidates() {
        assert!(matches!(
            composer(8, false, 40).compose(&[]),
            Err(SignatureError::InsufficientStaticBytes)
        ));
        assert!(matches!(
            composer(1, false, 40).compose(&[]),
            Err(SignatureError::InsufficientStaticBytes)
        ));
    }

    #[test]
    fn test_max_values_one_picks_rarest() {
        let result = composer(1, false, 40).compose(&pool()).unwrap();
        match result {
            SearchResult::Single(single) => {
                assert_eq!(single.offset, 20);
                assert_eq!(single.value, 4);
                assert_eq!(single.value_type, ValueType::Byte);
                assert_eq!(single.occurrences, 1);
            }
            other => panic!("expected single value, got {}", other),
        }
    }

    #[test]
    fn test_rarest_ties_break_by_offset() {
        let pool = vec![
            ranked(&[9; 4], ValueType::Dword, 4, 2),
            ranked(&[8; 4], ValueType::Dword, 12, 2),
        ];
        let result = composer(1, false, 40).compose(&pool).unwrap();
        assert_eq!(result.offset(), 4);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let lone = vec![ranked(&[7; 4], ValueType::Dword, 4, 40)];
        assert!(matches!(
            composer(8, false, 40).compose(&lone).unwrap(),
            SearchResult::Single(_)
        ));

        let common = vec![ranked(&[7; 4], ValueType::Dword, 4, 41)];
        match composer(8, false, 40).compose(&common).unwrap() {
            SearchResult::Group(group) => {
                assert_eq!(group.values.len(), 1);
                assert_eq!(group.range, 9);
                assert_eq!(group.offset, 4);
            }
            other => panic!("expected group search, got {}", other),
        }
    }

    #[test]
    fn test_selects_rarest_k_values() {
        let pool = pool();
        for k in 1..=pool.len() {
            if k == 1 {
                continue;
            }
            let result = composer(k, false, 40).compose(&pool).unwrap();
            let mut chosen = offsets(&result, &pool);
            chosen.sort_unstable();

            let mut expected = pool.clone();
            expected.sort_by_key(|r| (r.occurrences, r.candidate.offset));
            let mut expected = expected
                .iter()
                .take(k)
                .map(|r| r.candidate.offset)
                .collect::<Vec<_>>();
            expected.sort_unstable();
            assert_eq!(chosen, expected, "k = {}", k);
        }
    }

    #[test]
    fn test_group_search_orders_by_offset() {
        let pool = pool();
        let result = composer(3, false, 40).compose(&pool).unwrap();
        assert_eq!(offsets(&result, &pool), vec![8, 20, 24]);
        match result {
            SearchResult::Group(group) => {
                assert_eq!(group.query, format!("{};4B;{}::33", pool[1].candidate.token(), pool[4].candidate.token()));
                assert_eq!(group.offset, 8);
                assert_eq!(group.range, 8 + 24 + 1);
            }
            other => panic!("expected group search, got {}", other),
        }
    }

    #[test]
    fn test_range_arithmetic() {
        let pool = vec![
            ranked(&[1; 2], ValueType::Word, 0, 5),
            ranked(&[2; 4], ValueType::Dword, 3, 5),
            ranked(&[3; 2], ValueType::Word, 9, 5),
        ];
        match composer(8, false, 40).compose(&pool).unwrap() {
            SearchResult::Group(group) => {
                assert_eq!(group.range, 10);
                assert_eq!(group.offset, 0);
                assert_eq!(group.values, vec!["257W", "33686018D", "771W"]);
                assert_eq!(group.query, "257W;33686018D;771W::10");
            }
            other => panic!("expected group search, got {}", other),
        }
    }

    #[test]
    fn test_prefer_no_offset_swaps_in_first_value() {
        let pool = pool();
        let result = composer(3, true, 40).compose(&pool).unwrap();
        // rarest three are offsets 20, 8 and 24; the most common of those is evicted
        assert_eq!(offsets(&result, &pool), vec![0, 8, 20]);
        assert_eq!(result.offset(), 0);
    }

    #[test]
    fn test_prefer_no_offset_without_zero_offset_value() {
        let pool = pool().into_iter().skip(1).collect::<Vec<_>>();
        let plain = composer(2, false, 40).compose(&pool).unwrap();
        let preferred = composer(2, true, 40).compose(&pool).unwrap();
        assert_eq!(plain, preferred);
    }

    #[test]
    fn test_prefer_no_offset_already_selected() {
        let mut pool = pool();
        pool[0].occurrences = 1;
        let result = composer(2, true, 40).compose(&pool).unwrap();
        assert_eq!(offsets(&result, &pool), vec![0, 20]);
    }
}
