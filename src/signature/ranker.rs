// Fri Oct 16 2026 - Alex

use crate::signature::{SignatureError, ValueCandidate};
use memchr::memmem::Finder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: ValueCandidate,
    pub occurrences: usize,
}

/// Counts every starting position of `needle` in `haystack`, overlapping matches included.
pub fn count_occurrences(needle: &[u8], haystack: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let finder = Finder::new(needle);
    let mut count = 0;
    let mut position = 0;

    while let Some(found) = finder.find(&haystack[position..]) {
        count += 1;
        position += found + 1;
        if position >= haystack.len() {
            break;
        }
    }

    count
}

/// Ranks candidates by how often their raw bytes appear in the whole library.
pub struct OccurrenceRanker<'a> {
    library: &'a [u8],
    parallel: bool,
}

impl<'a> OccurrenceRanker<'a> {
    pub fn new(library: &'a [u8]) -> Self {
        Self {
            library,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn rank(&self, candidates: Vec<ValueCandidate>) -> Result<Vec<RankedCandidate>, SignatureError> {
        let count = |candidate: ValueCandidate| {
            let occurrences = count_occurrences(&candidate.bytes, self.library);
            RankedCandidate {
                candidate,
                occurrences,
            }
        };

        let ranked: Vec<RankedCandidate> = if self.parallel {
            candidates.into_par_iter().map(count).collect()
        } else {
            candidates.into_iter().map(count).collect()
        };

        for entry in &ranked {
            log::debug!(
                "{} {} at offset {}: {} occurrences",
                entry.candidate.value_type,
                entry.candidate.hex,
                entry.candidate.offset,
                entry.occurrences
            );
            if entry.occurrences == 0 {
                return Err(SignatureError::ZeroOccurrence {
                    hex: entry.candidate.hex.clone(),
                    offset: entry.candidate.offset,
                });
            }
        }

        Ok(ranked)
    }
}
