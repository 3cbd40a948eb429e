// Fri Oct 16 2026 - Alex

use crate::codec::Architecture;
use crate::pattern::AobPattern;
use crate::signature::{RankedCandidate, SearchResult};
use std::fmt;

/// Where the function bytes for one analysis come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteSource {
    Offset(u64),
    Hex(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub label: String,
    pub source: ByteSource,
}

impl AnalysisRequest {
    pub fn at_offset(offset: u64) -> Self {
        Self {
            label: format!("{:X}", offset),
            source: ByteSource::Offset(offset),
        }
    }

    pub fn from_hex(bytes: Vec<u8>) -> Self {
        Self {
            label: "hex".to_string(),
            source: ByteSource::Hex(bytes),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

impl fmt::Display for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ByteSource::Offset(offset) => write!(f, "offset {:X}", offset),
            ByteSource::Hex(bytes) => write!(f, "{} hex bytes", bytes.len()),
        }
    }
}

/// Everything produced for one request.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub label: String,
    pub architecture: Architecture,
    pub library: String,
    pub aob: AobPattern,
    pub aob_matches: usize,
    pub candidates: Vec<RankedCandidate>,
    pub result: SearchResult,
}
