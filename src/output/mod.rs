// Fri Oct 16 2026 - Alex

pub mod formatter;
pub mod json;

pub use formatter::OutputFormatter;
pub use json::JsonSerializer;

use crate::codec::Architecture;
use crate::engine::Analysis;
use crate::signature::{RankedCandidate, SearchResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub label: String,
    pub aob: Option<String>,
    pub aob_matches: Option<usize>,
    pub values: Vec<RankedCandidate>,
    pub result: Option<SearchResult>,
    pub error: Option<String>,
}

impl AnalysisReport {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            label: analysis.label.clone(),
            aob: Some(analysis.aob.to_string()),
            aob_matches: Some(analysis.aob_matches),
            values: analysis.candidates.clone(),
            result: Some(analysis.result.clone()),
            error: None,
        }
    }

    pub fn from_error(label: &str, error: &dyn std::error::Error) -> Self {
        Self {
            label: label.to_string(),
            aob: None,
            aob_matches: None,
            values: Vec::new(),
            result: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub version: String,
    pub library: String,
    pub architecture: Architecture,
    pub analyses: Vec<AnalysisReport>,
}

impl RunReport {
    pub fn new(library: &str, architecture: Architecture, analyses: Vec<AnalysisReport>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            library: library.to_string(),
            architecture,
            analyses,
        }
    }
}
