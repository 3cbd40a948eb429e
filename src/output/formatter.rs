// Fri Oct 16 2026 - Alex

use crate::engine::Analysis;
use crate::signature::{RankedCandidate, SearchResult};
use colored::*;
use std::fmt::Write;

/// Renders analyses as the human-readable console report.
pub struct OutputFormatter {
    show_values: bool,
    show_aob: bool,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            show_values: true,
            show_aob: true,
        }
    }

    pub fn with_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    pub fn with_aob(mut self, show: bool) -> Self {
        self.show_aob = show;
        self
    }

    pub fn format_analysis(&self, analysis: &Analysis) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} {} ({}, {})",
            "[*]".blue(),
            analysis.label.bold(),
            analysis.library,
            analysis.architecture
        );

        if self.show_aob {
            let _ = writeln!(out, "    AOB: {}", analysis.aob.to_string().cyan());
            let _ = writeln!(
                out,
                "    AOB matches in library: {}",
                analysis.aob_matches
            );
        }

        if self.show_values && !analysis.candidates.is_empty() {
            let _ = writeln!(out, "    Values (rarest first):");
            for candidate in &analysis.candidates {
                let _ = writeln!(out, "      {}", Self::format_candidate(candidate));
            }
        }

        let _ = writeln!(out, "{} {}", "[+]".green(), Self::format_result(&analysis.result));
        out
    }

    pub fn format_failure(&self, label: &str, error: &dyn std::error::Error) -> String {
        format!("{} {}: {}\n", "[!]".red(), label.bold(), error)
    }

    pub fn format_candidate(candidate: &RankedCandidate) -> String {
        let value = &candidate.candidate;
        format!(
            "{:<24} {:<6} +{:<4} {:>6}x  {}",
            value.token(),
            value.value_type.name(),
            value.offset,
            candidate.occurrences,
            value.hex.dimmed()
        )
    }

    pub fn format_result(result: &SearchResult) -> String {
        format!("{}: {}", result.kind(), result.to_string().yellow())
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Architecture;
    use crate::pattern::AobPattern;
    use crate::signature::{GroupSearch, SignatureError, ValueCandidate, ValueType};

    fn analysis() -> Analysis {
        let candidate = ValueCandidate::new(&[0x01, 0x01], ValueType::Word, 0);
        Analysis {
            label: "1A2B".to_string(),
            architecture: Architecture::Arm64,
            library: "libgame.so".to_string(),
            aob: "01 01 ?? ??".parse::<AobPattern>().unwrap(),
            aob_matches: 3,
            candidates: vec![RankedCandidate {
                candidate,
                occurrences: 7,
            }],
            result: SearchResult::Group(GroupSearch::new(vec!["257W".to_string()], 2, 0)),
        }
    }

    #[test]
    fn test_format_analysis_sections() {
        let text = OutputFormatter::new().format_analysis(&analysis());

        assert!(text.contains("01 01 ?? ??"));
        assert!(text.contains("AOB matches in library: 3"));
        assert!(text.contains("257W"));
        assert!(text.contains("257W::2 (offset from start = 0)"));
        assert!(text.contains("group search"));
    }

    #[test]
    fn test_format_analysis_hides_sections() {
        let text = OutputFormatter::new()
            .with_aob(false)
            .with_values(false)
            .format_analysis(&analysis());

        assert!(!text.contains("01 01 ?? ??"));
        assert!(!text.contains("rarest"));
        assert!(text.contains("257W::2"));
    }

    #[test]
    fn test_format_failure() {
        let text = OutputFormatter::new().format_failure("FFFF", &SignatureError::InsufficientStaticBytes);
        assert!(text.contains("enough static bytes"));
        assert!(text.ends_with('\n'));
    }
}
