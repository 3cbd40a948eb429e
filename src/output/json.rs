// Fri Oct 16 2026 - Alex

use serde::Serialize;
use std::io::Write;

pub struct JsonSerializer {
    pretty_print: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn serialize<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty_print {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    pub fn write<T: Serialize, W: Write>(&self, value: &T, mut writer: W) -> std::io::Result<()> {
        let text = self.serialize(value)?;
        writeln!(writer, "{}", text)
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Architecture;
    use crate::output::{AnalysisReport, RunReport};
    use crate::signature::{GroupSearch, SearchResult, SignatureError};

    fn report() -> RunReport {
        let ok = AnalysisReport {
            label: "1A2B".to_string(),
            aob: Some("01 ?? 02".to_string()),
            aob_matches: Some(1),
            values: Vec::new(),
            result: Some(SearchResult::Group(GroupSearch::new(vec!["1B".to_string()], 1, 0))),
            error: None,
        };
        let failed = AnalysisReport::from_error("FFFF", &SignatureError::InsufficientStaticBytes);
        RunReport::new("libgame.so", Architecture::Arm64, vec![ok, failed])
    }

    #[test]
    fn test_serialize_run_report() {
        let text = JsonSerializer::new().with_pretty_print(false).serialize(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["library"], "libgame.so");
        assert_eq!(value["architecture"], "Arm64");
        assert_eq!(value["analyses"][0]["result"]["kind"], "group");
        assert_eq!(value["analyses"][0]["result"]["query"], "1B::1");
        assert!(value["analyses"][1]["error"].as_str().unwrap().contains("static bytes"));
    }

    #[test]
    fn test_write_appends_newline() {
        let mut buffer = Vec::new();
        JsonSerializer::new().write(&report(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(report().analyses[1].error.is_some());
    }
}
