// Fri Oct 16 2026 - Alex

use crate::codec::Architecture;
use crate::signature::{SearchOptions, ValueType, MAX_GROUP_VALUES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub library: Option<PathBuf>,
    pub offsets: Vec<u64>,
    pub hex: Option<String>,
    pub architecture: Option<Architecture>,
    pub number_of_bytes: usize,
    pub max_values: usize,
    pub prefer_no_offset: bool,
    pub single_value_max_occurrences: usize,
    pub value_types: Vec<ValueType>,
    pub max_threads: usize,
    pub verbose: bool,
    pub json_output: bool,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        let search = SearchOptions::default();
        Self {
            library: None,
            offsets: Vec::new(),
            hex: None,
            architecture: None,
            number_of_bytes: 600,
            max_values: search.max_values,
            prefer_no_offset: search.prefer_no_offset,
            single_value_max_occurrences: search.single_value_max_occurrences,
            value_types: ValueType::ALL.to_vec(),
            max_threads: num_cpus::get(),
            verbose: false,
            json_output: false,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(mut self, library: PathBuf) -> Self {
        self.library = Some(library);
        self
    }

    pub fn with_offsets(mut self, offsets: Vec<u64>) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn with_hex(mut self, hex: String) -> Self {
        self.hex = Some(hex);
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    pub fn with_number_of_bytes(mut self, count: usize) -> Self {
        self.number_of_bytes = count;
        self
    }

    pub fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    pub fn with_prefer_no_offset(mut self, prefer: bool) -> Self {
        self.prefer_no_offset = prefer;
        self
    }

    pub fn with_single_value_max_occurrences(mut self, occurrences: usize) -> Self {
        self.single_value_max_occurrences = occurrences;
        self
    }

    pub fn with_value_types(mut self, types: Vec<ValueType>) -> Self {
        self.value_types = types;
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    pub fn with_show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_values: self.max_values,
            prefer_no_offset: self.prefer_no_offset,
            single_value_max_occurrences: self.single_value_max_occurrences,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.library.is_none() {
            return Err("A lib file must be given".to_string());
        }
        match (self.offsets.is_empty(), self.hex.is_some()) {
            (true, false) => return Err("Either an offset or a hex string must be given".to_string()),
            (false, true) => return Err("Offsets and a hex string cannot be used together".to_string()),
            _ => {}
        }
        if self.number_of_bytes == 0 {
            return Err("number_of_bytes must be greater than 0".to_string());
        }
        if self.max_values < 1 {
            return Err("max_values cannot be less than 1".to_string());
        }
        if self.max_values > MAX_GROUP_VALUES {
            return Err(format!("max_values cannot be greater than {}", MAX_GROUP_VALUES));
        }
        if self.value_types.is_empty() {
            return Err("At least one value type must be enabled".to_string());
        }
        if self.max_threads == 0 {
            return Err("max_threads must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config::new()
            .with_library(PathBuf::from("libil2cpp.so"))
            .with_offsets(vec![0x1000])
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.number_of_bytes, 600);
        assert_eq!(config.max_values, 8);
        assert_eq!(config.single_value_max_occurrences, 40);
        assert!(!config.prefer_no_offset);
        assert_eq!(config.value_types.len(), 4);
        assert!(config.show_progress);
        assert!(config.max_threads > 0);
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());
        assert!(Config::new().validate().is_err());
        assert!(Config::new()
            .with_library(PathBuf::from("lib.so"))
            .validate()
            .is_err());
        assert!(valid().with_hex("00 00".to_string()).validate().is_err());
        assert!(valid().with_max_values(0).validate().is_err());
        assert!(valid().with_max_values(65).validate().is_err());
        assert!(valid().with_max_values(64).validate().is_ok());
        assert!(valid().with_number_of_bytes(0).validate().is_err());
        assert!(valid().with_value_types(Vec::new()).validate().is_err());
        assert!(valid().with_max_threads(0).validate().is_err());
    }

    #[test]
    fn test_hex_only_is_valid() {
        let config = Config::new()
            .with_library(PathBuf::from("lib.so"))
            .with_hex("1F 20 03 D5".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_search_options() {
        let options = valid()
            .with_max_values(3)
            .with_prefer_no_offset(true)
            .with_single_value_max_occurrences(5)
            .search_options();
        assert_eq!(
            options,
            SearchOptions {
                max_values: 3,
                prefer_no_offset: true,
                single_value_max_occurrences: 5,
            }
        );
    }
}
