// Fri Oct 16 2026 - Alex

use crate::binary::{parse_hex, parse_offset, BinaryError};
use crate::codec::Architecture;
use crate::config::Config;
use crate::signature::ValueType;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aob-siggen")]
#[command(author = "Alex")]
#[command(version)]
#[command(about = "Generates update-resistant group-search signatures for functions in ARM lib files")]
#[command(long_about = None)]
pub struct CliInterface {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the function bytes come from, shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(help = "Path to the lib file (libil2cpp.so, libUE4.so, ...)")]
    pub library: PathBuf,

    #[arg(long, help = "Function bytes as hex instead of an offset, e.g. \"FF 43 01 D1\"")]
    pub hex: Option<String>,

    #[arg(short, long, help = "Force the architecture (32bit or 64bit) instead of reading the ELF header")]
    pub architecture: Option<Architecture>,

    #[arg(short, long, default_value_t = 600, help = "Number of bytes to read from each offset")]
    pub number_of_bytes: usize,

    #[arg(short, long, action = ArgAction::Count, help = "Enable verbose logging (repeat for trace)")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Generate a group search (or single value) for one or more functions")]
    GroupSearch {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(
            help = "Hex file offsets of the functions",
            conflicts_with = "hex",
            required_unless_present = "hex"
        )]
        offsets: Vec<String>,

        #[arg(short, long, default_value_t = 8, help = "Maximum number of values in the group search (1-64)")]
        max_values: usize,

        #[arg(long, help = "Try to start the group search at the first byte of the function")]
        prefer_no_offset: bool,

        #[arg(
            long,
            default_value_t = 40,
            help = "Use a single value when its occurrence count is at most this"
        )]
        single_value_max_occurrences: usize,

        #[arg(long, value_delimiter = ',', help = "Value types to use, e.g. qword,dword")]
        value_types: Vec<ValueType>,

        #[arg(long, help = "Number of threads for batch analysis")]
        threads: Option<usize>,

        #[arg(long, help = "Print results as JSON")]
        json: bool,

        #[arg(long, help = "Hide the progress bar")]
        no_progress: bool,
    },

    #[command(about = "Print only the wildcarded AOB of a function")]
    Aob {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(help = "Hex file offset of the function", conflicts_with = "hex", required_unless_present = "hex")]
        offset: Option<String>,
    },
}

impl CliInterface {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn source(&self) -> &SourceArgs {
        match &self.command {
            Commands::GroupSearch { source, .. } | Commands::Aob { source, .. } => source,
        }
    }

    pub fn is_aob_only(&self) -> bool {
        matches!(self.command, Commands::Aob { .. })
    }

    /// Builds the run configuration, parsing offsets and hex input on the way.
    pub fn to_config(&self) -> Result<Config, BinaryError> {
        let source = self.source();
        let mut config = Config::default()
            .with_library(source.library.clone())
            .with_number_of_bytes(source.number_of_bytes)
            .with_verbose(source.verbose > 0);

        if let Some(architecture) = source.architecture {
            config = config.with_architecture(architecture);
        }

        if let Some(hex) = &source.hex {
            parse_hex(hex)?;
            config = config.with_hex(hex.clone());
        }

        match &self.command {
            Commands::GroupSearch {
                offsets,
                max_values,
                prefer_no_offset,
                single_value_max_occurrences,
                value_types,
                threads,
                json,
                no_progress,
                ..
            } => {
                let offsets = offsets
                    .iter()
                    .map(|offset| parse_offset(offset))
                    .collect::<Result<Vec<_>, _>>()?;

                config = config
                    .with_offsets(offsets)
                    .with_max_values(*max_values)
                    .with_prefer_no_offset(*prefer_no_offset)
                    .with_single_value_max_occurrences(*single_value_max_occurrences)
                    .with_json_output(*json)
                    .with_show_progress(!*no_progress);

                if !value_types.is_empty() {
                    config = config.with_value_types(value_types.clone());
                }
                if let Some(threads) = threads {
                    config = config.with_max_threads(*threads);
                }
            }
            Commands::Aob { offset, .. } => {
                if let Some(offset) = offset {
                    config = config.with_offsets(vec![parse_offset(offset)?]);
                }
                config = config.with_show_progress(false);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliInterface {
        CliInterface::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_group_search_defaults() {
        let cli = parse(&["aob-siggen", "group-search", "libil2cpp.so", "1A2B3C"]);
        let config = cli.to_config().unwrap();

        assert_eq!(config.library, Some(PathBuf::from("libil2cpp.so")));
        assert_eq!(config.offsets, vec![0x1A2B3C]);
        assert_eq!(config.number_of_bytes, 600);
        assert_eq!(config.max_values, 8);
        assert_eq!(config.single_value_max_occurrences, 40);
        assert_eq!(config.value_types, ValueType::ALL.to_vec());
        assert!(config.show_progress);
        assert!(!config.json_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_group_search_options() {
        let cli = parse(&[
            "aob-siggen",
            "group-search",
            "libUE4.so",
            "0x10",
            "20",
            "--architecture",
            "32bit",
            "--max-values",
            "4",
            "--prefer-no-offset",
            "--single-value-max-occurrences",
            "5",
            "--value-types",
            "qword,D",
            "--threads",
            "2",
            "--json",
            "--no-progress",
            "-v",
        ]);
        let config = cli.to_config().unwrap();

        assert_eq!(config.offsets, vec![0x10, 0x20]);
        assert_eq!(config.architecture, Some(Architecture::Arm32));
        assert_eq!(config.value_types, vec![ValueType::Qword, ValueType::Dword]);
        assert_eq!(config.max_threads, 2);
        assert!(config.json_output);
        assert!(!config.show_progress);
        assert!(config.verbose);

        let options = config.search_options();
        assert_eq!(options.max_values, 4);
        assert!(options.prefer_no_offset);
        assert_eq!(options.single_value_max_occurrences, 5);
    }

    #[test]
    fn test_hex_source() {
        let cli = parse(&["aob-siggen", "group-search", "lib.so", "--hex", "FF 43 01 D1"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.hex.as_deref(), Some("FF 43 01 D1"));
        assert!(config.offsets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_source_is_required_and_exclusive() {
        assert!(CliInterface::try_parse_from(["aob-siggen", "group-search", "lib.so"]).is_err());
        assert!(CliInterface::try_parse_from([
            "aob-siggen",
            "group-search",
            "lib.so",
            "1000",
            "--hex",
            "00 00"
        ])
        .is_err());
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let cli = parse(&["aob-siggen", "group-search", "lib.so", "xyz"]);
        assert!(matches!(cli.to_config(), Err(BinaryError::InvalidOffset(_))));

        let cli = parse(&["aob-siggen", "aob", "lib.so", "--hex", "F"]);
        assert!(matches!(cli.to_config(), Err(BinaryError::InvalidHex(_))));

        assert!(CliInterface::try_parse_from(["aob-siggen", "aob", "lib.so", "10", "-a", "mips"]).is_err());
    }

    #[test]
    fn test_aob_command() {
        let cli = parse(&["aob-siggen", "aob", "lib.so", "4F0", "-n", "64"]);
        assert!(cli.is_aob_only());

        let config = cli.to_config().unwrap();
        assert_eq!(config.offsets, vec![0x4F0]);
        assert_eq!(config.number_of_bytes, 64);
        assert!(!config.show_progress);
    }
}
