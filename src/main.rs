// Fri Oct 16 2026 - Alex

use anyhow::{bail, Context, Result};
use aob_siggen::{
    binary::{parse_hex, LibraryFile},
    codec::CodecRegistry,
    config::Config,
    engine::{AnalysisRequest, SignatureGenerator},
    output::{AnalysisReport, JsonSerializer, OutputFormatter, RunReport},
    ui::{BatchProgress, CliInterface},
    utils::{pluralize, LoggingUtils, ScopedTimer},
};
use colored::Colorize;
use std::io;

fn main() {
    let cli = CliInterface::parse_args();
    LoggingUtils::init(cli.source().verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: &CliInterface) -> Result<()> {
    let config = cli.to_config().context("Invalid arguments")?;
    config.validate().map_err(anyhow::Error::msg)?;

    let path = config.library.as_ref().context("A lib file must be given")?;
    let library = LibraryFile::open(path)
        .with_context(|| format!("Failed to open lib file {}", path.display()))?;
    let registry = CodecRegistry::new();
    let generator = SignatureGenerator::new(&library, &registry, &config)?;
    let requests = build_requests(&config)?;

    if cli.is_aob_only() {
        for request in &requests {
            let aob = generator
                .generate_aob(request)
                .with_context(|| format!("Failed to generate AOB for {}", request))?;
            println!("{}", aob);
        }
        return Ok(());
    }

    if !config.json_output {
        println!(
            "{} {} ({}), {}",
            "[*]".blue(),
            library.name(),
            generator.architecture(),
            pluralize(requests.len(), "function", "functions")
        );
    }

    let analyses = {
        let _timer = ScopedTimer::new("signature generation");
        let progress = BatchProgress::new(requests.len(), config.show_progress && !config.json_output);
        let analyses = generator.analyze_batch(&requests, |request| progress.finished(&request.label))?;
        progress.finish();
        analyses
    };

    let failures = analyses.iter().filter(|analysis| analysis.is_err()).count();

    if config.json_output {
        let reports = requests
            .iter()
            .zip(&analyses)
            .map(|(request, analysis)| match analysis {
                Ok(analysis) => AnalysisReport::from_analysis(analysis),
                Err(e) => AnalysisReport::from_error(&request.label, e),
            })
            .collect();
        let report = RunReport::new(&library.name(), generator.architecture(), reports);
        JsonSerializer::new().write(&report, io::stdout().lock())?;
    } else {
        let formatter = OutputFormatter::new().with_values(config.verbose);
        for (request, analysis) in requests.iter().zip(&analyses) {
            match analysis {
                Ok(analysis) => print!("{}", formatter.format_analysis(analysis)),
                Err(e) => eprint!("{}", formatter.format_failure(&request.label, e)),
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} failed", failures, pluralize(requests.len(), "function", "functions"));
    }
    Ok(())
}

fn build_requests(config: &Config) -> Result<Vec<AnalysisRequest>> {
    if let Some(hex) = &config.hex {
        let bytes = parse_hex(hex).context("Invalid hex string")?;
        return Ok(vec![AnalysisRequest::from_hex(bytes)]);
    }

    Ok(config
        .offsets
        .iter()
        .map(|&offset| AnalysisRequest::at_offset(offset))
        .collect())
}
