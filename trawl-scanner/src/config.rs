use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use trawl_config::shared::PipelineConfig;

use crate::error::ScannerResult;

/// Command-line arguments for the scanner binary.
#[derive(Debug, Parser)]
#[command(name = "trawl-scanner", about = "Concurrent scan jobs over the trawl pipeline")]
pub struct ScannerArgs {
    /// Optional JSON file with pipeline configuration overrides.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ScannerCommand,
}

/// The scan job to run.
#[derive(Debug, Subcommand)]
pub enum ScannerCommand {
    /// Scan a log file for keyword occurrences and print sorted frequencies.
    Logs {
        /// Path of the line-oriented log file to scan.
        path: PathBuf,
        /// Keywords to match, comma separated.
        #[arg(long, value_delimiter = ',', default_values_t = default_keywords())]
        keywords: Vec<String>,
        /// Lines per work item.
        #[arg(long)]
        batch_size: Option<usize>,
        /// Number of parallel scan workers.
        #[arg(long)]
        workers: Option<u16>,
    },
    /// Search the integers for primes that are also palindromes.
    Primes {
        /// Number of prime palindromes to collect.
        #[arg(value_parser = clap::value_parser!(u64).range(1..=50))]
        count: u64,
        /// First candidate of the search.
        #[arg(long, default_value_t = 2)]
        start: u64,
        /// Number of parallel scan workers.
        #[arg(long)]
        workers: Option<u16>,
    },
}

fn default_keywords() -> Vec<String> {
    ["ERROR", "WARN", "INFO"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Loads the pipeline configuration, either from a JSON file or from defaults.
///
/// The pipeline id defaults to the process id, which keeps concurrent
/// invocations distinguishable in logs.
pub fn load_pipeline_config(path: Option<&Path>) -> ScannerResult<PipelineConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read(path)?;
            serde_json::from_slice(&raw)?
        }
        None => PipelineConfig {
            id: std::process::id() as u64,
            ..Default::default()
        },
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_arguments_parse_with_defaults() {
        let args = ScannerArgs::parse_from(["trawl-scanner", "logs", "app.log"]);

        let ScannerCommand::Logs {
            path,
            keywords,
            batch_size,
            workers,
        } = args.command
        else {
            panic!("expected logs command");
        };

        assert_eq!(path, PathBuf::from("app.log"));
        assert_eq!(keywords, vec!["ERROR", "WARN", "INFO"]);
        assert!(batch_size.is_none());
        assert!(workers.is_none());
    }

    #[test]
    fn primes_count_outside_range_is_rejected() {
        assert!(ScannerArgs::try_parse_from(["trawl-scanner", "primes", "0"]).is_err());
        assert!(ScannerArgs::try_parse_from(["trawl-scanner", "primes", "51"]).is_err());
        assert!(ScannerArgs::try_parse_from(["trawl-scanner", "primes", "50"]).is_ok());
    }

    #[test]
    fn keyword_list_is_comma_separated() {
        let args = ScannerArgs::parse_from([
            "trawl-scanner",
            "logs",
            "app.log",
            "--keywords",
            "FATAL,PANIC",
        ]);

        let ScannerCommand::Logs { keywords, .. } = args.command else {
            panic!("expected logs command");
        };

        assert_eq!(keywords, vec!["FATAL", "PANIC"]);
    }
}
