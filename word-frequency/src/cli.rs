// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::source::{TextSource, DEFAULT_URL};
use clap::{Parser, ValueEnum};
use map_reduce_core::{ConfigError, PipelineConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Download the document from this URL
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Read the document from a local file instead of downloading it
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// JSON pipeline configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub map_workers: Option<usize>,

    #[arg(long)]
    pub reduce_workers: Option<usize>,

    /// Shortest word (in characters) eligible for the ranking
    #[arg(long)]
    pub min_key_length: Option<usize>,

    /// Number of words to rank
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Tokens per map assignment
    #[arg(long)]
    pub partition_size: Option<usize>,

    /// Distinct words per reduce assignment
    #[arg(long)]
    pub keys_per_reducer: Option<usize>,

    /// Chart title
    #[arg(long, default_value = "Top 10 most frequent words")]
    pub title: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Chart)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Horizontal text bar chart
    Chart,
    /// Ranked entries as a JSON array
    Json,
}

impl Cli {
    pub fn source(&self) -> TextSource {
        match (&self.file, &self.url) {
            (Some(path), _) => TextSource::File(path.clone()),
            (None, Some(url)) => TextSource::Url(url.clone()),
            (None, None) => TextSource::Url(DEFAULT_URL.to_string()),
        }
    }

    /// Config file (or defaults) with command-line overrides applied
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        let overrides = [
            (&mut config.map_workers, self.map_workers),
            (&mut config.reduce_workers, self.reduce_workers),
            (&mut config.min_key_length, self.min_key_length),
            (&mut config.top_n, self.top_n),
            (&mut config.partition_size, self.partition_size),
            (&mut config.keys_per_reducer, self.keys_per_reducer),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["word-frequency"]).unwrap();
        assert_eq!(cli.source(), TextSource::Url(DEFAULT_URL.to_string()));
        assert_eq!(cli.pipeline_config().unwrap(), PipelineConfig::default());
        assert_eq!(cli.format, OutputFormat::Chart);
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::try_parse_from([
            "word-frequency",
            "--file",
            "book.txt",
            "--map-workers",
            "12",
            "--top-n",
            "3",
            "--min-key-length",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.source(), TextSource::File(PathBuf::from("book.txt")));
        let config = cli.pipeline_config().unwrap();
        assert_eq!(config.map_workers, 12);
        assert_eq!(config.reduce_workers, 8);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.min_key_length, 0);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = Cli::try_parse_from(["word-frequency", "--reduce-workers", "0"]).unwrap();
        assert!(matches!(
            cli.pipeline_config(),
            Err(ConfigError::Invalid { field: "reduce_workers", .. })
        ));
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result =
            Cli::try_parse_from(["word-frequency", "--url", "http://x", "--file", "a.txt"]);
        assert!(result.is_err());
    }
}
