// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Word-frequency job for the map-reduce core.
//!
//! Tokens go through the worker-pool pipeline to produce the complete
//! count of every distinct word, which is then filtered by word length and
//! ranked.

pub mod ranking;
pub mod tokenizer;
mod word_count_job;

pub use ranking::{filter_by_key_length, key_length, rank, top_n, AggregatedCount, RankedEntry};
pub use tokenizer::{remove_punctuation, tokenize};
pub use word_count_job::WordCountJob;

use indexmap::IndexMap;
use map_reduce_core::error::PipelineResult;
use map_reduce_core::{Orchestrator, PipelineConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, Dispatch};

/// Complete counts plus the ranked selection drawn from them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFrequencies {
    /// Every distinct token, in first-occurrence order
    pub counts: IndexMap<String, u64>,
    /// At most `top_n` qualifying words, most frequent first
    pub top: Vec<RankedEntry>,
}

impl WordFrequencies {
    pub fn total_tokens(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn aggregated(&self) -> Vec<AggregatedCount> {
        self.counts
            .iter()
            .map(|(key, total)| AggregatedCount {
                key: key.clone(),
                total: *total,
            })
            .collect()
    }
}

pub struct WordFrequencyPipeline {
    orchestrator: Orchestrator<WordCountJob>,
}

impl WordFrequencyPipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        Ok(Self {
            orchestrator: Orchestrator::new(WordCountJob, config)?,
        })
    }

    pub fn with_dispatch(self, dispatch: Dispatch) -> Self {
        Self {
            orchestrator: self.orchestrator.with_dispatch(dispatch),
        }
    }

    pub fn with_shutdown_token(self, token: CancellationToken) -> Self {
        Self {
            orchestrator: self.orchestrator.with_shutdown_token(token),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        self.orchestrator.config()
    }

    pub async fn run(&self, tokens: Vec<String>) -> PipelineResult<WordFrequencies> {
        let config = self.orchestrator.config();
        let counts = self.orchestrator.run(tokens).await?;
        let top = rank(&counts, config.min_key_length, config.top_n);
        info!(
            distinct = counts.len(),
            ranked = top.len(),
            min_key_length = config.min_key_length,
            "ranking completed"
        );
        Ok(WordFrequencies { counts, top })
    }
}

/// Count `tokens` and rank them with `config`
pub async fn count_words(
    tokens: Vec<String>,
    config: &PipelineConfig,
) -> PipelineResult<WordFrequencies> {
    WordFrequencyPipeline::new(config.clone())?.run(tokens).await
}
