// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod cli;
mod logging;
mod render;
mod source;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, OutputFormat};
use map_reduce_word_count::{tokenize, WordFrequencyPipeline};
use render::{log_ranking, BarChart};
use source::AcquisitionError;
use std::time::Instant;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = cli.pipeline_config().context("invalid pipeline configuration")?;
    config.print_summary();

    let source = cli.source();
    info!(%source, "fetching text");
    let text = source.fetch().await?;

    if text.is_empty() {
        return Err(AcquisitionError::Empty {
            source_name: source.to_string(),
        }
        .into());
    }

    info!("removing punctuation");
    let tokens = tokenize(&text);

    let shutdown_token = CancellationToken::new();
    let pipeline = WordFrequencyPipeline::new(config)?.with_shutdown_token(shutdown_token.clone());

    info!(tokens = tokens.len(), "running map-reduce");
    let run = pipeline.run(tokens);
    tokio::pin!(run);
    let finished = tokio::select! {
        result = &mut run => Some(result),
        _ = signal::ctrl_c() => None,
    };
    let Some(result) = finished else {
        warn!("Ctrl+C received, cancelling");
        shutdown_token.cancel();
        // The running stage joins its workers before reporting the cancellation
        if let Err(err) = run.await {
            info!(error = %err, "pipeline stopped");
        }
        bail!("interrupted");
    };
    let frequencies = result?;

    info!(
        distinct = frequencies.counts.len(),
        total = frequencies.total_tokens(),
        "word counts ready"
    );
    log_ranking(&frequencies.top);

    match cli.format {
        OutputFormat::Chart => print!("{}", BarChart::new(&cli.title, &frequencies.top)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frequencies.top)?),
    }

    info!("finished in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}
