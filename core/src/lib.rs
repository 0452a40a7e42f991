// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Worker-pool map / shuffle / reduce engine.
//!
//! A run goes through three barriered stages: a pool of mappers turns every
//! input into one key-value pair, the shuffler groups the pairs by key in
//! first-seen order, and a pool of reducers folds every bucket into one
//! output. Each pool lives only for the duration of its stage.

pub mod channel_worker;
pub mod completion_signaling;
pub mod config;
pub mod default_phase_executor;
pub mod error;
pub mod map_reduce_job;
pub mod mapper;
pub mod orchestrator;
pub mod phase;
pub mod phase_executor;
pub mod reducer;
pub mod shuffler;
pub mod shutdown_signal;
pub mod utils;
pub mod worker;
pub mod worker_pool;
pub mod worker_runtime;

pub use config::PipelineConfig;
pub use error::{ConfigError, JobError, PipelineError, StageError};
pub use map_reduce_job::MapReduceJob;
pub use orchestrator::Orchestrator;
pub use phase::Phase;
pub use shuffler::{shuffle, Buckets};
