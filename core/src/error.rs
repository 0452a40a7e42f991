// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::phase::Phase;
use std::path::PathBuf;

/// Failure raised by a job's own map or reduce function
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct JobError {
    message: String,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A failed map or reduce stage. One of these aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("{phase} worker {worker_id} failed on item {item} (assignment {assignment}): {source}")]
    ItemFailed {
        phase: Phase,
        worker_id: usize,
        assignment: usize,
        item: String,
        #[source]
        source: JobError,
    },

    #[error("{phase} worker {worker_id} panicked on assignment {assignment}")]
    WorkerPanicked {
        phase: Phase,
        worker_id: usize,
        assignment: usize,
    },

    #[error("{phase} worker {worker_id} is no longer accepting work")]
    WorkerUnavailable { phase: Phase, worker_id: usize },

    #[error("{phase} completion channels closed before the stage finished")]
    CompletionChannelClosed { phase: Phase },

    #[error("{phase} stage was cancelled")]
    Cancelled { phase: Phase },

    #[error("{phase} worker {worker_id} did not shut down cleanly: {message}")]
    Join {
        phase: Phase,
        worker_id: usize,
        message: String,
    },
}

impl StageError {
    /// The stage that failed
    pub fn phase(&self) -> Phase {
        match self {
            StageError::ItemFailed { phase, .. }
            | StageError::WorkerPanicked { phase, .. }
            | StageError::WorkerUnavailable { phase, .. }
            | StageError::CompletionChannelClosed { phase }
            | StageError::Cancelled { phase }
            | StageError::Join { phase, .. } => *phase,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
