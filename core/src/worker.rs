// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StageError;
use crate::phase::Phase;
use crate::shutdown_signal::ShutdownSignal;
use std::fmt::Display;
use std::future::Future;

/// Trait for workers (mappers and reducers) to abstract communication mechanism
pub trait Worker: Send + Sync {
    type Assignment: Send;
    type Output: Send;
    type Completion;
    type Error: Display;

    /// Hand an assignment to this worker. `index` identifies the assignment
    /// within its stage and comes back with the completion.
    /// Returns false if the worker no longer accepts work.
    fn send_work(
        &self,
        index: usize,
        assignment: Self::Assignment,
        complete_tx: Self::Completion,
    ) -> bool;

    /// Close the work channel and wait for the worker to shut down
    fn wait(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Trait for creating workers
pub trait WorkerFactory<W>: Send {
    fn create_worker(&mut self, id: usize) -> W;
}

impl<F, W> WorkerFactory<W> for F
where
    F: FnMut(usize) -> W + Send,
{
    fn create_worker(&mut self, id: usize) -> W {
        (self)(id)
    }
}

/// The per-assignment computation a stage runs inside its workers
pub trait StageWork: Send + Sync + 'static {
    type Assignment: Send + 'static;
    type Output: Send + 'static;

    const PHASE: Phase;

    /// Run one assignment. Implementations check `shutdown_signal` between
    /// items and stop with [`StageError::Cancelled`] once it fires.
    fn execute<SD>(
        &self,
        worker_id: usize,
        index: usize,
        assignment: Self::Assignment,
        shutdown_signal: &SD,
    ) -> Result<Self::Output, StageError>
    where
        SD: ShutdownSignal;
}
