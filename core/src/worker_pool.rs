// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StageError;
use crate::phase::Phase;
use crate::shutdown_signal::ShutdownSignal;
use crate::worker::{Worker, WorkerFactory};
use std::mem;
use tracing::{debug, warn};

/// Fixed-size set of workers owned by a single stage.
///
/// The pool is released with [`WorkerPool::shutdown`], which closes every
/// work channel and joins every worker. Dropping a pool that was never shut
/// down is best-effort only: it cancels the shutdown signal and closes the
/// work channels but cannot join, so a worker may still finish the item it
/// is on after the drop. Cancel the signal and await the stage instead when
/// the workers must be gone.
pub struct WorkerPool<W, SD>
where
    W: Worker,
    SD: ShutdownSignal,
{
    phase: Phase,
    workers: Vec<W>,
    shutdown_signal: SD,
}

impl<W, SD> WorkerPool<W, SD>
where
    W: Worker,
    SD: ShutdownSignal,
{
    pub fn spawn<F>(phase: Phase, num_workers: usize, mut factory: F, shutdown_signal: SD) -> Self
    where
        F: WorkerFactory<W>,
    {
        let workers = (0..num_workers)
            .map(|id| factory.create_worker(id))
            .collect();
        debug!(%phase, workers = num_workers, "worker pool started");

        Self {
            phase,
            workers,
            shutdown_signal,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn workers(&self) -> &[W] {
        &self.workers
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn shutdown_signal(&self) -> &SD {
        &self.shutdown_signal
    }

    /// Close every work channel and wait for all workers to exit. Every
    /// worker is joined even if an earlier one fails; the first failure is
    /// returned.
    pub async fn shutdown(mut self) -> Result<(), StageError> {
        let phase = self.phase;
        let workers = mem::take(&mut self.workers);
        let mut first_error = None;

        for (worker_id, worker) in workers.into_iter().enumerate() {
            if let Err(e) = worker.wait().await {
                warn!(%phase, worker = worker_id, error = %e, "worker shutdown failed");
                first_error.get_or_insert(StageError::Join {
                    phase,
                    worker_id,
                    message: e.to_string(),
                });
            }
        }
        debug!(%phase, "worker pool released");

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<W, SD> Drop for WorkerPool<W, SD>
where
    W: Worker,
    SD: ShutdownSignal,
{
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            debug!(phase = %self.phase, "worker pool dropped before shutdown, cancelling workers");
            self.shutdown_signal.cancel();
        }
    }
}
