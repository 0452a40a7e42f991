// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::CompletionSignaling;
use crate::error::StageError;
use crate::phase::Phase;
use crate::phase_executor::PhaseExecutor;
use crate::shutdown_signal::ShutdownSignal;
use crate::worker::Worker;
use crate::worker_pool::WorkerPool;
use async_trait::async_trait;
use std::marker::PhantomData;
use tracing::{debug, error};

/// Default phase executor: hands the next assignment to whichever worker
/// finishes first, slots every output by assignment index, and aborts the
/// phase on the first failure.
/// Generic over worker type and completion signaling
pub struct DefaultPhaseExecutor<W, CS> {
    _phantom: PhantomData<fn() -> (W, CS)>,
}

impl<W, CS> Default for DefaultPhaseExecutor<W, CS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W, CS> DefaultPhaseExecutor<W, CS> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<W, CS> PhaseExecutor for DefaultPhaseExecutor<W, CS>
where
    W: Worker,
    CS: CompletionSignaling<Output = W::Output>,
    W::Completion: From<CS::Token>,
{
    type Worker = W;

    async fn execute<SD>(
        &mut self,
        pool: &WorkerPool<W, SD>,
        assignments: Vec<W::Assignment>,
    ) -> Result<Vec<W::Output>, StageError>
    where
        SD: ShutdownSignal,
    {
        let phase = pool.phase();
        let shutdown_signal = pool.shutdown_signal();
        if shutdown_signal.is_cancelled() {
            return Err(StageError::Cancelled { phase });
        }

        let total = assignments.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        if pool.is_empty() {
            return Err(StageError::WorkerUnavailable {
                phase,
                worker_id: 0,
            });
        }

        // Setup signaling
        let mut signaling = CS::setup(pool.len());

        let mut pending = assignments.into_iter().enumerate();
        let mut results: Vec<Option<W::Output>> = (0..total).map(|_| None).collect();
        let mut active_workers = 0;

        // Distribute initial assignments
        for (worker_id, worker) in pool.workers().iter().enumerate() {
            let Some((index, assignment)) = pending.next() else {
                break;
            };
            let completion = signaling.get_token(worker_id);
            if !worker.send_work(index, assignment, completion.into()) {
                return Err(unavailable(shutdown_signal, phase, worker_id));
            }
            active_workers += 1;
        }
        debug!(%phase, assignments = total, active_workers, "initial assignments distributed");

        // Process completions and reassignments
        while active_workers > 0 {
            let next = tokio::select! {
                biased;
                _ = shutdown_signal.cancelled() => {
                    return Err(StageError::Cancelled { phase });
                }
                next = signaling.wait_next() => next,
            };

            let Some((worker_id, message)) = next else {
                error!(%phase, active_workers, "workers went away without reporting");
                shutdown_signal.cancel();
                return Err(StageError::CompletionChannelClosed { phase });
            };

            match message {
                Ok((index, output)) => {
                    results[index] = Some(output);
                    active_workers -= 1;

                    // Assign next assignment if available
                    if let Some((index, assignment)) = pending.next() {
                        let completion = signaling.get_token(worker_id);
                        if !pool.workers()[worker_id].send_work(
                            index,
                            assignment,
                            completion.into(),
                        ) {
                            return Err(unavailable(shutdown_signal, phase, worker_id));
                        }
                        active_workers += 1;
                    }
                }
                Err(err) => {
                    // Drop unstarted work and stop the other workers
                    error!(%phase, worker = worker_id, error = %err, "aborting phase");
                    shutdown_signal.cancel();
                    return Err(err);
                }
            }
        }

        Ok(results.into_iter().flatten().collect())
    }
}

/// A worker refused an assignment. If the stage was cancelled meanwhile the
/// worker simply exited, so report the cancellation instead.
fn unavailable<SD>(shutdown_signal: &SD, phase: Phase, worker_id: usize) -> StageError
where
    SD: ShutdownSignal,
{
    if shutdown_signal.is_cancelled() {
        return StageError::Cancelled { phase };
    }
    shutdown_signal.cancel();
    StageError::WorkerUnavailable { phase, worker_id }
}
