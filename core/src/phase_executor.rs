// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StageError;
use crate::shutdown_signal::ShutdownSignal;
use crate::worker::Worker;
use crate::worker_pool::WorkerPool;
use async_trait::async_trait;

/// Trait for executing a phase (map or reduce) over a worker pool
/// This abstracts the entire work distribution pattern:
/// - Setting up completion signaling
/// - Initial work assignment
/// - Dynamic reassignment as workers complete
/// - Aborting the phase on the first failure
#[async_trait]
pub trait PhaseExecutor: Send {
    /// The type of worker this executor manages
    type Worker: Worker;

    /// Run every assignment on the pool and return the outputs in
    /// assignment order. Returns only once no assignment is in flight
    /// or the phase has failed.
    async fn execute<SD>(
        &mut self,
        pool: &WorkerPool<Self::Worker, SD>,
        assignments: Vec<<Self::Worker as Worker>::Assignment>,
    ) -> Result<Vec<<Self::Worker as Worker>::Output>, StageError>
    where
        SD: ShutdownSignal;
}
