// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::ChannelCompletionSender;
use crate::error::StageError;
use crate::shutdown_signal::ShutdownSignal;
use crate::worker::{StageWork, Worker, WorkerFactory};
use crate::worker_runtime::{WorkerRuntime, WorkerTask};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, trace, warn};

/// One unit of work as it travels down a worker's channel
pub struct WorkMessage<A, O> {
    pub index: usize,
    pub assignment: A,
    pub completion: ChannelCompletionSender<O>,
}

/// Body of a pooled worker: pull assignments until the channel closes or
/// the stage is cancelled
pub struct ChannelWorkerTask<S, SD>
where
    S: StageWork,
{
    id: usize,
    work: Arc<S>,
    shutdown_signal: SD,
    work_rx: Receiver<WorkMessage<S::Assignment, S::Output>>,
}

#[async_trait]
impl<S, SD> WorkerTask for ChannelWorkerTask<S, SD>
where
    S: StageWork,
    SD: ShutdownSignal,
{
    type Output = ();

    async fn run(mut self) -> Self::Output {
        let phase = S::PHASE;
        loop {
            let message = tokio::select! {
                biased;
                _ = self.shutdown_signal.cancelled() => {
                    debug!(%phase, worker = self.id, "worker cancelled");
                    break;
                }
                message = self.work_rx.recv() => message,
            };

            // Channel closed, exit
            let Some(WorkMessage {
                index,
                assignment,
                completion,
            }) = message
            else {
                break;
            };

            trace!(%phase, worker = self.id, assignment = index, "processing assignment");

            let work = &self.work;
            let shutdown_signal = &self.shutdown_signal;
            let id = self.id;
            let result = catch_unwind(AssertUnwindSafe(|| {
                work.execute(id, index, assignment, shutdown_signal)
            }))
            .unwrap_or_else(|_| {
                Err(StageError::WorkerPanicked {
                    phase,
                    worker_id: id,
                    assignment: index,
                })
            });

            match &result {
                Err(StageError::Cancelled { .. }) => {
                    debug!(%phase, worker = id, assignment = index, "assignment interrupted");
                }
                Err(err) => {
                    warn!(%phase, worker = id, assignment = index, error = %err, "assignment failed");
                }
                Ok(_) => {}
            }

            if !completion.send(result.map(|output| (index, output))).await {
                // Nobody is waiting for this stage any more
                break;
            }
        }
        trace!(%phase, worker = self.id, "worker exiting");
    }
}

/// Worker backed by a bounded mpsc work channel and a runtime-spawned task
pub struct ChannelWorker<S, R, SD>
where
    S: StageWork,
    R: WorkerRuntime<ChannelWorkerTask<S, SD>>,
    SD: ShutdownSignal,
{
    work_tx: Sender<WorkMessage<S::Assignment, S::Output>>,
    task_handle: R::Handle,
    _phantom: PhantomData<SD>,
}

impl<S, R, SD> ChannelWorker<S, R, SD>
where
    S: StageWork,
    R: WorkerRuntime<ChannelWorkerTask<S, SD>>,
    SD: ShutdownSignal,
{
    pub fn new(id: usize, work: Arc<S>, shutdown_signal: SD) -> Self {
        // The executor never queues a second assignment before the first completes
        let (work_tx, work_rx) = mpsc::channel(1);

        let task = ChannelWorkerTask {
            id,
            work,
            shutdown_signal,
            work_rx,
        };

        Self {
            work_tx,
            task_handle: R::spawn(task),
            _phantom: PhantomData,
        }
    }
}

impl<S, R, SD> Worker for ChannelWorker<S, R, SD>
where
    S: StageWork,
    R: WorkerRuntime<ChannelWorkerTask<S, SD>>,
    SD: ShutdownSignal,
{
    type Assignment = S::Assignment;
    type Output = S::Output;
    type Completion = ChannelCompletionSender<S::Output>;
    type Error = R::Error;

    fn send_work(
        &self,
        index: usize,
        assignment: Self::Assignment,
        complete_tx: Self::Completion,
    ) -> bool {
        self.work_tx
            .try_send(WorkMessage {
                index,
                assignment,
                completion: complete_tx,
            })
            .is_ok()
    }

    async fn wait(self) -> Result<(), Self::Error> {
        drop(self.work_tx); // Close the channel to signal task to exit
        R::join(self.task_handle).await
    }
}

/// Creates channel workers that share one stage computation and shutdown signal
pub struct ChannelWorkerFactory<S, R, SD> {
    work: Arc<S>,
    shutdown_signal: SD,
    _phantom: PhantomData<fn() -> R>,
}

impl<S, R, SD> ChannelWorkerFactory<S, R, SD> {
    pub fn new(work: Arc<S>, shutdown_signal: SD) -> Self {
        Self {
            work,
            shutdown_signal,
            _phantom: PhantomData,
        }
    }
}

impl<S, R, SD> WorkerFactory<ChannelWorker<S, R, SD>> for ChannelWorkerFactory<S, R, SD>
where
    S: StageWork,
    R: WorkerRuntime<ChannelWorkerTask<S, SD>>,
    SD: ShutdownSignal,
{
    fn create_worker(&mut self, id: usize) -> ChannelWorker<S, R, SD> {
        ChannelWorker::new(id, self.work.clone(), self.shutdown_signal.clone())
    }
}
