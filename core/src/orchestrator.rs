// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_worker::{ChannelWorker, ChannelWorkerFactory};
use crate::completion_signaling::ChannelCompletionSignaling;
use crate::config::PipelineConfig;
use crate::default_phase_executor::DefaultPhaseExecutor;
use crate::error::{PipelineResult, StageError};
use crate::map_reduce_job::MapReduceJob;
use crate::mapper::{create_map_assignments, MapWork};
use crate::phase_executor::PhaseExecutor;
use crate::reducer::{create_reduce_assignments, ReduceWork};
use crate::shuffler::shuffle;
use crate::shutdown_signal::TokenShutdownSignal;
use crate::worker::StageWork;
use crate::worker_pool::WorkerPool;
use crate::worker_runtime::TokioRuntime;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, info_span, Dispatch, Instrument};

/// Orchestrator coordinates the map-shuffle-reduce workflow.
///
/// Each parallel stage acquires its own worker pool and releases it before
/// the next stage begins, on success and on failure alike.
pub struct Orchestrator<P: MapReduceJob> {
    job: Arc<P>,
    config: PipelineConfig,
    dispatch: Option<Dispatch>,
    shutdown_token: CancellationToken,
}

impl<P: MapReduceJob> Orchestrator<P> {
    pub fn new(job: P, config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            job: Arc::new(job),
            config,
            dispatch: None,
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Send every event of a run, including those from worker tasks, to
    /// `dispatch` instead of the caller's current subscriber
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Cancel in-flight runs when `token` is cancelled. Every stage
    /// derives a child token from it.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown_token = token;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn job(&self) -> &P {
        &self.job
    }

    /// Run the full pipeline over `inputs` and return one output per
    /// distinct key, in the order each key first appears in `inputs`
    pub async fn run(&self, inputs: Vec<P::Input>) -> PipelineResult<IndexMap<P::Key, P::Output>> {
        match &self.dispatch {
            Some(dispatch) => {
                self.run_in_span(inputs)
                    .with_subscriber(dispatch.clone())
                    .await
            }
            None => self.run_in_span(inputs).await,
        }
    }

    // The span has to be created under the dispatcher that will record it
    async fn run_in_span(
        &self,
        inputs: Vec<P::Input>,
    ) -> PipelineResult<IndexMap<P::Key, P::Output>> {
        let span = info_span!("map_reduce", inputs = inputs.len());
        self.run_stages(inputs).instrument(span).await
    }

    async fn run_stages(
        &self,
        inputs: Vec<P::Input>,
    ) -> PipelineResult<IndexMap<P::Key, P::Output>> {
        let start_time = Instant::now();

        // 1. MAP
        let map_assignments = create_map_assignments(inputs, self.config.partition_size);
        info!(
            assignments = map_assignments.len(),
            workers = self.config.map_workers,
            "map phase started"
        );
        let mapped = self
            .run_phase(
                MapWork::new(self.job.clone()),
                self.config.map_workers,
                map_assignments,
            )
            .await?;
        let mapped: Vec<_> = mapped.into_iter().flatten().collect();
        info!(pairs = mapped.len(), "map phase completed");

        // 2. SHUFFLE
        let buckets = shuffle(mapped);
        info!(keys = buckets.len(), "shuffle completed");

        // 3. REDUCE
        let reduce_assignments = create_reduce_assignments(buckets, self.config.keys_per_reducer);
        info!(
            assignments = reduce_assignments.len(),
            workers = self.config.reduce_workers,
            "reduce phase started"
        );
        let reduced = self
            .run_phase(
                ReduceWork::new(self.job.clone()),
                self.config.reduce_workers,
                reduce_assignments,
            )
            .await?;
        let reduced: IndexMap<_, _> = reduced.into_iter().flatten().collect();
        info!(
            keys = reduced.len(),
            elapsed = ?start_time.elapsed(),
            "reduce phase completed"
        );

        Ok(reduced)
    }

    /// Acquire a pool for one stage, run every assignment on it, then
    /// release the pool whatever the outcome
    async fn run_phase<S>(
        &self,
        work: S,
        num_workers: usize,
        assignments: Vec<S::Assignment>,
    ) -> Result<Vec<S::Output>, StageError>
    where
        S: StageWork,
    {
        let phase = S::PHASE;
        let shutdown_signal = TokenShutdownSignal::new(self.shutdown_token.child_token());
        let factory = ChannelWorkerFactory::<S, TokioRuntime, TokenShutdownSignal>::new(
            Arc::new(work),
            shutdown_signal.clone(),
        );
        let pool: WorkerPool<ChannelWorker<S, TokioRuntime, TokenShutdownSignal>, _> =
            WorkerPool::spawn(phase, num_workers, factory, shutdown_signal);

        let mut executor = DefaultPhaseExecutor::<
            ChannelWorker<S, TokioRuntime, TokenShutdownSignal>,
            ChannelCompletionSignaling<S::Output>,
        >::new();
        let outcome = executor.execute(&pool, assignments).await;
        let released = pool.shutdown().await;

        match (outcome, released) {
            (Ok(outputs), Ok(())) => Ok(outputs),
            (Err(err), _) | (Ok(_), Err(err)) => {
                error!(%phase, error = %err, "phase failed");
                Err(err)
            }
        }
    }
}
