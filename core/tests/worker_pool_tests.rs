// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use map_reduce_core::channel_worker::{ChannelWorker, ChannelWorkerFactory};
use map_reduce_core::completion_signaling::{ChannelCompletionSender, ChannelCompletionSignaling};
use map_reduce_core::default_phase_executor::DefaultPhaseExecutor;
use map_reduce_core::phase_executor::PhaseExecutor;
use map_reduce_core::shutdown_signal::{ShutdownSignal, TokenShutdownSignal};
use map_reduce_core::worker::{StageWork, Worker};
use map_reduce_core::worker_pool::WorkerPool;
use map_reduce_core::worker_runtime::TokioRuntime;
use map_reduce_core::{Phase, StageError};
use std::convert::Infallible;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Doubles its assignment; later assignments finish sooner
struct Double;

impl StageWork for Double {
    type Assignment = u64;
    type Output = u64;

    const PHASE: Phase = Phase::Map;

    fn execute<SD>(
        &self,
        _worker_id: usize,
        _index: usize,
        value: u64,
        _shutdown_signal: &SD,
    ) -> Result<u64, StageError>
    where
        SD: ShutdownSignal,
    {
        thread::sleep(Duration::from_micros(200u64.saturating_sub(value * 4)));
        Ok(value * 2)
    }
}

type DoubleWorker = ChannelWorker<Double, TokioRuntime, TokenShutdownSignal>;

fn spawn_pool(
    num_workers: usize,
    token: CancellationToken,
) -> WorkerPool<DoubleWorker, TokenShutdownSignal> {
    let signal = TokenShutdownSignal::new(token);
    let factory =
        ChannelWorkerFactory::<Double, TokioRuntime, _>::new(Arc::new(Double), signal.clone());
    WorkerPool::spawn(Phase::Map, num_workers, factory, signal)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_outputs_follow_assignment_order() {
    let pool = spawn_pool(5, CancellationToken::new());
    let mut executor = DefaultPhaseExecutor::<DoubleWorker, ChannelCompletionSignaling<u64>>::new();

    let outputs = executor.execute(&pool, (0..50).collect()).await.unwrap();
    assert_eq!(outputs, (0..50).map(|v| v * 2).collect::<Vec<_>>());

    pool.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_more_workers_than_assignments() {
    let pool = spawn_pool(16, CancellationToken::new());
    assert_eq!(pool.len(), 16);
    let mut executor = DefaultPhaseExecutor::<DoubleWorker, ChannelCompletionSignaling<u64>>::new();

    let outputs = executor.execute(&pool, vec![7, 8]).await.unwrap();
    assert_eq!(outputs, vec![14, 16]);

    pool.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shutdown_leaves_signal_untouched() {
    let token = CancellationToken::new();
    let pool = spawn_pool(3, token.clone());

    pool.shutdown().await.unwrap();
    assert!(!token.is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dropped_pool_cancels_its_workers() {
    let token = CancellationToken::new();
    let pool = spawn_pool(3, token.clone());
    assert!(!pool.shutdown_signal().is_cancelled());

    drop(pool);
    assert!(token.is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancelled_pool_refuses_phase() {
    let token = CancellationToken::new();
    let pool = spawn_pool(2, token.clone());
    token.cancel();
    let mut executor = DefaultPhaseExecutor::<DoubleWorker, ChannelCompletionSignaling<u64>>::new();

    let result = executor.execute(&pool, vec![1, 2, 3]).await;
    assert_eq!(result, Err(StageError::Cancelled { phase: Phase::Map }));

    pool.shutdown().await.unwrap();
}

/// Accepts every assignment and never reports back
struct SilentWorker;

impl Worker for SilentWorker {
    type Assignment = u64;
    type Output = u64;
    type Completion = ChannelCompletionSender<u64>;
    type Error = Infallible;

    fn send_work(&self, _index: usize, _assignment: u64, complete_tx: Self::Completion) -> bool {
        drop(complete_tx);
        true
    }

    async fn wait(self) -> Result<(), Infallible> {
        Ok(())
    }
}

#[tokio::test]
async fn test_workers_lost_without_reporting() {
    let token = CancellationToken::new();
    let pool = WorkerPool::spawn(
        Phase::Reduce,
        2,
        |_| SilentWorker,
        TokenShutdownSignal::new(token.clone()),
    );
    let mut executor = DefaultPhaseExecutor::<SilentWorker, ChannelCompletionSignaling<u64>>::new();

    let result = executor.execute(&pool, vec![1, 2, 3]).await;
    assert_eq!(
        result,
        Err(StageError::CompletionChannelClosed {
            phase: Phase::Reduce
        })
    );
    assert!(token.is_cancelled());

    pool.shutdown().await.unwrap();
}
