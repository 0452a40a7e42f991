// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;
use tokio::task::{self, JoinError, JoinHandle};
use tracing::instrument::WithSubscriber;

/// Defines the long-running body of a worker
#[async_trait]
pub trait WorkerTask: Send + 'static {
    type Output;
    async fn run(self) -> Self::Output;
}

/// Trait for abstracting worker runtime (tasks, threads, processes)
pub trait WorkerRuntime<Task>: Send + Sync + 'static {
    type Handle: Send + Sync;
    type Error: Display + Send;

    /// Spawn a worker task/thread/process
    fn spawn(task: Task) -> Self::Handle;

    /// Wait for the worker to complete
    fn join(handle: Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Tokio task-based runtime. Spawned workers keep the subscriber that was
/// current at spawn time, so an injected dispatcher follows them.
#[derive(Clone, Copy, Debug)]
pub struct TokioRuntime;

impl<T> WorkerRuntime<T> for TokioRuntime
where
    T: WorkerTask<Output = ()>,
{
    type Handle = JoinHandle<()>;
    type Error = JoinError;

    fn spawn(task: T) -> Self::Handle {
        task::spawn(task.run().with_current_subscriber())
    }

    async fn join(handle: Self::Handle) -> Result<(), Self::Error> {
        handle.await
    }
}
