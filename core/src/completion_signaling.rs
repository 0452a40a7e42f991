// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StageError;
use std::future::Future;
use tokio::sync::mpsc::{self, Sender};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{StreamExt, StreamMap};

/// Completion message: the finished assignment's index and output, or the
/// reason it failed
pub type CompletionMessage<O> = Result<(usize, O), StageError>;

/// Trait for abstracting completion signaling mechanisms
pub trait CompletionSignaling: Send {
    /// What a successful assignment produces
    type Output: Send;

    /// The token type passed to workers for signaling completion
    type Token: Send;

    /// Setup completion signaling for N workers
    fn setup(num_workers: usize) -> Self;

    /// Issue the completion token for the next assignment sent to `worker_id`
    fn get_token(&mut self, worker_id: usize) -> Self::Token;

    /// Wait for the next completion from any worker.
    /// Returns None once every issued token has been used or dropped.
    fn wait_next(
        &mut self,
    ) -> impl Future<Output = Option<(usize, CompletionMessage<Self::Output>)>> + Send;
}

/// Sending half handed to a worker along with each assignment
pub struct ChannelCompletionSender<O> {
    tx: Sender<CompletionMessage<O>>,
}

impl<O: Send> ChannelCompletionSender<O> {
    /// Returns false if the executor has stopped listening
    pub async fn send(&self, message: CompletionMessage<O>) -> bool {
        self.tx.send(message).await.is_ok()
    }
}

/// Channel-based completion signaling using tokio mpsc and StreamMap.
///
/// Every token owns the only sender of a fresh channel, so a worker that
/// goes away without reporting closes its stream instead of leaving the
/// executor waiting forever.
pub struct ChannelCompletionSignaling<O> {
    completion_streams: StreamMap<usize, ReceiverStream<CompletionMessage<O>>>,
}

impl<O> CompletionSignaling for ChannelCompletionSignaling<O>
where
    O: Send + 'static,
{
    type Output = O;
    type Token = ChannelCompletionSender<O>;

    fn setup(num_workers: usize) -> Self {
        Self {
            completion_streams: StreamMap::with_capacity(num_workers),
        }
    }

    fn get_token(&mut self, worker_id: usize) -> Self::Token {
        // One assignment in flight per worker
        let (tx, rx) = mpsc::channel::<CompletionMessage<O>>(1);
        self.completion_streams.insert(worker_id, ReceiverStream::new(rx));
        ChannelCompletionSender { tx }
    }

    async fn wait_next(&mut self) -> Option<(usize, CompletionMessage<O>)> {
        self.completion_streams.next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion_carries_worker_and_index() {
        let mut signaling = ChannelCompletionSignaling::<u32>::setup(2);
        let token = signaling.get_token(1);

        assert!(token.send(Ok((7, 42))).await);
        drop(token);

        let (worker_id, message) = signaling.wait_next().await.unwrap();
        assert_eq!(worker_id, 1);
        assert_eq!(message, Ok((7, 42)));
        assert!(signaling.wait_next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_tokens_close_signaling() {
        let mut signaling = ChannelCompletionSignaling::<u32>::setup(2);
        drop(signaling.get_token(0));
        drop(signaling.get_token(1));

        assert!(signaling.wait_next().await.is_none());
    }
}
