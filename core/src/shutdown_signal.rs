// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Cooperative stop flag shared by a stage's workers and its executor
pub trait ShutdownSignal: Clone + Send + Sync + 'static {
    fn is_cancelled(&self) -> bool;

    /// Request every holder of this signal to stop
    fn cancel(&self);

    /// Resolves once the signal has been cancelled
    fn cancelled(&self) -> impl Future<Output = ()> + Send;
}

/// Tokio CancellationToken-based shutdown signal
#[derive(Clone, Debug, Default)]
pub struct TokenShutdownSignal {
    token: CancellationToken,
}

impl TokenShutdownSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl ShutdownSignal for TokenShutdownSignal {
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn cancel(&self) {
        self.token.cancel();
    }

    fn cancelled(&self) -> impl Future<Output = ()> + Send {
        self.token.cancelled()
    }
}
