// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::JobError;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait that defines a specific MapReduce job
/// Abstracts the job domain from the execution model
pub trait MapReduceJob: Send + Sync + 'static {
    /// One unit of input to the map phase
    type Input: Debug + Send + 'static;

    /// Grouping key emitted by `map`
    type Key: Debug + Clone + Eq + Hash + Send + 'static;

    /// Value emitted by `map` alongside its key
    type Value: Send + 'static;

    /// Result of reducing one bucket
    type Output: Send + 'static;

    /// Transform one input into exactly one key-value pair
    fn map(&self, input: &Self::Input) -> Result<(Self::Key, Self::Value), JobError>;

    /// Combine every value observed for `key`
    fn reduce(&self, key: &Self::Key, values: Vec<Self::Value>) -> Result<Self::Output, JobError>;
}
