// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use map_reduce_core::{JobError, MapReduceJob};

/// Counts how often every token occurs
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountJob;

impl MapReduceJob for WordCountJob {
    type Input = String;
    type Key = String;
    type Value = u64;
    type Output = u64;

    fn map(&self, token: &String) -> Result<(String, u64), JobError> {
        Ok((token.clone(), 1))
    }

    fn reduce(&self, key: &String, values: Vec<u64>) -> Result<u64, JobError> {
        values
            .into_iter()
            .try_fold(0u64, u64::checked_add)
            .ok_or_else(|| JobError::new(format!("count for {:?} overflows u64", key)))
    }
}
