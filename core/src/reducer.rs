// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StageError;
use crate::map_reduce_job::MapReduceJob;
use crate::phase::Phase;
use crate::shuffler::Buckets;
use crate::shutdown_signal::ShutdownSignal;
use crate::utils::partition;
use crate::worker::StageWork;
use std::hash::Hash;
use std::sync::Arc;

/// Reduce assignment: consecutive buckets, in bucket creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceAssignment<K, V> {
    pub partition_id: usize,
    pub buckets: Vec<(K, Vec<V>)>,
}

/// Split the shuffled buckets into reduce assignments of at most `keys_per_reducer` keys
pub fn create_reduce_assignments<K, V>(
    buckets: Buckets<K, V>,
    keys_per_reducer: usize,
) -> Vec<ReduceAssignment<K, V>>
where
    K: Hash + Eq,
{
    partition(buckets, keys_per_reducer)
        .into_iter()
        .enumerate()
        .map(|(partition_id, buckets)| ReduceAssignment {
            partition_id,
            buckets,
        })
        .collect()
}

/// Folds every bucket of an assignment with the job's reduce function
pub struct ReduceWork<P> {
    job: Arc<P>,
}

impl<P> ReduceWork<P> {
    pub fn new(job: Arc<P>) -> Self {
        Self { job }
    }
}

impl<P> StageWork for ReduceWork<P>
where
    P: MapReduceJob,
{
    type Assignment = ReduceAssignment<P::Key, P::Value>;
    type Output = Vec<(P::Key, P::Output)>;

    const PHASE: Phase = Phase::Reduce;

    fn execute<SD>(
        &self,
        worker_id: usize,
        index: usize,
        assignment: Self::Assignment,
        shutdown_signal: &SD,
    ) -> Result<Self::Output, StageError>
    where
        SD: ShutdownSignal,
    {
        let mut reduced = Vec::with_capacity(assignment.buckets.len());
        for (key, values) in assignment.buckets {
            if shutdown_signal.is_cancelled() {
                return Err(StageError::Cancelled {
                    phase: Phase::Reduce,
                });
            }
            match self.job.reduce(&key, values) {
                Ok(output) => reduced.push((key, output)),
                Err(source) => {
                    return Err(StageError::ItemFailed {
                        phase: Phase::Reduce,
                        worker_id,
                        assignment: index,
                        item: format!("{:?}", key),
                        source,
                    })
                }
            }
        }
        Ok(reduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::shuffler::shuffle;
    use crate::shutdown_signal::TokenShutdownSignal;

    struct Sum;

    impl MapReduceJob for Sum {
        type Input = u64;
        type Key = &'static str;
        type Value = u64;
        type Output = u64;

        fn map(&self, input: &u64) -> Result<(&'static str, u64), JobError> {
            Ok(("n", *input))
        }

        fn reduce(&self, _key: &&'static str, values: Vec<u64>) -> Result<u64, JobError> {
            Ok(values.iter().sum())
        }
    }

    #[test]
    fn test_reduce_work_stops_once_cancelled() {
        let signal = TokenShutdownSignal::default();
        let work = ReduceWork::new(Arc::new(Sum));
        let assignment = ReduceAssignment {
            partition_id: 0,
            buckets: vec![("a", vec![1, 2]), ("b", vec![3])],
        };

        let reduced = work.execute(0, 0, assignment.clone(), &signal).unwrap();
        assert_eq!(reduced, vec![("a", 3), ("b", 3)]);

        signal.cancel();
        assert_eq!(
            work.execute(0, 0, assignment, &signal),
            Err(StageError::Cancelled {
                phase: Phase::Reduce
            })
        );
    }

    #[test]
    fn test_create_reduce_assignments_follows_bucket_order() {
        let buckets = shuffle(vec![("c", 1), ("a", 1), ("b", 1), ("c", 1)]);
        let assignments = create_reduce_assignments(buckets, 2);

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].buckets, vec![("c", vec![1, 1]), ("a", vec![1])]);
        assert_eq!(assignments[1].partition_id, 1);
        assert_eq!(assignments[1].buckets, vec![("b", vec![1])]);
    }
}
