// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StageError;
use crate::map_reduce_job::MapReduceJob;
use crate::phase::Phase;
use crate::shutdown_signal::ShutdownSignal;
use crate::utils::partition;
use crate::worker::StageWork;
use std::sync::Arc;

/// Map assignment: a chunk of consecutive inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAssignment<I> {
    pub chunk_id: usize,
    pub inputs: Vec<I>,
}

/// Split the input sequence into map assignments of at most `partition_size` items
pub fn create_map_assignments<I>(inputs: Vec<I>, partition_size: usize) -> Vec<MapAssignment<I>> {
    partition(inputs, partition_size)
        .into_iter()
        .enumerate()
        .map(|(chunk_id, inputs)| MapAssignment { chunk_id, inputs })
        .collect()
}

/// Runs the job's map function over every input of an assignment, in order
pub struct MapWork<P> {
    job: Arc<P>,
}

impl<P> MapWork<P> {
    pub fn new(job: Arc<P>) -> Self {
        Self { job }
    }
}

impl<P> StageWork for MapWork<P>
where
    P: MapReduceJob,
{
    type Assignment = MapAssignment<P::Input>;
    type Output = Vec<(P::Key, P::Value)>;

    const PHASE: Phase = Phase::Map;

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
        assignment
            .inputs
            .iter()
            .map(|input| {
                if shutdown_signal.is_cancelled() {
                    return Err(StageError::Cancelled { phase: Phase::Map });
                }
                self.job.map(input).map_err(|source| StageError::ItemFailed {
                    phase: Phase::Map,
                    worker_id,
                    assignment: index,
                    item: format!("{:?}", input),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::shutdown_signal::TokenShutdownSignal;

    struct Tally;

    impl MapReduceJob for Tally {
        type Input = String;
        type Key = String;
        type Value = u64;
        type Output = u64;

        fn map(&self, input: &String) -> Result<(String, u64), JobError> {
            Ok((input.clone(), 1))
        }

        fn reduce(&self, _key: &String, values: Vec<u64>) -> Result<u64, JobError> {
            Ok(values.iter().sum())
        }
    }

    #[test]
    fn test_map_work_stops_once_cancelled() {
        let signal = TokenShutdownSignal::default();
        let work = MapWork::new(Arc::new(Tally));
        let assignment = MapAssignment {
            chunk_id: 0,
            inputs: vec!["a".to_string(), "b".to_string()],
        };

        let mapped = work.execute(0, 0, assignment.clone(), &signal).unwrap();
        assert_eq!(mapped, vec![("a".to_string(), 1), ("b".to_string(), 1)]);

        signal.cancel();
        assert_eq!(
            work.execute(0, 0, assignment, &signal),
            Err(StageError::Cancelled { phase: Phase::Map })
        );
    }

    #[test]
    fn test_create_map_assignments_keeps_order() {
        let assignments = create_map_assignments(vec!["a", "b", "c", "d", "e"], 2);
        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].inputs, vec!["a", "b"]);
        assert_eq!(assignments[1].chunk_id, 1);
        assert_eq!(assignments[2].inputs, vec!["e"]);
    }

    #[test]
    fn test_create_map_assignments_empty() {
        assert!(create_map_assignments(Vec::<String>::new(), 10).is_empty());
    }
}
