use rayon::prelude::*;

use crate::{EngineError, Partition};

/// Capability that runs a fallible task once per partition.
///
/// Implementations must guarantee barrier semantics: `run` returns only after
/// every partition's task has completed, with exactly one result per
/// partition, in partition order. Partitions may execute in any order and in
/// parallel; no partition observes another's in-flight result. The first task
/// failure aborts the whole run.
pub trait ComputeEngine: Sync {
    /// Runs `task` once per partition and collects the results.
    ///
    /// # Args
    /// * `partitions` - The partitions of one round.
    /// * `task` - The per-partition computation.
    ///
    /// # Returns
    /// One result per partition, in partition order.
    ///
    /// # Errors
    /// Returns `EngineError::EmptyPartitionSet` when `partitions` is empty
    /// and `EngineError::Task` when any task fails.
    fn run<E, R, Err, F>(
        &self,
        partitions: &[Partition<E>],
        task: F,
    ) -> Result<Vec<R>, EngineError<Err>>
    where
        E: Sync,
        R: Send,
        Err: Send,
        F: Fn(&Partition<E>) -> Result<R, Err> + Send + Sync;
}

/// Runs partitions in parallel on the rayon thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadedEngine;

impl ComputeEngine for ThreadedEngine {
    fn run<E, R, Err, F>(
        &self,
        partitions: &[Partition<E>],
        task: F,
    ) -> Result<Vec<R>, EngineError<Err>>
    where
        E: Sync,
        R: Send,
        Err: Send,
        F: Fn(&Partition<E>) -> Result<R, Err> + Send + Sync,
    {
        if partitions.is_empty() {
            return Err(EngineError::EmptyPartitionSet);
        }

        partitions
            .par_iter()
            .map(|partition| {
                task(partition).map_err(|source| EngineError::Task {
                    partition: partition.index,
                    source,
                })
            })
            .collect()
    }
}

/// Runs partitions one after the other on the calling thread.
///
/// Useful for deterministic debugging and as a baseline to compare the
/// threaded engine against; results are identical by contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialEngine;

impl ComputeEngine for SerialEngine {
    fn run<E, R, Err, F>(
        &self,
        partitions: &[Partition<E>],
        task: F,
    ) -> Result<Vec<R>, EngineError<Err>>
    where
        E: Sync,
        R: Send,
        Err: Send,
        F: Fn(&Partition<E>) -> Result<R, Err> + Send + Sync,
    {
        if partitions.is_empty() {
            return Err(EngineError::EmptyPartitionSet);
        }

        let mut out = Vec::with_capacity(partitions.len());
        for partition in partitions {
            out.push(task(partition).map_err(|source| EngineError::Task {
                partition: partition.index,
                source,
            })?);
        }
        Ok(out)
    }
}
