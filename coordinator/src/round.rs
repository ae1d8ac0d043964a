use std::sync::Arc;

use log::info;

use compute::{Broadcast, ComputeEngine, Partition};
use train_core::{FitOutcome, GradientOutcome, LocalTrainer, Updater};

use crate::{
    aggregation::{aggregate_updaters, BestScoreTracker, VectorSum},
    config::TrainingConfig,
    error::{Result, TrainingError},
};

/// How partial results of a round are combined into the next global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionStrategy {
    /// Element-wise mean of independently re-trained parameter vectors.
    Averaging,
    /// Element-wise sum of partition gradients added onto the previous
    /// parameters, optionally normalized by the partition count.
    Accumulation { divide: bool },
}

impl ReductionStrategy {
    pub fn from_config(config: &TrainingConfig) -> Self {
        if config.accumulate_gradient {
            ReductionStrategy::Accumulation {
                divide: config.divide_accumulated_gradient,
            }
        } else {
            ReductionStrategy::Averaging
        }
    }
}

/// The read-only global state every partition of a round observes.
#[derive(Debug)]
pub(crate) struct Snapshot<U> {
    pub params: Vec<f32>,
    pub updater: U,
}

/// The reduced result of one round.
#[derive(Debug)]
pub(crate) struct RoundOutcome<U> {
    pub params: Vec<f32>,
    pub updater: U,
    /// Averaged round score; absent in accumulation mode, which does not
    /// collect scores.
    pub score: Option<f64>,
}

/// Runs one synchronization round: every partition trains against the
/// snapshot, all partitions complete (full barrier), then the partial results
/// are reduced according to `strategy`.
pub(crate) fn execute<T, X>(
    trainer: &T,
    engine: &X,
    strategy: ReductionStrategy,
    snapshot: Broadcast<Snapshot<T::Updater>>,
    partitions: &[Partition<T::Example>],
    tracker: &Arc<BestScoreTracker>,
) -> Result<RoundOutcome<T::Updater>>
where
    T: LocalTrainer,
    X: ComputeEngine,
{
    match strategy {
        ReductionStrategy::Averaging => {
            let shared = snapshot.clone();
            let tracker = Arc::clone(tracker);

            let results = engine.run(partitions, move |partition| {
                let state = shared.value();
                let fit =
                    trainer.fit_partition(&state.params, &state.updater, &partition.examples)?;
                tracker.record(fit.score);
                Ok(fit)
            })?;

            info!(partitions = results.len(); "averaging partition results");
            reduce_average(snapshot.value().params.len(), results)
        }

        ReductionStrategy::Accumulation { divide } => {
            let shared = snapshot.clone();

            let results = engine.run(partitions, move |partition| {
                let state = shared.value();
                trainer.gradient_partition(&state.params, &state.updater, &partition.examples)
            })?;

            info!(partitions = results.len(); "summing partition gradients");
            reduce_accumulate(&snapshot.value().params, results, divide)
        }
    }
}

/// Parameter averaging: the new parameter vector is the arithmetic mean of
/// the partitions' re-trained vectors, the combined optimizer state is folded
/// from a neutral start, and the round score is the mean partition score.
fn reduce_average<U: Updater>(
    expected_len: usize,
    results: Vec<FitOutcome<U>>,
) -> Result<RoundOutcome<U>> {
    let count = results.len();
    let mut sum = VectorSum::new("params", expected_len);
    let mut score_sum = 0.0;

    for result in &results {
        sum.add(&result.params)?;
        score_sum += result.score;
    }

    let updater = aggregate_updaters(None, results.iter().map(|r| &r.updater))
        .ok_or(TrainingError::EmptyPartitionSet)?;

    Ok(RoundOutcome {
        params: sum.into_mean(),
        updater,
        score: Some(score_sum / count as f64),
    })
}

/// Gradient accumulation: the summed (optionally normalized) gradients are
/// added to the previous parameters, and the optimizer-state fold is seeded
/// from the first partition's own aggregator.
fn reduce_accumulate<U: Updater>(
    previous: &[f32],
    results: Vec<GradientOutcome<U>>,
    divide: bool,
) -> Result<RoundOutcome<U>> {
    let count = results.len();
    let mut sum = VectorSum::new("gradient", previous.len());

    for result in &results {
        sum.add(&result.gradient)?;
    }

    let mut accumulated = sum.into_sum();
    if divide {
        let n = count as f32;
        for g in &mut accumulated {
            *g /= n;
        }
    }

    let params = previous
        .iter()
        .zip(&accumulated)
        .map(|(p, g)| p + g)
        .collect();

    let first = results.first().ok_or(TrainingError::EmptyPartitionSet)?;
    let seed = first.updater.aggregator(false);
    let updater = aggregate_updaters(Some(seed), results.iter().map(|r| &r.updater))
        .ok_or(TrainingError::EmptyPartitionSet)?;

    Ok(RoundOutcome {
        params,
        updater,
        score: None,
    })
}
