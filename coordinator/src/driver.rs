use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{info, warn};

use compute::{repartition, Broadcast, ComputeEngine};
use train_core::{Evaluation, Evaluator, LocalTrainer, TrainError};

use crate::{
    aggregation::BestScoreTracker,
    config::TrainingConfig,
    error::Result,
    round::{self, ReductionStrategy, Snapshot},
    schedule,
};

/// Public entry point for synchronous data-parallel training.
///
/// The driver is the single logical owner of the global model state: the
/// parameter vector, the optimizer state, and the round counter. State is
/// replaced wholesale after each successful round and never mutated while a
/// round is in flight; a failed round leaves the state of the last
/// successfully completed round intact.
pub struct Driver<T: LocalTrainer, X> {
    trainer: T,
    engine: X,
    config: TrainingConfig,
    strategy: ReductionStrategy,
    params: Vec<f32>,
    updater: Option<T::Updater>,
    best_score: Arc<BestScoreTracker>,
    last_score: f64,
    rounds: usize,
}

impl<T, X> Driver<T, X>
where
    T: LocalTrainer,
    X: ComputeEngine,
{
    /// Creates a new `Driver`.
    ///
    /// # Args
    /// * `trainer` - The local-trainer capability invoked per partition.
    /// * `engine` - The partitioned-compute capability.
    /// * `config` - Training options; validated before any round can start.
    /// * `initial_params` - The initial global parameter vector; its length
    ///   is invariant for the driver's whole lifetime.
    ///
    /// # Errors
    /// Returns `TrainingError::InvalidConfig` for contradictory options.
    pub fn new(
        trainer: T,
        engine: X,
        config: TrainingConfig,
        initial_params: Vec<f32>,
    ) -> Result<Self> {
        config.validate()?;
        let strategy = ReductionStrategy::from_config(&config);

        Ok(Self {
            trainer,
            engine,
            config,
            strategy,
            params: initial_params,
            updater: None,
            best_score: Arc::new(BestScoreTracker::new()),
            last_score: 0.0,
            rounds: 0,
        })
    }

    /// Runs one full training pass over `dataset`.
    ///
    /// By default this is a single synchronization round running the
    /// trainer's full configured iteration count. With
    /// `average_each_iteration` set, the iteration count is forced to one and
    /// a round is run per configured iteration, synchronizing after every
    /// pass over local data; the configured count is restored afterwards,
    /// also on failure.
    ///
    /// # Returns
    /// The parameters of the new global state.
    ///
    /// # Errors
    /// Any partition failure aborts the whole round and is returned; the
    /// global state keeps its last successfully completed value.
    pub fn fit(&mut self, dataset: &[T::Example]) -> Result<&[f32]> {
        self.fit_pass(dataset, self.config.partitions)?;
        Ok(&self.params)
    }

    /// Trains on `dataset` in a sequence of bounded rounds.
    ///
    /// The dataset is carved into approximately `examples_per_round`-sized
    /// random splits (see [`schedule::plan`]); each split is redistributed
    /// over `partitions` compute partitions and trained as one full pass.
    ///
    /// # Args
    /// * `dataset` - The examples of the full pass.
    /// * `examples_per_round` - Best-effort bound on examples per round; zero
    ///   or anything at least `total_examples` means a single round.
    /// * `total_examples` - Total example count used for round-count math.
    /// * `partitions` - Parallel compute partitions per round.
    ///
    /// # Errors
    /// Same contract as [`Driver::fit`].
    pub fn fit_bounded(
        &mut self,
        dataset: &[T::Example],
        examples_per_round: usize,
        total_examples: usize,
        partitions: NonZeroUsize,
    ) -> Result<&[f32]> {
        let mut rng = rand::rng();
        let splits = schedule::plan(dataset, examples_per_round, total_examples, &mut rng);
        let count = splits.len();

        for split in splits {
            info!(
                "initiating distributed training of split {} of {}",
                split.index + 1,
                count
            );
            self.fit_pass(&split.examples, partitions)?;
        }

        Ok(&self.params)
    }

    fn fit_pass(&mut self, examples: &[T::Example], partitions: NonZeroUsize) -> Result<()> {
        let iterations = self.trainer.iterations();
        info!(
            average_each_iteration = self.config.average_each_iteration,
            iterations = iterations,
            partitions = partitions.get();
            "running distributed training"
        );

        if !self.config.average_each_iteration {
            // Multiple local iterations, one synchronization at the end.
            return self.run_round(examples, partitions);
        }

        // Control the iteration count externally so every single local pass
        // ends in a synchronization point.
        self.trainer.set_iterations(1);

        let mut outcome = Ok(());
        for _ in 0..iterations {
            outcome = self.run_round(examples, partitions);
            if outcome.is_err() {
                break;
            }
        }

        if iterations > 1 {
            self.trainer.set_iterations(iterations);
        }

        outcome
    }

    /// Runs one synchronization round over `examples`.
    fn run_round(&mut self, examples: &[T::Example], partitions: NonZeroUsize) -> Result<()> {
        if examples.is_empty() {
            return Err(TrainError::InvalidInput("no examples to train on").into());
        }

        let updater = match &self.updater {
            Some(updater) => updater.clone(),
            None => {
                warn!("no optimizer state to broadcast, initializing a default one");
                let updater = self.trainer.default_updater();
                self.updater = Some(updater.clone());
                updater
            }
        };

        info!(len = self.params.len(); "broadcasting parameters");
        let snapshot = Broadcast::publish(Snapshot {
            params: self.params.clone(),
            updater,
        });
        let parts = repartition(examples.to_vec(), partitions);

        let outcome = round::execute(
            &self.trainer,
            &self.engine,
            self.strategy,
            snapshot,
            &parts,
            &self.best_score,
        )?;

        self.params = outcome.params;
        self.updater = Some(outcome.updater);
        if let Some(score) = outcome.score {
            self.last_score = score;
        }
        self.rounds += 1;
        Ok(())
    }

    /// Computes the model output for `input` using the current global state.
    ///
    /// Pure function: repeated calls with no intervening `fit` return
    /// bit-identical output.
    ///
    /// # Errors
    /// Returns a shape error if `input` does not fit the model.
    pub fn predict(&self, input: &[f32]) -> Result<Vec<f32>> {
        Ok(self.trainer.predict(&self.params, input)?)
    }

    /// Sums the model's score over `dataset`, partition by partition.
    ///
    /// # Args
    /// * `dataset` - The examples to score.
    /// * `average` - Divide the summed score by the example count.
    ///
    /// # Errors
    /// Returns an error for an empty dataset or a scoring failure.
    pub fn score(&self, dataset: &[T::Example], average: bool) -> Result<f64> {
        if dataset.is_empty() {
            return Err(TrainError::InvalidInput("no examples to score").into());
        }

        let parts = repartition(dataset.to_vec(), self.config.partitions);
        let sums = self
            .engine
            .run(&parts, |p| self.trainer.score_partition(&self.params, &p.examples))?;

        let sum: f64 = sums.into_iter().sum();
        Ok(if average {
            sum / dataset.len() as f64
        } else {
            sum
        })
    }

    /// Evaluates the current model over `dataset`, delegating per-partition
    /// scoring to `evaluator` and reducing via [`Evaluation::merge`].
    ///
    /// # Errors
    /// Returns an error for an empty dataset or an evaluation failure.
    pub fn evaluate<Ev>(&self, evaluator: &Ev, dataset: &[T::Example]) -> Result<Evaluation>
    where
        Ev: Evaluator<Example = T::Example>,
    {
        if dataset.is_empty() {
            return Err(TrainError::InvalidInput("no examples to evaluate").into());
        }

        let parts = repartition(dataset.to_vec(), self.config.partitions);
        let partials = self
            .engine
            .run(&parts, |p| {
                evaluator.evaluate_partition(&self.params, &p.examples)
            })?;

        let mut merged = Evaluation::default();
        for partial in &partials {
            merged.merge(partial);
        }
        Ok(merged)
    }

    /// Returns the last round's averaged score (most recent value only).
    pub fn last_score(&self) -> f64 {
        self.last_score
    }

    /// Returns the best partition score observed across all rounds so far.
    pub fn best_score(&self) -> Option<f64> {
        self.best_score.best()
    }

    /// Returns the current global parameter vector.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Returns the current combined optimizer state, if any round completed
    /// or a default state was initialized.
    pub fn updater(&self) -> Option<&T::Updater> {
        self.updater.as_ref()
    }

    /// Returns how many synchronization rounds have completed successfully.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns the local trainer.
    pub fn trainer(&self) -> &T {
        &self.trainer
    }
}
