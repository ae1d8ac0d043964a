use std::num::NonZeroUsize;

use compute::{SerialEngine, ThreadedEngine};
use coordinator::{Driver, TrainingConfig};
use train_core::{
    FitOutcome, GradientOutcome, LinearTrainer, LocalTrainer, MomentumUpdater, Sample, TrainError,
};

/// Deterministic trainer for exercising the coordination loop: re-trained
/// parameters are the broadcast parameters shifted by the partition's example
/// mean, gradients are the example sum, the score is the example mean.
struct ScriptedTrainer {
    dims: usize,
    iterations: usize,
    bad_shape: bool,
}

impl ScriptedTrainer {
    fn new(dims: usize) -> Self {
        Self {
            dims,
            iterations: 1,
            bad_shape: false,
        }
    }

    fn mean(examples: &[f32]) -> f32 {
        if examples.is_empty() {
            0.0
        } else {
            examples.iter().sum::<f32>() / examples.len() as f32
        }
    }
}

impl LocalTrainer for ScriptedTrainer {
    type Example = f32;
    type Updater = MomentumUpdater;

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    fn default_updater(&self) -> MomentumUpdater {
        MomentumUpdater::zeros(self.dims, 0.9)
    }

    fn fit_partition(
        &self,
        params: &[f32],
        updater: &MomentumUpdater,
        examples: &[f32],
    ) -> Result<FitOutcome<MomentumUpdater>, TrainError> {
        let len = if self.bad_shape {
            params.len() + 1
        } else {
            params.len()
        };

        let mean = Self::mean(examples);
        Ok(FitOutcome {
            params: (0..len).map(|i| params.get(i).copied().unwrap_or(0.0) + mean).collect(),
            updater: updater.clone(),
            score: mean as f64,
        })
    }

    fn gradient_partition(
        &self,
        params: &[f32],
        updater: &MomentumUpdater,
        examples: &[f32],
    ) -> Result<GradientOutcome<MomentumUpdater>, TrainError> {
        let sum: f32 = examples.iter().sum();
        Ok(GradientOutcome {
            gradient: vec![sum; params.len()],
            updater: updater.clone(),
        })
    }

    fn predict(&self, params: &[f32], _input: &[f32]) -> Result<Vec<f32>, TrainError> {
        Ok(params.to_vec())
    }

    fn score_partition(&self, _params: &[f32], examples: &[f32]) -> Result<f64, TrainError> {
        Ok(examples.iter().map(|e| *e as f64).sum())
    }
}

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn two_partition_config() -> TrainingConfig {
    TrainingConfig {
        partitions: nz(2),
        ..TrainingConfig::default()
    }
}

#[test]
fn averaging_fit_takes_partition_mean() {
    let mut driver = Driver::new(
        ScriptedTrainer::new(2),
        SerialEngine,
        two_partition_config(),
        vec![0.0, 0.0],
    )
    .unwrap();

    // Partitions: [1, 2] and [3, 4], means 1.5 and 3.5.
    driver.fit(&[1.0, 2.0, 3.0, 4.0]).unwrap();

    assert_eq!(driver.params(), &[2.5, 2.5]);
    assert_eq!(driver.last_score(), 2.5);
    assert_eq!(driver.best_score(), Some(1.5));
    assert_eq!(driver.rounds(), 1);
    assert!(driver.updater().is_some());
}

#[test]
fn accumulation_fit_adds_summed_gradients() {
    let config = TrainingConfig {
        accumulate_gradient: true,
        ..two_partition_config()
    };
    let mut driver = Driver::new(
        ScriptedTrainer::new(2),
        SerialEngine,
        config,
        vec![1.0, 1.0],
    )
    .unwrap();

    // Partition sums: 3 and 7.
    driver.fit(&[1.0, 2.0, 3.0, 4.0]).unwrap();

    assert_eq!(driver.params(), &[11.0, 11.0]);
    // Accumulation mode does not collect scores.
    assert_eq!(driver.last_score(), 0.0);
    assert_eq!(driver.best_score(), None);
}

#[test]
fn accumulation_fit_divides_when_configured() {
    let config = TrainingConfig {
        accumulate_gradient: true,
        divide_accumulated_gradient: true,
        ..two_partition_config()
    };
    let mut driver = Driver::new(
        ScriptedTrainer::new(2),
        SerialEngine,
        config,
        vec![1.0, 1.0],
    )
    .unwrap();

    driver.fit(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(driver.params(), &[6.0, 6.0]);
}

#[test]
fn average_each_iteration_syncs_per_pass_and_restores_count() {
    let mut trainer = ScriptedTrainer::new(2);
    trainer.set_iterations(3);

    let config = TrainingConfig {
        average_each_iteration: true,
        ..two_partition_config()
    };
    let mut driver = Driver::new(trainer, SerialEngine, config, vec![0.0, 0.0]).unwrap();

    driver.fit(&[1.0, 2.0, 3.0, 4.0]).unwrap();

    // One round per configured iteration, each shifting the mean by 2.5.
    assert_eq!(driver.rounds(), 3);
    assert_eq!(driver.params(), &[7.5, 7.5]);
    // The configured iteration count is restored for later calls.
    assert_eq!(driver.trainer().iterations(), 3);
}

#[test]
fn failed_round_keeps_previous_state() {
    let mut trainer = ScriptedTrainer::new(2);
    trainer.bad_shape = true;

    let mut driver = Driver::new(
        trainer,
        SerialEngine,
        two_partition_config(),
        vec![1.0, 2.0],
    )
    .unwrap();

    assert!(driver.fit(&[1.0, 2.0, 3.0, 4.0]).is_err());
    assert_eq!(driver.params(), &[1.0, 2.0]);
    assert_eq!(driver.rounds(), 0);
}

#[test]
fn empty_dataset_is_rejected() {
    let mut driver = Driver::new(
        ScriptedTrainer::new(2),
        SerialEngine,
        two_partition_config(),
        vec![0.0, 0.0],
    )
    .unwrap();

    assert!(driver.fit(&[]).is_err());
    assert!(driver.score(&[], true).is_err());
}

#[test]
fn bounded_fit_runs_scheduled_rounds_with_same_state_schema() {
    let mut driver = Driver::new(
        ScriptedTrainer::new(2),
        SerialEngine,
        two_partition_config(),
        vec![0.0, 0.0],
    )
    .unwrap();

    let dataset: Vec<f32> = (0..100).map(|i| i as f32).collect();
    driver.fit_bounded(&dataset, 30, 100, nz(2)).unwrap();

    assert_eq!(driver.rounds(), 4);
    assert_eq!(driver.params().len(), 2);
    assert!(driver.updater().is_some());
}

#[test]
fn score_sums_and_averages() {
    let driver = Driver::new(
        ScriptedTrainer::new(2),
        SerialEngine,
        two_partition_config(),
        vec![0.0, 0.0],
    )
    .unwrap();

    let dataset = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(driver.score(&dataset, false).unwrap(), 10.0);
    assert_eq!(driver.score(&dataset, true).unwrap(), 2.5);
}

#[test]
fn predict_is_bit_identical_between_calls() {
    let trainer = LinearTrainer::new(2, 0.3, 0.9, 5);
    let mut driver = Driver::new(
        trainer,
        ThreadedEngine,
        two_partition_config(),
        vec![0.0, 0.0],
    )
    .unwrap();

    let dataset: Vec<Sample> = (1..=32)
        .map(|i| {
            let x = i as f32 / 16.0;
            Sample::new(vec![x, -x], 2.0 * x)
        })
        .collect();
    driver.fit(&dataset).unwrap();

    let first = driver.predict(&[0.3, 0.7]).unwrap();
    let second = driver.predict(&[0.3, 0.7]).unwrap();

    let first_bits: Vec<u32> = first.iter().map(|v| v.to_bits()).collect();
    let second_bits: Vec<u32> = second.iter().map(|v| v.to_bits()).collect();
    assert_eq!(first_bits, second_bits);
}

#[test]
fn linear_training_end_to_end() {
    // y = 2x over x in (0, 2].
    let dataset: Vec<Sample> = (1..=64)
        .map(|i| {
            let x = i as f32 / 32.0;
            Sample::new(vec![x], 2.0 * x)
        })
        .collect();

    let trainer = LinearTrainer::new(1, 0.5, 0.0, 100);
    let mut driver = Driver::new(
        trainer,
        ThreadedEngine,
        two_partition_config(),
        vec![0.0],
    )
    .unwrap();

    let before = driver.score(&dataset, true).unwrap();
    driver.fit(&dataset).unwrap();
    let after = driver.score(&dataset, true).unwrap();

    assert!(after < before);
    assert!((driver.params()[0] - 2.0).abs() < 0.2);

    let eval = driver.evaluate(driver.trainer(), &dataset).unwrap();
    assert_eq!(eval.examples(), 64);
    assert!(eval.accuracy() > 0.9);

    let output = driver.predict(&[1.0]).unwrap();
    assert!((output[0] - 2.0).abs() < 0.2);
}
