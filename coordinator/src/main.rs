use std::num::NonZeroUsize;

use rand::{rngs::StdRng, Rng, SeedableRng};

use compute::ThreadedEngine;
use coordinator::{Driver, TrainingConfig};
use train_core::{LinearTrainer, Sample};

fn main() {
    env_logger::init();

    // Synthetic regression task: y = 2*x0 - x1.
    let mut rng = StdRng::seed_from_u64(17);
    let dataset: Vec<Sample> = (0..512)
        .map(|_| {
            let x0: f32 = rng.random_range(-1.0..1.0);
            let x1: f32 = rng.random_range(-1.0..1.0);
            Sample::new(vec![x0, x1], 2.0 * x0 - x1)
        })
        .collect();

    let config = TrainingConfig {
        partitions: NonZeroUsize::new(4).unwrap(),
        ..TrainingConfig::default()
    };

    let trainer = LinearTrainer::new(2, 0.3, 0.9, 20);
    let mut driver = Driver::new(trainer, ThreadedEngine, config, vec![0.0, 0.0]).unwrap();

    driver
        .fit_bounded(&dataset, 128, dataset.len(), NonZeroUsize::new(4).unwrap())
        .unwrap();

    let eval = driver.evaluate(driver.trainer(), &dataset).unwrap();

    println!("trained params: {:?}", driver.params());
    println!("rounds: {}", driver.rounds());
    println!("last score: {:.6}", driver.last_score());
    println!("best score: {:?}", driver.best_score());
    println!(
        "evaluation: {}/{} correct, mean score {:.6}",
        eval.correct(),
        eval.examples(),
        eval.mean_score()
    );
}
