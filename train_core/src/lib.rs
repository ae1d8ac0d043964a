mod error;
mod eval;
mod linear;
mod trainer;
mod updater;

pub use error::TrainError;
pub use eval::{Evaluation, Evaluator};
pub use linear::{LinearTrainer, Sample};
pub use trainer::{FitOutcome, GradientOutcome, LocalTrainer};
pub use updater::{MomentumAggregator, MomentumUpdater, Updater, UpdaterAggregator};
