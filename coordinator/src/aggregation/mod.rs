//! Concurrency-safe combiners underlying every reduction.

mod best_score;
mod updater;
mod vector;

pub use best_score::BestScoreTracker;
pub use updater::aggregate_updaters;
pub use vector::VectorSum;
