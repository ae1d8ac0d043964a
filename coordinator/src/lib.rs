pub mod aggregation;
mod config;
mod driver;
mod error;
mod round;
pub mod schedule;

pub use config::TrainingConfig;
pub use driver::Driver;
pub use error::TrainingError;
pub use round::ReductionStrategy;
pub use schedule::Split;
