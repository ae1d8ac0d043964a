mod broadcast;
mod engine;
mod error;
mod partition;

pub use broadcast::Broadcast;
pub use engine::{ComputeEngine, SerialEngine, ThreadedEngine};
pub use error::EngineError;
pub use partition::{random_split, repartition, Partition};
