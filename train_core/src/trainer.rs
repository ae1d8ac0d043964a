use crate::{TrainError, Updater};

/// Result of locally training one partition in parameter-averaging mode.
#[derive(Debug, Clone)]
pub struct FitOutcome<U> {
    /// Parameters after local optimization, same length as the broadcast.
    pub params: Vec<f32>,
    /// Optimizer state after local optimization.
    pub updater: U,
    /// Score of the partition's model after local optimization.
    pub score: f64,
}

/// Result of locally training one partition in gradient-accumulation mode.
#[derive(Debug, Clone)]
pub struct GradientOutcome<U> {
    /// Accumulated parameter delta produced by local optimization, same
    /// length as the broadcast parameters. Adding it to the broadcast
    /// parameters reproduces the partition's locally trained model.
    pub gradient: Vec<f32>,
    /// Optimizer state after local optimization.
    pub updater: U,
}

/// Abstraction over the local training computation executed per partition.
///
/// Implementations encapsulate all model-, data-, and loss-specific logic.
/// The coordinator treats this trait as a black box that maps an immutable
/// parameter snapshot plus local examples into either a re-trained parameter
/// vector or an accumulated gradient.
///
/// This is the training policy boundary: the composition of models, losses,
/// batching and optimizers lives entirely behind implementations of this
/// trait; the coordination layer only schedules, broadcasts and reduces.
pub trait LocalTrainer: Sync {
    /// One training example.
    type Example: Clone + Send + Sync;

    /// Optimizer state carried alongside the parameters.
    type Updater: Updater;

    /// Returns the configured number of local passes per round.
    fn iterations(&self) -> usize;

    /// Overrides the number of local passes per round.
    ///
    /// The coordinator uses this to force single-pass rounds when
    /// synchronizing after every iteration; it restores the original value
    /// afterwards.
    fn set_iterations(&mut self, iterations: usize);

    /// Creates a fresh default optimizer state.
    ///
    /// Called when a round starts and no state has been established yet.
    fn default_updater(&self) -> Self::Updater;

    /// Trains locally and returns the re-trained parameters.
    ///
    /// # Args
    /// * `params` - Read-only broadcast parameter snapshot.
    /// * `updater` - Read-only broadcast optimizer-state snapshot.
    /// * `examples` - The partition's local examples.
    ///
    /// # Errors
    /// Implementations should return `TrainError::ShapeMismatch` when lengths
    /// disagree and `TrainError::InvalidInput` for invalid domain inputs;
    /// they should not panic.
    fn fit_partition(
        &self,
        params: &[f32],
        updater: &Self::Updater,
        examples: &[Self::Example],
    ) -> Result<FitOutcome<Self::Updater>, TrainError>;

    /// Trains locally and returns the accumulated parameter delta.
    ///
    /// # Errors
    /// Same contract as [`LocalTrainer::fit_partition`].
    fn gradient_partition(
        &self,
        params: &[f32],
        updater: &Self::Updater,
        examples: &[Self::Example],
    ) -> Result<GradientOutcome<Self::Updater>, TrainError>;

    /// Computes the model output for one input feature vector.
    ///
    /// Pure function of `params` and `input`: repeated calls with the same
    /// arguments must return identical output.
    ///
    /// # Errors
    /// Returns `TrainError::ShapeMismatch` if `input` has the wrong length.
    fn predict(&self, params: &[f32], input: &[f32]) -> Result<Vec<f32>, TrainError>;

    /// Returns the summed score of the model over the partition's examples.
    ///
    /// # Errors
    /// Returns `TrainError` if the examples or parameters are invalid.
    fn score_partition(
        &self,
        params: &[f32],
        examples: &[Self::Example],
    ) -> Result<f64, TrainError>;
}
