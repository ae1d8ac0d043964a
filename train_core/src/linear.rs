use crate::{
    Evaluation, Evaluator, FitOutcome, GradientOutcome, LocalTrainer, MomentumUpdater, TrainError,
};

/// One labeled training example: a feature vector and a scalar target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f32>,
    pub target: f32,
}

impl Sample {
    pub fn new(features: Vec<f32>, target: f32) -> Self {
        Self { features, target }
    }
}

/// Reference local trainer: linear least squares via full-batch momentum SGD.
///
/// The model is `y = w . x` with `dims` weights. Each `fit_partition` call
/// runs the configured number of gradient steps over the partition's examples
/// and reports the mean squared error as the score.
#[derive(Debug, Clone)]
pub struct LinearTrainer {
    dims: usize,
    learning_rate: f32,
    momentum: f32,
    iterations: usize,
}

impl LinearTrainer {
    /// Creates a new `LinearTrainer`.
    ///
    /// # Args
    /// * `dims` - Number of model weights; every parameter vector and feature
    ///   vector must have this length.
    /// * `learning_rate` - Step size for local gradient steps.
    /// * `momentum` - Momentum coefficient for the updater.
    /// * `iterations` - Number of local gradient steps per round.
    pub fn new(dims: usize, learning_rate: f32, momentum: f32, iterations: usize) -> Self {
        Self {
            dims,
            learning_rate,
            momentum,
            iterations,
        }
    }

    fn check_params(&self, params: &[f32]) -> Result<(), TrainError> {
        if params.len() != self.dims {
            return Err(TrainError::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: self.dims,
            });
        }
        Ok(())
    }

    /// Mean gradient of the squared error over `examples`.
    fn gradient(&self, params: &[f32], examples: &[Sample]) -> Result<Vec<f32>, TrainError> {
        let mut grad = vec![0.0; self.dims];
        if examples.is_empty() {
            return Ok(grad);
        }

        for sample in examples {
            if sample.features.len() != self.dims {
                return Err(TrainError::ShapeMismatch {
                    what: "features",
                    got: sample.features.len(),
                    expected: self.dims,
                });
            }

            let err = dot(params, &sample.features) - sample.target;
            for (g, x) in grad.iter_mut().zip(&sample.features) {
                *g += err * x;
            }
        }

        let n = examples.len() as f32;
        for g in &mut grad {
            *g /= n;
        }
        Ok(grad)
    }

    /// Summed squared error over `examples`.
    fn squared_error_sum(&self, params: &[f32], examples: &[Sample]) -> Result<f64, TrainError> {
        let mut sum = 0.0;
        for sample in examples {
            if sample.features.len() != self.dims {
                return Err(TrainError::ShapeMismatch {
                    what: "features",
                    got: sample.features.len(),
                    expected: self.dims,
                });
            }
            let err = (dot(params, &sample.features) - sample.target) as f64;
            sum += err * err;
        }
        Ok(sum)
    }

    fn train_locally(
        &self,
        params: &[f32],
        updater: &MomentumUpdater,
        examples: &[Sample],
    ) -> Result<(Vec<f32>, MomentumUpdater), TrainError> {
        self.check_params(params)?;

        let mut weights = params.to_vec();
        let mut updater = updater.clone();

        for _ in 0..self.iterations {
            let grad = self.gradient(&weights, examples)?;
            updater.apply(&grad, &mut weights, self.learning_rate)?;
        }

        Ok((weights, updater))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl LocalTrainer for LinearTrainer {
    type Example = Sample;
    type Updater = MomentumUpdater;

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    fn default_updater(&self) -> MomentumUpdater {
        MomentumUpdater::zeros(self.dims, self.momentum)
    }

    fn fit_partition(
        &self,
        params: &[f32],
        updater: &MomentumUpdater,
        examples: &[Sample],
    ) -> Result<FitOutcome<MomentumUpdater>, TrainError> {
        let (weights, updater) = self.train_locally(params, updater, examples)?;

        let score = if examples.is_empty() {
            0.0
        } else {
            self.squared_error_sum(&weights, examples)? / examples.len() as f64
        };

        Ok(FitOutcome {
            params: weights,
            updater,
            score,
        })
    }

    fn gradient_partition(
        &self,
        params: &[f32],
        updater: &MomentumUpdater,
        examples: &[Sample],
    ) -> Result<GradientOutcome<MomentumUpdater>, TrainError> {
        let (weights, updater) = self.train_locally(params, updater, examples)?;

        let gradient = weights
            .iter()
            .zip(params)
            .map(|(w, p)| w - p)
            .collect();

        Ok(GradientOutcome { gradient, updater })
    }

    fn predict(&self, params: &[f32], input: &[f32]) -> Result<Vec<f32>, TrainError> {
        self.check_params(params)?;
        if input.len() != self.dims {
            return Err(TrainError::ShapeMismatch {
                what: "features",
                got: input.len(),
                expected: self.dims,
            });
        }
        Ok(vec![dot(params, input)])
    }

    fn score_partition(&self, params: &[f32], examples: &[Sample]) -> Result<f64, TrainError> {
        self.check_params(params)?;
        self.squared_error_sum(params, examples)
    }
}

impl Evaluator for LinearTrainer {
    type Example = Sample;

    /// Counts an example as correct when the prediction lands within 0.5 of
    /// the target; the per-example score is the squared error.
    fn evaluate_partition(
        &self,
        params: &[f32],
        examples: &[Sample],
    ) -> Result<Evaluation, TrainError> {
        self.check_params(params)?;

        let mut eval = Evaluation::default();
        for sample in examples {
            let output = self.predict(params, &sample.features)?;
            let err = (output[0] - sample.target) as f64;
            eval.record(err.abs() <= 0.5, err * err);
        }
        Ok(eval)
    }
}
