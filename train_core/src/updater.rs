use crate::TrainError;

/// Per-parameter optimizer bookkeeping carried between synchronization rounds.
///
/// An `Updater` travels with the model parameters: each partition trains
/// against its own copy and the coordinator merges the diverged copies back
/// into one through the updater's aggregator. The numeric combination rule
/// (average momentum terms, sum them, ...) belongs to the implementation.
pub trait Updater: Clone + Send + Sync {
    /// Aggregator capable of merging many states of this type.
    type Aggregator: UpdaterAggregator<Self>;

    /// Creates an aggregator for this updater type.
    ///
    /// # Args
    /// * `include_self` - Whether this state's own contribution is folded in
    ///   as part of construction. Pass `false` to obtain a neutral aggregator
    ///   that merely carries this state's shape and hyperparameters.
    ///
    /// # Returns
    /// A fresh aggregator.
    fn aggregator(&self, include_self: bool) -> Self::Aggregator;
}

/// Two-phase fold over per-partition optimizer states.
///
/// `fold` combines one partition's state into a running aggregate and `merge`
/// combines two aggregates, so partial aggregates built over subsets of
/// partitions can be reduced in any binary-tree topology. Implementations
/// must be associative and commutative: the finished state may not depend on
/// fold order or tree shape (within floating-point tolerance).
pub trait UpdaterAggregator<U>: Send {
    /// Folds one partition's state into the running aggregate.
    fn fold(&mut self, updater: &U);

    /// Merges another aggregate into this one.
    fn merge(&mut self, other: Self);

    /// Finishes the fold and produces the combined state.
    fn finish(self) -> U;
}

/// Momentum SGD state: one velocity term per parameter.
///
/// The combination rule is the arithmetic mean of velocities across
/// partitions, so a re-synchronized model resumes with the average of the
/// diverged momentum histories.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumUpdater {
    velocity: Vec<f32>,
    momentum: f32,
}

impl MomentumUpdater {
    /// Creates a zero-velocity updater.
    ///
    /// # Args
    /// * `len` - Number of parameters this state tracks.
    /// * `momentum` - Momentum coefficient.
    ///
    /// # Returns
    /// A new `MomentumUpdater` instance.
    pub fn zeros(len: usize, momentum: f32) -> Self {
        Self {
            velocity: vec![0.0; len],
            momentum,
        }
    }

    /// Returns the velocity terms.
    pub fn velocity(&self) -> &[f32] {
        &self.velocity
    }

    /// Performs one momentum SGD step in place.
    ///
    /// # Args
    /// * `grad` - The gradient for the current step.
    /// * `params` - The parameters to update.
    /// * `learning_rate` - Step size.
    ///
    /// # Errors
    /// Returns `TrainError::ShapeMismatch` if `grad` or `params` disagree
    /// with the tracked velocity length.
    pub fn apply(
        &mut self,
        grad: &[f32],
        params: &mut [f32],
        learning_rate: f32,
    ) -> Result<(), TrainError> {
        if grad.len() != self.velocity.len() {
            return Err(TrainError::ShapeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: self.velocity.len(),
            });
        }
        if params.len() != self.velocity.len() {
            return Err(TrainError::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: self.velocity.len(),
            });
        }

        let mu = self.momentum;

        params
            .iter_mut()
            .zip(grad)
            .zip(self.velocity.iter_mut())
            .for_each(|((p, g), v)| {
                *v = mu * *v + g;
                *p -= learning_rate * *v;
            });

        Ok(())
    }
}

impl Updater for MomentumUpdater {
    type Aggregator = MomentumAggregator;

    fn aggregator(&self, include_self: bool) -> MomentumAggregator {
        let mut agg = MomentumAggregator {
            sum: vec![0.0; self.velocity.len()],
            count: 0,
            momentum: self.momentum,
        };
        if include_self {
            agg.fold(self);
        }
        agg
    }
}

/// Running aggregate over `MomentumUpdater` states: velocity sum plus count.
#[derive(Debug, Clone)]
pub struct MomentumAggregator {
    sum: Vec<f32>,
    count: usize,
    momentum: f32,
}

impl UpdaterAggregator<MomentumUpdater> for MomentumAggregator {
    /// # Panics
    /// In debug builds, if the folded state's velocity length disagrees with
    /// the aggregate's.
    fn fold(&mut self, updater: &MomentumUpdater) {
        debug_assert_eq!(self.sum.len(), updater.velocity.len());
        for (s, v) in self.sum.iter_mut().zip(&updater.velocity) {
            *s += v;
        }
        self.count += 1;
    }

    fn merge(&mut self, other: Self) {
        debug_assert_eq!(self.sum.len(), other.sum.len());
        for (s, o) in self.sum.iter_mut().zip(&other.sum) {
            *s += o;
        }
        self.count += other.count;
    }

    fn finish(self) -> MomentumUpdater {
        let MomentumAggregator {
            mut sum,
            count,
            momentum,
        } = self;

        if count > 0 {
            let n = count as f32;
            for s in &mut sum {
                *s /= n;
            }
        }

        MomentumUpdater {
            velocity: sum,
            momentum,
        }
    }
}
