use train_core::TrainError;

/// Running element-wise sum over equal-length vectors.
///
/// Tracks how many vectors were added so the caller can finalize as a sum or
/// a mean. Two sums over disjoint vector sets can be merged, so a reduction
/// may be shaped as a tree instead of a strict left fold.
#[derive(Debug, Clone)]
pub struct VectorSum {
    what: &'static str,
    sum: Vec<f32>,
    count: usize,
}

impl VectorSum {
    /// Creates an empty sum.
    ///
    /// # Args
    /// * `what` - Context used in shape-mismatch errors (e.g. "params").
    /// * `len` - The invariant vector length.
    pub fn new(what: &'static str, len: usize) -> Self {
        Self {
            what,
            sum: vec![0.0; len],
            count: 0,
        }
    }

    /// Adds one vector element-wise.
    ///
    /// # Errors
    /// Returns `TrainError::ShapeMismatch` if `vector` has the wrong length;
    /// the sum is left untouched in that case.
    pub fn add(&mut self, vector: &[f32]) -> Result<(), TrainError> {
        if vector.len() != self.sum.len() {
            return Err(TrainError::ShapeMismatch {
                what: self.what,
                got: vector.len(),
                expected: self.sum.len(),
            });
        }

        for (s, v) in self.sum.iter_mut().zip(vector) {
            *s += v;
        }
        self.count += 1;
        Ok(())
    }

    /// Merges another sum into this one.
    ///
    /// # Errors
    /// Returns `TrainError::ShapeMismatch` if the two sums disagree on length.
    pub fn merge(&mut self, other: VectorSum) -> Result<(), TrainError> {
        if other.sum.len() != self.sum.len() {
            return Err(TrainError::ShapeMismatch {
                what: self.what,
                got: other.sum.len(),
                expected: self.sum.len(),
            });
        }

        for (s, o) in self.sum.iter_mut().zip(&other.sum) {
            *s += o;
        }
        self.count += other.count;
        Ok(())
    }

    /// Returns how many vectors have been added.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Finalizes as the element-wise sum.
    pub fn into_sum(self) -> Vec<f32> {
        self.sum
    }

    /// Finalizes as the element-wise arithmetic mean.
    ///
    /// An empty sum finalizes to all zeros.
    pub fn into_mean(self) -> Vec<f32> {
        let VectorSum { mut sum, count, .. } = self;
        if count > 0 {
            let n = count as f32;
            for s in &mut sum {
                *s /= n;
            }
        }
        sum
    }
}
