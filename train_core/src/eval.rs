use serde::Serialize;

use crate::TrainError;

/// Summary of model quality over a set of examples.
///
/// Built per partition and reduced into one summary through [`Evaluation::merge`],
/// which is commutative and associative: partition summaries may arrive in
/// any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Evaluation {
    examples: usize,
    correct: usize,
    score_sum: f64,
}

impl Evaluation {
    /// Records one evaluated example.
    ///
    /// # Args
    /// * `correct` - Whether the model's output was acceptable for this example.
    /// * `score` - The example's score (lower is better).
    pub fn record(&mut self, correct: bool, score: f64) {
        self.examples += 1;
        if correct {
            self.correct += 1;
        }
        self.score_sum += score;
    }

    /// Merges another summary into this one.
    pub fn merge(&mut self, other: &Evaluation) {
        self.examples += other.examples;
        self.correct += other.correct;
        self.score_sum += other.score_sum;
    }

    /// Returns the number of evaluated examples.
    pub fn examples(&self) -> usize {
        self.examples
    }

    /// Returns the number of examples judged correct.
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Returns the fraction of correct examples, or 0.0 when empty.
    pub fn accuracy(&self) -> f64 {
        if self.examples == 0 {
            0.0
        } else {
            self.correct as f64 / self.examples as f64
        }
    }

    /// Returns the mean per-example score, or 0.0 when empty.
    pub fn mean_score(&self) -> f64 {
        if self.examples == 0 {
            0.0
        } else {
            self.score_sum / self.examples as f64
        }
    }
}

/// Capability that scores a model over one partition's examples.
pub trait Evaluator: Sync {
    /// One evaluation example.
    type Example;

    /// Evaluates the model described by `params` over the partition.
    ///
    /// # Errors
    /// Returns `TrainError` if the examples or parameters are invalid.
    fn evaluate_partition(
        &self,
        params: &[f32],
        examples: &[Self::Example],
    ) -> Result<Evaluation, TrainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_accumulates_counts() {
        let mut a = Evaluation::default();
        a.record(true, 0.5);
        a.record(false, 1.5);

        let mut b = Evaluation::default();
        b.record(true, 1.0);

        let mut merged = a;
        merged.merge(&b);
        assert_eq!(merged.examples(), 3);
        assert_eq!(merged.correct(), 2);
        assert!((merged.mean_score() - 1.0).abs() < 1e-12);

        // Commutativity.
        let mut other_way = b;
        other_way.merge(&a);
        assert_eq!(merged, other_way);
    }

    #[test]
    fn empty_summary_has_zero_rates() {
        let e = Evaluation::default();
        assert_eq!(e.accuracy(), 0.0);
        assert_eq!(e.mean_score(), 0.0);
    }
}
