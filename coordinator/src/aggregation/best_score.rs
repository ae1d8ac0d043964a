use std::sync::atomic::{AtomicU64, Ordering};

/// Running minimum score across all rounds and all partitions of a session.
///
/// The only resource written concurrently by partitions, so it is a lock-free
/// monotone merge: `record` keeps the minimum via compare-and-swap on the
/// score's bit pattern, making the final value independent of update order.
/// NaN recordings are ignored.
#[derive(Debug)]
pub struct BestScoreTracker {
    bits: AtomicU64,
}

impl BestScoreTracker {
    /// Creates a tracker with no recorded score.
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(f64::INFINITY.to_bits()),
        }
    }

    /// Records a score, keeping it only if it improves on the current best.
    pub fn record(&self, score: f64) {
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let current = f64::from_bits(current);
                (score < current).then(|| score.to_bits())
            });
    }

    /// Returns the best score seen so far, if any.
    pub fn best(&self) -> Option<f64> {
        let value = f64::from_bits(self.bits.load(Ordering::Acquire));
        (value != f64::INFINITY).then_some(value)
    }
}

impl Default for BestScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}
