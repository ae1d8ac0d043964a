use std::num::NonZeroUsize;

use rand::Rng;

/// An independent unit of data processed by one local-trainer invocation.
///
/// Partitions of one round never communicate with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<E> {
    /// Position of this partition within its round.
    pub index: usize,
    /// The partition's local examples.
    pub examples: Vec<E>,
}

impl<E> Partition<E> {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// Distributes examples over a fixed number of partitions.
///
/// Partition sizes differ by at most one example; when there are fewer
/// examples than partitions, the trailing partitions are empty so the
/// partition count stays exactly `partitions`.
///
/// # Args
/// * `examples` - The examples to distribute.
/// * `partitions` - How many partitions to produce.
///
/// # Returns
/// Exactly `partitions` partitions covering every example once.
pub fn repartition<E>(examples: Vec<E>, partitions: NonZeroUsize) -> Vec<Partition<E>> {
    let n = partitions.get();
    let total = examples.len();
    let base = total / n;
    let extra = total % n;

    let mut out = Vec::with_capacity(n);
    let mut iter = examples.into_iter();

    for index in 0..n {
        let size = base + usize::from(index < extra);
        out.push(Partition {
            index,
            examples: iter.by_ref().take(size).collect(),
        });
    }

    out
}

/// Splits examples into `subsets` disjoint random subsets of approximately
/// equal size.
///
/// Each example is independently assigned to one subset with equal
/// probability, so subset sizes are approximate but coverage is exact: no
/// example is duplicated or dropped.
///
/// # Args
/// * `examples` - The examples to split.
/// * `subsets` - How many subsets to produce.
/// * `rng` - Source of randomness for the assignment.
pub fn random_split<E, R: Rng>(
    examples: Vec<E>,
    subsets: NonZeroUsize,
    rng: &mut R,
) -> Vec<Vec<E>> {
    let n = subsets.get();
    let mut out: Vec<Vec<E>> = (0..n).map(|_| Vec::new()).collect();

    for example in examples {
        out[rng.random_range(0..n)].push(example);
    }

    out
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn repartition_balances_sizes() {
        let parts = repartition((0..10).collect::<Vec<_>>(), nz(3));
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].examples, vec![0, 1, 2, 3]);
        assert_eq!(parts[1].examples, vec![4, 5, 6]);
        assert_eq!(parts[2].examples, vec![7, 8, 9]);
    }

    #[test]
    fn repartition_keeps_partition_count_for_small_inputs() {
        let parts = repartition(vec![1, 2], nz(4));
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.iter().map(Partition::len).sum::<usize>(), 2);
        assert!(parts[2].is_empty());
        assert!(parts[3].is_empty());
    }

    #[test]
    fn random_split_covers_everything_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<usize> = (0..1000).collect();

        let subsets = random_split(original.clone(), nz(4), &mut rng);
        assert_eq!(subsets.len(), 4);

        let mut recovered: Vec<usize> = subsets.into_iter().flatten().collect();
        recovered.sort_unstable();
        assert_eq!(recovered, original);
    }

    #[test]
    fn random_split_sizes_are_approximately_equal() {
        let mut rng = StdRng::seed_from_u64(7);
        let subsets = random_split((0..4000).collect::<Vec<usize>>(), nz(4), &mut rng);

        for subset in &subsets {
            // Loose bound: the assignment is probabilistic, not exact.
            assert!(subset.len() > 700 && subset.len() < 1300, "{}", subset.len());
        }
    }
}
