//! Carves one large dataset into a sequence of bounded training rounds.

use log::{info, warn};
use rand::Rng;

use compute::random_split;
use std::num::NonZeroUsize;

/// A logical subset of the full dataset assigned to one round.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<E> {
    /// Position of this split within the scheduling pass.
    pub index: usize,
    /// The split's examples; the size is approximate, not exact.
    pub examples: Vec<E>,
}

/// Number of rounds needed to cover `total` examples in rounds of at most
/// roughly `examples_per_round`.
///
/// A bound of zero or one at least as large as `total` normalizes to a
/// single round.
fn split_count(examples_per_round: usize, total: usize) -> usize {
    if examples_per_round == 0 {
        warn!("non-positive examples_per_round, scheduling a single round");
        return 1;
    }
    if examples_per_round >= total {
        return 1;
    }
    if total % examples_per_round == 0 {
        total / examples_per_round
    } else {
        total / examples_per_round + 1
    }
}

/// Produces the ordered sequence of splits for one full pass over `dataset`.
///
/// The multi-round case assigns each example to a round at random with equal
/// weights, so round sizes are approximate while coverage is exact: across
/// all returned splits every example appears exactly once. Splits that come
/// out empty are dropped.
///
/// # Args
/// * `dataset` - The examples of the full pass.
/// * `examples_per_round` - Best-effort upper bound on examples per round.
/// * `total_examples` - Total example count used for round-count math.
/// * `rng` - Source of randomness for the assignment.
pub fn plan<E, R>(
    dataset: &[E],
    examples_per_round: usize,
    total_examples: usize,
    rng: &mut R,
) -> Vec<Split<E>>
where
    E: Clone,
    R: Rng,
{
    let rounds = split_count(examples_per_round, total_examples);

    if rounds <= 1 {
        return vec![Split {
            index: 0,
            examples: dataset.to_vec(),
        }];
    }

    info!(rounds = rounds, bound = examples_per_round; "scheduling bounded training rounds");

    let subsets = random_split(
        dataset.to_vec(),
        NonZeroUsize::new(rounds).unwrap_or(NonZeroUsize::MIN),
        rng,
    );

    subsets
        .into_iter()
        .filter(|subset| !subset.is_empty())
        .enumerate()
        .map(|(index, examples)| Split { index, examples })
        .collect()
}
