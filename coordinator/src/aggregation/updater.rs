use train_core::{Updater, UpdaterAggregator};

/// Folds per-partition optimizer states into one combined state.
///
/// With `seed = None` the first folded state creates the aggregator and
/// contributes itself, so every partition weighs equally; a caller may
/// instead pass an explicitly seeded aggregator as the fold's starting point.
/// Returns `None` only when there is neither a seed nor any state.
pub fn aggregate_updaters<'a, U, I>(seed: Option<U::Aggregator>, states: I) -> Option<U>
where
    U: Updater + 'a,
    I: IntoIterator<Item = &'a U>,
{
    let mut aggregate = seed;

    for state in states {
        match &mut aggregate {
            Some(agg) => agg.fold(state),
            None => aggregate = Some(state.aggregator(true)),
        }
    }

    aggregate.map(UpdaterAggregator::finish)
}
