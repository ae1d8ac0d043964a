use std::sync::Arc;

/// Epoch-scoped immutable snapshot shared with every partition of a round.
///
/// Published exactly once per round; every clone observes the same underlying
/// value, so partitions can never see a half-updated state. A new snapshot is
/// only installed by the coordinator between rounds.
#[derive(Debug)]
pub struct Broadcast<T>(Arc<T>);

impl<T> Broadcast<T> {
    /// Publishes a value as a shared read-only snapshot.
    pub fn publish(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the broadcast value.
    pub fn value(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}
