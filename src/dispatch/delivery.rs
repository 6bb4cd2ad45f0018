/// Outcome of a single `send_to` or `relay`.
///
/// A target without a handler for the kind is not counted anywhere; it is
/// an ordinary drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery<K> {
    /// Kind of the dispatched message.
    pub kind: K,
    /// Handlers found for the targets.
    pub matched: usize,
    /// Handlers that actually ran. Lower than `matched` when a bound
    /// consumer has been dropped.
    pub delivered: usize,
}

impl<K> Delivery<K> {
    pub(crate) fn none(kind: K) -> Self {
        Self {
            kind,
            matched: 0,
            delivered: 0,
        }
    }

    /// True when no handler ran.
    pub fn is_empty(&self) -> bool {
        self.delivered == 0
    }
}
