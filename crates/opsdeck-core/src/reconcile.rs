// ── Selection reconciliation ──
//
// Tracks the entity currently focused for detail inspection and
// re-derives it against every fresh poll batch. Focus loss is one-way:
// once the focused key vanishes from a batch, a later batch containing
// it again does not restore focus -- only an explicit select() does.

use crate::batch::AggregatedBatch;

/// Proof of currency for a dependent detail fetch.
///
/// Issued by [`select`](SelectionReconciler::select) and
/// [`on_batch`](SelectionReconciler::on_batch); redeemed through
/// [`admit`](SelectionReconciler::admit) when the fetch completes. A
/// ticket from before a focus change never admits, so a stale detail
/// result cannot clobber the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket<K> {
    key: K,
    generation: u64,
}

impl<K> DetailTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Outcome of reconciling the focus against one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation<K, V> {
    /// Nothing was focused; the batch is irrelevant to selection.
    NoFocus,
    /// The focused key is still present. `value` is its freshest state
    /// and `ticket` authorizes a detail refresh.
    Refreshed { value: V, ticket: DetailTicket<K> },
    /// The focused key disappeared (deleted or drained). Focus is gone
    /// and the caller must drop any dependent detail state.
    Cleared,
}

/// Holds the optional focused entity for one view.
///
/// Owned by a single view instance; at most one poll tick mutates it at
/// a time, so no internal locking.
#[derive(Debug)]
pub struct SelectionReconciler<K, V> {
    focused: Option<(K, V)>,
    generation: u64,
}

impl<K, V> Default for SelectionReconciler<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SelectionReconciler<K, V> {
    pub fn new() -> Self {
        Self {
            focused: None,
            generation: 0,
        }
    }

    pub fn focused(&self) -> Option<(&K, &V)> {
        self.focused.as_ref().map(|(k, v)| (k, v))
    }

    /// Drop the focus. Any in-flight detail fetch becomes stale.
    pub fn deselect(&mut self) {
        self.focused = None;
        self.generation += 1;
    }
}

impl<K: Clone + PartialEq, V: Clone> SelectionReconciler<K, V> {
    /// Focus an entity, invalidating any detail fetch still in flight
    /// for the previous focus.
    pub fn select(&mut self, key: K, value: V) -> DetailTicket<K> {
        self.generation += 1;
        self.focused = Some((key.clone(), value));
        DetailTicket {
            key,
            generation: self.generation,
        }
    }

    pub fn is_focused(&self, key: &K) -> bool {
        self.focused.as_ref().is_some_and(|(k, _)| k == key)
    }

    /// Reconcile the focus against a fresh batch.
    ///
    /// A `Failed` entry still counts as present: the row is degraded, not
    /// gone, so focus is retained with its last known value.
    pub fn on_batch(&mut self, batch: &AggregatedBatch<K, V>) -> Reconciliation<K, V> {
        let Some((key, value)) = self.focused.as_mut() else {
            return Reconciliation::NoFocus;
        };

        match batch.get(key) {
            Some(Ok(fresh)) => {
                *value = fresh.clone();
                Reconciliation::Refreshed {
                    value: fresh.clone(),
                    ticket: DetailTicket {
                        key: key.clone(),
                        generation: self.generation,
                    },
                }
            }
            Some(Err(_)) => Reconciliation::Refreshed {
                value: value.clone(),
                ticket: DetailTicket {
                    key: key.clone(),
                    generation: self.generation,
                },
            },
            None => {
                self.focused = None;
                self.generation += 1;
                Reconciliation::Cleared
            }
        }
    }

    /// Completion-time currency check for a detail fetch: `true` only if
    /// the ticket's key is still focused and no select/deselect happened
    /// since it was issued.
    pub fn admit(&self, ticket: &DetailTicket<K>) -> bool {
        ticket.generation == self.generation
            && self.focused.as_ref().is_some_and(|(k, _)| *k == ticket.key)
    }
}
