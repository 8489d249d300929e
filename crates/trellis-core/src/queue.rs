//! # Event Queue
//!
//! The working (non-durable) queue of pending, causally-ordered events.
//!
//! Events are appended at the tail and consumed in FIFO order by the event
//! processor. The queue is not a log: once a processing pass drains it, the
//! drained events are not individually retrievable. Collaborators that need
//! an audit trail must persist events themselves before processing.
//!
//! Event ids come from a monotonic counter that survives drains, so an id is
//! never re-issued across the lifetime of the store.

use std::collections::VecDeque;

use crate::nodes::NodeStore;
use crate::primitives::MAX_CAUSAL_PARENTS;
use crate::types::{owned_copy, Capacities, Event, EventId, EventKind, NodeId, TrellisError};

/// Bounded FIFO queue of pending events.
#[derive(Debug)]
pub struct EventQueue {
    pending: VecDeque<Event>,
    next_event_id: u64,
    max_pending: usize,
    max_payload_bytes: usize,
}

impl EventQueue {
    /// Create an empty queue with its buffer pre-allocated to capacity.
    #[must_use]
    pub fn new(caps: &Capacities) -> Self {
        Self {
            pending: VecDeque::with_capacity(caps.max_pending_events),
            next_event_id: 0,
            max_pending: caps.max_pending_events,
            max_payload_bytes: caps.max_payload_bytes,
        }
    }

    /// Record an occurrence targeting an existing node.
    ///
    /// Copies `payload` and `causal_parents` into queue-owned buffers,
    /// assigns the next lifetime-unique id, and appends at the tail.
    /// `timestamp` is caller-supplied seconds; the substrate never reads a
    /// clock of its own.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if `target` does not exist
    /// - `PayloadTooLarge` if the payload exceeds its ceiling
    /// - `CapacityExceeded` if the queue or the causal-parent list is full
    /// - `InvalidEventParent` if a declared parent id was never issued
    /// - `AllocationFailure` if a buffer copy cannot be satisfied
    pub fn add_event(
        &mut self,
        nodes: &NodeStore,
        kind: EventKind,
        target: NodeId,
        payload: &[u8],
        causal_parents: &[EventId],
        timestamp: i64,
    ) -> Result<EventId, TrellisError> {
        if !nodes.contains(target) {
            return Err(TrellisError::InvalidReference(target));
        }
        if payload.len() > self.max_payload_bytes {
            return Err(TrellisError::PayloadTooLarge {
                len: payload.len(),
                max: self.max_payload_bytes,
            });
        }
        if causal_parents.len() > MAX_CAUSAL_PARENTS {
            return Err(TrellisError::CapacityExceeded {
                arena: "causal-parent",
                capacity: MAX_CAUSAL_PARENTS,
            });
        }
        // Parents may already have been drained (the queue is not a log), so
        // the check is "was this id ever issued", not "is it still pending".
        for &parent in causal_parents {
            if parent.0 >= self.next_event_id {
                return Err(TrellisError::InvalidEventParent(parent));
            }
        }
        if self.pending.len() >= self.max_pending {
            return Err(TrellisError::CapacityExceeded {
                arena: "pending-event",
                capacity: self.max_pending,
            });
        }

        let payload = owned_copy(payload)?;
        let mut parents = Vec::new();
        parents
            .try_reserve_exact(causal_parents.len())
            .map_err(|_| TrellisError::AllocationFailure(causal_parents.len()))?;
        parents.extend_from_slice(causal_parents);

        let id = EventId(self.next_event_id);
        self.next_event_id = self.next_event_id.saturating_add(1);
        self.pending.push_back(Event {
            id,
            kind,
            target,
            payload,
            causal_parents: parents,
            timestamp,
        });

        Ok(id)
    }

    /// Pending events in FIFO order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.pending.iter()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The fixed pending-event capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_pending
    }

    /// The next id the queue would issue. Monotonic for the lifetime of the
    /// store; never reset by a drain.
    #[must_use]
    pub fn next_event_id(&self) -> u64 {
        self.next_event_id
    }

    /// Drop all pending events. Called by the processor after a successful
    /// pass; the id counter is left untouched.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    /// Rebuild an empty queue from a snapshot's id watermark.
    pub(crate) fn from_watermark(caps: &Capacities, next_event_id: u64) -> Self {
        let mut queue = Self::new(caps);
        queue.next_event_id = next_event_id;
        queue
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeAttributes, NodeKind};

    fn nodes_with_one() -> (NodeStore, NodeId) {
        let mut nodes = NodeStore::new(&Capacities::default());
        let id = nodes
            .add_node(NodeKind::SyntaxTreeNode, b"n", &NodeAttributes::default())
            .expect("add node");
        (nodes, id)
    }

    #[test]
    fn ids_are_monotonic_within_a_batch() {
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&Capacities::default());

        let first = queue
            .add_event(&nodes, EventKind::CodeEdit, target, b"a", &[], 0)
            .expect("enqueue");
        let second = queue
            .add_event(&nodes, EventKind::CodeEdit, target, b"b", &[first], 1)
            .expect("enqueue");

        assert_eq!(first, EventId(0));
        assert_eq!(second, EventId(1));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn ids_survive_a_drain() {
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&Capacities::default());

        queue
            .add_event(&nodes, EventKind::UiInteraction, target, b"a", &[], 0)
            .expect("enqueue");
        queue.clear();

        let id = queue
            .add_event(&nodes, EventKind::UiInteraction, target, b"b", &[], 1)
            .expect("enqueue");
        assert_eq!(id, EventId(1), "drained ids must never be re-issued");
    }

    #[test]
    fn missing_target_rejected() {
        let (nodes, _) = nodes_with_one();
        let mut queue = EventQueue::new(&Capacities::default());

        let result = queue.add_event(&nodes, EventKind::WebRequest, NodeId(42), b"x", &[], 0);
        assert!(matches!(
            result,
            Err(TrellisError::InvalidReference(NodeId(42)))
        ));
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.next_event_id(), 0);
    }

    #[test]
    fn unissued_parent_rejected() {
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&Capacities::default());

        let result = queue.add_event(
            &nodes,
            EventKind::AiCompletion,
            target,
            b"x",
            &[EventId(7)],
            0,
        );
        assert!(matches!(
            result,
            Err(TrellisError::InvalidEventParent(EventId(7)))
        ));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn drained_parent_still_valid() {
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&Capacities::default());

        let parent = queue
            .add_event(&nodes, EventKind::CodeEdit, target, b"a", &[], 0)
            .expect("enqueue");
        queue.clear();

        // The parent was consumed, but its id was issued; causal references
        // to it remain valid.
        queue
            .add_event(&nodes, EventKind::CodeEdit, target, b"b", &[parent], 1)
            .expect("enqueue with drained parent");
    }

    #[test]
    fn full_queue_rejects_without_mutation() {
        let caps = Capacities {
            max_pending_events: 2,
            ..Capacities::default()
        };
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&caps);

        for ts in 0..2 {
            queue
                .add_event(&nodes, EventKind::CodeEdit, target, b"x", &[], ts)
                .expect("enqueue");
        }
        let result = queue.add_event(&nodes, EventKind::CodeEdit, target, b"x", &[], 2);

        assert!(matches!(
            result,
            Err(TrellisError::CapacityExceeded {
                arena: "pending-event",
                capacity: 2,
            })
        ));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_event_id(), 2, "failed call must not burn an id");
    }

    #[test]
    fn oversized_payload_rejected() {
        let caps = Capacities {
            max_payload_bytes: 4,
            ..Capacities::default()
        };
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&caps);

        let result = queue.add_event(&nodes, EventKind::WebRequest, target, b"12345", &[], 0);
        assert!(matches!(
            result,
            Err(TrellisError::PayloadTooLarge { len: 5, max: 4 })
        ));
    }

    #[test]
    fn payload_and_parents_are_copied() {
        let (nodes, target) = nodes_with_one();
        let mut queue = EventQueue::new(&Capacities::default());

        let mut payload = b"volatile".to_vec();
        let parents: Vec<EventId> = Vec::new();
        queue
            .add_event(&nodes, EventKind::CodeEdit, target, &payload, &parents, 0)
            .expect("enqueue");
        payload.clear();

        let stored = queue.iter().next().expect("event");
        assert_eq!(stored.payload, b"volatile");
    }
}
