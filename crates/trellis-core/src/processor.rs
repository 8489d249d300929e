//! # Event Processor
//!
//! The deterministic state machine that drains the pending queue.
//!
//! The processor is `Idle` while the queue sits between ticks, `Draining`
//! for the duration of a `process` call, and `Idle` again when it returns.
//! Because every call is synchronous and runs to completion, callers can
//! never observe a partially-drained queue: a pass either applies every
//! pending event and clears the queue, or fails with the queue and all node
//! payloads exactly as they were.
//!
//! Mutation logic is an injected strategy: a [`MutationTable`] maps each
//! `EventKind` to a deterministic function of (current payload, event). The
//! cross-cutting contract is that applying the same ordered events to the
//! same initial node state always produces the same final state, with no
//! wall clock, randomness, or I/O inside a handler.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::nodes::NodeStore;
use crate::queue::EventQueue;
use crate::types::{owned_copy, Event, EventKind, NodeId, TrellisError};

// =============================================================================
// MUTATION TABLE
// =============================================================================

/// A deterministic payload mutation for one event kind.
///
/// Handlers are pure: the new payload may depend only on the previous payload
/// and the event record.
pub type MutationFn = fn(&mut Vec<u8>, &Event);

/// Dispatch table from `EventKind` to its mutation function.
#[derive(Debug, Clone)]
pub struct MutationTable {
    handlers: [MutationFn; 5],
}

impl MutationTable {
    /// Build a table from explicit handlers, indexed by `EventKind::index`.
    #[must_use]
    pub const fn new(handlers: [MutationFn; 5]) -> Self {
        Self { handlers }
    }

    /// Replace the handler for one kind.
    #[must_use]
    pub fn with_handler(mut self, kind: EventKind, handler: MutationFn) -> Self {
        self.handlers[kind.index()] = handler;
        self
    }

    /// The handler registered for `kind`.
    #[must_use]
    pub fn handler(&self, kind: EventKind) -> MutationFn {
        self.handlers[kind.index()]
    }
}

impl Default for MutationTable {
    /// The built-in handlers: edit-like kinds accumulate, snapshot-like kinds
    /// replace.
    fn default() -> Self {
        Self::new([
            apply_code_edit,
            apply_web_request,
            apply_ui_interaction,
            apply_ai_completion,
            apply_version_control_update,
        ])
    }
}

/// Code edits accumulate onto the source buffer.
fn apply_code_edit(payload: &mut Vec<u8>, event: &Event) {
    payload.extend_from_slice(&event.payload);
}

/// A completed request replaces the fetched content wholesale.
fn apply_web_request(payload: &mut Vec<u8>, event: &Event) {
    payload.clear();
    payload.extend_from_slice(&event.payload);
}

/// Interactions append to the component's trace, separated by ASCII US.
fn apply_ui_interaction(payload: &mut Vec<u8>, event: &Event) {
    payload.push(0x1F);
    payload.extend_from_slice(&event.payload);
}

/// Completions extend the buffer they were generated against.
fn apply_ai_completion(payload: &mut Vec<u8>, event: &Event) {
    payload.extend_from_slice(&event.payload);
}

/// A version-control update replaces the tracked buffer.
fn apply_version_control_update(payload: &mut Vec<u8>, event: &Event) {
    payload.clear();
    payload.extend_from_slice(&event.payload);
}

// =============================================================================
// PROCESSOR
// =============================================================================

/// Drains the queue once per logical tick.
pub struct EventProcessor;

impl EventProcessor {
    /// Apply every pending event in FIFO order, then clear the queue.
    ///
    /// Mutations are staged against working copies of the affected payloads;
    /// the copies are committed and the queue cleared only after every event
    /// has applied cleanly. Returns the number of events applied.
    ///
    /// # Errors
    ///
    /// - `PayloadTooLarge` if a staged payload would exceed its ceiling
    /// - `AllocationFailure` if a working copy cannot be allocated
    /// - `InvalidReference` if a target vanished (unreachable in practice:
    ///   targets are validated at enqueue and nodes are never destroyed)
    ///
    /// On error the queue and every node payload are left untouched.
    pub fn process(
        table: &MutationTable,
        queue: &mut EventQueue,
        nodes: &mut NodeStore,
    ) -> Result<usize, TrellisError> {
        if queue.is_empty() {
            return Ok(0);
        }

        let ceiling = nodes.max_payload_bytes();
        let mut staged: BTreeMap<NodeId, Vec<u8>> = BTreeMap::new();

        for event in queue.iter() {
            let payload = match staged.entry(event.target) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(slot) => {
                    let node = nodes
                        .get(event.target)
                        .ok_or(TrellisError::InvalidReference(event.target))?;
                    slot.insert(owned_copy(&node.payload)?)
                }
            };

            table.handler(event.kind)(payload, event);

            if payload.len() > ceiling {
                return Err(TrellisError::PayloadTooLarge {
                    len: payload.len(),
                    max: ceiling,
                });
            }
        }

        // Every event applied cleanly; commit the working copies and drain.
        let applied = queue.len();
        for (id, payload) in staged {
            nodes.commit_payload(id, payload);
        }
        queue.clear();

        Ok(applied)
    }
}

// =============================================================================
// TESTS
// =============================================================================
