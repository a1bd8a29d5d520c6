//! Request bookkeeping shared by every store slice.
//!
//! Each dispatched operation gets a monotonic [`Ticket`]. Only the most
//! recently issued ticket of a given kind may settle the busy and error
//! flags, so a quickly failing request cannot clear the busy flag of a newer
//! one still in flight.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::store::AppState;

/// Operation family of one store; selects the [`RequestStatus`] it settles.
pub trait OperationKind: Copy + Eq + Hash + Debug {
    fn status(state: &mut AppState) -> &mut RequestStatus<Self>;
}

/// Handle of one in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket<K> {
    kind: K,
    id: u64,
}

impl<K: Copy> Ticket<K> {
    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestStatus<K: OperationKind> {
    in_flight: HashMap<K, u64>,
    error: Option<String>,
}

impl<K: OperationKind> Default for RequestStatus<K> {
    fn default() -> Self {
        Self {
            in_flight: HashMap::new(),
            error: None,
        }
    }
}

impl<K: OperationKind> RequestStatus<K> {
    /// `Idle -> Pending`: marks the kind busy and clears the previous error.
    pub(crate) fn begin(&mut self, kind: K, id: u64) -> Ticket<K> {
        self.in_flight.insert(kind, id);
        self.error = None;
        Ticket { kind, id }
    }

    /// `Pending -> Fulfilled -> Idle`. Returns `false` for a superseded ticket,
    /// which leaves the flags untouched.
    pub(crate) fn fulfill(&mut self, ticket: Ticket<K>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight.remove(&ticket.kind);
        self.error = None;
        true
    }

    /// `Pending -> Rejected -> Idle`. Returns `false` for a superseded ticket.
    pub(crate) fn reject(&mut self, ticket: Ticket<K>, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight.remove(&ticket.kind);
        self.error = Some(message.into());
        true
    }

    pub fn is_current(&self, ticket: Ticket<K>) -> bool {
        self.in_flight.get(&ticket.kind) == Some(&ticket.id)
    }

    /// Busy flag: some current operation is still pending.
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.in_flight.contains_key(&kind)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
