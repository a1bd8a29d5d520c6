//! In-memory state container for the session, customers and matters.
//!
//! [`Store`] is created once at start-up and shared by reference. Slices are
//! mutated only by the service layer when an operation settles; the UI may
//! read snapshots and move the selected-entity slots.

use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::types::{CustomerId, MatterId};
use crate::storage::TokenStore;
use crate::store::auth::{AuthState, token_expiry};
use crate::store::customers::CustomersState;
use crate::store::matters::MattersState;
use crate::store::status::{OperationKind, Ticket};

pub mod auth;
pub mod customers;
pub mod matters;
pub mod status;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub customers: CustomersState,
    pub matters: MattersState,
    next_ticket: u64,
    reset_at: u64,
}

impl AppState {
    pub fn restored(token: Option<String>) -> Self {
        Self {
            auth: AuthState::restored(token),
            ..Self::default()
        }
    }

    /// Moves the operation's kind to `Pending` under a fresh ticket.
    pub(crate) fn begin<K: OperationKind>(&mut self, kind: K) -> Ticket<K> {
        self.next_ticket += 1;
        let id = self.next_ticket;
        K::status(self).begin(kind, id)
    }

    /// Teardown: every slice back to its initial value. Ticket numbering
    /// continues so results of operations issued before the reset are ignored.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            next_ticket: self.next_ticket,
            reset_at: self.next_ticket,
            ..Self::default()
        };
    }

    /// Whether the operation was issued by a session torn down since.
    pub(crate) fn predates_reset(&self, ticket_id: u64) -> bool {
        ticket_id <= self.reset_at
    }
}

#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<AppState>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Rehydrates the session from durable storage. A JWT that has already
    /// expired is discarded; opaque tokens are kept for the backend to judge.
    pub fn restore(tokens: &dyn TokenStore) -> Self {
        let token = tokens.load_token().filter(|token| match token_expiry(token) {
            Some(exp) if exp <= Utc::now() => {
                log::info!("Stored session token expired at {exp}; discarding it");
                if let Err(err) = tokens.clear_token() {
                    log::error!("Failed to clear expired token: {err}");
                }
                false
            }
            _ => true,
        });
        Self::new(AppState::restored(token))
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let guard = self.state.read();
        f(&*guard)
    }

    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut guard = self.state.write();
        f(&mut *guard)
    }

    pub fn select_customer(&self, id: Option<CustomerId>) -> bool {
        self.update(|state| state.customers.select(id))
    }

    pub fn select_matter(&self, id: Option<MatterId>) -> bool {
        self.update(|state| state.matters.select(id))
    }

    pub fn clear_errors(&self) {
        self.update(|state| {
            state.auth.clear_error();
            state.customers.clear_error();
            state.matters.clear_error();
        });
    }
}
