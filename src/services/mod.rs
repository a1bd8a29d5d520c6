//! Async operations driving the stores.
//!
//! Every operation follows the same shape: issue a ticket (`Pending`), call
//! the gateway, then settle the ticket and merge the result (`Fulfilled`) or
//! record the failure (`Rejected`). An unauthorized failure from any call
//! tears the whole session down.

use std::future::Future;

use thiserror::Error;

use crate::forms::FormError;
use crate::store::status::OperationKind;
use crate::store::{AppState, Store};
use crate::transport::ApiError;

pub mod auth;
pub mod customers;
pub mod matters;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("You are not allowed to perform this action")]
    Forbidden,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ServiceError {
    /// Field-level messages from either local validation or the backend.
    pub fn field_errors(&self) -> Vec<String> {
        match self {
            ServiceError::Form(err) => vec![err.to_string()],
            ServiceError::Api(err) => err.field_errors().to_vec(),
            ServiceError::Forbidden => Vec::new(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Runs `call` under a fresh ticket of `kind` and settles it.
///
/// `apply` receives the state, whether the ticket was still current when the
/// call completed, and the result. It is skipped entirely when the session
/// was reset while the call was in flight.
pub(crate) async fn dispatch<K, T, Fut, A>(
    store: &Store,
    kind: K,
    call: Fut,
    apply: A,
) -> ServiceResult<T>
where
    K: OperationKind,
    Fut: Future<Output = Result<T, ApiError>>,
    A: FnOnce(&mut AppState, bool, &T),
{
    let ticket = store.update(|state| state.begin(kind));

    match call.await {
        Ok(value) => {
            store.update(|state| {
                if state.predates_reset(ticket.id()) {
                    log::debug!("{kind:?} completed after the session ended; dropping result");
                    return;
                }
                let current = K::status(state).fulfill(ticket);
                apply(state, current, &value);
            });
            Ok(value)
        }
        Err(err) => {
            store.update(|state| {
                if state.predates_reset(ticket.id()) {
                    log::debug!("{kind:?} failed after the session ended: {err}");
                } else if err.is_unauthorized() {
                    log::warn!("{kind:?} rejected as unauthorized; ending session");
                    state.reset();
                    state.auth.status.set_error(err.message());
                } else if K::status(state).reject(ticket, err.message()) {
                    log::error!("{kind:?} failed: {err}");
                } else {
                    log::debug!("{kind:?} failed after being superseded: {err}");
                }
            });
            Err(err.into())
        }
    }
}
