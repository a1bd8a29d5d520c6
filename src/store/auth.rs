//! Session slice: the signed-in user and the bearer token.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::domain::user::{AuthResponse, User};
use crate::store::AppState;
use crate::store::status::{OperationKind, RequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthOp {
    Login,
    Signup,
    FetchProfile,
    UpdateProfile,
}

impl OperationKind for AuthOp {
    fn status(state: &mut AppState) -> &mut RequestStatus<Self> {
        &mut state.auth.status
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    user: Option<User>,
    token: Option<String>,
    pub(crate) status: RequestStatus<AuthOp>,
}

impl AuthState {
    /// Session rehydrated from a persisted token; the profile is fetched later.
    pub fn restored(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// True if and only if a non-empty token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }

    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    pub(crate) fn sign_in(&mut self, response: AuthResponse) {
        self.token = Some(response.token).filter(|t| !t.is_empty());
        self.user = Some(response.user);
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying its signature.
///
/// Returns `None` for opaque tokens and tokens without an expiry.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
}

/// True when the token's expiry lies before `now`; undecodable tokens count as expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    token_expiry(token).is_none_or(|exp| exp < now)
}
