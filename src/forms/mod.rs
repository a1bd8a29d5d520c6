//! Input forms validated before any request is dispatched.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod customer;
pub mod matter;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid title")]
    InvalidTitle,

    #[error("invalid matter state")]
    InvalidState,

    #[error("invalid due date")]
    InvalidDueDate,

    #[error("password cannot be empty")]
    EmptyPassword,
}

/// Trims an optional free-text field, mapping blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Maps a constraint failure onto the form error of the offending field.
pub(crate) fn field_error(error: FormError) -> impl FnOnce(TypeConstraintError) -> FormError {
    move |_| error
}
