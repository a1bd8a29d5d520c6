use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message used when the server gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";
/// Message used when no response was received at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Failure of a single backend call, normalized at the transport boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connection refused, timeout, DNS...).
    #[error("{0}")]
    Network(String),

    /// The backend rejected the bearer token.
    #[error("{message}")]
    Unauthorized { message: String },

    /// A 4xx response carrying field-level messages.
    #[error("{message}")]
    Validation {
        status: u16,
        message: String,
        field_errors: Vec<String>,
    },

    /// Any other non-2xx response.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Human readable message stored verbatim as a store's error.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Field-level messages, empty unless the backend sent any.
    pub fn field_errors(&self) -> &[String] {
        match self {
            ApiError::Validation { field_errors, .. } => field_errors,
            _ => &[],
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Builds the error for a failed response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|body| body.message.clone())
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| default_message(status));
        let field_errors = parsed
            .and_then(|body| body.errors)
            .map(flatten_field_errors)
            .unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { message }
        } else if status.is_client_error() && !field_errors.is_empty() {
            ApiError::Validation {
                status: status.as_u16(),
                message,
                field_errors,
            }
        } else {
            ApiError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_timeout() {
            ApiError::Network(format!("{NETWORK_ERROR_MESSAGE}: request timed out"))
        } else {
            ApiError::Network(NETWORK_ERROR_MESSAGE.to_string())
        }
    }
}

/// Error body shape used by the backend: `{ message?, errors? }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<Value>,
}

fn default_message(status: StatusCode) -> String {
    if status == StatusCode::UNAUTHORIZED {
        "Unauthorized".to_string()
    } else {
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

/// Accepts either a list of messages or a `field -> [messages]` map.
fn flatten_field_errors(errors: Value) -> Vec<String> {
    match errors {
        Value::String(message) => vec![message],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(message) => Some(message),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::Object(fields) => fields
            .into_iter()
            .flat_map(|(field, messages)| {
                flatten_field_errors(messages)
                    .into_iter()
                    .map(move |message| format!("{field} {message}"))
            })
            .collect(),
        _ => Vec::new(),
    }
}
