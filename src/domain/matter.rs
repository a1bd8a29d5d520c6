//! Matters: case-like work items owned by a customer user.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{MatterId, MatterTitle, TypeConstraintError, UserId};
use crate::domain::user::User;

/// Lifecycle state of a matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatterState {
    #[default]
    New,
    InProgress,
    Completed,
}

impl MatterState {
    /// Human readable label, e.g. `In Progress`.
    pub const fn label(self) -> &'static str {
        match self {
            MatterState::New => "New",
            MatterState::InProgress => "In Progress",
            MatterState::Completed => "Completed",
        }
    }
}

impl Display for MatterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatterState::New => write!(f, "new"),
            MatterState::InProgress => write!(f, "in_progress"),
            MatterState::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for MatterState {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(MatterState::New),
            "in_progress" => Ok(MatterState::InProgress),
            "completed" => Ok(MatterState::Completed),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown matter state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Matter {
    pub id: MatterId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: MatterState,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Customer user owning the matter.
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
    /// Denormalized owner summary, present on admin listings.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
}

/// Parses a due date sent either as an RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` date. Bare dates are taken as midnight UTC.
pub fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_due_date(value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid due date: {value}"))
        }),
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewMatter {
    pub title: MatterTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: MatterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Partial matter update; absent fields are left untouched by the backend.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct MatterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<MatterTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MatterState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl MatterUpdate {
    /// Update that only moves the matter to another state.
    #[must_use]
    pub fn state(state: MatterState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Matter {
        serde_json::from_str(json).expect("valid matter json")
    }

    #[test]
    fn decodes_backend_matter() {
        let matter = decode(
            r#"{
                "id": 4,
                "title": "Lease review",
                "state": "in_progress",
                "due_date": "2024-05-01",
                "created_at": "2024-04-01T10:00:00Z",
                "updated_at": "2024-04-02T10:00:00Z",
                "user_id": 9
            }"#,
        );
        assert_eq!(matter.state, MatterState::InProgress);
        assert_eq!(matter.owner_id.get(), 9);
        assert_eq!(
            matter.due_date.map(|d| d.to_rfc3339()),
            Some("2024-05-01T00:00:00+00:00".to_string())
        );
        assert!(matter.description.is_none());
        assert!(matter.owner.is_none());
    }

    #[test]
    fn empty_or_missing_due_date_is_none() {
        let with_empty = decode(
            r#"{"id":1,"title":"t","state":"new","due_date":"","created_at":"2024-04-01T10:00:00Z","updated_at":"2024-04-01T10:00:00Z","user_id":1}"#,
        );
        let with_null = decode(
            r#"{"id":1,"title":"t","state":"new","due_date":null,"created_at":"2024-04-01T10:00:00Z","updated_at":"2024-04-01T10:00:00Z","user_id":1}"#,
        );
        assert!(with_empty.due_date.is_none());
        assert!(with_null.due_date.is_none());
    }

    #[test]
    fn state_labels_and_wire_names() {
        assert_eq!(MatterState::InProgress.label(), "In Progress");
        assert_eq!(MatterState::InProgress.to_string(), "in_progress");
        assert_eq!("completed".parse::<MatterState>(), Ok(MatterState::Completed));
        assert!("archived".parse::<MatterState>().is_err());
    }

    #[test]
    fn state_only_update_serializes_single_field() {
        let update = MatterUpdate::state(MatterState::InProgress);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"state": "in_progress"})
        );
    }
}
