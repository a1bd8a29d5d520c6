//! Authenticated user profile and authentication payloads.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, Password, PersonName, PhoneNumber, TypeConstraintError, UserId};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    /// Position of the role in the permission hierarchy.
    pub const fn level(self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Profile of the signed-in user as returned by `/auth/me`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub matters_count: u32,
    #[serde(default)]
    pub pending_matters_count: u32,
    #[serde(default)]
    pub in_progress_matters_count: u32,
    #[serde(default)]
    pub completed_matters_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of a successful login or signup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Credentials posted to `/auth/login`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: Password,
}

/// Account data posted to `/auth/signup`.
#[derive(Clone, Debug, Serialize)]
pub struct NewAccount {
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: Password,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
}

/// Partial profile update sent to `/auth/profile`; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_profile_with_missing_counters() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"name":"Ann","email":"ann@example.com","role":"admin"}"#,
        )
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.matters_count, 0);
        assert!(user.firm_name.is_none());
    }

    #[test]
    fn role_hierarchy_orders_admin_above_customer() {
        assert!(Role::Admin.level() > Role::Customer.level());
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn profile_update_only_sends_present_fields() {
        let update = ProfileUpdate {
            phone: Some(PhoneNumber::new("555-0100").unwrap()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"phone": "555-0100"})
        );
    }
}
