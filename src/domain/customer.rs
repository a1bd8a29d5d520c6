use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomerId, EmailAddress, Password, PersonName, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub matters_count: u32,
    #[serde(default)]
    pub pending_matters_count: u32,
    #[serde(default)]
    pub in_progress_matters_count: u32,
    #[serde(default)]
    pub completed_matters_count: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewCustomer {
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    /// Optional initial password for the customer's own login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Password>,
}

/// Partial customer update; absent fields are left untouched by the backend.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Password>,
}
