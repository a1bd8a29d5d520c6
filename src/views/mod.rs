//! Read-only projections over store snapshots. Nothing here mutates state.

use crate::domain::user::{Role, User};

pub mod access;
pub mod customers;
pub mod matters;

/// Greeting block of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub greeting: String,
    pub role: Role,
    pub email: String,
}

impl DashboardSummary {
    pub fn new(user: &User) -> Self {
        Self {
            greeting: format!("Welcome to Dashboard, {}!", user.name),
            role: user.role,
            email: user.email.clone(),
        }
    }
}
