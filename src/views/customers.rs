use crate::domain::customer::Customer;
use crate::domain::matter::Matter;
use crate::domain::types::{CustomerId, UserId};

/// Selected customer together with the matters loaded for them.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetail<'a> {
    pub customer: &'a Customer,
    pub matters: Vec<&'a Matter>,
}

impl<'a> CustomerDetail<'a> {
    /// `scope` names the customer the scoped collection was loaded for; the
    /// matters are only shown when it matches the selected customer.
    pub fn build(
        selected: Option<&'a Customer>,
        scope: Option<CustomerId>,
        scoped_matters: &'a [Matter],
    ) -> Option<Self> {
        let customer = selected?;
        let owner = UserId::from(customer.id);
        let matters = if scope == Some(customer.id) {
            scoped_matters.iter().filter(|m| m.owner_id == owner).collect()
        } else {
            Vec::new()
        };
        Some(Self { customer, matters })
    }

    pub fn heading(&self) -> String {
        format!("Matters ({})", self.matters.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::matter::MatterState;
    use crate::domain::types::MatterId;

    fn customer(id: i32) -> Customer {
        Customer {
            id: CustomerId::new(id).unwrap(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            matters_count: 1,
            pending_matters_count: 1,
            in_progress_matters_count: 0,
            completed_matters_count: 0,
        }
    }

    fn matter(id: i32, owner: i32) -> Matter {
        Matter {
            id: MatterId::new(id).unwrap(),
            title: "Will".to_string(),
            description: None,
            state: MatterState::New,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner_id: UserId::new(owner).unwrap(),
            owner: None,
        }
    }

    #[test]
    fn detail_uses_matching_scope() {
        let ada = customer(4);
        let matters = vec![matter(1, 4)];

        let detail = CustomerDetail::build(Some(&ada), Some(ada.id), &matters).unwrap();
        assert_eq!(detail.matters.len(), 1);
        assert_eq!(detail.heading(), "Matters (1)");

        let stale = CustomerDetail::build(Some(&ada), CustomerId::new(5).ok(), &matters).unwrap();
        assert!(stale.matters.is_empty());
    }

    #[test]
    fn no_selection_no_detail() {
        assert!(CustomerDetail::build(None, None, &[]).is_none());
    }
}
