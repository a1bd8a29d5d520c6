//! Authorization predicates shared by every view and by the services.

use crate::domain::matter::Matter;
use crate::domain::user::{Role, User};

pub fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin)
}

/// Role hierarchy check: an admin satisfies any requirement.
pub fn has_role(user: Option<&User>, required: Role) -> bool {
    user.is_some_and(|user| user.role.level() >= required.level())
}

/// Admins see every matter; customers only those they own.
pub fn can_view(user: Option<&User>, matter: &Matter) -> bool {
    match user {
        Some(user) => user.is_admin() || matter.owner_id == user.id,
        None => false,
    }
}

pub fn can_edit(user: Option<&User>, matter: &Matter) -> bool {
    can_view(user, matter)
}

pub fn can_delete(user: Option<&User>, matter: &Matter) -> bool {
    can_view(user, matter)
}

/// Where a guarded view sends the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Granted,
    /// No session: go to the login view.
    Login,
    /// Signed in without the required role: go to the dashboard.
    Dashboard,
}

/// Protected-route decision for a view requiring `required` (or any signed-in
/// user when `None`).
pub fn route_access(authenticated: bool, user: Option<&User>, required: Option<Role>) -> RouteAccess {
    if !authenticated {
        return RouteAccess::Login;
    }
    match required {
        Some(role) if !has_role(user, role) => RouteAccess::Dashboard,
        _ => RouteAccess::Granted,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::matter::MatterState;
    use crate::domain::types::{MatterId, UserId};

    pub(crate) fn user(id: i32, role: Role) -> User {
        User {
            id: UserId::new(id).unwrap(),
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            phone: String::new(),
            role,
            created_at: None,
            matters_count: 0,
            pending_matters_count: 0,
            in_progress_matters_count: 0,
            completed_matters_count: 0,
            firm_name: None,
        }
    }

    fn owned_by(owner: i32) -> Matter {
        Matter {
            id: MatterId::new(1).unwrap(),
            title: "Lease review".to_string(),
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
    fn admin_can_touch_any_matter() {
        let admin = user(1, Role::Admin);
        let matter = owned_by(5);
        assert!(can_view(Some(&admin), &matter));
        assert!(can_edit(Some(&admin), &matter));
        assert!(can_delete(Some(&admin), &matter));
    }

    #[test]
    fn customer_limited_to_own_matters() {
        let customer = user(5, Role::Customer);
        assert!(can_edit(Some(&customer), &owned_by(5)));
        assert!(!can_view(Some(&customer), &owned_by(6)));
        assert!(!can_delete(Some(&customer), &owned_by(6)));
    }

    #[test]
    fn anonymous_sees_nothing() {
        assert!(!can_view(None, &owned_by(5)));
        assert!(!is_admin(None));
    }

    #[test]
    fn role_hierarchy() {
        let admin = user(1, Role::Admin);
        let customer = user(2, Role::Customer);
        assert!(has_role(Some(&admin), Role::Customer));
        assert!(has_role(Some(&customer), Role::Customer));
        assert!(!has_role(Some(&customer), Role::Admin));
        assert!(!has_role(None, Role::Customer));
    }

    #[test]
    fn guarded_routes() {
        let customer = user(2, Role::Customer);
        assert_eq!(route_access(false, None, None), RouteAccess::Login);
        assert_eq!(
            route_access(true, Some(&customer), Some(Role::Admin)),
            RouteAccess::Dashboard
        );
        assert_eq!(
            route_access(true, Some(&customer), Some(Role::Customer)),
            RouteAccess::Granted
        );
        assert_eq!(route_access(true, None, None), RouteAccess::Granted);
    }
}
