//! Matter list projections: visibility, state filter tabs, overdue flags and
//! the counters shown above the list.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::matter::{Matter, MatterState};
use crate::domain::types::TypeConstraintError;
use crate::domain::user::User;
use crate::views::access::{can_view, is_admin};

/// Selected filter tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatterFilter {
    #[default]
    All,
    State(MatterState),
}

impl MatterFilter {
    pub fn matches(self, matter: &Matter) -> bool {
        match self {
            MatterFilter::All => true,
            MatterFilter::State(state) => matter.state == state,
        }
    }
}

impl Display for MatterFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatterFilter::All => write!(f, "all"),
            MatterFilter::State(state) => write!(f, "{state}"),
        }
    }
}

impl FromStr for MatterFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(MatterFilter::All),
            other => other.parse().map(MatterFilter::State),
        }
    }
}

/// Matters the user may see, in store order.
pub fn visible_matters<'a>(user: Option<&User>, matters: &'a [Matter]) -> Vec<&'a Matter> {
    matters.iter().filter(|m| can_view(user, m)).collect()
}

pub fn filter_by_state<'a, I>(matters: I, filter: MatterFilter) -> Vec<&'a Matter>
where
    I: IntoIterator<Item = &'a Matter>,
{
    matters.into_iter().filter(|m| filter.matches(m)).collect()
}

/// Due strictly before `now` and not yet completed.
pub fn is_overdue(matter: &Matter, now: DateTime<Utc>) -> bool {
    matter.state != MatterState::Completed && matter.due_date.is_some_and(|due| due < now)
}

pub fn overdue_matters<'a, I>(matters: I, now: DateTime<Utc>) -> Vec<&'a Matter>
where
    I: IntoIterator<Item = &'a Matter>,
{
    matters.into_iter().filter(|m| is_overdue(m, now)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatterStats {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl<'a> FromIterator<&'a Matter> for MatterStats {
    fn from_iter<I: IntoIterator<Item = &'a Matter>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, matter| {
            stats.total += 1;
            match matter.state {
                MatterState::New => stats.new += 1,
                MatterState::InProgress => stats.in_progress += 1,
                MatterState::Completed => stats.completed += 1,
            }
            stats
        })
    }
}

/// Data behind the matters page.
#[derive(Debug, Clone, PartialEq)]
pub struct MattersPage<'a> {
    pub heading: &'static str,
    pub filter: MatterFilter,
    /// Visible matters after the filter tab is applied.
    pub matters: Vec<&'a Matter>,
    /// Counters over every visible matter, regardless of the filter.
    pub stats: MatterStats,
    pub show_customer: bool,
}

impl<'a> MattersPage<'a> {
    pub fn build(user: Option<&User>, matters: &'a [Matter], filter: MatterFilter) -> Self {
        let admin = is_admin(user);
        let visible = visible_matters(user, matters);
        let stats = visible.iter().copied().collect();
        Self {
            heading: if admin { "All Matters" } else { "My Matters" },
            filter,
            matters: filter_by_state(visible, filter),
            stats,
            show_customer: admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::types::{MatterId, UserId};
    use crate::domain::user::Role;
    use crate::views::access::tests::user;

    fn matter(id: i32, owner: i32, state: MatterState) -> Matter {
        Matter {
            id: MatterId::new(id).unwrap(),
            title: format!("Matter #{id}"),
            description: None,
            state,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner_id: UserId::new(owner).unwrap(),
            owner: None,
        }
    }

    #[test]
    fn completed_filter_picks_exact_matches() {
        let matters = vec![
            matter(1, 3, MatterState::New),
            matter(2, 3, MatterState::Completed),
        ];
        let filtered = filter_by_state(&matters, "completed".parse().unwrap());
        let ids: Vec<i32> = filtered.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, [2]);
    }

    #[test]
    fn filter_parses_tabs() {
        assert_eq!("all".parse::<MatterFilter>().unwrap(), MatterFilter::All);
        assert_eq!(
            "in_progress".parse::<MatterFilter>().unwrap(),
            MatterFilter::State(MatterState::InProgress)
        );
        assert!("archived".parse::<MatterFilter>().is_err());
        assert_eq!(MatterFilter::State(MatterState::New).to_string(), "new");
    }

    #[test]
    fn overdue_needs_past_due_date_and_open_state() {
        let now = Utc::now();
        let mut late = matter(1, 3, MatterState::InProgress);
        late.due_date = Some(now - Duration::days(1));
        let mut done = matter(2, 3, MatterState::Completed);
        done.due_date = Some(now - Duration::days(1));
        let mut upcoming = matter(3, 3, MatterState::New);
        upcoming.due_date = Some(now + Duration::days(1));
        let undated = matter(4, 3, MatterState::New);

        assert!(is_overdue(&late, now));
        assert!(!is_overdue(&done, now));
        assert!(!is_overdue(&upcoming, now));
        assert!(!is_overdue(&undated, now));

        let mut exact = matter(5, 3, MatterState::New);
        exact.due_date = Some(now);
        assert!(!is_overdue(&exact, now));

        let all = [late, done, upcoming, undated, exact];
        assert_eq!(overdue_matters(&all, now).len(), 1);
    }

    #[test]
    fn customer_page_counts_only_own_matters() {
        let matters = vec![
            matter(1, 3, MatterState::New),
            matter(2, 3, MatterState::Completed),
            matter(3, 4, MatterState::InProgress),
        ];
        let owner = user(3, Role::Customer);

        let page = MattersPage::build(Some(&owner), &matters, MatterFilter::State(MatterState::New));

        assert_eq!(page.heading, "My Matters");
        assert!(!page.show_customer);
        assert_eq!(page.matters.len(), 1);
        assert_eq!(
            page.stats,
            MatterStats {
                total: 2,
                new: 1,
                in_progress: 0,
                completed: 1
            }
        );
    }

    #[test]
    fn admin_page_sees_everything() {
        let matters = vec![
            matter(1, 3, MatterState::New),
            matter(2, 4, MatterState::InProgress),
        ];
        let admin = user(9, Role::Admin);

        let page = MattersPage::build(Some(&admin), &matters, MatterFilter::All);

        assert_eq!(page.heading, "All Matters");
        assert!(page.show_customer);
        assert_eq!(page.stats.total, 2);
        assert_eq!(page.stats.in_progress, 1);
    }
}
