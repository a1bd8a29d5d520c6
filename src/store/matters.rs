//! Matters slice.
//!
//! Matters live in two ordered collections: every matter the user may see and
//! the matters of the customer currently being viewed. A matter present in both
//! always carries the same contents in both.

use crate::domain::matter::Matter;
use crate::domain::types::{CustomerId, MatterId, UserId};
use crate::store::AppState;
use crate::store::status::{OperationKind, RequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatterOp {
    FetchAll,
    FetchForCustomer,
    FetchOne,
    Create,
    CreateForCustomer,
    Update,
    Delete,
}

impl OperationKind for MatterOp {
    fn status(state: &mut AppState) -> &mut RequestStatus<Self> {
        &mut state.matters.status
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MattersState {
    matters: Vec<Matter>,
    customer_matters: Vec<Matter>,
    customer_scope: Option<CustomerId>,
    selected: Option<Matter>,
    pub(crate) status: RequestStatus<MatterOp>,
}

fn upsert(collection: &mut Vec<Matter>, matter: &Matter) {
    match collection.iter_mut().find(|m| m.id == matter.id) {
        Some(existing) => *existing = matter.clone(),
        None => collection.push(matter.clone()),
    }
}

fn refresh(collection: &mut [Matter], fresh: &[Matter]) {
    for existing in collection.iter_mut() {
        if let Some(update) = fresh.iter().find(|m| m.id == existing.id) {
            *existing = update.clone();
        }
    }
}

impl MattersState {
    /// Every matter loaded through the global listing.
    pub fn matters(&self) -> &[Matter] {
        &self.matters
    }

    /// Matters of the customer currently being viewed.
    pub fn customer_matters(&self) -> &[Matter] {
        &self.customer_matters
    }

    /// Customer the scoped collection belongs to.
    pub fn customer_scope(&self) -> Option<CustomerId> {
        self.customer_scope
    }

    pub fn get(&self, id: MatterId) -> Option<&Matter> {
        self.matters
            .iter()
            .chain(self.customer_matters.iter())
            .find(|m| m.id == id)
    }

    pub fn selected(&self) -> Option<&Matter> {
        self.selected.as_ref()
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

    /// Points the selected slot at a loaded matter, or clears it with `None`.
    /// Returns `false` when the id is in neither collection.
    pub fn select(&mut self, id: Option<MatterId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) => match self.get(id).cloned() {
                Some(matter) => {
                    self.selected = Some(matter);
                    true
                }
                None => false,
            },
        }
    }

    /// Global listing replaces `matters` verbatim; copies in the scoped
    /// collection are refreshed so shared ids stay consistent.
    pub(crate) fn replace_all(&mut self, matters: Vec<Matter>) {
        refresh(&mut self.customer_matters, &matters);
        self.matters = matters;
    }

    pub(crate) fn replace_customer_matters(&mut self, customer_id: CustomerId, matters: Vec<Matter>) {
        refresh(&mut self.matters, &matters);
        self.customer_matters = matters;
        self.customer_scope = Some(customer_id);
    }

    pub(crate) fn set_selected(&mut self, matter: Matter) {
        self.selected = Some(matter);
    }

    fn owned_by_scope(&self, owner: UserId) -> bool {
        self.customer_scope
            .is_some_and(|customer| UserId::from(customer) == owner)
    }

    /// Global create: appended to `matters`, and to the scoped collection when
    /// the owner is the customer being viewed.
    pub(crate) fn insert(&mut self, matter: &Matter) {
        upsert(&mut self.matters, matter);
        if self.owned_by_scope(matter.owner_id) {
            upsert(&mut self.customer_matters, matter);
        }
    }

    /// Customer-scoped create: appended to the scoped collection (unless another
    /// customer is being viewed) and to `matters` unless already present there.
    pub(crate) fn insert_for_customer(&mut self, customer_id: CustomerId, matter: &Matter) {
        match self.customer_scope {
            Some(scope) if scope != customer_id => {}
            _ => {
                self.customer_scope = Some(customer_id);
                upsert(&mut self.customer_matters, matter);
            }
        }
        if !self.matters.iter().any(|m| m.id == matter.id) {
            self.matters.push(matter.clone());
        }
    }

    pub(crate) fn replace(&mut self, matter: &Matter) {
        for collection in [&mut self.matters, &mut self.customer_matters] {
            if let Some(existing) = collection.iter_mut().find(|m| m.id == matter.id) {
                *existing = matter.clone();
            }
        }
        if self.selected.as_ref().is_some_and(|s| s.id == matter.id) {
            self.selected = Some(matter.clone());
        }
    }

    pub(crate) fn remove(&mut self, id: MatterId) {
        self.matters.retain(|m| m.id != id);
        self.customer_matters.retain(|m| m.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
    }

    /// Drops everything owned by a deleted customer.
    pub(crate) fn remove_owned_by(&mut self, customer_id: CustomerId) {
        let owner = UserId::from(customer_id);
        self.matters.retain(|m| m.owner_id != owner);
        if self.customer_scope == Some(customer_id) {
            self.customer_matters.clear();
            self.customer_scope = None;
        }
        if self.selected.as_ref().is_some_and(|s| s.owner_id == owner) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::matter::MatterState;

    pub(crate) fn matter(id: i32, owner: i32, state: MatterState) -> Matter {
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

    fn customer(id: i32) -> CustomerId {
        CustomerId::new(id).unwrap()
    }

    /// Every id present in both collections has identical contents.
    fn assert_consistent(state: &MattersState) {
        for scoped in state.customer_matters() {
            if let Some(global) = state.matters().iter().find(|m| m.id == scoped.id) {
                assert_eq!(global, scoped, "matter {} diverged", scoped.id);
            }
        }
    }

    #[test]
    fn update_reaches_both_collections() {
        let mut state = MattersState::default();
        state.replace_all(vec![
            matter(1, 7, MatterState::New),
            matter(2, 7, MatterState::New),
        ]);
        state.replace_customer_matters(customer(7), vec![matter(2, 7, MatterState::New)]);

        state.replace(&matter(2, 7, MatterState::InProgress));

        assert_eq!(state.matters()[1].state, MatterState::InProgress);
        assert_eq!(state.customer_matters()[0].state, MatterState::InProgress);
        assert_consistent(&state);
    }

    #[test]
    fn scoped_create_skips_duplicate_global_entry() {
        let mut state = MattersState::default();
        state.replace_customer_matters(customer(7), Vec::new());
        state.replace_all(vec![matter(5, 7, MatterState::New)]);

        state.insert_for_customer(customer(7), &matter(5, 7, MatterState::New));
        state.insert_for_customer(customer(7), &matter(6, 7, MatterState::New));

        assert_eq!(state.matters().len(), 2);
        assert_eq!(state.customer_matters().len(), 2);
        assert_consistent(&state);
    }

    #[test]
    fn scoped_create_for_other_customer_only_touches_global() {
        let mut state = MattersState::default();
        state.replace_customer_matters(customer(7), vec![matter(1, 7, MatterState::New)]);

        state.insert_for_customer(customer(8), &matter(2, 8, MatterState::New));

        assert_eq!(state.customer_matters().len(), 1);
        assert_eq!(state.matters().len(), 1);
        assert_eq!(state.customer_scope(), Some(customer(7)));
    }

    #[test]
    fn global_create_for_viewed_customer_lands_in_both() {
        let mut state = MattersState::default();
        state.replace_customer_matters(customer(7), Vec::new());

        state.insert(&matter(3, 7, MatterState::New));
        state.insert(&matter(4, 9, MatterState::New));

        assert_eq!(state.matters().len(), 2);
        assert_eq!(state.customer_matters().len(), 1);
        assert_consistent(&state);
    }

    #[test]
    fn delete_removes_everywhere_and_clears_matching_slot() {
        let mut state = MattersState::default();
        state.replace_all(vec![
            matter(1, 7, MatterState::New),
            matter(2, 7, MatterState::New),
        ]);
        state.replace_customer_matters(customer(7), vec![matter(1, 7, MatterState::New)]);
        assert!(state.select(MatterId::new(1).ok()));

        state.remove(MatterId::new(2).unwrap());
        assert!(state.selected().is_some());

        state.remove(MatterId::new(1).unwrap());
        assert!(state.selected().is_none());
        assert!(state.matters().is_empty());
        assert!(state.customer_matters().is_empty());
    }

    #[test]
    fn fetch_refreshes_shared_ids_in_other_collection() {
        let mut state = MattersState::default();
        state.replace_customer_matters(customer(7), vec![matter(1, 7, MatterState::New)]);
        state.replace_all(vec![matter(1, 7, MatterState::Completed)]);

        assert_eq!(state.customer_matters()[0].state, MatterState::Completed);
        assert_consistent(&state);
    }

    #[test]
    fn mixed_operation_sequence_stays_consistent() {
        let mut state = MattersState::default();
        state.replace_all(vec![matter(1, 7, MatterState::New)]);
        state.replace_customer_matters(customer(7), vec![matter(1, 7, MatterState::New)]);

        let steps: Vec<Box<dyn Fn(&mut MattersState)>> = vec![
            Box::new(|s| s.insert_for_customer(customer(7), &matter(2, 7, MatterState::New))),
            Box::new(|s| s.insert(&matter(3, 7, MatterState::New))),
            Box::new(|s| s.replace(&matter(1, 7, MatterState::Completed))),
            Box::new(|s| s.replace(&matter(3, 7, MatterState::InProgress))),
            Box::new(|s| s.remove(MatterId::new(2).unwrap())),
            Box::new(|s| s.insert(&matter(4, 8, MatterState::New))),
            Box::new(|s| s.replace(&matter(4, 8, MatterState::Completed))),
        ];

        for step in steps {
            step(&mut state);
            assert_consistent(&state);
        }

        let scoped: Vec<i32> = state.customer_matters().iter().map(|m| m.id.get()).collect();
        assert_eq!(scoped, [1, 3]);
        assert_eq!(state.matters().len(), 3);
    }

    #[test]
    fn removing_customer_drops_owned_matters() {
        let mut state = MattersState::default();
        state.replace_all(vec![
            matter(1, 7, MatterState::New),
            matter(2, 8, MatterState::New),
        ]);
        state.replace_customer_matters(customer(7), vec![matter(1, 7, MatterState::New)]);

        state.remove_owned_by(customer(7));

        assert_eq!(state.matters().len(), 1);
        assert!(state.customer_matters().is_empty());
        assert!(state.customer_scope().is_none());
    }
}
