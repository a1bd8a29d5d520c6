use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::store::AppState;
use crate::store::status::{OperationKind, RequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerOp {
    FetchAll,
    FetchOne,
    Create,
    Update,
    Delete,
}

impl OperationKind for CustomerOp {
    fn status(state: &mut AppState) -> &mut RequestStatus<Self> {
        &mut state.customers.status
    }
}

/// Customers in server order, keyed by id, plus the selected-customer slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomersState {
    customers: Vec<Customer>,
    selected: Option<Customer>,
    pub(crate) status: RequestStatus<CustomerOp>,
}

impl CustomersState {
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<&Customer> {
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

    /// Points the selected slot at a loaded customer, or clears it with `None`.
    /// Returns `false` when the id is not in the collection.
    pub fn select(&mut self, id: Option<CustomerId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) => match self.get(id).cloned() {
                Some(customer) => {
                    self.selected = Some(customer);
                    true
                }
                None => false,
            },
        }
    }

    pub(crate) fn replace_all(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
    }

    pub(crate) fn set_selected(&mut self, customer: Customer) {
        self.selected = Some(customer);
    }

    /// Appends a created customer; an entry with the same id is replaced instead.
    pub(crate) fn append(&mut self, customer: Customer) {
        match self.customers.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = customer,
            None => self.customers.push(customer),
        }
    }

    pub(crate) fn replace(&mut self, customer: &Customer) {
        if let Some(existing) = self.customers.iter_mut().find(|c| c.id == customer.id) {
            *existing = customer.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id == customer.id) {
            self.selected = Some(customer.clone());
        }
    }

    pub(crate) fn remove(&mut self, id: CustomerId) {
        self.customers.retain(|c| c.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
    }
}
