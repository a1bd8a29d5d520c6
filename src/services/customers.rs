//! Customer management operations.

use crate::domain::customer::{Customer, CustomerUpdate, NewCustomer};
use crate::domain::types::CustomerId;
use crate::forms::customer::{CustomerForm, EditCustomerForm};
use crate::gateway::{CustomerReader, CustomerWriter};
use crate::services::{ServiceResult, dispatch};
use crate::store::Store;
use crate::store::customers::CustomerOp;

/// Replaces the collection with the server listing.
pub async fn fetch_customers<R>(gateway: &R, store: &Store) -> ServiceResult<Vec<Customer>>
where
    R: CustomerReader + ?Sized,
{
    dispatch(
        store,
        CustomerOp::FetchAll,
        gateway.list_customers(),
        |state, current, customers: &Vec<Customer>| {
            if current {
                state.customers.replace_all(customers.clone());
            }
        },
    )
    .await
}

/// Loads one customer into the selected slot.
pub async fn fetch_customer<R>(gateway: &R, store: &Store, id: CustomerId) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    dispatch(
        store,
        CustomerOp::FetchOne,
        gateway.get_customer(id),
        |state, current, customer: &Customer| {
            if current {
                state.customers.set_selected(customer.clone());
            }
        },
    )
    .await
}

pub async fn create_customer<W>(gateway: &W, store: &Store, form: CustomerForm) -> ServiceResult<Customer>
where
    W: CustomerWriter + ?Sized,
{
    let customer = NewCustomer::try_from(form)?;

    dispatch(
        store,
        CustomerOp::Create,
        gateway.create_customer(&customer),
        |state, _, created: &Customer| state.customers.append(created.clone()),
    )
    .await
}

pub async fn update_customer<W>(
    gateway: &W,
    store: &Store,
    id: CustomerId,
    form: EditCustomerForm,
) -> ServiceResult<Customer>
where
    W: CustomerWriter + ?Sized,
{
    let updates = CustomerUpdate::try_from(form)?;

    dispatch(
        store,
        CustomerOp::Update,
        gateway.update_customer(id, &updates),
        |state, _, updated: &Customer| state.customers.replace(updated),
    )
    .await
}

/// Deletes the customer and drops every matter they owned.
pub async fn delete_customer<W>(gateway: &W, store: &Store, id: CustomerId) -> ServiceResult<()>
where
    W: CustomerWriter + ?Sized,
{
    dispatch(
        store,
        CustomerOp::Delete,
        gateway.delete_customer(id),
        |state, _, _: &()| {
            state.customers.remove(id);
            state.matters.remove_owned_by(id);
        },
    )
    .await
}
