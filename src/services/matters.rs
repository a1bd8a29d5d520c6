//! Matter operations, global and customer-scoped.
//!
//! Scoped variants hit the nested `/customers/{id}/matters` endpoints; both
//! kinds merge into the same two collections of the matters slice.

use crate::domain::matter::{Matter, MatterState, MatterUpdate, NewMatter};
use crate::domain::types::{CustomerId, MatterId};
use crate::domain::user::User;
use crate::forms::matter::{EditMatterForm, MatterForm};
use crate::gateway::{MatterReader, MatterWriter};
use crate::services::{ServiceError, ServiceResult, dispatch};
use crate::store::Store;
use crate::store::matters::MatterOp;
use crate::views::access::{can_delete, can_edit};

/// Refuses the operation when the signed-in user is known and the predicate
/// rejects a matter already loaded in the store.
fn ensure_allowed(
    store: &Store,
    id: MatterId,
    allowed: fn(Option<&User>, &Matter) -> bool,
) -> ServiceResult<()> {
    let permitted = store.read(|state| match (state.auth.user(), state.matters.get(id)) {
        (Some(user), Some(matter)) => allowed(Some(user), matter),
        _ => true,
    });
    if permitted {
        Ok(())
    } else {
        log::warn!("Refusing to modify matter {id}: not permitted for the signed-in user");
        Err(ServiceError::Forbidden)
    }
}

pub async fn fetch_matters<R>(gateway: &R, store: &Store) -> ServiceResult<Vec<Matter>>
where
    R: MatterReader + ?Sized,
{
    dispatch(
        store,
        MatterOp::FetchAll,
        gateway.list_matters(),
        |state, current, matters: &Vec<Matter>| {
            if current {
                state.matters.replace_all(matters.clone());
            }
        },
    )
    .await
}

/// Loads one matter into the selected slot.
pub async fn fetch_matter<R>(gateway: &R, store: &Store, id: MatterId) -> ServiceResult<Matter>
where
    R: MatterReader + ?Sized,
{
    dispatch(
        store,
        MatterOp::FetchOne,
        gateway.get_matter(id),
        |state, current, matter: &Matter| {
            if current {
                state.matters.set_selected(matter.clone());
            }
        },
    )
    .await
}

/// Loads the matters of one customer into the scoped collection.
pub async fn fetch_customer_matters<R>(
    gateway: &R,
    store: &Store,
    customer_id: CustomerId,
) -> ServiceResult<Vec<Matter>>
where
    R: MatterReader + ?Sized,
{
    dispatch(
        store,
        MatterOp::FetchForCustomer,
        gateway.list_customer_matters(customer_id),
        |state, current, matters: &Vec<Matter>| {
            if current {
                state
                    .matters
                    .replace_customer_matters(customer_id, matters.clone());
            }
        },
    )
    .await
}

pub async fn create_matter<W>(gateway: &W, store: &Store, form: MatterForm) -> ServiceResult<Matter>
where
    W: MatterWriter + ?Sized,
{
    let matter = NewMatter::try_from(form)?;

    dispatch(
        store,
        MatterOp::Create,
        gateway.create_matter(&matter),
        |state, _, created: &Matter| state.matters.insert(created),
    )
    .await
}

/// Opens a matter on behalf of a customer.
pub async fn create_customer_matter<W>(
    gateway: &W,
    store: &Store,
    customer_id: CustomerId,
    form: MatterForm,
) -> ServiceResult<Matter>
where
    W: MatterWriter + ?Sized,
{
    let matter = NewMatter::try_from(form)?;

    dispatch(
        store,
        MatterOp::CreateForCustomer,
        gateway.create_customer_matter(customer_id, &matter),
        |state, _, created: &Matter| state.matters.insert_for_customer(customer_id, created),
    )
    .await
}

async fn send_update<W>(
    gateway: &W,
    store: &Store,
    customer_id: Option<CustomerId>,
    id: MatterId,
    updates: MatterUpdate,
) -> ServiceResult<Matter>
where
    W: MatterWriter + ?Sized,
{
    ensure_allowed(store, id, can_edit)?;

    let call = async {
        match customer_id {
            Some(customer_id) => gateway.update_customer_matter(customer_id, id, &updates).await,
            None => gateway.update_matter(id, &updates).await,
        }
    };

    dispatch(store, MatterOp::Update, call, |state, _, updated: &Matter| {
        state.matters.replace(updated)
    })
    .await
}

/// Sends the fields filled in on the form; the result replaces every copy
/// of the matter held by the store.
pub async fn update_matter<W>(
    gateway: &W,
    store: &Store,
    id: MatterId,
    form: EditMatterForm,
) -> ServiceResult<Matter>
where
    W: MatterWriter + ?Sized,
{
    let updates = MatterUpdate::try_from(form)?;
    send_update(gateway, store, None, id, updates).await
}

pub async fn update_customer_matter<W>(
    gateway: &W,
    store: &Store,
    customer_id: CustomerId,
    id: MatterId,
    form: EditMatterForm,
) -> ServiceResult<Matter>
where
    W: MatterWriter + ?Sized,
{
    let updates = MatterUpdate::try_from(form)?;
    send_update(gateway, store, Some(customer_id), id, updates).await
}

/// Moves a matter to another lifecycle state.
pub async fn set_matter_state<W>(
    gateway: &W,
    store: &Store,
    id: MatterId,
    state: MatterState,
) -> ServiceResult<Matter>
where
    W: MatterWriter + ?Sized,
{
    send_update(gateway, store, None, id, MatterUpdate::state(state)).await
}

async fn send_delete<W>(
    gateway: &W,
    store: &Store,
    customer_id: Option<CustomerId>,
    id: MatterId,
) -> ServiceResult<()>
where
    W: MatterWriter + ?Sized,
{
    ensure_allowed(store, id, can_delete)?;

    let call = async {
        match customer_id {
            Some(customer_id) => gateway.delete_customer_matter(customer_id, id).await,
            None => gateway.delete_matter(id).await,
        }
    };

    dispatch(store, MatterOp::Delete, call, |state, _, _: &()| {
        state.matters.remove(id)
    })
    .await
}

pub async fn delete_matter<W>(gateway: &W, store: &Store, id: MatterId) -> ServiceResult<()>
where
    W: MatterWriter + ?Sized,
{
    send_delete(gateway, store, None, id).await
}

pub async fn delete_customer_matter<W>(
    gateway: &W,
    store: &Store,
    customer_id: CustomerId,
    id: MatterId,
) -> ServiceResult<()>
where
    W: MatterWriter + ?Sized,
{
    send_delete(gateway, store, Some(customer_id), id).await
}
