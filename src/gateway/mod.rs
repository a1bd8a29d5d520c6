//! Stateless request builders, one backend call per method.
//!
//! Reads and writes are split per entity so services can ask for exactly the
//! capabilities they use.

use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerUpdate, NewCustomer};
use crate::domain::matter::{Matter, MatterUpdate, NewMatter};
use crate::domain::types::{CustomerId, MatterId};
use crate::domain::user::{AuthResponse, Credentials, NewAccount, ProfileUpdate, User};
use crate::transport::ApiResult;

pub mod http;

#[cfg(any(test, feature = "test-mocks"))]
pub mod fake;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use http::HttpGateway;

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;
    async fn signup(&self, account: &NewAccount) -> ApiResult<AuthResponse>;
    async fn get_profile(&self) -> ApiResult<User>;
    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User>;
}

#[async_trait]
pub trait CustomerReader: Send + Sync {
    async fn list_customers(&self) -> ApiResult<Vec<Customer>>;
    async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer>;
}

#[async_trait]
pub trait CustomerWriter: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<Customer>;
    async fn update_customer(&self, id: CustomerId, updates: &CustomerUpdate) -> ApiResult<Customer>;
    async fn delete_customer(&self, id: CustomerId) -> ApiResult<()>;
}

#[async_trait]
pub trait MatterReader: Send + Sync {
    async fn list_matters(&self) -> ApiResult<Vec<Matter>>;
    async fn get_matter(&self, id: MatterId) -> ApiResult<Matter>;
    async fn list_customer_matters(&self, customer_id: CustomerId) -> ApiResult<Vec<Matter>>;
}

/// Global and customer-scoped matter mutations. Whether an operation is
/// scoped is the caller's decision.
#[async_trait]
pub trait MatterWriter: Send + Sync {
    async fn create_matter(&self, matter: &NewMatter) -> ApiResult<Matter>;
    async fn create_customer_matter(
        &self,
        customer_id: CustomerId,
        matter: &NewMatter,
    ) -> ApiResult<Matter>;
    async fn update_matter(&self, id: MatterId, updates: &MatterUpdate) -> ApiResult<Matter>;
    async fn update_customer_matter(
        &self,
        customer_id: CustomerId,
        id: MatterId,
        updates: &MatterUpdate,
    ) -> ApiResult<Matter>;
    async fn delete_matter(&self, id: MatterId) -> ApiResult<()>;
    async fn delete_customer_matter(&self, customer_id: CustomerId, id: MatterId) -> ApiResult<()>;
}
