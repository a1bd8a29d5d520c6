use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerUpdate, NewCustomer};
use crate::domain::matter::{Matter, MatterUpdate, NewMatter};
use crate::domain::types::{CustomerId, MatterId};
use crate::domain::user::{AuthResponse, Credentials, NewAccount, ProfileUpdate, User};
use crate::gateway::{AuthGateway, CustomerReader, CustomerWriter, MatterReader, MatterWriter};
use crate::storage::{StorageError, TokenStore};
use crate::transport::{ApiResult, Transport};

/// REST implementation of every gateway trait.
#[derive(Clone)]
pub struct HttpGateway {
    transport: Transport,
}

impl HttpGateway {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    fn tokens(&self) -> &Arc<dyn TokenStore> {
        self.transport.tokens()
    }
}

/// The gateway persists tokens through the same storage the transport reads.
impl TokenStore for HttpGateway {
    fn load_token(&self) -> Option<String> {
        self.tokens().load_token()
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.tokens().save_token(token)
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        self.tokens().clear_token()
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.transport.post("/auth/login", credentials).await
    }

    async fn signup(&self, account: &NewAccount) -> ApiResult<AuthResponse> {
        self.transport.post("/auth/signup", account).await
    }

    async fn get_profile(&self) -> ApiResult<User> {
        self.transport.get("/auth/me").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.transport.put("/auth/profile", update).await
    }
}

#[async_trait]
impl CustomerReader for HttpGateway {
    async fn list_customers(&self) -> ApiResult<Vec<Customer>> {
        self.transport.get("/customers").await
    }

    async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer> {
        self.transport.get(&format!("/customers/{id}")).await
    }
}

#[async_trait]
impl CustomerWriter for HttpGateway {
    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<Customer> {
        self.transport.post("/customers", customer).await
    }

    async fn update_customer(&self, id: CustomerId, updates: &CustomerUpdate) -> ApiResult<Customer> {
        self.transport.put(&format!("/customers/{id}"), updates).await
    }

    async fn delete_customer(&self, id: CustomerId) -> ApiResult<()> {
        self.transport.delete(&format!("/customers/{id}")).await
    }
}

#[async_trait]
impl MatterReader for HttpGateway {
    async fn list_matters(&self) -> ApiResult<Vec<Matter>> {
        self.transport.get("/matters").await
    }

    async fn get_matter(&self, id: MatterId) -> ApiResult<Matter> {
        self.transport.get(&format!("/matters/{id}")).await
    }

    async fn list_customer_matters(&self, customer_id: CustomerId) -> ApiResult<Vec<Matter>> {
        self.transport
            .get(&format!("/customers/{customer_id}/matters"))
            .await
    }
}

#[async_trait]
impl MatterWriter for HttpGateway {
    async fn create_matter(&self, matter: &NewMatter) -> ApiResult<Matter> {
        self.transport.post("/matters", matter).await
    }

    async fn create_customer_matter(
        &self,
        customer_id: CustomerId,
        matter: &NewMatter,
    ) -> ApiResult<Matter> {
        self.transport
            .post(&format!("/customers/{customer_id}/matters"), matter)
            .await
    }

    async fn update_matter(&self, id: MatterId, updates: &MatterUpdate) -> ApiResult<Matter> {
        self.transport.put(&format!("/matters/{id}"), updates).await
    }

    async fn update_customer_matter(
        &self,
        customer_id: CustomerId,
        id: MatterId,
        updates: &MatterUpdate,
    ) -> ApiResult<Matter> {
        self.transport
            .put(&format!("/customers/{customer_id}/matters/{id}"), updates)
            .await
    }

    async fn delete_matter(&self, id: MatterId) -> ApiResult<()> {
        self.transport.delete(&format!("/matters/{id}")).await
    }

    async fn delete_customer_matter(&self, customer_id: CustomerId, id: MatterId) -> ApiResult<()> {
        self.transport
            .delete(&format!("/customers/{customer_id}/matters/{id}"))
            .await
    }
}
