//! Mock gateway for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::customer::{Customer, CustomerUpdate, NewCustomer};
use crate::domain::matter::{Matter, MatterUpdate, NewMatter};
use crate::domain::types::{CustomerId, MatterId};
use crate::domain::user::{AuthResponse, Credentials, NewAccount, ProfileUpdate, User};
use crate::gateway::{AuthGateway, CustomerReader, CustomerWriter, MatterReader, MatterWriter};
use crate::storage::{StorageError, TokenStore};
use crate::transport::ApiResult;

mock! {
    pub Gateway {}

    #[async_trait]
    impl AuthGateway for Gateway {
        async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;
        async fn signup(&self, account: &NewAccount) -> ApiResult<AuthResponse>;
        async fn get_profile(&self) -> ApiResult<User>;
        async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User>;
    }

    #[async_trait]
    impl CustomerReader for Gateway {
        async fn list_customers(&self) -> ApiResult<Vec<Customer>>;
        async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer>;
    }

    #[async_trait]
    impl CustomerWriter for Gateway {
        async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<Customer>;
        async fn update_customer(
            &self,
            id: CustomerId,
            updates: &CustomerUpdate,
        ) -> ApiResult<Customer>;
        async fn delete_customer(&self, id: CustomerId) -> ApiResult<()>;
    }

    #[async_trait]
    impl MatterReader for Gateway {
        async fn list_matters(&self) -> ApiResult<Vec<Matter>>;
        async fn get_matter(&self, id: MatterId) -> ApiResult<Matter>;
        async fn list_customer_matters(&self, customer_id: CustomerId) -> ApiResult<Vec<Matter>>;
    }

    #[async_trait]
    impl MatterWriter for Gateway {
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
        async fn delete_customer_matter(
            &self,
            customer_id: CustomerId,
            id: MatterId,
        ) -> ApiResult<()>;
    }

    impl TokenStore for Gateway {
        fn load_token(&self) -> Option<String>;
        fn save_token(&self, token: &str) -> Result<(), StorageError>;
        fn clear_token(&self) -> Result<(), StorageError>;
    }
}
