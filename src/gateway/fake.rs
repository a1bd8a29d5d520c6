//! In-memory backend used by service and scenario tests.
//!
//! Behaves like the REST API closely enough for store-level assertions:
//! ids are assigned sequentially and shared between users and customers,
//! matters created under a customer are owned by that customer, and a
//! queued failure is returned by the next call instead of its result.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use parking_lot::Mutex;

use crate::domain::customer::{Customer, CustomerUpdate, NewCustomer};
use crate::domain::matter::{Matter, MatterState, MatterUpdate, NewMatter};
use crate::domain::types::{CustomerId, MatterId, UserId};
use crate::domain::user::{AuthResponse, Credentials, NewAccount, ProfileUpdate, Role, User};
use crate::gateway::{AuthGateway, CustomerReader, CustomerWriter, MatterReader, MatterWriter};
use crate::storage::{MemoryTokenStore, StorageError, TokenStore};
use crate::transport::{ApiError, ApiResult};

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct BackendState {
    accounts: Vec<Account>,
    session: Option<UserId>,
    customers: Vec<Customer>,
    matters: Vec<Matter>,
    last_id: i32,
    failures: VecDeque<ApiError>,
}

impl BackendState {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn next_user_id(&mut self) -> ApiResult<UserId> {
        UserId::new(self.next_id()).map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn session_user(&self) -> ApiResult<&User> {
        self.session
            .and_then(|id| self.accounts.iter().find(|a| a.user.id == id))
            .map(|a| &a.user)
            .ok_or_else(unauthorized)
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized {
        message: "Unauthorized".to_string(),
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Server {
        status: 404,
        message: format!("{what} not found"),
    }
}

fn midnight(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn token_for(id: UserId) -> String {
    format!("session-{id}")
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
    tokens: MemoryTokenStore,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can log in with `password`.
    pub fn register(&self, name: &str, email: &str, password: &str, role: Role) -> ApiResult<User> {
        let mut state = self.state.lock();
        let user = User {
            id: state.next_user_id()?,
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            role,
            created_at: Some(Utc::now()),
            matters_count: 0,
            pending_matters_count: 0,
            in_progress_matters_count: 0,
            completed_matters_count: 0,
            firm_name: None,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(user)
    }

    /// Registers an account and opens a session for it, as if it had logged in.
    pub fn sign_in_as(&self, name: &str, role: Role) -> ApiResult<User> {
        let email = format!("{}@example.com", name.to_lowercase());
        let user = self.register(name, &email, "secret", role)?;
        self.state.lock().session = Some(user.id);
        self.tokens.save_token(&token_for(user.id)).ok();
        Ok(user)
    }

    /// Stores a matter as the backend would have it.
    pub fn seed_matter(&self, matter: Matter) {
        let mut state = self.state.lock();
        state.last_id = state.last_id.max(matter.id.get());
        state.matters.push(matter);
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.state.lock().failures.push_back(error);
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.state.lock().customers.clone()
    }

    pub fn matters(&self) -> Vec<Matter> {
        self.state.lock().matters.clone()
    }

    /// Pops a queued failure. An unauthorized failure drops the session
    /// token like the real transport does.
    fn check(&self) -> ApiResult<()> {
        let failure = self.state.lock().failures.pop_front();
        match failure {
            Some(err) => {
                if err.is_unauthorized() {
                    self.tokens.clear_token().ok();
                    self.state.lock().session = None;
                }
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn build_matter(
        state: &mut BackendState,
        owner_id: UserId,
        matter: &NewMatter,
    ) -> ApiResult<Matter> {
        let id = MatterId::new(state.next_id())
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let now = Utc::now();
        let created = Matter {
            id,
            title: matter.title.to_string(),
            description: matter.description.clone(),
            state: matter.state,
            due_date: matter.due_date.map(midnight),
            created_at: now,
            updated_at: now,
            owner_id,
            owner: None,
        };
        state.matters.push(created.clone());
        Ok(created)
    }

    fn apply_matter_update(
        state: &mut BackendState,
        id: MatterId,
        owner: Option<UserId>,
        updates: &MatterUpdate,
    ) -> ApiResult<Matter> {
        let matter = state
            .matters
            .iter_mut()
            .find(|m| m.id == id && owner.is_none_or(|owner| m.owner_id == owner))
            .ok_or_else(|| not_found("Matter"))?;
        if let Some(title) = &updates.title {
            matter.title = title.to_string();
        }
        if let Some(description) = &updates.description {
            matter.description = Some(description.clone());
        }
        if let Some(new_state) = updates.state {
            matter.state = new_state;
        }
        if let Some(due_date) = updates.due_date {
            matter.due_date = Some(midnight(due_date));
        }
        matter.updated_at = Utc::now();
        Ok(matter.clone())
    }

    fn remove_matter(state: &mut BackendState, id: MatterId, owner: Option<UserId>) -> ApiResult<()> {
        let before = state.matters.len();
        state
            .matters
            .retain(|m| !(m.id == id && owner.is_none_or(|owner| m.owner_id == owner)));
        if state.matters.len() == before {
            return Err(not_found("Matter"));
        }
        Ok(())
    }

    fn visible_matters(state: &BackendState) -> ApiResult<Vec<Matter>> {
        let user = state.session_user()?;
        Ok(state
            .matters
            .iter()
            .filter(|m| user.role == Role::Admin || m.owner_id == user.id)
            .cloned()
            .collect())
    }

    fn with_counters(state: &BackendState, mut customer: Customer) -> Customer {
        let owner = UserId::from(customer.id);
        let owned = state.matters.iter().filter(|m| m.owner_id == owner);
        let count = |wanted: MatterState| {
            state
                .matters
                .iter()
                .filter(|m| m.owner_id == owner && m.state == wanted)
                .count() as u32
        };
        customer.matters_count = owned.count() as u32;
        customer.pending_matters_count = count(MatterState::New);
        customer.in_progress_matters_count = count(MatterState::InProgress);
        customer.completed_matters_count = count(MatterState::Completed);
        customer
    }
}

impl TokenStore for InMemoryBackend {
    fn load_token(&self) -> Option<String> {
        self.tokens.load_token()
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.tokens.save_token(token)
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        self.tokens.clear_token()
    }
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.check()?;
        let mut state = self.state.lock();
        let user = state
            .accounts
            .iter()
            .find(|a| {
                a.user.email == credentials.email.as_str()
                    && a.password == credentials.password.as_str()
            })
            .map(|a| a.user.clone())
            .ok_or_else(|| ApiError::Unauthorized {
                message: "Invalid email or password".to_string(),
            })?;
        state.session = Some(user.id);
        Ok(AuthResponse {
            token: token_for(user.id),
            user,
        })
    }

    async fn signup(&self, account: &NewAccount) -> ApiResult<AuthResponse> {
        self.check()?;
        if self
            .state
            .lock()
            .accounts
            .iter()
            .any(|a| a.user.email == account.email.as_str())
        {
            return Err(ApiError::Validation {
                status: 422,
                message: "Validation failed".to_string(),
                field_errors: vec!["email has already been taken".to_string()],
            });
        }
        let mut user = self.register(
            &account.name,
            account.email.as_str(),
            &account.password,
            Role::Admin,
        )?;
        user.phone = account.phone.to_string();
        user.firm_name = account.firm_name.clone();
        let mut state = self.state.lock();
        if let Some(stored) = state.accounts.iter_mut().find(|a| a.user.id == user.id) {
            stored.user = user.clone();
        }
        state.session = Some(user.id);
        Ok(AuthResponse {
            token: token_for(user.id),
            user,
        })
    }

    async fn get_profile(&self) -> ApiResult<User> {
        self.check()?;
        self.state.lock().session_user().cloned()
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.check()?;
        let mut state = self.state.lock();
        let id = state.session_user()?.id;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == id)
            .ok_or_else(unauthorized)?;
        if let Some(name) = &update.name {
            account.user.name = name.to_string();
        }
        if let Some(email) = &update.email {
            account.user.email = email.to_string();
        }
        if let Some(phone) = &update.phone {
            account.user.phone = phone.to_string();
        }
        if let Some(firm_name) = &update.firm_name {
            account.user.firm_name = Some(firm_name.clone());
        }
        Ok(account.user.clone())
    }
}

#[async_trait]
impl CustomerReader for InMemoryBackend {
    async fn list_customers(&self) -> ApiResult<Vec<Customer>> {
        self.check()?;
        let state = self.state.lock();
        state.session_user()?;
        Ok(state
            .customers
            .iter()
            .map(|c| Self::with_counters(&state, c.clone()))
            .collect())
    }

    async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer> {
        self.check()?;
        let state = self.state.lock();
        state.session_user()?;
        state
            .customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| Self::with_counters(&state, c.clone()))
            .ok_or_else(|| not_found("Customer"))
    }
}

#[async_trait]
impl CustomerWriter for InMemoryBackend {
    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<Customer> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        let id = CustomerId::new(state.next_id())
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let now = Utc::now();
        let created = Customer {
            id,
            name: customer.name.to_string(),
            email: customer.email.to_string(),
            phone: customer.phone.to_string(),
            created_at: now,
            updated_at: now,
            matters_count: 0,
            pending_matters_count: 0,
            in_progress_matters_count: 0,
            completed_matters_count: 0,
        };
        state.customers.push(created.clone());
        Ok(created)
    }

    async fn update_customer(&self, id: CustomerId, updates: &CustomerUpdate) -> ApiResult<Customer> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Customer"))?;
        if let Some(name) = &updates.name {
            customer.name = name.to_string();
        }
        if let Some(email) = &updates.email {
            customer.email = email.to_string();
        }
        if let Some(phone) = &updates.phone {
            customer.phone = phone.to_string();
        }
        customer.updated_at = Utc::now();
        let updated = customer.clone();
        Ok(Self::with_counters(&state, updated))
    }

    async fn delete_customer(&self, id: CustomerId) -> ApiResult<()> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        let before = state.customers.len();
        state.customers.retain(|c| c.id != id);
        if state.customers.len() == before {
            return Err(not_found("Customer"));
        }
        let owner = UserId::from(id);
        state.matters.retain(|m| m.owner_id != owner);
        Ok(())
    }
}

#[async_trait]
impl MatterReader for InMemoryBackend {
    async fn list_matters(&self) -> ApiResult<Vec<Matter>> {
        self.check()?;
        Self::visible_matters(&self.state.lock())
    }

    async fn get_matter(&self, id: MatterId) -> ApiResult<Matter> {
        self.check()?;
        Self::visible_matters(&self.state.lock())?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Matter"))
    }

    async fn list_customer_matters(&self, customer_id: CustomerId) -> ApiResult<Vec<Matter>> {
        self.check()?;
        let owner = UserId::from(customer_id);
        Ok(Self::visible_matters(&self.state.lock())?
            .into_iter()
            .filter(|m| m.owner_id == owner)
            .collect())
    }
}

#[async_trait]
impl MatterWriter for InMemoryBackend {
    async fn create_matter(&self, matter: &NewMatter) -> ApiResult<Matter> {
        self.check()?;
        let mut state = self.state.lock();
        let owner = state.session_user()?.id;
        Self::build_matter(&mut state, owner, matter)
    }

    async fn create_customer_matter(
        &self,
        customer_id: CustomerId,
        matter: &NewMatter,
    ) -> ApiResult<Matter> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        Self::build_matter(&mut state, UserId::from(customer_id), matter)
    }

    async fn update_matter(&self, id: MatterId, updates: &MatterUpdate) -> ApiResult<Matter> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        Self::apply_matter_update(&mut state, id, None, updates)
    }

    async fn update_customer_matter(
        &self,
        customer_id: CustomerId,
        id: MatterId,
        updates: &MatterUpdate,
    ) -> ApiResult<Matter> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        Self::apply_matter_update(&mut state, id, Some(UserId::from(customer_id)), updates)
    }

    async fn delete_matter(&self, id: MatterId) -> ApiResult<()> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        Self::remove_matter(&mut state, id, None)
    }

    async fn delete_customer_matter(&self, customer_id: CustomerId, id: MatterId) -> ApiResult<()> {
        self.check()?;
        let mut state = self.state.lock();
        state.session_user()?;
        Self::remove_matter(&mut state, id, Some(UserId::from(customer_id)))
    }
}
