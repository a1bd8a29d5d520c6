//! Session lifecycle: login, signup, profile and logout.

use crate::domain::user::{AuthResponse, Credentials, NewAccount, ProfileUpdate, User};
use crate::forms::auth::{LoginForm, ProfileForm, SignupForm};
use crate::gateway::AuthGateway;
use crate::services::{ServiceResult, dispatch};
use crate::storage::TokenStore;
use crate::store::Store;
use crate::store::auth::AuthOp;

fn persist_token<T: TokenStore + ?Sized>(tokens: &T, response: &AuthResponse) {
    if let Err(err) = tokens.save_token(&response.token) {
        log::error!("Failed to persist session token: {err}");
    }
}

/// Validates the form, authenticates and persists the returned token.
pub async fn login<G>(gateway: &G, store: &Store, form: LoginForm) -> ServiceResult<User>
where
    G: AuthGateway + TokenStore + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    let response = dispatch(
        store,
        AuthOp::Login,
        gateway.login(&credentials),
        |state, _, response: &AuthResponse| state.auth.sign_in(response.clone()),
    )
    .await?;

    persist_token(gateway, &response);
    log::info!("Signed in as {}", response.user.email);

    Ok(response.user)
}

pub async fn signup<G>(gateway: &G, store: &Store, form: SignupForm) -> ServiceResult<User>
where
    G: AuthGateway + TokenStore + ?Sized,
{
    let account = NewAccount::try_from(form)?;

    let response = dispatch(
        store,
        AuthOp::Signup,
        gateway.signup(&account),
        |state, _, response: &AuthResponse| state.auth.sign_in(response.clone()),
    )
    .await?;

    persist_token(gateway, &response);
    log::info!("Registered {}", response.user.email);

    Ok(response.user)
}

/// Re-fetches the profile of the restored session.
pub async fn fetch_profile<G>(gateway: &G, store: &Store) -> ServiceResult<User>
where
    G: AuthGateway + ?Sized,
{
    dispatch(
        store,
        AuthOp::FetchProfile,
        gateway.get_profile(),
        |state, current, user: &User| {
            if current {
                state.auth.set_user(user.clone());
            }
        },
    )
    .await
}

/// Sends only the fields filled in on the form.
pub async fn update_profile<G>(gateway: &G, store: &Store, form: ProfileForm) -> ServiceResult<User>
where
    G: AuthGateway + ?Sized,
{
    let update = ProfileUpdate::try_from(form)?;

    dispatch(
        store,
        AuthOp::UpdateProfile,
        gateway.update_profile(&update),
        |state, _, user: &User| state.auth.set_user(user.clone()),
    )
    .await
}

/// Resets every slice and forgets the persisted token.
pub fn logout<T>(tokens: &T, store: &Store)
where
    T: TokenStore + ?Sized,
{
    store.update(|state| state.reset());
    if let Err(err) = tokens.clear_token() {
        log::error!("Failed to clear session token: {err}");
    }
    log::info!("Signed out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::gateway::fake::InMemoryBackend;
    use crate::services::ServiceError;
    use crate::store::AppState;
    use crate::transport::ApiError;

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_populates_session_and_persists_token() {
        let backend = InMemoryBackend::new();
        backend
            .register("Ada", "ada@example.com", "hunter2", Role::Admin)
            .unwrap();
        let store = Store::default();

        let user = login(&backend, &store, login_form("ada@example.com", "hunter2"))
            .await
            .unwrap();

        assert_eq!(user.name, "Ada");
        let state = store.snapshot();
        assert!(state.auth.is_authenticated());
        assert!(!state.auth.is_loading());
        assert!(state.auth.error().is_none());
        assert_eq!(backend.load_token().as_deref(), state.auth.token());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_gateway_or_store() {
        let backend = InMemoryBackend::new();
        backend.fail_next(ApiError::Network("should not be used".to_string()));
        let store = Store::default();

        let result = login(&backend, &store, login_form("not-an-email", "x")).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert_eq!(store.snapshot(), AppState::default());
    }

    #[tokio::test]
    async fn wrong_password_logs_out_with_message() {
        let backend = InMemoryBackend::new();
        backend
            .register("Ada", "ada@example.com", "hunter2", Role::Admin)
            .unwrap();
        let store = Store::default();

        let result = login(&backend, &store, login_form("ada@example.com", "nope")).await;

        assert!(matches!(result, Err(ServiceError::Api(ApiError::Unauthorized { .. }))));
        let state = store.snapshot();
        assert!(!state.auth.is_authenticated());
        assert!(!state.auth.is_loading());
        assert_eq!(state.auth.error(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn signup_signs_in() {
        let backend = InMemoryBackend::new();
        let store = Store::default();
        let form = SignupForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            password: "hunter2".to_string(),
            firm_name: Some("Lovelace LLP".to_string()),
        };

        let user = signup(&backend, &store, form).await.unwrap();

        assert_eq!(user.firm_name.as_deref(), Some("Lovelace LLP"));
        assert!(store.read(|s| s.auth.is_authenticated()));
        assert!(backend.load_token().is_some());
    }

    #[tokio::test]
    async fn profile_fetch_and_partial_update() {
        let backend = InMemoryBackend::new();
        backend.sign_in_as("Ada", Role::Customer).unwrap();
        let store = Store::restore(&backend);

        fetch_profile(&backend, &store).await.unwrap();
        assert_eq!(store.read(|s| s.auth.user().map(|u| u.name.clone())), Some("Ada".to_string()));

        let form = ProfileForm {
            phone: Some("777".to_string()),
            ..ProfileForm::default()
        };
        update_profile(&backend, &store, form).await.unwrap();

        let user = store.snapshot().auth.user().cloned().unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.phone, "777");
    }

    #[tokio::test]
    async fn logout_resets_everything() {
        let backend = InMemoryBackend::new();
        backend.sign_in_as("Ada", Role::Admin).unwrap();
        let store = Store::restore(&backend);
        fetch_profile(&backend, &store).await.unwrap();

        logout(&backend, &store);

        assert_eq!(store.snapshot().auth, AppState::default().auth);
        assert!(backend.load_token().is_none());
    }
}
