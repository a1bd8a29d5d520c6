//! Command line companion: restores (or opens) a session and logs a summary of
//! the matters visible to the signed-in user.

use std::env;
use std::process;
use std::sync::Arc;

use chrono::Utc;
use dotenvy::dotenv;

use pushkind_matters::forms::auth::LoginForm;
use pushkind_matters::gateway::HttpGateway;
use pushkind_matters::models::config::ClientConfig;
use pushkind_matters::services::auth::{fetch_profile, login};
use pushkind_matters::services::customers::fetch_customers;
use pushkind_matters::services::matters::fetch_matters;
use pushkind_matters::services::ServiceResult;
use pushkind_matters::storage::{FileTokenStore, TokenStore};
use pushkind_matters::store::Store;
use pushkind_matters::transport::Transport;
use pushkind_matters::views::DashboardSummary;
use pushkind_matters::views::access::is_admin;
use pushkind_matters::views::matters::{MatterFilter, MattersPage, overdue_matters};

async fn open_session(gateway: &HttpGateway, store: &Store) -> ServiceResult<bool> {
    if store.read(|state| state.auth.is_authenticated()) {
        log::info!("Restored stored session");
        fetch_profile(gateway, store).await?;
        return Ok(true);
    }

    match (env::var("APP_LOGIN_EMAIL"), env::var("APP_LOGIN_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            login(gateway, store, LoginForm { email, password }).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn summarize(gateway: &HttpGateway, store: &Store) -> ServiceResult<()> {
    fetch_matters(gateway, store).await?;
    if store.read(|state| is_admin(state.auth.user())) {
        fetch_customers(gateway, store).await?;
    }

    let filter = env::var("APP_MATTER_FILTER")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(MatterFilter::All);

    store.read(|state| {
        let user = state.auth.user();
        if let Some(user) = user {
            let dashboard = DashboardSummary::new(user);
            log::info!("{} Role: {} | Email: {}", dashboard.greeting, dashboard.role, dashboard.email);
        }

        let page = MattersPage::build(user, state.matters.matters(), filter);
        log::info!(
            "{}: {} total, {} new, {} in progress, {} completed",
            page.heading,
            page.stats.total,
            page.stats.new,
            page.stats.in_progress,
            page.stats.completed
        );
        for matter in &page.matters {
            log::info!("  #{} {} [{}]", matter.id, matter.title, matter.state.label());
        }

        let overdue = overdue_matters(page.matters.iter().copied(), Utc::now());
        if !overdue.is_empty() {
            log::warn!("{} matter(s) past their due date", overdue.len());
        }

        if page.show_customer {
            log::info!("{} customer(s)", state.customers.customers().len());
        }
    });

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            process::exit(1);
        }
    };

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_dir));
    let store = Store::restore(tokens.as_ref());

    let transport = match Transport::new(&config, tokens) {
        Ok(transport) => transport.with_unauthorized_hook(|| {
            log::warn!("Session ended by the backend; sign in again");
        }),
        Err(err) => {
            log::error!("Failed to set up HTTP transport: {err}");
            process::exit(1);
        }
    };
    let gateway = HttpGateway::new(transport);

    match open_session(&gateway, &store).await {
        Ok(true) => {}
        Ok(false) => {
            log::info!("No stored session; set APP_LOGIN_EMAIL and APP_LOGIN_PASSWORD to sign in");
            return;
        }
        Err(err) => {
            log::error!("Failed to open session: {err}");
            process::exit(1);
        }
    }

    if let Err(err) = summarize(&gateway, &store).await {
        log::error!("Failed to load matters: {err}");
        process::exit(1);
    }
}
