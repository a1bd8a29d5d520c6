//! HTTP transport shared by every gateway.
//!
//! Attaches the stored bearer token to each request, normalizes failures into
//! [`ApiError`] and reacts to `401` by clearing the stored token and firing
//! the unauthorized hook.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::config::ClientConfig;
use crate::storage::TokenStore;

pub mod errors;

pub use errors::{ApiError, ApiResult};

/// Callback fired after an unauthorized response; the UI uses it to show the login view.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl Transport {
    /// Builds a transport against `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| ApiError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            tokens,
            on_unauthorized: None,
        })
    }

    #[must_use]
    pub fn with_unauthorized_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        decode(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(self.request(Method::PUT, path).json(body))
            .await?;
        decode(response).await
    }

    /// Issues a `DELETE`; any response body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        log::debug!("{method} {url}");

        let builder = self.http.request(method, url);
        match self.tokens.load_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|err| {
            log::error!("Request failed without a response: {err}");
            ApiError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);
        if error.is_unauthorized() {
            self.handle_unauthorized();
        }
        Err(error)
    }

    fn handle_unauthorized(&self) {
        log::warn!("Backend rejected the session token; clearing it");
        if let Err(err) = self.tokens.clear_token() {
            log::error!("Failed to clear stored token: {err}");
        }
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}
