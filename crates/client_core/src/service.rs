use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use shared::domain::{UserEnvelope, UserId};
use tracing::{debug, warn};
use url::Url;

use crate::{error::FetchError, FetchOutcome};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "x-api-key";

#[async_trait]
pub trait UserFetchService: Send + Sync {
    /// Performs one request for the configured user. Every failure, whether
    /// transport, status or decode, comes back as `Err`.
    async fn fetch_user(&self) -> FetchOutcome;
}

pub struct MissingUserService;

#[async_trait]
impl UserFetchService for MissingUserService {
    async fn fetch_user(&self) -> FetchOutcome {
        Err(FetchError::Transport("user service is unavailable".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct UserServiceOptions {
    pub base_url: String,
    pub user_id: UserId,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for UserServiceOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: UserId::default(),
            api_key: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Fetches `{base_url}/users/{id}` and decodes the `{ "data": ... }` envelope.
pub struct HttpUserService {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpUserService {
    pub fn new(options: UserServiceOptions) -> Result<Self, FetchError> {
        let endpoint = user_endpoint(&options.base_url, options.user_id)?;
        let http = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|err| FetchError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            endpoint,
            api_key: options.api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UserFetchService for HttpUserService {
    async fn fetch_user(&self) -> FetchOutcome {
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json");
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key.as_str());
        }

        debug!(endpoint = %self.endpoint, "requesting user");
        let response = request.send().await.map_err(|err| {
            warn!(endpoint = %self.endpoint, "failed to reach user endpoint: {err}");
            FetchError::Transport(err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "user endpoint returned error");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let envelope: UserEnvelope = serde_json::from_slice(&body).map_err(|err| {
            warn!(endpoint = %self.endpoint, "invalid user response payload: {err}");
            FetchError::Decode(err.to_string())
        })?;
        Ok(envelope.into_record())
    }
}

fn user_endpoint(base_url: &str, user_id: UserId) -> Result<Url, FetchError> {
    let base_url = base_url.trim().trim_end_matches('/');
    let raw = format!("{base_url}/users/{}", user_id.0);
    let endpoint = Url::parse(&raw).map_err(|err| FetchError::InvalidEndpoint(format!("{raw}: {err}")))?;
    match endpoint.scheme() {
        "http" | "https" => Ok(endpoint),
        other => Err(FetchError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
