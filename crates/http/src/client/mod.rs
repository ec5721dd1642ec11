//! Wallet HTTP client
//!
//! Every call goes through the same pipeline: the request gate, the
//! network, and on a 401 from a protected endpoint a single session refresh
//! followed by one retry of the original request.

pub mod auth;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod refresh;
pub mod request;
pub mod users;
pub mod wallet;

pub use error::ClientError;
pub use gate::RequestGate;
pub use refresh::RefreshCoordinator;
pub use request::{ApiResponse, RequestDescriptor};

use reqwest::{Client, ClientBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use wallet_core::endpoints::REFRESH_PATH;
use wallet_core::{
    AuthFlagStore, ClientSettings, DEFAULT_USER_AGENT, MemoryFlagStore, PublicEndpoints,
};

/// Wallet API client
///
/// Cloning is cheap; clones share the connection pool, cookie jar, flag
/// store and refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    gate: RequestGate,
    refresh: Arc<RefreshCoordinator>,
    flags: Arc<dyn AuthFlagStore>,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The flag store consulted by the request gate
    pub fn flags(&self) -> &Arc<dyn AuthFlagStore> {
        &self.flags
    }

    /// Run a request through the gate and the refresh-and-retry pipeline
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthenticated`] when the gate rejects the
    /// request, [`ClientError::RefreshFailed`] when a 401 could not be
    /// recovered, and the underlying error otherwise
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, mut request: RequestDescriptor) -> Result<ApiResponse, ClientError> {
        loop {
            self.gate.check(&request)?;

            let generation = self.refresh.generation();
            match self.dispatch(&request).await {
                Err(err) if refresh::should_refresh(&err, &request, &self.gate) => {
                    request.retried = true;
                    debug!("Access rejected, refreshing session before retry");

                    if let Err(refresh_err) = self
                        .refresh
                        .refresh(generation, || self.refresh_once())
                        .await
                    {
                        warn!("Session refresh failed, clearing auth state: {refresh_err}");
                        self.flags.clear();
                        return Err(ClientError::RefreshFailed(Box::new(refresh_err)));
                    }
                }
                result => {
                    if matches!(&result, Err(e) if e.is_unauthorized())
                        && !self.gate.is_public(&request)
                    {
                        warn!("Protected request still unauthorized, clearing auth state");
                        self.flags.clear();
                    }
                    return result;
                }
            }
        }
    }

    /// Send a request and deserialize the response body
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; also fails if the body does not match `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, ClientError> {
        self.send(request).await?.json()
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(RequestDescriptor::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(RequestDescriptor::post(path).with_json(body)?)
            .await
    }

    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(RequestDescriptor::post(path)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(RequestDescriptor::put(path).with_json(body)?)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(RequestDescriptor::delete(path)).await
    }

    async fn refresh_once(&self) -> Result<(), ClientError> {
        let request = RequestDescriptor::post(REFRESH_PATH);
        self.gate.check(&request)?;
        self.dispatch(&request).await.map(|_| ())
    }

    /// Single network round trip, no gate and no retry
    async fn dispatch(&self, request: &RequestDescriptor) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), url);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            let body = if bytes.is_empty() {
                JsonValue::Null
            } else {
                serde_json::from_slice(&bytes)?
            };
            Ok(ApiResponse { status, body })
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message, request.clone()))
        }
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    flags: Option<Arc<dyn AuthFlagStore>>,
    public_endpoints: Option<PublicEndpoints>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    coalesce_refresh: Option<bool>,
}

impl ApiClientBuilder {
    /// Start from loaded settings
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let mut builder = Self::default()
            .base_url(settings.base_url.clone())
            .public_endpoints(settings.public_endpoints())
            .user_agent(settings.user_agent.clone())
            .coalesce_refresh(settings.coalesce_refresh);

        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        builder
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the store backing the auth flag, in-memory by default
    pub fn flag_store(mut self, flags: Arc<dyn AuthFlagStore>) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Replace the public endpoint set
    pub fn public_endpoints(mut self, endpoints: PublicEndpoints) -> Self {
        self.public_endpoints = Some(endpoints);
        self
    }

    /// Set the request timeout (ignored on wasm32)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Share one refresh between concurrent 401s (default on)
    pub fn coalesce_refresh(mut self, coalesce: bool) -> Self {
        self.coalesce_refresh = Some(coalesce);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.cookie_store(true);
            if let Some(timeout) = self.timeout {
                client_builder = client_builder.timeout(timeout);
            }
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );

        let client = client_builder.build()?;

        let flags = self
            .flags
            .unwrap_or_else(|| Arc::new(MemoryFlagStore::new()));
        let endpoints = Arc::new(self.public_endpoints.unwrap_or_default());

        Ok(ApiClient {
            client,
            base_url,
            gate: RequestGate::new(endpoints, Arc::clone(&flags)),
            refresh: Arc::new(RefreshCoordinator::new(
                self.coalesce_refresh.unwrap_or(true),
            )),
            flags,
        })
    }
}
