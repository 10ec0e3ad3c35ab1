//! Shared transport client
//!
//! One [`ApiClient`] owns the HTTP connection pool, the base URL and the
//! registered auth strategies. Service proxies created from it share all
//! three; cloning the client only clones an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::auth::{API_KEY_AUTH, ApiKeyAuth, AuthStrategy};
use crate::call::{ApiResponse, Call};
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{ConfigError, TransportError};
use crate::operation::{ApiSurface, OperationDescriptor, RequestParts};

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
    auth: BTreeMap<String, Arc<dyn AuthStrategy>>,
    http: Option<Client>,
}

impl fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("auth", &self.auth.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        let config = ClientConfig::default();
        Self {
            base_url: config.base_url,
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            user_agent: config.user_agent,
            auth: BTreeMap::new(),
            http: None,
        }
    }
}

impl ApiClientBuilder {
    /// Set the base URL every operation path is appended to
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the total request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Register a named auth strategy
    ///
    /// Registering a second strategy under the same name replaces the first.
    #[must_use]
    pub fn add_authorization(
        mut self,
        name: impl Into<String>,
        strategy: impl AuthStrategy + 'static,
    ) -> Self {
        self.auth.insert(name.into(), Arc::new(strategy));
        self
    }

    /// Register an API key under the default [`API_KEY_AUTH`] name
    #[must_use]
    pub fn api_key(self, auth: ApiKeyAuth) -> Self {
        self.add_authorization(API_KEY_AUTH, auth)
    }

    /// Use a pre-configured reqwest client (timeouts and user agent are then ignored)
    #[must_use]
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` for unparsable or non-HTTP
    /// URLs and `ConfigError::HttpClient` if reqwest cannot initialize.
    pub fn build(self) -> Result<ApiClient, ConfigError> {
        let base_url = normalize_base_url(&self.base_url)?;
        let timeout = self.http.is_none().then_some(self.timeout);

        let http = match self.http {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .connect_timeout(self.connect_timeout)
                .user_agent(&self.user_agent)
                .build()
                .map_err(|e| ConfigError::HttpClient(e.to_string()))?,
        };

        info!(
            base_url = %base_url,
            auth = ?self.auth.keys().collect::<Vec<_>>(),
            "API client initialized"
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout,
                auth: self.auth,
                blocking: OnceLock::new(),
            }),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.query().is_some() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "base URL must not carry a query string".to_string(),
        });
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[derive(Debug)]
struct ClientInner {
    http: Client,
    base_url: String,
    timeout: Option<Duration>,
    auth: BTreeMap<String, Arc<dyn AuthStrategy>>,
    blocking: OnceLock<Runtime>,
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        // The last handle may be released on an async worker, where a
        // blocking runtime shutdown would panic.
        if let Some(runtime) = self.blocking.take() {
            runtime.shutdown_background();
        }
    }
}

/// HTTP transport shared by every service proxy
///
/// Holds no per-call state; clones share the same connection pool and the
/// same read-only set of auth strategies, so concurrent use from many
/// tasks needs no locking.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Start building a client
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Client for `base_url` with default timeouts and no auth strategies
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().base_url(base_url).build()
    }

    /// Client for the default global endpoint with an API key attached
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_api_key(key: impl Into<secrecy::SecretString>) -> Result<Self, ConfigError> {
        Self::builder()
            .base_url(DEFAULT_BASE_URL)
            .api_key(ApiKeyAuth::query(key))
            .build()
    }

    /// Client built from a loaded [`ClientConfig`]
    ///
    /// Registers the query-parameter API key strategy when the config
    /// carries a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the HTTP client cannot be initialized.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = Self::builder()
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());

        if let Some(key) = &config.api_key {
            builder = builder.api_key(ApiKeyAuth::query(key.clone()));
        } else {
            warn!("No API key configured; authenticated operations cannot be bound");
        }

        builder.build()
    }

    /// Normalized base URL (no trailing slash)
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Names of the registered auth strategies
    #[must_use]
    pub fn auth_names(&self) -> Vec<&str> {
        self.inner.auth.keys().map(String::as_str).collect()
    }

    /// Whether a strategy is registered under `name`
    #[must_use]
    pub fn has_auth(&self, name: &str) -> bool {
        self.inner.auth.contains_key(name)
    }

    /// Create a typed service proxy sharing this client
    ///
    /// Pure construction: no request is issued. Every auth strategy that
    /// any of the surface's operations requires must already be registered.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingAuthStrategy` naming the first
    /// operation whose requirement is not met.
    pub fn create_service<S: ApiSurface>(&self) -> Result<S, ConfigError> {
        for op in S::operations() {
            if let Some(missing) = op.auth.iter().find(|name| !self.has_auth(name)) {
                return Err(ConfigError::MissingAuthStrategy {
                    surface: S::NAME,
                    operation: op.id,
                    name: (*missing).to_string(),
                });
            }
        }

        debug!(surface = S::NAME, operations = S::operations().len(), "Service bound");
        Ok(S::bind(self.clone()))
    }

    /// Prepare a call to `operation`
    ///
    /// The generic primitive behind every proxy method. Nothing is sent
    /// until the returned [`Call`] is awaited or executed.
    pub fn invoke<T>(&self, operation: &'static OperationDescriptor, parts: RequestParts) -> Call<T> {
        Call::new(self.clone(), operation, parts)
    }

    /// Full URL for an operation path
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    #[instrument(
        skip(self, parts),
        fields(operation = operation.id, method = ?operation.method, path = operation.path)
    )]
    pub(crate) async fn dispatch<T: DeserializeOwned>(
        &self,
        operation: &'static OperationDescriptor,
        parts: RequestParts,
    ) -> Result<ApiResponse<T>, TransportError> {
        let (query, body) = parts.into_parts()?;
        let url = self.endpoint_url(operation.path);

        let mut request = self.inner.http.request(operation.method.into(), &url);
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }
        for name in operation.auth {
            if let Some(strategy) = self.inner.auth.get(*name) {
                request = strategy.authorize(request);
            }
        }

        debug!(params = query.len(), has_body = body.is_some(), "Dispatching request");

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_send(&e, self.inner.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::ResponseBody(e.to_string()))?;

        if status.is_success() {
            debug!(%status, bytes = text.len(), "Response received");
        } else {
            warn!(%status, "Remote service returned an error status");
        }

        ApiResponse::from_raw(status, &text)
    }

    pub(crate) fn blocking_runtime(&self) -> Result<&Runtime, TransportError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(TransportError::Runtime(
                "execute() called from within an async runtime; await the call instead"
                    .to_string(),
            ));
        }
        if let Some(runtime) = self.inner.blocking.get() {
            return Ok(runtime);
        }
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Runtime(e.to_string()))?;
        Ok(self.inner.blocking.get_or_init(|| runtime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationDescriptor;

    const PING: OperationDescriptor = OperationDescriptor::get("ping", "/ping");
    const OPEN: OperationDescriptor = OperationDescriptor::get("open", "/open").requires(&[]);
    const SIGNED: OperationDescriptor =
        OperationDescriptor::post("signed", "/signed").requires(&["ApiKeyAuth", "Signature"]);

    #[derive(Debug)]
    struct PingApi {
        client: ApiClient,
    }

    impl ApiSurface for PingApi {
        const NAME: &'static str = "PingApi";

        fn operations() -> &'static [OperationDescriptor] {
            &[PING, OPEN]
        }

        fn bind(client: ApiClient) -> Self {
            Self { client }
        }
    }

    #[derive(Debug)]
    struct SignedApi;

    impl ApiSurface for SignedApi {
        const NAME: &'static str = "SignedApi";

        fn operations() -> &'static [OperationDescriptor] {
            &[SIGNED]
        }

        fn bind(_client: ApiClient) -> Self {
            Self
        }
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("https://api.stadiamaps.com/").unwrap();
        assert_eq!(client.base_url(), "https://api.stadiamaps.com");
        assert_eq!(
            client.endpoint_url("/tz/lookup/v1"),
            "https://api.stadiamaps.com/tz/lookup/v1"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let client = ApiClient::new("http://localhost:8080/proxy/").unwrap();
        assert_eq!(
            client.endpoint_url("/route/v1"),
            "http://localhost:8080/proxy/route/v1"
        );
    }

    #[test]
    fn test_invalid_base_urls() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiClient::new("ftp://api.stadiamaps.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiClient::new("https://api.stadiamaps.com?x=1"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_create_service_requires_registered_auth() {
        let client = ApiClient::new("https://api.stadiamaps.com").unwrap();
        let err = client.create_service::<PingApi>().unwrap_err();
        match err {
            ConfigError::MissingAuthStrategy {
                surface,
                operation,
                name,
            } => {
                assert_eq!(surface, "PingApi");
                assert_eq!(operation, "ping");
                assert_eq!(name, "ApiKeyAuth");
            },
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_create_service_binds_shared_client() {
        let client = ApiClient::with_api_key("test-key").unwrap();
        let service = client.create_service::<PingApi>().unwrap();
        assert!(Arc::ptr_eq(&service.client.inner, &client.inner));
    }

    #[test]
    fn test_every_required_strategy_is_checked() {
        let client = ApiClient::with_api_key("test-key").unwrap();
        let err = client.create_service::<SignedApi>().unwrap_err();
        assert!(err.to_string().contains("Signature"));

        let client = ApiClient::builder()
            .api_key(ApiKeyAuth::query("test-key"))
            .add_authorization("Signature", ApiKeyAuth::header("X-Signature", "sig"))
            .build()
            .unwrap();
        assert!(client.create_service::<SignedApi>().is_ok());
        assert_eq!(client.auth_names(), vec!["ApiKeyAuth", "Signature"]);
    }

    #[test]
    fn test_operation_lookup() {
        assert_eq!(PingApi::operation("open").map(|op| op.path), Some("/open"));
        assert!(PingApi::operation("missing").is_none());
    }

    #[test]
    fn test_from_config_registers_api_key() {
        let config = ClientConfig::for_testing().with_api_key("from-config");
        let client = ApiClient::from_config(&config).unwrap();
        assert!(client.has_auth(API_KEY_AUTH));

        let anonymous = ApiClient::from_config(&ClientConfig::for_testing()).unwrap();
        assert!(!anonymous.has_auth(API_KEY_AUTH));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = ApiClient::with_api_key("very-secret-key").unwrap();
        assert!(!format!("{client:?}").contains("very-secret-key"));
    }

    #[tokio::test]
    async fn test_execute_inside_runtime_is_rejected() {
        let client = ApiClient::with_api_key("k").unwrap();
        let call: Call<serde_json::Value> = client.invoke(&PING, RequestParts::new());
        assert!(matches!(call.execute(), Err(TransportError::Runtime(_))));
    }
}
