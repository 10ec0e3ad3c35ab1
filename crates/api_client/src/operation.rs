//! Static operation registry
//!
//! Each service surface declares its remote operations as a `const` table
//! of [`OperationDescriptor`]s. The client validates a surface's auth
//! requirements against that table when the proxy is created, and the
//! generic [`ApiClient::invoke`](crate::ApiClient::invoke) primitive uses a
//! descriptor plus [`RequestParts`] to issue the call.

use serde::Serialize;

use crate::auth::API_KEY_AUTH;
use crate::client::ApiClient;
use crate::error::TransportError;

/// HTTP verbs used by the API surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET with query parameters
    Get,
    /// POST with a JSON body
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
        }
    }
}

/// Auth names required by operations that use the default API key strategy
pub const API_KEY_ONLY: &[&str] = &[API_KEY_AUTH];

/// Build-time description of one remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Stable identifier, used in logs and error messages
    pub id: &'static str,
    /// HTTP verb
    pub method: HttpMethod,
    /// Path relative to the client's base URL, starting with `/`
    pub path: &'static str,
    /// Names of the auth strategies this operation requires
    pub auth: &'static [&'static str],
}

impl OperationDescriptor {
    /// A GET operation requiring the API key strategy
    #[must_use]
    pub const fn get(id: &'static str, path: &'static str) -> Self {
        Self {
            id,
            method: HttpMethod::Get,
            path,
            auth: API_KEY_ONLY,
        }
    }

    /// A POST operation requiring the API key strategy
    #[must_use]
    pub const fn post(id: &'static str, path: &'static str) -> Self {
        Self {
            id,
            method: HttpMethod::Post,
            path,
            auth: API_KEY_ONLY,
        }
    }

    /// Replace the required auth strategies
    #[must_use]
    pub const fn requires(mut self, auth: &'static [&'static str]) -> Self {
        self.auth = auth;
        self
    }
}

/// A family of operations bound to one shared [`ApiClient`]
///
/// Implementors are thin, stateless proxies: they hold a client handle and
/// map each method onto one descriptor from [`ApiSurface::operations`].
pub trait ApiSurface: Sized {
    /// Human-readable surface name
    const NAME: &'static str;

    /// Every operation this surface can issue
    fn operations() -> &'static [OperationDescriptor];

    /// Wrap a client handle; called only after auth validation passed
    fn bind(client: ApiClient) -> Self;

    /// Look up an operation by id
    fn operation(id: &str) -> Option<&'static OperationDescriptor> {
        Self::operations().iter().find(|op| op.id == id)
    }
}

/// Query parameters and body for one call
#[derive(Debug, Default)]
pub struct RequestParts {
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
    encode_error: Option<String>,
}

impl RequestParts {
    /// Empty request (no query, no body)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one query parameter
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Append a comma-joined list parameter, skipped when empty
    #[must_use]
    pub fn query_list<S: AsRef<str>>(self, key: &'static str, values: &[S]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.query(key, joined)
    }

    /// Append pre-built query pairs
    #[must_use]
    pub fn extend_query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body
    ///
    /// Encoding failures are deferred and reported when the call is sent,
    /// so building a call never fails.
    #[must_use]
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.encode_error = Some(e.to_string()),
        }
        self
    }

    /// Query pairs collected so far
    #[must_use]
    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// JSON body, if any
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> Result<(Vec<(&'static str, String)>, Option<serde_json::Value>), TransportError> {
        if let Some(err) = self.encode_error {
            return Err(TransportError::Encode(err));
        }
        Ok((self.query, self.body))
    }
}
