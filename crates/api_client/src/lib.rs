//! Transport layer for the Stadia Maps APIs
//!
//! One [`ApiClient`] is shared by every service proxy. Each proxy declares
//! its remote operations as a static [`OperationDescriptor`] table, which
//! the client checks against the registered [`AuthStrategy`]s when the proxy
//! is created with [`ApiClient::create_service`].
//!
//! Proxy methods return a [`Call`]: await it for async use, or call
//! [`Call::execute`] to block the current thread.
//!
//! # Example
//!
//! ```rust,ignore
//! use api_client::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::from_config(&ClientConfig::load()?)?;
//! let geospatial = client.create_service::<GeospatialApi>()?;
//!
//! // async
//! let tz = geospatial.tz_lookup(seoul, None).await?;
//! // blocking
//! let tz = geospatial.tz_lookup(seoul, None).execute()?;
//! ```

mod auth;
mod call;
mod client;
mod config;
mod error;
mod operation;

pub use auth::{API_KEY_AUTH, ApiKeyAuth, AuthLocation, AuthStrategy, DEFAULT_API_KEY_PARAM};
pub use call::{ApiResponse, Call};
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{CONFIG_FILE, ClientConfig, DEFAULT_BASE_URL, ENV_PREFIX, EU_BASE_URL};
pub use error::{ConfigError, RemoteError, TransportError};
pub use operation::{API_KEY_ONLY, ApiSurface, HttpMethod, OperationDescriptor, RequestParts};
