//! Deferred calls and their responses

use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::{RemoteError, TransportError};
use crate::operation::{OperationDescriptor, RequestParts};

/// Result of a call that reached the remote service
///
/// Non-2xx statuses are ordinary values here: `body` is `None` and the raw
/// text the service sent is kept in `error_body`. Check
/// [`is_successful`](Self::is_successful) before trusting a body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Option<T>,
    error_body: Option<String>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode a raw response
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Decode` when a non-empty 2xx body does not
    /// match `T`. An empty 2xx body (e.g. 204) decodes as JSON `null` when
    /// `T` allows it and otherwise leaves `body` as `None`.
    pub fn from_raw(status: StatusCode, text: &str) -> Result<Self, TransportError> {
        if !status.is_success() {
            return Ok(Self::failure(status, text));
        }
        if text.trim().is_empty() {
            return Ok(Self {
                status,
                body: serde_json::from_str("null").ok(),
                error_body: None,
            });
        }

        let body = serde_json::from_str(text).map_err(|e| TransportError::Decode {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        Ok(Self {
            status,
            body: Some(body),
            error_body: None,
        })
    }
}

impl<T> ApiResponse<T> {
    fn failure(status: StatusCode, text: &str) -> Self {
        Self {
            status,
            body: None,
            error_body: (!text.is_empty()).then(|| text.to_string()),
        }
    }

    /// HTTP status
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// HTTP status as an integer
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.status.as_u16()
    }

    /// True for 2xx statuses
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Decoded body of a successful response
    #[must_use]
    pub const fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    /// Take the decoded body
    #[must_use]
    pub fn into_body(self) -> Option<T> {
        self.body
    }

    /// Raw body of a failed response
    #[must_use]
    pub fn error_body(&self) -> Option<&str> {
        self.error_body.as_deref()
    }

    /// Convert into a `Result`, turning non-2xx statuses into [`RemoteError`]
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the status is not successful, or when a
    /// successful response carried no body `T` could be read from.
    pub fn into_result(self) -> Result<T, RemoteError> {
        match self.body {
            Some(body) if self.status.is_success() => Ok(body),
            _ => Err(RemoteError {
                status: self.status.as_u16(),
                body: self.error_body,
            }),
        }
    }

    /// Transform the body, keeping status and error body
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            body: self.body.map(f),
            error_body: self.error_body,
        }
    }
}

/// A prepared call to one operation
///
/// Nothing is sent until the call is awaited (async use) or
/// [`execute`](Self::execute)d (blocking use). Each `Call` issues exactly
/// one request.
#[must_use = "a Call does nothing until it is awaited or executed"]
pub struct Call<T> {
    client: ApiClient,
    operation: &'static OperationDescriptor,
    parts: RequestParts,
    response: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("operation", &self.operation.id)
            .field("method", &self.operation.method)
            .field("path", &self.operation.path)
            .finish_non_exhaustive()
    }
}

impl<T> Call<T> {
    pub(crate) fn new(
        client: ApiClient,
        operation: &'static OperationDescriptor,
        parts: RequestParts,
    ) -> Self {
        Self {
            client,
            operation,
            parts,
            response: PhantomData,
        }
    }

    /// Descriptor of the operation this call targets
    #[must_use]
    pub const fn operation(&self) -> &'static OperationDescriptor {
        self.operation
    }

    /// Query and body that will be sent
    #[must_use]
    pub const fn parts(&self) -> &RequestParts {
        &self.parts
    }
}

impl<T: DeserializeOwned + Send + 'static> Call<T> {
    /// Send the request and wait for the response asynchronously
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no HTTP response could be obtained
    /// or a 2xx body could not be decoded.
    pub async fn send(self) -> Result<ApiResponse<T>, TransportError> {
        self.client.dispatch(self.operation, self.parts).await
    }

    /// Send the request and block the current thread until it completes
    ///
    /// Runs on the client's private current-thread runtime. Must not be
    /// called from inside an async context; await the call there instead.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send), plus `TransportError::Runtime` if the
    /// blocking runtime cannot be started.
    pub fn execute(self) -> Result<ApiResponse<T>, TransportError> {
        let client = self.client.clone();
        let runtime = client.blocking_runtime()?;
        runtime.block_on(self.send())
    }
}

impl<T: DeserializeOwned + Send + 'static> IntoFuture for Call<T> {
    type Output = Result<ApiResponse<T>, TransportError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TzBody {
        tz_id: String,
    }

    #[test]
    fn test_success_decodes_body() {
        let res: ApiResponse<TzBody> =
            ApiResponse::from_raw(StatusCode::OK, r#"{"tz_id": "Asia/Seoul"}"#).unwrap();
        assert!(res.is_successful());
        assert_eq!(res.code(), 200);
        assert_eq!(res.body().unwrap().tz_id, "Asia/Seoul");
        assert!(res.error_body().is_none());
    }

    #[test]
    fn test_empty_success_body_is_not_a_transport_error() {
        let res: ApiResponse<TzBody> = ApiResponse::from_raw(StatusCode::NO_CONTENT, "").unwrap();
        assert!(res.is_successful());
        assert!(res.body().is_none());
        assert!(res.error_body().is_none());
        assert_eq!(res.into_result().unwrap_err().status, 204);

        let unit: ApiResponse<()> = ApiResponse::from_raw(StatusCode::NO_CONTENT, "").unwrap();
        assert_eq!(unit.into_result(), Ok(()));

        let optional: ApiResponse<Option<TzBody>> =
            ApiResponse::from_raw(StatusCode::OK, "  ").unwrap();
        assert_eq!(optional.into_body(), Some(None));
    }

    #[test]
    fn test_failure_keeps_error_body() {
        let res: ApiResponse<TzBody> =
            ApiResponse::from_raw(StatusCode::UNAUTHORIZED, "invalid api key").unwrap();
        assert!(!res.is_successful());
        assert!(res.body().is_none());
        assert_eq!(res.error_body(), Some("invalid api key"));

        let err = res.into_result().unwrap_err();
        assert_eq!(err.status, 401);
        assert_eq!(err.body.as_deref(), Some("invalid api key"));
    }

    #[test]
    fn test_failure_with_empty_body() {
        let res: ApiResponse<TzBody> =
            ApiResponse::from_raw(StatusCode::INTERNAL_SERVER_ERROR, "").unwrap();
        assert!(res.error_body().is_none());
    }

    #[test]
    fn test_malformed_success_body_is_transport_error() {
        let res: Result<ApiResponse<TzBody>, _> = ApiResponse::from_raw(StatusCode::OK, "<html>");
        assert!(matches!(
            res,
            Err(TransportError::Decode { status: 200, .. })
        ));
    }

    #[test]
    fn test_map_preserves_status() {
        let res: ApiResponse<TzBody> =
            ApiResponse::from_raw(StatusCode::OK, r#"{"tz_id": "Europe/Tallinn"}"#).unwrap();
        let mapped = res.map(|b| b.tz_id.len());
        assert_eq!(mapped.code(), 200);
        assert_eq!(mapped.into_body(), Some(14));
    }
}
