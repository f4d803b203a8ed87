//! The shared request client.
//!
//! # Design
//! `ApiClient` is built once from an immutable `ClientConfig` and handed by
//! reference to every service. It carries no mutable state between calls.
//! `build_request` is pure and applies the configured base address and
//! default headers (content-type only when there is a body); the verb methods (`get`, `post`, `put`, `delete`) build a
//! request and run it through the configured `Transport`.
//!
//! Status interpretation is not done here: the verb methods return every
//! HTTP response as data and the services decide what counts as success.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, CONTENT_TYPE};
use crate::transport::UreqTransport;

/// Per-call overrides layered on top of the configured defaults.
///
/// Headers listed here replace default headers with the same name
/// (case-insensitive) for a single request only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn content_type(value: impl Into<String>) -> Self {
        Self {
            headers: vec![(CONTENT_TYPE.to_string(), value.into())],
        }
    }
}

/// Client shared by all resource services.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Build the client with the network transport configured from `config`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(config.timeout()));
        Self { config, transport }
    }

    /// Build the client around a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
        options: Option<&RequestOptions>,
    ) -> HttpRequest {
        let mut headers = self.config.default_headers().to_vec();
        if let Some(options) = options {
            for (name, value) in &options.headers {
                match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
                    Some(existing) => existing.1 = value.clone(),
                    None => headers.push((name.clone(), value.clone())),
                }
            }
        }
        if body.is_none() {
            headers.retain(|(key, _)| !key.eq_ignore_ascii_case(CONTENT_TYPE));
        }
        HttpRequest {
            method,
            url: self.config.url_for(path),
            headers,
            body,
        }
    }

    /// Run a request through the transport. Non-2xx responses are returned
    /// as `Ok`; only transport failures are `Err`.
    pub fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let started = Instant::now();
        debug!(method = %request.method, url = %request.url, "sending request");

        match self.transport.execute(&request) {
            Ok(response) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "received response"
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    error = %err,
                    "request failed"
                );
                Err(err)
            }
        }
    }

    pub fn get(&self, path: &str, options: Option<&RequestOptions>) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_request(HttpMethod::Get, path, None, options))
    }

    pub fn post(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
        options: Option<&RequestOptions>,
    ) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_request(HttpMethod::Post, path, body, options))
    }

    pub fn put(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
        options: Option<&RequestOptions>,
    ) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_request(HttpMethod::Put, path, body, options))
    }

    pub fn delete(&self, path: &str, options: Option<&RequestOptions>) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_request(HttpMethod::Delete, path, None, options))
    }
}

/// Encode a payload as a JSON request body.
pub fn json_body<T: Serialize>(payload: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Check the status, then decode the body into `T`.
pub fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Check the status and return the body as untyped JSON. An empty body
/// decodes to `Value::Null`.
pub fn decode_value(response: HttpResponse) -> Result<serde_json::Value, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
