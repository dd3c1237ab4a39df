//! Shared HTTP plumbing
//!
//! Sending, logging and reading responses is identical for every resource,
//! so it lives here. The REST client builds each `RequestBuilder` itself.
//!
//! There is no retry loop: a failed call is reported once and the caller
//! decides what to do.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// Default connect timeout (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default whole-request timeout (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeouts applied to the shared HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Build an HTTP client with the given timeouts.
pub fn create_http_client(timeouts: HttpTimeouts) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .build()
        .map_err(|e| ClientError::NetworkError {
            resource: "http".to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// HTTP helper functions
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return the status code and body text.
    ///
    /// Only transport failures are errors here; status handling is left to
    /// the caller so it can tell 404 apart from other failures.
    ///
    /// # Arguments
    /// * `request_builder` - fully configured request (URL, headers, body)
    /// * `resource` - resource key (for logs and errors)
    /// * `method_name` - HTTP method (for logs)
    /// * `url` - request URL (for logs)
    pub async fn execute_request(
        request_builder: RequestBuilder,
        resource: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String)> {
        log::debug!("[{resource}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    resource: resource.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ClientError::NetworkError {
                    resource: resource.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{resource}] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| ClientError::NetworkError {
                resource: resource.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{resource}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON body.
    ///
    /// # Returns
    /// * `Ok(T)` - parsed value
    /// * `Err(ClientError::DecodeError)` - the body is not valid JSON for `T`
    pub fn parse_json<T>(response_text: &str, resource: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{resource}] JSON parse failed: {e}");
            log::error!(
                "[{resource}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ClientError::DecodeError {
                resource: resource.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Message to surface for a non-success response.
    ///
    /// Looks for `detail`, then `message`, then `error` in a JSON body. A
    /// validation-style `detail` list (`[{"msg": ...}, ...]`) is joined with
    /// `"; "`. Falls back to `HTTP error, status N`.
    pub fn error_message(status: u16, body: &str) -> String {
        Self::server_message(body).unwrap_or_else(|| format!("HTTP error, status {status}"))
    }

    /// The server-supplied message of an error body, if it carries one.
    pub fn server_message(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        ["detail", "message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(message_text))
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}
