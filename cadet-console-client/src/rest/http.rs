//! Request helpers for the REST client

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::http_client::HttpUtils;
use crate::traits::StatusErrorMapper;
use crate::types::{Record, RecordId};
use crate::utils::log_sanitizer::{mask_token, truncate_for_log};

use super::RestResourceClient;

impl RestResourceClient {
    /// Send one request and return the body of a successful response.
    ///
    /// `target` is the record the request addresses; it turns a 404 into
    /// `NotFound`.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Record>,
        target: Option<&RecordId>,
    ) -> Result<String> {
        let url = self.url(path);
        let resource = self.resource_key();

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = self.tokens.bearer_token().await {
            log::debug!("[{resource}] Authorization: Bearer {}", mask_token(&token));
            request = request.bearer_auth(token);
        }

        if let Some(payload) = body {
            let body_json =
                serde_json::to_string(payload).map_err(|e| ClientError::SerializationError {
                    resource: resource.to_string(),
                    detail: e.to_string(),
                })?;
            log::debug!("[{resource}] Request Body: {}", truncate_for_log(&body_json));
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body_json);
        }

        let (status, text) =
            HttpUtils::execute_request(request, resource, method.as_str(), &url).await?;

        if (200..300).contains(&status) {
            return Ok(text);
        }

        let err = self.map_status(status, &text, target);
        if err.is_expected() {
            log::warn!("{err}");
        } else {
            log::error!("{err}");
        }
        Err(err)
    }

    /// Decode a success body, treating an empty body as a decode error.
    pub(crate) fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        if text.trim().is_empty() {
            return Err(self.decode_error("empty response body"));
        }
        HttpUtils::parse_json(text, self.resource_key())
    }

    /// Decode a success body that must be a single JSON object.
    pub(crate) fn decode_record(&self, text: &str) -> Result<Record> {
        let value: serde_json::Value = self.decode(text)?;
        Record::from_value(value).ok_or_else(|| self.decode_error("expected a JSON object"))
    }
}
