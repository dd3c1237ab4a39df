use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::http_client::HttpUtils;
use crate::types::{ListPage, ListQuery, Record, RecordId, ResourceEndpoint};

/// Source of the optional bearer token attached to every request.
///
/// Read once per request, so a token saved or cleared between calls takes
/// effect on the next one. `None` means the request goes out unauthenticated.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// A fixed token (or none), for tests and one-shot tools.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Maps non-success statuses to client errors (internal).
pub(crate) trait StatusErrorMapper {
    /// Resource key for error context.
    fn resource_key(&self) -> &str;

    /// Map a non-2xx response.
    ///
    /// A 404 against a specific record becomes `NotFound`; everything else
    /// is an `HttpError` carrying the server message when there is one.
    fn map_status(&self, status: u16, body: &str, target: Option<&RecordId>) -> ClientError {
        match (status, target) {
            (404, Some(id)) => ClientError::NotFound {
                resource: self.resource_key().to_string(),
                id: id.to_string(),
                raw_message: HttpUtils::server_message(body),
            },
            _ => ClientError::HttpError {
                resource: self.resource_key().to_string(),
                status,
                message: HttpUtils::error_message(status, body),
            },
        }
    }

    /// Shortcut: decode error.
    fn decode_error(&self, detail: impl ToString) -> ClientError {
        ClientError::DecodeError {
            resource: self.resource_key().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// CRUD access to one resource kind.
///
/// Implementations never retry and never touch shared UI state; page and
/// total bookkeeping belongs to the caller.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// REST surface this client talks to.
    fn endpoint(&self) -> &ResourceEndpoint;

    /// Resource key, e.g. `schools`.
    fn resource(&self) -> &str {
        &self.endpoint().resource
    }

    /// Fetch one page, normalized to `{items, total}`.
    async fn list(&self, query: &ListQuery) -> Result<ListPage>;

    /// Fetch one record. Fails with `NotFound` when it does not exist.
    async fn get(&self, id: &RecordId) -> Result<Record>;

    /// Create a record from a full payload and return the stored record.
    async fn create(&self, payload: &Record) -> Result<Record>;

    /// Replace a record with a full payload and return the stored record.
    async fn update(&self, id: &RecordId, payload: &Record) -> Result<Record>;

    /// Delete a record. Fails with `NotFound` when it does not exist.
    async fn delete(&self, id: &RecordId) -> Result<()>;

    /// Aggregate counters, or `None` when the resource has no stats endpoint.
    async fn stats(&self) -> Result<Option<Record>>;
}
