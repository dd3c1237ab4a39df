//! # cadet-console-client
//!
//! Typed access to the CRUD endpoints of the cadet/school management backend.
//!
//! One [`RestResourceClient`] serves one resource kind (schools, cadets, ...),
//! described by a [`ResourceEndpoint`]. Every call returns
//! [`Result<T, ClientError>`](ClientError):
//!
//! - [`ClientError::NetworkError`] / [`ClientError::Timeout`]: the server was not reached
//! - [`ClientError::HttpError`]: non-2xx, with the server's `detail` when it sent one
//! - [`ClientError::NotFound`]: 404 on a specific record
//! - [`ClientError::DecodeError`]: success status, unreadable body
//!
//! Nothing is retried.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: TLS via rustls.
//! - **`native-tls`**: the platform TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cadet_console_client::{
//!     HttpTimeouts, ListQuery, ResourceClient, ResourceEndpoint, RestResourceClient, StaticToken,
//! };
//!
//! # async fn example() -> cadet_console_client::Result<()> {
//! let endpoint = ResourceEndpoint::rest("schools").with_stats("/schools/stats/");
//! let client = RestResourceClient::new(
//!     "http://localhost:8000",
//!     endpoint,
//!     Arc::new(StaticToken::none()),
//!     HttpTimeouts::default(),
//! )?;
//!
//! let page = client.list(&ListQuery::page(1, 10)).await?;
//! println!("{} of {} schools", page.items.len(), page.total);
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod rest;
mod traits;
mod types;
mod utils;

pub use error::{ClientError, Result};
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, HttpTimeouts, HttpUtils,
    create_http_client,
};
pub use rest::{DEFAULT_BASE_URL, RestResourceClient};
pub use traits::{ResourceClient, StaticToken, TokenSource};
pub use types::{
    ID_PLACEHOLDER, ListPage, ListQuery, MAX_PAGE_SIZE, PaginationParams, QueryStyle, Record,
    RecordId, ResourceEndpoint, SortDirection,
};
pub use utils::log_sanitizer;
