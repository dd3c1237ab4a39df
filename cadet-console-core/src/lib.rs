//! Cadet Console Core Library
//!
//! Platform-independent controller logic for the admin console:
//! - Resource schemas (schools, cadets)
//! - Form state, binding and validation
//! - Paged list, stats and the generic CRUD controller
//! - Notifications, the confirmation gate and the modal slot
//!
//! Talks to the backend only through the `ResourceClient` trait, so every
//! controller can be exercised against an in-memory client.

pub mod error;
pub mod form;
pub mod schema;
pub mod services;
pub mod state;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use form::{FormBinder, FormState, GroupId, GroupRow};
pub use schema::{cadet_schema, school_schema, ResourceSchema};
pub use services::{ControllerContext, ListController, ResourceController, StatsController};
pub use state::{Decision, Modal, Notification, NotificationKind, Notifier, PageState};
pub use traits::{StoredToken, TokenStore};
pub use validation::{validate, validate_record, FieldErrorSet, FieldKey, Ruleset};

// Re-export the client types that cross this crate's API
pub use cadet_console_client::{ClientError, Record, RecordId, ResourceClient};
