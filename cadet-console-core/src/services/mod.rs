//! Controller layer

mod list_controller;
mod resource_controller;
mod stats_controller;

pub use list_controller::{ListController, ListView, LoadPhase};
pub use resource_controller::ResourceController;
pub use stats_controller::{StatsController, StatsView};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cadet_console_client::{ClientError, RecordId, ResourceClient, MAX_PAGE_SIZE};

use crate::error::CoreError;
use crate::schema::ResourceSchema;
use crate::state::Notifier;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Controller context - holds the dependencies of one resource's controllers.
///
/// The platform layer creates it and injects the client implementation.
pub struct ControllerContext {
    pub client: Arc<dyn ResourceClient>,
    pub schema: Arc<ResourceSchema>,
    /// Shared by every resource of the console.
    pub notifier: Arc<Notifier>,
    pub page_size: u32,
}

impl ControllerContext {
    #[must_use]
    pub fn new(
        client: Arc<dyn ResourceClient>,
        schema: Arc<ResourceSchema>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            client,
            schema,
            notifier,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size, pulled into `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn resource(&self) -> &str {
        self.client.resource()
    }

    /// Log `err` at the level its kind calls for and show it to the operator.
    pub(crate) async fn surface(&self, action: &str, err: CoreError) -> CoreError {
        if err.is_expected() {
            log::warn!("[{}] {action} failed: {err}", self.resource());
        } else {
            log::error!("[{}] {action} failed: {err}", self.resource());
        }
        self.notifier.error(err.user_message()).await;
        err
    }

    /// 404 on a row action means the record vanished server-side.
    pub(crate) fn action_error(&self, err: ClientError, id: &RecordId) -> CoreError {
        match err {
            ClientError::NotFound { .. } => CoreError::NotFoundOnAction {
                label: self.schema.label.clone(),
                id: id.to_string(),
            },
            other => CoreError::Client(other),
        }
    }
}

/// Monotonic ticket counter. Only the newest ticket's response is applied.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence(AtomicU64);

impl RequestSequence {
    pub(crate) fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::school_schema;
    use crate::test_utils::MockResourceClient;

    fn context(page_size: u32) -> ControllerContext {
        let schema = Arc::new(school_schema().unwrap());
        let notifier = Arc::new(Notifier::default());
        let mock = Arc::new(MockResourceClient::new(schema.clone(), notifier.clone()));
        ControllerContext::new(mock, schema, notifier).with_page_size(page_size)
    }

    #[test]
    fn page_size_is_clamped_to_server_limit() {
        assert_eq!(context(0).page_size, 1);
        assert_eq!(context(25).page_size, 25);
        assert_eq!(context(MAX_PAGE_SIZE + 1).page_size, MAX_PAGE_SIZE);
        assert_eq!(context(u32::MAX).page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn only_newest_ticket_is_latest() {
        let seq = RequestSequence::default();
        let a = seq.issue();
        let b = seq.issue();
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }
}
