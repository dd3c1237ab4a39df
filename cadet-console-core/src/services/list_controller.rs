//! Paged list of one resource

use std::sync::Arc;

use cadet_console_client::{ListQuery, PaginationParams, Record};
use serde::Serialize;
use tokio::sync::RwLock;

use super::{ControllerContext, RequestSequence};
use crate::error::{CoreError, CoreResult};
use crate::schema::{value_text, ResourceSchema};
use crate::state::PageState;

/// Load state of a fetched view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "message", rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Everything a renderer needs to draw the list.
#[derive(Debug, Clone)]
pub struct ListView {
    pub phase: LoadPhase,
    /// Rows of the current page, replaced wholesale on every load.
    pub rows: Vec<Record>,
    pub page: PageState,
    pub filters: Vec<(String, String)>,
    /// Local text filter over the loaded rows.
    pub search: String,
}

impl ListView {
    fn new(page_size: u32) -> Self {
        Self {
            phase: LoadPhase::Idle,
            rows: Vec::new(),
            page: PageState::new(page_size),
            filters: Vec::new(),
            search: String::new(),
        }
    }

    /// Rows matching `search`, case-insensitively against any scalar field.
    pub fn visible_rows(&self) -> Vec<&Record> {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| {
                row.fields()
                    .filter(|(_, v)| !v.is_array() && !v.is_object())
                    .any(|(_, v)| value_text(v).to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Cell text of the visible rows, one entry per schema column.
    pub fn cells(&self, schema: &ResourceSchema) -> Vec<Vec<String>> {
        self.visible_rows()
            .into_iter()
            .map(|row| schema.columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }
}

pub struct ListController {
    ctx: Arc<ControllerContext>,
    view: RwLock<ListView>,
    sequence: RequestSequence,
}

impl ListController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        let view = ListView::new(ctx.page_size);
        Self {
            ctx,
            view: RwLock::new(view),
            sequence: RequestSequence::default(),
        }
    }

    pub async fn snapshot(&self) -> ListView {
        self.view.read().await.clone()
    }

    /// Fetch the current page again.
    ///
    /// A response is applied only if no newer fetch was issued meanwhile.
    /// An empty page past the first one falls back to page 1.
    pub async fn refresh(&self) -> CoreResult<()> {
        let (mut page, page_size, filters) = {
            let mut view = self.view.write().await;
            view.phase = LoadPhase::Loading;
            (view.page.page, view.page.page_size, view.filters.clone())
        };

        loop {
            let ticket = self.sequence.issue();
            let query = ListQuery {
                pagination: PaginationParams::new(page, page_size),
                filters: filters.clone(),
            };
            log::debug!("[{}] Fetching page {page} (ticket {ticket})", self.ctx.resource());
            let result = self.ctx.client.list(&query).await;

            if !self.sequence.is_latest(ticket) {
                log::debug!(
                    "[{}] Dropping stale page {page} response (ticket {ticket})",
                    self.ctx.resource()
                );
                return Ok(());
            }

            match result {
                Ok(list) if list.items.is_empty() && page > 1 => {
                    log::info!(
                        "[{}] Page {page} is empty, falling back to page 1",
                        self.ctx.resource()
                    );
                    page = 1;
                }
                Ok(list) => {
                    let mut state = PageState {
                        page,
                        page_size,
                        total: 0,
                    };
                    state.total = list.total.max(state.offset() + list.items.len() as u64);
                    state.clamp();

                    let mut view = self.view.write().await;
                    view.rows = list.items;
                    view.page = state;
                    view.phase = LoadPhase::Loaded;
                    return Ok(());
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    {
                        let mut view = self.view.write().await;
                        view.rows.clear();
                        view.phase = LoadPhase::Error(err.user_message());
                    }
                    return Err(self.ctx.surface("List", err).await);
                }
            }
        }
    }

    /// Go to page `n`, clamped to the known page range. Only valid once a
    /// page has loaded.
    pub async fn change_page(&self, n: u32) -> CoreResult<()> {
        {
            let mut view = self.view.write().await;
            if view.phase != LoadPhase::Loaded {
                return Err(CoreError::InvalidState(format!(
                    "cannot change page while list is {:?}",
                    view.phase
                )));
            }
            view.page.page = n;
            view.page.clamp();
        }
        self.refresh().await
    }

    /// Replace the server-side filters and reload from page 1.
    pub async fn set_filters(&self, filters: Vec<(String, String)>) -> CoreResult<()> {
        {
            let mut view = self.view.write().await;
            view.filters = filters;
            view.page.page = 1;
        }
        self.refresh().await
    }

    /// Set the local search text. No request is made.
    pub async fn search(&self, text: impl Into<String>) {
        self.view.write().await.search = text.into();
    }
}
