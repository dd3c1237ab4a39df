//! Summary counters shown above the list

use std::sync::Arc;

use cadet_console_client::Record;
use tokio::sync::RwLock;

use super::{ControllerContext, LoadPhase, RequestSequence};
use crate::error::{CoreError, CoreResult};
use crate::schema::{value_text, StatField};

#[derive(Debug, Clone)]
pub struct StatsView {
    pub phase: LoadPhase,
    pub counters: Option<Record>,
}

impl StatsView {
    /// `(label, value)` pairs in schema order. Missing counters read `0`.
    pub fn labeled(&self, fields: &[StatField]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|field| {
                let value = self
                    .counters
                    .as_ref()
                    .and_then(|c| c.get(&field.key))
                    .map_or_else(|| "0".to_string(), value_text);
                (field.label.clone(), value)
            })
            .collect()
    }
}

pub struct StatsController {
    ctx: Arc<ControllerContext>,
    view: RwLock<StatsView>,
    sequence: RequestSequence,
}

impl StatsController {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self {
            ctx,
            view: RwLock::new(StatsView {
                phase: LoadPhase::Idle,
                counters: None,
            }),
            sequence: RequestSequence::default(),
        }
    }

    /// Whether the resource has a stats endpoint at all.
    pub fn is_available(&self) -> bool {
        self.ctx.client.endpoint().stats.is_some()
    }

    pub async fn snapshot(&self) -> StatsView {
        self.view.read().await.clone()
    }

    pub async fn refresh(&self) -> CoreResult<()> {
        if !self.is_available() {
            return Ok(());
        }
        self.view.write().await.phase = LoadPhase::Loading;
        let ticket = self.sequence.issue();
        let result = self.ctx.client.stats().await;
        if !self.sequence.is_latest(ticket) {
            log::debug!("[{}] Dropping stale stats (ticket {ticket})", self.ctx.resource());
            return Ok(());
        }

        match result {
            Ok(counters) => {
                let mut view = self.view.write().await;
                view.counters = counters;
                view.phase = LoadPhase::Loaded;
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                {
                    let mut view = self.view.write().await;
                    view.counters = None;
                    view.phase = LoadPhase::Error(err.user_message());
                }
                Err(self.ctx.surface("Stats", err).await)
            }
        }
    }
}
