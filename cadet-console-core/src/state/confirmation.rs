use std::future::Future;

use cadet_console_client::RecordId;
use serde::Serialize;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Delete,
}

/// A destructive action waiting for a yes/no.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub target: RecordId,
    pub title: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

impl From<bool> for Decision {
    fn from(yes: bool) -> Self {
        if yes { Self::Confirm } else { Self::Cancel }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<T> {
    Executed(T),
    Cancelled(PendingAction),
    NothingPending,
}

/// Single-slot confirmation gate.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Mutex<Option<PendingAction>>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `action`. A previously pending action is dropped and returned.
    pub async fn request(&self, action: PendingAction) -> Option<PendingAction> {
        self.pending.lock().await.replace(action)
    }

    pub async fn pending(&self) -> Option<PendingAction> {
        self.pending.lock().await.clone()
    }

    /// Empty the slot, returning what was held.
    ///
    /// Callers that show the gate take the action under the same lock that
    /// guards the gate's presentation, then [`decide`](Self::decide) on it.
    pub async fn take(&self) -> Option<PendingAction> {
        self.pending.lock().await.take()
    }

    /// Run a taken action on `Confirm`, drop it on `Cancel`.
    pub async fn decide<T, F, Fut>(
        taken: Option<PendingAction>,
        decision: Decision,
        execute: F,
    ) -> Resolution<T>
    where
        F: FnOnce(PendingAction) -> Fut,
        Fut: Future<Output = T>,
    {
        let Some(action) = taken else {
            return Resolution::NothingPending;
        };
        match decision {
            Decision::Confirm => Resolution::Executed(execute(action).await),
            Decision::Cancel => Resolution::Cancelled(action),
        }
    }
}
