//! Generic CRUD controller
//!
//! One [`ResourceController`] drives every screen of one resource kind: the
//! paged list, the stats strip, the create/edit form, the read-only view and
//! the delete confirmation. Everything resource-specific comes from the
//! [`ResourceSchema`] in the [`ControllerContext`].

use std::sync::Arc;

use cadet_console_client::{Record, RecordId};
use tokio::sync::{RwLock, RwLockWriteGuard};

use super::{ControllerContext, ListController, StatsController};
use crate::error::{CoreError, CoreResult};
use crate::form::{FormBinder, FormState};
use crate::schema::ResourceSchema;
use crate::state::{
    ActionKind, ConfirmationGate, Decision, FormMode, Modal, ModalState, ModalToken,
    PendingAction, Resolution,
};
use crate::validation::{validate, Ruleset};

pub struct ResourceController {
    ctx: Arc<ControllerContext>,
    binder: FormBinder,
    ruleset: Ruleset,
    list: ListController,
    stats: StatsController,
    modal: RwLock<ModalState>,
    gate: ConfirmationGate,
}

impl ResourceController {
    /// Controller with the rules derived from the context's schema.
    pub fn new(ctx: Arc<ControllerContext>) -> CoreResult<Self> {
        let ruleset = Ruleset::from_schema(&ctx.schema)?;
        Ok(Self::with_ruleset(ctx, ruleset))
    }

    pub fn with_ruleset(ctx: Arc<ControllerContext>, ruleset: Ruleset) -> Self {
        Self {
            binder: FormBinder::new(ctx.schema.clone()),
            ruleset,
            list: ListController::new(ctx.clone()),
            stats: StatsController::new(ctx.clone()),
            modal: RwLock::new(ModalState::new()),
            gate: ConfirmationGate::new(),
            ctx,
        }
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.ctx.schema
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn stats(&self) -> &StatsController {
        &self.stats
    }

    pub fn binder(&self) -> &FormBinder {
        &self.binder
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Copy of the open modal, if any.
    pub async fn modal(&self) -> Option<Modal> {
        self.modal.read().await.active().cloned()
    }

    /// Reload the list and the stats together.
    pub async fn refresh_all(&self) -> CoreResult<()> {
        let (list, stats) = futures::join!(self.list.refresh(), self.stats.refresh());
        list.and(stats)
    }

    // ===== Form =====

    /// Open an empty form with one blank entry per group.
    pub async fn open_create(&self) -> ModalToken {
        let form = self.binder.blank_form();
        self.replace_modal()
            .await
            .open_form(FormMode::Create, form, false)
    }

    /// Open the form for `id`, pre-filled from the server.
    pub async fn open_edit(&self, id: &RecordId) -> CoreResult<ModalToken> {
        let token = self
            .replace_modal()
            .await
            .open_form(FormMode::Edit(id.clone()), FormState::new(), true);

        match self.ctx.client.get(id).await {
            Ok(record) => {
                let mut form = FormState::new();
                self.binder.populate(&mut form, &record);
                if !self.modal.write().await.finish_form(token, form) {
                    log::debug!("[{}] Edit form for {id} closed before load", self.ctx.resource());
                }
                Ok(token)
            }
            Err(e) => {
                self.modal.write().await.close_if(token);
                let err = self.ctx.action_error(e, id);
                Err(self.ctx.surface("Load", err).await)
            }
        }
    }

    /// Open the read-only view of `id`.
    pub async fn open_view(&self, id: &RecordId) -> CoreResult<ModalToken> {
        let token = self.replace_modal().await.open_view();

        match self.ctx.client.get(id).await {
            Ok(record) => {
                if !self.modal.write().await.finish_view(token, record) {
                    log::debug!("[{}] View of {id} closed before load", self.ctx.resource());
                }
                Ok(token)
            }
            Err(e) => {
                self.modal.write().await.close_if(token);
                let err = self.ctx.action_error(e, id);
                Err(self.ctx.surface("Load", err).await)
            }
        }
    }

    /// Run `edit` against the open, loaded form.
    pub async fn with_form<R>(&self, edit: impl FnOnce(&mut FormState) -> R) -> CoreResult<R> {
        let mut modal = self.modal.write().await;
        let form = modal.form_mut().ok_or(CoreError::NoActiveForm)?;
        Ok(edit(form))
    }

    /// Validate the open form and send it.
    ///
    /// Field errors are stored on the form and nothing is sent. On success the
    /// form closes and the list and stats reload. On a client failure the
    /// form stays open with its values intact.
    pub async fn submit(&self) -> CoreResult<Record> {
        let (token, mode, record) = {
            let mut modal = self.modal.write().await;
            let (token, mode, errors, record) = match modal.form() {
                Some((token, mode, form)) => (
                    token,
                    mode.clone(),
                    validate(form, &self.ruleset),
                    self.binder.gather(form),
                ),
                None => return Err(CoreError::NoActiveForm),
            };
            if let Some(form) = modal.form_mut() {
                form.set_errors(errors.clone());
            }
            if !errors.is_empty() {
                log::warn!("[{}] Validation failed: {errors}", self.ctx.resource());
                return Err(CoreError::Validation(errors));
            }
            (token, mode, record)
        };

        let label = &self.ctx.schema.label;
        let result = match &mode {
            FormMode::Create => self
                .ctx
                .client
                .create(&record)
                .await
                .map_err(CoreError::from),
            FormMode::Edit(id) => self
                .ctx
                .client
                .update(id, &record)
                .await
                .map_err(|e| self.ctx.action_error(e, id)),
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(err) => return Err(self.ctx.surface("Save", err).await),
        };

        let message = match mode {
            FormMode::Create => format!("{label} added successfully!"),
            FormMode::Edit(_) => format!("{label} updated successfully!"),
        };
        log::info!("[{}] {message}", self.ctx.resource());
        self.ctx.notifier.success(message).await;
        self.modal.write().await.close_if(token);

        if let Err(e) = self.refresh_all().await {
            log::debug!("[{}] Refresh after save failed: {e}", self.ctx.resource());
        }
        Ok(saved)
    }

    // ===== Delete =====

    /// Hold a delete of `id` behind the confirmation gate.
    pub async fn request_delete(&self, id: &RecordId) -> ModalToken {
        let label = &self.ctx.schema.label;
        let action = PendingAction {
            kind: ActionKind::Delete,
            target: id.clone(),
            title: format!("Delete {label}"),
            prompt: format!(
                "Are you sure you want to delete this {}? This action cannot be undone.",
                label.to_lowercase()
            ),
        };
        // The gate and its modal change together under the modal lock.
        let mut modal = self.modal.write().await;
        if let Some(replaced) = self.gate.request(action.clone()).await {
            log::debug!(
                "[{}] Pending delete of {} replaced",
                self.ctx.resource(),
                replaced.target
            );
        }
        modal.open_confirm(action)
    }

    pub async fn pending_action(&self) -> Option<PendingAction> {
        self.gate.pending().await
    }

    /// Answer the confirmation gate. Returns `true` when the held action ran
    /// and succeeded, `false` when it was cancelled.
    ///
    /// The action and its modal are removed before the action runs, so a
    /// delete requested meanwhile keeps its own modal.
    pub async fn resolve_confirmation(&self, decision: Decision) -> CoreResult<bool> {
        let taken = {
            let mut modal = self.modal.write().await;
            let taken = self.gate.take().await;
            if taken.is_some() && matches!(modal.active(), Some(Modal::Confirm { .. })) {
                modal.close();
            }
            taken
        };

        let resolution = ConfirmationGate::decide(taken, decision, |action| async move {
            let result = match action.kind {
                ActionKind::Delete => self.ctx.client.delete(&action.target).await,
            };
            (action, result)
        })
        .await;

        match resolution {
            Resolution::NothingPending => Err(CoreError::NoPendingAction),
            Resolution::Cancelled(action) => {
                log::debug!("[{}] Delete of {} cancelled", self.ctx.resource(), action.target);
                Ok(false)
            }
            Resolution::Executed((action, Ok(()))) => {
                let message = format!("{} deleted successfully", self.ctx.schema.label);
                log::info!("[{}] {message}: {}", self.ctx.resource(), action.target);
                self.ctx.notifier.success(message).await;
                if let Err(e) = self.refresh_all().await {
                    log::debug!("[{}] Refresh after delete failed: {e}", self.ctx.resource());
                }
                Ok(true)
            }
            Resolution::Executed((action, Err(e))) => {
                let err = self.ctx.action_error(e, &action.target);
                Err(self.ctx.surface("Delete", err).await)
            }
        }
    }

    /// Close whatever modal is open. An open confirmation is cancelled.
    pub async fn close_modal(&self) {
        self.replace_modal().await.close();
    }

    /// Lock the modal slot for opening or closing a modal. A confirmation
    /// showing in it is cancelled, so the gate never holds an unseen action.
    async fn replace_modal(&self) -> RwLockWriteGuard<'_, ModalState> {
        let modal = self.modal.write().await;
        if matches!(modal.active(), Some(Modal::Confirm { .. })) {
            if let Some(dropped) = self.gate.take().await {
                log::debug!(
                    "[{}] Pending delete of {} cancelled",
                    self.ctx.resource(),
                    dropped.target
                );
            }
        }
        modal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotificationKind;
    use crate::test_utils::{school, setup, MockResourceClient};
    use crate::validation::FieldKey;
    use cadet_console_client::ClientError;
    use serde_json::json;
    use tokio::sync::Notify;

    async fn controller() -> (Arc<MockResourceClient>, ResourceController) {
        let (mock, ctx) = setup();
        (mock, ResourceController::new(ctx).unwrap())
    }

    fn fill_valid(form: &mut FormState) {
        for (field, value) in [
            ("name", "Shree Janata School"),
            ("district", "Kaski"),
            ("municipality", "Pokhara"),
            ("ward_number", "7"),
            ("phone_number", "061-520000"),
            ("principal_name", "R. Thapa"),
            ("principal_contact", "9800000001"),
        ] {
            form.set_value(field, value);
        }
        let id = form.entries("training_sessions")[0].id;
        form.set_entry_value("training_sessions", id, "ncc_batch", "2080-A");
        form.set_entry_value("training_sessions", id, "start_date", "2024-01-15");
        form.set_entry_value("training_sessions", id, "division", "junior");
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_client() {
        let (mock, ctl) = controller().await;
        ctl.open_create().await;
        ctl.with_form(|form| {
            fill_valid(form);
            form.set_value("name", "");
        })
        .await
        .unwrap();

        let err = ctl.submit().await.unwrap_err();
        let CoreError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains(&FieldKey::field("name")));
        assert_eq!(mock.call_count("create").await, 0);

        let form_errors = ctl.with_form(|form| form.errors().clone()).await.unwrap();
        assert_eq!(form_errors, errors);
    }

    #[tokio::test]
    async fn create_sends_full_record_then_refreshes() {
        let (mock, ctl) = controller().await;
        ctl.open_create().await;
        ctl.with_form(fill_valid).await.unwrap();

        let saved = ctl.submit().await.unwrap();
        assert!(saved.id().is_some());
        let sent = mock.last_payload().await.unwrap();
        assert_eq!(sent.len(), ctl.schema().fields.len());
        assert_eq!(sent.get("website"), Some(&serde_json::Value::Null));
        assert_eq!(sent.get("ward_number"), Some(&json!(7)));

        assert!(ctl.modal().await.is_none());
        let note = mock.notifier().current().await.unwrap();
        assert_eq!(note.message, "School added successfully!");
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(mock.call_count("list").await, 1);
        assert_eq!(mock.call_count("stats").await, 1);
        assert_eq!(ctl.list().snapshot().await.rows.len(), 1);
    }

    #[tokio::test]
    async fn edit_round_trips_and_updates() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Old Name", "Kaski")).await;

        ctl.open_edit(&id).await.unwrap();
        let name = ctl.with_form(|form| form.value("name").to_string()).await.unwrap();
        assert_eq!(name, "Old Name");

        ctl.with_form(|form| form.set_value("name", "New Name")).await.unwrap();
        ctl.submit().await.unwrap();

        assert_eq!(mock.call_count("update").await, 1);
        assert_eq!(mock.get_record(&id).await.unwrap().get_str("name"), Some("New Name"));
        assert_eq!(
            mock.notifier().current().await.unwrap().message,
            "School updated successfully!"
        );
    }

    #[tokio::test]
    async fn failed_update_keeps_form_open() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Keep Me", "Kaski")).await;
        ctl.open_edit(&id).await.unwrap();
        mock.fail_next(
            "update",
            ClientError::HttpError {
                resource: "schools".to_string(),
                status: 422,
                message: "ward_number: value is not a valid integer".to_string(),
            },
        )
        .await;

        assert!(matches!(ctl.submit().await, Err(CoreError::Client(_))));
        assert!(matches!(ctl.modal().await, Some(Modal::Form { .. })));
        let name = ctl.with_form(|form| form.value("name").to_string()).await.unwrap();
        assert_eq!(name, "Keep Me");
        assert_eq!(
            mock.notifier().current().await.unwrap().message,
            "ward_number: value is not a valid integer"
        );
    }

    #[tokio::test]
    async fn edit_of_missing_record_reports_not_found() {
        let (mock, ctl) = controller().await;
        let err = ctl.open_edit(&RecordId::from("404")).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFoundOnAction { .. }));
        assert!(ctl.modal().await.is_none());
        assert_eq!(mock.notifier().current().await.unwrap().message, "School not found");
    }

    #[tokio::test]
    async fn view_loads_record() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Viewed", "Kaski")).await;
        ctl.open_view(&id).await.unwrap();
        let Some(Modal::View { record: Some(record), .. }) = ctl.modal().await else {
            panic!("expected loaded view");
        };
        assert_eq!(record.get_str("name"), Some("Viewed"));
    }

    #[tokio::test]
    async fn submit_without_form_fails() {
        let (_mock, ctl) = controller().await;
        assert!(matches!(ctl.submit().await, Err(CoreError::NoActiveForm)));
        let id = RecordId::from("1");
        ctl.request_delete(&id).await;
        assert!(matches!(ctl.submit().await, Err(CoreError::NoActiveForm)));
    }

    #[tokio::test]
    async fn confirmed_delete_runs_once_and_refreshes() {
        let (mock, ctl) = controller().await;
        let keep = mock.seed(school("Keep", "Kaski")).await;
        let doomed = mock.seed(school("Doomed", "Kaski")).await;
        ctl.list().refresh().await.unwrap();

        ctl.request_delete(&doomed).await;
        assert!(matches!(ctl.modal().await, Some(Modal::Confirm { .. })));
        assert!(ctl.resolve_confirmation(Decision::Confirm).await.unwrap());

        assert_eq!(mock.deleted().await, vec![doomed]);
        assert!(ctl.modal().await.is_none());
        assert!(ctl.pending_action().await.is_none());
        assert_eq!(
            mock.notifier().current().await.unwrap().message,
            "School deleted successfully"
        );
        assert_eq!(mock.call_count("list").await, 2);
        assert_eq!(mock.call_count("stats").await, 1);
        let rows = ctl.list().snapshot().await.rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), Some(keep));
    }

    #[tokio::test]
    async fn cancelled_delete_does_nothing() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Stay", "Kaski")).await;
        ctl.request_delete(&id).await;
        assert!(!ctl.resolve_confirmation(Decision::Cancel).await.unwrap());
        assert!(mock.deleted().await.is_empty());
        assert!(matches!(
            ctl.resolve_confirmation(Decision::Confirm).await,
            Err(CoreError::NoPendingAction)
        ));
    }

    #[tokio::test]
    async fn second_delete_request_replaces_first() {
        let (mock, ctl) = controller().await;
        let a = mock.seed(school("A", "Kaski")).await;
        let b = mock.seed(school("B", "Kaski")).await;
        ctl.request_delete(&a).await;
        ctl.request_delete(&b).await;
        ctl.resolve_confirmation(Decision::Confirm).await.unwrap();
        assert_eq!(mock.deleted().await, vec![b]);
    }

    #[tokio::test]
    async fn delete_of_vanished_record_clears_gate() {
        let (mock, ctl) = controller().await;
        ctl.request_delete(&RecordId::from("77")).await;
        let err = ctl.resolve_confirmation(Decision::Confirm).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFoundOnAction { .. }));
        assert!(ctl.pending_action().await.is_none());
        assert_eq!(mock.notifier().current().await.unwrap().message, "School not found");
    }

    #[tokio::test]
    async fn deleting_last_item_of_last_page_lands_on_page_one() {
        let (mock, ctl) = controller().await;
        for i in 0..11 {
            mock.seed(school(&format!("S{i}"), "Kaski")).await;
        }
        ctl.list().refresh().await.unwrap();
        ctl.list().change_page(2).await.unwrap();
        let only = ctl.list().snapshot().await.rows[0].id().unwrap();

        ctl.request_delete(&only).await;
        ctl.resolve_confirmation(Decision::Confirm).await.unwrap();

        let view = ctl.list().snapshot().await;
        assert_eq!(view.page.page, 1);
        assert_eq!(view.rows.len(), 10);
    }

    #[tokio::test]
    async fn closing_confirmation_cancels_it() {
        let (_mock, ctl) = controller().await;
        ctl.request_delete(&RecordId::from("1")).await;
        ctl.close_modal().await;
        assert!(ctl.pending_action().await.is_none());
        assert!(ctl.modal().await.is_none());
    }

    #[tokio::test]
    async fn delete_requested_while_another_runs_keeps_its_confirmation() {
        let (mock, ctl) = controller().await;
        let a = mock.seed(school("A", "Kaski")).await;
        let b = mock.seed(school("B", "Kaski")).await;
        let ctl = Arc::new(ctl);

        let gate = Arc::new(Notify::new());
        mock.hold_next("delete", gate.clone()).await;
        ctl.request_delete(&a).await;
        let running = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.resolve_confirmation(Decision::Confirm).await })
        };
        while mock.call_count("delete").await < 1 {
            tokio::task::yield_now().await;
        }
        assert!(ctl.modal().await.is_none());

        let second = ctl.request_delete(&b).await;
        gate.notify_one();
        assert!(running.await.unwrap().unwrap());

        assert_eq!(mock.deleted().await, vec![a]);
        assert_eq!(ctl.pending_action().await.map(|p| p.target), Some(b.clone()));
        let Some(Modal::Confirm { token, action }) = ctl.modal().await else {
            panic!("second confirmation should still be showing");
        };
        assert_eq!(token, second);
        assert_eq!(action.target, b);

        ctl.close_modal().await;
        assert!(ctl.pending_action().await.is_none());
        assert!(matches!(
            ctl.resolve_confirmation(Decision::Confirm).await,
            Err(CoreError::NoPendingAction)
        ));
        assert_eq!(mock.call_count("delete").await, 1);
    }

    #[tokio::test]
    async fn opening_another_modal_cancels_pending_delete() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Stay", "Kaski")).await;
        ctl.request_delete(&id).await;
        ctl.open_view(&id).await.unwrap();

        assert!(ctl.pending_action().await.is_none());
        assert!(matches!(
            ctl.resolve_confirmation(Decision::Confirm).await,
            Err(CoreError::NoPendingAction)
        ));
        assert!(mock.deleted().await.is_empty());
        assert!(matches!(ctl.modal().await, Some(Modal::View { .. })));
    }

    #[tokio::test]
    async fn late_edit_load_leaves_newer_form_alone() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Slow", "Kaski")).await;
        let ctl = Arc::new(ctl);

        let gate = Arc::new(Notify::new());
        mock.hold_next("get", gate.clone()).await;
        let loading = {
            let ctl = ctl.clone();
            let id = id.clone();
            tokio::spawn(async move { ctl.open_edit(&id).await })
        };
        while mock.call_count("get").await < 1 {
            tokio::task::yield_now().await;
        }
        assert!(matches!(ctl.modal().await, Some(Modal::Form { loading: true, .. })));

        let create = ctl.open_create().await;
        ctl.with_form(|form| form.set_value("name", "Typed")).await.unwrap();
        gate.notify_one();
        let stale = loading.await.unwrap().unwrap();
        assert_ne!(stale, create);

        let Some(Modal::Form { token, mode, form, loading }) = ctl.modal().await else {
            panic!("create form should still be open");
        };
        assert_eq!(token, create);
        assert_eq!(mode, FormMode::Create);
        assert!(!loading);
        assert_eq!(form.value("name"), "Typed");
    }

    #[tokio::test]
    async fn view_closed_while_loading_stays_closed() {
        let (mock, ctl) = controller().await;
        let id = mock.seed(school("Slow", "Kaski")).await;
        let ctl = Arc::new(ctl);

        let gate = Arc::new(Notify::new());
        mock.hold_next("get", gate.clone()).await;
        let loading = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.open_view(&id).await })
        };
        while mock.call_count("get").await < 1 {
            tokio::task::yield_now().await;
        }

        ctl.close_modal().await;
        gate.notify_one();
        loading.await.unwrap().unwrap();
        assert!(ctl.modal().await.is_none());
    }
}
