//! The single modal slot

use cadet_console_client::{Record, RecordId};

use super::confirmation::PendingAction;
use crate::form::FormState;

/// Identity of one opening of a modal. Results of slow calls are applied only
/// while the token they were issued for is still showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone)]
pub enum Modal {
    Form {
        token: ModalToken,
        mode: FormMode,
        form: FormState,
        /// Waiting for the record to edit.
        loading: bool,
    },
    View {
        token: ModalToken,
        /// `None` while loading.
        record: Option<Record>,
    },
    Confirm {
        token: ModalToken,
        action: PendingAction,
    },
}

impl Modal {
    pub fn token(&self) -> ModalToken {
        match self {
            Self::Form { token, .. } | Self::View { token, .. } | Self::Confirm { token, .. } => {
                *token
            }
        }
    }
}

/// At most one modal is open; opening one replaces the others.
#[derive(Debug, Default)]
pub struct ModalState {
    active: Option<Modal>,
    next_token: u64,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_current(&self, token: ModalToken) -> bool {
        self.active.as_ref().is_some_and(|m| m.token() == token)
    }

    pub fn open_form(&mut self, mode: FormMode, form: FormState, loading: bool) -> ModalToken {
        let token = self.issue();
        self.active = Some(Modal::Form {
            token,
            mode,
            form,
            loading,
        });
        token
    }

    pub fn open_view(&mut self) -> ModalToken {
        let token = self.issue();
        self.active = Some(Modal::View {
            token,
            record: None,
        });
        token
    }

    pub fn open_confirm(&mut self, action: PendingAction) -> ModalToken {
        let token = self.issue();
        self.active = Some(Modal::Confirm { token, action });
        token
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    /// Close only if `token` is still the open modal.
    pub fn close_if(&mut self, token: ModalToken) -> bool {
        if self.is_current(token) {
            self.active = None;
            return true;
        }
        false
    }

    /// The open form, together with its token and mode.
    pub fn form(&self) -> Option<(ModalToken, &FormMode, &FormState)> {
        match &self.active {
            Some(Modal::Form {
                token,
                mode,
                form,
                loading: false,
            }) => Some((*token, mode, form)),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match &mut self.active {
            Some(Modal::Form {
                form,
                loading: false,
                ..
            }) => Some(form),
            _ => None,
        }
    }

    /// Hand a loaded form to the modal opened with `token`.
    pub fn finish_form(&mut self, token: ModalToken, loaded: FormState) -> bool {
        match &mut self.active {
            Some(Modal::Form {
                token: t,
                form,
                loading,
                ..
            }) if *t == token => {
                *form = loaded;
                *loading = false;
                true
            }
            _ => false,
        }
    }

    pub fn finish_view(&mut self, token: ModalToken, loaded: Record) -> bool {
        match &mut self.active {
            Some(Modal::View { token: t, record }) if *t == token => {
                *record = Some(loaded);
                true
            }
            _ => false,
        }
    }

    fn issue(&mut self) -> ModalToken {
        self.next_token += 1;
        ModalToken(self.next_token)
    }
}
