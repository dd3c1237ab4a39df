//! Presentation state shared by the controllers

mod confirmation;
mod modal;
mod notification;
mod page;

pub use confirmation::{ActionKind, ConfirmationGate, Decision, PendingAction, Resolution};
pub use modal::{FormMode, Modal, ModalState, ModalToken};
pub use notification::{
    Notification, NotificationKind, Notifier, DEFAULT_NOTIFICATION_DURATION,
};
pub use page::{PageLink, PageState};
