//! Confirm-then-execute state machine for the two destructive actions.
//!
//! A request only arms the controller and raises the confirmation dialog;
//! nothing reaches the backend until `confirm` is called while an action is
//! awaiting confirmation.

use crate::client::FileBackend;
use crate::collection::FileCollection;
use crate::error::MutationError;
use std::mem;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete { id: String },
    Cleanup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    AwaitingConfirmation(PendingAction),
    Executing(PendingAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The record was deleted remotely and dropped from the local collection.
    Removed { id: String },
    /// Cleanup succeeded; local state must be re-synchronized from the backend.
    ReloadRequired,
}

/// Two-state acknowledgement channel (shown/hidden).
pub trait ConfirmDialog {
    fn show(&mut self, action: &PendingAction);
    fn hide(&mut self);
}

#[derive(Debug)]
pub struct MutationController {
    state: MutationState,
    settle_delay: Duration,
}

impl MutationController {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            state: MutationState::Idle,
            settle_delay,
        }
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.state {
            MutationState::AwaitingConfirmation(action) => Some(action),
            _ => None,
        }
    }

    pub fn request_delete(&mut self, id: impl Into<String>, dialog: &mut dyn ConfirmDialog) {
        self.arm(PendingAction::Delete { id: id.into() }, dialog);
    }

    pub fn request_cleanup(&mut self, dialog: &mut dyn ConfirmDialog) {
        self.arm(PendingAction::Cleanup, dialog);
    }

    fn arm(&mut self, action: PendingAction, dialog: &mut dyn ConfirmDialog) {
        if let MutationState::AwaitingConfirmation(previous) = &self.state {
            debug!(?previous, ?action, "replacing pending action");
        }
        dialog.show(&action);
        self.state = MutationState::AwaitingConfirmation(action);
    }

    /// Returns `false` when there was nothing to cancel.
    pub fn cancel(&mut self, dialog: &mut dyn ConfirmDialog) -> bool {
        match &self.state {
            MutationState::AwaitingConfirmation(action) => {
                debug!(?action, "pending action cancelled");
                dialog.hide();
                self.state = MutationState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn confirm(
        &mut self,
        backend: &dyn FileBackend,
        collection: &mut FileCollection,
        dialog: &mut dyn ConfirmDialog,
    ) -> Result<MutationOutcome, MutationError> {
        let action = match mem::replace(&mut self.state, MutationState::Idle) {
            MutationState::AwaitingConfirmation(action) => action,
            other => {
                self.state = other;
                return Err(MutationError::NothingPending);
            }
        };
        self.state = MutationState::Executing(action.clone());

        let result = match &action {
            PendingAction::Delete { id } => backend.delete_file(id),
            PendingAction::Cleanup => backend.cleanup(),
        };
        dialog.hide();

        if let Err(error) = result {
            warn!(%error, ?action, "mutation failed, collection left untouched");
            self.state = MutationState::Idle;
            return Err(error);
        }

        self.settle();
        let outcome = match action {
            PendingAction::Delete { id } => {
                collection.remove(&id);
                info!(%id, remaining = collection.len(), "file deleted");
                MutationOutcome::Removed { id }
            }
            PendingAction::Cleanup => {
                info!("cleanup accepted, reload required");
                MutationOutcome::ReloadRequired
            }
        };
        self.state = MutationState::Idle;
        Ok(outcome)
    }

    fn settle(&self) {
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
    }
}
