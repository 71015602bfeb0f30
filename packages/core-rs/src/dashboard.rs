//! Wires the collection, derived views, mutation controller and backend
//! together. Stats and the visible rows are recomputed from the collection on
//! every state change and pushed to the render sink; nothing derived is cached.

use crate::client::FileBackend;
use crate::collection::FileCollection;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, LoadError};
use crate::filter::{apply_query, Query};
use crate::mutation::{ConfirmDialog, MutationController, MutationOutcome};
use crate::stats::{compute_stats, DashboardStats};
use crate::types::FileRecord;
use crate::view::{DashboardView, RenderSink};
use tracing::{debug, error, info};

pub struct Dashboard<B: FileBackend> {
    backend: B,
    collection: FileCollection,
    query: Query,
    mutations: MutationController,
}

impl<B: FileBackend> Dashboard<B> {
    pub fn new(backend: B, config: &DashboardConfig) -> Self {
        Self {
            backend,
            collection: FileCollection::new(),
            query: Query::default(),
            mutations: MutationController::new(config.settle_delay()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn collection(&self) -> &FileCollection {
        &self.collection
    }

    pub fn mutations(&self) -> &MutationController {
        &self.mutations
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Fetches a fresh snapshot. On failure the previous collection stays in
    /// place and nothing is re-rendered.
    pub fn load(&mut self, sink: &mut dyn RenderSink) -> Result<(), LoadError> {
        let loaded = self
            .backend
            .fetch_files()
            .and_then(|records| self.collection.load(records));

        if let Err(err) = loaded {
            error!(error = %err, kept = self.collection.len(), "loading files failed");
            return Err(err);
        }

        info!(count = self.collection.len(), "files loaded");
        self.render(sink);
        Ok(())
    }

    pub fn set_query(&mut self, query: Query, sink: &mut dyn RenderSink) {
        debug!(?query, "query changed");
        self.query = query;
        self.render(sink);
    }

    pub fn stats(&self) -> DashboardStats {
        compute_stats(self.collection.all())
    }

    pub fn visible(&self) -> Vec<&FileRecord> {
        apply_query(self.collection.all(), &self.query)
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.visible(), self.stats())
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        let view = self.view();
        debug!(rows = view.rows.len(), total = view.stats.total_count, "rendering");
        sink.render(&view);
    }

    pub fn request_delete(&mut self, id: impl Into<String>, dialog: &mut dyn ConfirmDialog) {
        self.mutations.request_delete(id, dialog);
    }

    pub fn request_cleanup(&mut self, dialog: &mut dyn ConfirmDialog) {
        self.mutations.request_cleanup(dialog);
    }

    pub fn cancel(&mut self, dialog: &mut dyn ConfirmDialog) -> bool {
        self.mutations.cancel(dialog)
    }

    /// Executes the pending action. A delete re-renders from the trimmed
    /// collection; a cleanup reloads everything from the backend, falling back
    /// to an empty collection if that reload fails.
    pub fn confirm(
        &mut self,
        dialog: &mut dyn ConfirmDialog,
        sink: &mut dyn RenderSink,
    ) -> Result<MutationOutcome, DashboardError> {
        let outcome = self
            .mutations
            .confirm(&self.backend, &mut self.collection, dialog)?;

        match &outcome {
            MutationOutcome::Removed { .. } => self.render(sink),
            MutationOutcome::ReloadRequired => {
                if let Err(err) = self.load(sink) {
                    // Backend already dropped everything; don't keep showing it.
                    self.collection.clear();
                    self.render(sink);
                    return Err(err.into());
                }
            }
        }
        Ok(outcome)
    }
}
