//! Generic slot/diff engine shared by the three upload flows.
//!
//! The engine owns the flow state behind an `Arc`. Every mutation goes through
//! [`SlotDiffEngine::mutate`], which edits the state and replaces the current
//! snapshot before returning; observers are notified afterwards through a
//! `watch` channel and the change-count callback. Reads never wait for an
//! observer to catch up.

use std::collections::BTreeSet;
use std::sync::Arc;

use tixproof_core::models::{
    CompletionStatus, DiffPayload, FlowKind, SessionContext, SubmissionRequest, SubmitOutcome,
};
use tixproof_core::{EngineError, EngineSettings, ErrorMetadata, LogLevel, SubmissionEndpoint};
use tokio::sync::watch;

/// Flow-specific state plugged into the engine: what is diffed and how.
pub trait FlowState: Clone + Send + Sync + 'static {
    const KIND: FlowKind;

    /// Minimal change-set relative to the baseline
    fn build_diff(&self) -> DiffPayload;

    /// Flow-specific minimum completion check
    fn is_valid(&self) -> bool;

    fn completion(&self) -> CompletionStatus;

    /// Discard local edits and return to the baseline
    fn reset(&mut self);

    /// Discard the session, baseline included
    fn clear(&mut self);
}

/// Called with the new counts whenever completion changes.
pub type ChangeCountCallback = Box<dyn FnMut(CompletionStatus) + Send>;

pub struct SlotDiffEngine<S: FlowState> {
    context: SessionContext,
    settings: EngineSettings,
    current: Arc<S>,
    observers: watch::Sender<Arc<S>>,
    last_completion: CompletionStatus,
    on_change_count: Option<ChangeCountCallback>,
    pub(crate) deletes_in_flight: BTreeSet<u32>,
}

impl<S: FlowState> SlotDiffEngine<S> {
    pub fn new(context: SessionContext, settings: EngineSettings, state: S) -> Self {
        let current = Arc::new(state);
        let last_completion = current.completion();
        let (observers, _) = watch::channel(Arc::clone(&current));

        tracing::debug!(
            flow = %S::KIND,
            container_id = context.container_id,
            max_quantity = context.max_quantity,
            "Upload session started"
        );

        Self {
            context,
            settings,
            current,
            observers,
            last_completion,
            on_change_count: None,
            deletes_in_flight: BTreeSet::new(),
        }
    }

    /// Register the host's progress callback.
    pub fn on_change_count(
        mut self,
        callback: impl FnMut(CompletionStatus) + Send + 'static,
    ) -> Self {
        self.on_change_count = Some(Box::new(callback));
        self
    }

    pub fn kind(&self) -> FlowKind {
        S::KIND
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Latest state, updated by every mutation before it returns
    pub fn current(&self) -> Arc<S> {
        Arc::clone(&self.current)
    }

    pub fn state(&self) -> &S {
        &self.current
    }

    /// Receiver for deferred observers (UI re-render and the like).
    pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
        self.observers.subscribe()
    }

    pub fn build(&self) -> DiffPayload {
        self.current.build_diff()
    }

    pub fn is_valid(&self) -> bool {
        self.current.is_valid()
    }

    pub fn completion_status(&self) -> CompletionStatus {
        self.current.completion()
    }

    pub fn is_delete_in_flight(&self, slot: u32) -> bool {
        self.deletes_in_flight.contains(&slot)
    }

    /// Apply `f` to the state and publish the result.
    pub(crate) fn mutate<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(Arc::make_mut(&mut self.current));
        self.publish();
        result
    }

    fn publish(&mut self) {
        self.observers.send_replace(Arc::clone(&self.current));

        let completion = self.current.completion();
        if completion != self.last_completion {
            self.last_completion = completion;
            if let Some(callback) = self.on_change_count.as_mut() {
                callback(completion);
            }
        }
    }

    pub fn reset(&mut self) {
        tracing::debug!(flow = %S::KIND, "Resetting session to baseline");
        self.mutate(S::reset);
    }

    pub fn clear(&mut self) {
        tracing::debug!(flow = %S::KIND, "Clearing session");
        self.mutate(S::clear);
    }

    /// Send the current diff to the submission endpoint.
    ///
    /// An empty diff is not sent. A success status clears the session; any
    /// other outcome leaves state untouched so the user can retry.
    pub async fn submit(
        &mut self,
        endpoint: &dyn SubmissionEndpoint,
    ) -> Result<SubmitOutcome, EngineError> {
        let payload = self.build();
        if !payload.has_changes() {
            tracing::debug!(flow = %S::KIND, "Nothing to submit");
            return Ok(SubmitOutcome::NothingToSubmit);
        }

        let request = SubmissionRequest {
            container_id: self.context.container_id,
            payload,
        };

        tracing::info!(
            flow = %S::KIND,
            container_id = self.context.container_id,
            "Submitting changes"
        );

        let result = match endpoint.submit(&request).await {
            Ok(response) if response.status == self.settings.success_status => {
                tracing::info!(
                    flow = %S::KIND,
                    container_id = self.context.container_id,
                    status = response.status,
                    "Submission accepted"
                );
                self.clear();
                Ok(SubmitOutcome::Submitted)
            }
            Ok(response) => Err(EngineError::SubmissionFailed {
                status: Some(response.status),
                message: response.message.unwrap_or_default(),
            }),
            Err(message) => Err(EngineError::SubmissionFailed {
                status: None,
                message,
            }),
        };

        if let Err(ref e) = result {
            log_engine_error(e);
        }
        result
    }
}

/// Log an error at the level its metadata asks for.
pub(crate) fn log_engine_error(err: &EngineError) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, code = err.error_code(), "Engine error"),
        LogLevel::Warn => tracing::warn!(error = %err, code = err.error_code(), "Engine error"),
        LogLevel::Error => tracing::error!(error = %err, code = err.error_code(), "Engine error"),
    }
}
