//! Narrow contract the surrounding screen uses to talk to a flow.

use std::sync::Arc;

use tixproof_core::models::CompletionStatus;

use crate::engine::{FlowState, SlotDiffEngine};

/// The only calls a host screen makes into an upload session.
pub trait HostAccessor {
    type Data;

    /// Full current slot/ledger/record state
    fn current_data(&self) -> Self::Data;

    /// Flow-specific minimum completion check
    fn is_valid(&self) -> bool;

    fn completion_status(&self) -> CompletionStatus;

    fn reset(&mut self);

    fn clear(&mut self);
}

impl<S: FlowState> HostAccessor for SlotDiffEngine<S> {
    type Data = Arc<S>;

    fn current_data(&self) -> Arc<S> {
        self.current()
    }

    fn is_valid(&self) -> bool {
        SlotDiffEngine::is_valid(self)
    }

    fn completion_status(&self) -> CompletionStatus {
        SlotDiffEngine::completion_status(self)
    }

    fn reset(&mut self) {
        SlotDiffEngine::reset(self)
    }

    fn clear(&mut self) {
        SlotDiffEngine::clear(self)
    }
}
