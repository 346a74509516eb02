//! QR wallet-link flow: Android and iOS links per ticket slot.

use tixproof_core::models::{
    CompletionStatus, DiffPayload, FlowKind, LinkField, QrLinkBaseline, SessionContext,
};
use tixproof_core::{EngineError, EngineSettings};

use crate::engine::{log_engine_error, FlowState, SlotDiffEngine};
use crate::payload::DiffPayloadBuilder;
use crate::qr_ledger::QrLinkLedger;

pub type QrFlow = SlotDiffEngine<QrLinkLedger>;

impl FlowState for QrLinkLedger {
    const KIND: FlowKind = FlowKind::QrLinks;

    fn build_diff(&self) -> DiffPayload {
        DiffPayload::QrLinks(DiffPayloadBuilder::qr(self))
    }

    /// Both links present on every slot
    fn is_valid(&self) -> bool {
        self.completed_count() == self.max_quantity()
    }

    fn completion(&self) -> CompletionStatus {
        CompletionStatus::new(self.completed_count(), self.max_quantity())
    }

    fn reset(&mut self) {
        self.revert(None);
    }

    fn clear(&mut self) {
        QrLinkLedger::clear(self);
    }
}

impl SlotDiffEngine<QrLinkLedger> {
    pub fn qr_links(
        context: SessionContext,
        settings: EngineSettings,
        baselines: Vec<QrLinkBaseline>,
    ) -> Self {
        let ledger = QrLinkLedger::load(context.max_quantity, baselines);
        Self::new(context, settings, ledger)
    }

    pub fn set_link(
        &mut self,
        slot: u32,
        field: LinkField,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.state()
            .entry(slot)
            .ok_or(EngineError::SlotOutOfRange {
                slot,
                max_quantity: self.state().max_quantity(),
            })
            .inspect_err(log_engine_error)?;
        self.mutate(|ledger| ledger.set_link(slot, field, value))
    }

    /// Undo edits on one slot, or on all of them.
    pub fn revert(&mut self, slot: Option<u32>) {
        self.mutate(|ledger| ledger.revert(slot));
    }

    pub fn is_modified(&self, slot: u32, field: LinkField) -> bool {
        self.state().is_modified(slot, field)
    }
}
