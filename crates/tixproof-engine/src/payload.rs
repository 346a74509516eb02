//! Minimal submission payloads derived from tracked state.

use tixproof_core::models::{
    CourierDiff, FilePayload, FileUploadEntry, QrLinkDiff, SlotAction,
};

use crate::courier::CourierRecord;
use crate::qr_ledger::QrLinkLedger;
use crate::tracker::ModificationTracker;

/// Builds the change-set for each flow. Pure reads: calling a builder twice
/// without an intervening mutation yields identical output.
pub struct DiffPayloadBuilder;

impl DiffPayloadBuilder {
    /// `new_upload` and `reuploaded` records as indexed `(ticket_id, ticket_file)`
    /// pairs in ascending slot order. Deleted slots were already sent through the
    /// per-slot delete call and are left out.
    pub fn files(tracker: &ModificationTracker) -> FilePayload {
        let uploads = tracker
            .iter()
            .filter(|r| matches!(r.action, SlotAction::NewUpload | SlotAction::Reuploaded))
            .filter_map(|r| r.new_artifact.as_ref().map(|artifact| (r, artifact)))
            .filter(|(_, artifact)| artifact.is_pending())
            .enumerate()
            .map(|(index, (record, artifact))| FileUploadEntry {
                index,
                slot: record.slot,
                action: record.action,
                ticket_id: record.ticket_detail_id,
                original_id: record.original_id.clone(),
                ticket_file: artifact.clone(),
            })
            .collect();

        FilePayload { uploads }
    }

    pub fn qr(ledger: &QrLinkLedger) -> Vec<QrLinkDiff> {
        ledger.diff()
    }

    pub fn courier(record: &CourierRecord) -> CourierDiff {
        record.diff()
    }
}
