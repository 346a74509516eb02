//! Per-slot modification state machine.
//!
//! ```text
//! unchanged  --fill-->   new_upload   (slot not backed by the baseline)
//! unchanged  --delete--> deleted      (originalId from the baseline)
//! deleted    --fill-->   reuploaded   (originalId carried over from the deleted record)
//! reuploaded --delete--> deleted      (originalId carried over again)
//! new_upload --delete--> unchanged
//! ```
//!
//! Filling a slot that already holds something is rejected.

use std::collections::BTreeMap;

use serde::Serialize;
use tixproof_core::models::{Artifact, BaselineAssignment, ModificationRecord, SlotAction};
use tixproof_core::EngineError;

/// What a delete did to the slot record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedDelete {
    /// A `new_upload` was dropped; the slot is unchanged again
    Discarded,
    /// The slot is now `deleted`. `remote` is set when the server still holds
    /// the original artifact and must be told to delete it.
    Deleted { original_id: String, remote: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModificationTracker {
    records: BTreeMap<u32, ModificationRecord>,
}

fn illegal(slot: u32, from: Option<SlotAction>, action: &str) -> EngineError {
    EngineError::IllegalTransition {
        slot,
        from: from
            .map(|a| a.to_string())
            .unwrap_or_else(|| "unchanged".to_string()),
        action: action.to_string(),
    }
}

impl ModificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current action for a slot; `None` means unchanged
    pub fn state(&self, slot: u32) -> Option<SlotAction> {
        self.records.get(&slot).map(|r| r.action)
    }

    pub fn record(&self, slot: u32) -> Option<&ModificationRecord> {
        self.records.get(&slot)
    }

    /// Record that `artifact` was placed into an empty slot.
    pub fn fill(
        &mut self,
        slot: u32,
        artifact: Artifact,
        baseline: Option<&BaselineAssignment>,
    ) -> Result<&ModificationRecord, EngineError> {
        let next = match self.records.get(&slot) {
            None => {
                if baseline.map(|b| b.is_backed()).unwrap_or(false) {
                    return Err(illegal(slot, None, "fill"));
                }
                ModificationRecord::new_upload(
                    slot,
                    artifact,
                    baseline.and_then(|b| b.ticket_detail_id),
                )
            }
            Some(record) if record.action == SlotAction::Deleted => {
                let original_id = record.original_id.clone().ok_or_else(|| {
                    EngineError::Internal(format!("slot {} deleted without id", slot))
                })?;
                ModificationRecord::reuploaded(slot, original_id, artifact, record.ticket_detail_id)
            }
            Some(record) => return Err(illegal(slot, Some(record.action), "fill")),
        };

        tracing::debug!(slot, action = %next.action, "Slot filled");
        self.records.insert(slot, next);
        self.records
            .get(&slot)
            .ok_or_else(|| EngineError::Internal(format!("slot {} record missing", slot)))
    }

    /// Record that a filled slot was emptied.
    pub fn delete(
        &mut self,
        slot: u32,
        baseline: Option<&BaselineAssignment>,
    ) -> Result<TrackedDelete, EngineError> {
        let outcome = match self.records.get(&slot) {
            None => {
                let backed = baseline
                    .filter(|b| b.is_backed())
                    .ok_or_else(|| illegal(slot, None, "delete"))?;
                self.records.insert(
                    slot,
                    ModificationRecord::deleted(
                        slot,
                        backed.original_artifact_id.clone(),
                        backed.ticket_detail_id,
                    ),
                );
                TrackedDelete::Deleted {
                    original_id: backed.original_artifact_id.clone(),
                    remote: true,
                }
            }
            Some(record) => match record.action {
                SlotAction::NewUpload => {
                    self.records.remove(&slot);
                    TrackedDelete::Discarded
                }
                SlotAction::Reuploaded => {
                    let original_id = record.original_id.clone().ok_or_else(|| {
                        EngineError::Internal(format!("slot {} reuploaded without id", slot))
                    })?;
                    let ticket_detail_id = record.ticket_detail_id;
                    self.records.insert(
                        slot,
                        ModificationRecord::deleted(slot, original_id.clone(), ticket_detail_id),
                    );
                    TrackedDelete::Deleted {
                        original_id,
                        remote: false,
                    }
                }
                SlotAction::Deleted => {
                    return Err(illegal(slot, Some(SlotAction::Deleted), "delete"));
                }
            },
        };

        tracing::debug!(slot, outcome = ?outcome, "Slot emptied");
        Ok(outcome)
    }

    /// Drop the record for a slot, returning it to unchanged.
    pub fn restore(&mut self, slot: u32) -> Option<ModificationRecord> {
        self.records.remove(&slot)
    }

    /// Records in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = &ModificationRecord> {
        self.records.values()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
