//! File-slot flow: artifacts move from the pending pool into numbered slots,
//! and each slot is tracked against the server baseline.

use std::collections::BTreeSet;

use serde::Serialize;
use tixproof_core::models::{
    Artifact, ArtifactId, ArtifactRules, BaselineEntry, CompletionStatus, DiffPayload, FlowKind,
    SessionContext,
};
use tixproof_core::{DeleteFailurePolicy, EngineError, EngineSettings, SubmissionEndpoint};

use crate::baseline::BaselineSnapshot;
use crate::engine::{log_engine_error, FlowState, SlotDiffEngine};
use crate::payload::DiffPayloadBuilder;
use crate::pending::PendingPool;
use crate::slot_store::SlotStore;
use crate::tracker::{ModificationTracker, TrackedDelete};
use crate::transfer::TransferResolver;

pub type FileFlow = SlotDiffEngine<FileSlots>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSlots {
    baseline: BaselineSnapshot,
    store: SlotStore<Artifact>,
    pool: PendingPool,
    tracker: ModificationTracker,
    #[serde(skip)]
    rules: ArtifactRules,
}

impl FileSlots {
    /// Seed the slot store with every baseline-backed artifact.
    pub fn load(max_quantity: u32, entries: Vec<BaselineEntry>, rules: ArtifactRules) -> Self {
        Self::from_baseline(BaselineSnapshot::load(max_quantity, entries), rules)
    }

    fn from_baseline(baseline: BaselineSnapshot, rules: ArtifactRules) -> Self {
        let mut store = SlotStore::new(baseline.max_quantity());
        for (slot, artifact) in baseline.artifacts() {
            if let Err(e) = store.assign(slot, artifact) {
                tracing::debug!(slot, error = %e, "Skipping baseline artifact");
            }
        }

        Self {
            baseline,
            store,
            pool: PendingPool::new(),
            tracker: ModificationTracker::new(),
            rules,
        }
    }

    pub fn baseline(&self) -> &BaselineSnapshot {
        &self.baseline
    }

    pub fn store(&self) -> &SlotStore<Artifact> {
        &self.store
    }

    pub fn pool(&self) -> &PendingPool {
        &self.pool
    }

    pub fn tracker(&self) -> &ModificationTracker {
        &self.tracker
    }

    pub fn slot(&self, slot: u32) -> Option<&Artifact> {
        self.store.get(slot)
    }

    fn transfer(
        &mut self,
        id: &ArtifactId,
        requested: Option<u32>,
        locked: &BTreeSet<u32>,
    ) -> Result<u32, EngineError> {
        let slot = TransferResolver::resolve(&self.store, requested, locked)?;
        let artifact = self
            .pool
            .remove(id)
            .ok_or_else(|| EngineError::Internal(format!("artifact {} left the pool", id)))?;

        if let Err(e) = self.store.assign(slot, artifact.clone()) {
            self.pool.restore(artifact);
            return Err(e);
        }
        if let Err(e) = self.tracker.fill(slot, artifact.clone(), self.baseline.get(slot)) {
            self.store.unassign(slot);
            self.pool.restore(artifact);
            return Err(e);
        }

        tracing::debug!(slot, artifact_id = %id, "Artifact transferred");
        Ok(slot)
    }

    /// Empty a filled slot. Pending artifacts go back to the pool; the
    /// baseline's existing artifact is dropped from local state.
    fn empty_slot(&mut self, slot: u32) -> Result<Option<TrackedDelete>, EngineError> {
        let Some(artifact) = self.store.unassign(slot) else {
            return Ok(None);
        };

        match self.tracker.delete(slot, self.baseline.get(slot)) {
            Ok(outcome) => {
                if artifact.is_pending() {
                    self.pool.restore(artifact);
                }
                Ok(Some(outcome))
            }
            Err(e) => {
                self.store.assign_forced(slot, artifact)?;
                Err(e)
            }
        }
    }

    /// The server no longer holds the slot's original artifact. Drop it from
    /// the baseline, and from the store if a reset put it back meanwhile.
    fn confirm_delete(&mut self, slot: u32) {
        let Some(original_id) = self.baseline.forget_artifact(slot) else {
            return;
        };
        let restored = self
            .store
            .get(slot)
            .and_then(|a| a.id.server_id())
            .is_some_and(|id| id == original_id);
        if restored {
            self.store.unassign(slot);
        }
    }

    /// Put the baseline artifact back and forget the `deleted` record.
    fn rollback_delete(&mut self, slot: u32) {
        self.tracker.restore(slot);
        match self.baseline.artifacts().find(|(s, _)| *s == slot) {
            Some((_, artifact)) => {
                if let Err(e) = self.store.assign_forced(slot, artifact) {
                    tracing::debug!(slot, error = %e, "Baseline artifact could not be restored");
                }
            }
            None => {
                self.store.unassign(slot);
            }
        }
    }
}

impl FlowState for FileSlots {
    const KIND: FlowKind = FlowKind::Files;

    fn build_diff(&self) -> DiffPayload {
        DiffPayload::Files(DiffPayloadBuilder::files(&self.tracker))
    }

    /// Every ticket slot filled
    fn is_valid(&self) -> bool {
        self.store.is_full()
    }

    fn completion(&self) -> CompletionStatus {
        CompletionStatus::new(self.store.filled_count(), self.store.max_quantity())
    }

    fn reset(&mut self) {
        let baseline = self.baseline.clone();
        *self = Self::from_baseline(baseline, self.rules.clone());
    }

    fn clear(&mut self) {
        let baseline = BaselineSnapshot::empty(self.baseline.max_quantity());
        *self = Self::from_baseline(baseline, self.rules.clone());
    }
}

/// A remote delete the host must carry out, returned by
/// [`FileFlow::begin_delete`] and handed back to [`FileFlow::finish_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub slot: u32,
    pub original_id: String,
    pub container_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Slot was already empty
    Unchanged,
    /// Emptied locally, no server call needed
    Local,
    /// Server confirmed the delete
    Confirmed,
    /// Server delete failed; the slot stays deleted locally
    FailedKeptLocal,
    /// Server delete failed; the baseline artifact was put back
    FailedRolledBack,
}

impl SlotDiffEngine<FileSlots> {
    pub fn files(
        context: SessionContext,
        settings: EngineSettings,
        entries: Vec<BaselineEntry>,
    ) -> Self {
        let rules = ArtifactRules::from(&settings);
        let state = FileSlots::load(context.max_quantity, entries, rules);
        Self::new(context, settings, state)
    }

    /// Add an artifact to the pending pool. Invalid artifacts are excluded.
    pub fn add_pending(&mut self, artifact: Artifact) -> Option<ArtifactId> {
        self.mutate(|s| s.pool.add(artifact, &s.rules))
    }

    pub fn remove_pending(&mut self, id: &ArtifactId) -> Option<Artifact> {
        if !self.state().pool.contains(id) {
            return None;
        }
        self.mutate(|s| s.pool.remove(id))
    }

    /// Empty slots that can take a transfer right now, ascending.
    pub fn available_slots(&self) -> Vec<u32> {
        self.state()
            .store
            .available_slots()
            .into_iter()
            .filter(|slot| !self.is_delete_in_flight(*slot))
            .collect()
    }

    /// Move a pending artifact into `requested`, or the lowest free slot when
    /// that one is taken. Returns `Ok(None)` when the artifact is not pending.
    pub fn transfer(
        &mut self,
        id: &ArtifactId,
        requested: Option<u32>,
    ) -> Result<Option<u32>, EngineError> {
        if !self.state().pool.contains(id) {
            tracing::debug!(artifact_id = %id, "Transfer ignored, artifact not pending");
            return Ok(None);
        }

        let locked = self.deletes_in_flight.clone();
        TransferResolver::resolve(self.state().store(), requested, &locked)
            .inspect_err(log_engine_error)?;

        self.mutate(|s| s.transfer(id, requested, &locked))
            .inspect_err(log_engine_error)
            .map(Some)
    }

    /// First half of a slot removal.
    ///
    /// Applies the local change immediately. Returns a [`DeleteRequest`] when
    /// the server still holds the slot's original artifact; the slot then
    /// stays locked until [`finish_delete`](Self::finish_delete).
    pub fn begin_delete(&mut self, slot: u32) -> Result<Option<DeleteRequest>, EngineError> {
        if self.is_delete_in_flight(slot) {
            let err = EngineError::DeleteInFlight(slot);
            log_engine_error(&err);
            return Err(err);
        }
        self.state().store().check_slot(slot)?;
        if !self.state().store().is_filled(slot) {
            return Ok(None);
        }

        let outcome = self.mutate(|s| s.empty_slot(slot))?;
        match outcome {
            Some(TrackedDelete::Deleted {
                original_id,
                remote: true,
            }) => {
                self.deletes_in_flight.insert(slot);
                tracing::info!(
                    slot,
                    original_id = %original_id,
                    "Deleting slot artifact on server"
                );
                Ok(Some(DeleteRequest {
                    slot,
                    original_id,
                    container_id: self.context().container_id,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Second half of a slot removal: apply the server's answer.
    pub fn finish_delete(
        &mut self,
        request: DeleteRequest,
        result: Result<(), String>,
    ) -> DeleteOutcome {
        self.deletes_in_flight.remove(&request.slot);

        let message = match result {
            Ok(()) => {
                tracing::info!(slot = request.slot, "Slot artifact deleted on server");
                self.mutate(|s| s.confirm_delete(request.slot));
                return DeleteOutcome::Confirmed;
            }
            Err(message) => message,
        };

        log_engine_error(&EngineError::PerSlotDeleteFailed {
            slot: request.slot,
            message,
        });

        match self.settings().delete_failure_policy {
            DeleteFailurePolicy::KeepLocal => DeleteOutcome::FailedKeptLocal,
            DeleteFailurePolicy::Rollback => {
                self.mutate(|s| s.rollback_delete(request.slot));
                DeleteOutcome::FailedRolledBack
            }
        }
    }

    /// Remove a slot's content, calling the endpoint when the server holds it.
    pub async fn delete_slot(
        &mut self,
        slot: u32,
        endpoint: &dyn SubmissionEndpoint,
    ) -> Result<DeleteOutcome, EngineError> {
        let was_filled = self.state().store().is_filled(slot);
        let Some(request) = self.begin_delete(slot)? else {
            return Ok(if was_filled {
                DeleteOutcome::Local
            } else {
                DeleteOutcome::Unchanged
            });
        };

        let result = endpoint
            .delete_slot_artifact(&request.original_id, request.container_id, request.slot)
            .await;
        Ok(self.finish_delete(request, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tixproof_core::models::SlotAction;

    fn entry(slot: u32, id: &str, url: &str, tdid: i64) -> BaselineEntry {
        BaselineEntry {
            slot: Some(slot),
            id: id.to_string(),
            original_url: Some(url.to_string()),
            ticket_detail_id: Some(tdid),
            name: None,
        }
    }

    fn flow(max_quantity: u32, entries: Vec<BaselineEntry>) -> FileFlow {
        FileFlow::files(
            SessionContext {
                container_id: 7,
                max_quantity,
            },
            EngineSettings::default(),
            entries,
        )
    }

    fn pdf(name: &str) -> Artifact {
        Artifact::pending(name, "application/pdf", b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_baseline_seeds_store() {
        let flow = flow(2, vec![entry(2, "orig-2", "https://cdn.example.com/2.pdf", 102)]);
        assert!(flow.state().slot(2).unwrap().is_existing());
        assert_eq!(flow.available_slots(), vec![1]);
        assert_eq!(flow.completion_status(), CompletionStatus::new(1, 2));
    }

    #[test]
    fn test_transfer_to_requested_or_lowest_slot() {
        let mut flow = flow(3, Vec::new());
        let a = flow.add_pending(pdf("a.pdf")).unwrap();
        let b = flow.add_pending(pdf("b.pdf")).unwrap();

        assert_eq!(flow.transfer(&a, Some(2)).unwrap(), Some(2));
        assert_eq!(flow.transfer(&b, Some(2)).unwrap(), Some(1));
        assert!(flow.state().pool().is_empty());
        assert_eq!(flow.state().tracker().state(1), Some(SlotAction::NewUpload));
    }

    #[test]
    fn test_transfer_of_assigned_artifact_is_noop() {
        let mut flow = flow(2, Vec::new());
        let a = flow.add_pending(pdf("a.pdf")).unwrap();
        flow.transfer(&a, None).unwrap();
        assert_eq!(flow.transfer(&a, None).unwrap(), None);
        assert_eq!(flow.completion_status().completed, 1);
    }

    #[test]
    fn test_capacity_exceeded_keeps_artifact_pending() {
        let mut flow = flow(1, Vec::new());
        let a = flow.add_pending(pdf("a.pdf")).unwrap();
        let b = flow.add_pending(pdf("b.pdf")).unwrap();
        flow.transfer(&a, None).unwrap();
        assert!(matches!(
            flow.transfer(&b, None),
            Err(EngineError::CapacityExceeded { max_quantity: 1 })
        ));
        assert!(flow.state().pool().contains(&b));
    }

    #[test]
    fn test_removing_new_upload_returns_artifact_to_pool() {
        let mut flow = flow(2, Vec::new());
        let a = flow.add_pending(pdf("a.pdf")).unwrap();
        flow.transfer(&a, Some(1)).unwrap();

        assert_eq!(flow.begin_delete(1).unwrap(), None);
        assert!(flow.state().pool().contains(&a));
        assert!(flow.state().tracker().is_empty());
    }

    #[test]
    fn test_begin_delete_locks_slot_until_finished() {
        let mut flow = flow(2, vec![entry(1, "orig-1", "https://cdn.example.com/1.pdf", 101)]);
        let request = flow.begin_delete(1).unwrap().unwrap();
        assert_eq!(request.original_id, "orig-1");
        assert_eq!(request.container_id, 7);
        assert!(flow.is_delete_in_flight(1));
        assert_eq!(flow.available_slots(), vec![2]);
        assert!(matches!(flow.begin_delete(1), Err(EngineError::DeleteInFlight(1))));

        assert_eq!(flow.finish_delete(request, Ok(())), DeleteOutcome::Confirmed);
        assert!(!flow.is_delete_in_flight(1));
        assert_eq!(flow.state().tracker().state(1), Some(SlotAction::Deleted));
    }

    #[test]
    fn test_begin_delete_out_of_range() {
        let mut flow = flow(1, Vec::new());
        assert!(matches!(
            flow.begin_delete(4),
            Err(EngineError::SlotOutOfRange { slot: 4, .. })
        ));
    }

    #[test]
    fn test_reset_restores_baseline_and_empties_pool() {
        let mut flow = flow(2, vec![entry(1, "orig-1", "https://cdn.example.com/1.pdf", 101)]);
        let request = flow.begin_delete(1).unwrap().unwrap();
        flow.finish_delete(request, Err("timeout".to_string()));
        flow.add_pending(pdf("a.pdf")).unwrap();

        flow.reset();
        assert!(flow.state().slot(1).unwrap().is_existing());
        assert!(flow.state().pool().is_empty());
        assert!(flow.state().tracker().is_empty());
    }

    #[test]
    fn test_confirmed_delete_unbacks_baseline_slot() {
        let mut flow = flow(2, vec![entry(1, "orig-1", "https://cdn.example.com/1.pdf", 101)]);
        let request = flow.begin_delete(1).unwrap().unwrap();
        flow.finish_delete(request, Ok(()));

        let baseline = flow.state().baseline();
        assert!(baseline.backed(1).is_none());
        assert_eq!(baseline.get(1).unwrap().ticket_detail_id, Some(101));
    }

    #[test]
    fn test_clear_forgets_baseline() {
        let mut flow = flow(2, vec![entry(1, "orig-1", "https://cdn.example.com/1.pdf", 101)]);
        flow.clear();
        assert_eq!(flow.completion_status(), CompletionStatus::new(0, 2));
        assert!(flow.state().baseline().get(1).is_none());
    }

    #[test]
    fn test_is_valid_when_every_slot_filled() {
        let mut flow = flow(1, Vec::new());
        assert!(!flow.is_valid());
        let a = flow.add_pending(pdf("a.pdf")).unwrap();
        flow.transfer(&a, None).unwrap();
        assert!(flow.is_valid());
    }
}
