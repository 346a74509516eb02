//! Courier flow: one shipping record with its attached documents.

use tixproof_core::models::{
    Artifact, ArtifactId, ArtifactRules, CompletionStatus, CourierDetails, CourierField,
    DiffPayload, FlowKind, SessionContext,
};
use tixproof_core::EngineSettings;

use crate::courier::CourierRecord;
use crate::engine::{FlowState, SlotDiffEngine};
use crate::payload::DiffPayloadBuilder;

pub type CourierFlow = SlotDiffEngine<CourierRecord>;

impl FlowState for CourierRecord {
    const KIND: FlowKind = FlowKind::Courier;

    fn build_diff(&self) -> DiffPayload {
        DiffPayload::Courier(DiffPayloadBuilder::courier(self))
    }

    fn is_valid(&self) -> bool {
        CourierRecord::is_valid(self)
    }

    /// A single record: 1/1 once company and tracking number are present.
    fn completion(&self) -> CompletionStatus {
        CompletionStatus::new(u32::from(CourierRecord::is_valid(self)), 1)
    }

    fn reset(&mut self) {
        self.revert();
    }

    fn clear(&mut self) {
        CourierRecord::clear(self);
    }
}

impl SlotDiffEngine<CourierRecord> {
    pub fn courier(
        context: SessionContext,
        settings: EngineSettings,
        details: CourierDetails,
        files: Vec<Artifact>,
    ) -> Self {
        let rules = ArtifactRules::from(&settings);
        let record = CourierRecord::load(details, files, rules);
        Self::new(context, settings, record)
    }

    pub fn update(&mut self, field: CourierField, value: impl Into<String>) {
        self.mutate(|record| record.update(field, value));
    }

    pub fn attach_file(&mut self, artifact: Artifact) -> Option<ArtifactId> {
        self.mutate(|record| record.attach_file(artifact))
    }

    pub fn detach_file(&mut self, id: &ArtifactId) -> Option<Artifact> {
        self.mutate(|record| record.detach_file(id))
    }
}
