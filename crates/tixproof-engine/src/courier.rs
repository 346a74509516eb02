//! Courier / proof-of-delivery record, diffed as a whole against its baseline.

use serde::Serialize;
use tixproof_core::models::{
    Artifact, ArtifactId, ArtifactRules, CourierChanges, CourierDetails, CourierDiff, CourierField,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierRecord {
    details: CourierDetails,
    attached_files: Vec<Artifact>,
    baseline: CourierDetails,
    baseline_files: Vec<Artifact>,
    #[serde(skip)]
    rules: ArtifactRules,
}

impl CourierRecord {
    /// Start a session from the server state. Existing files with blank URLs are dropped.
    pub fn load(baseline: CourierDetails, files: Vec<Artifact>, rules: ArtifactRules) -> Self {
        let files: Vec<Artifact> = files
            .into_iter()
            .filter(|f| {
                let valid = f.is_existing() && rules.is_valid(f);
                if !valid {
                    tracing::debug!(artifact_id = %f.id, "Excluding invalid courier baseline file");
                }
                valid
            })
            .collect();

        Self {
            details: baseline.clone(),
            attached_files: files.clone(),
            baseline,
            baseline_files: files,
            rules,
        }
    }

    pub fn details(&self) -> &CourierDetails {
        &self.details
    }

    pub fn attached_files(&self) -> &[Artifact] {
        &self.attached_files
    }

    pub fn update(&mut self, field: CourierField, value: impl Into<String>) {
        self.details.set(field, value);
        tracing::debug!(field = %field, "Courier field updated");
    }

    /// Attach a file. Invalid files are excluded and `None` is returned.
    pub fn attach_file(&mut self, artifact: Artifact) -> Option<ArtifactId> {
        if let Err(e) = self.rules.check(&artifact) {
            tracing::debug!(
                artifact_id = %artifact.id,
                error = %e,
                "Excluding invalid courier file"
            );
            return None;
        }
        if self.attached_files.iter().any(|f| f.id == artifact.id) {
            return Some(artifact.id);
        }
        let id = artifact.id.clone();
        self.attached_files.push(artifact);
        Some(id)
    }

    pub fn detach_file(&mut self, id: &ArtifactId) -> Option<Artifact> {
        let index = self.attached_files.iter().position(|f| f.id == *id)?;
        Some(self.attached_files.remove(index))
    }

    /// Compare against the session-start snapshot.
    pub fn diff(&self) -> CourierDiff {
        self.diff_against(&self.baseline)
    }

    /// Compare the four scalar fields against `baseline` and collect new or
    /// detached files. Unchanged fields are never reported.
    pub fn diff_against(&self, baseline: &CourierDetails) -> CourierDiff {
        let mut changes = CourierChanges::default();
        for field in CourierField::ALL {
            let current = self.details.get(field);
            if current != baseline.get(field) {
                changes.set(field, current.to_string());
            }
        }

        let new_files: Vec<Artifact> = self
            .attached_files
            .iter()
            .filter(|f| f.is_pending())
            .cloned()
            .collect();

        let removed_file_ids: Vec<String> = self
            .baseline_files
            .iter()
            .filter(|b| !self.attached_files.iter().any(|f| f.id == b.id))
            .filter_map(|b| b.id.server_id().map(str::to_string))
            .collect();

        CourierDiff {
            has_changes: !changes.is_empty()
                || !new_files.is_empty()
                || !removed_file_ids.is_empty(),
            changes,
            new_files,
            removed_file_ids,
        }
    }

    /// Company and tracking number present
    pub fn is_valid(&self) -> bool {
        !self.details.company.trim().is_empty() && !self.details.tracking_number.trim().is_empty()
    }

    pub fn revert(&mut self) {
        self.details = self.baseline.clone();
        self.attached_files = self.baseline_files.clone();
    }

    pub fn clear(&mut self) {
        self.details = CourierDetails::default();
        self.baseline = CourierDetails::default();
        self.attached_files.clear();
        self.baseline_files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> CourierDetails {
        CourierDetails {
            courier_type: "standard".to_string(),
            company: "DHL".to_string(),
            tracking_number: "123".to_string(),
            tracking_link: String::new(),
        }
    }

    fn record() -> CourierRecord {
        CourierRecord::load(
            baseline(),
            vec![Artifact::existing("f1", "pod.pdf", "https://cdn.example.com/pod.pdf")],
            ArtifactRules::default(),
        )
    }

    #[test]
    fn test_untouched_record_has_no_changes() {
        let diff = record().diff();
        assert!(!diff.has_changes);
        assert!(diff.changes.is_empty());
        assert!(diff.new_files.is_empty());
    }

    #[test]
    fn test_only_changed_fields_are_reported() {
        let mut record = record();
        record.update(CourierField::TrackingNumber, "456");
        let diff = record.diff();
        assert!(diff.has_changes);
        assert_eq!(diff.changes.tracking_number.as_deref(), Some("456"));
        assert!(diff.changes.company.is_none());
        assert!(diff.changes.courier_type.is_none());
    }

    #[test]
    fn test_field_set_back_to_baseline_is_unchanged() {
        let mut record = record();
        record.update(CourierField::Company, "UPS");
        record.update(CourierField::Company, "DHL");
        assert!(!record.diff().has_changes);
    }

    #[test]
    fn test_pending_file_is_a_change_existing_is_not_resent() {
        let mut record = record();
        record
            .attach_file(Artifact::pending("label.pdf", "application/pdf", b"%PDF".to_vec()))
            .unwrap();
        let diff = record.diff();
        assert!(diff.has_changes);
        assert_eq!(diff.new_files.len(), 1);
        assert!(diff.new_files.iter().all(|f| f.is_pending()));
    }

    #[test]
    fn test_detaching_baseline_file_is_reported() {
        let mut record = record();
        record.detach_file(&ArtifactId::Server("f1".to_string())).unwrap();
        let diff = record.diff();
        assert!(diff.has_changes);
        assert_eq!(diff.removed_file_ids, vec!["f1".to_string()]);
    }

    #[test]
    fn test_diff_against_other_baseline() {
        let record = record();
        let mut other = baseline();
        other.company = "UPS".to_string();
        let diff = record.diff_against(&other);
        assert_eq!(diff.changes.company.as_deref(), Some("DHL"));
    }

    #[test]
    fn test_validity_needs_company_and_tracking() {
        let mut record = record();
        assert!(record.is_valid());
        record.update(CourierField::TrackingNumber, "  ");
        assert!(!record.is_valid());
    }

    #[test]
    fn test_invalid_file_is_excluded() {
        let mut record = record();
        assert!(record
            .attach_file(Artifact::pending("label.pdf", "application/pdf", Vec::new()))
            .is_none());
        assert_eq!(record.attached_files().len(), 1);
    }
}
