//! Pool of artifacts added by the user but not yet placed in a slot.

use serde::Serialize;
use tixproof_core::models::{Artifact, ArtifactId, ArtifactRules};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PendingPool {
    items: Vec<Artifact>,
}

impl PendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact if it passes `rules`. Invalid artifacts are dropped and never counted.
    pub fn add(&mut self, artifact: Artifact, rules: &ArtifactRules) -> Option<ArtifactId> {
        if let Err(e) = rules.check(&artifact) {
            tracing::debug!(
                artifact_id = %artifact.id,
                error = %e,
                "Excluding invalid artifact from pending pool"
            );
            return None;
        }
        if self.contains(&artifact.id) {
            return Some(artifact.id);
        }
        let id = artifact.id.clone();
        self.items.push(artifact);
        Some(id)
    }

    /// Put back an artifact taken out of a slot, skipping validation.
    pub(crate) fn restore(&mut self, artifact: Artifact) {
        if !self.contains(&artifact.id) {
            self.items.push(artifact);
        }
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.items.iter().any(|a| a.id == *id)
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.items.iter().find(|a| a.id == *id)
    }

    pub fn remove(&mut self, id: &ArtifactId) -> Option<Artifact> {
        let index = self.items.iter().position(|a| a.id == *id)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
