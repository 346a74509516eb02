//! Immutable copy of the server-reported slot assignments.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tixproof_core::models::{Artifact, BaselineAssignment, BaselineEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineSnapshot {
    max_quantity: u32,
    assignments: BTreeMap<u32, BaselineAssignment>,
    captured_at: DateTime<Utc>,
}

impl BaselineSnapshot {
    pub fn empty(max_quantity: u32) -> Self {
        Self {
            max_quantity,
            assignments: BTreeMap::new(),
            captured_at: Utc::now(),
        }
    }

    /// Normalize server entries into slots.
    ///
    /// Entries with an explicit, free, in-range slot keep it. The rest fill the
    /// lowest free slots in input order. Entries that do not fit are dropped.
    pub fn load(max_quantity: u32, entries: Vec<BaselineEntry>) -> Self {
        let mut snapshot = Self::empty(max_quantity);
        let mut unplaced = Vec::new();

        for entry in entries {
            match entry.slot {
                Some(slot)
                    if (1..=max_quantity).contains(&slot)
                        && !snapshot.assignments.contains_key(&slot) =>
                {
                    snapshot.insert(slot, entry);
                }
                _ => unplaced.push(entry),
            }
        }

        for entry in unplaced {
            let free = (1..=max_quantity).find(|slot| !snapshot.assignments.contains_key(slot));
            match free {
                Some(slot) => snapshot.insert(slot, entry),
                None => {
                    tracing::debug!(
                        artifact_id = %entry.id,
                        max_quantity,
                        "Dropping baseline entry that does not fit any slot"
                    );
                }
            }
        }

        snapshot
    }

    fn insert(&mut self, slot: u32, entry: BaselineEntry) {
        self.assignments.insert(
            slot,
            BaselineAssignment {
                slot,
                original_artifact_id: entry.id,
                original_url: entry.original_url,
                ticket_detail_id: entry.ticket_detail_id,
                name: entry.name,
            },
        );
    }

    /// Mark a slot's artifact as gone from the server. The assignment stays
    /// known with its ticket detail, but is no longer backed.
    pub fn forget_artifact(&mut self, slot: u32) -> Option<String> {
        let assignment = self.assignments.get_mut(&slot).filter(|a| a.is_backed())?;
        assignment.original_url = None;
        Some(assignment.original_artifact_id.clone())
    }

    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn get(&self, slot: u32) -> Option<&BaselineAssignment> {
        self.assignments.get(&slot)
    }

    /// Assignment for `slot` only if it actually carried an artifact
    pub fn backed(&self, slot: u32) -> Option<&BaselineAssignment> {
        self.get(slot).filter(|a| a.is_backed())
    }

    pub fn iter(&self) -> impl Iterator<Item = &BaselineAssignment> {
        self.assignments.values()
    }

    /// Existing artifacts to seed the slot store with, ascending by slot.
    pub fn artifacts(&self) -> impl Iterator<Item = (u32, Artifact)> + '_ {
        self.assignments
            .values()
            .filter(|a| a.is_backed())
            .map(|a| {
                let url = a.original_url.clone().unwrap_or_default();
                let name = a
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("ticket-{}", a.slot));
                (
                    a.slot,
                    Artifact::existing(a.original_artifact_id.clone(), name, url),
                )
            })
    }
}
