//! Slot-indexed Android/iOS link pairs with per-field baseline diffing.

use std::collections::BTreeMap;

use serde::Serialize;
use tixproof_core::models::{LinkField, QrLinkBaseline, QrLinkDiff, QrLinkEntry};
use tixproof_core::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QrLinkLedger {
    max_quantity: u32,
    entries: BTreeMap<u32, QrLinkEntry>,
}

impl QrLinkLedger {
    /// Every slot in `1..=max_quantity` gets an entry. Baselines with an explicit
    /// in-range slot keep it, the rest fill the lowest slots still blank.
    pub fn load(max_quantity: u32, baselines: Vec<QrLinkBaseline>) -> Self {
        let mut placed: BTreeMap<u32, QrLinkEntry> = BTreeMap::new();
        let mut unplaced = Vec::new();

        for baseline in baselines {
            match baseline.slot {
                Some(slot) if (1..=max_quantity).contains(&slot) && !placed.contains_key(&slot) => {
                    placed.insert(slot, QrLinkEntry::from_baseline(slot, &baseline));
                }
                _ => unplaced.push(baseline),
            }
        }

        for baseline in unplaced {
            match (1..=max_quantity).find(|slot| !placed.contains_key(slot)) {
                Some(slot) => {
                    placed.insert(slot, QrLinkEntry::from_baseline(slot, &baseline));
                }
                None => {
                    tracing::debug!(
                        ticket_id = ?baseline.ticket_id,
                        max_quantity,
                        "Dropping QR baseline that does not fit any slot"
                    );
                }
            }
        }

        let entries = (1..=max_quantity)
            .map(|slot| {
                let entry = placed.remove(&slot).unwrap_or_else(|| QrLinkEntry::blank(slot));
                (slot, entry)
            })
            .collect();

        Self {
            max_quantity,
            entries,
        }
    }

    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    pub fn entry(&self, slot: u32) -> Option<&QrLinkEntry> {
        self.entries.get(&slot)
    }

    pub fn entries(&self) -> impl Iterator<Item = &QrLinkEntry> {
        self.entries.values()
    }

    /// Overwrite the current value of one link. Originals are never touched.
    pub fn set_link(
        &mut self,
        slot: u32,
        field: LinkField,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        let max_quantity = self.max_quantity;
        let entry = self
            .entries
            .get_mut(&slot)
            .ok_or(EngineError::SlotOutOfRange { slot, max_quantity })?;
        entry.set(field, value);
        tracing::debug!(slot, field = %field, modified = entry.is_modified(field), "QR link set");
        Ok(())
    }

    pub fn is_modified(&self, slot: u32, field: LinkField) -> bool {
        self.entries
            .get(&slot)
            .map(|e| e.is_modified(field))
            .unwrap_or(false)
    }

    /// Slots where either link differs from its original, ascending.
    pub fn diff(&self) -> Vec<QrLinkDiff> {
        self.entries
            .values()
            .filter(|e| e.is_dirty())
            .map(|e| QrLinkDiff {
                slot: e.slot,
                ticket_id: e.ticket_id.clone(),
                android: e.android.clone(),
                ios: e.ios.clone(),
            })
            .collect()
    }

    /// Undo edits on one slot, or on every slot when `slot` is `None`.
    pub fn revert(&mut self, slot: Option<u32>) {
        match slot {
            Some(slot) => {
                if let Some(entry) = self.entries.get_mut(&slot) {
                    entry.revert();
                }
            }
            None => self.entries.values_mut().for_each(QrLinkEntry::revert),
        }
    }

    pub fn completed_count(&self) -> u32 {
        self.entries.values().filter(|e| e.is_complete()).count() as u32
    }

    /// Forget the baseline and every edit.
    pub fn clear(&mut self) {
        for (slot, entry) in self.entries.iter_mut() {
            *entry = QrLinkEntry::blank(*slot);
        }
    }
}
