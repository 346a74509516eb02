//! Target slot selection for pending artifacts.

use std::collections::BTreeSet;

use tixproof_core::EngineError;

use crate::slot_store::SlotStore;

/// Picks the slot a transferred artifact lands in.
pub struct TransferResolver;

impl TransferResolver {
    /// The requested slot when it is free, otherwise the lowest free slot.
    ///
    /// Slots in `locked` (a delete is in flight) are never chosen. A requested
    /// slot outside the domain falls back like an occupied one.
    pub fn resolve<T>(
        store: &SlotStore<T>,
        requested: Option<u32>,
        locked: &BTreeSet<u32>,
    ) -> Result<u32, EngineError> {
        let is_free = |slot: u32| {
            store.contains_slot(slot) && !store.is_filled(slot) && !locked.contains(&slot)
        };

        if let Some(slot) = requested.filter(|slot| is_free(*slot)) {
            return Ok(slot);
        }

        store
            .available_slots()
            .into_iter()
            .find(|slot| !locked.contains(slot))
            .ok_or(EngineError::CapacityExceeded {
                max_quantity: store.max_quantity(),
            })
    }
}
