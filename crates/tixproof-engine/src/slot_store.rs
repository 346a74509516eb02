//! Slot number to assignment mapping over the domain `1..=max_quantity`.

use std::collections::BTreeMap;

use serde::Serialize;
use tixproof_core::EngineError;

/// Holds at most one item per slot; slot numbers outside the domain are rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStore<T> {
    max_quantity: u32,
    slots: BTreeMap<u32, T>,
}

impl<T> SlotStore<T> {
    pub fn new(max_quantity: u32) -> Self {
        Self {
            max_quantity,
            slots: BTreeMap::new(),
        }
    }

    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    pub fn contains_slot(&self, slot: u32) -> bool {
        (1..=self.max_quantity).contains(&slot)
    }

    pub fn check_slot(&self, slot: u32) -> Result<(), EngineError> {
        if self.contains_slot(slot) {
            Ok(())
        } else {
            Err(EngineError::SlotOutOfRange {
                slot,
                max_quantity: self.max_quantity,
            })
        }
    }

    /// Put `item` into an empty slot.
    pub fn assign(&mut self, slot: u32, item: T) -> Result<(), EngineError> {
        self.check_slot(slot)?;
        if self.slots.contains_key(&slot) {
            return Err(EngineError::SlotOccupied(slot));
        }
        self.slots.insert(slot, item);
        Ok(())
    }

    /// Put `item` into a slot, returning whatever it replaced.
    pub fn assign_forced(&mut self, slot: u32, item: T) -> Result<Option<T>, EngineError> {
        self.check_slot(slot)?;
        Ok(self.slots.insert(slot, item))
    }

    /// Empty a slot. No-op when the slot is already empty.
    pub fn unassign(&mut self, slot: u32) -> Option<T> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: u32) -> Option<&T> {
        self.slots.get(&slot)
    }

    pub fn is_filled(&self, slot: u32) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Empty slot numbers in ascending order
    pub fn available_slots(&self) -> Vec<u32> {
        (1..=self.max_quantity)
            .filter(|slot| !self.slots.contains_key(slot))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.filled_count() >= self.max_quantity
    }

    pub fn filled_count(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
