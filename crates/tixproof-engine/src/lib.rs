//! Tixproof Engine
//!
//! Client-side engine that maps uploaded ticket proofs to numbered slots,
//! tracks every slot against the server baseline and derives the minimal
//! change-set to submit.
//!
//! # Flows
//!
//! One generic [`SlotDiffEngine`] drives three flow states:
//!
//! - [`FileSlots`]: files transferred from a pending pool into slots `1..=N`
//! - [`QrLinkLedger`]: Android/iOS link pairs edited per slot
//! - [`CourierRecord`]: one courier/tracking record with attached documents
//!
//! Every mutation replaces the engine's current snapshot before it returns,
//! so reads issued right after a mutation (including `build()` from a later
//! submit) always see fresh state.

pub mod baseline;
pub mod courier;
pub mod engine;
pub mod flows;
pub mod host;
pub mod payload;
pub mod pending;
pub mod preview;
pub mod qr_ledger;
pub mod slot_store;
pub mod tracker;
pub mod transfer;

// Re-export commonly used types
pub use baseline::BaselineSnapshot;
pub use courier::CourierRecord;
pub use engine::{FlowState, SlotDiffEngine};
pub use flows::{CourierFlow, DeleteOutcome, DeleteRequest, FileFlow, FileSlots, QrFlow};
pub use host::HostAccessor;
pub use payload::DiffPayloadBuilder;
pub use pending::PendingPool;
pub use qr_ledger::QrLinkLedger;
pub use slot_store::SlotStore;
pub use tracker::{ModificationTracker, TrackedDelete};
pub use transfer::TransferResolver;
