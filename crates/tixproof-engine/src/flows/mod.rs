//! Flow configurations plugged into [`SlotDiffEngine`](crate::SlotDiffEngine).

mod courier;
mod files;
mod qr;

pub use courier::CourierFlow;
pub use files::{DeleteOutcome, DeleteRequest, FileFlow, FileSlots};
pub use qr::QrFlow;
