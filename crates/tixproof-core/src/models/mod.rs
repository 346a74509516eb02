//! Data models for the slot engine
//!
//! Each sub-module covers one concern of an upload session: the artifacts
//! that fill slots, the server baseline, per-slot modification records, the
//! QR link and courier variants, and the submission payload.

mod artifact;
mod baseline;
mod courier;
mod modification;
mod payload;
mod qr_link;
mod session;

// Re-export all models for convenient imports
pub use artifact::*;
pub use baseline::*;
pub use courier::*;
pub use modification::*;
pub use payload::*;
pub use qr_link::*;
pub use session::*;
