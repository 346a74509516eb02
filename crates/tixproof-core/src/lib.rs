//! Tixproof Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! collaborator traits shared by the slot engine, the HTTP client and the CLI.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use config::{ApiAuthScheme, DeleteFailurePolicy, EngineConfig, EngineSettings};
pub use error::{EngineError, ErrorMetadata, LogLevel};
pub use hooks::{NoOpSubmissionEndpoint, SubmissionEndpoint};
