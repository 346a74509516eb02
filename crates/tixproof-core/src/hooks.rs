//! Collaborator traits
//!
//! The engine never talks to the network itself. The host hands it an
//! implementation of `SubmissionEndpoint` (the HTTP client in production, a
//! recording mock in tests).

use async_trait::async_trait;

use crate::models::{SubmissionRequest, SubmitResponse};

/// Backend endpoints used by an upload session.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    /// Send the diff payload of a flow. Transport failures are returned as `Err`,
    /// backend rejections as a non-success `status`.
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmitResponse, String>;

    /// Delete the artifact a baseline-backed slot held.
    async fn delete_slot_artifact(
        &self,
        original_id: &str,
        container_id: i64,
        slot: u32,
    ) -> Result<(), String>;
}

/// Endpoint that accepts everything, for dry runs
pub struct NoOpSubmissionEndpoint;

#[async_trait]
impl SubmissionEndpoint for NoOpSubmissionEndpoint {
    async fn submit(&self, _request: &SubmissionRequest) -> Result<SubmitResponse, String> {
        Ok(SubmitResponse {
            status: 200,
            message: None,
        })
    }

    async fn delete_slot_artifact(
        &self,
        _original_id: &str,
        _container_id: i64,
        _slot: u32,
    ) -> Result<(), String> {
        Ok(())
    }
}
