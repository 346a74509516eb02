//! Test helpers: a recording submission endpoint and session fixtures.
//!
//! Run from workspace root: `cargo test -p tixproof-engine`.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Mutex;

use async_trait::async_trait;
use tixproof_core::models::{SubmissionRequest, SubmitResponse};
use tixproof_core::SubmissionEndpoint;

/// A slot delete as seen by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
    pub original_id: String,
    pub container_id: i64,
    pub slot: u32,
}

/// Endpoint that records every call and answers with a configurable result.
pub struct RecordingEndpoint {
    submit_status: u16,
    submit_error: Option<String>,
    delete_error: Option<String>,
    submissions: Mutex<Vec<SubmissionRequest>>,
    deletes: Mutex<Vec<DeleteCall>>,
}

impl RecordingEndpoint {
    pub fn accepting() -> Self {
        Self {
            submit_status: 200,
            submit_error: None,
            delete_error: None,
            submissions: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    /// Answer submissions with `status` instead of 200.
    pub fn with_status(mut self, status: u16) -> Self {
        self.submit_status = status;
        self
    }

    /// Fail submissions at the transport level.
    pub fn failing_submit(mut self, message: &str) -> Self {
        self.submit_error = Some(message.to_string());
        self
    }

    pub fn failing_delete(mut self, message: &str) -> Self {
        self.delete_error = Some(message.to_string());
        self
    }

    pub fn submissions(&self) -> Vec<SubmissionRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<DeleteCall> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionEndpoint for RecordingEndpoint {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmitResponse, String> {
        self.submissions.lock().unwrap().push(request.clone());
        if let Some(message) = &self.submit_error {
            return Err(message.clone());
        }
        Ok(SubmitResponse {
            status: self.submit_status,
            message: (self.submit_status != 200).then(|| "rejected".to_string()),
        })
    }

    async fn delete_slot_artifact(
        &self,
        original_id: &str,
        container_id: i64,
        slot: u32,
    ) -> Result<(), String> {
        self.deletes.lock().unwrap().push(DeleteCall {
            original_id: original_id.to_string(),
            container_id,
            slot,
        });
        match &self.delete_error {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}
