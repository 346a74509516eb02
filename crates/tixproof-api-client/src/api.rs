//! Backend endpoints for ticket-proof submissions.
//!
//! File and courier changes go out as multipart forms with indexed fields
//! (`ticket_id[0]`, `ticket_file[0]`, ...); QR link changes as JSON.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use tixproof_core::models::{
    Artifact, CourierDiff, DiffPayload, FilePayload, QrLinkDiff, SubmissionRequest,
    SubmitResponse,
};
use tixproof_core::SubmissionEndpoint;

use crate::ApiClient;

/// One multipart field before it is turned into a reqwest part.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        data: Bytes,
    },
}

#[derive(Debug, serde::Serialize)]
struct QrLinksBody<'a> {
    links: &'a [QrLinkDiff],
}

fn file_value(artifact: &Artifact) -> Option<FormValue> {
    Some(FormValue::File {
        file_name: artifact.name.clone(),
        content_type: artifact.content_type()?.to_string(),
        data: artifact.data()?.clone(),
    })
}

/// Indexed fields for the file-slot payload.
pub fn file_form_fields(payload: &FilePayload) -> Vec<(String, FormValue)> {
    let mut fields = Vec::new();
    for upload in &payload.uploads {
        let Some(file) = file_value(&upload.ticket_file) else {
            continue;
        };
        let i = upload.index;
        if let Some(ticket_id) = upload.ticket_id {
            fields.push((
                format!("ticket_id[{}]", i),
                FormValue::Text(ticket_id.to_string()),
            ));
        }
        fields.push((format!("ticket_file[{}]", i), file));
        fields.push((
            format!("action[{}]", i),
            FormValue::Text(upload.action.to_string()),
        ));
        if let Some(original_id) = &upload.original_id {
            fields.push((
                format!("original_id[{}]", i),
                FormValue::Text(original_id.clone()),
            ));
        }
    }
    fields
}

/// Changed scalar fields, new files and detached file ids of a courier diff.
pub fn courier_form_fields(diff: &CourierDiff) -> Vec<(String, FormValue)> {
    let changes = &diff.changes;
    let mut fields: Vec<(String, FormValue)> = [
        ("type", &changes.courier_type),
        ("company", &changes.company),
        ("tracking_number", &changes.tracking_number),
        ("tracking_link", &changes.tracking_link),
    ]
    .into_iter()
    .filter_map(|(name, value)| {
        value
            .as_ref()
            .map(|v| (name.to_string(), FormValue::Text(v.clone())))
    })
    .collect();

    for (i, file) in diff.new_files.iter().filter_map(file_value).enumerate() {
        fields.push((format!("courier_file[{}]", i), file));
    }
    for (i, id) in diff.removed_file_ids.iter().enumerate() {
        fields.push((format!("removed_file_id[{}]", i), FormValue::Text(id.clone())));
    }
    fields
}

fn into_form(fields: Vec<(String, FormValue)>) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            FormValue::Text(text) => form.text(name, text),
            FormValue::File {
                file_name,
                content_type,
                data,
            } => {
                let part = Part::bytes(data.to_vec())
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .with_context(|| format!("Invalid content type: {}", content_type))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

impl ApiClient {
    pub fn ticket_files_path(&self, container_id: i64) -> String {
        format!("{}/containers/{}/ticket-files", self.api_prefix(), container_id)
    }

    pub fn qr_links_path(&self, container_id: i64) -> String {
        format!("{}/containers/{}/qr-links", self.api_prefix(), container_id)
    }

    pub fn courier_path(&self, container_id: i64) -> String {
        format!("{}/containers/{}/courier", self.api_prefix(), container_id)
    }

    pub fn ticket_file_path(&self, container_id: i64, original_id: &str) -> String {
        format!(
            "{}/{}",
            self.ticket_files_path(container_id),
            urlencoding::encode(original_id)
        )
    }

    pub async fn submit_files(
        &self,
        container_id: i64,
        payload: &FilePayload,
    ) -> Result<SubmitResponse> {
        let form = into_form(file_form_fields(payload))?;
        self.post_multipart(&self.ticket_files_path(container_id), form)
            .await
    }

    pub async fn submit_qr_links(
        &self,
        container_id: i64,
        links: &[QrLinkDiff],
    ) -> Result<SubmitResponse> {
        self.post_json(&self.qr_links_path(container_id), &QrLinksBody { links })
            .await
    }

    pub async fn submit_courier(
        &self,
        container_id: i64,
        diff: &CourierDiff,
    ) -> Result<SubmitResponse> {
        let form = into_form(courier_form_fields(diff))?;
        self.post_multipart(&self.courier_path(container_id), form)
            .await
    }

    /// Delete the server artifact a slot held.
    pub async fn delete_ticket_file(
        &self,
        container_id: i64,
        original_id: &str,
        slot: u32,
    ) -> Result<()> {
        self.delete(
            &self.ticket_file_path(container_id, original_id),
            &[("slot", slot.to_string())],
        )
        .await
    }
}

#[async_trait]
impl SubmissionEndpoint for ApiClient {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmitResponse, String> {
        let container_id = request.container_id;
        tracing::info!(
            flow = %request.payload.flow(),
            container_id,
            "Sending submission"
        );

        let result = match &request.payload {
            DiffPayload::Files(files) => self.submit_files(container_id, files).await,
            DiffPayload::QrLinks(links) => self.submit_qr_links(container_id, links).await,
            DiffPayload::Courier(diff) => self.submit_courier(container_id, diff).await,
        };

        result.map_err(|e| format!("{:#}", e))
    }

    async fn delete_slot_artifact(
        &self,
        original_id: &str,
        container_id: i64,
        slot: u32,
    ) -> Result<(), String> {
        self.delete_ticket_file(container_id, original_id, slot)
            .await
            .map_err(|e| format!("{:#}", e))
    }
}
