use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;
use super::courier::CourierDiff;
use super::modification::SlotAction;
use super::qr_link::QrLinkDiff;

/// Delivery-type specific upload flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Files,
    QrLinks,
    Courier,
}

impl Display for FlowKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FlowKind::Files => write!(f, "files"),
            FlowKind::QrLinks => write!(f, "qr_links"),
            FlowKind::Courier => write!(f, "courier"),
        }
    }
}

impl FromStr for FlowKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "files" => Ok(FlowKind::Files),
            "qr_links" | "qr" => Ok(FlowKind::QrLinks),
            "courier" => Ok(FlowKind::Courier),
            _ => Err(anyhow::anyhow!("Invalid flow: {}", s)),
        }
    }
}

/// One indexed `(ticket_id, ticket_file)` pair of the file payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadEntry {
    /// Position in the payload, starting at 0
    pub index: usize,
    pub slot: u32,
    pub action: SlotAction,
    pub ticket_id: Option<i64>,
    pub original_id: Option<String>,
    pub ticket_file: Artifact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    pub uploads: Vec<FileUploadEntry>,
}

/// Minimal change-set for the active flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", content = "changes", rename_all = "snake_case")]
pub enum DiffPayload {
    Files(FilePayload),
    QrLinks(Vec<QrLinkDiff>),
    Courier(CourierDiff),
}

impl DiffPayload {
    pub fn flow(&self) -> FlowKind {
        match self {
            DiffPayload::Files(_) => FlowKind::Files,
            DiffPayload::QrLinks(_) => FlowKind::QrLinks,
            DiffPayload::Courier(_) => FlowKind::Courier,
        }
    }

    pub fn has_changes(&self) -> bool {
        match self {
            DiffPayload::Files(files) => !files.uploads.is_empty(),
            DiffPayload::QrLinks(links) => !links.is_empty(),
            DiffPayload::Courier(courier) => courier.has_changes,
        }
    }
}

/// Request handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub container_id: i64,
    pub payload: DiffPayload,
}

/// Response of the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
}
