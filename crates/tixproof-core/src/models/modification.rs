use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;

/// Per-slot action relative to the baseline. A slot without a record is unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotAction {
    NewUpload,
    Reuploaded,
    Deleted,
}

impl Display for SlotAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SlotAction::NewUpload => write!(f, "new_upload"),
            SlotAction::Reuploaded => write!(f, "reuploaded"),
            SlotAction::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for SlotAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_upload" => Ok(SlotAction::NewUpload),
            "reuploaded" => Ok(SlotAction::Reuploaded),
            "deleted" => Ok(SlotAction::Deleted),
            _ => Err(anyhow::anyhow!("Invalid slot action: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationRecord {
    pub slot: u32,
    pub action: SlotAction,
    /// Baseline artifact id, set for `reuploaded` and `deleted`
    pub original_id: Option<String>,
    /// Artifact now in the slot, set for `new_upload` and `reuploaded`
    pub new_artifact: Option<Artifact>,
    pub ticket_detail_id: Option<i64>,
}

impl ModificationRecord {
    pub fn new_upload(slot: u32, artifact: Artifact, ticket_detail_id: Option<i64>) -> Self {
        Self {
            slot,
            action: SlotAction::NewUpload,
            original_id: None,
            new_artifact: Some(artifact),
            ticket_detail_id,
        }
    }

    pub fn reuploaded(
        slot: u32,
        original_id: String,
        artifact: Artifact,
        ticket_detail_id: Option<i64>,
    ) -> Self {
        Self {
            slot,
            action: SlotAction::Reuploaded,
            original_id: Some(original_id),
            new_artifact: Some(artifact),
            ticket_detail_id,
        }
    }

    pub fn deleted(slot: u32, original_id: String, ticket_detail_id: Option<i64>) -> Self {
        Self {
            slot,
            action: SlotAction::Deleted,
            original_id: Some(original_id),
            new_artifact: None,
            ticket_detail_id,
        }
    }
}
