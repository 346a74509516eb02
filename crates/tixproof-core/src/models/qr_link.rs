use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which link of a QR pair is addressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LinkField {
    Android,
    Ios,
}

impl Display for LinkField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LinkField::Android => write!(f, "android"),
            LinkField::Ios => write!(f, "ios"),
        }
    }
}

impl FromStr for LinkField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "android" => Ok(LinkField::Android),
            "ios" => Ok(LinkField::Ios),
            _ => Err(anyhow::anyhow!("Invalid link field: {}", s)),
        }
    }
}

/// Server-reported link pair for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrLinkBaseline {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(default, alias = "ticketId")]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub android: String,
    #[serde(default)]
    pub ios: String,
}

/// Slot-indexed link pair. `original_*` are fixed at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrLinkEntry {
    pub slot: u32,
    pub ticket_id: Option<String>,
    pub android: String,
    pub ios: String,
    pub is_existing: bool,
    original_android: String,
    original_ios: String,
}

impl QrLinkEntry {
    /// Entry for a slot with no server-side links.
    pub fn blank(slot: u32) -> Self {
        Self {
            slot,
            ticket_id: None,
            android: String::new(),
            ios: String::new(),
            is_existing: false,
            original_android: String::new(),
            original_ios: String::new(),
        }
    }

    pub fn from_baseline(slot: u32, baseline: &QrLinkBaseline) -> Self {
        let is_existing = !baseline.android.trim().is_empty() || !baseline.ios.trim().is_empty();
        Self {
            slot,
            ticket_id: baseline.ticket_id.clone(),
            android: baseline.android.clone(),
            ios: baseline.ios.clone(),
            is_existing,
            original_android: baseline.android.clone(),
            original_ios: baseline.ios.clone(),
        }
    }

    pub fn current(&self, field: LinkField) -> &str {
        match field {
            LinkField::Android => &self.android,
            LinkField::Ios => &self.ios,
        }
    }

    pub fn original(&self, field: LinkField) -> &str {
        match field {
            LinkField::Android => &self.original_android,
            LinkField::Ios => &self.original_ios,
        }
    }

    pub fn set(&mut self, field: LinkField, value: impl Into<String>) {
        match field {
            LinkField::Android => self.android = value.into(),
            LinkField::Ios => self.ios = value.into(),
        }
    }

    pub fn is_modified(&self, field: LinkField) -> bool {
        self.current(field) != self.original(field)
    }

    pub fn is_dirty(&self) -> bool {
        self.is_modified(LinkField::Android) || self.is_modified(LinkField::Ios)
    }

    /// Both links present
    pub fn is_complete(&self) -> bool {
        !self.android.trim().is_empty() && !self.ios.trim().is_empty()
    }

    pub fn revert(&mut self) {
        self.android = self.original_android.clone();
        self.ios = self.original_ios.clone();
    }
}

/// Changed link pair sent on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrLinkDiff {
    pub slot: u32,
    pub ticket_id: Option<String>,
    pub android: String,
    pub ios: String,
}
