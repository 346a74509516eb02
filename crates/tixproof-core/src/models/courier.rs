use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;

/// Scalar fields of a courier record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CourierField {
    CourierType,
    Company,
    TrackingNumber,
    TrackingLink,
}

impl CourierField {
    pub const ALL: [CourierField; 4] = [
        CourierField::CourierType,
        CourierField::Company,
        CourierField::TrackingNumber,
        CourierField::TrackingLink,
    ];
}

impl Display for CourierField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CourierField::CourierType => write!(f, "courier_type"),
            CourierField::Company => write!(f, "company"),
            CourierField::TrackingNumber => write!(f, "tracking_number"),
            CourierField::TrackingLink => write!(f, "tracking_link"),
        }
    }
}

impl FromStr for CourierField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "courier_type" | "type" => Ok(CourierField::CourierType),
            "company" => Ok(CourierField::Company),
            "tracking_number" => Ok(CourierField::TrackingNumber),
            "tracking_link" => Ok(CourierField::TrackingLink),
            _ => Err(anyhow::anyhow!("Invalid courier field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierDetails {
    #[serde(default, alias = "type")]
    pub courier_type: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, alias = "trackingNumber")]
    pub tracking_number: String,
    #[serde(default, alias = "trackingLink")]
    pub tracking_link: String,
}

impl CourierDetails {
    pub fn get(&self, field: CourierField) -> &str {
        match field {
            CourierField::CourierType => &self.courier_type,
            CourierField::Company => &self.company,
            CourierField::TrackingNumber => &self.tracking_number,
            CourierField::TrackingLink => &self.tracking_link,
        }
    }

    pub fn set(&mut self, field: CourierField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CourierField::CourierType => self.courier_type = value,
            CourierField::Company => self.company = value,
            CourierField::TrackingNumber => self.tracking_number = value,
            CourierField::TrackingLink => self.tracking_link = value,
        }
    }
}

/// Only the scalar fields that differ from the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courier_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_link: Option<String>,
}

impl CourierChanges {
    pub fn set(&mut self, field: CourierField, value: String) {
        match field {
            CourierField::CourierType => self.courier_type = Some(value),
            CourierField::Company => self.company = Some(value),
            CourierField::TrackingNumber => self.tracking_number = Some(value),
            CourierField::TrackingLink => self.tracking_link = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.courier_type.is_none()
            && self.company.is_none()
            && self.tracking_number.is_none()
            && self.tracking_link.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourierDiff {
    pub has_changes: bool,
    pub changes: CourierChanges,
    /// Pending binaries only; existing files are never re-sent
    pub new_files: Vec<Artifact>,
    /// Server ids of baseline files the user detached
    pub removed_file_ids: Vec<String>,
}
