//! Session fixtures.

use tixproof_core::models::{
    Artifact, BaselineEntry, CourierDetails, QrLinkBaseline, SessionContext,
};
use tixproof_core::{DeleteFailurePolicy, EngineSettings};

pub const CONTAINER_ID: i64 = 42;

pub fn context(max_quantity: u32) -> SessionContext {
    SessionContext {
        container_id: CONTAINER_ID,
        max_quantity,
    }
}

pub fn settings(policy: DeleteFailurePolicy) -> EngineSettings {
    EngineSettings {
        delete_failure_policy: policy,
        ..EngineSettings::default()
    }
}

/// Baseline-backed slot with id `orig-{slot}` and ticket detail `100 + slot`.
pub fn backed_entry(slot: u32) -> BaselineEntry {
    BaselineEntry {
        slot: Some(slot),
        id: format!("orig-{}", slot),
        original_url: Some(format!("https://cdn.example.com/tickets/{}.pdf", slot)),
        ticket_detail_id: Some(100 + slot as i64),
        name: None,
    }
}

/// Server-known ticket without an attached file.
pub fn unbacked_entry(slot: u32, ticket_detail_id: i64) -> BaselineEntry {
    BaselineEntry {
        slot: Some(slot),
        id: format!("ticket-{}", slot),
        original_url: Some(String::new()),
        ticket_detail_id: Some(ticket_detail_id),
        name: None,
    }
}

/// Minimal PDF-looking bytes.
pub fn pdf(name: &str) -> Artifact {
    Artifact::pending(name, "application/pdf", b"%PDF-1.4\n%%EOF".to_vec())
}

pub fn qr_pair(slot: u32, android: &str, ios: &str) -> QrLinkBaseline {
    QrLinkBaseline {
        slot: Some(slot),
        ticket_id: Some(format!("ticket-{}", slot)),
        android: android.to_string(),
        ios: ios.to_string(),
    }
}

pub fn courier_details() -> CourierDetails {
    CourierDetails {
        courier_type: "express".to_string(),
        company: "DHL".to_string(),
        tracking_number: "JD000001".to_string(),
        tracking_link: "https://track.example.com/JD000001".to_string(),
    }
}
