//! QR link and courier flow scenarios.

mod helpers;

use helpers::fixtures::{context, courier_details, pdf, qr_pair, settings};
use tixproof_core::models::{CompletionStatus, CourierField, LinkField};
use tixproof_core::DeleteFailurePolicy;
use tixproof_engine::{CourierFlow, HostAccessor, QrFlow};

fn qr_flow(max_quantity: u32) -> QrFlow {
    QrFlow::qr_links(
        context(max_quantity),
        settings(DeleteFailurePolicy::KeepLocal),
        vec![qr_pair(1, "a1", "i1")],
    )
}

#[test]
fn test_link_edited_back_to_original_leaves_empty_diff() {
    let mut flow = qr_flow(1);
    flow.set_link(1, LinkField::Android, "a2").unwrap();
    assert_eq!(flow.current_data().diff().len(), 1);

    flow.set_link(1, LinkField::Android, "a1").unwrap();
    assert!(flow.current_data().diff().is_empty());
    assert!(!flow.build().has_changes());
}

#[test]
fn test_diff_lists_modified_slots_in_order_with_ticket_ids() {
    let mut flow = QrFlow::qr_links(
        context(3),
        settings(DeleteFailurePolicy::KeepLocal),
        vec![qr_pair(3, "a3", "i3"), qr_pair(1, "a1", "i1")],
    );
    flow.set_link(3, LinkField::Ios, "i3x").unwrap();
    flow.set_link(2, LinkField::Android, "a2").unwrap();

    let diff = flow.current_data().diff();
    let slots: Vec<u32> = diff.iter().map(|d| d.slot).collect();
    assert_eq!(slots, vec![2, 3]);
    assert_eq!(diff[1].ticket_id.as_deref(), Some("ticket-3"));
    assert_eq!(diff[1].android, "a3");
    assert!(diff[0].ticket_id.is_none());
}

#[test]
fn test_originals_survive_edits_and_revert() {
    let mut flow = qr_flow(1);
    flow.set_link(1, LinkField::Ios, "changed").unwrap();
    let entry = flow.current_data();
    let entry = entry.entry(1).unwrap();
    assert_eq!(entry.original(LinkField::Ios), "i1");
    assert_eq!(entry.current(LinkField::Ios), "changed");

    flow.revert(Some(1));
    assert!(!flow.is_modified(1, LinkField::Ios));
}

#[test]
fn test_qr_clear_forgets_baseline() {
    let mut flow = qr_flow(2);
    flow.clear();
    assert_eq!(flow.completion_status(), CompletionStatus::new(0, 2));
    assert!(flow.current_data().entries().all(|e| !e.is_existing));
}

#[test]
fn test_courier_reset_restores_session_start() {
    let mut flow = CourierFlow::courier(
        context(1),
        settings(DeleteFailurePolicy::KeepLocal),
        courier_details(),
        Vec::new(),
    );
    flow.update(CourierField::Company, "UPS");
    flow.attach_file(pdf("label.pdf")).unwrap();
    assert!(flow.build().has_changes());

    HostAccessor::reset(&mut flow);
    assert!(!flow.build().has_changes());
    assert_eq!(flow.current_data().details().company, "DHL");
}

#[test]
fn test_courier_validity_needs_company_and_tracking_number() {
    let mut flow = CourierFlow::courier(
        context(1),
        settings(DeleteFailurePolicy::KeepLocal),
        courier_details(),
        Vec::new(),
    );
    assert!(HostAccessor::is_valid(&flow));
    assert_eq!(
        HostAccessor::completion_status(&flow),
        CompletionStatus::new(1, 1)
    );

    flow.update(CourierField::Company, "");
    assert!(!flow.is_valid());
    assert_eq!(flow.completion_status(), CompletionStatus::new(0, 1));
}

#[test]
fn test_qr_build_is_idempotent() {
    let mut flow = qr_flow(2);
    flow.set_link(1, LinkField::Ios, "i1x").unwrap();
    flow.set_link(2, LinkField::Android, "a2").unwrap();

    let first = flow.build();
    assert!(first.has_changes());
    assert_eq!(first, flow.build());
}

#[test]
fn test_courier_build_is_idempotent() {
    let mut flow = CourierFlow::courier(
        context(1),
        settings(DeleteFailurePolicy::KeepLocal),
        courier_details(),
        Vec::new(),
    );
    flow.update(CourierField::TrackingLink, "https://track.example.com/JD000009");
    flow.attach_file(pdf("label.pdf")).unwrap();

    let first = flow.build();
    assert!(first.has_changes());
    assert_eq!(first, flow.build());
}
