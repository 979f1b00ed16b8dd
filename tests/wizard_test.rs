mod common;

use std::sync::Arc;

use common::*;
use listing_admin::gateway::memory::MemoryIdentity;
use listing_admin::gateway::DocumentStore;
use listing_admin::models::image::ImageSlot;
use listing_admin::models::listing::ListingKind;
use listing_admin::models::payment::{PaymentMethod, Plan};
use listing_admin::wizard::controller::{WizardController, WizardState};
use listing_admin::wizard::draft::ImageField;
use listing_admin::wizard::panels::{DetailsPanel, PaymentPanel};

async fn start(backend: &TestBackend, kind: ListingKind, id: Option<&str>) -> WizardController {
    WizardController::start(
        backend.docs.clone(),
        backend.blobs.clone(),
        backend.identity.clone(),
        kind,
        id,
    )
    .await
}

#[tokio::test]
async fn fresh_wizard_starts_at_step_one() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;

    assert_eq!(wizard.state(), WizardState::Step(1));
    assert_eq!(wizard.draft().owner_user_id.as_deref(), Some("user-a"));

    // No listing yet, so skipping ahead is refused; so is going back.
    wizard.advance();
    assert_eq!(wizard.state(), WizardState::Step(1));
    wizard.retreat();
    assert_eq!(wizard.state(), WizardState::Step(1));
}

#[tokio::test]
async fn signed_out_session_is_unauthorized() {
    let backend = TestBackend::new("user-a");
    let wizard = WizardController::start(
        backend.docs.clone(),
        backend.blobs.clone(),
        Arc::new(MemoryIdentity::signed_out()),
        ListingKind::Hotel,
        None,
    )
    .await;
    assert_eq!(wizard.state(), WizardState::Unauthorized);
}

#[tokio::test]
async fn missing_or_foreign_listing_is_unauthorized() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let wizard = start(&backend, ListingKind::Hotel, Some("listing_unknown")).await;
    assert_eq!(wizard.state(), WizardState::Unauthorized);

    let other = WizardController::start(
        backend.docs.clone(),
        backend.blobs.clone(),
        Arc::new(MemoryIdentity::signed_in("user-b")),
        ListingKind::Hotel,
        Some(&id),
    )
    .await;
    assert_eq!(other.state(), WizardState::Unauthorized);
}

#[tokio::test]
async fn wizard_resumes_at_the_persisted_step() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("lobby.png"));
    let id = wizard.commit_details(sample_details()).await.unwrap();
    wizard.commit_rooms_step().await.unwrap();
    assert_eq!(wizard.state(), WizardState::Step(3));

    let resumed = start(&backend, ListingKind::Hotel, Some(&id)).await;
    assert_eq!(resumed.state(), WizardState::Step(2));
    assert_eq!(resumed.draft().details.name, "X");
}

#[tokio::test]
async fn details_panel_hides_errors_until_submit() {
    let backend = TestBackend::new("user-a");
    let wizard = start(&backend, ListingKind::Hotel, None).await;

    let mut panel = DetailsPanel::new(wizard.draft());
    assert!(panel.visible_errors().is_none());

    assert!(panel.try_submit(wizard.draft()).is_none());
    let errors = panel.visible_errors().expect("errors visible after submit");
    assert!(errors.get("name").is_some());
    assert!(errors.get("primary_image").is_some());
    assert!(errors.get("contact_number").is_some());
}

#[tokio::test]
async fn details_panel_rejects_bad_contact_number() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("lobby.png"));

    let mut panel = DetailsPanel::new(wizard.draft());
    panel.payload = sample_details();
    panel.payload.contact_number = "07712345".to_string();

    assert!(panel.try_submit(wizard.draft()).is_none());
    assert_eq!(
        panel.visible_errors().unwrap().get("contact_number"),
        Some("Invalid phone number")
    );
}

#[tokio::test]
async fn hotel_upload_walks_all_four_steps() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("lobby.png"));

    let mut details = DetailsPanel::new(wizard.draft());
    details.payload = sample_details();
    let payload = details.try_submit(wizard.draft()).expect("valid details");
    let id = wizard.commit_details(payload).await.unwrap();
    assert_eq!(wizard.state(), WizardState::Step(2));

    let stored = backend
        .docs
        .get(&ListingKind::Hotel.collection(), &id)
        .await
        .unwrap()
        .expect("listing document written");
    assert_eq!(stored.get_str("status").unwrap(), "Draft");
    assert_eq!(stored.get_str("payment_status").unwrap(), "Not Paid");
    assert_eq!(stored.get_str("name").unwrap(), "X");
    assert_eq!(stored.get_array("secondary_images").unwrap().len(), 1);

    wizard.commit_rooms_step().await.unwrap();
    assert_eq!(wizard.state(), WizardState::Step(3));

    let mut payment = PaymentPanel::new(wizard.draft(), wizard.pricing());
    assert_eq!(payment.selected_plan, Plan::Annually);
    assert_eq!(payment.subtotal(), 36.00);
    assert_eq!(payment.total(), 38.00);
    payment.transaction_id = "TXN-1001".to_string();
    payment.receipt = Some(ImageSlot::Pending(png("receipt.png")));
    let submission = payment.try_submit().expect("valid payment");
    wizard.commit_payment(submission).await.unwrap();
    assert_eq!(wizard.state(), WizardState::Step(4));

    wizard.submit_for_review().await;
    assert_eq!(wizard.state(), WizardState::Submitted);

    let stored = backend
        .docs
        .get(&ListingKind::Hotel.collection(), &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get_str("status").unwrap(), "In Review");
    assert_eq!(stored.get_str("payment_status").unwrap(), "Pending");
    let tx = stored.get_document("payment_details").unwrap();
    assert_eq!(tx.get_str("transaction_id").unwrap(), "TXN-1001");
    assert_eq!(tx.get_f64("total_amount").unwrap(), 38.00);
    assert_eq!(tx.get_str("selected_plan").unwrap(), "annually");
    assert!(tx.get_str("receipt_url").unwrap().contains("listing-receipts/"));
}

#[tokio::test]
async fn attraction_upload_has_two_steps() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Attraction, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("view.png"));

    wizard.commit_details(sample_details()).await.unwrap();
    assert_eq!(wizard.state(), WizardState::Step(2));

    // Already at the last step; advancing goes nowhere.
    wizard.advance();
    assert_eq!(wizard.state(), WizardState::Step(2));

    wizard.submit_for_review().await;
    assert_eq!(wizard.state(), WizardState::Submitted);
}

#[tokio::test]
async fn payment_panel_locks_after_a_pending_payment() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("lobby.png"));
    let id = wizard.commit_details(sample_details()).await.unwrap();
    wizard.commit_rooms_step().await.unwrap();

    let mut payment = PaymentPanel::new(wizard.draft(), wizard.pricing());
    payment.transaction_id = "TXN-2002".to_string();
    payment.receipt = Some(ImageSlot::Pending(png("receipt.png")));
    wizard.commit_payment(payment.try_submit().unwrap()).await.unwrap();

    // Reload: the stored payment prefills the panel and disables it.
    let resumed = start(&backend, ListingKind::Hotel, Some(&id)).await;
    assert_eq!(resumed.state(), WizardState::Step(3));
    let mut panel = PaymentPanel::new(resumed.draft(), resumed.pricing());
    assert!(panel.is_disabled());
    assert_eq!(panel.transaction_id, "TXN-2002");
    assert!(panel.try_submit().is_none());

    panel.modify();
    assert!(!panel.is_disabled());
    assert!(panel.try_submit().is_some());
}

#[tokio::test]
async fn card_payment_is_declared_but_unavailable() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("lobby.png"));
    wizard.commit_details(sample_details()).await.unwrap();
    wizard.commit_rooms_step().await.unwrap();

    let mut panel = PaymentPanel::new(wizard.draft(), wizard.pricing());
    assert!(!panel.card_payment_available);
    panel.payment_method = PaymentMethod::Card;
    assert!(panel.try_submit().is_none());
    assert!(panel
        .visible_errors()
        .unwrap()
        .get("payment_method")
        .unwrap()
        .contains("unavailable"));
}

#[tokio::test]
async fn bank_transfer_requires_transaction_id_and_receipt() {
    let backend = TestBackend::new("user-a");
    let mut wizard = start(&backend, ListingKind::Hotel, None).await;
    wizard.draft_mut().attach_file(ImageField::Primary, png("front.png"));
    wizard.draft_mut().attach_file(ImageField::Secondary, png("lobby.png"));
    wizard.commit_details(sample_details()).await.unwrap();

    let mut panel = PaymentPanel::new(wizard.draft(), wizard.pricing());
    assert_eq!(panel.payment_method, PaymentMethod::BankTransfer);
    assert!(panel.try_submit().is_none());
    let errors = panel.visible_errors().unwrap();
    assert!(errors.get("transaction_id").is_some());
    assert!(errors.get("receipt").is_some());
}
