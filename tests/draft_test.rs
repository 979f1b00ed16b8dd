mod common;

use common::*;
use listing_admin::errors::AdminError;
use listing_admin::models::listing::{Category, ListingKind, ListingStatus, PaymentStatus};
use listing_admin::wizard::draft::{DraftEdit, ImageField, ListingDraft};

#[tokio::test]
async fn commit_then_load_round_trips_the_listing() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let loaded = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .expect("load committed listing");

    assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
    assert_eq!(loaded.details, sample_details());
    assert_eq!(loaded.status, ListingStatus::Draft);
    assert_eq!(loaded.payment_status, PaymentStatus::NotPaid);
    assert_eq!(loaded.step, 1);
    assert!(loaded.active);

    let primary = loaded.primary_image.expect("primary image persisted");
    let url = primary.url().expect("persisted slot carries a url");
    assert!(url.contains(&format!("listing-images/{}/", id)));
    assert!(url.ends_with("_front.png"));
    assert_eq!(loaded.secondary_images.len(), 1);
    assert!(backend.blobs.contains_url(url));
}

#[tokio::test]
async fn load_rejects_other_owner_and_missing_listing() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let err = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-b")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Unauthorized));

    let err = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, "nope", "user-a")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotFound));
}

#[test]
fn field_edits_merge_into_the_details() {
    let mut draft = ListingDraft::empty(ListingKind::Hotel);

    draft.apply_edit(DraftEdit::Name("Fort Printers".to_string()));
    draft.apply_edit(DraftEdit::Description("Boutique stay".to_string()));
    draft.apply_edit(DraftEdit::Category(Category::Luxury));
    draft.apply_edit(DraftEdit::ContactNumber("0771234567".to_string()));
    draft.apply_edit(DraftEdit::Website(Some("https://fort.example".to_string())));
    draft.apply_edit(DraftEdit::Address("39 Church Street".to_string()));
    draft.apply_edit(DraftEdit::State("Galle".to_string()));
    draft.apply_edit(DraftEdit::Location { lat: 6.03, lon: 80.22 });
    draft.apply_edit(DraftEdit::Tags(vec!["heritage".to_string()]));

    assert_eq!(draft.details.name, "Fort Printers");
    assert_eq!(draft.details.description, "Boutique stay");
    assert_eq!(draft.details.category, Some(Category::Luxury));
    assert_eq!(draft.details.contact_number, "0771234567");
    assert_eq!(draft.details.website.as_deref(), Some("https://fort.example"));
    assert_eq!(draft.details.address, "39 Church Street");
    assert_eq!(draft.details.state.as_deref(), Some("Galle"));
    assert_eq!(draft.details.lat, Some(6.03));
    assert_eq!(draft.details.lon, Some(80.22));
    assert_eq!(draft.details.tags, vec!["heritage".to_string()]);

    // Each edit only touches its own field.
    draft.apply_edit(DraftEdit::Name("Fort Bazaar".to_string()));
    assert_eq!(draft.details.name, "Fort Bazaar");
    assert_eq!(draft.details.state.as_deref(), Some("Galle"));
}

#[tokio::test]
async fn removing_a_pending_file_never_touches_storage() {
    let backend = TestBackend::new("user-a");
    let mut draft = ListingDraft::empty(ListingKind::Hotel);
    draft.owner_user_id = Some("user-a".to_string());
    draft.attach_file(ImageField::Primary, png("front.png"));
    draft.attach_file(ImageField::Secondary, png("lobby.png"));
    draft.attach_file(ImageField::Secondary, png("garden.png"));

    assert!(draft.remove_file(ImageField::Secondary, 1));
    draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .unwrap();

    // The dropped file was local, so nothing was ever uploaded or deleted.
    assert_eq!(backend.blobs.object_count(), 2);
    assert!(backend.blobs.deleted_paths().is_empty());
}

#[tokio::test]
async fn persisted_removal_is_deferred_until_commit() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let mut draft = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .unwrap();
    let doomed_url = draft.secondary_images[0].url().unwrap().to_string();

    assert!(draft.remove_file(ImageField::Secondary, 0));
    // Abandoning the edit here leaves the blob alone.
    assert!(backend.blobs.contains_url(&doomed_url));
    assert!(backend.blobs.deleted_paths().is_empty());

    draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .unwrap();

    assert!(!backend.blobs.contains_url(&doomed_url));
    let reloaded = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .unwrap();
    assert!(reloaded.secondary_images.is_empty());
}

#[tokio::test]
async fn failed_write_keeps_queued_blobs_alive() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let mut draft = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .unwrap();
    let doomed_url = draft.secondary_images[0].url().unwrap().to_string();
    draft.remove_file(ImageField::Secondary, 0);

    backend.docs.fail_writes(true);
    let err = draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Persistence(_)));
    assert!(backend.blobs.contains_url(&doomed_url));
    assert!(backend.blobs.deleted_paths().is_empty());

    // The queue survives the failure; the retry releases the blob.
    backend.docs.fail_writes(false);
    draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .unwrap();
    assert!(!backend.blobs.contains_url(&doomed_url));
}

#[tokio::test]
async fn new_primary_displaces_the_old_one_on_commit() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let mut draft = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .unwrap();
    let old_url = draft.primary_image.as_ref().unwrap().url().unwrap().to_string();

    draft.attach_file(ImageField::Primary, png("new-front.png"));
    draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .unwrap();

    assert!(!backend.blobs.contains_url(&old_url));
    let new_url = draft.primary_image.as_ref().unwrap().url().unwrap();
    assert!(new_url.ends_with("_new-front.png"));
    assert!(backend.blobs.contains_url(new_url));
}

#[tokio::test]
async fn commit_without_primary_image_is_a_validation_error() {
    let backend = TestBackend::new("user-a");
    let mut draft = ListingDraft::empty(ListingKind::Hotel);
    draft.owner_user_id = Some("user-a".to_string());

    let err = draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .unwrap_err();
    match err {
        AdminError::Validation(errors) => {
            assert!(errors.get("primary_image").is_some());
        }
        other => panic!("expected validation error, got {}", other),
    }
    assert_eq!(backend.blobs.object_count(), 0);
}

#[tokio::test]
async fn step_high_water_mark_never_lowers() {
    let backend = TestBackend::new("user-a");
    let id = seed_listing(&backend, "user-a", ListingKind::Hotel).await;

    let mut draft = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .unwrap();
    draft.commit_step_reached(backend.docs.as_ref(), 3).await.unwrap();
    assert_eq!(draft.step, 3);

    // Walking back through earlier steps does not rewind the mark.
    draft.commit_step_reached(backend.docs.as_ref(), 2).await.unwrap();
    assert_eq!(draft.step, 3);

    let reloaded = ListingDraft::load(backend.docs.as_ref(), ListingKind::Hotel, &id, "user-a")
        .await
        .unwrap();
    assert_eq!(reloaded.step, 3);
}
