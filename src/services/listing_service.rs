use bson::doc;

use crate::errors::AdminError;
use crate::gateway::{BlobStore, DocumentStore};
use crate::models::listing::{Listing, ListingKind};
use crate::services::image_service;

/// Subcollections cascaded on listing removal.
const SUB_COLLECTIONS: &[&str] = &["apartments", "hotel-rooms"];

/// All listings owned by `user_id`, for the listing index view.
pub async fn list_for_owner(
    docs: &dyn DocumentStore,
    kind: ListingKind,
    user_id: &str,
) -> Result<Vec<Listing>, AdminError> {
    let raw = docs.query_by_owner(&kind.collection(), user_id).await?;
    let mut listings = Vec::new();
    for doc in raw {
        match bson::from_document::<Listing>(doc) {
            Ok(listing) => listings.push(listing),
            Err(err) => eprintln!("Skipping malformed listing document: {}", err),
        }
    }
    Ok(listings)
}

/// Visibility toggle, independent of moderation status.
pub async fn set_active(
    docs: &dyn DocumentStore,
    kind: ListingKind,
    listing_id: &str,
    active: bool,
) -> Result<(), AdminError> {
    docs.patch(&kind.collection(), listing_id, doc! { "active": active })
        .await?;
    Ok(())
}

/// Remove a listing and cascade through its subcollections: every
/// sub-entity's image blobs are released before its document, then the
/// listing document itself is deleted. A failure between blob and
/// document deletion can orphan one side; that is logged and not
/// compensated for.
pub async fn remove_listing(
    docs: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    kind: ListingKind,
    listing_id: &str,
) -> Result<(), AdminError> {
    if kind.has_sub_entities() {
        for child in SUB_COLLECTIONS {
            let path = kind.sub_collection(listing_id, child);
            for doc in docs.list(&path).await? {
                if let Ok(images) = doc.get_array("images") {
                    for image in images {
                        if let Some(url) = image.as_str() {
                            if let Err(err) = image_service::delete_by_url(blobs, url).await {
                                eprintln!("Error deleting image {}: {}", url, err);
                            }
                        }
                    }
                }
                if let Ok(id) = doc.get_str("id") {
                    docs.delete(&path, id).await?;
                }
            }
        }
    }

    docs.delete(&kind.collection(), listing_id).await?;
    println!("Listing {} removed successfully", listing_id);
    Ok(())
}
