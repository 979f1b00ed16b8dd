use futures::future::try_join_all;
use uuid::Uuid;

use crate::errors::AdminError;
use crate::gateway::BlobStore;
use crate::models::image::{ImageSlot, LocalFile};

/// Object path for a listing image. Each upload gets a fresh token so
/// two files with the same original name never collide.
pub fn image_object_path(listing_id: &str, subpath: Option<&str>, file_name: &str) -> String {
    let token = Uuid::new_v4();
    match subpath {
        Some(sub) => format!(
            "listing-images/{}/{}/{}_{}",
            listing_id, sub, token, file_name
        ),
        None => format!("listing-images/{}/{}_{}", listing_id, token, file_name),
    }
}

pub fn receipt_object_path(listing_id: &str, file_name: &str) -> String {
    let token = Uuid::new_v4();
    format!("listing-receipts/{}/{}_{}", listing_id, token, file_name)
}

/// Upload a pending file and resolve it to a public URL.
pub async fn upload_image(
    blobs: &dyn BlobStore,
    listing_id: &str,
    subpath: Option<&str>,
    file: &LocalFile,
) -> Result<String, AdminError> {
    let path = image_object_path(listing_id, subpath, &file.name);
    blobs
        .upload(&path, file.bytes.clone(), &file.content_type)
        .await?;
    Ok(blobs.url_for(&path))
}

pub async fn upload_receipt(
    blobs: &dyn BlobStore,
    listing_id: &str,
    file: &LocalFile,
) -> Result<String, AdminError> {
    let path = receipt_object_path(listing_id, &file.name);
    blobs
        .upload(&path, file.bytes.clone(), &file.content_type)
        .await?;
    Ok(blobs.url_for(&path))
}

/// Resolve a list of image slots to URLs, uploading the pending ones.
/// Uploads run concurrently and are joined before returning; slot
/// order is preserved.
pub async fn resolve_slots(
    blobs: &dyn BlobStore,
    listing_id: &str,
    subpath: Option<&str>,
    slots: &[ImageSlot],
) -> Result<Vec<String>, AdminError> {
    let uploads = slots.iter().map(|slot| async move {
        match slot {
            ImageSlot::Persisted(url) => Ok(url.clone()),
            ImageSlot::Pending(file) => upload_image(blobs, listing_id, subpath, file).await,
        }
    });
    try_join_all(uploads).await
}

/// Delete a stored blob given its resolved URL.
pub async fn delete_by_url(blobs: &dyn BlobStore, url: &str) -> Result<(), AdminError> {
    match blobs.path_for_url(url) {
        Some(path) => {
            blobs.delete(&path).await?;
            Ok(())
        }
        None => {
            eprintln!("Unrecognized image URL, skipping delete: {}", url);
            Ok(())
        }
    }
}
