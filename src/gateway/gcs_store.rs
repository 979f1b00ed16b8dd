use std::borrow::Cow;
use std::env;

use async_trait::async_trait;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::delete::DeleteObjectRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};

use crate::gateway::{BlobStore, GatewayError};

/// Blob store backed by a Google Cloud Storage bucket. Objects are
/// public and resolve to the standard storage.googleapis.com URL.
pub struct GcsBlobStore {
    client: Client,
    bucket_name: String,
}

impl GcsBlobStore {
    pub async fn new() -> Result<Self, GatewayError> {
        let bucket_name = env::var("LISTING_BUCKET")
            .map_err(|_| GatewayError::Storage("LISTING_BUCKET not set".to_string()))?;

        let config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to create GCS client: {}", e)))?;

        let client = Client::new(config);

        Ok(Self {
            client,
            bucket_name,
        })
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), GatewayError> {
        let mut media = Media::new(path.to_string());
        media.content_type = Cow::Owned(content_type.to_string());
        let upload_type = UploadType::Simple(media);
        let upload_request = UploadObjectRequest {
            bucket: self.bucket_name.clone(),
            ..Default::default()
        };

        self.client
            .upload_object(&upload_request, bytes, &upload_type)
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to upload to GCS: {}", e)))?;

        Ok(())
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "https://storage.googleapis.com/{}/{}",
            self.bucket_name, path
        )
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!(
            "https://storage.googleapis.com/{}/",
            self.bucket_name
        ))
        .map(str::to_string)
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.client
            .delete_object(&DeleteObjectRequest {
                bucket: self.bucket_name.clone(),
                object: path.to_string(),
                ..Default::default()
            })
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to delete from GCS: {}", e)))?;

        Ok(())
    }
}
