use bson::doc;
use chrono::Utc;
use rand::Rng;

use crate::errors::{AdminError, ValidationErrors};
use crate::gateway::{BlobStore, DocumentStore};
use crate::models::image::{ImageSlot, LocalFile};
use crate::models::listing::{Category, Listing, ListingKind, ListingStatus, PaymentStatus};
use crate::models::payment::{PaymentSubmission, TransactionDetails};
use crate::services::image_service;
use crate::services::pricing_service::{self, Pricing};

/// Which image slot an attach/remove targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageField {
    Primary,
    Secondary,
}

/// The descriptive slice of a listing owned by the details panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsPayload {
    pub name: String,
    pub description: String,
    pub category: Option<Category>,
    pub contact_number: String,
    pub website: Option<String>,
    pub address: String,
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tags: Vec<String>,
}

/// Reducer-style edits applied to the draft, one field at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Name(String),
    Description(String),
    Category(Category),
    ContactNumber(String),
    Website(Option<String>),
    Address(String),
    State(String),
    Location { lat: f64, lon: f64 },
    Tags(Vec<String>),
}

/// In-memory, possibly-unpersisted state of one listing moving through
/// the wizard. Image removals of already-persisted URLs are queued and
/// only executed after a successful document write, so an abandoned
/// edit never deletes a blob the stored document still references.
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub kind: ListingKind,
    pub id: Option<String>,
    pub owner_user_id: Option<String>,
    pub details: DetailsPayload,
    pub primary_image: Option<ImageSlot>,
    pub secondary_images: Vec<ImageSlot>,
    pub status: ListingStatus,
    pub step: u32,
    pub payment_status: PaymentStatus,
    pub active: bool,
    pub payment_details: Option<TransactionDetails>,
    pending_deletes: Vec<String>,
}

fn generate_listing_id() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "listing_{}_{}",
        Utc::now().timestamp_millis(),
        rng.gen_range(0..10_000)
    )
}

fn required(field: &str, message: &str) -> AdminError {
    let mut errors = ValidationErrors::new();
    errors.insert(field, message);
    AdminError::Validation(errors)
}

fn bson_err(err: impl std::fmt::Display) -> AdminError {
    AdminError::Persistence(err.to_string())
}

impl ListingDraft {
    pub fn empty(kind: ListingKind) -> Self {
        Self {
            kind,
            id: None,
            owner_user_id: None,
            details: DetailsPayload::default(),
            primary_image: None,
            secondary_images: Vec::new(),
            status: ListingStatus::Draft,
            step: 0,
            payment_status: PaymentStatus::NotPaid,
            active: true,
            payment_details: None,
            pending_deletes: Vec::new(),
        }
    }

    fn from_listing(kind: ListingKind, listing: Listing) -> Self {
        Self {
            kind,
            id: Some(listing.id),
            owner_user_id: Some(listing.owner_user_id),
            details: DetailsPayload {
                name: listing.name,
                description: listing.description,
                category: Some(listing.category),
                contact_number: listing.contact_number,
                website: listing.website,
                address: listing.address,
                state: Some(listing.state),
                lat: listing.lat,
                lon: listing.lon,
                tags: listing.tags,
            },
            primary_image: Some(ImageSlot::Persisted(listing.primary_image)),
            secondary_images: listing
                .secondary_images
                .into_iter()
                .map(ImageSlot::Persisted)
                .collect(),
            status: listing.status,
            step: listing.step,
            payment_status: listing.payment_status,
            active: listing.active,
            payment_details: listing.payment_details,
            pending_deletes: Vec::new(),
        }
    }

    /// Fetch the persisted document and check ownership. A draft for a
    /// listing owned by someone else is never handed out.
    pub async fn load(
        docs: &dyn DocumentStore,
        kind: ListingKind,
        id: &str,
        session_user_id: &str,
    ) -> Result<Self, AdminError> {
        let doc = docs
            .get(&kind.collection(), id)
            .await?
            .ok_or(AdminError::NotFound)?;
        let listing: Listing = bson::from_document(doc).map_err(bson_err)?;
        if listing.owner_user_id != session_user_id {
            return Err(AdminError::Unauthorized);
        }
        Ok(Self::from_listing(kind, listing))
    }

    /// Pure merge, no I/O.
    pub fn apply_edit(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Name(value) => self.details.name = value,
            DraftEdit::Description(value) => self.details.description = value,
            DraftEdit::Category(value) => self.details.category = Some(value),
            DraftEdit::ContactNumber(value) => self.details.contact_number = value,
            DraftEdit::Website(value) => self.details.website = value,
            DraftEdit::Address(value) => self.details.address = value,
            DraftEdit::State(value) => self.details.state = Some(value),
            DraftEdit::Location { lat, lon } => {
                self.details.lat = Some(lat);
                self.details.lon = Some(lon);
            }
            DraftEdit::Tags(value) => self.details.tags = value,
        }
    }

    pub fn apply_details(&mut self, payload: DetailsPayload) {
        self.details = payload;
    }

    /// Attach a local file; nothing is uploaded until commit. A new
    /// primary image displaces the old one, queueing its URL if it was
    /// already persisted.
    pub fn attach_file(&mut self, field: ImageField, file: LocalFile) {
        match field {
            ImageField::Primary => {
                if let Some(ImageSlot::Persisted(url)) = self.primary_image.take() {
                    self.pending_deletes.push(url);
                }
                self.primary_image = Some(ImageSlot::Pending(file));
            }
            ImageField::Secondary => {
                self.secondary_images.push(ImageSlot::Pending(file));
            }
        }
    }

    /// Drop an image slot. Persisted URLs go into the pending-deletion
    /// set and are only released after a successful commit; pending
    /// files just disappear.
    pub fn remove_file(&mut self, field: ImageField, index: usize) -> bool {
        let removed = match field {
            ImageField::Primary => self.primary_image.take(),
            ImageField::Secondary => {
                if index < self.secondary_images.len() {
                    Some(self.secondary_images.remove(index))
                } else {
                    None
                }
            }
        };
        match removed {
            Some(ImageSlot::Persisted(url)) => {
                self.pending_deletes.push(url);
                true
            }
            Some(ImageSlot::Pending(_)) => true,
            None => false,
        }
    }

    /// Step-1 commit: upload pending images, write the document
    /// (create on first commit, patch thereafter), then release queued
    /// blob deletions. The queue is only drained after the write
    /// succeeds; a failed deletion is logged and not retried.
    pub async fn commit_details(
        &mut self,
        docs: &dyn DocumentStore,
        blobs: &dyn BlobStore,
        payload: DetailsPayload,
    ) -> Result<String, AdminError> {
        self.apply_details(payload);

        let owner = self
            .owner_user_id
            .clone()
            .ok_or(AdminError::Unauthorized)?;
        let primary_slot = self
            .primary_image
            .clone()
            .ok_or_else(|| required("primary_image", "Primary image is required"))?;
        let category = self
            .details
            .category
            .ok_or_else(|| required("category", "This field is required"))?;
        let state = self
            .details
            .state
            .clone()
            .ok_or_else(|| required("state", "This field is required"))?;

        let id = self.id.clone().unwrap_or_else(generate_listing_id);

        let primary_url = match &primary_slot {
            ImageSlot::Persisted(url) => url.clone(),
            ImageSlot::Pending(file) => {
                image_service::upload_image(blobs, &id, None, file).await?
            }
        };
        let secondary_urls =
            image_service::resolve_slots(blobs, &id, None, &self.secondary_images).await?;

        let now = Utc::now();
        if self.id.is_none() {
            let listing = Listing {
                id: id.clone(),
                owner_user_id: owner,
                name: self.details.name.clone(),
                description: self.details.description.clone(),
                category,
                contact_number: self.details.contact_number.clone(),
                website: self.details.website.clone(),
                address: self.details.address.clone(),
                state,
                lat: self.details.lat,
                lon: self.details.lon,
                tags: self.details.tags.clone(),
                primary_image: primary_url.clone(),
                secondary_images: secondary_urls.clone(),
                status: ListingStatus::Draft,
                step: 1,
                payment_status: PaymentStatus::NotPaid,
                active: true,
                payment_details: None,
                upload_date: Some(now),
            };
            let doc = bson::to_document(&listing).map_err(bson_err)?;
            docs.set(&self.kind.collection(), &id, doc).await?;
            self.status = ListingStatus::Draft;
            self.payment_status = PaymentStatus::NotPaid;
            self.step = 1;
        } else {
            // Later-step fields (status, step, payment) are not touched
            // when re-committing details on an existing listing.
            let fields = doc! {
                "name": self.details.name.clone(),
                "description": self.details.description.clone(),
                "category": bson::to_bson(&category).map_err(bson_err)?,
                "contact_number": self.details.contact_number.clone(),
                "website": bson::to_bson(&self.details.website).map_err(bson_err)?,
                "address": self.details.address.clone(),
                "state": state,
                "lat": bson::to_bson(&self.details.lat).map_err(bson_err)?,
                "lon": bson::to_bson(&self.details.lon).map_err(bson_err)?,
                "tags": bson::to_bson(&self.details.tags).map_err(bson_err)?,
                "primary_image": primary_url.clone(),
                "secondary_images": bson::to_bson(&secondary_urls).map_err(bson_err)?,
                "upload_date": bson::to_bson(&Some(now)).map_err(bson_err)?,
            };
            docs.patch(&self.kind.collection(), &id, fields).await?;
        }

        self.id = Some(id.clone());
        self.primary_image = Some(ImageSlot::Persisted(primary_url));
        self.secondary_images = secondary_urls
            .into_iter()
            .map(ImageSlot::Persisted)
            .collect();

        self.flush_pending_deletes(blobs).await;

        Ok(id)
    }

    async fn flush_pending_deletes(&mut self, blobs: &dyn BlobStore) {
        for url in std::mem::take(&mut self.pending_deletes) {
            if let Err(err) = image_service::delete_by_url(blobs, &url).await {
                eprintln!("Error deleting image {}: {}", url, err);
            }
        }
    }

    /// Persist the wizard's high-water mark. Never lowers it.
    pub async fn commit_step_reached(
        &mut self,
        docs: &dyn DocumentStore,
        step: u32,
    ) -> Result<(), AdminError> {
        let id = self.id.as_deref().ok_or(AdminError::NotFound)?;
        if step <= self.step {
            return Ok(());
        }
        docs.patch(&self.kind.collection(), id, doc! { "step": step as i32 })
            .await?;
        self.step = step;
        Ok(())
    }

    /// Write the payment slice: upload the receipt if it is still
    /// local, then overwrite the transaction record whole and flip the
    /// payment status to Pending.
    pub async fn commit_payment(
        &mut self,
        docs: &dyn DocumentStore,
        blobs: &dyn BlobStore,
        pricing: &Pricing,
        submission: PaymentSubmission,
    ) -> Result<(), AdminError> {
        let id = self.id.clone().ok_or(AdminError::NotFound)?;

        let receipt_url = match &submission.receipt {
            Some(ImageSlot::Persisted(url)) => url.clone(),
            Some(ImageSlot::Pending(file)) => {
                image_service::upload_receipt(blobs, &id, file).await?
            }
            None => String::new(),
        };

        let now = Utc::now();
        let details = TransactionDetails {
            transaction_id: submission.transaction_id,
            receipt_url,
            selected_plan: submission.selected_plan,
            payment_method: submission.payment_method,
            total_amount: pricing.total(submission.selected_plan),
            expiry_date: pricing_service::expiry_date(submission.selected_plan, now),
        };

        let step = self.step.max(3);
        let fields = doc! {
            "payment_details": bson::to_bson(&details).map_err(bson_err)?,
            "payment_status": bson::to_bson(&PaymentStatus::Pending).map_err(bson_err)?,
            "step": step as i32,
        };
        docs.patch(&self.kind.collection(), &id, fields).await?;

        self.payment_details = Some(details);
        self.payment_status = PaymentStatus::Pending;
        self.step = step;
        Ok(())
    }

    /// Final patch flipping the listing into moderation.
    pub async fn submit_for_review(&mut self, docs: &dyn DocumentStore) -> Result<(), AdminError> {
        let id = self.id.as_deref().ok_or(AdminError::NotFound)?;
        let fields = doc! {
            "status": bson::to_bson(&ListingStatus::InReview).map_err(bson_err)?,
        };
        docs.patch(&self.kind.collection(), id, fields).await?;
        self.status = ListingStatus::InReview;
        println!("Review status updated to In Review");
        Ok(())
    }
}
