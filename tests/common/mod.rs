#![allow(dead_code)]

use std::sync::Arc;

use listing_admin::gateway::memory::{MemoryBlobStore, MemoryDocumentStore, MemoryIdentity};
use listing_admin::models::image::{ImageSlot, LocalFile};
use listing_admin::models::listing::{Category, ListingKind};
use listing_admin::models::sub_entity::ApartmentRoom;
use listing_admin::services::sub_entity_service::{ApartmentForm, HotelRoomForm};
use listing_admin::wizard::draft::{DetailsPayload, ImageField, ListingDraft};

pub struct TestBackend {
    pub docs: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub identity: Arc<MemoryIdentity>,
}

impl TestBackend {
    pub fn new(user_id: &str) -> Self {
        Self {
            docs: Arc::new(MemoryDocumentStore::new()),
            blobs: Arc::new(MemoryBlobStore::new()),
            identity: Arc::new(MemoryIdentity::signed_in(user_id)),
        }
    }
}

pub fn png(name: &str) -> LocalFile {
    LocalFile::new(name, "image/png", vec![137, 80, 78, 71])
}

pub fn sample_details() -> DetailsPayload {
    DetailsPayload {
        name: "X".to_string(),
        description: "A quiet stay near the fort".to_string(),
        category: Some(Category::Budget),
        contact_number: "0771234567".to_string(),
        website: None,
        address: "12 Lighthouse Street, Galle".to_string(),
        state: Some("Galle".to_string()),
        lat: Some(6.0328),
        lon: Some(80.2168),
        tags: vec!["beach".to_string()],
    }
}

/// Commit a fresh listing with one primary and one secondary image and
/// return its id.
pub async fn seed_listing(backend: &TestBackend, owner: &str, kind: ListingKind) -> String {
    let mut draft = ListingDraft::empty(kind);
    draft.owner_user_id = Some(owner.to_string());
    draft.attach_file(ImageField::Primary, png("front.png"));
    draft.attach_file(ImageField::Secondary, png("lobby.png"));
    draft
        .commit_details(backend.docs.as_ref(), backend.blobs.as_ref(), sample_details())
        .await
        .expect("seed listing")
}

pub fn room(name: &str, persons: u32) -> ApartmentRoom {
    ApartmentRoom {
        room_name: name.to_string(),
        single_beds: 1,
        double_beds: 1,
        persons,
        room_facilities: vec!["heating".to_string()],
    }
}

pub fn apartment_form(rooms: Vec<ApartmentRoom>) -> ApartmentForm {
    ApartmentForm {
        apartment_name: "Sea View".to_string(),
        description: "Two rooms overlooking the bay".to_string(),
        price: 120.0,
        bathrooms: 1,
        checkin_time: "14:00".to_string(),
        checkout_time: "11:00".to_string(),
        images: vec![ImageSlot::Pending(png("apartment.png"))],
        facilities: vec!["pool".to_string()],
        rooms,
        active: true,
        booked_days: Vec::new(),
    }
}

pub fn hotel_room_form() -> HotelRoomForm {
    HotelRoomForm {
        room_name: "Deluxe Double".to_string(),
        description: "Garden-facing double room".to_string(),
        price: 90.0,
        single_beds: 0,
        double_beds: 1,
        persons: 2,
        checkin_time: "14:00".to_string(),
        checkout_time: "11:00".to_string(),
        images: vec![ImageSlot::Pending(png("room.png"))],
        facilities: vec!["tv".to_string()],
        meals: Vec::new(),
        active: true,
        booked_days: Vec::new(),
    }
}
