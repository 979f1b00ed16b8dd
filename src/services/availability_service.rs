use std::sync::Arc;

use bson::doc;

use crate::errors::{AdminError, ValidationErrors};
use crate::gateway::{CollectionPath, DocumentStore};
use crate::models::listing::ListingKind;
use crate::models::sub_entity::BookedRange;

const APARTMENTS: &str = "apartments";
const HOTEL_ROOMS: &str = "hotel-rooms";

fn bson_err(err: impl std::fmt::Display) -> AdminError {
    AdminError::Persistence(err.to_string())
}

fn validate_range(range: &BookedRange) -> Result<(), AdminError> {
    if range.from_date.is_empty() || range.to_date.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.insert("booked_days", "Please select both dates");
        return Err(AdminError::Validation(errors));
    }
    Ok(())
}

/// Availability management for a hotel's sub-entities: active toggles
/// and already-booked date ranges. The listing-level toggle lives in
/// `listing_service`; sub-entity toggles here are gated on it, so an
/// inactive hotel cannot have individually active apartments or rooms.
pub struct AvailabilityService {
    docs: Arc<dyn DocumentStore>,
}

impl AvailabilityService {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    fn path(&self, listing_id: &str, child: &str) -> CollectionPath {
        ListingKind::Hotel.sub_collection(listing_id, child)
    }

    async fn listing_is_active(&self, listing_id: &str) -> Result<bool, AdminError> {
        let doc = self
            .docs
            .get(&ListingKind::Hotel.collection(), listing_id)
            .await?
            .ok_or(AdminError::NotFound)?;
        Ok(doc.get_bool("active").unwrap_or(false))
    }

    /// Flip a sub-entity's visibility. Returns `false` without writing
    /// when the parent hotel is inactive.
    async fn set_sub_active(
        &self,
        listing_id: &str,
        child: &str,
        entity_id: &str,
        active: bool,
    ) -> Result<bool, AdminError> {
        if !self.listing_is_active(listing_id).await? {
            return Ok(false);
        }
        self.docs
            .patch(&self.path(listing_id, child), entity_id, doc! { "active": active })
            .await?;
        Ok(true)
    }

    pub async fn set_apartment_active(
        &self,
        listing_id: &str,
        apartment_id: &str,
        active: bool,
    ) -> Result<bool, AdminError> {
        self.set_sub_active(listing_id, APARTMENTS, apartment_id, active)
            .await
    }

    pub async fn set_hotel_room_active(
        &self,
        listing_id: &str,
        room_id: &str,
        active: bool,
    ) -> Result<bool, AdminError> {
        self.set_sub_active(listing_id, HOTEL_ROOMS, room_id, active)
            .await
    }

    async fn booked_days(
        &self,
        path: &CollectionPath,
        entity_id: &str,
    ) -> Result<Vec<BookedRange>, AdminError> {
        let doc = self
            .docs
            .get(path, entity_id)
            .await?
            .ok_or(AdminError::NotFound)?;
        match doc.get("booked_days") {
            Some(value) => bson::from_bson(value.clone()).map_err(bson_err),
            None => Ok(Vec::new()),
        }
    }

    /// The whole range list is rewritten on every change, matching how
    /// the document stores it.
    async fn write_booked_days(
        &self,
        path: &CollectionPath,
        entity_id: &str,
        days: &[BookedRange],
    ) -> Result<(), AdminError> {
        let fields = doc! { "booked_days": bson::to_bson(days).map_err(bson_err)? };
        self.docs.patch(path, entity_id, fields).await?;
        Ok(())
    }

    async fn add_booking(
        &self,
        listing_id: &str,
        child: &str,
        entity_id: &str,
        range: BookedRange,
    ) -> Result<Vec<BookedRange>, AdminError> {
        validate_range(&range)?;
        let path = self.path(listing_id, child);
        let mut days = self.booked_days(&path, entity_id).await?;
        days.push(range);
        self.write_booked_days(&path, entity_id, &days).await?;
        Ok(days)
    }

    /// Remove the range at `index`; an out-of-range index is a no-op,
    /// since the list may have changed under the caller.
    async fn remove_booking(
        &self,
        listing_id: &str,
        child: &str,
        entity_id: &str,
        index: usize,
    ) -> Result<Vec<BookedRange>, AdminError> {
        let path = self.path(listing_id, child);
        let mut days = self.booked_days(&path, entity_id).await?;
        if index < days.len() {
            days.remove(index);
            self.write_booked_days(&path, entity_id, &days).await?;
        }
        Ok(days)
    }

    pub async fn add_apartment_booking(
        &self,
        listing_id: &str,
        apartment_id: &str,
        range: BookedRange,
    ) -> Result<Vec<BookedRange>, AdminError> {
        self.add_booking(listing_id, APARTMENTS, apartment_id, range)
            .await
    }

    pub async fn remove_apartment_booking(
        &self,
        listing_id: &str,
        apartment_id: &str,
        index: usize,
    ) -> Result<Vec<BookedRange>, AdminError> {
        self.remove_booking(listing_id, APARTMENTS, apartment_id, index)
            .await
    }

    pub async fn add_hotel_room_booking(
        &self,
        listing_id: &str,
        room_id: &str,
        range: BookedRange,
    ) -> Result<Vec<BookedRange>, AdminError> {
        self.add_booking(listing_id, HOTEL_ROOMS, room_id, range)
            .await
    }

    pub async fn remove_hotel_room_booking(
        &self,
        listing_id: &str,
        room_id: &str,
        index: usize,
    ) -> Result<Vec<BookedRange>, AdminError> {
        self.remove_booking(listing_id, HOTEL_ROOMS, room_id, index)
            .await
    }
}
