use std::sync::Arc;

use crate::errors::{AdminError, ValidationErrors};
use crate::gateway::{BlobStore, CollectionPath, DocumentStore};
use crate::models::image::ImageSlot;
use crate::models::listing::ListingKind;
use crate::models::sub_entity::{Apartment, ApartmentRoom, BookedRange, HotelRoom, Meal};
use crate::services::image_service;

const APARTMENTS: &str = "apartments";
const HOTEL_ROOMS: &str = "hotel-rooms";

/// Editable apartment state, before images are resolved. Room edits on
/// the form enforce the at-least-one-room invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentForm {
    pub apartment_name: String,
    pub description: String,
    pub price: f64,
    pub bathrooms: u32,
    pub checkin_time: String,
    pub checkout_time: String,
    pub images: Vec<ImageSlot>,
    pub facilities: Vec<String>,
    pub rooms: Vec<ApartmentRoom>,
    pub active: bool,
    /// Carried through edits untouched; managed by the availability
    /// service, not the form.
    pub booked_days: Vec<BookedRange>,
}

impl Default for ApartmentForm {
    fn default() -> Self {
        Self {
            apartment_name: String::new(),
            description: String::new(),
            price: 0.0,
            bathrooms: 0,
            checkin_time: String::new(),
            checkout_time: String::new(),
            images: Vec::new(),
            facilities: Vec::new(),
            rooms: vec![ApartmentRoom::default()],
            active: true,
            booked_days: Vec::new(),
        }
    }
}

fn room_is_complete(room: &ApartmentRoom) -> bool {
    !room.room_name.is_empty() && room.persons > 0
}

impl ApartmentForm {
    /// Prefill for the edit flow; stored URLs become persisted slots.
    pub fn from_apartment(apartment: &Apartment) -> Self {
        Self {
            apartment_name: apartment.apartment_name.clone(),
            description: apartment.description.clone(),
            price: apartment.price,
            bathrooms: apartment.bathrooms,
            checkin_time: apartment.checkin_time.clone(),
            checkout_time: apartment.checkout_time.clone(),
            images: apartment
                .images
                .iter()
                .map(|url| ImageSlot::Persisted(url.clone()))
                .collect(),
            facilities: apartment.facilities.clone(),
            rooms: apartment.rooms.clone(),
            active: apartment.active,
            booked_days: apartment.booked_days.clone(),
        }
    }

    /// Append a blank room; refused while the last room is incomplete.
    pub fn add_room(&mut self) -> bool {
        match self.rooms.last() {
            Some(last) if room_is_complete(last) => {
                self.rooms.push(ApartmentRoom::default());
                true
            }
            _ => false,
        }
    }

    /// Every apartment keeps at least one room.
    pub fn remove_room(&mut self, index: usize) -> bool {
        if self.rooms.len() > 1 && index < self.rooms.len() {
            self.rooms.remove(index);
            true
        } else {
            false
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.apartment_name.is_empty() {
            errors.insert("apartment_name", "Apartment Title is required.");
        }
        if self.description.is_empty() {
            errors.insert("description", "Apartment Description is required.");
        }
        if self.price <= 0.0 {
            errors.insert("price", "Price is required.");
        }
        if self.bathrooms == 0 {
            errors.insert("bathrooms", "Number of Bathrooms is required.");
        }
        if self.checkin_time.is_empty() {
            errors.insert("checkin_time", "Check In time is required.");
        }
        if self.checkout_time.is_empty() {
            errors.insert("checkout_time", "Check Out time is required.");
        }
        if self.images.is_empty() {
            errors.insert("images", "Please upload at least one image.");
        }
        if self.facilities.is_empty() {
            errors.insert("facilities", "Please select at least one facility.");
        }
        if self.rooms.is_empty() {
            errors.insert("rooms", "Each apartment must have at least one room.");
        }
        for (i, room) in self.rooms.iter().enumerate() {
            if room.room_name.is_empty() {
                errors.insert(&format!("rooms[{}].room_name", i), "Room Title is required.");
            }
            if room.persons == 0 {
                errors.insert(
                    &format!("rooms[{}].persons", i),
                    "Number of Persons is required.",
                );
            }
        }
        errors
    }

    fn into_apartment(self, id: Option<String>, image_urls: Vec<String>) -> Apartment {
        Apartment {
            id,
            apartment_name: self.apartment_name,
            description: self.description,
            price: self.price,
            bathrooms: self.bathrooms,
            checkin_time: self.checkin_time,
            checkout_time: self.checkout_time,
            images: image_urls,
            facilities: self.facilities,
            rooms: self.rooms,
            active: self.active,
            booked_days: self.booked_days,
        }
    }
}

/// Editable hotel-room state. Unlike apartments, the meal list may be
/// empty, but every meal present must be complete.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelRoomForm {
    pub room_name: String,
    pub description: String,
    pub price: f64,
    pub single_beds: u32,
    pub double_beds: u32,
    pub persons: u32,
    pub checkin_time: String,
    pub checkout_time: String,
    pub images: Vec<ImageSlot>,
    pub facilities: Vec<String>,
    pub meals: Vec<Meal>,
    pub active: bool,
    pub booked_days: Vec<BookedRange>,
}

impl Default for HotelRoomForm {
    fn default() -> Self {
        Self {
            room_name: String::new(),
            description: String::new(),
            price: 0.0,
            single_beds: 0,
            double_beds: 0,
            persons: 0,
            checkin_time: String::new(),
            checkout_time: String::new(),
            images: Vec::new(),
            facilities: Vec::new(),
            meals: Vec::new(),
            active: true,
            booked_days: Vec::new(),
        }
    }
}

fn meal_is_complete(meal: &Meal) -> bool {
    !meal.meal_name.is_empty() && !meal.meal_type.is_empty() && meal.price > 0.0
}

impl HotelRoomForm {
    pub fn from_hotel_room(room: &HotelRoom) -> Self {
        Self {
            room_name: room.room_name.clone(),
            description: room.description.clone(),
            price: room.price,
            single_beds: room.single_beds,
            double_beds: room.double_beds,
            persons: room.persons,
            checkin_time: room.checkin_time.clone(),
            checkout_time: room.checkout_time.clone(),
            images: room
                .images
                .iter()
                .map(|url| ImageSlot::Persisted(url.clone()))
                .collect(),
            facilities: room.facilities.clone(),
            meals: room.meals.clone(),
            active: room.active,
            booked_days: room.booked_days.clone(),
        }
    }

    pub fn add_meal(&mut self) -> bool {
        match self.meals.last() {
            Some(last) if !meal_is_complete(last) => false,
            _ => {
                self.meals.push(Meal::default());
                true
            }
        }
    }

    pub fn remove_meal(&mut self, index: usize) -> bool {
        if index < self.meals.len() {
            self.meals.remove(index);
            true
        } else {
            false
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.room_name.is_empty() {
            errors.insert("room_name", "Room Title is required.");
        }
        if self.description.is_empty() {
            errors.insert("description", "Room Description is required.");
        }
        if self.price <= 0.0 {
            errors.insert("price", "Price is required.");
        }
        if self.persons == 0 {
            errors.insert("persons", "Number of Persons is required.");
        }
        if self.images.is_empty() {
            errors.insert("images", "Please upload at least one image.");
        }
        if self.facilities.is_empty() {
            errors.insert("facilities", "Please select at least one facility.");
        }
        for (i, meal) in self.meals.iter().enumerate() {
            if !meal_is_complete(meal) {
                errors.insert(
                    &format!("meals[{}]", i),
                    "Meal name, type and price are required.",
                );
            }
        }
        errors
    }

    fn into_hotel_room(self, id: Option<String>, image_urls: Vec<String>) -> HotelRoom {
        HotelRoom {
            id,
            room_name: self.room_name,
            description: self.description,
            price: self.price,
            single_beds: self.single_beds,
            double_beds: self.double_beds,
            persons: self.persons,
            checkin_time: self.checkin_time,
            checkout_time: self.checkout_time,
            images: image_urls,
            facilities: self.facilities,
            meals: self.meals,
            active: self.active,
            booked_days: self.booked_days,
        }
    }
}

/// CRUD over a hotel listing's subcollections. Unlike the wizard's
/// draft, every operation here persists immediately.
pub struct SubEntityService {
    docs: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl SubEntityService {
    pub fn new(docs: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { docs, blobs }
    }

    fn path(&self, listing_id: &str, child: &str) -> CollectionPath {
        ListingKind::Hotel.sub_collection(listing_id, child)
    }

    pub async fn list_apartments(&self, listing_id: &str) -> Result<Vec<Apartment>, AdminError> {
        let raw = self.docs.list(&self.path(listing_id, APARTMENTS)).await?;
        let mut apartments = Vec::new();
        for doc in raw {
            match bson::from_document::<Apartment>(doc) {
                Ok(apartment) => apartments.push(apartment),
                Err(err) => eprintln!("Skipping malformed apartment document: {}", err),
            }
        }
        Ok(apartments)
    }

    pub async fn add_apartment(
        &self,
        listing_id: &str,
        form: ApartmentForm,
    ) -> Result<Apartment, AdminError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }

        let image_urls = image_service::resolve_slots(
            self.blobs.as_ref(),
            listing_id,
            Some(APARTMENTS),
            &form.images,
        )
        .await?;

        let mut apartment = form.into_apartment(None, image_urls);
        let doc = bson::to_document(&apartment)
            .map_err(|err| AdminError::Persistence(err.to_string()))?;
        let id = self
            .docs
            .create(&self.path(listing_id, APARTMENTS), doc)
            .await?;
        apartment.id = Some(id);
        Ok(apartment)
    }

    pub async fn update_apartment(
        &self,
        listing_id: &str,
        apartment_id: &str,
        form: ApartmentForm,
    ) -> Result<Apartment, AdminError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }

        // Only pending slots are uploaded; retained URLs pass through.
        let image_urls = image_service::resolve_slots(
            self.blobs.as_ref(),
            listing_id,
            Some(APARTMENTS),
            &form.images,
        )
        .await?;

        let apartment = form.into_apartment(Some(apartment_id.to_string()), image_urls);
        let doc = bson::to_document(&apartment)
            .map_err(|err| AdminError::Persistence(err.to_string()))?;
        self.docs
            .patch(&self.path(listing_id, APARTMENTS), apartment_id, doc)
            .await?;
        Ok(apartment)
    }

    /// Release every image blob, then delete the document. A blob
    /// failure aborts before the document is touched.
    pub async fn delete_apartment(
        &self,
        listing_id: &str,
        apartment: &Apartment,
    ) -> Result<(), AdminError> {
        let id = apartment.id.as_deref().ok_or(AdminError::NotFound)?;
        for url in &apartment.images {
            image_service::delete_by_url(self.blobs.as_ref(), url).await?;
        }
        self.docs
            .delete(&self.path(listing_id, APARTMENTS), id)
            .await?;
        Ok(())
    }

    pub async fn list_hotel_rooms(&self, listing_id: &str) -> Result<Vec<HotelRoom>, AdminError> {
        let raw = self.docs.list(&self.path(listing_id, HOTEL_ROOMS)).await?;
        let mut rooms = Vec::new();
        for doc in raw {
            match bson::from_document::<HotelRoom>(doc) {
                Ok(room) => rooms.push(room),
                Err(err) => eprintln!("Skipping malformed hotel-room document: {}", err),
            }
        }
        Ok(rooms)
    }

    pub async fn add_hotel_room(
        &self,
        listing_id: &str,
        form: HotelRoomForm,
    ) -> Result<HotelRoom, AdminError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }

        let image_urls = image_service::resolve_slots(
            self.blobs.as_ref(),
            listing_id,
            Some(HOTEL_ROOMS),
            &form.images,
        )
        .await?;

        let mut room = form.into_hotel_room(None, image_urls);
        let doc =
            bson::to_document(&room).map_err(|err| AdminError::Persistence(err.to_string()))?;
        let id = self
            .docs
            .create(&self.path(listing_id, HOTEL_ROOMS), doc)
            .await?;
        room.id = Some(id);
        Ok(room)
    }

    pub async fn update_hotel_room(
        &self,
        listing_id: &str,
        room_id: &str,
        form: HotelRoomForm,
    ) -> Result<HotelRoom, AdminError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }

        let image_urls = image_service::resolve_slots(
            self.blobs.as_ref(),
            listing_id,
            Some(HOTEL_ROOMS),
            &form.images,
        )
        .await?;

        let room = form.into_hotel_room(Some(room_id.to_string()), image_urls);
        let doc =
            bson::to_document(&room).map_err(|err| AdminError::Persistence(err.to_string()))?;
        self.docs
            .patch(&self.path(listing_id, HOTEL_ROOMS), room_id, doc)
            .await?;
        Ok(room)
    }

    pub async fn delete_hotel_room(
        &self,
        listing_id: &str,
        room: &HotelRoom,
    ) -> Result<(), AdminError> {
        let id = room.id.as_deref().ok_or(AdminError::NotFound)?;
        for url in &room.images {
            image_service::delete_by_url(self.blobs.as_ref(), url).await?;
        }
        self.docs
            .delete(&self.path(listing_id, HOTEL_ROOMS), id)
            .await?;
        Ok(())
    }
}
