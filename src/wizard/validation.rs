use crate::errors::ValidationErrors;
use crate::models::listing::DISTRICTS;
use crate::wizard::draft::{DetailsPayload, ListingDraft};

pub fn is_valid_contact_number(value: &str) -> bool {
    let re = regex::Regex::new(r"^[0-9]{10}$");
    re.unwrap().is_match(value)
}

/// Required-field and format checks for the details panel. Image
/// requirements are checked against the draft since files live on it,
/// not in the payload.
pub fn validate_details(payload: &DetailsPayload, draft: &ListingDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if payload.name.is_empty() {
        errors.require("name");
    }
    if payload.description.is_empty() {
        errors.require("description");
    }
    match &payload.state {
        None => errors.require("state"),
        Some(state) if !DISTRICTS.contains(&state.as_str()) => {
            errors.insert("state", "Unknown district")
        }
        _ => {}
    }
    if payload.category.is_none() {
        errors.require("category");
    }
    if payload.contact_number.is_empty() {
        errors.require("contact_number");
    } else if !is_valid_contact_number(&payload.contact_number) {
        errors.insert("contact_number", "Invalid phone number");
    }
    if payload.address.is_empty() {
        errors.insert("address", "Address is required");
    }
    if draft.primary_image.is_none() {
        errors.insert("primary_image", "Primary image is required");
    }
    if draft.secondary_images.is_empty() {
        errors.insert(
            "secondary_images",
            "At least one secondary image is required",
        );
    }

    errors
}
