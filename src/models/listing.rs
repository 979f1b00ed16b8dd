use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::CollectionPath;
use crate::models::payment::TransactionDetails;

/// Districts a listing can be placed in.
pub const DISTRICTS: &[&str] = &["Colombo", "Galle", "Kandy", "Jaffna", "Gampaha"];

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Hotel,
    Attraction,
}

impl ListingKind {
    pub fn collection_name(&self) -> &'static str {
        match self {
            ListingKind::Hotel => "listings-hotels",
            ListingKind::Attraction => "listings-attractions",
        }
    }

    pub fn collection(&self) -> CollectionPath {
        CollectionPath::top(self.collection_name())
    }

    pub fn sub_collection(&self, listing_id: &str, child: &str) -> CollectionPath {
        CollectionPath::sub(self.collection_name(), listing_id, child)
    }

    /// Hotels walk details, rooms & facilities, payment, review.
    /// Attractions only have details and review.
    pub fn total_steps(&self) -> u32 {
        match self {
            ListingKind::Hotel => 4,
            ListingKind::Attraction => 2,
        }
    }

    pub fn has_sub_entities(&self) -> bool {
        matches!(self, ListingKind::Hotel)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Draft,
    #[serde(rename = "In Review")]
    InReview,
    Active,
    Rejected,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    #[serde(rename = "Not Paid")]
    NotPaid,
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Luxury,
    #[serde(rename = "Mid Range")]
    MidRange,
    Budget,
}

/// The persisted shape of a hotel or attraction listing.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Listing {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub contact_number: String,
    pub website: Option<String>,
    pub address: String,
    pub state: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tags: Vec<String>,
    pub primary_image: String,
    pub secondary_images: Vec<String>,
    pub status: ListingStatus,
    /// High-water mark of wizard progress, used to resume an
    /// interrupted upload. 0 means the field was never written.
    #[serde(default)]
    pub step: u32,
    pub payment_status: PaymentStatus,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<TransactionDetails>,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
}
