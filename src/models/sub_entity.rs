use serde::{Deserialize, Serialize};

/// Facilities selectable for apartments and hotel rooms.
pub const FACILITIES: &[&str] = &[
    "parking",
    "elevator",
    "gym",
    "pool",
    "sofa",
    "towels",
    "toilet",
    "sink",
    "hairdryer",
    "kitchen",
    "kitchen equipments",
    "living area",
    "free wifi",
    "tv",
    "air conditioning",
    "heating",
    "shower",
    "bathtub",
    "bidet",
    "washing machine",
];

pub const ROOM_FACILITIES: &[&str] = &["private bathroom", "air conditioning", "heating"];

pub const MEAL_CATEGORIES: &[&str] = &["Breakfast", "Lunch", "Dinner"];

/// An already-booked date range on an apartment or hotel room, kept so
/// owners can block out days sold through other channels. Dates are
/// calendar days in `YYYY-MM-DD` form.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct BookedRange {
    pub from_date: String,
    pub to_date: String,
}

/// A room inside an apartment. Rooms have no documents of their own;
/// they ride along in the apartment document.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ApartmentRoom {
    pub room_name: String,
    pub single_beds: u32,
    pub double_beds: u32,
    pub persons: u32,
    pub room_facilities: Vec<String>,
}

/// An apartment under a hotel listing, stored in the `apartments`
/// subcollection. Every apartment has at least one room.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Apartment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub apartment_name: String,
    pub description: String,
    pub price: f64,
    pub bathrooms: u32,
    pub checkin_time: String,
    pub checkout_time: String,
    pub images: Vec<String>,
    pub facilities: Vec<String>,
    pub rooms: Vec<ApartmentRoom>,
    pub active: bool,
    #[serde(default)]
    pub booked_days: Vec<BookedRange>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Meal {
    pub meal_name: String,
    pub meal_type: String,
    pub price: f64,
    pub category: Vec<String>,
}

/// A bookable room under a hotel listing, stored in the `hotel-rooms`
/// subcollection. A room may offer zero meals.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HotelRoom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub room_name: String,
    pub description: String,
    pub price: f64,
    pub single_beds: u32,
    pub double_beds: u32,
    pub persons: u32,
    pub checkin_time: String,
    pub checkout_time: String,
    pub images: Vec<String>,
    pub facilities: Vec<String>,
    pub meals: Vec<Meal>,
    pub active: bool,
    #[serde(default)]
    pub booked_days: Vec<BookedRange>,
}
