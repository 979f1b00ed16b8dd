pub mod image;
pub mod listing;
pub mod payment;
pub mod sub_entity;

pub use image::{ImageSlot, LocalFile};
pub use listing::{Category, Listing, ListingKind, ListingStatus, PaymentStatus};
pub use payment::{PaymentMethod, Plan, TransactionDetails};
pub use sub_entity::{Apartment, ApartmentRoom, BookedRange, HotelRoom, Meal};
