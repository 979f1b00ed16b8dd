pub mod controller;
pub mod draft;
pub mod panels;
pub mod validation;

pub use controller::{WizardController, WizardState};
pub use draft::{DetailsPayload, DraftEdit, ImageField, ListingDraft};
pub use panels::{DetailsPanel, PaymentPanel};
