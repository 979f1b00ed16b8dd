pub mod availability_service;
pub mod image_service;
pub mod listing_service;
pub mod pricing_service;
pub mod sub_entity_service;
