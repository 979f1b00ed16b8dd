pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;
pub mod wizard;
