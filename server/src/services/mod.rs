pub mod auth;
pub mod shipment;
pub mod token;
