//! Core data models for VenueSender

pub mod attribute;
pub mod venue;

pub use attribute::{distinct_values, AttributeValue, VenueAttribute};
pub use venue::{is_valid_email, Venue, VenueIdentity};
