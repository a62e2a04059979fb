//! VenueSender - email booking requests to filtered music venues
//!
//! An interactive console tool for bands and bookers: load a venue list
//! from CSV (with an encrypted SQLite fallback), narrow it down through a
//! staged filter pipeline, compose a plain-text email, and send it to each
//! selected venue over SMTP.

pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod mailer;
pub mod models;
pub mod pipeline;
pub mod repository;
pub mod shell;

pub use error::{VenueError, VenueResult};
