//! # Shotlog Common Library
//!
//! Shared code for the shotlog espresso journal:
//! - Domain models (beans, shots, grinder/basket configurations, recommendations)
//! - Field validation primitives
//! - Brew math (ratios, extraction windows, grind adjustments)
//! - Error taxonomy
//! - Change-event bus feeding live query streams
//! - Database initialization and storage-location resolution

pub mod brew;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use validate::Validity;
