//! # Dayflow Common Library
//!
//! Shared code for the Dayflow scheduling backend:
//! - Event record types and the storage row mapping
//! - Schedule analytics (energy alignment, focus blocks, work/life balance)
//! - Configuration file loading
//! - Decimal-hour time helpers

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{Event, EventRow};
