//! Shared domain types for the bikeshare explorer.
//!
//! Holds the error taxonomy, trip and city models, the fixed month / weekday
//! enumerations, statistics helpers, formatting and CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod selection;
pub mod settings;
pub mod stats;
pub mod time_utils;

pub use error::{BikeshareError, Result, StatError};
