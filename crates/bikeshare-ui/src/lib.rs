//! Plain-text presentation layer for the bikeshare explorer.
//!
//! Renders exploration reports as titled sections and raw trip rows as
//! aligned, paginated tables.

pub mod report_view;
pub mod table_view;

pub use bikeshare_core as core;
