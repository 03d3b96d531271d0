//! Data layer for the bikeshare explorer.
//!
//! Loads city trip sources, narrows them by month and weekday, computes the
//! statistic groups and pages through the raw rows.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod pager;
pub mod reader;

pub use bikeshare_core as core;
