//! Data types for the listing pipeline.

pub mod config;
pub mod listing;
pub mod opportunity;
