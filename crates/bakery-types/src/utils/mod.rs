//! Utility functions for display formatting.

pub mod formatting;

pub use formatting::{format_usd, truncate_id};
