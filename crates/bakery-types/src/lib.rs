//! Common types module for the bakery storefront.
//!
//! This module defines the core data types shared by the storage layer,
//! the order state manager and the command-line front end. Keeping them in
//! one crate lets every component agree on the stored data formats.

/// Cart line items and the cart collection.
pub mod cart;
/// Product reference data.
pub mod catalog;
/// Custom (special) order form payload and its field validation.
pub mod custom_order;
/// Registry trait for self-registering storage implementations.
pub mod registry;
/// Session order state machine and submission outcomes.
pub mod session;
/// Storage keys and the scope each one lives in.
pub mod storage;
/// Utility functions for display formatting.
pub mod utils;
/// Configuration validation types for backend configuration tables.
pub mod validation;

// Re-export all types for convenient access
pub use cart::*;
pub use catalog::*;
pub use custom_order::*;
pub use registry::*;
pub use session::*;
pub use storage::*;
pub use utils::{format_usd, truncate_id};
pub use validation::*;
