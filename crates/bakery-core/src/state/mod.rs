//! State management for the cart and the session's order.
//!
//! This module provides the single authority over the persisted storefront
//! state: cart contents, the saved custom order, and the one-time order
//! processed flag.

pub mod order;

pub use order::{OrderStateError, OrderStateManager};
