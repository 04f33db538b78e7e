//! Core storefront logic for the bakery.
//!
//! This crate ties the storage substrate to the order state manager and
//! provides the catalog, priced cart summaries and the contact form checks
//! used by the front end.

pub mod builder;
pub mod catalog;
pub mod forms;
pub mod state;
pub mod summary;

pub use builder::{BuilderError, StoreBuilder};
pub use catalog::{Catalog, CATALOG};
pub use state::{OrderStateError, OrderStateManager};
pub use summary::{CartSummary, SummaryLine};

use bakery_config::Config;
use std::sync::Arc;

/// A fully wired storefront.
pub struct Storefront {
	config: Config,
	orders: Arc<OrderStateManager>,
	catalog: &'static Catalog,
}

impl Storefront {
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// The order state manager.
	pub fn orders(&self) -> &Arc<OrderStateManager> {
		&self.orders
	}

	pub fn catalog(&self) -> &'static Catalog {
		self.catalog
	}

	/// Resolves the current cart against the catalog.
	pub async fn cart_summary(&self) -> CartSummary {
		self.orders.cart_summary(self.catalog).await
	}
}
