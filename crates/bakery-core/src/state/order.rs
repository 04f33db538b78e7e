//! Order state manager implementation.
//!
//! Owns the three persisted entities and the order submission transition.
//! Reads never fail: stored data that is missing or cannot be decoded is
//! replaced by the entity's default. Writes are persisted immediately.

use crate::catalog::Catalog;
use crate::summary::CartSummary;
use bakery_storage::ScopedStorage;
use bakery_types::{
	truncate_id, Cart, CartLine, CustomOrder, CustomOrderError, OrderResult, OrderSessionState,
	StorageKey, StorageScope,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	/// The backend could not persist a change.
	#[error("Storage error: {0}")]
	Storage(String),
	/// A custom order submission was rejected.
	#[error(transparent)]
	Validation(#[from] CustomOrderError),
}

/// Manages cart, custom order and session order state.
pub struct OrderStateManager {
	storage: Arc<ScopedStorage>,
	/// Serializes read-modify-write sequences.
	write_lock: Mutex<()>,
}

impl OrderStateManager {
	pub fn new(storage: Arc<ScopedStorage>) -> Self {
		Self {
			storage,
			write_lock: Mutex::new(()),
		}
	}

	async fn load<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
		self.storage.for_key(key).retrieve_or_default(key).await
	}

	async fn persist<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<(), OrderStateError> {
		self.storage
			.for_key(key)
			.store(key, value)
			.await
			.map_err(|e| OrderStateError::Storage(e.to_string()))
	}

	async fn discard(&self, key: StorageKey) -> Result<(), OrderStateError> {
		self.storage
			.for_key(key)
			.remove(key)
			.await
			.map_err(|e| OrderStateError::Storage(e.to_string()))
	}

	/// Returns the current cart. Empty if nothing usable is stored.
	pub async fn get_cart(&self) -> Cart {
		self.load(StorageKey::Cart).await
	}

	/// Adds one unit of `product_id` to the cart and returns the updated line.
	///
	/// The id is not checked against the catalog.
	pub async fn add_item(&self, product_id: &str) -> Result<CartLine, OrderStateError> {
		let _guard = self.write_lock.lock().await;

		let mut cart = self.get_cart().await;
		let line = cart.add(product_id).clone();
		self.persist(StorageKey::Cart, &cart).await?;

		tracing::info!(
			product_id = %truncate_id(product_id),
			quantity = line.quantity.get(),
			"Added to cart"
		);
		Ok(line)
	}

	/// Removes the line for `product_id`. Absent products are ignored.
	pub async fn remove_item(&self, product_id: &str) -> Result<(), OrderStateError> {
		let _guard = self.write_lock.lock().await;

		let mut cart = self.get_cart().await;
		let removed = cart.remove(product_id);
		self.persist(StorageKey::Cart, &cart).await?;

		tracing::info!(product_id = %truncate_id(product_id), removed, "Removed from cart");
		Ok(())
	}

	/// Empties the cart.
	pub async fn clear_cart(&self) -> Result<(), OrderStateError> {
		let _guard = self.write_lock.lock().await;

		self.persist(StorageKey::Cart, &Cart::new()).await?;
		tracing::info!("Cleared cart");
		Ok(())
	}

	/// Validates and saves a custom order, replacing any previous one.
	///
	/// Rejected submissions leave the stored order untouched.
	pub async fn save_custom_order(
		&self,
		fields: &BTreeMap<String, String>,
	) -> Result<CustomOrder, OrderStateError> {
		let order = match CustomOrder::from_fields(fields) {
			Ok(order) => order,
			Err(e) => {
				tracing::info!(error = %e, "Rejected custom order");
				return Err(e.into());
			},
		};

		let _guard = self.write_lock.lock().await;
		self.persist(StorageKey::CustomOrder, &order).await?;

		tracing::info!(size = %order.size, flavor = %order.flavor, "Saved custom order");
		Ok(order)
	}

	/// Returns the saved custom order, if a complete one is stored.
	pub async fn get_custom_order(&self) -> Option<CustomOrder> {
		self.storage
			.for_key(StorageKey::CustomOrder)
			.retrieve_opt(StorageKey::CustomOrder)
			.await
	}

	/// Returns the session's order state.
	pub async fn session_state(&self) -> OrderSessionState {
		self.load(StorageKey::OrderProcessed).await
	}

	/// Whether this session has already submitted its order.
	pub async fn is_order_processed(&self) -> bool {
		self.session_state().await.is_processed()
	}

	/// Submits the session's order.
	///
	/// Rejections leave all state unchanged. A submission that fails to
	/// persist is rolled back, so the session stays unprocessed and can be
	/// submitted again.
	pub async fn submit_order(&self) -> Result<OrderResult, OrderStateError> {
		let _guard = self.write_lock.lock().await;

		let state = self.session_state().await;
		let has_items = match state {
			OrderSessionState::Processed => false,
			OrderSessionState::Unprocessed => {
				!self.get_cart().await.is_empty() || self.get_custom_order().await.is_some()
			},
		};

		let (next, result) = state.submit(has_items);
		if next != state {
			self.commit_submission(state, next).await?;
		}

		match result {
			OrderResult::Success => tracing::info!("Order submitted"),
			_ => tracing::info!(result = ?result, "Order submission rejected"),
		}
		Ok(result)
	}

	/// Clears the cart, marks the session as `next` and forgets the custom
	/// order, in that order. On failure the earlier steps are undone.
	async fn commit_submission(
		&self,
		previous: OrderSessionState,
		next: OrderSessionState,
	) -> Result<(), OrderStateError> {
		let cart = self.get_cart().await;
		self.persist(StorageKey::Cart, &Cart::new()).await?;

		if let Err(e) = self.persist(StorageKey::OrderProcessed, &next).await {
			tracing::warn!(error = %e, "Order submission failed, restoring cart");
			self.restore_cart(&cart).await;
			return Err(e);
		}

		if let Err(e) = self.discard(StorageKey::CustomOrder).await {
			tracing::warn!(error = %e, "Order submission failed, restoring session");
			if let Err(rollback) = self.persist(StorageKey::OrderProcessed, &previous).await {
				tracing::error!(error = %rollback, "Failed to restore order state");
			}
			self.restore_cart(&cart).await;
			return Err(e);
		}

		Ok(())
	}

	async fn restore_cart(&self, cart: &Cart) {
		if let Err(e) = self.persist(StorageKey::Cart, cart).await {
			tracing::error!(error = %e, lines = cart.len(), "Failed to restore cart");
		}
	}

	/// Total number of units in the cart.
	pub async fn cart_item_count(&self) -> u32 {
		self.get_cart().await.item_count()
	}

	/// Resolves the cart against `catalog` into priced lines and a total.
	pub async fn cart_summary(&self, catalog: &Catalog) -> CartSummary {
		CartSummary::resolve(&self.get_cart().await, catalog)
	}

	/// Ends the browsing session.
	///
	/// Clears the session scope, which forgets the custom order and re-arms
	/// order submission for the next session. The cart is kept.
	pub async fn end_session(&self) -> Result<(), OrderStateError> {
		let _guard = self.write_lock.lock().await;

		let removed = self
			.storage
			.clear_scope(StorageScope::Session)
			.await
			.map_err(|e| OrderStateError::Storage(e.to_string()))?;

		tracing::info!(removed, "Ended session");
		Ok(())
	}
}
