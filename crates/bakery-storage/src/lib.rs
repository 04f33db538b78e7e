//! Storage module for the bakery storefront.
//!
//! This module provides the key-value substrate the order state lives in. It
//! mirrors the two storage areas a browser offers: a durable area that
//! survives across sessions and a session area that is cleared when the
//! browsing session ends. Backends are pluggable (in-memory, file-based).

use async_trait::async_trait;
use bakery_types::{ConfigSchema, ImplementationRegistry, StorageKey, StorageScope};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// Backends store opaque bytes under string keys. Typed access and the
/// decode-or-default policy live in [`StorageService`].
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key. Deleting a missing
	/// key is not an error.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level storage service that provides typed operations.
///
/// Values are stored as JSON text under the key's name.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	/// Stores a serializable value, overwriting any previous value.
	pub async fn store<T: Serialize>(&self, key: StorageKey, data: &T) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(key.as_str(), bytes).await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(&self, key: StorageKey) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(key.as_str()).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Retrieves a value, treating any failure as absence.
	///
	/// Missing keys, undecodable contents and backend read failures all yield
	/// `None`. Only the latter two are logged as warnings.
	pub async fn retrieve_opt<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
		match self.retrieve(key).await {
			Ok(value) => Some(value),
			Err(StorageError::NotFound) => {
				tracing::debug!(key = key.as_str(), "No stored value");
				None
			},
			Err(e) => {
				tracing::warn!(key = key.as_str(), error = %e, "Discarding unreadable stored value");
				None
			},
		}
	}

	/// Retrieves a value, falling back to the type's default on any failure.
	pub async fn retrieve_or_default<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
		self.retrieve_opt(key).await.unwrap_or_default()
	}

	/// Removes a value from storage.
	pub async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
		self.backend.delete(key.as_str()).await
	}

	/// Checks if a value exists in storage.
	pub async fn exists(&self, key: StorageKey) -> Result<bool, StorageError> {
		self.backend.exists(key.as_str()).await
	}

	/// Removes the given keys. Returns how many of them were present.
	///
	/// Only the named keys are touched, so a backend shared with other data
	/// keeps everything else.
	pub async fn clear(
		&self,
		keys: impl IntoIterator<Item = StorageKey>,
	) -> Result<usize, StorageError> {
		let mut removed = 0;
		for key in keys {
			if self.exists(key).await? {
				self.remove(key).await?;
				removed += 1;
			}
		}
		Ok(removed)
	}
}

/// The pair of storage areas the storefront state is spread across.
///
/// Each [`StorageKey`] is routed to the area matching its scope.
pub struct ScopedStorage {
	durable: StorageService,
	session: StorageService,
}

impl ScopedStorage {
	/// Creates scoped storage from a durable and a session service.
	pub fn new(durable: StorageService, session: StorageService) -> Self {
		Self { durable, session }
	}

	/// Creates scoped storage backed by two independent in-memory stores.
	pub fn in_memory() -> Self {
		use implementations::memory::MemoryStorage;

		Self::new(
			StorageService::new(Box::new(MemoryStorage::new())),
			StorageService::new(Box::new(MemoryStorage::new())),
		)
	}

	/// Returns the service for the given scope.
	pub fn scope(&self, scope: StorageScope) -> &StorageService {
		match scope {
			StorageScope::Durable => &self.durable,
			StorageScope::Session => &self.session,
		}
	}

	/// Returns the service holding `key`.
	pub fn for_key(&self, key: StorageKey) -> &StorageService {
		self.scope(key.scope())
	}

	/// Removes every key that belongs to `scope`.
	pub async fn clear_scope(&self, scope: StorageScope) -> Result<usize, StorageError> {
		let keys = StorageKey::all().filter(|key| key.scope() == scope);
		self.scope(scope).clear(keys).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bakery_types::{Cart, OrderSessionState};
	use implementations::memory::MemoryStorage;

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_store_and_retrieve() {
		let storage = service();
		let mut cart = Cart::new();
		cart.add("cookie-chip");

		storage.store(StorageKey::Cart, &cart).await.unwrap();
		let loaded: Cart = storage.retrieve(StorageKey::Cart).await.unwrap();
		assert_eq!(loaded, cart);
	}

	#[tokio::test]
	async fn test_retrieve_or_default_on_missing() {
		let storage = service();
		let cart: Cart = storage.retrieve_or_default(StorageKey::Cart).await;
		assert!(cart.is_empty());
	}

	#[tokio::test]
	async fn test_retrieve_or_default_on_garbage() {
		let backend = MemoryStorage::new();
		backend
			.set_bytes(StorageKey::Cart.as_str(), b"{not json".to_vec())
			.await
			.unwrap();
		let storage = StorageService::new(Box::new(backend));

		let result: Result<Cart, _> = storage.retrieve(StorageKey::Cart).await;
		assert!(matches!(result, Err(StorageError::Serialization(_))));

		let cart: Cart = storage.retrieve_or_default(StorageKey::Cart).await;
		assert!(cart.is_empty());
	}

	#[tokio::test]
	async fn test_scoped_routing() {
		let storage = ScopedStorage::in_memory();
		storage
			.for_key(StorageKey::OrderProcessed)
			.store(StorageKey::OrderProcessed, &OrderSessionState::Processed)
			.await
			.unwrap();

		assert!(storage
			.scope(StorageScope::Session)
			.exists(StorageKey::OrderProcessed)
			.await
			.unwrap());
		assert!(!storage
			.scope(StorageScope::Durable)
			.exists(StorageKey::OrderProcessed)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_clear_scope_leaves_other_keys() {
		let storage = ScopedStorage::in_memory();
		storage
			.for_key(StorageKey::Cart)
			.store(StorageKey::Cart, &Cart::new())
			.await
			.unwrap();
		storage
			.for_key(StorageKey::OrderProcessed)
			.store(StorageKey::OrderProcessed, &OrderSessionState::Processed)
			.await
			.unwrap();

		assert_eq!(storage.clear_scope(StorageScope::Session).await.unwrap(), 1);
		assert_eq!(storage.clear_scope(StorageScope::Session).await.unwrap(), 0);
		assert!(storage
			.for_key(StorageKey::Cart)
			.exists(StorageKey::Cart)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_clear_scope_on_shared_directory() {
		use implementations::file::FileStorage;

		let dir = tempfile::TempDir::new().unwrap();
		std::fs::write(dir.path().join("package.json"), "{}").unwrap();
		let storage = ScopedStorage::new(
			StorageService::new(Box::new(FileStorage::new(dir.path()))),
			StorageService::new(Box::new(FileStorage::new(dir.path()))),
		);
		let mut cart = Cart::new();
		cart.add("cookie-chip");
		storage
			.for_key(StorageKey::Cart)
			.store(StorageKey::Cart, &cart)
			.await
			.unwrap();
		storage
			.for_key(StorageKey::OrderProcessed)
			.store(StorageKey::OrderProcessed, &OrderSessionState::Processed)
			.await
			.unwrap();

		storage.clear_scope(StorageScope::Session).await.unwrap();

		assert!(dir.path().join("package.json").exists());
		let loaded: Cart = storage
			.for_key(StorageKey::Cart)
			.retrieve_or_default(StorageKey::Cart)
			.await;
		assert_eq!(loaded, cart);
		assert!(!storage
			.for_key(StorageKey::OrderProcessed)
			.exists(StorageKey::OrderProcessed)
			.await
			.unwrap());
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}
}
