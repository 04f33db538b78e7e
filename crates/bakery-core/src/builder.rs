//! Builder for assembling a storefront from configuration.
//!
//! Storage backends are created through factory functions keyed by the
//! implementation name used in the configuration, one backend per scope.

use crate::catalog::CATALOG;
use crate::state::OrderStateManager;
use crate::Storefront;
use bakery_config::{Config, ScopeConfig};
use bakery_storage::{ScopedStorage, StorageError, StorageInterface, StorageService};
use bakery_types::StorageScope;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during storefront construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for constructing a [`Storefront`] with pluggable storage.
pub struct StoreBuilder {
	config: Config,
}

impl StoreBuilder {
	/// Creates a new StoreBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the storefront using the given storage factories.
	pub fn build<SF>(self, storage_factories: &HashMap<String, SF>) -> Result<Storefront, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let durable = build_scope(
			StorageScope::Durable,
			&self.config.storage.durable,
			storage_factories,
		)?;
		let session = build_scope(
			StorageScope::Session,
			&self.config.storage.session,
			storage_factories,
		)?;

		let storage = Arc::new(ScopedStorage::new(durable, session));
		let orders = Arc::new(OrderStateManager::new(storage));

		Ok(Storefront {
			config: self.config,
			orders,
			catalog: &CATALOG,
		})
	}
}

fn build_scope<SF>(
	scope: StorageScope,
	config: &ScopeConfig,
	factories: &HashMap<String, SF>,
) -> Result<StorageService, BuilderError>
where
	SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
{
	let name = &config.primary;
	let factory = factories.get(name).ok_or_else(|| {
		BuilderError::MissingComponent(format!(
			"No storage implementation named '{}' for the {} scope",
			name,
			scope.as_str()
		))
	})?;
	let implementation_config = config.primary_config().ok_or_else(|| {
		BuilderError::Config(format!(
			"Primary {} storage '{}' has no configuration",
			scope.as_str(),
			name
		))
	})?;

	match factory(implementation_config) {
		Ok(backend) => {
			tracing::info!(component = "storage", scope = scope.as_str(), implementation = %name, "Loaded");
			Ok(StorageService::new(backend))
		},
		Err(e) => {
			tracing::error!(
				component = "storage",
				scope = scope.as_str(),
				implementation = %name,
				error = %e,
				"Failed to create storage implementation"
			);
			Err(BuilderError::Config(format!(
				"Failed to create {} storage implementation '{}': {}",
				scope.as_str(),
				name,
				e
			)))
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bakery_storage::{get_all_implementations, StorageFactory};
	use tempfile::TempDir;

	fn factories() -> HashMap<String, StorageFactory> {
		get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect()
	}

	#[tokio::test]
	async fn test_build_from_config() {
		let dir = TempDir::new().unwrap();
		let config: Config = format!(
			r#"
[storage.durable]
primary = "file"
[storage.durable.implementations.file]
storage_path = "{}"

[storage.session]
primary = "memory"
[storage.session.implementations.memory]
"#,
			dir.path().join("durable").display()
		)
		.parse()
		.unwrap();

		let store = StoreBuilder::new(config).build(&factories()).unwrap();
		store.orders().add_item("cookie-chip").await.unwrap();

		assert!(dir.path().join("durable").join("sdb_cart_v1.json").exists());
	}

	#[test]
	fn test_unknown_implementation() {
		let config: Config = r#"
[storage.durable]
primary = "memory"
[storage.durable.implementations.memory]

[storage.session]
primary = "redis"
[storage.session.implementations.redis]
url = "redis://localhost"
"#
		.parse()
		.unwrap();

		let result = StoreBuilder::new(config).build(&factories());
		assert!(matches!(result, Err(BuilderError::MissingComponent(_))));
	}

	#[test]
	fn test_invalid_backend_config() {
		let config: Config = r#"
[storage.durable]
primary = "memory"
[storage.durable.implementations.memory]

[storage.session]
primary = "memory"
[storage.session.implementations.memory]
storage_path = "./data"
"#
		.parse()
		.unwrap();

		let result = StoreBuilder::new(config).build(&factories());
		assert!(matches!(result, Err(BuilderError::Config(_))));
	}
}
