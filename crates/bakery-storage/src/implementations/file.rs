//! File-based storage backend.
//!
//! Each key is stored as its own JSON file under a base directory. Writes go
//! to a temporary file first and are renamed into place, so a reader never
//! observes a half-written value.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use bakery_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use std::path::PathBuf;
use tokio::fs;

const FILE_EXTENSION: &str = "json";

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at `base_path`.
	///
	/// The directory is created lazily on the first write.
	pub fn new(base_path: impl Into<PathBuf>) -> Self {
		Self {
			base_path: base_path.into(),
		}
	}

	/// Converts a storage key to a filesystem-safe file path.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key: String = key
			.chars()
			.map(|c| {
				if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
					c
				} else {
					'_'
				}
			})
			.collect();
		self.base_path
			.join(format!("{}.{}", safe_key, FILE_EXTENSION))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		fs::try_exists(&path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if path.trim().is_empty() => {
							Err("storage_path cannot be empty".to_string())
						},
						_ => Ok(()),
					}
				}),
				Field::new("create_dirs", FieldType::Boolean),
			],
		);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/storage")
/// - `create_dirs`: Create the directory up front if it is missing (default: true).
///   When false, the directory must already exist.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = PathBuf::from(
		config
			.get("storage_path")
			.and_then(|v| v.as_str())
			.unwrap_or("./data/storage"),
	);
	let create_dirs = config
		.get("create_dirs")
		.and_then(|v| v.as_bool())
		.unwrap_or(true);

	if create_dirs {
		std::fs::create_dir_all(&storage_path).map_err(|e| {
			StorageError::Configuration(format!(
				"Cannot create storage directory {}: {}",
				storage_path.display(),
				e
			))
		})?;
	} else if !storage_path.is_dir() {
		return Err(StorageError::Configuration(format!(
			"Storage directory {} does not exist",
			storage_path.display()
		)));
	}

	Ok(Box::new(FileStorage::new(storage_path)))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_persists_across_instances() {
		let dir = TempDir::new().unwrap();

		let first = FileStorage::new(dir.path());
		first
			.set_bytes("sdb_cart_v1", br#"[{"id":"cookie-chip","qty":1}]"#.to_vec())
			.await
			.unwrap();

		let second = FileStorage::new(dir.path());
		let data = second.get_bytes("sdb_cart_v1").await.unwrap();
		assert_eq!(data, br#"[{"id":"cookie-chip","qty":1}]"#.to_vec());
	}

	#[tokio::test]
	async fn test_missing_key_is_not_found() {
		let dir = TempDir::new().unwrap();
		let storage = FileStorage::new(dir.path());

		assert!(matches!(
			storage.get_bytes("nothing").await,
			Err(StorageError::NotFound)
		));
		assert!(!storage.exists("nothing").await.unwrap());
		storage.delete("nothing").await.unwrap();
	}

	#[tokio::test]
	async fn test_key_sanitization() {
		let dir = TempDir::new().unwrap();
		let storage = FileStorage::new(dir.path());

		storage.set_bytes("../escape:key", b"1".to_vec()).await.unwrap();
		assert!(dir.path().join("___escape_key.json").exists());
		assert_eq!(storage.get_bytes("../escape:key").await.unwrap(), b"1".to_vec());
	}

	#[test]
	fn test_factory_creates_directory() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("durable");
		let config = toml::Value::Table(toml::map::Map::from_iter([(
			"storage_path".to_string(),
			toml::Value::String(path.to_string_lossy().into_owned()),
		)]));

		assert!(create_storage(&config).is_ok());
		assert!(path.is_dir());
	}

	#[test]
	fn test_factory_requires_existing_directory() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("missing");
		let config = toml::Value::Table(toml::map::Map::from_iter([
			(
				"storage_path".to_string(),
				toml::Value::String(path.to_string_lossy().into_owned()),
			),
			("create_dirs".to_string(), toml::Value::Boolean(false)),
		]));

		assert!(matches!(
			create_storage(&config),
			Err(StorageError::Configuration(_))
		));
	}
}
