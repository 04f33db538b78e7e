//! Configuration module for the bakery storefront.
//!
//! Configuration is read from a TOML file. `${VAR}` and `${VAR:-default}`
//! references are replaced with environment variable values before parsing,
//! and the parsed configuration is validated before it is handed out.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the storefront.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Store identity and presentation.
	#[serde(default)]
	pub store: StoreConfig,
	/// Storage backends for the durable and session scopes.
	#[serde(default)]
	pub storage: StorageConfig,
}

/// Store identity and presentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
	/// Name shown in command output.
	#[serde(default = "default_store_name")]
	pub name: String,
	/// Currency code prices are quoted in. Only "USD" is supported.
	#[serde(default = "default_currency")]
	pub currency: String,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			name: default_store_name(),
			currency: default_currency(),
		}
	}
}

fn default_store_name() -> String {
	"Sweet Dreams Bakery".to_string()
}

fn default_currency() -> String {
	"USD".to_string()
}

/// Storage configuration, one section per scope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Storage that survives across sessions (holds the cart).
	#[serde(default = "default_durable_scope")]
	pub durable: ScopeConfig,
	/// Storage cleared when the session ends (custom order, processed flag).
	#[serde(default = "default_session_scope")]
	pub session: ScopeConfig,
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self {
			durable: default_durable_scope(),
			session: default_session_scope(),
		}
	}
}

/// Backend selection for a single storage scope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScopeConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

impl ScopeConfig {
	/// Returns the configuration table of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}

	/// Directory used by the file backend, if this scope selects it.
	///
	/// The path is normalized so that spellings of the same directory compare
	/// equal.
	pub fn file_storage_path(&self) -> Option<PathBuf> {
		if self.primary != "file" {
			return None;
		}
		let raw = self
			.primary_config()
			.and_then(|v| v.get("storage_path"))
			.and_then(|v| v.as_str())
			.unwrap_or(DEFAULT_FILE_STORAGE_PATH);

		let path = Path::new(raw);
		if let Ok(canonical) = std::fs::canonicalize(path) {
			return Some(canonical);
		}
		Some(
			path.components()
				.filter(|c| !matches!(c, Component::CurDir))
				.collect(),
		)
	}

	fn file(storage_path: &str) -> Self {
		let mut table = toml::map::Map::new();
		table.insert(
			"storage_path".to_string(),
			toml::Value::String(storage_path.to_string()),
		);
		Self {
			primary: "file".to_string(),
			implementations: HashMap::from([("file".to_string(), toml::Value::Table(table))]),
		}
	}

	fn validate(&self, scope: &str) -> Result<(), ConfigError> {
		if self.primary.is_empty() {
			return Err(ConfigError::Validation(format!(
				"Storage {} primary implementation cannot be empty",
				scope
			)));
		}
		if !self.implementations.contains_key(&self.primary) {
			return Err(ConfigError::Validation(format!(
				"Primary {} storage '{}' not found in implementations",
				scope, self.primary
			)));
		}
		Ok(())
	}
}

/// Directory the file backend falls back to when `storage_path` is unset.
const DEFAULT_FILE_STORAGE_PATH: &str = "./data/storage";

fn default_durable_scope() -> ScopeConfig {
	ScopeConfig::file("./data/durable")
}

fn default_session_scope() -> ScopeConfig {
	ScopeConfig::file("./data/session")
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to keep the regex scan bounded
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Validates the configuration.
	///
	/// - Store name must not be empty
	/// - Currency must be USD
	/// - Each storage scope must name a configured primary implementation
	/// - File-backed scopes must use different directories
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.store.name.trim().is_empty() {
			return Err(ConfigError::Validation("Store name cannot be empty".into()));
		}
		if !self.store.currency.eq_ignore_ascii_case("USD") {
			return Err(ConfigError::Validation(format!(
				"Unsupported currency '{}': only USD is supported",
				self.store.currency
			)));
		}

		self.storage.durable.validate("durable")?;
		self.storage.session.validate("session")?;

		if let (Some(durable), Some(session)) = (
			self.storage.durable.file_storage_path(),
			self.storage.session.file_storage_path(),
		) {
			if durable == session {
				return Err(ConfigError::Validation(format!(
					"Durable and session storage cannot share the directory {}",
					durable.display()
				)));
			}
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("BAKERY_TEST_HOST", "localhost");
		std::env::set_var("BAKERY_TEST_PORT", "5432");

		let input = "host = \"${BAKERY_TEST_HOST}:${BAKERY_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("BAKERY_TEST_HOST");
		std::env::remove_var("BAKERY_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${BAKERY_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${BAKERY_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("BAKERY_MISSING_VAR"));
	}

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config.store.name, "Sweet Dreams Bakery");
		assert_eq!(config.storage.durable.primary, "file");
		assert_eq!(
			config
				.storage
				.session
				.primary_config()
				.and_then(|v| v.get("storage_path"))
				.and_then(|v| v.as_str()),
			Some("./data/session")
		);
	}

	#[test]
	fn test_full_config() {
		let config_str = r#"
[store]
name = "Corner Bakery"

[storage.durable]
primary = "file"
[storage.durable.implementations.file]
storage_path = "${BAKERY_TEST_DATA:-/var/lib/bakery}/durable"

[storage.session]
primary = "memory"
[storage.session.implementations.memory]
"#;

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.store.name, "Corner Bakery");
		assert_eq!(config.store.currency, "USD");
		assert_eq!(config.storage.session.primary, "memory");
		assert_eq!(
			config.storage.durable.primary_config().unwrap()["storage_path"].as_str(),
			Some("/var/lib/bakery/durable")
		);
	}

	#[test]
	fn test_primary_must_be_configured() {
		let config_str = r#"
[storage.session]
primary = "memory"
[storage.session.implementations.file]
storage_path = "./data"
"#;

		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Primary session storage 'memory'"));
	}

	#[test]
	fn test_rejects_shared_storage_directory() {
		let config_str = r#"
[storage.durable]
primary = "file"
[storage.durable.implementations.file]
storage_path = "./state/"

[storage.session]
primary = "file"
[storage.session.implementations.file]
storage_path = "state"
"#;

		let err = config_str.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
		assert!(err.to_string().contains("cannot share"));
	}

	#[test]
	fn test_rejects_shared_default_directory() {
		let config_str = r#"
[storage.durable]
primary = "file"
[storage.durable.implementations.file]

[storage.session]
primary = "file"
[storage.session.implementations.file]
"#;

		assert!(config_str.parse::<Config>().is_err());
	}

	#[test]
	fn test_rejects_same_existing_directory() {
		let temp_dir = TempDir::new().unwrap();
		let dir = temp_dir.path().to_string_lossy().into_owned();
		let config_str = format!(
			r#"
[storage.durable]
primary = "file"
[storage.durable.implementations.file]
storage_path = "{dir}"

[storage.session]
primary = "file"
[storage.session.implementations.file]
storage_path = "{dir}/."
"#
		);

		assert!(config_str.parse::<Config>().is_err());
	}

	#[test]
	fn test_rejects_other_currency() {
		let err = "[store]\ncurrency = \"EUR\"".parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[tokio::test]
	async fn test_from_file() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("bakery.toml");
		std::fs::write(&path, "[store]\nname = \"File Bakery\"\n").unwrap();

		let config = Config::from_file(&path).await.unwrap();
		assert_eq!(config.store.name, "File Bakery");
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let temp_dir = TempDir::new().unwrap();
		let result = Config::from_file(temp_dir.path().join("missing.toml")).await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
