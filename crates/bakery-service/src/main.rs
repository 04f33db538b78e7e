//! Main entry point for the bakery storefront.
//!
//! The `bakery` binary is the storefront's front end: it browses the
//! catalog, edits the cart and custom order, and submits the session's order.
//! State is kept in the storage backends named in the configuration.

use bakery_config::Config;
use bakery_core::{StoreBuilder, Storefront};
use bakery_storage::{get_all_implementations, StorageFactory};
use clap::Parser;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

mod commands;

use commands::Command;

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "bakery.toml";

/// Command-line arguments for the storefront.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, env = "BAKERY_CONFIG")]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = load_config(args.config.as_deref()).await?;
	tracing::info!("Loaded configuration [{}]", config.store.name);

	let store = build_store(config)?;

	let stdin = std::io::stdin();
	let mut confirm = |question: &str| -> std::io::Result<bool> {
		print!("{} [y/N] ", question);
		std::io::stdout().flush()?;
		let mut answer = String::new();
		stdin.lock().read_line(&mut answer)?;
		Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
	};

	let mut stdout = std::io::stdout().lock();
	commands::execute(args.command, &store, &mut stdout, &mut confirm).await?;
	Ok(())
}

/// Loads the configuration.
///
/// An explicitly given file must exist. Without one, `bakery.toml` in the
/// working directory is used when present, otherwise the built-in defaults.
async fn load_config(path: Option<&Path>) -> Result<Config, bakery_config::ConfigError> {
	match path {
		Some(path) => Config::from_file(path).await,
		None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
			Config::from_file(DEFAULT_CONFIG_FILE).await
		},
		None => {
			tracing::debug!("No configuration file, using defaults");
			Ok(Config::default())
		},
	}
}

/// Builds the storefront with every registered storage implementation.
fn build_store(config: Config) -> Result<Storefront, bakery_core::BuilderError> {
	let storage_factories: HashMap<String, StorageFactory> = get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect();

	StoreBuilder::new(config).build(&storage_factories)
}
