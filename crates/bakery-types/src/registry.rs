//! Registry trait for self-registering implementations.
//!
//! Storage backends implement this trait to declare the name they are
//! referenced by in configuration and the factory that builds them.

/// Base trait for implementation registries.
///
/// Each backend module provides a `Registry` struct implementing this trait,
/// so the set of available backends can be enumerated without hard-coding
/// names at the call site.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This matches the key used in the TOML configuration, for example
	/// "memory" for `storage.session.implementations.memory`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
