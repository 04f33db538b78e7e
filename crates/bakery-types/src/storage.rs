//! Storage-related types for the storefront.

use std::str::FromStr;

/// Lifetime of a storage area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
	/// Survives across sessions.
	Durable,
	/// Cleared when the browsing session ends.
	Session,
}

impl StorageScope {
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageScope::Durable => "durable",
			StorageScope::Session => "session",
		}
	}
}

/// Storage keys for the persisted storefront entities.
///
/// Each key lives in exactly one scope. The key names match the ones used by
/// earlier versions of the storefront so previously stored data is picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// The shopping cart.
	Cart,
	/// The saved custom order payload.
	CustomOrder,
	/// The one-time order processed marker.
	OrderProcessed,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Cart => "sdb_cart_v1",
			StorageKey::CustomOrder => "sdb_custom_order_v1",
			StorageKey::OrderProcessed => "sdb_order_processed_v1",
		}
	}

	/// Returns the scope the key is stored in.
	pub fn scope(&self) -> StorageScope {
		match self {
			StorageKey::Cart => StorageScope::Durable,
			StorageKey::CustomOrder | StorageKey::OrderProcessed => StorageScope::Session,
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Cart, Self::CustomOrder, Self::OrderProcessed].into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all().find(|key| key.as_str() == s).ok_or(())
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_scopes() {
		assert_eq!(StorageKey::Cart.scope(), StorageScope::Durable);
		assert_eq!(StorageKey::CustomOrder.scope(), StorageScope::Session);
		assert_eq!(StorageKey::OrderProcessed.scope(), StorageScope::Session);
	}

	#[test]
	fn test_parse_round_trip() {
		for key in StorageKey::all() {
			assert_eq!(key.as_str().parse::<StorageKey>(), Ok(key));
		}
		assert!("orders".parse::<StorageKey>().is_err());
	}
}
