//! Cart types.
//!
//! The cart is an ordered list of lines, one per product, kept in the order
//! products were first added. The serialized form uses the short `id`/`qty`
//! keys so carts written by earlier versions of the storefront still load.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// A single product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
	/// Identifier of the referenced product.
	#[serde(rename = "id")]
	pub product_id: String,
	/// Number of units. Always at least one.
	#[serde(rename = "qty")]
	pub quantity: NonZeroU32,
}

impl CartLine {
	/// Creates a line holding a single unit of `product_id`.
	pub fn new(product_id: impl Into<String>) -> Self {
		Self {
			product_id: product_id.into(),
			quantity: NonZeroU32::MIN,
		}
	}

	/// Creates a line with an explicit quantity.
	pub fn with_quantity(product_id: impl Into<String>, quantity: NonZeroU32) -> Self {
		Self {
			product_id: product_id.into(),
			quantity,
		}
	}
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
	lines: Vec<CartLine>,
}

impl Cart {
	/// Creates an empty cart.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the lines in insertion order.
	pub fn lines(&self) -> &[CartLine] {
		&self.lines
	}

	/// Returns the line for `product_id`, if any.
	pub fn get(&self, product_id: &str) -> Option<&CartLine> {
		self.lines.iter().find(|line| line.product_id == product_id)
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}

	/// Adds one unit of `product_id`.
	///
	/// Increments the existing line if the product is already in the cart,
	/// otherwise appends a new line. Returns the resulting line.
	pub fn add(&mut self, product_id: &str) -> &CartLine {
		let position = self
			.lines
			.iter()
			.position(|line| line.product_id == product_id);

		match position {
			Some(idx) => {
				let line = &mut self.lines[idx];
				line.quantity = line.quantity.saturating_add(1);
				&self.lines[idx]
			},
			None => {
				self.lines.push(CartLine::new(product_id));
				&self.lines[self.lines.len() - 1]
			},
		}
	}

	/// Removes the line for `product_id`. Returns whether a line was removed.
	pub fn remove(&mut self, product_id: &str) -> bool {
		let before = self.lines.len();
		self.lines.retain(|line| line.product_id != product_id);
		self.lines.len() != before
	}

	pub fn clear(&mut self) {
		self.lines.clear();
	}

	/// Total number of units across all lines.
	pub fn item_count(&self) -> u32 {
		self.lines
			.iter()
			.fold(0u32, |sum, line| sum.saturating_add(line.quantity.get()))
	}
}

impl From<Vec<CartLine>> for Cart {
	fn from(lines: Vec<CartLine>) -> Self {
		Self { lines }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn qty(n: u32) -> NonZeroU32 {
		NonZeroU32::new(n).unwrap()
	}

	#[test]
	fn test_add_same_product_increments() {
		let mut cart = Cart::new();
		cart.add("cupcake-vanilla");
		let line = cart.add("cupcake-vanilla");
		assert_eq!(line.quantity.get(), 2);
		assert_eq!(cart.len(), 1);
	}

	#[test]
	fn test_add_preserves_insertion_order() {
		let mut cart = Cart::new();
		cart.add("loaf-banana");
		cart.add("cookie-chip");
		cart.add("loaf-banana");

		let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
		assert_eq!(ids, vec!["loaf-banana", "cookie-chip"]);
	}

	#[test]
	fn test_remove_absent_is_noop() {
		let mut cart = Cart::from(vec![CartLine::with_quantity("cookie-chip", qty(2))]);
		assert!(!cart.remove("cake-redvelvet"));
		assert_eq!(cart.lines(), &[CartLine::with_quantity("cookie-chip", qty(2))]);
	}

	#[test]
	fn test_item_count() {
		let cart = Cart::from(vec![
			CartLine::with_quantity("cookie-chip", qty(2)),
			CartLine::with_quantity("loaf-banana", qty(3)),
		]);
		assert_eq!(cart.item_count(), 5);
	}

	#[test]
	fn test_legacy_wire_format() {
		let cart: Cart = serde_json::from_str(r#"[{"id":"cupcake-vanilla","qty":2}]"#).unwrap();
		assert_eq!(cart.get("cupcake-vanilla").unwrap().quantity.get(), 2);

		let json = serde_json::to_string(&cart).unwrap();
		assert_eq!(json, r#"[{"id":"cupcake-vanilla","qty":2}]"#);
	}

	#[test]
	fn test_zero_quantity_is_rejected() {
		let result: Result<Cart, _> = serde_json::from_str(r#"[{"id":"cookie-chip","qty":0}]"#);
		assert!(result.is_err());
	}
}
