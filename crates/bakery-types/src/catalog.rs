//! Product reference data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product offered by the store.
///
/// Products are immutable reference data; they are never persisted and
/// cart lines refer to them by `id` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	/// Stable identifier referenced by cart lines (e.g. "cupcake-vanilla").
	pub id: String,
	/// Display name.
	pub name: String,
	/// Unit price in dollars. Never negative.
	pub price: Decimal,
	/// Image shown on the product card.
	pub image_url: String,
	/// Alternative text for the image.
	pub alt_text: String,
}

impl Product {
	/// Creates a product from its parts.
	///
	/// Negative prices are clamped to zero.
	pub fn new(
		id: impl Into<String>,
		name: impl Into<String>,
		price: Decimal,
		image_url: impl Into<String>,
		alt_text: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			price: price.max(Decimal::ZERO),
			image_url: image_url.into(),
			alt_text: alt_text.into(),
		}
	}

	/// Returns the price of `quantity` units of this product.
	pub fn line_total(&self, quantity: u32) -> Decimal {
		self.price * Decimal::from(quantity)
	}
}
