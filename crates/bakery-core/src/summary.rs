//! Priced view of the cart.

use crate::catalog::Catalog;
use bakery_types::{format_usd, Cart, Product};
use rust_decimal::Decimal;

/// A cart line resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
	pub product: Product,
	pub quantity: u32,
	pub line_total: Decimal,
}

/// The cart with prices attached.
///
/// Lines whose product id is not in the catalog are left out of both the
/// lines and the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
	pub lines: Vec<SummaryLine>,
	pub total: Decimal,
	/// Ids of cart lines that did not resolve.
	pub unknown: Vec<String>,
}

impl CartSummary {
	pub fn resolve(cart: &Cart, catalog: &Catalog) -> Self {
		let mut lines = Vec::with_capacity(cart.len());
		let mut unknown = Vec::new();
		let mut total = Decimal::ZERO;

		for line in cart.lines() {
			let Some(product) = catalog.find(&line.product_id) else {
				tracing::debug!(product_id = %line.product_id, "Skipping unknown product in cart");
				unknown.push(line.product_id.clone());
				continue;
			};

			let quantity = line.quantity.get();
			let line_total = product.line_total(quantity);
			total += line_total;
			lines.push(SummaryLine {
				product: product.clone(),
				quantity,
				line_total,
			});
		}

		Self {
			lines,
			total,
			unknown,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// The total formatted for display.
	pub fn formatted_total(&self) -> String {
		format_usd(self.total)
	}
}
