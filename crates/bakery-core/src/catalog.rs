//! Product catalog.
//!
//! The storefront sells a fixed set of products. The catalog is static
//! reference data: it is looked up by id and filtered by name, never
//! persisted.

use bakery_types::Product;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

/// Global catalog instance
pub static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::default);

/// Number of products shown in the featured section.
pub const FEATURED_COUNT: usize = 3;

/// An ordered collection of products.
#[derive(Debug, Clone)]
pub struct Catalog {
	products: Vec<Product>,
}

impl Default for Catalog {
	fn default() -> Self {
		let picsum = |seed: &str| format!("https://picsum.photos/seed/{}/400/300", seed);

		Self::new(vec![
			Product::new(
				"cupcake-vanilla",
				"Vanilla Cupcake",
				Decimal::new(350, 2),
				picsum("cupcake1"),
				"Vanilla cupcake with frosting",
			),
			Product::new(
				"cupcake-chocolate",
				"Chocolate Cupcake",
				Decimal::new(375, 2),
				picsum("cupcake2"),
				"Chocolate cupcake with sprinkles",
			),
			Product::new(
				"cookie-chip",
				"Chocolate Chip Cookies (6)",
				Decimal::new(500, 2),
				picsum("cookie1"),
				"Plate of chocolate chip cookies",
			),
			Product::new(
				"cheesecake-mini",
				"Mini Cheesecake",
				Decimal::new(425, 2),
				picsum("cheesecake"),
				"Mini cheesecake with berries",
			),
			Product::new(
				"loaf-banana",
				"Banana Bread Loaf",
				Decimal::new(650, 2),
				picsum("bananabread"),
				"Banana bread loaf on wooden board",
			),
			Product::new(
				"cake-redvelvet",
				"Red Velvet Cake Slice",
				Decimal::new(400, 2),
				picsum("redvelvet"),
				"Red velvet cake slice",
			),
		])
	}
}

impl Catalog {
	pub fn new(products: Vec<Product>) -> Self {
		Self { products }
	}

	/// All products in catalog order.
	pub fn products(&self) -> &[Product] {
		&self.products
	}

	/// Looks up a product by id.
	pub fn find(&self, id: &str) -> Option<&Product> {
		self.products.iter().find(|p| p.id == id)
	}

	/// Products whose name contains `query`, ignoring case.
	///
	/// An empty query matches every product.
	pub fn search(&self, query: &str) -> Vec<&Product> {
		let query = query.trim().to_lowercase();
		self.products
			.iter()
			.filter(|p| p.name.to_lowercase().contains(&query))
			.collect()
	}

	/// The products shown in the featured section.
	pub fn featured(&self) -> &[Product] {
		&self.products[..self.products.len().min(FEATURED_COUNT)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_catalog_has_six_products() {
		assert_eq!(CATALOG.products().len(), 6);
	}

	#[test]
	fn test_find() {
		let product = CATALOG.find("loaf-banana").unwrap();
		assert_eq!(product.name, "Banana Bread Loaf");
		assert_eq!(product.price, Decimal::new(650, 2));
		assert!(CATALOG.find("baguette").is_none());
	}

	#[test]
	fn test_search_is_case_insensitive() {
		let ids: Vec<_> = CATALOG.search("CHOCOLATE").iter().map(|p| p.id.as_str()).collect();
		assert_eq!(ids, vec!["cupcake-chocolate", "cookie-chip"]);
	}

	#[test]
	fn test_empty_search_returns_all() {
		assert_eq!(CATALOG.search("").len(), 6);
		assert!(CATALOG.search("croissant").is_empty());
	}

	#[test]
	fn test_featured() {
		let ids: Vec<_> = CATALOG.featured().iter().map(|p| p.id.as_str()).collect();
		assert_eq!(ids, vec!["cupcake-vanilla", "cupcake-chocolate", "cookie-chip"]);

		let small = Catalog::new(CATALOG.products()[..1].to_vec());
		assert_eq!(small.featured().len(), 1);
	}
}
