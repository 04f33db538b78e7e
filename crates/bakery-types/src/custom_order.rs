//! Custom order form payload.
//!
//! A custom order is a free-form special request captured from a form. All of
//! its fields are mandatory; the payload is only ever stored complete.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Fields recognized on the custom order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomOrderField {
	Size,
	Flavor,
	Frosting,
	PickupDate,
	Notes,
}

impl CustomOrderField {
	/// Returns the form field name, as used in submitted field maps and in
	/// the stored payload.
	pub fn as_str(&self) -> &'static str {
		match self {
			CustomOrderField::Size => "size",
			CustomOrderField::Flavor => "flavor",
			CustomOrderField::Frosting => "frosting",
			CustomOrderField::PickupDate => "pickupDate",
			CustomOrderField::Notes => "notes",
		}
	}

	/// Human readable label.
	pub fn label(&self) -> &'static str {
		match self {
			CustomOrderField::Size => "Size",
			CustomOrderField::Flavor => "Flavor",
			CustomOrderField::Frosting => "Frosting",
			CustomOrderField::PickupDate => "Pickup Date",
			CustomOrderField::Notes => "Notes",
		}
	}

	/// Returns an iterator over all fields in form order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Size,
			Self::Flavor,
			Self::Frosting,
			Self::PickupDate,
			Self::Notes,
		]
		.into_iter()
	}
}

impl fmt::Display for CustomOrderField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Validation failure for a custom order submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomOrderError {
	/// One or more recognized fields were missing or empty.
	#[error("Please complete all fields (missing: {})", join_fields(.missing))]
	Incomplete { missing: Vec<CustomOrderField> },
}

fn join_fields(fields: &[CustomOrderField]) -> String {
	fields
		.iter()
		.map(CustomOrderField::as_str)
		.collect::<Vec<_>>()
		.join(", ")
}

/// A complete custom order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrder {
	pub size: String,
	pub flavor: String,
	pub frosting: String,
	pub pickup_date: String,
	pub notes: String,
}

impl CustomOrder {
	/// Builds a custom order from submitted form fields.
	///
	/// Every recognized field must be present and non-empty; all offending
	/// fields are reported together. Keys that are not recognized fields are
	/// ignored.
	pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, CustomOrderError> {
		let mut missing = Vec::new();
		let mut take = |field: CustomOrderField| {
			match fields.get(field.as_str()).filter(|value| !value.is_empty()) {
				Some(value) => value.clone(),
				None => {
					missing.push(field);
					String::new()
				},
			}
		};

		let order = Self {
			size: take(CustomOrderField::Size),
			flavor: take(CustomOrderField::Flavor),
			frosting: take(CustomOrderField::Frosting),
			pickup_date: take(CustomOrderField::PickupDate),
			notes: take(CustomOrderField::Notes),
		};

		if !missing.is_empty() {
			return Err(CustomOrderError::Incomplete { missing });
		}
		Ok(order)
	}

	/// Returns the value of a single field.
	pub fn get(&self, field: CustomOrderField) -> &str {
		match field {
			CustomOrderField::Size => &self.size,
			CustomOrderField::Flavor => &self.flavor,
			CustomOrderField::Frosting => &self.frosting,
			CustomOrderField::PickupDate => &self.pickup_date,
			CustomOrderField::Notes => &self.notes,
		}
	}

	/// Converts the order back into a form field map, e.g. to prefill a form.
	pub fn to_fields(&self) -> BTreeMap<String, String> {
		CustomOrderField::all()
			.map(|field| (field.as_str().to_string(), self.get(field).to_string()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn complete_fields() -> BTreeMap<String, String> {
		[
			("size", "large"),
			("flavor", "vanilla"),
			("frosting", "buttercream"),
			("pickupDate", "2024-01-01"),
			("notes", "none"),
		]
		.into_iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
	}

	#[test]
	fn test_complete_fields_round_trip() {
		let fields = complete_fields();
		let order = CustomOrder::from_fields(&fields).unwrap();
		assert_eq!(order.pickup_date, "2024-01-01");
		assert_eq!(order.to_fields(), fields);
	}

	#[test]
	fn test_reports_every_missing_field() {
		let mut fields = complete_fields();
		fields.remove("flavor");
		fields.insert("notes".to_string(), String::new());

		let err = CustomOrder::from_fields(&fields).unwrap_err();
		assert_eq!(
			err,
			CustomOrderError::Incomplete {
				missing: vec![CustomOrderField::Flavor, CustomOrderField::Notes]
			}
		);
		assert!(err.to_string().contains("flavor, notes"));
	}

	#[test]
	fn test_no_fields_reports_all_missing() {
		let err = CustomOrder::from_fields(&BTreeMap::new()).unwrap_err();
		assert_eq!(
			err,
			CustomOrderError::Incomplete {
				missing: CustomOrderField::all().collect()
			}
		);
	}

	#[test]
	fn test_unknown_fields_are_ignored() {
		let mut fields = complete_fields();
		fields.insert("coupon".to_string(), "FREE".to_string());
		assert!(CustomOrder::from_fields(&fields).is_ok());
	}

	#[test]
	fn test_stored_format_uses_form_names() {
		let order = CustomOrder::from_fields(&complete_fields()).unwrap();
		let value = serde_json::to_value(&order).unwrap();
		assert_eq!(value["pickupDate"], "2024-01-01");
	}
}
