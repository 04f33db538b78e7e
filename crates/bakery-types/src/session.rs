//! Session order state machine.
//!
//! A browsing session may submit exactly one order. The state is a one-way
//! machine: `Unprocessed -> Processed`, with no transition back.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Whether the current session has already submitted its order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderSessionState {
	#[default]
	Unprocessed,
	Processed,
}

/// Outcome of an order submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderResult {
	/// The order was accepted and the session is now processed.
	Success,
	/// The session already submitted an order.
	AlreadyProcessed,
	/// Neither cart items nor a custom order were present.
	NothingToOrder,
}

impl OrderResult {
	/// Message shown to the customer for this outcome.
	pub fn message(&self) -> &'static str {
		match self {
			OrderResult::Success => "Order received! We will contact you to confirm details.",
			OrderResult::AlreadyProcessed => "Your order has already been processed. Thank you!",
			OrderResult::NothingToOrder => {
				"Your cart is empty. Add items or save a custom order first."
			},
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, OrderResult::Success)
	}
}

impl fmt::Display for OrderResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.message())
	}
}

impl OrderSessionState {
	/// Applies an order submission to the current state.
	///
	/// `has_items` is true when the cart has at least one line or a custom
	/// order is saved. Returns the next state and the submission outcome.
	pub fn submit(self, has_items: bool) -> (OrderSessionState, OrderResult) {
		match (self, has_items) {
			(OrderSessionState::Processed, _) => {
				(OrderSessionState::Processed, OrderResult::AlreadyProcessed)
			},
			(OrderSessionState::Unprocessed, false) => {
				(OrderSessionState::Unprocessed, OrderResult::NothingToOrder)
			},
			(OrderSessionState::Unprocessed, true) => {
				(OrderSessionState::Processed, OrderResult::Success)
			},
		}
	}

	pub fn is_processed(&self) -> bool {
		matches!(self, OrderSessionState::Processed)
	}
}

// Stored as the marker `1` when processed. Anything else read back, including
// the legacy string "0" or garbage, means the session has not ordered yet.
impl Serialize for OrderSessionState {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u8(u8::from(self.is_processed()))
	}
}

impl<'de> Deserialize<'de> for OrderSessionState {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = serde_json::Value::deserialize(deserializer)?;
		let processed = match &value {
			serde_json::Value::Number(n) => n.as_u64() == Some(1),
			serde_json::Value::String(s) => s == "1",
			_ => false,
		};
		Ok(if processed {
			OrderSessionState::Processed
		} else {
			OrderSessionState::Unprocessed
		})
	}
}
