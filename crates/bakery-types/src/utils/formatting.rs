//! String formatting utilities.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as US dollars with two decimal places, e.g. `$3.50`.
///
/// Rounds half away from zero; negative amounts are rendered as `-$1.25`.
pub fn format_usd(amount: Decimal) -> String {
	let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
	if rounded.is_sign_negative() && !rounded.is_zero() {
		format!("-${:.2}", rounded.abs())
	} else {
		format!("${:.2}", rounded.abs())
	}
}

/// Truncates a string for log output.
///
/// Shows only the first 16 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(16) {
		Some((idx, _)) => format!("{}..", &id[..idx]),
		None => id.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_usd() {
		assert_eq!(format_usd(Decimal::new(35, 1)), "$3.50");
		assert_eq!(format_usd(Decimal::new(5, 0)), "$5.00");
		assert_eq!(format_usd(Decimal::new(1125, 2)), "$11.25");
		assert_eq!(format_usd(Decimal::new(12345, 3)), "$12.35");
		assert_eq!(format_usd(Decimal::ZERO), "$0.00");
		assert_eq!(format_usd(Decimal::new(-125, 2)), "-$1.25");
	}

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("cookie-chip"), "cookie-chip");
		assert_eq!(
			truncate_id("a-very-long-product-identifier"),
			"a-very-long-prod.."
		);
	}
}
