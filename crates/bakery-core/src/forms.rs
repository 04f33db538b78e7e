//! Newsletter subscription and feedback form validation.
//!
//! Neither form stores or sends anything; a valid submission is only
//! acknowledged.

use thiserror::Error;

pub const SUBSCRIBE_SUCCESS: &str = "Thanks! You're subscribed.";
pub const FEEDBACK_SUCCESS: &str = "Thanks for your feedback!";

/// Validation failures for the contact forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
	#[error("Please enter a valid email address.")]
	InvalidEmail,
	#[error("Please complete all fields with a valid email.")]
	IncompleteFeedback,
}

/// An accepted newsletter subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
	pub email: String,
}

/// An accepted feedback message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
	pub name: String,
	pub email: String,
	pub message: String,
}

fn looks_like_email(email: &str) -> bool {
	!email.is_empty() && email.contains('@')
}

/// Validates a newsletter subscription.
pub fn validate_subscribe(email: &str) -> Result<Subscription, FormError> {
	let email = email.trim();
	if !looks_like_email(email) {
		return Err(FormError::InvalidEmail);
	}

	tracing::debug!("Accepted subscription");
	Ok(Subscription {
		email: email.to_string(),
	})
}

/// Validates a feedback submission. All fields are trimmed first.
pub fn validate_feedback(name: &str, email: &str, message: &str) -> Result<Feedback, FormError> {
	let (name, email, message) = (name.trim(), email.trim(), message.trim());
	if name.is_empty() || !looks_like_email(email) || message.is_empty() {
		return Err(FormError::IncompleteFeedback);
	}

	tracing::debug!("Accepted feedback");
	Ok(Feedback {
		name: name.to_string(),
		email: email.to_string(),
		message: message.to_string(),
	})
}
