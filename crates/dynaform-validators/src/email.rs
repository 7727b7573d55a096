//! Email address validator

use crate::{ValidationError, ValidationResult, Validator};
use regex::Regex;
use std::sync::LazyLock;

// Local part, "@", then dot-separated domain labels ending in an alphabetic TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Validates that a string is a well-formed email address.
///
/// # Examples
///
/// ```
/// use dynaform_validators::{EmailValidator, Validator};
///
/// let validator = EmailValidator::new();
/// assert!(validator.validate("user@example.com").is_ok());
/// assert!(validator.validate("x").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
	message: Option<String>,
}

impl EmailValidator {
	pub fn new() -> Self {
		Self { message: None }
	}

	/// Sets a custom error message returned on validation failure.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_validators::{EmailValidator, Validator};
	///
	/// let validator = EmailValidator::new().with_message("invalid format");
	/// let err = validator.validate("x").unwrap_err();
	/// assert_eq!(err.to_string(), "invalid format");
	/// ```
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

impl Validator<str> for EmailValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		// Consecutive dots are legal in the pattern's character class but not in addresses.
		if EMAIL_REGEX.is_match(value) && !value.contains("..") {
			return Ok(());
		}
		match &self.message {
			Some(message) => Err(ValidationError::Custom(message.clone())),
			None => Err(ValidationError::InvalidEmail(value.to_string())),
		}
	}
}
