//! Validation error types

use thiserror::Error;

/// Reasons a value can be rejected by a validator.
///
/// The `Display` implementation produces the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
	#[error("This field is required")]
	Required,

	#[error("Enter a valid email address")]
	InvalidEmail(String),

	#[error("Ensure this value has at least {min} characters (it has {length})")]
	TooShort { length: usize, min: usize },

	#[error("Ensure this value has at most {max} characters (it has {length})")]
	TooLong { length: usize, max: usize },

	#[error("{0}")]
	PatternMismatch(String),

	#[error("Ensure this value is greater than or equal to {min}")]
	TooSmall { value: String, min: String },

	#[error("Ensure this value is less than or equal to {max}")]
	TooLarge { value: String, max: String },

	#[error("Select a valid choice. {0} is not one of the available choices.")]
	InvalidChoice(String),

	#[error("Enter a valid date in YYYY-MM-DD format")]
	InvalidDate(String),

	#[error("{0}")]
	Custom(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(ValidationError::Required, "This field is required")]
	#[case(
		ValidationError::TooShort { length: 2, min: 5 },
		"Ensure this value has at least 5 characters (it has 2)"
	)]
	#[case(
		ValidationError::InvalidChoice("gold".to_string()),
		"Select a valid choice. gold is not one of the available choices."
	)]
	#[case(ValidationError::Custom("nope".to_string()), "nope")]
	fn test_error_messages(#[case] error: ValidationError, #[case] expected: &str) {
		assert_eq!(error.to_string(), expected);
	}
}
