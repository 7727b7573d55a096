//! Choice validator

use crate::{ValidationError, ValidationResult, Validator};

/// Accepts only values from a fixed, ordered set of choices.
///
/// # Examples
///
/// ```
/// use dynaform_validators::{ChoiceValidator, Validator};
///
/// let validator = ChoiceValidator::new(["free", "pro"]);
/// assert!(validator.validate("pro").is_ok());
/// assert!(validator.validate("gold").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
	choices: Vec<String>,
}

impl ChoiceValidator {
	pub fn new<I, S>(choices: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			choices: choices.into_iter().map(Into::into).collect(),
		}
	}

	pub fn choices(&self) -> &[String] {
		&self.choices
	}
}

impl Validator<str> for ChoiceValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if self.choices.iter().any(|choice| choice == value) {
			Ok(())
		} else {
			Err(ValidationError::InvalidChoice(value.to_string()))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_choice_validator_is_case_sensitive() {
		let validator = ChoiceValidator::new(["Red", "Green"]);
		assert!(validator.validate("Red").is_ok());
		assert_eq!(
			validator.validate("red"),
			Err(ValidationError::InvalidChoice("red".to_string()))
		);
	}

	#[rstest]
	fn test_empty_choice_set_rejects_everything() {
		let validator = ChoiceValidator::new(Vec::<String>::new());
		assert!(validator.validate("").is_err());
		assert!(validator.choices().is_empty());
	}
}
