//! String validators

use crate::{ValidationError, ValidationResult, Validator};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Rejects empty strings.
///
/// With `strip` enabled (the default) a string made only of whitespace
/// counts as empty.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
	strip: bool,
}

impl RequiredValidator {
	/// Creates a new RequiredValidator that ignores surrounding whitespace.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_validators::{RequiredValidator, Validator};
	///
	/// let validator = RequiredValidator::new();
	/// assert!(validator.validate("x").is_ok());
	/// assert!(validator.validate("   ").is_err());
	/// ```
	pub fn new() -> Self {
		Self { strip: true }
	}

	/// Keep whitespace significant: `"  "` is accepted.
	pub fn no_strip(mut self) -> Self {
		self.strip = false;
		self
	}
}

impl Default for RequiredValidator {
	fn default() -> Self {
		Self::new()
	}
}

impl Validator<str> for RequiredValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let value = if self.strip { value.trim() } else { value };
		if value.is_empty() {
			Err(ValidationError::Required)
		} else {
			Ok(())
		}
	}
}

/// Rejects text shorter than `min` characters (not bytes)
///
/// # Examples
///
/// ```
/// use dynaform_validators::{MinLengthValidator, Validator};
///
/// let password = MinLengthValidator::new(8);
/// assert!(password.validate("correcthorse").is_ok());
/// assert!(password.validate("short").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MinLengthValidator {
	min: usize,
}

impl MinLengthValidator {
	pub fn new(min: usize) -> Self {
		Self { min }
	}
}

impl Validator<str> for MinLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		match value.chars().count() {
			length if length < self.min => Err(ValidationError::TooShort {
				length,
				min: self.min,
			}),
			_ => Ok(()),
		}
	}
}

/// Rejects text longer than `max` characters
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthValidator {
	max: usize,
}

impl MaxLengthValidator {
	pub fn new(max: usize) -> Self {
		Self { max }
	}
}

impl Validator<str> for MaxLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		match value.chars().count() {
			length if length > self.max => Err(ValidationError::TooLong {
				length,
				max: self.max,
			}),
			_ => Ok(()),
		}
	}
}

/// Accepts text matching a regular expression
///
/// The pattern is compiled once, when the validator is built, so a malformed
/// pattern surfaces as a `regex::Error` instead of a validation failure.
///
/// # Examples
///
/// ```
/// use dynaform_validators::{RegexValidator, Validator};
///
/// let zip = RegexValidator::new(r"^[0-9]{5}$").unwrap().with_message("Enter a 5-digit ZIP code");
/// assert!(zip.validate("75001").is_ok());
/// assert_eq!(zip.validate("7500").unwrap_err().to_string(), "Enter a 5-digit ZIP code");
/// ```
#[derive(Debug, Clone)]
pub struct RegexValidator {
	regex: Regex,
	message: String,
}

impl RegexValidator {
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		let regex = Regex::new(pattern)?;
		let message = format!("Enter a value matching {}", regex.as_str());
		Ok(Self { regex, message })
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}

	pub fn pattern(&self) -> &str {
		self.regex.as_str()
	}
}

impl Validator<str> for RegexValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if !self.regex.is_match(value) {
			return Err(ValidationError::PatternMismatch(self.message.clone()));
		}
		Ok(())
	}
}

/// Accepts ISO 8601 calendar dates (`YYYY-MM-DD`) with a four-digit year,
/// the value format of an HTML date input.
#[derive(Debug, Clone, Default)]
pub struct DateValidator;

impl DateValidator {
	pub fn new() -> Self {
		Self
	}

	/// Parses the value, returning the date on success.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_validators::DateValidator;
	///
	/// let date = DateValidator::new().parse("2025-01-15").unwrap();
	/// assert_eq!(date.to_string(), "2025-01-15");
	/// assert!(DateValidator::new().parse("2025-02-30").is_err());
	/// ```
	pub fn parse(&self, value: &str) -> ValidationResult<NaiveDate> {
		let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
			.map_err(|_| ValidationError::InvalidDate(value.to_string()))?;
		if !(1000..=9999).contains(&date.year()) {
			return Err(ValidationError::InvalidDate(value.to_string()));
		}
		Ok(date)
	}
}

impl Validator<str> for DateValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		self.parse(value).map(|_| ())
	}
}
