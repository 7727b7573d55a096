//! Numeric bounds
//!
//! Both validators are inclusive and generic over any ordered, displayable
//! type. The bound is rendered with `Display` in the error, so `18.0_f64`
//! reports as `18`.

use crate::{ValidationError, ValidationResult, Validator};
use std::fmt::Display;

/// Rejects values below a lower bound
///
/// # Examples
///
/// ```
/// use dynaform_validators::{MinValueValidator, Validator};
///
/// let adult = MinValueValidator::new(18.0);
/// assert!(adult.validate(&18.0).is_ok());
/// assert!(adult.validate(&17.5).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MinValueValidator<T> {
	min: T,
}

impl<T> MinValueValidator<T> {
	pub fn new(min: T) -> Self {
		Self { min }
	}

	pub fn min(&self) -> &T {
		&self.min
	}
}

impl<T: PartialOrd + Display> Validator<T> for MinValueValidator<T> {
	fn validate(&self, value: &T) -> ValidationResult<()> {
		if *value < self.min {
			return Err(ValidationError::TooSmall {
				value: value.to_string(),
				min: self.min.to_string(),
			});
		}
		Ok(())
	}
}

/// Rejects values above an upper bound
///
/// # Examples
///
/// ```
/// use dynaform_validators::{MaxValueValidator, Validator};
///
/// let quantity = MaxValueValidator::new(99);
/// assert!(quantity.validate(&99).is_ok());
/// assert!(quantity.validate(&100).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaxValueValidator<T> {
	max: T,
}

impl<T> MaxValueValidator<T> {
	pub fn new(max: T) -> Self {
		Self { max }
	}

	pub fn max(&self) -> &T {
		&self.max
	}
}

impl<T: PartialOrd + Display> Validator<T> for MaxValueValidator<T> {
	fn validate(&self, value: &T) -> ValidationResult<()> {
		if *value > self.max {
			return Err(ValidationError::TooLarge {
				value: value.to_string(),
				max: self.max.to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0.0, true)]
	#[case(10.0, true)]
	#[case(-0.5, false)]
	#[case(10.5, false)]
	fn test_bounds_are_inclusive(#[case] value: f64, #[case] valid: bool) {
		let accepted = MinValueValidator::new(0.0).validate(&value).is_ok()
			&& MaxValueValidator::new(10.0).validate(&value).is_ok();
		assert_eq!(accepted, valid);
	}

	#[rstest]
	fn test_min_value_error_carries_bounds() {
		let result = MinValueValidator::new(18).validate(&17);
		assert_eq!(
			result,
			Err(ValidationError::TooSmall {
				value: "17".to_string(),
				min: "18".to_string(),
			})
		);
	}

	#[rstest]
	fn test_float_bound_renders_without_fraction() {
		let err = MaxValueValidator::new(150.0).validate(&200.0).unwrap_err();
		assert_eq!(err.to_string(), "Ensure this value is less than or equal to 150");
	}
}
