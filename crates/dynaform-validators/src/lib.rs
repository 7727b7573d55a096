//! Field validators for dynaform
//!
//! This crate provides the value-level checks that back the rule vocabulary of
//! `dynaform-forms`. Each validator is a small struct implementing
//! [`Validator`] for the value type it understands:
//!
//! - [`RequiredValidator`]: non-empty text (optionally ignoring surrounding whitespace)
//! - [`EmailValidator`]: email address format
//! - [`MinLengthValidator`] / [`MaxLengthValidator`]: character counts
//! - [`RegexValidator`]: arbitrary patterns
//! - [`MinValueValidator`] / [`MaxValueValidator`]: inclusive numeric bounds
//! - [`ChoiceValidator`]: membership in a fixed set of values
//! - [`DateValidator`]: ISO 8601 calendar dates
//!
//! Validators never panic on input; failures are reported through
//! [`ValidationError`], whose `Display` output is the user-facing message.

pub mod choice;
pub mod email;
pub mod errors;
pub mod numeric;
pub mod string;

pub use choice::ChoiceValidator;
pub use email::EmailValidator;
pub use errors::{ValidationError, ValidationResult};
pub use numeric::{MaxValueValidator, MinValueValidator};
pub use string::{
	DateValidator, MaxLengthValidator, MinLengthValidator, RegexValidator, RequiredValidator,
};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::choice::*;
	pub use crate::email::*;
	pub use crate::errors::*;
	pub use crate::numeric::*;
	pub use crate::string::*;
	pub use crate::Validator;
}

/// Trait for validators
pub trait Validator<T: ?Sized> {
	fn validate(&self, value: &T) -> ValidationResult<()>;
}
