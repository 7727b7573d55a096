//! Property-based tests for dynaform validators

use dynaform_validators::{
	ChoiceValidator, MaxLengthValidator, MinLengthValidator, RequiredValidator, Validator,
};
use proptest::prelude::*;

proptest! {
	#![proptest_config(ProptestConfig::with_cases(100))]

	/// Property: a string is accepted by both length bounds iff its char count lies between them
	#[test]
	fn test_length_bounds_agree_with_char_count(value in "\\PC{0,40}", min in 0usize..20, span in 0usize..20) {
		let max = min + span;
		let count = value.chars().count();

		let accepted = MinLengthValidator::new(min).validate(value.as_str()).is_ok()
			&& MaxLengthValidator::new(max).validate(value.as_str()).is_ok();

		prop_assert_eq!(accepted, count >= min && count <= max);
	}

	/// Property: whitespace-only input never satisfies the stripping required check
	#[test]
	fn test_required_rejects_whitespace_only(value in "[ \t\n]{0,10}") {
		prop_assert!(RequiredValidator::new().validate(value.as_str()).is_err());
	}

	/// Property: every declared choice is accepted
	#[test]
	fn test_every_declared_choice_is_accepted(choices in prop::collection::vec("[a-z]{1,8}", 1..8)) {
		let validator = ChoiceValidator::new(choices.clone());
		for choice in &choices {
			prop_assert!(validator.validate(choice.as_str()).is_ok());
		}
	}
}
