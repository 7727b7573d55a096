//! Property-based tests for form state and submit validation

use dynaform_forms::{BuiltinEvaluator, DynamicForm, FieldDescriptor, Rule, Schema};
use futures::executor::block_on;
use proptest::prelude::*;
use serde_json::json;

const FIELDS: [&str; 4] = ["first", "second", "third", "fourth"];

fn text_schema() -> Schema {
	Schema::new(
		FIELDS
			.iter()
			.map(|name| FieldDescriptor::text(*name).with_default(format!("{}-default", name)))
			.collect(),
	)
	.unwrap()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(50))]

	/// Property: after mutating one field, that field reads back the new value and the others are unchanged
	#[test]
	fn test_mutation_touches_only_its_field(index in 0usize..FIELDS.len(), value in "\\PC{0,20}") {
		let schema = text_schema();
		let mut form = DynamicForm::new(&schema, |_| {});
		let before = form.values().clone();
		let target = FIELDS[index];

		form.set_value(target, value.clone()).unwrap();

		prop_assert_eq!(form.value(target), Some(&json!(value)));
		for name in FIELDS.iter().filter(|n| **n != target) {
			prop_assert_eq!(form.value(name), before.get(name));
		}
		prop_assert_eq!(form.values().len(), FIELDS.len());
	}

	/// Property: a sequence of edits leaves every field holding its last written value
	#[test]
	fn test_last_write_wins(edits in prop::collection::vec((0usize..FIELDS.len(), "[a-z]{0,6}"), 0..20)) {
		let schema = text_schema();
		let mut form = DynamicForm::new(&schema, |_| {});
		let mut expected = form.values().clone();

		for (index, value) in &edits {
			form.set_value(FIELDS[*index], value.as_str()).unwrap();
			expected.insert(FIELDS[*index], json!(value));
		}

		prop_assert_eq!(form.values(), &expected);
	}

	/// Property: validating an unchanged state twice gives the same outcome
	#[test]
	fn test_validation_idempotent(values in prop::collection::vec("[ a-z@.]{0,8}", FIELDS.len())) {
		let schema = Schema::new(vec![
			FieldDescriptor::text("first"),
			FieldDescriptor::text("second").with_rule(Rule::email()),
			FieldDescriptor::text("third").with_rule(Rule::min_length(3)),
			FieldDescriptor::text("fourth").with_rule(Rule::pattern("^[a-z]*$")),
		])
		.unwrap();
		let mut form = DynamicForm::new(&schema, |_| {});
		for (name, value) in FIELDS.iter().zip(&values) {
			form.set_value(name, value.as_str()).unwrap();
		}
		let evaluator = BuiltinEvaluator::new();

		let first = block_on(form.validate(&evaluator));
		let second = block_on(form.validate(&evaluator));

		prop_assert_eq!(&first, &second);
		let order: Vec<usize> = first
			.failures()
			.iter()
			.map(|f| FIELDS.iter().position(|n| *n == f.field).unwrap())
			.collect();
		prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
	}
}
