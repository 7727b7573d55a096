//! Submit validation tests
//!
//! End-to-end behavior of `DynamicForm::submit` and the split
//! begin / validate / finish submission flow.

use async_trait::async_trait;
use dynaform_forms::{
	BuiltinEvaluator, DynamicForm, FieldDescriptor, FieldFailure, FormState, Rule,
	RuleEvaluationError, RuleEvaluator, RuleVerdict, Schema, SelectOption, SubmitOutcome,
	ValidationOutcome, ValidatorRegistry,
};
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

/// Records every value map handed to the submit callback.
#[derive(Clone, Default)]
struct Submissions(Arc<Mutex<Vec<FormState>>>);

impl Submissions {
	fn callback(&self) -> impl FnMut(&FormState) + Send + 'static {
		let inner = self.0.clone();
		move |values| inner.lock().push(values.clone())
	}

	fn count(&self) -> usize {
		self.0.lock().len()
	}

	fn last(&self) -> Option<FormState> {
		self.0.lock().last().cloned()
	}
}

#[fixture]
fn evaluator() -> BuiltinEvaluator {
	BuiltinEvaluator::new()
}

fn email_rule() -> Rule {
	Rule::all(vec![
		Rule::required(),
		Rule::email().with_message("invalid format"),
	])
}

#[rstest]
#[tokio::test]
async fn test_invalid_email_reports_rule_message(evaluator: BuiltinEvaluator) {
	// Arrange
	let schema = Schema::new(vec![
		FieldDescriptor::text("email")
			.with_label("Email")
			.with_rule(email_rule()),
	])
	.unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());
	form.set_value("email", "x").unwrap();

	// Act
	let outcome = form.submit(&evaluator).await;

	// Assert
	assert_eq!(
		outcome,
		SubmitOutcome::Invalid(vec![FieldFailure::new("email", "invalid format")])
	);
	assert_eq!(submissions.count(), 0);
	assert_eq!(form.field_errors("email"), vec!["invalid format"]);
}

#[rstest]
#[tokio::test]
async fn test_field_without_rule_is_required(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![FieldDescriptor::text("age").with_label("Age")]).unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());

	let outcome = form.submit(&evaluator).await;

	assert_eq!(
		outcome,
		SubmitOutcome::Invalid(vec![FieldFailure::new("age", "This field is required")])
	);
	assert_eq!(submissions.count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_ticked_checkbox_is_submitted_once(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![FieldDescriptor::checkbox("subscribe").with_label("Subscribe")])
		.unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());
	form.set_value("subscribe", true).unwrap();

	let outcome = form.submit(&evaluator).await;

	let expected: FormState = [("subscribe".to_string(), json!(true))].into_iter().collect();
	assert_eq!(outcome, SubmitOutcome::Submitted(expected.clone()));
	assert_eq!(submissions.count(), 1);
	assert_eq!(submissions.last(), Some(expected));
}

#[rstest]
#[tokio::test]
async fn test_select_value_outside_options_is_invalid(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![FieldDescriptor::select(
		"plan",
		vec![SelectOption::new("free", "Free"), SelectOption::new("pro", "Pro")],
	)])
	.unwrap();
	let mut form = DynamicForm::new(&schema, |_| {});
	form.set_value("plan", "enterprise").unwrap();

	let outcome = form.submit(&evaluator).await;

	assert_eq!(
		outcome,
		SubmitOutcome::Invalid(vec![FieldFailure::new(
			"plan",
			"Select a valid choice. enterprise is not one of the available choices."
		)])
	);
}

#[rstest]
#[tokio::test]
async fn test_all_failures_reported_in_schema_order(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![
		FieldDescriptor::text("a"),
		FieldDescriptor::text("b"),
		FieldDescriptor::text("c").with_rule(Rule::min_length(5)),
	])
	.unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());
	form.set_value("b", "present").unwrap();
	form.set_value("c", "abc").unwrap();

	let outcome = form.submit(&evaluator).await;

	let fields: Vec<String> = match outcome {
		SubmitOutcome::Invalid(failures) => failures.into_iter().map(|f| f.field).collect(),
		other => panic!("expected invalid outcome, got {:?}", other),
	};
	assert_eq!(fields, vec!["a", "c"]);
	assert_eq!(submissions.count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_validation_is_idempotent(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![
		FieldDescriptor::text("name"),
		FieldDescriptor::text("email").with_rule(email_rule()),
	])
	.unwrap();
	let mut form = DynamicForm::new(&schema, |_| {});
	form.set_value("email", "not-an-email").unwrap();

	let first = form.validate(&evaluator).await;
	let second = form.validate(&evaluator).await;

	assert_eq!(first, second);
	assert_eq!(first.failures().len(), 2);
}

#[rstest]
#[case("NaN")]
#[case("inf")]
#[case("-Infinity")]
#[tokio::test]
async fn test_non_finite_number_text_is_rejected(
	evaluator: BuiltinEvaluator,
	#[case] input: &str,
) {
	// Arrange
	let schema = Schema::new(vec![FieldDescriptor::number("age").with_rule(Rule::all(vec![
		Rule::required(),
		Rule::min_value(0.0),
		Rule::max_value(150.0),
	]))])
	.unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());

	// Act
	form.set_value("age", input).unwrap();
	let outcome = form.submit(&evaluator).await;

	// Assert
	assert_eq!(form.value("age"), Some(&json!(input)));
	assert_eq!(
		outcome,
		SubmitOutcome::Invalid(vec![FieldFailure::new("age", "Enter a number")])
	);
	assert_eq!(submissions.count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_malformed_rule_does_not_hide_other_failures(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![
		FieldDescriptor::text("code").with_rule(Rule::pattern("([a-z")),
		FieldDescriptor::text("name"),
		FieldDescriptor::text("sku").with_rule(Rule::custom("unregistered", Value::Null)),
	])
	.unwrap();
	let mut form = DynamicForm::new(&schema, |_| {});
	form.set_value("code", "abc").unwrap();
	form.set_value("sku", "A-1").unwrap();

	let outcome = form.submit(&evaluator).await;

	let SubmitOutcome::Invalid(failures) = outcome else {
		panic!("expected invalid outcome");
	};
	assert_eq!(failures.len(), 3);
	assert_eq!(failures[0].field, "code");
	assert!(failures[0].message.starts_with("Invalid validation rule: "));
	assert_eq!(failures[1], FieldFailure::new("name", "This field is required"));
	assert_eq!(
		failures[2].message,
		"Invalid validation rule: no validator registered under 'unregistered'"
	);
}

#[rstest]
#[tokio::test]
async fn test_custom_validator_from_registry() {
	let mut registry = ValidatorRegistry::new();
	registry.register_fn("even", |value, _params| {
		Ok(match value.as_i64() {
			Some(n) if n % 2 == 0 => RuleVerdict::Pass,
			_ => RuleVerdict::Fail("Must be even".to_string()),
		})
	});
	let evaluator = BuiltinEvaluator::new().with_registry(registry);
	let schema = Schema::new(vec![
		FieldDescriptor::number("count").with_rule(Rule::all(vec![
			Rule::required(),
			Rule::custom("even", Value::Null),
		])),
	])
	.unwrap();
	let mut form = DynamicForm::new(&schema, |_| {});

	form.set_value("count", "3").unwrap();
	assert_eq!(
		form.validate(&evaluator).await.failures(),
		&[FieldFailure::new("count", "Must be even")]
	);

	form.set_value("count", 4).unwrap();
	assert!(form.validate(&evaluator).await.is_valid());
}

#[rstest]
#[tokio::test]
async fn test_older_submission_is_superseded(evaluator: BuiltinEvaluator) {
	// Arrange
	let schema = Schema::new(vec![FieldDescriptor::text("email").with_rule(email_rule())]).unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());
	form.set_value("email", "x").unwrap();

	// Act
	let first = form.begin_submit();
	form.set_value("email", "a@b.io").unwrap();
	let second = form.begin_submit();

	let second_outcome = {
		let result = second.validate(&evaluator).await;
		form.finish_submit(result)
	};
	let first_outcome = {
		let result = first.validate(&evaluator).await;
		form.finish_submit(result)
	};

	// Assert
	assert!(second_outcome.is_submitted());
	assert_eq!(first_outcome, SubmitOutcome::Superseded { seq: 1, latest: 2 });
	assert_eq!(submissions.count(), 1);
	assert_eq!(
		submissions.last().and_then(|s| s.get("email").cloned()),
		Some(json!("a@b.io"))
	);
	assert!(form.errors().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_stale_result_is_discarded_even_if_newer_is_pending(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![FieldDescriptor::text("name")]).unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());
	form.set_value("name", "Ada").unwrap();

	let first = form.begin_submit();
	let _second = form.begin_submit();
	let result = first.validate(&evaluator).await;

	assert!(form.finish_submit(result).is_superseded());
	assert_eq!(submissions.count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_edits_during_validation_do_not_affect_snapshot(evaluator: BuiltinEvaluator) {
	let schema = Schema::new(vec![FieldDescriptor::text("name")]).unwrap();
	let submissions = Submissions::default();
	let mut form = DynamicForm::new(&schema, submissions.callback());
	form.set_value("name", "Ada").unwrap();

	let pending = form.begin_submit();
	let validation = pending.validate(&evaluator);
	form.set_value("name", "").unwrap();
	let result = validation.await;

	assert!(matches!(result.outcome, ValidationOutcome::Valid(ref values) if values.get("name") == Some(&json!("Ada"))));
	assert!(form.finish_submit(result).is_submitted());
	assert_eq!(form.value("name"), Some(&json!("")));
}

/// Evaluator that only answers once every field is being evaluated at the same time.
struct RendezvousEvaluator {
	barrier: Barrier,
	inner: BuiltinEvaluator,
}

#[async_trait]
impl RuleEvaluator for RendezvousEvaluator {
	async fn evaluate(
		&self,
		rule: &Rule,
		value: &Value,
	) -> Result<RuleVerdict, RuleEvaluationError> {
		self.barrier.wait().await;
		self.inner.evaluate(rule, value).await
	}
}

#[rstest]
#[tokio::test]
async fn test_fields_are_evaluated_concurrently() {
	let schema = Schema::new(vec![
		FieldDescriptor::text("a"),
		FieldDescriptor::text("b"),
		FieldDescriptor::text("c"),
	])
	.unwrap();
	let evaluator = RendezvousEvaluator {
		barrier: Barrier::new(3),
		inner: BuiltinEvaluator::new(),
	};
	let mut form = DynamicForm::new(&schema, |_| {});
	form.set_value("b", "filled").unwrap();

	let outcome = tokio::time::timeout(Duration::from_secs(5), form.submit(&evaluator))
		.await
		.expect("evaluations should run concurrently");

	let SubmitOutcome::Invalid(failures) = outcome else {
		panic!("expected invalid outcome");
	};
	assert_eq!(
		failures.iter().map(|f| f.field.as_str()).collect::<Vec<_>>(),
		vec!["a", "c"]
	);
}

/// Evaluator whose verdicts arrive in reverse schema order.
struct ReversedDelayEvaluator;

#[async_trait]
impl RuleEvaluator for ReversedDelayEvaluator {
	async fn evaluate(
		&self,
		_rule: &Rule,
		value: &Value,
	) -> Result<RuleVerdict, RuleEvaluationError> {
		let delay = value.as_str().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
		tokio::time::sleep(Duration::from_millis(delay)).await;
		Ok(RuleVerdict::Fail(format!("failed after {}ms", delay)))
	}
}

#[rstest]
#[tokio::test]
async fn test_failure_order_does_not_depend_on_completion_order() {
	let schema = Schema::new(vec![
		FieldDescriptor::text("slow"),
		FieldDescriptor::text("medium"),
		FieldDescriptor::text("fast"),
	])
	.unwrap();
	let mut form = DynamicForm::new(&schema, |_| {});
	form.set_value("slow", "60").unwrap();
	form.set_value("medium", "30").unwrap();
	form.set_value("fast", "0").unwrap();

	let outcome = form.validate(&ReversedDelayEvaluator).await;

	assert_eq!(
		outcome.failures(),
		&[
			FieldFailure::new("slow", "failed after 60ms"),
			FieldFailure::new("medium", "failed after 30ms"),
			FieldFailure::new("fast", "failed after 0ms"),
		]
	);
}
