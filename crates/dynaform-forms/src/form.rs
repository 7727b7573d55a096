//! The dynamic form: state initialization, field mutation and submission
//!
//! A [`DynamicForm`] borrows an immutable [`Schema`] and owns the editable
//! [`FormState`] derived from it. Submitting is split in three steps so that
//! edits can keep landing while rules are evaluated:
//!
//! 1. [`DynamicForm::begin_submit`] snapshots the state and numbers the attempt;
//! 2. [`PendingSubmission::validate`] evaluates every field of the snapshot;
//! 3. [`DynamicForm::finish_submit`] delivers the result, unless a newer
//!    attempt has been begun in the meantime.
//!
//! [`DynamicForm::submit`] runs the three steps back to back.

use crate::field::FieldError;
use crate::rules::{BuiltinEvaluator, Rule, RuleEvaluator, RuleVerdict};
use crate::schema::{FieldDescriptor, Schema, SchemaError};
use crate::settings::FormSettings;
use crate::signals::{ChangeSignal, ReceiverId};
use crate::state::{FieldChange, FormState};
use dynaform_validators::{ChoiceValidator, Validator};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Unknown field: {0}")]
	UnknownField(String),
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error(transparent)]
	Schema(#[from] SchemaError),
}

pub type FormResult<T> = Result<T, FormError>;

type SubmitCallback<'s> = Box<dyn FnMut(&FormState) + Send + 's>;

static NULL: Value = Value::Null;

/// One field that did not pass validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
	pub field: String,
	pub message: String,
}

impl FieldFailure {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			message: message.into(),
		}
	}
}

impl fmt::Display for FieldFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

/// Result of validating a form state.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
	/// Every field passed; carries the validated values.
	Valid(FormState),
	/// Failures in schema order, at most one per field.
	Invalid(Vec<FieldFailure>),
}

impl ValidationOutcome {
	pub fn is_valid(&self) -> bool {
		matches!(self, ValidationOutcome::Valid(_))
	}

	pub fn failures(&self) -> &[FieldFailure] {
		match self {
			ValidationOutcome::Valid(_) => &[],
			ValidationOutcome::Invalid(failures) => failures,
		}
	}
}

/// What [`DynamicForm::finish_submit`] did with a validation result.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
	/// The values were forwarded to the submit callback.
	Submitted(FormState),
	/// The values were rejected; the failures are also kept on the form.
	Invalid(Vec<FieldFailure>),
	/// A newer submission was begun; this result was discarded.
	Superseded { seq: u64, latest: u64 },
}

impl SubmitOutcome {
	pub fn is_submitted(&self) -> bool {
		matches!(self, SubmitOutcome::Submitted(_))
	}

	pub fn is_superseded(&self) -> bool {
		matches!(self, SubmitOutcome::Superseded { .. })
	}
}

/// A numbered snapshot of the form state awaiting validation.
///
/// It does not borrow the form, so the form stays editable while the
/// snapshot is validated.
#[derive(Debug)]
pub struct PendingSubmission<'s> {
	seq: u64,
	schema: &'s Schema,
	settings: FormSettings,
	snapshot: FormState,
}

impl<'s> PendingSubmission<'s> {
	pub fn seq(&self) -> u64 {
		self.seq
	}

	pub fn snapshot(&self) -> &FormState {
		&self.snapshot
	}

	pub async fn validate<E>(self, evaluator: &E) -> SubmissionResult
	where
		E: RuleEvaluator + ?Sized,
	{
		let outcome = validate_state(self.schema, &self.snapshot, &self.settings, evaluator).await;
		SubmissionResult {
			seq: self.seq,
			outcome,
		}
	}
}

/// Validation result of one submission, to be handed to [`DynamicForm::finish_submit`].
#[derive(Debug, PartialEq)]
pub struct SubmissionResult {
	pub seq: u64,
	pub outcome: ValidationOutcome,
}

/// Evaluate every field of `state` against its effective rule.
///
/// Fields without a rule get the implicit required rule, carrying
/// `settings.required_message` and `settings.strip_whitespace`. All fields are evaluated, concurrently, and
/// failures are reported in schema order. A rule that cannot be evaluated
/// counts as a failure of its own field only.
///
/// # Examples
///
/// ```
/// use dynaform_forms::{
///     BuiltinEvaluator, FieldDescriptor, FieldFailure, FormSettings, Schema, ValidationOutcome,
///     validate_state,
/// };
///
/// # futures::executor::block_on(async {
/// let schema = Schema::new(vec![FieldDescriptor::text("age")]).unwrap();
/// let outcome = validate_state(
///     &schema,
///     &schema.initial_state(),
///     &FormSettings::default(),
///     &BuiltinEvaluator::new(),
/// )
/// .await;
///
/// assert_eq!(
///     outcome,
///     ValidationOutcome::Invalid(vec![FieldFailure::new("age", "This field is required")])
/// );
/// # });
/// ```
pub async fn validate_state<E>(
	schema: &Schema,
	state: &FormState,
	settings: &FormSettings,
	evaluator: &E,
) -> ValidationOutcome
where
	E: RuleEvaluator + ?Sized,
{
	let default_rule = Rule::required()
		.with_message(settings.required_message.as_str())
		.with_strip_whitespace(settings.strip_whitespace);

	let checks = schema.fields().iter().map(|field| {
		let rule = field.rule.as_ref().unwrap_or(&default_rule);
		let value = state.get(&field.name).unwrap_or(&NULL);
		check_field(field, rule, value, settings, evaluator)
	});

	let failures: Vec<FieldFailure> = join_all(checks).await.into_iter().flatten().collect();

	if failures.is_empty() {
		ValidationOutcome::Valid(state.clone())
	} else {
		ValidationOutcome::Invalid(failures)
	}
}

async fn check_field<E>(
	field: &FieldDescriptor,
	rule: &Rule,
	value: &Value,
	settings: &FormSettings,
	evaluator: &E,
) -> Option<FieldFailure>
where
	E: RuleEvaluator + ?Sized,
{
	match evaluator.evaluate(rule, value).await {
		Ok(RuleVerdict::Fail(message)) => Some(FieldFailure::new(&field.name, message)),
		Ok(RuleVerdict::Pass) if settings.check_select_options => check_option(field, value),
		Ok(RuleVerdict::Pass) => None,
		Err(e) => {
			tracing::warn!(field = %field.name, rule = rule.kind(), error = %e, "rule evaluation failed");
			Some(FieldFailure::new(
				&field.name,
				format!("Invalid validation rule: {}", e),
			))
		}
	}
}

fn check_option(field: &FieldDescriptor, value: &Value) -> Option<FieldFailure> {
	let options = field.kind.options()?;
	let text = value.as_str()?;
	if text.is_empty() {
		return None;
	}
	ChoiceValidator::new(options.iter().map(|o| o.value.as_str()))
		.validate(text)
		.err()
		.map(|e| FieldFailure::new(&field.name, e.to_string()))
}

/// A form driven by a schema
///
/// # Examples
///
/// ```
/// use dynaform_forms::{BuiltinEvaluator, DynamicForm, FieldDescriptor, Schema};
/// use serde_json::json;
///
/// let schema = Schema::new(vec![FieldDescriptor::checkbox("subscribe")]).unwrap();
/// let mut form = DynamicForm::new(&schema, |values| {
///     assert_eq!(values.get("subscribe"), Some(&json!(true)));
/// });
///
/// form.set_value("subscribe", true).unwrap();
///
/// # futures::executor::block_on(async {
/// let outcome = form.submit(&BuiltinEvaluator::new()).await;
/// assert!(outcome.is_submitted());
/// # });
/// ```
pub struct DynamicForm<'s> {
	schema: &'s Schema,
	settings: FormSettings,
	initial: FormState,
	state: FormState,
	errors: Vec<FieldFailure>,
	on_submit: SubmitCallback<'s>,
	changes: ChangeSignal,
	submission_seq: u64,
}

impl<'s> DynamicForm<'s> {
	pub fn new<F>(schema: &'s Schema, on_submit: F) -> Self
	where
		F: FnMut(&FormState) + Send + 's,
	{
		Self::with_settings(schema, FormSettings::default(), on_submit)
	}

	pub fn with_settings<F>(schema: &'s Schema, settings: FormSettings, on_submit: F) -> Self
	where
		F: FnMut(&FormState) + Send + 's,
	{
		let initial = schema.initial_state();
		tracing::debug!(fields = initial.len(), "form state initialized");

		Self {
			schema,
			settings,
			state: initial.clone(),
			initial,
			errors: Vec::new(),
			on_submit: Box::new(on_submit),
			changes: ChangeSignal::new(),
			submission_seq: 0,
		}
	}

	pub fn schema(&self) -> &'s Schema {
		self.schema
	}

	pub fn settings(&self) -> &FormSettings {
		&self.settings
	}

	pub fn values(&self) -> &FormState {
		&self.state
	}

	pub fn initial(&self) -> &FormState {
		&self.initial
	}

	pub fn value(&self, field: &str) -> Option<&Value> {
		self.state.get(field)
	}

	/// Failures recorded by the last delivered submission, in schema order.
	pub fn errors(&self) -> &[FieldFailure] {
		&self.errors
	}

	pub fn field_errors(&self, field: &str) -> Vec<&str> {
		self.errors
			.iter()
			.filter(|e| e.field == field)
			.map(|e| e.message.as_str())
			.collect()
	}

	/// Replace one field's value
	///
	/// The value is converted to the field kind's representation but not
	/// validated. Every other field is left untouched and connected change
	/// receivers are notified.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{DynamicForm, FieldDescriptor, FormError, Schema};
	/// use serde_json::json;
	///
	/// let schema = Schema::new(vec![
	///     FieldDescriptor::text("name"),
	///     FieldDescriptor::number("age"),
	/// ]).unwrap();
	/// let mut form = DynamicForm::new(&schema, |_| {});
	///
	/// form.set_value("age", "42").unwrap();
	/// assert_eq!(form.value("age"), Some(&json!(42)));
	/// assert_eq!(form.value("name"), Some(&json!("")));
	///
	/// assert!(matches!(form.set_value("nope", "x"), Err(FormError::UnknownField(_))));
	/// ```
	pub fn set_value(&mut self, field: &str, value: impl Into<Value>) -> FormResult<()> {
		let descriptor = self
			.schema
			.get(field)
			.ok_or_else(|| FormError::UnknownField(field.to_string()))?;

		let new = descriptor
			.kind
			.coerce(value.into())
			.map_err(|error| FormError::Field {
				field: field.to_string(),
				error,
			})?;

		let old = self
			.state
			.insert(field, new.clone())
			.unwrap_or(Value::Null);
		tracing::debug!(field, "field value changed");

		self.changes.send(&FieldChange {
			field: field.to_string(),
			old,
			new,
		});
		Ok(())
	}

	/// Restore the initial state and forget recorded errors.
	pub fn reset(&mut self) {
		self.state = self.initial.clone();
		self.errors.clear();
		tracing::debug!("form state reset");
	}

	/// Whether any field differs from its initial value.
	pub fn has_changed(&self) -> bool {
		self.state != self.initial
	}

	/// Connect a receiver for field changes.
	pub fn on_change<F>(&self, receiver: F) -> ReceiverId
	where
		F: Fn(&FieldChange) + Send + Sync + 'static,
	{
		self.changes.connect(receiver)
	}

	pub fn changes(&self) -> &ChangeSignal {
		&self.changes
	}

	/// Built-in evaluator configured from this form's settings.
	///
	/// Declared `required` rules then treat whitespace the same way as the
	/// implicit one.
	pub fn evaluator(&self) -> BuiltinEvaluator {
		BuiltinEvaluator::from_settings(&self.settings)
	}

	/// Validate the current state without submitting it.
	pub async fn validate<E>(&self, evaluator: &E) -> ValidationOutcome
	where
		E: RuleEvaluator + ?Sized,
	{
		validate_state(self.schema, &self.state, &self.settings, evaluator).await
	}

	/// Snapshot the state under a new sequence number.
	///
	/// Any submission begun earlier becomes stale.
	pub fn begin_submit(&mut self) -> PendingSubmission<'s> {
		self.submission_seq += 1;
		tracing::debug!(seq = self.submission_seq, "submission started");

		PendingSubmission {
			seq: self.submission_seq,
			schema: self.schema,
			settings: self.settings.clone(),
			snapshot: self.state.clone(),
		}
	}

	/// Sequence number of the latest begun submission, `0` if none.
	pub fn latest_submission(&self) -> u64 {
		self.submission_seq
	}

	/// Deliver a validation result
	///
	/// A result whose sequence number is older than the latest begun
	/// submission is discarded. Otherwise valid values go to the submit
	/// callback and failures are recorded on the form.
	pub fn finish_submit(&mut self, result: SubmissionResult) -> SubmitOutcome {
		let SubmissionResult { seq, outcome } = result;

		if seq < self.submission_seq {
			tracing::debug!(seq, latest = self.submission_seq, "discarding superseded submission");
			return SubmitOutcome::Superseded {
				seq,
				latest: self.submission_seq,
			};
		}

		match outcome {
			ValidationOutcome::Valid(values) => {
				self.errors.clear();
				(self.on_submit)(&values);
				tracing::info!(seq, fields = values.len(), "form submitted");
				SubmitOutcome::Submitted(values)
			}
			ValidationOutcome::Invalid(failures) => {
				if self.settings.log_failures {
					for failure in &failures {
						tracing::warn!(seq, field = %failure.field, message = %failure.message, "field failed validation");
					}
				}
				self.errors = failures.clone();
				SubmitOutcome::Invalid(failures)
			}
		}
	}

	/// Begin, validate and finish a submission in one go.
	pub async fn submit<E>(&mut self, evaluator: &E) -> SubmitOutcome
	where
		E: RuleEvaluator + ?Sized,
	{
		let result = self.begin_submit().validate(evaluator).await;
		self.finish_submit(result)
	}
}

impl fmt::Debug for DynamicForm<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynamicForm")
			.field("fields", &self.schema.len())
			.field("state", &self.state)
			.field("errors", &self.errors)
			.field("submission_seq", &self.submission_seq)
			.finish()
	}
}
