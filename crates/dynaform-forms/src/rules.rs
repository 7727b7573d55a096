//! Validation rules and the rule-evaluation seam
//!
//! A [`Rule`] is plain, serializable data attached to a field descriptor.
//! Turning a rule and a value into a verdict is the job of a
//! [`RuleEvaluator`]. The evaluator is asynchronous so that rules backed by
//! remote checks can be plugged in without changing the submit pipeline.
//!
//! [`BuiltinEvaluator`] understands the built-in vocabulary and resolves
//! [`Rule::Custom`] through a [`ValidatorRegistry`].
//!
//! ## Example
//!
//! ```
//! use dynaform_forms::rules::{BuiltinEvaluator, Rule, RuleEvaluator, RuleVerdict};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let rule = Rule::all(vec![Rule::required(), Rule::email().with_message("invalid format")]);
//! let evaluator = BuiltinEvaluator::new();
//!
//! let verdict = evaluator.evaluate(&rule, &json!("x")).await.unwrap();
//! assert_eq!(verdict, RuleVerdict::Fail("invalid format".to_string()));
//! # });
//! ```

use crate::settings::FormSettings;
use async_trait::async_trait;
use dynaform_validators::{
	ChoiceValidator, DateValidator, EmailValidator, MaxLengthValidator, MaxValueValidator,
	MinLengthValidator, MinValueValidator, RegexValidator, RequiredValidator, ValidationError,
	Validator,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Message used by the implicit rule of fields that declare none.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";

const ACCEPTED_MESSAGE: &str = "You must accept this field";
const NUMBER_MESSAGE: &str = "Enter a number";
const TEXT_MESSAGE: &str = "Enter a text value";

/// A declarative per-field validation rule.
///
/// Every rule except `required`, `accepted` and `all` passes on an empty
/// value, so optional fields can carry format rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
	/// Value must be non-empty
	///
	/// `strip_whitespace` overrides the evaluator's own setting when present.
	Required {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		strip_whitespace: Option<bool>,
	},
	Email {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	MinLength {
		min: usize,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	MaxLength {
		max: usize,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	Pattern {
		pattern: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	OneOf {
		choices: Vec<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	/// Checkbox must be ticked
	Accepted {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	MinValue {
		min: f64,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	MaxValue {
		max: f64,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	/// ISO 8601 `YYYY-MM-DD`
	Date {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
	/// Members are checked in order; the first failure is reported.
	All { rules: Vec<Rule> },
	/// Resolved by id through a [`ValidatorRegistry`].
	Custom {
		id: String,
		#[serde(default)]
		params: Value,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		message: Option<String>,
	},
}

impl Rule {
	pub fn required() -> Self {
		Rule::Required {
			message: None,
			strip_whitespace: None,
		}
	}

	pub fn email() -> Self {
		Rule::Email { message: None }
	}

	pub fn min_length(min: usize) -> Self {
		Rule::MinLength { min, message: None }
	}

	pub fn max_length(max: usize) -> Self {
		Rule::MaxLength { max, message: None }
	}

	pub fn pattern(pattern: impl Into<String>) -> Self {
		Rule::Pattern {
			pattern: pattern.into(),
			message: None,
		}
	}

	pub fn one_of<I, S>(choices: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Rule::OneOf {
			choices: choices.into_iter().map(Into::into).collect(),
			message: None,
		}
	}

	pub fn accepted() -> Self {
		Rule::Accepted { message: None }
	}

	pub fn min_value(min: f64) -> Self {
		Rule::MinValue { min, message: None }
	}

	pub fn max_value(max: f64) -> Self {
		Rule::MaxValue { max, message: None }
	}

	pub fn date() -> Self {
		Rule::Date { message: None }
	}

	pub fn all(rules: Vec<Rule>) -> Self {
		Rule::All { rules }
	}

	pub fn custom(id: impl Into<String>, params: Value) -> Self {
		Rule::Custom {
			id: id.into(),
			params,
			message: None,
		}
	}

	/// Override the failure message.
	///
	/// On [`Rule::All`] the override is applied to every member.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::Rule;
	///
	/// let rule = Rule::min_length(8).with_message("Too short");
	/// assert_eq!(rule, Rule::MinLength { min: 8, message: Some("Too short".to_string()) });
	/// ```
	pub fn with_message(self, message: impl Into<String>) -> Self {
		let message = message.into();
		match self {
			Rule::All { rules } => Rule::All {
				rules: rules
					.into_iter()
					.map(|rule| rule.with_message(message.clone()))
					.collect(),
			},
			mut rule => {
				if let Some(slot) = rule.message_slot() {
					*slot = Some(message);
				}
				rule
			}
		}
	}

	/// Pin how `required` treats whitespace-only text; other rules are
	/// returned unchanged.
	pub fn with_strip_whitespace(self, strip: bool) -> Self {
		match self {
			Rule::Required { message, .. } => Rule::Required {
				message,
				strip_whitespace: Some(strip),
			},
			Rule::All { rules } => Rule::All {
				rules: rules
					.into_iter()
					.map(|rule| rule.with_strip_whitespace(strip))
					.collect(),
			},
			rule => rule,
		}
	}

	/// Whether this rule rejects an empty value.
	pub fn is_required(&self) -> bool {
		match self {
			Rule::Required { .. } | Rule::Accepted { .. } => true,
			Rule::All { rules } => rules.iter().any(Rule::is_required),
			_ => false,
		}
	}

	/// Short identifier used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Rule::Required { .. } => "required",
			Rule::Email { .. } => "email",
			Rule::MinLength { .. } => "min_length",
			Rule::MaxLength { .. } => "max_length",
			Rule::Pattern { .. } => "pattern",
			Rule::OneOf { .. } => "one_of",
			Rule::Accepted { .. } => "accepted",
			Rule::MinValue { .. } => "min_value",
			Rule::MaxValue { .. } => "max_value",
			Rule::Date { .. } => "date",
			Rule::All { .. } => "all",
			Rule::Custom { .. } => "custom",
		}
	}

	fn message_slot(&mut self) -> Option<&mut Option<String>> {
		match self {
			Rule::Required { message, .. }
			| Rule::Email { message }
			| Rule::MinLength { message, .. }
			| Rule::MaxLength { message, .. }
			| Rule::Pattern { message, .. }
			| Rule::OneOf { message, .. }
			| Rule::Accepted { message }
			| Rule::MinValue { message, .. }
			| Rule::MaxValue { message, .. }
			| Rule::Date { message }
			| Rule::Custom { message, .. } => Some(message),
			Rule::All { .. } => None,
		}
	}

	fn message(&self) -> Option<&str> {
		match self {
			Rule::Required { message, .. }
			| Rule::Email { message }
			| Rule::MinLength { message, .. }
			| Rule::MaxLength { message, .. }
			| Rule::Pattern { message, .. }
			| Rule::OneOf { message, .. }
			| Rule::Accepted { message }
			| Rule::MinValue { message, .. }
			| Rule::MaxValue { message, .. }
			| Rule::Date { message }
			| Rule::Custom { message, .. } => message.as_deref(),
			Rule::All { .. } => None,
		}
	}
}

/// Result of evaluating one rule against one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleVerdict {
	Pass,
	Fail(String),
}

impl RuleVerdict {
	pub fn is_pass(&self) -> bool {
		matches!(self, RuleVerdict::Pass)
	}
}

impl From<Result<(), ValidationError>> for RuleVerdict {
	fn from(result: Result<(), ValidationError>) -> Self {
		match result {
			Ok(()) => RuleVerdict::Pass,
			Err(e) => RuleVerdict::Fail(e.to_string()),
		}
	}
}

/// The evaluator could not produce a verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleEvaluationError {
	#[error("malformed {rule} rule: {reason}")]
	InvalidRule { rule: &'static str, reason: String },
	#[error("no validator registered under '{0}'")]
	UnknownValidator(String),
	#[error("{0}")]
	Custom(String),
}

/// Turns a rule and a value into a verdict.
#[async_trait]
pub trait RuleEvaluator: Send + Sync {
	async fn evaluate(&self, rule: &Rule, value: &Value)
	-> Result<RuleVerdict, RuleEvaluationError>;
}

/// A caller-supplied check referenced from schemas by id.
#[async_trait]
pub trait CustomValidator: Send + Sync {
	async fn validate(&self, value: &Value, params: &Value)
	-> Result<RuleVerdict, RuleEvaluationError>;
}

struct FnValidator<F>(F);

#[async_trait]
impl<F> CustomValidator for FnValidator<F>
where
	F: Fn(&Value, &Value) -> Result<RuleVerdict, RuleEvaluationError> + Send + Sync,
{
	async fn validate(
		&self,
		value: &Value,
		params: &Value,
	) -> Result<RuleVerdict, RuleEvaluationError> {
		(self.0)(value, params)
	}
}

/// Custom validators addressable from [`Rule::Custom`].
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
	validators: HashMap<String, Arc<dyn CustomValidator>>,
}

impl ValidatorRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, id: impl Into<String>, validator: impl CustomValidator + 'static) {
		self.validators.insert(id.into(), Arc::new(validator));
	}

	/// Register a synchronous closure as a custom validator
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::rules::{RuleVerdict, ValidatorRegistry};
	///
	/// let mut registry = ValidatorRegistry::new();
	/// registry.register_fn("even", |value, _params| {
	///     Ok(match value.as_i64() {
	///         Some(n) if n % 2 == 0 => RuleVerdict::Pass,
	///         _ => RuleVerdict::Fail("Must be even".to_string()),
	///     })
	/// });
	/// assert!(registry.contains("even"));
	/// ```
	pub fn register_fn<F>(&mut self, id: impl Into<String>, f: F)
	where
		F: Fn(&Value, &Value) -> Result<RuleVerdict, RuleEvaluationError> + Send + Sync + 'static,
	{
		self.register(id, FnValidator(f));
	}

	pub fn get(&self, id: &str) -> Option<Arc<dyn CustomValidator>> {
		self.validators.get(id).cloned()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.validators.contains_key(id)
	}
}

impl fmt::Debug for ValidatorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut ids: Vec<&str> = self.validators.keys().map(String::as_str).collect();
		ids.sort_unstable();
		f.debug_struct("ValidatorRegistry").field("ids", &ids).finish()
	}
}

/// Evaluator for the built-in rule vocabulary.
#[derive(Debug, Clone)]
pub struct BuiltinEvaluator {
	registry: ValidatorRegistry,
	strip_whitespace: bool,
}

impl Default for BuiltinEvaluator {
	fn default() -> Self {
		Self::new()
	}
}

impl BuiltinEvaluator {
	pub fn new() -> Self {
		Self {
			registry: ValidatorRegistry::new(),
			strip_whitespace: true,
		}
	}

	/// Evaluator configured from engine settings.
	pub fn from_settings(settings: &FormSettings) -> Self {
		Self::new().with_strip_whitespace(settings.strip_whitespace)
	}

	pub fn with_registry(mut self, registry: ValidatorRegistry) -> Self {
		self.registry = registry;
		self
	}

	/// Treat whitespace-only text as empty (default `true`).
	pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
		self.strip_whitespace = strip;
		self
	}

	pub fn registry(&self) -> &ValidatorRegistry {
		&self.registry
	}

	fn evaluate_boxed<'a>(
		&'a self,
		rule: &'a Rule,
		value: &'a Value,
	) -> BoxFuture<'a, Result<RuleVerdict, RuleEvaluationError>> {
		async move {
			match rule {
				Rule::All { rules } => {
					for member in rules {
						let verdict = self.evaluate_boxed(member, value).await?;
						if !verdict.is_pass() {
							return Ok(verdict);
						}
					}
					Ok(RuleVerdict::Pass)
				}
				Rule::Custom { id, params, .. } => {
					if self.is_empty(value) {
						return Ok(RuleVerdict::Pass);
					}
					let validator = self
						.registry
						.get(id)
						.ok_or_else(|| RuleEvaluationError::UnknownValidator(id.clone()))?;
					let verdict = validator.validate(value, params).await?;
					Ok(override_message(rule, verdict))
				}
				_ => self.evaluate_leaf(rule, value).map(|v| override_message(rule, v)),
			}
		}
		.boxed()
	}

	fn evaluate_leaf(&self, rule: &Rule, value: &Value) -> Result<RuleVerdict, RuleEvaluationError> {
		match rule {
			Rule::Required {
				strip_whitespace, ..
			} => {
				let strip = strip_whitespace.unwrap_or(self.strip_whitespace);
				Ok(if is_blank(value, strip) {
					RuleVerdict::Fail(DEFAULT_REQUIRED_MESSAGE.to_string())
				} else {
					RuleVerdict::Pass
				})
			}
			Rule::Accepted { .. } => Ok(match value {
				Value::Bool(true) => RuleVerdict::Pass,
				Value::String(s) if matches!(s.trim(), "true" | "on") => RuleVerdict::Pass,
				_ => RuleVerdict::Fail(ACCEPTED_MESSAGE.to_string()),
			}),
			_ if self.is_empty(value) => Ok(RuleVerdict::Pass),
			Rule::MinValue { min, .. } => Ok(match as_number(value) {
				Some(n) => MinValueValidator::new(*min).validate(&n).into(),
				None => RuleVerdict::Fail(NUMBER_MESSAGE.to_string()),
			}),
			Rule::MaxValue { max, .. } => Ok(match as_number(value) {
				Some(n) => MaxValueValidator::new(*max).validate(&n).into(),
				None => RuleVerdict::Fail(NUMBER_MESSAGE.to_string()),
			}),
			_ => {
				let Some(text) = as_text(value) else {
					return Ok(RuleVerdict::Fail(TEXT_MESSAGE.to_string()));
				};
				self.evaluate_text(rule, &text)
			}
		}
	}

	fn evaluate_text(&self, rule: &Rule, text: &str) -> Result<RuleVerdict, RuleEvaluationError> {
		let verdict: RuleVerdict = match rule {
			Rule::Email { message } => {
				let validator = match message {
					Some(message) => EmailValidator::new().with_message(message.as_str()),
					None => EmailValidator::new(),
				};
				validator.validate(text).into()
			}
			Rule::MinLength { min, .. } => MinLengthValidator::new(*min).validate(text).into(),
			Rule::MaxLength { max, .. } => MaxLengthValidator::new(*max).validate(text).into(),
			Rule::Pattern { pattern, .. } => RegexValidator::new(pattern)
				.map_err(|e| RuleEvaluationError::InvalidRule {
					rule: "pattern",
					reason: e.to_string(),
				})?
				.validate(text)
				.into(),
			Rule::OneOf { choices, .. } => ChoiceValidator::new(choices.iter().cloned())
				.validate(text)
				.into(),
			Rule::Date { .. } => DateValidator::new().validate(text).into(),
			other => {
				return Err(RuleEvaluationError::InvalidRule {
					rule: other.kind(),
					reason: "not applicable to text values".to_string(),
				});
			}
		};
		Ok(verdict)
	}

	fn is_empty(&self, value: &Value) -> bool {
		is_blank(value, self.strip_whitespace)
	}
}

#[async_trait]
impl RuleEvaluator for BuiltinEvaluator {
	async fn evaluate(
		&self,
		rule: &Rule,
		value: &Value,
	) -> Result<RuleVerdict, RuleEvaluationError> {
		self.evaluate_boxed(rule, value).await
	}
}

fn override_message(rule: &Rule, verdict: RuleVerdict) -> RuleVerdict {
	match (verdict, rule.message()) {
		(RuleVerdict::Fail(_), Some(message)) => RuleVerdict::Fail(message.to_string()),
		(verdict, _) => verdict,
	}
}

fn as_text(value: &Value) -> Option<Cow<'_, str>> {
	match value {
		Value::String(s) => Some(Cow::Borrowed(s.as_str())),
		Value::Number(n) => Some(Cow::Owned(n.to_string())),
		Value::Bool(b) => Some(Cow::Owned(b.to_string())),
		Value::Null => Some(Cow::Borrowed("")),
		Value::Array(_) | Value::Object(_) => None,
	}
}

fn as_number(value: &Value) -> Option<f64> {
	let number = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	// "NaN" and "inf" parse as f64 but slip past both bounds.
	number.filter(|n| n.is_finite())
}

/// Whether `value` counts as empty for the `required` check.
fn is_blank(value: &Value, strip_whitespace: bool) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => {
			let validator = if strip_whitespace {
				RequiredValidator::new()
			} else {
				RequiredValidator::new().no_strip()
			};
			validator.validate(s.as_str()).is_err()
		}
		_ => false,
	}
}
