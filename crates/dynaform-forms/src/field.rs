//! Field kinds, widgets and field-level errors
//!
//! Every input a schema can declare is one variant of the closed
//! [`FieldKind`] sum type. The kind is consulted in exactly two places:
//! when a value is written into the form state ([`FieldKind::coerce`]) and
//! when the field is handed to a presentation layer ([`FieldKind::widget`]).
//! Adding a new kind is therefore a compile-checked change to those two
//! matches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
	#[error("Invalid value: {0}")]
	Invalid(String),
	#[error("Expected {expected}, found {found}")]
	TypeMismatch {
		expected: &'static str,
		found: &'static str,
	},
}

pub type FieldResult<T> = Result<T, FieldError>;

/// One entry of a select field's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
}

impl SelectOption {
	/// Create an option
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::SelectOption;
	///
	/// let option = SelectOption::new("pro", "Professional");
	/// assert_eq!(option.value, "pro");
	/// assert_eq!(option.label, "Professional");
	/// ```
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// The kind of input a field renders as and the value type it holds.
///
/// Serialized with a `type` tag so that a JSON schema entry reads
/// `{"name": "plan", "type": "select", "options": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
	Text,
	#[serde(rename = "textarea")]
	TextArea,
	Number,
	Checkbox,
	Date,
	Select {
		#[serde(default)]
		options: Vec<SelectOption>,
	},
}

/// Widget used by a presentation layer to draw a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Widget {
	TextInput,
	Textarea,
	NumberInput,
	CheckboxInput,
	DateInput,
	Select,
}

impl Widget {
	/// Value of the `type` attribute for `<input>` based widgets.
	pub fn input_type(&self) -> Option<&'static str> {
		match self {
			Widget::TextInput => Some("text"),
			Widget::NumberInput => Some("number"),
			Widget::CheckboxInput => Some("checkbox"),
			Widget::DateInput => Some("date"),
			Widget::Textarea | Widget::Select => None,
		}
	}
}

impl FieldKind {
	pub fn type_name(&self) -> &'static str {
		match self {
			FieldKind::Text => "text",
			FieldKind::TextArea => "textarea",
			FieldKind::Number => "number",
			FieldKind::Checkbox => "checkbox",
			FieldKind::Date => "date",
			FieldKind::Select { .. } => "select",
		}
	}

	pub fn widget(&self) -> Widget {
		match self {
			FieldKind::Text => Widget::TextInput,
			FieldKind::TextArea => Widget::Textarea,
			FieldKind::Number => Widget::NumberInput,
			FieldKind::Checkbox => Widget::CheckboxInput,
			FieldKind::Date => Widget::DateInput,
			FieldKind::Select { .. } => Widget::Select,
		}
	}

	/// Options of a select field, `None` for every other kind.
	pub fn options(&self) -> Option<&[SelectOption]> {
		match self {
			FieldKind::Select { options } => Some(options),
			_ => None,
		}
	}

	/// Value a field of this kind starts with when the schema declares no default.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::FieldKind;
	/// use serde_json::json;
	///
	/// assert_eq!(FieldKind::Text.empty_value(), json!(""));
	/// assert_eq!(FieldKind::Checkbox.empty_value(), json!(false));
	/// ```
	pub fn empty_value(&self) -> Value {
		match self {
			FieldKind::Checkbox => Value::Bool(false),
			_ => Value::String(String::new()),
		}
	}

	/// Convert an incoming value to the representation this kind stores.
	///
	/// Coercion never validates: an out-of-range number, an unknown select
	/// value or a malformed date are all kept as-is. Only values that have no
	/// sensible representation for the kind (arrays, objects, or a number for
	/// a checkbox) are rejected.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::FieldKind;
	/// use serde_json::json;
	///
	/// assert_eq!(FieldKind::Checkbox.coerce(json!("on")).unwrap(), json!(true));
	/// assert_eq!(FieldKind::Number.coerce(json!("42")).unwrap(), json!(42));
	/// assert_eq!(FieldKind::Number.coerce(json!("4x")).unwrap(), json!("4x"));
	/// assert_eq!(FieldKind::Text.coerce(json!(7)).unwrap(), json!("7"));
	/// assert!(FieldKind::Text.coerce(json!(["a"])).is_err());
	/// ```
	pub fn coerce(&self, value: Value) -> FieldResult<Value> {
		match (self, value) {
			(_, Value::Null) => Ok(self.empty_value()),
			(_, value @ (Value::Array(_) | Value::Object(_))) => Err(self.mismatch(&value)),

			(FieldKind::Checkbox, Value::Bool(b)) => Ok(Value::Bool(b)),
			(FieldKind::Checkbox, Value::String(s)) => match s.trim() {
				"true" | "on" | "1" => Ok(Value::Bool(true)),
				"false" | "off" | "0" | "" => Ok(Value::Bool(false)),
				_ => Err(FieldError::Invalid(format!(
					"'{}' is not a checkbox state",
					s
				))),
			},
			(FieldKind::Checkbox, value) => Err(self.mismatch(&value)),

			(FieldKind::Number, Value::Number(n)) => Ok(Value::Number(n)),
			(FieldKind::Number, Value::String(s)) => Ok(parse_number(&s).unwrap_or(Value::String(s))),
			(FieldKind::Number, value) => Err(self.mismatch(&value)),

			(_, Value::String(s)) => Ok(Value::String(s)),
			(_, Value::Number(n)) => Ok(Value::String(n.to_string())),
			(_, Value::Bool(b)) => Ok(Value::String(b.to_string())),
		}
	}

	fn mismatch(&self, value: &Value) -> FieldError {
		let expected = match self {
			FieldKind::Checkbox => "boolean",
			FieldKind::Number => "number",
			_ => "string",
		};
		FieldError::TypeMismatch {
			expected,
			found: json_type_name(value),
		}
	}
}

fn parse_number(s: &str) -> Option<Value> {
	let trimmed = s.trim();
	if let Ok(i) = trimmed.parse::<i64>() {
		return Some(Value::from(i));
	}
	trimmed
		.parse::<f64>()
		.ok()
		.and_then(serde_json::Number::from_f64)
		.map(Value::Number)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
