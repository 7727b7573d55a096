//! Field descriptors and the schema that orders them

use crate::field::{FieldError, FieldKind, SelectOption};
use crate::rules::Rule;
use crate::settings::{DuplicateNamePolicy, FormSettings};
use crate::state::FormState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
	#[error("Field name must not be empty (position {0})")]
	EmptyName(usize),
	#[error("Duplicate field name: {0}")]
	DuplicateName(String),
	#[error("Select field {0} declares no options")]
	MissingOptions(String),
	#[error("Select field {field} declares option {value} more than once")]
	DuplicateOption { field: String, value: String },
	#[error("Invalid default for field {field}: {reason}")]
	InvalidDefault { field: String, reason: String },
	#[error("Failed to parse schema: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Describes one input of a form.
///
/// In serialized form the default value is stored under `value` and the
/// rule under `validation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(flatten)]
	pub kind: FieldKind,
	#[serde(default, rename = "value", skip_serializing_if = "Option::is_none")]
	pub default: Option<Value>,
	#[serde(default, rename = "validation", skip_serializing_if = "Option::is_none")]
	pub rule: Option<Rule>,
}

impl FieldDescriptor {
	/// Create a descriptor of the given kind
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{FieldDescriptor, FieldKind, Rule};
	///
	/// let field = FieldDescriptor::new("email", FieldKind::Text)
	///     .with_label("Email")
	///     .with_rule(Rule::email());
	/// assert_eq!(field.name, "email");
	/// assert_eq!(field.display_label(), "Email");
	/// ```
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			label: None,
			kind,
			default: None,
			rule: None,
		}
	}

	pub fn text(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Text)
	}

	pub fn textarea(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::TextArea)
	}

	pub fn number(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Number)
	}

	pub fn checkbox(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Checkbox)
	}

	pub fn date(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Date)
	}

	pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
		Self::new(name, FieldKind::Select { options })
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_default(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());
		self
	}

	pub fn with_rule(mut self, rule: Rule) -> Self {
		self.rule = Some(rule);
		self
	}

	/// Label to show, falling back to the field name.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.name)
	}

	/// Initial state value: the declared default, or the kind's empty value.
	pub fn initial_value(&self) -> Value {
		self.default
			.clone()
			.unwrap_or_else(|| self.kind.empty_value())
	}

	/// Check the descriptor and normalize its default to the kind's representation.
	fn checked(mut self, position: usize) -> Result<Self, SchemaError> {
		if self.name.trim().is_empty() {
			return Err(SchemaError::EmptyName(position));
		}

		if let FieldKind::Select { options } = &self.kind {
			if options.is_empty() {
				return Err(SchemaError::MissingOptions(self.name));
			}
			let mut seen = HashSet::new();
			for option in options {
				if !seen.insert(option.value.as_str()) {
					return Err(SchemaError::DuplicateOption {
						field: self.name.clone(),
						value: option.value.clone(),
					});
				}
			}
		}

		if let Some(default) = self.default.take() {
			let coerced = self
				.kind
				.coerce(default)
				.map_err(|e| self.invalid_default(e))?;
			if let (Some(options), Some(value)) = (self.kind.options(), coerced.as_str())
				&& !value.is_empty()
				&& !options.iter().any(|o| o.value == value)
			{
				return Err(SchemaError::InvalidDefault {
					field: self.name.clone(),
					reason: format!("{} is not one of the declared options", value),
				});
			}
			self.default = Some(coerced);
		}

		Ok(self)
	}

	fn invalid_default(&self, error: FieldError) -> SchemaError {
		SchemaError::InvalidDefault {
			field: self.name.clone(),
			reason: error.to_string(),
		}
	}
}

/// Ordered, validated sequence of field descriptors.
///
/// A `Schema` can only be obtained through [`Schema::new`],
/// [`Schema::with_policy`] or deserialization, all of which run the same
/// checks, so every descriptor in it is well formed and names are unique.
/// Plain deserialization rejects duplicate names; use
/// [`Schema::from_json_with_settings`] to apply a configured policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDescriptor>", into = "Vec<FieldDescriptor>")]
pub struct Schema {
	fields: Vec<FieldDescriptor>,
}

impl Schema {
	/// Build a schema, rejecting duplicate names
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{FieldDescriptor, Schema, SchemaError};
	///
	/// let schema = Schema::new(vec![FieldDescriptor::text("name")]).unwrap();
	/// assert_eq!(schema.len(), 1);
	///
	/// let duplicate = Schema::new(vec![FieldDescriptor::text("a"), FieldDescriptor::text("a")]);
	/// assert!(matches!(duplicate, Err(SchemaError::DuplicateName(name)) if name == "a"));
	/// ```
	pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
		Self::with_policy(fields, DuplicateNamePolicy::Reject)
	}

	pub fn with_policy(
		fields: Vec<FieldDescriptor>,
		policy: DuplicateNamePolicy,
	) -> Result<Self, SchemaError> {
		let mut checked: Vec<FieldDescriptor> = Vec::with_capacity(fields.len());
		let mut positions: HashMap<String, usize> = HashMap::new();

		for (position, field) in fields.into_iter().enumerate() {
			let field = field.checked(position)?;
			match positions.get(&field.name) {
				None => {
					positions.insert(field.name.clone(), checked.len());
					checked.push(field);
				}
				Some(_) if policy == DuplicateNamePolicy::Reject => {
					return Err(SchemaError::DuplicateName(field.name));
				}
				Some(&index) => {
					tracing::warn!(field = %field.name, "duplicate field name, keeping the last descriptor");
					checked[index] = field;
				}
			}
		}

		tracing::debug!(fields = checked.len(), "schema built");
		Ok(Self { fields: checked })
	}

	/// Parse a JSON array of descriptors
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{FieldKind, Schema};
	///
	/// let schema = Schema::from_json(r#"[
	///     {"name": "subscribe", "label": "Subscribe", "type": "checkbox"},
	///     {"name": "plan", "type": "select", "value": "free",
	///      "options": [{"value": "free", "label": "Free"}]}
	/// ]"#).unwrap();
	///
	/// assert_eq!(schema.fields()[0].kind, FieldKind::Checkbox);
	/// assert_eq!(schema.get("plan").unwrap().display_label(), "plan");
	/// ```
	pub fn from_json(source: &str) -> Result<Self, SchemaError> {
		Self::from_json_with_policy(source, DuplicateNamePolicy::Reject)
	}

	pub fn from_json_with_policy(
		source: &str,
		policy: DuplicateNamePolicy,
	) -> Result<Self, SchemaError> {
		let fields: Vec<FieldDescriptor> = serde_json::from_str(source)?;
		Self::with_policy(fields, policy)
	}

	/// Parse a JSON array of descriptors, resolving duplicate names as
	/// `settings.duplicate_names` says
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{FormSettings, Schema};
	///
	/// let source = r#"[{"name": "a", "type": "text"}, {"name": "a", "type": "number"}]"#;
	/// let settings = FormSettings::from_toml_str(r#"duplicate_names = "last_wins""#).unwrap();
	///
	/// assert!(Schema::from_json_with_settings(source, &FormSettings::default()).is_err());
	/// assert_eq!(Schema::from_json_with_settings(source, &settings).unwrap().len(), 1);
	/// ```
	pub fn from_json_with_settings(
		source: &str,
		settings: &FormSettings,
	) -> Result<Self, SchemaError> {
		Self::from_json_with_policy(source, settings.duplicate_names)
	}

	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|f| f.name.as_str())
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Derive the initial form state: every field mapped to its default.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{FieldDescriptor, Schema};
	/// use serde_json::json;
	///
	/// let schema = Schema::new(vec![
	///     FieldDescriptor::text("name"),
	///     FieldDescriptor::text("city").with_default("Paris"),
	///     FieldDescriptor::checkbox("subscribe"),
	/// ]).unwrap();
	///
	/// let state = schema.initial_state();
	/// assert_eq!(state.get("name"), Some(&json!("")));
	/// assert_eq!(state.get("city"), Some(&json!("Paris")));
	/// assert_eq!(state.get("subscribe"), Some(&json!(false)));
	/// ```
	pub fn initial_state(&self) -> FormState {
		self.fields
			.iter()
			.map(|field| (field.name.clone(), field.initial_value()))
			.collect()
	}
}

impl TryFrom<Vec<FieldDescriptor>> for Schema {
	type Error = SchemaError;

	fn try_from(fields: Vec<FieldDescriptor>) -> Result<Self, Self::Error> {
		Self::new(fields)
	}
}

impl From<Schema> for Vec<FieldDescriptor> {
	fn from(schema: Schema) -> Self {
		schema.fields
	}
}

impl<'a> IntoIterator for &'a Schema {
	type Item = &'a FieldDescriptor;
	type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.iter()
	}
}
