//! Form state

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Live mapping of field name to current value.
///
/// The state may hold values that would not pass validation; it is only
/// checked on submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
	values: HashMap<String, Value>,
}

impl FormState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.values.get(field)
	}

	/// Store a value, returning the one it replaced.
	pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
		self.values.insert(field.into(), value)
	}

	pub fn contains(&self, field: &str) -> bool {
		self.values.contains_key(field)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn into_inner(self) -> HashMap<String, Value> {
		self.values
	}

	/// Render the state as a JSON object
	pub fn to_json(&self) -> Value {
		Value::Object(
			self.values
				.iter()
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect(),
		)
	}
}

impl FromIterator<(String, Value)> for FormState {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}

impl From<HashMap<String, Value>> for FormState {
	fn from(values: HashMap<String, Value>) -> Self {
		Self { values }
	}
}

/// A single edit applied by [`DynamicForm::set_value`](crate::DynamicForm::set_value).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
	pub field: String,
	pub old: Value,
	pub new: Value,
}
