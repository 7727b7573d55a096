//! Serializable form metadata for presentation layers
//!
//! [`FormMetadata`] carries everything a presentation layer needs to draw the
//! form: per-field widget, label, current value, options and the errors
//! recorded by the last submission. It serializes to JSON so the same
//! structure can be shipped to a client-side renderer.

use crate::field::{SelectOption, Widget};
use crate::form::{DynamicForm, FieldFailure};
use crate::rules::Rule;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMetadata {
	/// Fields in schema order
	pub fields: Vec<FieldMetadata>,
	/// All recorded failures in schema order
	pub errors: Vec<FieldFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
	pub name: String,
	/// Label to display; the field name when the schema declares none
	pub label: String,
	pub widget: Widget,
	pub value: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options: Option<Vec<SelectOption>>,
	#[serde(default)]
	pub errors: Vec<String>,
	/// Whether an empty value is rejected on submit
	pub required: bool,
	/// Declared rule, for client-side feedback
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rule: Option<Rule>,
}

impl FieldMetadata {
	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}
}

/// Extract serializable metadata from a form.
pub trait FormExt {
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{DynamicForm, FieldDescriptor, FormExt, Schema, Widget};
	///
	/// let schema = Schema::new(vec![
	///     FieldDescriptor::text("email").with_label("Email"),
	///     FieldDescriptor::checkbox("subscribe"),
	/// ]).unwrap();
	/// let form = DynamicForm::new(&schema, |_| {});
	///
	/// let metadata = form.to_metadata();
	/// assert_eq!(metadata.fields.len(), 2);
	/// assert_eq!(metadata.fields[0].label, "Email");
	/// assert_eq!(metadata.fields[1].widget, Widget::CheckboxInput);
	/// ```
	fn to_metadata(&self) -> FormMetadata;
}

impl FormExt for DynamicForm<'_> {
	fn to_metadata(&self) -> FormMetadata {
		let fields = self
			.schema()
			.fields()
			.iter()
			.map(|field| FieldMetadata {
				name: field.name.clone(),
				label: field.display_label().to_string(),
				widget: field.kind.widget(),
				value: self
					.value(&field.name)
					.cloned()
					.unwrap_or_else(|| field.kind.empty_value()),
				options: field.kind.options().map(<[SelectOption]>::to_vec),
				errors: self
					.field_errors(&field.name)
					.into_iter()
					.map(str::to_string)
					.collect(),
				required: field.rule.as_ref().is_none_or(Rule::is_required),
				rule: field.rule.clone(),
			})
			.collect();

		FormMetadata {
			fields,
			errors: self.errors().to_vec(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::BuiltinEvaluator;
	use crate::schema::{FieldDescriptor, Schema};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_required_flag_follows_rule() {
		let schema = Schema::new(vec![
			FieldDescriptor::text("name"),
			FieldDescriptor::text("email").with_rule(Rule::email()),
			FieldDescriptor::checkbox("terms").with_rule(Rule::accepted()),
		])
		.unwrap();
		let form = DynamicForm::new(&schema, |_| {});

		let required: Vec<bool> = form.to_metadata().fields.iter().map(|f| f.required).collect();
		assert_eq!(required, vec![true, false, true]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_errors_are_attached_to_fields() {
		let schema = Schema::new(vec![FieldDescriptor::text("a"), FieldDescriptor::text("b")]).unwrap();
		let mut form = DynamicForm::new(&schema, |_| {});
		form.set_value("b", "filled").unwrap();
		form.submit(&BuiltinEvaluator::new()).await;

		let metadata = form.to_metadata();
		assert_eq!(metadata.fields[0].errors, vec!["This field is required"]);
		assert!(!metadata.fields[1].has_errors());
		assert_eq!(metadata.errors, vec![FieldFailure::new("a", "This field is required")]);
	}

	#[rstest]
	fn test_metadata_serialization() {
		let schema = Schema::new(vec![FieldDescriptor::text("city").with_default("Lyon")]).unwrap();
		let form = DynamicForm::new(&schema, |_| {});

		let value = serde_json::to_value(form.to_metadata()).unwrap();
		assert_eq!(
			value,
			json!({
				"fields": [{
					"name": "city",
					"label": "city",
					"widget": "TextInput",
					"value": "Lyon",
					"errors": [],
					"required": true
				}],
				"errors": []
			})
		);
	}
}
