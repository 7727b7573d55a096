//! HTML rendering
//!
//! Rendering works on [`FormMetadata`], never on the form itself, so any
//! presentation layer can be swapped in by implementing [`Renderer`].

use crate::field::{SelectOption, Widget};
use crate::metadata::{FieldMetadata, FormMetadata};
use serde_json::Value;
use std::fmt::Write;

/// Turns form metadata into markup.
pub trait Renderer {
	fn render(&self, form: &FormMetadata) -> String;
}

/// Renders a `<form>` with one labelled input per field and a submit button.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
	submit_label: String,
}

impl Default for HtmlRenderer {
	fn default() -> Self {
		Self::new()
	}
}

impl HtmlRenderer {
	pub fn new() -> Self {
		Self {
			submit_label: "Submit".to_string(),
		}
	}

	pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
		self.submit_label = label.into();
		self
	}

	/// Render a single field: label, widget and error list
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{FieldMetadata, HtmlRenderer, Widget};
	/// use serde_json::json;
	///
	/// let field = FieldMetadata {
	///     name: "city".to_string(),
	///     label: "City".to_string(),
	///     widget: Widget::TextInput,
	///     value: json!("<Paris>"),
	///     options: None,
	///     errors: vec![],
	///     required: true,
	///     rule: None,
	/// };
	///
	/// let html = HtmlRenderer::new().render_field(&field);
	/// assert!(html.contains(r#"<label for="id_city">City</label>"#));
	/// assert!(html.contains(r#"value="&lt;Paris&gt;""#));
	/// ```
	pub fn render_field(&self, field: &FieldMetadata) -> String {
		let id = format!("id_{}", field.name);
		let mut html = String::from(r#"<div class="field">"#);

		let _ = write!(
			html,
			r#"<label for="{}">{}</label>"#,
			escape_attribute(&id),
			escape_html(&field.label)
		);
		html.push_str(&self.render_widget(field, &id));

		if field.has_errors() {
			html.push_str(r#"<ul class="errorlist">"#);
			for error in &field.errors {
				let _ = write!(html, "<li>{}</li>", escape_html(error));
			}
			html.push_str("</ul>");
		}

		html.push_str("</div>");
		html
	}

	fn render_widget(&self, field: &FieldMetadata, id: &str) -> String {
		let name = escape_attribute(&field.name);
		let id = escape_attribute(id);
		let required = if field.required { " required" } else { "" };

		match field.widget {
			Widget::CheckboxInput => {
				let checked = if is_checked(&field.value) { " checked" } else { "" };
				format!(r#"<input type="checkbox" name="{name}" id="{id}"{checked} />"#)
			}
			Widget::Textarea => format!(
				r#"<textarea name="{name}" id="{id}"{required}>{}</textarea>"#,
				escape_html(&value_text(&field.value))
			),
			Widget::Select => {
				let current = value_text(&field.value);
				let options = field.options.as_deref().unwrap_or_default();
				let mut html = format!(r#"<select name="{name}" id="{id}"{required}>"#);
				for option in options {
					html.push_str(&render_option(option, &current));
				}
				html.push_str("</select>");
				html
			}
			Widget::TextInput | Widget::NumberInput | Widget::DateInput => {
				let input_type = field.widget.input_type().unwrap_or("text");
				format!(
					r#"<input type="{input_type}" name="{name}" id="{id}" value="{}"{required} />"#,
					escape_attribute(&value_text(&field.value))
				)
			}
		}
	}
}

impl Renderer for HtmlRenderer {
	fn render(&self, form: &FormMetadata) -> String {
		let mut html = String::from("<form>");
		for field in &form.fields {
			html.push_str(&self.render_field(field));
		}
		let _ = write!(
			html,
			r#"<button type="submit">{}</button></form>"#,
			escape_html(&self.submit_label)
		);
		html
	}
}

fn render_option(option: &SelectOption, current: &str) -> String {
	let selected = if option.value == current { " selected" } else { "" };
	format!(
		r#"<option value="{}"{}>{}</option>"#,
		escape_attribute(&option.value),
		selected,
		escape_html(&option.label)
	)
}

fn is_checked(value: &Value) -> bool {
	match value {
		Value::Bool(b) => *b,
		Value::String(s) => matches!(s.as_str(), "true" | "1" | "on"),
		_ => false,
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Escape text content
///
/// # Examples
///
/// ```
/// use dynaform_forms::render::escape_html;
///
/// assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	input
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Escape an attribute value, including line breaks.
pub fn escape_attribute(input: &str) -> String {
	escape_html(input).replace('\n', "&#10;").replace('\r', "&#13;")
}
