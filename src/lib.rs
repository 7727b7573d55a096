//! # dynaform
//!
//! A schema-driven form engine.
//!
//! A form is described by a [`Schema`]: an ordered list of field descriptors,
//! each with a name, a label, a kind (text, textarea, number, checkbox, date or
//! select), an optional default value and an optional validation [`Rule`].
//! From that schema, a [`DynamicForm`]:
//!
//! 1. derives its initial state (every field mapped to its default, or the
//!    empty value of its kind),
//! 2. applies single-field edits, leaving every other field untouched and
//!    notifying change receivers,
//! 3. on submit, evaluates every field's rule without stopping at the first
//!    failure, and either forwards the values to the submit callback or
//!    reports every failure in schema order.
//!
//! Fields that declare no rule are required, with the message
//! `"This field is required"`.
//!
//! ## Crates
//!
//! - [`forms`] (`dynaform-forms`): schema, form, rules, metadata and rendering
//! - [`validators`] (`dynaform-validators`): the value-level checks behind the rules
//!
//! ## Quick Example
//!
//! ```
//! use dynaform::prelude::*;
//!
//! let schema = Schema::from_json(r#"[
//!     {"name": "email", "label": "Email", "type": "text",
//!      "validation": {"rule": "all", "rules": [
//!          {"rule": "required"},
//!          {"rule": "email", "message": "invalid format"}
//!      ]}},
//!     {"name": "subscribe", "label": "Subscribe", "type": "checkbox"}
//! ]"#).unwrap();
//!
//! let mut form = DynamicForm::new(&schema, |values| {
//!     println!("submitted {:?}", values);
//! });
//! form.set_value("email", "ada@example.com").unwrap();
//! form.set_value("subscribe", true).unwrap();
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let outcome = form.submit(&BuiltinEvaluator::new()).await;
//! assert!(outcome.is_submitted());
//! # });
//! ```

pub use dynaform_forms as forms;
pub use dynaform_validators as validators;

pub use dynaform_forms::{
	BuiltinEvaluator, ChangeSignal, CustomValidator, DuplicateNamePolicy, DynamicForm, FieldChange,
	FieldDescriptor, FieldError, FieldFailure, FieldKind, FieldMetadata, FormError, FormExt,
	FormMetadata, FormResult, FormSettings, FormState, HtmlRenderer, PendingSubmission, Renderer,
	Rule, RuleEvaluationError, RuleEvaluator, RuleVerdict, Schema, SchemaError, SelectOption,
	SettingsError, SubmissionResult, SubmitOutcome, ValidationOutcome, ValidatorRegistry, Widget,
};
pub use dynaform_validators::{ValidationError, ValidationResult, Validator};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::{
		BuiltinEvaluator, DynamicForm, FieldDescriptor, FieldFailure, FieldKind, FormExt,
		FormSettings, FormState, HtmlRenderer, Renderer, Rule, RuleEvaluator, RuleVerdict, Schema,
		SelectOption, SubmitOutcome, ValidationOutcome,
	};

	// External
	pub use async_trait::async_trait;
	pub use serde::{Deserialize, Serialize};
}
