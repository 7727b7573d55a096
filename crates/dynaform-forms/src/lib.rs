//! Schema-driven forms for dynaform
//!
//! This crate turns a declarative field schema into a live form:
//! - [`Schema`]: an ordered, checked list of [`FieldDescriptor`]s, buildable in
//!   code or parsed from JSON
//! - [`DynamicForm`]: initial state derived from the schema, single-field
//!   mutation with change notifications, and non-abort-early submit validation
//! - [`Rule`] and [`RuleEvaluator`]: the per-field rule vocabulary and the
//!   async seam that evaluates it, with [`BuiltinEvaluator`] as the default
//! - [`FormMetadata`] and [`HtmlRenderer`]: presentation data and markup
//! - [`FormSettings`]: engine options, loadable from TOML
//!
//! ## Example
//!
//! ```
//! use dynaform_forms::{
//!     BuiltinEvaluator, DynamicForm, FieldDescriptor, FieldFailure, Rule, Schema, SubmitOutcome,
//! };
//!
//! let schema = Schema::new(vec![
//!     FieldDescriptor::text("email")
//!         .with_label("Email")
//!         .with_rule(Rule::all(vec![Rule::required(), Rule::email().with_message("invalid format")])),
//!     FieldDescriptor::checkbox("subscribe"),
//! ])
//! .unwrap();
//!
//! let mut form = DynamicForm::new(&schema, |_values| {});
//! form.set_value("email", "x").unwrap();
//!
//! # futures::executor::block_on(async {
//! let outcome = form.submit(&BuiltinEvaluator::new()).await;
//! assert_eq!(
//!     outcome,
//!     SubmitOutcome::Invalid(vec![FieldFailure::new("email", "invalid format")])
//! );
//! # });
//! ```

pub mod field;
pub mod form;
pub mod metadata;
pub mod render;
pub mod rules;
pub mod schema;
pub mod settings;
pub mod signals;
pub mod state;

pub use field::{FieldError, FieldKind, FieldResult, SelectOption, Widget};
pub use form::{
	DynamicForm, FieldFailure, FormError, FormResult, PendingSubmission, SubmissionResult,
	SubmitOutcome, ValidationOutcome, validate_state,
};
pub use metadata::{FieldMetadata, FormExt, FormMetadata};
pub use render::{HtmlRenderer, Renderer};
pub use rules::{
	BuiltinEvaluator, CustomValidator, DEFAULT_REQUIRED_MESSAGE, Rule, RuleEvaluationError,
	RuleEvaluator, RuleVerdict, ValidatorRegistry,
};
pub use schema::{FieldDescriptor, Schema, SchemaError};
pub use settings::{DuplicateNamePolicy, FormSettings, SettingsError};
pub use signals::{ChangeSignal, ReceiverId};
pub use state::{FieldChange, FormState};
