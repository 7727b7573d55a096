//! Engine settings
//!
//! Settings are plain data with a default for every key, so a TOML file only
//! needs to name what it changes:
//!
//! ```toml
//! required_message = "Please fill in this field"
//! check_select_options = false
//! duplicate_names = "last_wins"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rules::DEFAULT_REQUIRED_MESSAGE;

/// What a schema does when two descriptors share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
	/// Building the schema fails with `SchemaError::DuplicateName`.
	#[default]
	Reject,
	/// The later descriptor replaces the earlier one, keeping the earlier position.
	LastWins,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to read settings file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
	/// Message reported by the implicit rule of fields that declare none.
	pub required_message: String,
	/// Reject select values that are not among the declared options.
	pub check_select_options: bool,
	pub duplicate_names: DuplicateNamePolicy,
	/// Whitespace-only text counts as empty for required checks.
	pub strip_whitespace: bool,
	/// Emit a `warn` event for every failing field on submit.
	pub log_failures: bool,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
			check_select_options: true,
			duplicate_names: DuplicateNamePolicy::Reject,
			strip_whitespace: true,
			log_failures: true,
		}
	}
}

impl FormSettings {
	/// Parse settings from a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::{DuplicateNamePolicy, FormSettings};
	///
	/// let settings = FormSettings::from_toml_str(r#"duplicate_names = "last_wins""#).unwrap();
	/// assert_eq!(settings.duplicate_names, DuplicateNamePolicy::LastWins);
	/// assert!(settings.check_select_options);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = std::fs::read_to_string(path.as_ref())?;
		let settings = Self::from_toml_str(&source)?;
		tracing::debug!(path = %path.as_ref().display(), "loaded form settings");
		Ok(settings)
	}

	pub fn with_required_message(mut self, message: impl Into<String>) -> Self {
		self.required_message = message.into();
		self
	}

	pub fn with_select_option_check(mut self, enabled: bool) -> Self {
		self.check_select_options = enabled;
		self
	}

	pub fn with_duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
		self.duplicate_names = policy;
		self
	}

	pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
		self.strip_whitespace = strip;
		self
	}

	pub fn with_log_failures(mut self, enabled: bool) -> Self {
		self.log_failures = enabled;
		self
	}
}
