//! Site domain model.
//!
//! # Invariants
//! - `name` is non-empty, at most `NAME_MAX_CHARS` characters, without spaces.
//! - `description` is at most `DESCRIPTION_MAX_CHARS` characters.
//! - Lengths count Unicode scalar values, not bytes. A name of 100 `é` is
//!   accepted even though it is 200 bytes of UTF-8; byte-counting stores
//!   such as jansson's `json_string_length` would reject it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Maximum length of a site name, in characters.
pub const NAME_MAX_CHARS: usize = 128;
/// Maximum length of a site description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 512;

/// Persisted site as returned by list/get.
///
/// A `NULL` description in storage is read back as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub description: String,
}

impl Site {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Insert payload for a site that passed `Create` validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSite {
    pub name: String,
    /// Persisted only when present; absent descriptions stay `NULL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewSite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Extracts the insert payload from a JSON candidate.
    ///
    /// Returns `None` when the candidate is not an object or `name` is not a
    /// string. Non-string descriptions are dropped; run validation first.
    pub fn from_candidate(candidate: &Value) -> Option<Self> {
        let object = candidate.as_object()?;
        let name = object.get("name")?.as_str()?;
        Some(Self {
            name: name.to_string(),
            description: object
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Update payload; the site key is supplied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUpdate {
    #[serde(default)]
    pub description: Option<String>,
}

impl SiteUpdate {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }

    /// Extracts the update payload from a JSON candidate.
    ///
    /// Returns `None` when the candidate is not an object.
    pub fn from_candidate(candidate: &Value) -> Option<Self> {
        let object = candidate.as_object()?;
        Some(Self {
            description: object
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Value written to storage: absent descriptions become `""`.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Which rule set a candidate is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// New site: `name` and optional `description`, plus the uniqueness check.
    Create,
    /// Existing site: mandatory `description` only.
    Update,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field (`name`, `description`, or `site` for the whole payload).
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldError, NewSite, SiteUpdate};
    use serde_json::json;

    #[test]
    fn new_site_from_candidate_keeps_optional_description() {
        let with = NewSite::from_candidate(&json!({"name": "alpha", "description": "first"}))
            .expect("object with string name should convert");
        assert_eq!(with, NewSite::new("alpha").with_description("first"));

        let without = NewSite::from_candidate(&json!({"name": "beta"}))
            .expect("object with string name should convert");
        assert_eq!(without.description, None);
    }

    #[test]
    fn new_site_from_candidate_rejects_non_objects_and_missing_names() {
        assert!(NewSite::from_candidate(&json!("alpha")).is_none());
        assert!(NewSite::from_candidate(&json!({"description": "x"})).is_none());
        assert!(NewSite::from_candidate(&json!({"name": 7})).is_none());
    }

    #[test]
    fn site_update_defaults_missing_description_to_empty() {
        let update = SiteUpdate::from_candidate(&json!({})).expect("object should convert");
        assert_eq!(update.description_or_empty(), "");
        assert_eq!(SiteUpdate::new("x").description_or_empty(), "x");
    }

    #[test]
    fn field_error_display_is_field_then_message() {
        let err = FieldError::new("name", "name already exists");
        assert_eq!(err.to_string(), "name: name already exists");
    }
}
