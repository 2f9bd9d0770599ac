//! Structural validation of site candidates.
//!
//! # Responsibility
//! - Check a JSON candidate against the `Create` or `Update` rule set.
//! - Report every violated rule, not only the first one.
//!
//! # Invariants
//! - Pure: no storage access. The `Create` uniqueness read is composed on
//!   top of this by `SiteService::validate`.
//! - A non-object candidate yields exactly one `site` error.

use crate::model::site::{FieldError, ValidationMode, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};
use serde_json::Value;

pub const FIELD_SITE: &str = "site";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";

pub const MSG_NOT_AN_OBJECT: &str = "site must be a json object";
pub const MSG_NAME_EXISTS: &str = "name already exists";
pub const MSG_NAME_INVALID: &str =
    "name must be a non empty string of maximum 128 characters, without space characters";
pub const MSG_DESCRIPTION_OPTIONAL: &str =
    "description is optional and must be a string of maximum 512 characters";
pub const MSG_DESCRIPTION_MANDATORY: &str =
    "description is mandatory and must be a string of maximum 512 characters";

/// Runs the structural rules for `mode` and returns all field errors.
///
/// An empty vector means the candidate is structurally valid.
pub fn check_site(candidate: &Value, mode: ValidationMode) -> Vec<FieldError> {
    let Some(object) = candidate.as_object() else {
        return vec![FieldError::new(FIELD_SITE, MSG_NOT_AN_OBJECT)];
    };

    let mut errors = Vec::new();
    match mode {
        ValidationMode::Create => {
            if !is_valid_name(object.get(FIELD_NAME)) {
                errors.push(FieldError::new(FIELD_NAME, MSG_NAME_INVALID));
            }
            if object.contains_key(FIELD_DESCRIPTION)
                && !is_valid_description(object.get(FIELD_DESCRIPTION))
            {
                errors.push(FieldError::new(FIELD_DESCRIPTION, MSG_DESCRIPTION_OPTIONAL));
            }
        }
        ValidationMode::Update => {
            if !is_valid_description(object.get(FIELD_DESCRIPTION)) {
                errors.push(FieldError::new(
                    FIELD_DESCRIPTION,
                    MSG_DESCRIPTION_MANDATORY,
                ));
            }
        }
    }
    errors
}

/// Returns the candidate `name` when it is a JSON string.
///
/// Only string names are looked up for uniqueness.
pub fn candidate_name(candidate: &Value) -> Option<&str> {
    candidate
        .as_object()
        .and_then(|object| object.get(FIELD_NAME))
        .and_then(Value::as_str)
}

/// Non-empty, at most `NAME_MAX_CHARS` characters, no space character.
fn is_valid_site_name(name: &str) -> bool {
    let length = name.chars().count();
    (1..=NAME_MAX_CHARS).contains(&length) && !name.contains(' ')
}

fn is_valid_name(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(is_valid_site_name)
}

fn is_valid_description(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|description| description.chars().count() <= DESCRIPTION_MAX_CHARS)
}
