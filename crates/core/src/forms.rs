//! Submitted-form values plus the per-field messages collected while checking them.
//!
//! A [`FormData`] is built from the decoded request body, run through the
//! checks a page needs, and (when invalid) handed back to the template so the
//! form can be re-rendered with the user's input and the messages in place.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

pub const MSG_BLANK: &str = "This field cannot be blank";
pub const MSG_INVALID: &str = "This field is invalid";
pub const MSG_NUL: &str = "This field contains characters that are not allowed";

/// Field name to list of messages. Serializes as a plain map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// First message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormData {
    pub values: BTreeMap<String, String>,
    pub errors: FormErrors,
}

impl FormData {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            errors: FormErrors::default(),
        }
    }

    /// Raw submitted value, or `""` when the field was absent.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Drop a value so it is never echoed back into a rendered page.
    pub fn forget(&mut self, field: &str) {
        self.values.remove(field);
    }

    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if self.get(field).trim().is_empty() {
                self.errors.add(field, MSG_BLANK);
            }
        }
    }

    /// Postgres text columns cannot hold U+0000, so it is rejected up front.
    pub fn no_nul(&mut self, fields: &[&str]) {
        for field in fields {
            if self.get(field).contains('\0') {
                self.errors.add(field, MSG_NUL);
            }
        }
    }

    /// Length limits count Unicode code points, not bytes.
    pub fn max_chars(&mut self, field: &str, max: usize) {
        let value = self.get(field);
        if !value.is_empty() && value.chars().count() > max {
            self.errors.add(
                field,
                format!("This field is too long (maximum is {max} characters)"),
            );
        }
    }

    pub fn min_chars(&mut self, field: &str, min: usize) {
        let value = self.get(field);
        if !value.is_empty() && value.chars().count() < min {
            self.errors.add(
                field,
                format!("This field is too short (minimum is {min} characters)"),
            );
        }
    }

    pub fn permitted_values(&mut self, field: &str, options: &[&str]) {
        let value = self.get(field);
        if !value.is_empty() && !options.contains(&value) {
            self.errors.add(field, MSG_INVALID);
        }
    }

    pub fn matches_pattern(&mut self, field: &str, pattern: &Regex) {
        let value = self.get(field);
        if !value.is_empty() && !pattern.is_match(value) {
            self.errors.add(field, MSG_INVALID);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
