//! Submitted form data with accumulated field errors.
//!
//! A [`Form`] is built fresh for every request from the posted key/value
//! pairs. Checks record at most one message per field: the first failing
//! check wins and later failures on the same field are dropped.

use std::collections::HashMap;

use serde::Serialize;
use validator::ValidateEmail;

/// Field name → first recorded error message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(HashMap<String, String>);

impl FormErrors {
    /// Record `message` against `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// The message recorded for `field`, or `""` when there is none.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Form {
    values: HashMap<String, Vec<String>>,
    pub errors: FormErrors,
}

impl Form {
    pub fn new(values: HashMap<String, Vec<String>>) -> Self {
        Self {
            values,
            errors: FormErrors::default(),
        }
    }

    /// Build from decoded `key=value` pairs; repeated keys keep every value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in pairs {
            values.entry(k.into()).or_default().push(v.into());
        }
        Self::new(values)
    }

    /// First submitted value for `field`, or `""`.
    pub fn get(&self, field: &str) -> &str {
        self.values
            .get(field)
            .and_then(|v| v.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Present and non-blank after trimming.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).trim().is_empty()
    }

    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if !self.has(field) {
                self.errors.add(field, "This field cannot be blank");
            }
        }
    }

    /// Records an error when the trimmed value is shorter than `min`
    /// characters. A missing field counts as length 0.
    pub fn min_length(&mut self, field: &str, min: usize) -> bool {
        let len = self.get(field).trim().chars().count();
        if len < min {
            self.errors.add(
                field,
                format!("This field must be at least {} characters long", min),
            );
            return false;
        }
        true
    }

    /// Validates address syntax when the field is present. Pair with
    /// [`required`](Self::required) to reject a missing address.
    pub fn is_email(&mut self, field: &str) {
        if !self.has(field) {
            return;
        }
        let value = self.get(field).trim().to_string();
        if !value.validate_email() {
            self.errors.add(field, "Invalid email address");
        }
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}
