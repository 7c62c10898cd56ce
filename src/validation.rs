//! Request validation.
//!
//! Payloads implement [`Validate`] and report every offending field at once;
//! the API layer turns the result into a 400 response.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered collection of field errors, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_messages(.errors))]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Records "<field> is required" for blank values. Returns whether the value was present.
    pub fn require(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", field));
            false
        } else {
            true
        }
    }

    pub fn max_chars(&mut self, field: &'static str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.add(
                    field,
                    format!("{} must be at most {} characters", field, max),
                );
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_flags_blank_values() {
        let mut errors = FieldErrors::new();
        assert!(errors.require("title", "Resume"));
        assert!(!errors.require("body", "   "));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first_message(), Some("body is required"));
    }

    #[test]
    fn test_max_chars_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        errors.max_chars("title", Some("자기소개서"), 5);
        assert!(errors.is_empty());

        errors.max_chars("title", Some("자기소개서 제목"), 5);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = FieldErrors::new();
        errors.add("a", "a is required");
        errors.add("b", "b is too long");
        assert_eq!(
            errors.to_string(),
            "validation failed: a is required; b is too long"
        );

        let boxed: Box<dyn std::error::Error> = Box::new(errors.clone());
        assert!(boxed.source().is_none());
        assert!(errors.into_result().is_err());
    }
}
