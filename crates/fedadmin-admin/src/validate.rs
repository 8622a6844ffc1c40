//! Precondition checks on command inputs.
//!
//! Validators run before any store access. All checks for a request run
//! and every failure is collected; a request with at least one failure
//! never reaches its handler.

use std::fmt;

use serde::Serialize;

/// A single failed precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// The offending field.
    pub field: &'static str,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationFailure {
    /// Creates a failure for a field.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The collected failures of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    /// Every failed check, in declaration order.
    pub failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.failures.push(ValidationFailure::new(field, message));
    }

    /// Requires a string field to contain non-whitespace content.
    pub fn require_non_blank(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("The {field} can't be empty."));
        }
    }

    /// Requires a uuid field to be non-nil.
    pub fn require_non_nil(&mut self, field: &'static str, value: uuid::Uuid) {
        if value.is_nil() {
            self.add(field, format!("The {field} can't be empty."));
        }
    }

    /// Whether any check failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Finishes the run: `Ok` when every check passed.
    ///
    /// ## Errors
    ///
    /// Returns `self` when at least one check failed.
    pub fn finish(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for failure in &self.failures {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Precondition checks for a request type.
pub trait Validate {
    /// Runs every check and collects the failures.
    ///
    /// ## Errors
    ///
    /// Returns the collected failures when at least one check failed.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn blank_values_fail() {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("name", "   ");
        errors.require_non_nil("roleId", Uuid::nil());

        let errors = errors.finish().unwrap_err();
        assert_eq!(errors.failures.len(), 2);
        assert_eq!(errors.failures[0].field, "name");
    }

    #[test]
    fn passing_checks_finish_ok() {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("name", "Administrators");
        errors.require_non_nil("roleId", Uuid::now_v7());

        assert!(errors.finish().is_ok());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "The name can't be empty.");
        errors.add("id", "The id can't be empty.");

        assert_eq!(
            errors.to_string(),
            "The name can't be empty.; The id can't be empty."
        );
    }
}
