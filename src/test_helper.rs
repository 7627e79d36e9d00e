//! Assertions for testing validators.
//!
//! Every assertion panics with a description of the failures that were actually produced,
//! so they read naturally inside `#[test]` functions.
//!
//! # Examples
//!
//! ```
//! use rule_rail::test_helper::TestValidate;
//! use rule_rail::Validator;
//!
//! #[derive(Debug, Default)]
//! struct Person { surname: Option<String>, forename: String }
//!
//! let validator = Validator::<Person>::builder()
//!     .rule_for("surname", |p| &p.surname, |rule| rule.not_null().with_message("Surname cannot be null."))
//!     .build()
//!     .unwrap();
//!
//! let result = validator.test_validate(&Person::default());
//! result
//!     .should_have_validation_error_for("surname")
//!     .with_error_message("Surname cannot be null.")
//!     .with_error_code("not_null");
//! result.should_not_have_validation_error_for("forename");
//! ```

use std::ops::Deref;

use crate::context::ValidationContext;
use crate::types::{Severity, ValidationFailure, ValidationResult};
use crate::validator::Validator;

/// Adds `test_validate` to validators.
pub trait TestValidate<T> {
    /// Validates `instance` and wraps the result for assertions.
    ///
    /// # Panics
    ///
    /// Panics when the call is aborted by an engine fault.
    fn test_validate(&self, instance: &T) -> TestValidationResult;

    /// Like [`test_validate`](Self::test_validate), with a full context.
    fn test_validate_with(&self, context: ValidationContext<'_, T>) -> TestValidationResult;
}

impl<T> TestValidate<T> for Validator<T> {
    #[track_caller]
    fn test_validate(&self, instance: &T) -> TestValidationResult {
        self.test_validate_with(ValidationContext::new(instance))
    }

    #[track_caller]
    fn test_validate_with(&self, context: ValidationContext<'_, T>) -> TestValidationResult {
        match self.validate_with(context) {
            Ok(result) => TestValidationResult { result },
            Err(err) => panic!("validation aborted: {err}"),
        }
    }
}

/// A [`ValidationResult`] with assertion methods.
#[derive(Debug, Clone)]
pub struct TestValidationResult {
    result: ValidationResult,
}

impl TestValidationResult {
    /// Asserts at least one failure exists for `path` and returns them for further checks.
    #[track_caller]
    pub fn should_have_validation_error_for<'a>(&'a self, path: &'a str) -> FailureAssertions<'a> {
        let failures: Vec<_> = self.result.failures_for(path).collect();
        if failures.is_empty() {
            panic!(
                "expected a validation error for `{path}`, found: {}",
                describe(self.result.failures().iter())
            );
        }
        FailureAssertions { path, failures }
    }

    #[track_caller]
    pub fn should_not_have_validation_error_for(&self, path: &str) {
        let failures: Vec<_> = self.result.failures_for(path).collect();
        if !failures.is_empty() {
            panic!("expected no validation error for `{path}`, found: {}", describe(failures.into_iter()));
        }
    }

    #[track_caller]
    pub fn should_not_have_any_validation_errors(&self) {
        if !self.result.is_valid() {
            panic!("expected no validation errors, found: {}", describe(self.result.failures().iter()));
        }
    }

    #[track_caller]
    pub fn should_have_any_validation_error(&self) {
        if self.result.is_valid() {
            panic!("expected at least one validation error, found none");
        }
    }

    pub fn into_inner(self) -> ValidationResult {
        self.result
    }
}

impl Deref for TestValidationResult {
    type Target = ValidationResult;

    fn deref(&self) -> &Self::Target {
        &self.result
    }
}

/// Failures of one property path, narrowed by each successful assertion.
///
/// Chained assertions therefore have to hold for the same failure:
/// `with_error_message(m).with_error_code(c)` passes only if one failure has both.
#[derive(Debug)]
pub struct FailureAssertions<'a> {
    path: &'a str,
    failures: Vec<&'a ValidationFailure>,
}

impl<'a> FailureAssertions<'a> {
    #[track_caller]
    fn narrow(self, expectation: &str, keep: impl Fn(&ValidationFailure) -> bool) -> Self {
        let matching: Vec<_> = self.failures.iter().copied().filter(|failure| keep(failure)).collect();
        if matching.is_empty() {
            panic!(
                "expected a failure for `{}` with {expectation}, found: {}",
                self.path,
                describe(self.failures.into_iter())
            );
        }
        Self { path: self.path, failures: matching }
    }

    #[track_caller]
    pub fn with_error_message(self, message: &str) -> Self {
        self.narrow(&format!("message {message:?}"), |failure| failure.message() == message)
    }

    #[track_caller]
    pub fn with_error_code(self, code: &str) -> Self {
        self.narrow(&format!("error code {code:?}"), |failure| failure.error_code() == code)
    }

    #[track_caller]
    pub fn with_severity(self, severity: Severity) -> Self {
        self.narrow(&format!("severity {severity}"), |failure| failure.severity() == severity)
    }

    #[track_caller]
    pub fn with_attempted_value(self, value: &str) -> Self {
        self.narrow(&format!("attempted value {value:?}"), |failure| failure.attempted_value() == Some(value))
    }

    /// Asserts exactly `count` failures remain.
    #[track_caller]
    pub fn times(self, count: usize) -> Self {
        if self.failures.len() != count {
            panic!(
                "expected {count} failure(s) for `{}`, found: {}",
                self.path,
                describe(self.failures.into_iter())
            );
        }
        self
    }

    pub fn failures(&self) -> &[&'a ValidationFailure] {
        &self.failures
    }
}

fn describe<'a>(failures: impl Iterator<Item = &'a ValidationFailure>) -> String {
    let lines: Vec<_> = failures
        .map(|failure| format!("[{}] {} ({})", failure.property_path(), failure.message(), failure.error_code()))
        .collect();
    if lines.is_empty() {
        "no failures".to_string()
    } else {
        lines.join("; ")
    }
}
