use core::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::failure_formatter::FailureFormatter;
use crate::types::{ErrorVec, Severity, ValidationError, ValidationFailure};

/// Outcome of one validation call.
///
/// Failures are kept in the order the rules were registered and, inside collection rules,
/// in ascending element index. The result is valid exactly when it holds no failure.
///
/// # Examples
///
/// ```
/// use rule_rail::{ValidationFailure, ValidationResult};
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid());
///
/// result.add_failure(ValidationFailure::new("surname", "Surname cannot be null."));
/// assert!(!result.is_valid());
/// assert_eq!(result.failures_for("surname").count(), 1);
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationResult {
    failures: ErrorVec<ValidationFailure>,
    rule_sets_executed: Vec<String>,
}

impl ValidationResult {
    /// Creates an empty (valid) result.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result from pre-built failures.
    pub fn from_failures<I>(failures: I) -> Self
    where
        I: IntoIterator<Item = ValidationFailure>,
    {
        Self { failures: failures.into_iter().collect(), rule_sets_executed: Vec::new() }
    }

    /// Returns `true` when no failure was recorded.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    #[inline]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Appends a failure, typically from a pre-validation hook.
    #[inline]
    pub fn add_failure(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    /// Appends every failure of `other`, keeping their order.
    pub fn merge(&mut self, other: ValidationResult) {
        self.failures.extend(other.failures);
        for set in other.rule_sets_executed {
            if !self.rule_sets_executed.contains(&set) {
                self.rule_sets_executed.push(set);
            }
        }
    }

    /// Failures whose property path is exactly `path`.
    pub fn failures_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationFailure> {
        self.failures.iter().filter(move |failure| failure.property_path() == path)
    }

    /// Failures with at least the given severity (`Error` is the most severe).
    pub fn failures_with_severity(
        &self,
        severity: Severity,
    ) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter().filter(move |failure| failure.severity() <= severity)
    }

    /// Names of the rule sets selected for the call that produced this result.
    #[inline]
    pub fn rule_sets_executed(&self) -> &[String] {
        &self.rule_sets_executed
    }

    pub(crate) fn extend_failures(&mut self, failures: ErrorVec<ValidationFailure>) {
        self.failures.extend(failures);
    }

    pub(crate) fn set_rule_sets_executed(&mut self, sets: Vec<String>) {
        self.rule_sets_executed = sets;
    }

    /// Renders every failure with the given formatter.
    pub fn to_string_with<F: FailureFormatter>(&self, formatter: &F) -> String {
        formatter.format_failures(self.failures.iter())
    }

    /// Converts into a `Result`, wrapping an invalid result in [`ValidationError::Failed`].
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError::Failed(self))
        }
    }

    /// Consumes the result, returning its failures.
    #[inline]
    pub fn into_failures(self) -> ErrorVec<ValidationFailure> {
        self.failures
    }
}

/// Writes one message per line, without property paths.
impl Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            f.write_str(failure.message())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ValidationFailure;
    type IntoIter = core::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl IntoIterator for ValidationResult {
    type Item = ValidationFailure;
    type IntoIter = smallvec::IntoIter<[ValidationFailure; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl FromIterator<ValidationFailure> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self::from_failures(iter)
    }
}
