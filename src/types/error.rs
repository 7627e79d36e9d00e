//! Error taxonomy of the engine.
//!
//! Two error types separate the two moments something can go wrong:
//!
//! - [`UsageError`] is produced while a validator is being *built* (malformed message
//!   templates, unknown placeholders, invalid patterns, misplaced modifiers). It is returned
//!   by [`ValidatorBuilder::build`](crate::ValidatorBuilder::build), so a validator carrying
//!   a usage fault can never be invoked.
//! - [`ValidationError`] is produced while a validator is *running*. Ordinary failures of
//!   the validated data are never errors; they are collected into a
//!   [`ValidationResult`](crate::ValidationResult). `ValidationError` covers engine faults
//!   (a fallible predicate returned `Err`) and the aggregate error raised by
//!   [`Validator::ensure_valid`](crate::Validator::ensure_valid).

use std::borrow::Cow;

use crate::types::failure_formatter::{FailureFormatConfig, FailureFormatter};
use crate::types::ValidationResult;

/// Boxed error returned by user-supplied fallible predicates and custom checks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Construction-time fault detected while registering rules.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
    /// A message template has an unterminated or empty `{...}` placeholder.
    #[error("malformed message template `{template}`")]
    MalformedTemplate { template: String },

    /// A message template refers to a placeholder the check never provides.
    #[error("unresolved placeholder `{{{placeholder}}}` in message for `{property}`")]
    UnresolvedPlaceholder { property: String, placeholder: String },

    /// No explicit message was given and the catalog has no template for the check.
    #[error("no default message for check `{check}` on `{property}` (culture: {culture})")]
    MissingDefaultMessage { property: String, check: Cow<'static, str>, culture: String },

    /// A `matches` pattern failed to compile.
    #[error("invalid pattern `{pattern}` for `{property}`: {source}")]
    InvalidPattern {
        property: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Lower and upper bounds of a range check are inverted.
    #[error("invalid range for `{property}`: {min} is greater than {max}")]
    InvertedRange { property: String, min: String, max: String },

    /// A modifier such as `with_message` was used before any check was registered.
    #[error("`{method}` on `{property}` has no preceding check to apply to")]
    NoCurrentCheck { property: String, method: &'static str },

    /// A message override was attached to a check that reports its own failures.
    #[error("check `{check}` on `{property}` reports its own failures and takes no message")]
    MessageNotApplicable { property: String, check: Cow<'static, str> },

    /// `filter` was used on a rule that does not iterate a collection.
    #[error("`filter` on `{property}` requires a collection rule")]
    FilterOnSingleProperty { property: String },

    /// A rule modifier that has no meaning inside a `for_each` element chain.
    #[error("`{method}` is not supported inside the element chain of `{property}`")]
    UnsupportedInElementChain { property: String, method: &'static str },

    /// `otherwise` was registered without a preceding top-level `when`.
    #[error("`otherwise` has no preceding `when` block")]
    OtherwiseWithoutWhen,
}

/// Run-time error returned by a validation call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A predicate or custom check failed to evaluate. Aborts the current call only.
    #[error("check `{check}` on `{property}` failed to evaluate: {source}")]
    Engine {
        property: String,
        check: Cow<'static, str>,
        #[source]
        source: BoxError,
    },

    /// A lazily registered sub-validator could not be built on first use.
    #[error("lazy sub-validator construction failed: {0}")]
    Construction(#[from] UsageError),

    /// Aggregate error carrying every failure of an invalid result.
    #[error("{}", FailureFormatConfig::default().format_failures(.0.iter()))]
    Failed(ValidationResult),

    /// Error produced by a validator-specific raise hook.
    #[error("{message}")]
    Custom { message: String, result: ValidationResult },
}

impl ValidationError {
    /// Creates a custom error carrying the given result.
    pub fn custom(message: impl Into<String>, result: ValidationResult) -> Self {
        Self::Custom { message: message.into(), result }
    }

    /// Returns the validation result carried by aggregate errors.
    ///
    /// Engine and construction faults carry no result.
    #[must_use]
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Failed(result) | Self::Custom { result, .. } => Some(result),
            Self::Engine { .. } | Self::Construction(_) => None,
        }
    }

    /// Returns `true` for faults of the engine itself, as opposed to invalid data.
    #[must_use]
    pub fn is_engine_fault(&self) -> bool {
        matches!(self, Self::Engine { .. } | Self::Construction(_))
    }
}
