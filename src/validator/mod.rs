//! Validators and their builder.
//!
//! A [`Validator`] is built once through [`ValidatorBuilder`] and is immutable afterwards:
//! it can be shared across threads (`Validator<T>: Send + Sync`) and invoked any number of
//! times. Every call works on its own failure list, so calls never observe each other.

mod builder;

use std::fmt;

pub use builder::ValidatorBuilder;

use crate::context::{RunState, ValidationContext};
use crate::macros::{log_debug, log_trace, log_warn};
use crate::options::{CascadeMode, ValidationOptions};
use crate::rules::rule::{RuleOutcome, ValidationRule};
use crate::types::{ErrorVec, ValidationError, ValidationFailure, ValidationResult};

pub(crate) type PreValidateHook<T> =
    Box<dyn Fn(Option<&T>, &mut ValidationResult) -> bool + Send + Sync>;
pub(crate) type RaiseHook = Box<dyn Fn(ValidationResult) -> ValidationError + Send + Sync>;

/// Error code of the failure reported for an absent instance.
pub const NULL_INSTANCE_CODE: &str = "null_instance";

/// Error code of the failure reported when the pre-validate hook rejects without adding one.
pub const PRE_VALIDATE_CODE: &str = "pre_validate";

/// An immutable set of rules for `T`.
///
/// # Examples
///
/// ```
/// use rule_rail::Validator;
///
/// #[derive(Debug)]
/// struct Order { total: f64 }
///
/// let validator = Validator::<Order>::builder()
///     .rule_for("total", |o| &o.total, |rule| {
///         rule.greater_than(0.0).with_message("Order total must be positive.")
///     })
///     .build()?;
///
/// assert!(validator.validate(&Order { total: 12.5 })?.is_valid());
///
/// let err = validator.ensure_valid(&Order { total: 0.0 }).unwrap_err();
/// assert_eq!(err.to_string(), "Validation failed:\n -- total: Order total must be positive.");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Validator<T> {
    pub(crate) rules: Vec<Box<dyn ValidationRule<T>>>,
    pub(crate) pre_validate: Option<PreValidateHook<T>>,
    pub(crate) raise: Option<RaiseHook>,
    pub(crate) class_cascade: CascadeMode,
    pub(crate) null_instance_message: String,
    pub(crate) pre_validate_message: String,
}

impl<T: 'static> Validator<T> {
    #[inline]
    pub fn builder() -> ValidatorBuilder<T> {
        ValidatorBuilder::new()
    }
}

impl<T> Validator<T> {
    /// Validates `instance` with the default options.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Engine`] when a fallible check could not be evaluated.
    /// Invalid data is reported in the returned result, never as an error.
    pub fn validate(&self, instance: &T) -> Result<ValidationResult, ValidationError> {
        self.validate_with(ValidationContext::new(instance))
    }

    /// Validates the instance of `context` with its options and root data.
    ///
    /// # Errors
    ///
    /// Engine faults abort the call. With
    /// [`throw_on_failures`](ValidationOptions::throw_on_failures) an invalid result is
    /// returned as the error of the raise hook, or [`ValidationError::Failed`].
    pub fn validate_with(&self, context: ValidationContext<'_, T>) -> Result<ValidationResult, ValidationError> {
        #[cfg(feature = "tracing")]
        let _span = ::tracing::debug_span!("validate", target_type = std::any::type_name::<T>()).entered();

        let options = context.options();
        let mut result = ValidationResult::new();
        result.set_rule_sets_executed(
            options.effective_rule_sets().into_iter().map(str::to_string).collect(),
        );

        if let Some(hook) = &self.pre_validate {
            let before = result.len();
            if !hook(context.instance(), &mut result) {
                if result.len() == before {
                    let failure = ValidationFailure::new("", self.pre_validate_message.as_str())
                        .with_error_code(PRE_VALIDATE_CODE);
                    result.add_failure(failure);
                }
                log_debug!(failures = result.len(), "instance rejected before validation");
                return self.finish(result, options);
            }
        }

        let Some(instance) = context.instance() else {
            let failure = ValidationFailure::new("", self.null_instance_message.as_str())
                .with_error_code(NULL_INSTANCE_CODE);
            result.add_failure(failure);
            return self.finish(result, options);
        };

        let mut failures = ErrorVec::new();
        let run = RunState::new(options, context.root_data());
        if let Err(err) = self.run_nested(instance, run, &mut failures) {
            log_warn!(error = %err, "validation aborted");
            return Err(err);
        }

        result.extend_failures(failures);
        log_debug!(failures = result.len(), "validation finished");
        self.finish(result, options)
    }

    /// Validates `instance` and turns an invalid result into an error.
    ///
    /// # Errors
    ///
    /// Returns the raise hook's error (by default [`ValidationError::Failed`]) carrying every
    /// failure, or an engine fault.
    pub fn ensure_valid(&self, instance: &T) -> Result<(), ValidationError> {
        let result = self.validate(instance)?;
        if result.is_valid() {
            Ok(())
        } else {
            Err(self.raise(result))
        }
    }

    /// Number of top-level rules.
    #[inline]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn finish(
        &self,
        result: ValidationResult,
        options: &ValidationOptions,
    ) -> Result<ValidationResult, ValidationError> {
        if options.throws_on_failures() && !result.is_valid() {
            return Err(self.raise(result));
        }
        Ok(result)
    }

    fn raise(&self, result: ValidationResult) -> ValidationError {
        match &self.raise {
            Some(raise) => raise(result),
            None => ValidationError::Failed(result),
        }
    }

    /// Runs the rules selected by the call's options, appending failures in order.
    ///
    /// Nested validators enter here, so the pre-validate hook only runs for the root call.
    pub(crate) fn run_nested(
        &self,
        instance: &T,
        run: RunState<'_>,
        failures: &mut ErrorVec<ValidationFailure>,
    ) -> Result<(), ValidationError> {
        for rule in &self.rules {
            if !run.options.selects(rule.rule_sets().iter().map(|set| &**set)) {
                log_trace!(property = rule.property_name(), "rule not in a selected rule set");
                continue;
            }
            let outcome = rule.execute(instance, run, failures)?;
            if outcome == RuleOutcome::Failed && self.class_cascade == CascadeMode::Stop {
                break;
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("target_type", &std::any::type_name::<T>())
            .field("rules", &self.rules.len())
            .field("properties", &self.rules.iter().map(|rule| rule.property_name()).collect::<Vec<_>>())
            .field("class_cascade", &self.class_cascade)
            .field("pre_validate", &self.pre_validate.is_some())
            .field("raise", &self.raise.is_some())
            .finish()
    }
}
