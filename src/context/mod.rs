//! Per-call validation state.
//!
//! [`ValidationContext`] is what a caller hands to
//! [`Validator::validate_with`](crate::Validator::validate_with): the instance (possibly
//! absent), the call's [`ValidationOptions`] and free-form [`RootContextData`].
//! [`CheckContext`] is what a check sees while it runs.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Display;

use crate::options::ValidationOptions;
use crate::types::{ErrorVec, MessageArguments, Severity, ValidationFailure};

/// Arbitrary key/value data shared by every check of one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootContextData {
    entries: HashMap<String, String>,
}

impl RootContextData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Instance and options of a single validation call.
///
/// # Examples
///
/// ```
/// use rule_rail::{ValidationContext, ValidationOptions};
///
/// let name = String::from("Doe");
/// let context = ValidationContext::new(&name)
///     .with_options(ValidationOptions::new().include_rule_set("Names"))
///     .with_root_data("MyCustomData", "Test");
///
/// assert!(context.instance().is_some());
/// assert_eq!(context.root_data().get("MyCustomData"), Some("Test"));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationContext<'a, T> {
    instance: Option<&'a T>,
    options: ValidationOptions,
    root_data: RootContextData,
}

impl<'a, T> ValidationContext<'a, T> {
    pub fn new(instance: &'a T) -> Self {
        Self { instance: Some(instance), options: ValidationOptions::default(), root_data: RootContextData::default() }
    }

    /// Context without an instance, as when the caller had nothing to validate.
    pub fn absent() -> Self {
        Self { instance: None, options: ValidationOptions::default(), root_data: RootContextData::default() }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_root_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.root_data.insert(key, value);
        self
    }

    #[inline]
    pub fn instance(&self) -> Option<&'a T> {
        self.instance
    }

    #[inline]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    #[inline]
    pub fn root_data(&self) -> &RootContextData {
        &self.root_data
    }

    #[inline]
    pub fn root_data_mut(&mut self) -> &mut RootContextData {
        &mut self.root_data
    }
}

/// Call-wide state threaded through rules and nested validators.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunState<'a> {
    pub(crate) options: &'a ValidationOptions,
    pub(crate) root_data: &'a RootContextData,
    /// Path of the object the current validator runs on, `None` at the root.
    pub(crate) prefix: Option<&'a str>,
}

impl<'a> RunState<'a> {
    pub(crate) fn new(options: &'a ValidationOptions, root_data: &'a RootContextData) -> Self {
        Self { options, root_data, prefix: None }
    }

    /// Full path of `name` relative to the current validator.
    pub(crate) fn child_path(&self, name: &str) -> String {
        match self.prefix {
            Some(prefix) if !prefix.is_empty() && !name.is_empty() => format!("{prefix}.{name}"),
            Some(prefix) if name.is_empty() => prefix.to_string(),
            _ => name.to_string(),
        }
    }

    pub(crate) fn with_prefix<'b>(self, prefix: &'b str) -> RunState<'b>
    where
        'a: 'b,
    {
        RunState { options: self.options, root_data: self.root_data, prefix: Some(prefix) }
    }
}

/// Location of the value a check chain runs against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChainTarget<'a> {
    pub(crate) path: &'a str,
    pub(crate) display_name: &'a str,
    pub(crate) index: Option<usize>,
}

/// State visible to one check while it runs.
///
/// Checks append message arguments here and, when they report their own failures, add
/// them through [`add_failure`](Self::add_failure).
pub struct CheckContext<'a, T> {
    instance: &'a T,
    target: ChainTarget<'a>,
    run: RunState<'a>,
    arguments: MessageArguments,
    failures: &'a mut ErrorVec<ValidationFailure>,
    error_code: Cow<'static, str>,
    severity: Severity,
}

impl<'a, T> CheckContext<'a, T> {
    pub(crate) fn new(
        instance: &'a T,
        target: ChainTarget<'a>,
        run: RunState<'a>,
        failures: &'a mut ErrorVec<ValidationFailure>,
        error_code: Cow<'static, str>,
        severity: Severity,
    ) -> Self {
        Self { instance, target, run, arguments: MessageArguments::new(), failures, error_code, severity }
    }

    /// The object the running validator was invoked on.
    #[inline]
    pub fn instance(&self) -> &'a T {
        self.instance
    }

    #[inline]
    pub fn property_path(&self) -> &'a str {
        self.target.path
    }

    #[inline]
    pub fn display_name(&self) -> &'a str {
        self.target.display_name
    }

    /// Index of the current element inside a collection rule.
    #[inline]
    pub fn collection_index(&self) -> Option<usize> {
        self.target.index
    }

    /// Adds a named argument the failure message can refer to.
    pub fn append_argument(&mut self, name: impl Into<Cow<'static, str>>, value: impl Display) {
        self.arguments.append(name, value);
    }

    /// Records a failure for the current property.
    pub fn add_failure(&mut self, message: impl Into<String>) {
        let failure = ValidationFailure::new(self.target.path, message);
        self.push(failure);
    }

    /// Records a failure for another property of the current object.
    pub fn add_failure_for(&mut self, property: &str, message: impl Into<String>) {
        let failure = ValidationFailure::new(self.run.child_path(property), message);
        self.push(failure);
    }

    fn push(&mut self, failure: ValidationFailure) {
        let failure = failure
            .with_error_code(self.error_code.clone())
            .with_severity(self.severity)
            .with_arguments(self.arguments.clone());
        self.failures.push(failure);
    }

    #[inline]
    pub fn root_context_data(&self) -> &'a RootContextData {
        self.run.root_data
    }

    #[inline]
    pub fn options(&self) -> &'a ValidationOptions {
        self.run.options
    }

    pub(crate) fn run_state(&self) -> RunState<'a> {
        self.run
    }

    pub(crate) fn failures_mut(&mut self) -> &mut ErrorVec<ValidationFailure> {
        &mut *self.failures
    }

    pub(crate) fn into_arguments(self) -> MessageArguments {
        self.arguments
    }
}
