use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

use regex::Regex;

use crate::context::CheckContext;
use crate::messages::MessageTemplate;
use crate::options::{ApplyConditionTo, CascadeMode};
use crate::rules::checks::{
    Bound, Comparand, ComparisonCheck, CustomCheck, EmptinessCheck, EqualityCheck, LengthCheck,
    MustCheck, PatternCheck, Predicate, PresenceCheck, RangeCheck,
};
use crate::rules::entry::{CheckEntry, Condition, MessageSource};
use crate::rules::nested::{ChildValidatorCheck, EachCheck, InlineChildCheck, PolymorphicValidator};
use crate::rules::rule::{PropertyRule, PropertySource};
use crate::rules::traits::{Emptiable, PropertyCheck, TextValue};
use crate::types::{BoxError, Severity, UsageError};
use crate::validator::{Validator, ValidatorBuilder};

/// Registers the checks of one rule.
///
/// A `RuleBuilder` is handed to the closure of
/// [`ValidatorBuilder::rule_for`](crate::ValidatorBuilder::rule_for). Check methods append
/// to the chain; modifiers such as [`with_message`](Self::with_message) apply to the check
/// registered last. Misuse is recorded and reported by
/// [`ValidatorBuilder::build`](crate::ValidatorBuilder::build).
///
/// Which checks are available depends on the property type: `not_null` needs an `Option`,
/// `length` needs text, `greater_than` needs `PartialOrd`. A check applied to an
/// incompatible property does not compile.
///
/// # Examples
///
/// ```
/// use rule_rail::Validator;
///
/// #[derive(Debug, Default)]
/// struct Person {
///     surname: Option<String>,
///     postcode: String,
/// }
///
/// let validator = Validator::<Person>::builder()
///     .rule_for("surname", |p| &p.surname, |rule| {
///         rule.not_null().with_message("Surname cannot be null.")
///     })
///     .rule_for("postcode", |p| &p.postcode, |rule| rule.length(5, 10))
///     .build()?;
///
/// let result = validator.validate(&Person { surname: None, postcode: "12345".into() })?;
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.failures()[0].message(), "Surname cannot be null.");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RuleBuilder<T, P> {
    rule: PropertyRule<T, P>,
    errors: Vec<UsageError>,
}

impl<T: 'static, P: Debug + 'static> RuleBuilder<T, P> {
    pub(crate) fn new(rule: PropertyRule<T, P>) -> Self {
        Self { rule, errors: Vec::new() }
    }

    pub(crate) fn into_parts(self) -> (PropertyRule<T, P>, Vec<UsageError>) {
        (self.rule, self.errors)
    }

    fn property(&self) -> String {
        self.rule.property_name.to_string()
    }

    fn push_check(mut self, check: impl PropertyCheck<T, P> + 'static) -> Self {
        self.rule.checks.push(CheckEntry::new(Box::new(check)));
        self
    }

    fn update_last(mut self, method: &'static str, update: impl FnOnce(&mut CheckEntry<T, P>)) -> Self {
        match self.rule.checks.last_mut() {
            Some(entry) => update(entry),
            None => {
                let property = self.property();
                self.errors.push(UsageError::NoCurrentCheck { property, method });
            }
        }
        self
    }

    /// Adds a user-defined check.
    pub fn set_check<C>(self, check: C) -> Self
    where
        C: PropertyCheck<T, P> + 'static,
    {
        self.push_check(check)
    }

    /// Fails when `predicate` returns `false`.
    pub fn must<F>(self, predicate: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.push_check(MustCheck { predicate: Predicate::Plain(Box::new(predicate)), arguments: &[] })
    }

    /// Like [`must`](Self::must), with access to the whole instance.
    pub fn must_with<F>(self, predicate: F) -> Self
    where
        F: Fn(&T, &P) -> bool + Send + Sync + 'static,
    {
        self.push_check(MustCheck {
            predicate: Predicate::WithInstance(Box::new(predicate)),
            arguments: &[],
        })
    }

    /// Like [`must`](Self::must), with a context to append the message arguments named in
    /// `arguments`.
    pub fn must_with_args<F>(self, arguments: &'static [&'static str], predicate: F) -> Self
    where
        F: for<'c> Fn(&mut CheckContext<'c, T>, &P) -> bool + Send + Sync + 'static,
    {
        self.push_check(MustCheck { predicate: Predicate::WithContext(Box::new(predicate)), arguments })
    }

    /// Fallible predicate. An `Err` aborts the validation call with
    /// [`ValidationError::Engine`](crate::ValidationError::Engine).
    pub fn try_must<F, E>(self, predicate: F) -> Self
    where
        F: Fn(&P) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let predicate = move |value: &P| -> Result<bool, BoxError> { predicate(value).map_err(Into::into) };
        self.push_check(MustCheck { predicate: Predicate::Fallible(Box::new(predicate)), arguments: &[] })
    }

    /// Runs `action`, which reports failures itself through
    /// [`CheckContext::add_failure`].
    pub fn custom<F, E>(self, action: F) -> Self
    where
        F: for<'c> Fn(&P, &mut CheckContext<'c, T>) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let action = move |value: &P, cx: &mut CheckContext<'_, T>| -> Result<(), BoxError> {
            action(value, cx).map_err(Into::into)
        };
        self.push_check(CustomCheck { action: Box::new(action) })
    }

    /// Runs the rule only when `condition` holds.
    pub fn when<F>(self, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.when_scoped(condition, ApplyConditionTo::AllChecks)
    }

    /// Runs the rule only when `condition` does not hold.
    pub fn unless<F>(self, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.unless_scoped(condition, ApplyConditionTo::AllChecks)
    }

    /// Attaches `condition` to the whole rule or to the check registered last.
    pub fn when_scoped<F>(mut self, condition: F, scope: ApplyConditionTo) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let condition: Condition<T> = Arc::new(condition);
        match scope {
            ApplyConditionTo::AllChecks => {
                self.rule.conditions.push(condition);
                self
            }
            ApplyConditionTo::CurrentCheck => {
                self.update_last("when", |entry| entry.conditions.push(condition))
            }
        }
    }

    pub fn unless_scoped<F>(self, condition: F, scope: ApplyConditionTo) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.when_scoped(move |instance: &T| !condition(instance), scope)
    }

    /// Replaces the message of the last check with `template`.
    pub fn with_message(mut self, template: impl AsRef<str>) -> Self {
        match MessageTemplate::parse(template.as_ref()) {
            Ok(template) => {
                self.update_last("with_message", |entry| entry.message = MessageSource::Template(template))
            }
            Err(err) => {
                self.errors.push(err);
                self
            }
        }
    }

    /// Computes the message of the last check from the instance. The text is used as is.
    pub fn with_message_fn<F>(self, message: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let message = MessageSource::Dynamic(Arc::new(message));
        self.update_last("with_message_fn", |entry| entry.message = message)
    }

    pub fn with_error_code(self, code: impl Into<Cow<'static, str>>) -> Self {
        let code = code.into();
        self.update_last("with_error_code", |entry| entry.error_code = Some(code))
    }

    pub fn with_severity(self, severity: Severity) -> Self {
        self.update_last("with_severity", |entry| entry.severity = severity)
    }

    /// Sets the name `{PropertyName}` renders as.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.rule.display_name = Some(name.into());
        self
    }

    /// Replaces the property name used in failure paths.
    pub fn override_property_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.rule.property_name = name.into();
        self
    }

    /// Sets the cascade mode of this rule's chain.
    pub fn cascade(mut self, mode: CascadeMode) -> Self {
        self.rule.cascade = Some(mode);
        self
    }

    /// Validates only the collection elements `keep` accepts. Skipped elements keep their
    /// indices out of the result; validated ones keep their original index.
    pub fn filter<F>(mut self, keep: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        match &mut self.rule.source {
            PropertySource::Each { filter, .. } | PropertySource::Detached { filter } => {
                *filter = Some(Arc::new(keep));
            }
            PropertySource::Single(_) => {
                let property = self.property();
                self.errors.push(UsageError::FilterOnSingleProperty { property });
            }
        }
        self
    }

    /// Rules that run right after this one, only when it applied and produced no failure.
    pub fn dependent_rules<B>(mut self, build: B) -> Self
    where
        B: FnOnce(ValidatorBuilder<T>) -> ValidatorBuilder<T>,
    {
        let (rules, errors) = build(ValidatorBuilder::new()).into_rules();
        self.errors.extend(errors);
        self.rule.dependents.extend(rules);
        self
    }

    /// Validates the property with a validator of its own type.
    pub fn set_validator(self, validator: impl Into<Arc<Validator<P>>>) -> Self {
        self.push_check(ChildValidatorCheck { validator: validator.into() })
    }

    /// Validates the property with rules declared inline.
    ///
    /// The inline validator is built when the parent is, against the same global options.
    pub fn child_rules<B>(self, build: B) -> Self
    where
        B: FnOnce(ValidatorBuilder<P>) -> ValidatorBuilder<P>,
    {
        self.push_check(InlineChildCheck::new(build(ValidatorBuilder::new())))
    }

    /// Validates the property with the sub-validator registered for its variant.
    pub fn set_polymorphic_validator<B>(self, build: B) -> Self
    where
        B: FnOnce(PolymorphicValidator<P>) -> PolymorphicValidator<P>,
    {
        self.push_check(build(PolymorphicValidator::new()))
    }

    /// Runs an element chain on every item of a collection property.
    ///
    /// `with_name` inside the chain renames the elements in messages. Element paths always
    /// derive from this rule, so `override_property_name` and `dependent_rules` are rejected.
    pub fn for_each<E, B>(mut self, build: B) -> Self
    where
        P: AsRef<[E]>,
        E: Debug + 'static,
        B: FnOnce(RuleBuilder<T, E>) -> RuleBuilder<T, E>,
    {
        let inner = PropertyRule::new(
            self.rule.property_name.clone(),
            PropertySource::Detached { filter: None },
        );
        let (inner, errors) = build(RuleBuilder::new(inner)).into_parts();
        self.errors.extend(errors);
        if !inner.dependents.is_empty() {
            let property = self.property();
            self.errors.push(UsageError::UnsupportedInElementChain { property, method: "dependent_rules" });
        }
        if inner.property_name != self.rule.property_name {
            let property = self.property();
            self.errors.push(UsageError::UnsupportedInElementChain { property, method: "override_property_name" });
        }

        let filter = match inner.source {
            PropertySource::Detached { filter } => filter,
            _ => None,
        };
        self.push_check(EachCheck {
            display_name: inner.display_name,
            checks: inner.checks,
            conditions: inner.conditions,
            filter,
            cascade: inner.cascade,
        })
    }
}

impl<T: 'static, V: Debug + 'static> RuleBuilder<T, Option<V>> {
    /// Fails when the value is `None`.
    pub fn not_null(self) -> Self {
        self.push_check(PresenceCheck { expect_present: true })
    }

    /// Fails when the value is `Some`.
    pub fn null(self) -> Self {
        self.push_check(PresenceCheck { expect_present: false })
    }
}

impl<T: 'static, P: Emptiable + Debug + 'static> RuleBuilder<T, P> {
    /// Fails on `None`, empty or blank strings, empty collections and zero.
    pub fn not_empty(self) -> Self {
        self.push_check(EmptinessCheck { expect_empty: false })
    }

    pub fn empty(self) -> Self {
        self.push_check(EmptinessCheck { expect_empty: true })
    }
}

impl<T: 'static, P: PartialEq + Debug + Send + Sync + 'static> RuleBuilder<T, P> {
    pub fn equal(self, value: P) -> Self {
        self.push_check(EqualityCheck { comparand: Comparand::Value(value), expect_equal: true })
    }

    /// Fails unless the value equals another property, read when the check runs.
    pub fn equal_to<F>(self, name: impl Into<Cow<'static, str>>, other: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
    {
        let comparand = property_comparand(name, other);
        self.push_check(EqualityCheck { comparand, expect_equal: true })
    }

    pub fn not_equal(self, value: P) -> Self {
        self.push_check(EqualityCheck { comparand: Comparand::Value(value), expect_equal: false })
    }

    pub fn not_equal_to<F>(self, name: impl Into<Cow<'static, str>>, other: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
    {
        let comparand = property_comparand(name, other);
        self.push_check(EqualityCheck { comparand, expect_equal: false })
    }
}

impl<T: 'static, P: PartialOrd + Debug + Send + Sync + 'static> RuleBuilder<T, P> {
    fn compare(self, comparand: Comparand<T, P>, bound: Bound) -> Self {
        self.push_check(ComparisonCheck { comparand, bound })
    }

    pub fn greater_than(self, value: P) -> Self {
        self.compare(Comparand::Value(value), Bound::GreaterThan)
    }

    pub fn greater_than_or_equal(self, value: P) -> Self {
        self.compare(Comparand::Value(value), Bound::GreaterThanOrEqual)
    }

    pub fn less_than(self, value: P) -> Self {
        self.compare(Comparand::Value(value), Bound::LessThan)
    }

    pub fn less_than_or_equal(self, value: P) -> Self {
        self.compare(Comparand::Value(value), Bound::LessThanOrEqual)
    }

    /// Fails unless the value is greater than another property.
    pub fn greater_than_property<F>(self, name: impl Into<Cow<'static, str>>, other: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
    {
        self.compare(property_comparand(name, other), Bound::GreaterThan)
    }

    /// Fails unless the value is less than another property.
    pub fn less_than_property<F>(self, name: impl Into<Cow<'static, str>>, other: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
    {
        self.compare(property_comparand(name, other), Bound::LessThan)
    }

    /// Fails unless `from <= value <= to`.
    pub fn inclusive_between(mut self, from: P, to: P) -> Self {
        if from > to {
            let property = self.property();
            self.errors.push(UsageError::InvertedRange {
                property,
                min: format!("{from:?}"),
                max: format!("{to:?}"),
            });
            return self;
        }
        self.push_check(RangeCheck { from, to })
    }
}

impl<T: 'static, P: TextValue + Debug + 'static> RuleBuilder<T, P> {
    /// Fails unless the text has between `min` and `max` characters. Absent text passes.
    pub fn length(mut self, min: usize, max: usize) -> Self {
        if min > max {
            let property = self.property();
            self.errors.push(UsageError::InvertedRange { property, min: min.to_string(), max: max.to_string() });
            return self;
        }
        self.push_check(LengthCheck { min: Some(min), max: Some(max) })
    }

    pub fn min_length(self, min: usize) -> Self {
        self.push_check(LengthCheck { min: Some(min), max: None })
    }

    pub fn max_length(self, max: usize) -> Self {
        self.push_check(LengthCheck { min: None, max: Some(max) })
    }

    /// Fails unless the text matches `pattern`. Absent text passes.
    pub fn matches(mut self, pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => self.push_check(PatternCheck { regex }),
            Err(source) => {
                let property = self.property();
                self.errors.push(UsageError::InvalidPattern {
                    property,
                    pattern: pattern.to_string(),
                    source,
                });
                self
            }
        }
    }
}

fn property_comparand<T, P, F>(name: impl Into<Cow<'static, str>>, accessor: F) -> Comparand<T, P>
where
    F: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
{
    let name = name.into();
    Comparand::Property { display_name: name.to_string(), name, accessor: Box::new(accessor) }
}
