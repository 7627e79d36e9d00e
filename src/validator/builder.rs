use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

use crate::messages::{NULL_INSTANCE_MESSAGE, PRE_VALIDATE_MESSAGE};
use crate::options::{CascadeMode, GlobalOptions, DEFAULT_RULE_SET};
use crate::rules::entry::Condition;
use crate::rules::rule::{PropertyRule, PropertySource, ValidationRule};
use crate::rules::traits::BuildEnv;
use crate::rules::RuleBuilder;
use crate::types::{UsageError, ValidationError, ValidationResult};
use crate::validator::{PreValidateHook, RaiseHook, Validator};

/// Registers the rules of a [`Validator`].
///
/// Registration never fails eagerly. Faults such as a malformed message template or an
/// `otherwise` without a `when` are collected and the first one is returned by
/// [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use rule_rail::{ValidationOptions, Validator};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     surname: Option<String>,
///     forename: String,
///     is_preferred: bool,
///     discount: f64,
/// }
///
/// let validator = Validator::<Person>::builder()
///     .rule_set("Names", |b| {
///         b.rule_for("surname", |p| &p.surname, |rule| rule.not_null())
///     })
///     .when(|p| p.is_preferred, |b| {
///         b.rule_for("discount", |p| &p.discount, |rule| rule.greater_than(0.0))
///     })
///     .otherwise(|b| b.rule_for("discount", |p| &p.discount, |rule| rule.equal(0.0)))
///     .build()?;
///
/// let person = Person { discount: 5.0, ..Person::default() };
/// let result = validator.validate(&person)?;
/// assert_eq!(result.failures()[0].property_path(), "discount");
/// assert_eq!(result.len(), 1);
///
/// let options = ValidationOptions::new().include_rule_set("Names");
/// let result = validator.validate_with(rule_rail::ValidationContext::new(&person).with_options(options))?;
/// assert_eq!(result.failures()[0].property_path(), "surname");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ValidatorBuilder<T> {
    rules: Vec<Box<dyn ValidationRule<T>>>,
    errors: Vec<UsageError>,
    scope_conditions: Vec<Condition<T>>,
    rule_set_scope: Vec<Cow<'static, str>>,
    last_when: Option<Condition<T>>,
    pre_validate: Option<PreValidateHook<T>>,
    raise: Option<RaiseHook>,
    class_cascade: Option<CascadeMode>,
    rule_cascade: Option<CascadeMode>,
}

impl<T: 'static> Default for ValidatorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ValidatorBuilder<T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            errors: Vec::new(),
            scope_conditions: Vec::new(),
            rule_set_scope: Vec::new(),
            last_when: None,
            pre_validate: None,
            raise: None,
            class_cascade: None,
            rule_cascade: None,
        }
    }

    /// Registers a rule for the property `accessor` reads.
    ///
    /// `name` is the property path segment reported in failures and, through the display
    /// name resolver, the default `{PropertyName}`.
    pub fn rule_for<P, F, B>(self, name: impl Into<Cow<'static, str>>, accessor: F, build: B) -> Self
    where
        P: Debug + 'static,
        F: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
        B: FnOnce(RuleBuilder<T, P>) -> RuleBuilder<T, P>,
    {
        let rule = PropertyRule::new(name.into(), PropertySource::Single(Box::new(accessor)));
        self.add_rule(build(RuleBuilder::new(rule)))
    }

    /// Registers a rule run on every element of the collection `items` returns.
    ///
    /// Element failures are reported as `name[index]`, in index order.
    pub fn rule_for_each<E, F, B>(self, name: impl Into<Cow<'static, str>>, items: F, build: B) -> Self
    where
        E: Debug + 'static,
        F: for<'a> Fn(&'a T) -> &'a [E] + Send + Sync + 'static,
        B: FnOnce(RuleBuilder<T, E>) -> RuleBuilder<T, E>,
    {
        let source = PropertySource::Each { items: Box::new(items), filter: None };
        let rule = PropertyRule::new(name.into(), source);
        self.add_rule(build(RuleBuilder::new(rule)))
    }

    fn add_rule<P: Debug + 'static>(mut self, builder: RuleBuilder<T, P>) -> Self {
        let (mut rule, errors) = builder.into_parts();
        self.errors.extend(errors);

        // Outer scopes first so they short-circuit before inner ones.
        for condition in &self.scope_conditions {
            rule.push_condition(Arc::clone(condition));
        }
        let set = self.rule_set_scope.last().cloned().unwrap_or(Cow::Borrowed(DEFAULT_RULE_SET));
        rule.assign_rule_set(set);

        self.rules.push(Box::new(rule));
        self.last_when = None;
        self
    }

    /// Tags every rule registered inside `rules` with the rule set `name`.
    ///
    /// Tagged rules run only when the call requests that set.
    pub fn rule_set<F>(mut self, name: impl Into<Cow<'static, str>>, rules: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.rule_set_scope.push(name.into());
        let mut this = rules(self);
        this.rule_set_scope.pop();
        this
    }

    fn scoped<F>(mut self, condition: Condition<T>, rules: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.scope_conditions.push(condition);
        let mut this = rules(self);
        this.scope_conditions.pop();
        this
    }

    /// Registers `rules` so they only run when `condition` holds.
    pub fn when<C, F>(self, condition: C, rules: F) -> Self
    where
        C: Fn(&T) -> bool + Send + Sync + 'static,
        F: FnOnce(Self) -> Self,
    {
        let condition: Condition<T> = Arc::new(condition);
        let mut this = self.scoped(Arc::clone(&condition), rules);
        this.last_when = Some(condition);
        this
    }

    /// Registers `rules` so they only run when `condition` does not hold.
    pub fn unless<C, F>(self, condition: C, rules: F) -> Self
    where
        C: Fn(&T) -> bool + Send + Sync + 'static,
        F: FnOnce(Self) -> Self,
    {
        self.scoped(Arc::new(move |instance: &T| !condition(instance)), rules)
    }

    /// Registers `rules` under the negation of the `when` registered right before.
    pub fn otherwise<F>(mut self, rules: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        match self.last_when.take() {
            Some(condition) => self.scoped(Arc::new(move |instance: &T| !condition(instance)), rules),
            None => {
                self.errors.push(UsageError::OtherwiseWithoutWhen);
                self
            }
        }
    }

    /// Hook run before any rule. Returning `false` ends the call with the failures the hook
    /// added to the result, or a single generic failure if it added none.
    pub fn pre_validate<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&T>, &mut ValidationResult) -> bool + Send + Sync + 'static,
    {
        self.pre_validate = Some(Box::new(hook));
        self
    }

    /// Customizes the error produced for an invalid result by
    /// [`Validator::ensure_valid`] and by calls with `throw_on_failures`.
    pub fn raise_with<F>(mut self, raise: F) -> Self
    where
        F: Fn(ValidationResult) -> ValidationError + Send + Sync + 'static,
    {
        self.raise = Some(Box::new(raise));
        self
    }

    /// Sets whether the validator keeps running rules after one has failed.
    pub fn class_level_cascade(mut self, mode: CascadeMode) -> Self {
        self.class_cascade = Some(mode);
        self
    }

    /// Sets the cascade mode of every rule that does not set its own.
    pub fn rule_level_cascade(mut self, mode: CascadeMode) -> Self {
        self.rule_cascade = Some(mode);
        self
    }

    pub(crate) fn into_rules(self) -> (Vec<Box<dyn ValidationRule<T>>>, Vec<UsageError>) {
        (self.rules, self.errors)
    }

    /// Finalizes every rule against the installed [`GlobalOptions`].
    ///
    /// # Errors
    ///
    /// Returns the first [`UsageError`] recorded during registration or found while
    /// resolving messages.
    pub fn build(self) -> Result<Validator<T>, UsageError> {
        self.build_with(GlobalOptions::current())
    }

    /// Builds against a given snapshot of the global options.
    pub(crate) fn build_with(mut self, options: Arc<GlobalOptions>) -> Result<Validator<T>, UsageError> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }

        let env = BuildEnv::new(options, self.rule_cascade);
        for rule in &mut self.rules {
            rule.finalize(&env)?;
        }

        let class_cascade = self.class_cascade.unwrap_or(env.global().default_class_level_cascade);
        let null_instance_message = env
            .template("null_instance")
            .map_or_else(|| NULL_INSTANCE_MESSAGE.to_string(), Cow::into_owned);
        let pre_validate_message = env
            .template("pre_validate")
            .map_or_else(|| PRE_VALIDATE_MESSAGE.to_string(), Cow::into_owned);

        Ok(Validator {
            rules: self.rules,
            pre_validate: self.pre_validate,
            raise: self.raise,
            class_cascade,
            null_instance_message,
            pre_validate_message,
        })
    }
}
