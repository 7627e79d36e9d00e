//! Checks that recurse: child validators, polymorphic dispatch and per-element chains.

use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

use crate::context::{ChainTarget, CheckContext, RunState};
use crate::macros::log_trace;
use crate::options::CascadeMode;
use crate::rules::entry::{run_chain, CheckEntry, Condition};
use crate::rules::traits::{AsVariant, BuildEnv, CheckKind, PropertyCheck};
use crate::types::{ErrorVec, UsageError, ValidationError, ValidationFailure};
use crate::validator::{Validator, ValidatorBuilder};

pub(crate) type ElementFilter<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Runs a validator for `V` on the property, prefixing its paths with the property path.
pub(crate) struct ChildValidatorCheck<V> {
    pub(crate) validator: Arc<Validator<V>>,
}

impl<T, V> PropertyCheck<T, V> for ChildValidatorCheck<V> {
    fn kind(&self) -> CheckKind {
        CheckKind::ChildValidator
    }

    fn reports_own_failures(&self) -> bool {
        true
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &V) -> Result<bool, ValidationError> {
        let run = cx.run_state().with_prefix(cx.property_path());
        self.validator.run_nested(value, run, cx.failures_mut())?;
        Ok(true)
    }
}

/// Validator declared inline with `child_rules`. It is built together with its parent, so
/// it reads the same global options snapshot.
pub(crate) struct InlineChildCheck<V> {
    pub(crate) pending: Option<ValidatorBuilder<V>>,
    pub(crate) validator: Option<Validator<V>>,
}

impl<V> InlineChildCheck<V> {
    pub(crate) fn new(builder: ValidatorBuilder<V>) -> Self {
        Self { pending: Some(builder), validator: None }
    }
}

impl<T, V: 'static> PropertyCheck<T, V> for InlineChildCheck<V> {
    fn kind(&self) -> CheckKind {
        CheckKind::ChildValidator
    }

    fn reports_own_failures(&self) -> bool {
        true
    }

    fn prepare(&mut self, env: &BuildEnv, _property: &str) -> Result<(), UsageError> {
        if let Some(builder) = self.pending.take() {
            self.validator = Some(builder.build_with(env.snapshot())?);
        }
        Ok(())
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &V) -> Result<bool, ValidationError> {
        // Set by `prepare`, which every check goes through before its validator exists.
        let Some(validator) = &self.validator else {
            return Ok(true);
        };
        let run = cx.run_state().with_prefix(cx.property_path());
        validator.run_nested(value, run, cx.failures_mut())?;
        Ok(true)
    }
}

enum ValidatorSource<V> {
    Shared(Arc<Validator<V>>),
    Lazy {
        factory: Box<dyn Fn() -> Result<Validator<V>, UsageError> + Send + Sync>,
        cell: OnceLock<Result<Validator<V>, UsageError>>,
    },
}

impl<V> ValidatorSource<V> {
    fn get(&self) -> Result<&Validator<V>, ValidationError> {
        match self {
            Self::Shared(validator) => Ok(validator.as_ref()),
            Self::Lazy { factory, cell } => {
                cell.get_or_init(factory).as_ref().map_err(|err| err.clone().into())
            }
        }
    }
}

trait VariantDispatch<P>: Send + Sync {
    /// Validates `value` if it is this entry's variant; returns whether it was.
    fn dispatch(
        &self,
        value: &P,
        run: RunState<'_>,
        failures: &mut ErrorVec<ValidationFailure>,
    ) -> Result<bool, ValidationError>;
}

struct Variant<P, V> {
    project: Box<dyn for<'a> Fn(&'a P) -> Option<&'a V> + Send + Sync>,
    source: ValidatorSource<V>,
}

impl<P, V> VariantDispatch<P> for Variant<P, V> {
    fn dispatch(
        &self,
        value: &P,
        run: RunState<'_>,
        failures: &mut ErrorVec<ValidationFailure>,
    ) -> Result<bool, ValidationError> {
        match (self.project)(value) {
            Some(variant) => {
                self.source.get()?.run_nested(variant, run, failures)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Registry of sub-validators chosen by the variant of the current value.
///
/// Variants are tried in registration order and the first one the value projects onto is
/// validated. A value matching no registered variant contributes no failure. Lazily
/// registered validators are built the first time their variant is dispatched, once per
/// rule, and reused afterwards.
///
/// # Examples
///
/// ```
/// use rule_rail::{AsVariant, Validator};
///
/// #[derive(Debug)]
/// struct Organisation { name: Option<String> }
///
/// #[derive(Debug)]
/// enum Contact { Organisation(Organisation), Anonymous }
///
/// impl AsVariant<Organisation> for Contact {
///     fn as_variant(&self) -> Option<&Organisation> {
///         match self {
///             Contact::Organisation(organisation) => Some(organisation),
///             Contact::Anonymous => None,
///         }
///     }
/// }
///
/// #[derive(Debug)]
/// struct Request { contact: Contact }
///
/// let validator = Validator::<Request>::builder()
///     .rule_for("contact", |r| &r.contact, |rule| {
///         rule.set_polymorphic_validator(|v| {
///             v.add_lazy::<Organisation, _>(|| {
///                 Validator::builder()
///                     .rule_for("name", |o: &Organisation| &o.name, |rule| rule.not_null())
///                     .build()
///             })
///         })
///     })
///     .build()?;
///
/// let invalid = Request { contact: Contact::Organisation(Organisation { name: None }) };
/// let result = validator.validate(&invalid)?;
/// assert_eq!(result.failures()[0].property_path(), "contact.name");
///
/// assert!(validator.validate(&Request { contact: Contact::Anonymous })?.is_valid());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PolymorphicValidator<P> {
    variants: Vec<Box<dyn VariantDispatch<P>>>,
}

impl<P: 'static> PolymorphicValidator<P> {
    pub(crate) fn new() -> Self {
        Self { variants: Vec::new() }
    }

    /// Registers a shared validator for variant `V`.
    #[must_use]
    pub fn add<V>(self, validator: impl Into<Arc<Validator<V>>>) -> Self
    where
        P: AsVariant<V>,
        V: 'static,
    {
        self.push(Box::new(<P as AsVariant<V>>::as_variant), ValidatorSource::Shared(validator.into()))
    }

    /// Registers a validator for the variant `projection` selects.
    #[must_use]
    pub fn add_with<V, F>(self, projection: F, validator: impl Into<Arc<Validator<V>>>) -> Self
    where
        F: for<'a> Fn(&'a P) -> Option<&'a V> + Send + Sync + 'static,
        V: 'static,
    {
        self.push(Box::new(projection), ValidatorSource::Shared(validator.into()))
    }

    /// Registers a validator for variant `V` that is built on first dispatch.
    ///
    /// A factory error surfaces from every validation call that dispatches to `V` as
    /// [`ValidationError::Construction`].
    #[must_use]
    pub fn add_lazy<V, F>(self, factory: F) -> Self
    where
        P: AsVariant<V>,
        V: 'static,
        F: Fn() -> Result<Validator<V>, UsageError> + Send + Sync + 'static,
    {
        let source = ValidatorSource::Lazy { factory: Box::new(factory), cell: OnceLock::new() };
        self.push(Box::new(<P as AsVariant<V>>::as_variant), source)
    }

    fn push<V: 'static>(
        mut self,
        project: Box<dyn for<'a> Fn(&'a P) -> Option<&'a V> + Send + Sync>,
        source: ValidatorSource<V>,
    ) -> Self {
        self.variants.push(Box::new(Variant { project, source }));
        self
    }

    /// Number of registered variants.
    #[inline]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl<T, P> PropertyCheck<T, P> for PolymorphicValidator<P> {
    fn kind(&self) -> CheckKind {
        CheckKind::Polymorphic
    }

    fn reports_own_failures(&self) -> bool {
        true
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        let path = cx.property_path();
        let run = cx.run_state().with_prefix(path);
        for variant in &self.variants {
            if variant.dispatch(value, run, cx.failures_mut())? {
                return Ok(true);
            }
        }
        log_trace!(property = path, "no validator registered for variant");
        Ok(true)
    }
}

/// Runs an element chain on every item of a collection property.
pub(crate) struct EachCheck<T, E> {
    /// Name set with `with_name` inside the element chain.
    pub(crate) display_name: Option<String>,
    pub(crate) checks: Vec<CheckEntry<T, E>>,
    pub(crate) conditions: Vec<Condition<T>>,
    pub(crate) filter: Option<ElementFilter<E>>,
    pub(crate) cascade: Option<CascadeMode>,
}

impl<T, C, E> PropertyCheck<T, C> for EachCheck<T, E>
where
    C: AsRef<[E]>,
    E: Debug,
{
    fn kind(&self) -> CheckKind {
        CheckKind::Each
    }

    fn reports_own_failures(&self) -> bool {
        true
    }

    fn prepare(&mut self, env: &BuildEnv, property: &str) -> Result<(), UsageError> {
        self.cascade.get_or_insert(env.rule_cascade());
        for entry in &mut self.checks {
            entry.finalize(env, property, true)?;
        }
        Ok(())
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &C) -> Result<bool, ValidationError> {
        let instance = cx.instance();
        if !self.conditions.iter().all(|condition| condition(instance)) {
            return Ok(true);
        }

        let cascade = self.cascade.unwrap_or_default();
        let path = cx.property_path();
        let display_name = self.display_name.as_deref().unwrap_or(cx.display_name());
        let run = cx.run_state();

        for (index, item) in value.as_ref().iter().enumerate() {
            if self.filter.as_ref().is_some_and(|keep| !keep(item)) {
                continue;
            }
            let element_path = format!("{path}[{index}]");
            let target = ChainTarget { path: &element_path, display_name, index: Some(index) };
            run_chain(&self.checks, cascade, target, instance, item, run, cx.failures_mut())?;
        }
        Ok(true)
    }
}
