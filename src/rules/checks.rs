//! Built-in checks.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Debug;

use regex::Regex;

use crate::context::CheckContext;
use crate::rules::entry::render_value;
use crate::rules::traits::{BuildEnv, CheckKind, Emptiable, PropertyCheck, TextValue};
use crate::types::{BoxError, UsageError, ValidationError};

/// `not_null` / `null` on optional values.
pub(crate) struct PresenceCheck {
    pub(crate) expect_present: bool,
}

impl<T, V> PropertyCheck<T, Option<V>> for PresenceCheck {
    fn kind(&self) -> CheckKind {
        if self.expect_present {
            CheckKind::NotNull
        } else {
            CheckKind::Null
        }
    }

    fn is_valid(&self, _cx: &mut CheckContext<'_, T>, value: &Option<V>) -> Result<bool, ValidationError> {
        Ok(value.is_some() == self.expect_present)
    }
}

/// `not_empty` / `empty`.
pub(crate) struct EmptinessCheck {
    pub(crate) expect_empty: bool,
}

impl<T, P: Emptiable> PropertyCheck<T, P> for EmptinessCheck {
    fn kind(&self) -> CheckKind {
        if self.expect_empty {
            CheckKind::Empty
        } else {
            CheckKind::NotEmpty
        }
    }

    fn is_valid(&self, _cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        Ok(value.is_empty_value() == self.expect_empty)
    }
}

/// Value a comparison check compares against.
pub(crate) enum Comparand<T, P> {
    Value(P),
    /// Another property of the instance, read at validation time.
    Property {
        name: Cow<'static, str>,
        display_name: String,
        accessor: Box<dyn for<'a> Fn(&'a T) -> &'a P + Send + Sync>,
    },
}

impl<T, P> Comparand<T, P> {
    fn resolve<'a>(&'a self, instance: &'a T) -> &'a P {
        match self {
            Self::Value(value) => value,
            Self::Property { accessor, .. } => accessor(instance),
        }
    }

    fn prepare(&mut self, env: &BuildEnv) {
        if let Self::Property { name, display_name, .. } = self {
            *display_name = env.display_name(name);
        }
    }

    fn arguments(&self) -> &'static [&'static str] {
        match self {
            Self::Value(_) => &["ComparisonValue"],
            Self::Property { .. } => &["ComparisonValue", "ComparisonProperty"],
        }
    }

    fn append_arguments<'a, X>(&'a self, cx: &mut CheckContext<'_, X>, value: &'a P)
    where
        P: Debug,
    {
        cx.append_argument("ComparisonValue", render_value(value));
        if let Self::Property { display_name, .. } = self {
            cx.append_argument("ComparisonProperty", display_name);
        }
    }
}

/// `equal` / `not_equal`.
pub(crate) struct EqualityCheck<T, P> {
    pub(crate) comparand: Comparand<T, P>,
    pub(crate) expect_equal: bool,
}

impl<T, P> PropertyCheck<T, P> for EqualityCheck<T, P>
where
    P: PartialEq + Debug + Send + Sync,
{
    fn kind(&self) -> CheckKind {
        if self.expect_equal {
            CheckKind::Equal
        } else {
            CheckKind::NotEqual
        }
    }

    fn arguments(&self) -> &[&'static str] {
        self.comparand.arguments()
    }

    fn prepare(&mut self, env: &BuildEnv, _property: &str) -> Result<(), UsageError> {
        self.comparand.prepare(env);
        Ok(())
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        let other = self.comparand.resolve(cx.instance());
        self.comparand.append_arguments(cx, other);
        Ok((value == other) == self.expect_equal)
    }
}

/// Which side of the comparand a value must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Bound {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::GreaterThanOrEqual => ordering != Ordering::Less,
            Self::LessThan => ordering == Ordering::Less,
            Self::LessThanOrEqual => ordering != Ordering::Greater,
        }
    }
}

/// `greater_than`, `less_than` and their inclusive forms.
pub(crate) struct ComparisonCheck<T, P> {
    pub(crate) comparand: Comparand<T, P>,
    pub(crate) bound: Bound,
}

impl<T, P> PropertyCheck<T, P> for ComparisonCheck<T, P>
where
    P: PartialOrd + Debug + Send + Sync,
{
    fn kind(&self) -> CheckKind {
        match self.bound {
            Bound::GreaterThan => CheckKind::GreaterThan,
            Bound::GreaterThanOrEqual => CheckKind::GreaterThanOrEqual,
            Bound::LessThan => CheckKind::LessThan,
            Bound::LessThanOrEqual => CheckKind::LessThanOrEqual,
        }
    }

    fn arguments(&self) -> &[&'static str] {
        self.comparand.arguments()
    }

    fn prepare(&mut self, env: &BuildEnv, _property: &str) -> Result<(), UsageError> {
        self.comparand.prepare(env);
        Ok(())
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        let other = self.comparand.resolve(cx.instance());
        self.comparand.append_arguments(cx, other);
        // Incomparable values (NaN) never satisfy a bound.
        Ok(value.partial_cmp(other).is_some_and(|ordering| self.bound.accepts(ordering)))
    }
}

/// `inclusive_between`.
pub(crate) struct RangeCheck<P> {
    pub(crate) from: P,
    pub(crate) to: P,
}

impl<T, P> PropertyCheck<T, P> for RangeCheck<P>
where
    P: PartialOrd + Debug + Send + Sync,
{
    fn kind(&self) -> CheckKind {
        CheckKind::InclusiveBetween
    }

    fn arguments(&self) -> &[&'static str] {
        &["From", "To"]
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        cx.append_argument("From", render_value(&self.from));
        cx.append_argument("To", render_value(&self.to));
        Ok(*value >= self.from && *value <= self.to)
    }
}

/// `length`, `min_length` and `max_length`, counted in characters.
pub(crate) struct LengthCheck {
    pub(crate) min: Option<usize>,
    pub(crate) max: Option<usize>,
}

impl<T, P: TextValue> PropertyCheck<T, P> for LengthCheck {
    fn kind(&self) -> CheckKind {
        match (self.min, self.max) {
            (Some(_), None) => CheckKind::MinLength,
            (None, Some(_)) => CheckKind::MaxLength,
            _ => CheckKind::Length,
        }
    }

    fn arguments(&self) -> &[&'static str] {
        match (self.min, self.max) {
            (Some(_), None) => &["MinLength", "TotalLength"],
            (None, Some(_)) => &["MaxLength", "TotalLength"],
            _ => &["MinLength", "MaxLength", "TotalLength"],
        }
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        let Some(text) = value.text() else {
            return Ok(true);
        };
        let length = text.chars().count();
        if let Some(min) = self.min {
            cx.append_argument("MinLength", min);
        }
        if let Some(max) = self.max {
            cx.append_argument("MaxLength", max);
        }
        cx.append_argument("TotalLength", length);
        Ok(self.min.map_or(true, |min| length >= min) && self.max.map_or(true, |max| length <= max))
    }
}

/// `matches`.
pub(crate) struct PatternCheck {
    pub(crate) regex: Regex,
}

impl<T, P: TextValue> PropertyCheck<T, P> for PatternCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Matches
    }

    fn arguments(&self) -> &[&'static str] {
        &["RegularExpression"]
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        cx.append_argument("RegularExpression", self.regex.as_str());
        Ok(value.text().map_or(true, |text| self.regex.is_match(text)))
    }
}

pub(crate) type PlainPredicate<P> = Box<dyn Fn(&P) -> bool + Send + Sync>;
pub(crate) type InstancePredicate<T, P> = Box<dyn Fn(&T, &P) -> bool + Send + Sync>;
pub(crate) type ContextPredicate<T, P> =
    Box<dyn for<'c> Fn(&mut CheckContext<'c, T>, &P) -> bool + Send + Sync>;
pub(crate) type FalliblePredicate<P> = Box<dyn Fn(&P) -> Result<bool, BoxError> + Send + Sync>;

pub(crate) enum Predicate<T, P> {
    Plain(PlainPredicate<P>),
    WithInstance(InstancePredicate<T, P>),
    WithContext(ContextPredicate<T, P>),
    Fallible(FalliblePredicate<P>),
}

/// `must` and its variants.
pub(crate) struct MustCheck<T, P> {
    pub(crate) predicate: Predicate<T, P>,
    pub(crate) arguments: &'static [&'static str],
}

impl<T, P> PropertyCheck<T, P> for MustCheck<T, P> {
    fn kind(&self) -> CheckKind {
        CheckKind::Must
    }

    fn arguments(&self) -> &[&'static str] {
        self.arguments
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        match &self.predicate {
            Predicate::Plain(predicate) => Ok(predicate(value)),
            Predicate::WithInstance(predicate) => Ok(predicate(cx.instance(), value)),
            Predicate::WithContext(predicate) => Ok(predicate(cx, value)),
            Predicate::Fallible(predicate) => predicate(value).map_err(|source| ValidationError::Engine {
                property: cx.property_path().to_string(),
                check: Cow::Borrowed(CheckKind::Must.key()),
                source,
            }),
        }
    }
}

pub(crate) type CustomAction<T, P> =
    Box<dyn for<'c> Fn(&P, &mut CheckContext<'c, T>) -> Result<(), BoxError> + Send + Sync>;

/// `custom`: adds its own failures through the context.
pub(crate) struct CustomCheck<T, P> {
    pub(crate) action: CustomAction<T, P>,
}

impl<T, P> PropertyCheck<T, P> for CustomCheck<T, P> {
    fn kind(&self) -> CheckKind {
        CheckKind::Custom
    }

    fn reports_own_failures(&self) -> bool {
        true
    }

    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError> {
        (self.action)(value, cx).map_err(|source| ValidationError::Engine {
            property: cx.property_path().to_string(),
            check: Cow::Borrowed(CheckKind::Custom.key()),
            source,
        })?;
        Ok(true)
    }
}
