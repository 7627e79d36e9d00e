use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::context::CheckContext;
use crate::options::{CascadeMode, GlobalOptions};
use crate::types::{UsageError, ValidationError};

/// Identifies a check. The key doubles as catalog key and default error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CheckKind {
    NotNull,
    Null,
    NotEmpty,
    Empty,
    Equal,
    NotEqual,
    Length,
    MinLength,
    MaxLength,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    InclusiveBetween,
    Matches,
    Must,
    Custom,
    ChildValidator,
    Polymorphic,
    Each,
    /// A user-defined check.
    Named(&'static str),
}

impl CheckKind {
    pub const fn key(&self) -> &'static str {
        match self {
            Self::NotNull => "not_null",
            Self::Null => "null",
            Self::NotEmpty => "not_empty",
            Self::Empty => "empty",
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::Length => "length",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThan => "less_than",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::InclusiveBetween => "inclusive_between",
            Self::Matches => "matches",
            Self::Must => "must",
            Self::Custom => "custom",
            Self::ChildValidator => "child_validator",
            Self::Polymorphic => "polymorphic",
            Self::Each => "each",
            Self::Named(name) => *name,
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Build-time view of the global options, handed to checks when a validator is built.
pub struct BuildEnv {
    options: Arc<GlobalOptions>,
    rule_cascade: CascadeMode,
}

impl BuildEnv {
    pub(crate) fn new(options: Arc<GlobalOptions>, rule_cascade: Option<CascadeMode>) -> Self {
        let rule_cascade = rule_cascade.unwrap_or(options.default_rule_level_cascade);
        Self { options, rule_cascade }
    }

    #[inline]
    pub fn culture(&self) -> Option<&str> {
        self.options.culture.as_deref()
    }

    /// Catalog template for `key` in the configured culture.
    pub fn template(&self, key: &str) -> Option<Cow<'_, str>> {
        self.options.language_manager.template(self.culture(), key)
    }

    /// Display name the resolver produces for `property`.
    pub fn display_name(&self, property: &str) -> String {
        (self.options.display_name_resolver)(property)
    }

    /// Cascade mode of rules that set none of their own.
    #[inline]
    pub fn rule_cascade(&self) -> CascadeMode {
        self.rule_cascade
    }

    #[inline]
    pub(crate) fn global(&self) -> &GlobalOptions {
        &self.options
    }

    /// The snapshot this environment reads, for building nested validators against it.
    pub(crate) fn snapshot(&self) -> Arc<GlobalOptions> {
        Arc::clone(&self.options)
    }
}

/// A single pass/fail test on a property of type `P`, inside a validator for `T`.
///
/// Implement this to plug reusable checks into a rule with
/// [`RuleBuilder::set_check`](crate::RuleBuilder::set_check).
///
/// # Examples
///
/// ```
/// use rule_rail::{CheckContext, CheckKind, PropertyCheck, ValidationError};
/// use std::borrow::Cow;
///
/// struct MaxItems(usize);
///
/// impl<T, E> PropertyCheck<T, Vec<E>> for MaxItems {
///     fn kind(&self) -> CheckKind {
///         CheckKind::Named("max_items")
///     }
///
///     fn arguments(&self) -> &[&'static str] {
///         &["MaxElements"]
///     }
///
///     fn default_template(&self) -> Option<Cow<'static, str>> {
///         Some(Cow::Borrowed("{PropertyName} must contain fewer than {MaxElements} items."))
///     }
///
///     fn is_valid(&self, cx: &mut CheckContext<'_, T>, list: &Vec<E>) -> Result<bool, ValidationError> {
///         cx.append_argument("MaxElements", self.0);
///         Ok(list.len() < self.0)
///     }
/// }
/// ```
pub trait PropertyCheck<T, P>: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Names of the message arguments this check appends.
    fn arguments(&self) -> &[&'static str] {
        &[]
    }

    /// Template used when neither the rule nor the catalog provides one.
    fn default_template(&self) -> Option<Cow<'static, str>> {
        None
    }

    /// Checks that add their own failures (nested validators, custom checks) return `true`;
    /// they take no message template.
    fn reports_own_failures(&self) -> bool {
        false
    }

    /// Called once when the owning validator is built.
    fn prepare(&mut self, _env: &BuildEnv, _property: &str) -> Result<(), UsageError> {
        Ok(())
    }

    /// Returns `Ok(false)` when `value` fails the check.
    fn is_valid(&self, cx: &mut CheckContext<'_, T>, value: &P) -> Result<bool, ValidationError>;
}

/// Values with a notion of emptiness, used by `not_empty` and `empty`.
///
/// Strings and collections are empty when they have no element, numbers when they equal
/// zero, `false` is empty and `None` is empty.
pub trait Emptiable {
    fn is_empty_value(&self) -> bool;
}

impl Emptiable for str {
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Emptiable for String {
    fn is_empty_value(&self) -> bool {
        self.as_str().is_empty_value()
    }
}

impl Emptiable for Cow<'_, str> {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<E: Emptiable + ?Sized> Emptiable for &E {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<E: Emptiable + ?Sized> Emptiable for Box<E> {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<E: Emptiable> Emptiable for Option<E> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, Emptiable::is_empty_value)
    }
}

impl<E> Emptiable for [E] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<E> Emptiable for Vec<E> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Emptiable for HashMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Emptiable for BTreeMap<K, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<E, S> Emptiable for HashSet<E, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<E> Emptiable for BTreeSet<E> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiable for bool {
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

macro_rules! impl_emptiable_for_numbers {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl Emptiable for $ty {
                fn is_empty_value(&self) -> bool {
                    *self == $zero
                }
            }
        )*
    };
}

impl_emptiable_for_numbers!(
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    f32 => 0.0, f64 => 0.0,
);

/// Values with text, used by `length`, `min_length`, `max_length` and `matches`.
///
/// `None` has no text; checks on text pass when there is none, leaving absence to
/// `not_null` and `not_empty`.
pub trait TextValue {
    fn text(&self) -> Option<&str>;
}

impl TextValue for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextValue for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl TextValue for Cow<'_, str> {
    fn text(&self) -> Option<&str> {
        Some(&**self)
    }
}

impl TextValue for Box<str> {
    fn text(&self) -> Option<&str> {
        Some(&**self)
    }
}

impl<V: TextValue + ?Sized> TextValue for &V {
    fn text(&self) -> Option<&str> {
        (**self).text()
    }
}

impl<V: TextValue> TextValue for Option<V> {
    fn text(&self) -> Option<&str> {
        self.as_ref().and_then(TextValue::text)
    }
}

/// Projection of a polymorphic value onto one of its variants.
///
/// Implement it for every variant a polymorphic rule dispatches on:
///
/// ```
/// use rule_rail::AsVariant;
///
/// struct Organisation;
/// struct ContactPerson;
///
/// enum Contact {
///     Organisation(Organisation),
///     Person(ContactPerson),
/// }
///
/// impl AsVariant<Organisation> for Contact {
///     fn as_variant(&self) -> Option<&Organisation> {
///         match self {
///             Contact::Organisation(organisation) => Some(organisation),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait AsVariant<V> {
    fn as_variant(&self) -> Option<&V>;
}

impl<V> AsVariant<V> for Option<V> {
    fn as_variant(&self) -> Option<&V> {
        self.as_ref()
    }
}
