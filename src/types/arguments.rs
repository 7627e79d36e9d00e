use core::fmt::Display;
use std::borrow::Cow;

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered name/value pairs used to render a failure message.
///
/// Checks append their arguments (for example `MinLength` or `ComparisonValue`) while
/// they run; the same pairs are kept on the produced
/// [`ValidationFailure`](crate::ValidationFailure) as its formatted arguments.
/// Appending an existing name replaces its value in place, so insertion order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageArguments {
    items: SmallVec<[(Cow<'static, str>, String); 4]>,
}

impl MessageArguments {
    /// Creates an empty argument list.
    #[inline]
    pub fn new() -> Self {
        Self { items: SmallVec::new() }
    }

    /// Appends `name = value`, replacing any earlier value for `name`.
    pub fn append(&mut self, name: impl Into<Cow<'static, str>>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.items.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.items.push((name, value)),
        }
    }

    /// Looks up the value recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Returns `true` if a value was recorded for `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(key, value)| (key.as_ref(), value.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MessageArguments
where
    K: Into<Cow<'static, str>>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Self::new();
        for (name, value) in iter {
            arguments.append(name, value);
        }
        arguments
    }
}
