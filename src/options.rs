//! Per-call and process-wide configuration.
//!
//! [`ValidationOptions`] selects the rule sets of one call. [`GlobalOptions`] holds the
//! defaults every validator reads when it is *built*: the message catalog and culture, the
//! default cascade modes and the display-name resolver. Installing new global options never
//! changes a validator that already exists.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::messages::{split_display_name, LanguageManager, MessageCatalog};

/// Rule set every rule registered outside a `rule_set` block belongs to.
pub const DEFAULT_RULE_SET: &str = "default";

/// Wildcard selecting every rule set.
pub const ALL_RULE_SETS: &str = "*";

/// Whether a chain keeps evaluating after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CascadeMode {
    /// Stop at the first failure.
    #[default]
    Stop,
    /// Evaluate everything and collect all failures.
    Continue,
}

/// Scope of a condition attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplyConditionTo {
    /// The condition gates the whole rule.
    #[default]
    AllChecks,
    /// The condition gates only the check registered right before it.
    CurrentCheck,
}

/// Options of a single validation call.
///
/// With no rule set requested only the `"default"` set runs.
///
/// # Examples
///
/// ```
/// use rule_rail::ValidationOptions;
///
/// let options = ValidationOptions::new().include_rule_set("Names").include_rules_not_in_rule_set();
/// assert!(options.selects(["Names"]));
/// assert!(options.selects(["default"]));
/// assert!(!options.selects(["Addresses"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    rule_sets: Vec<Cow<'static, str>>,
    throw_on_failures: bool,
}

impl ValidationOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests one more rule set.
    #[must_use]
    pub fn include_rule_set(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if !self.rule_sets.contains(&name) {
            self.rule_sets.push(name);
        }
        self
    }

    /// Requests several rule sets.
    #[must_use]
    pub fn include_rule_sets<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        names.into_iter().fold(self, Self::include_rule_set)
    }

    /// Also runs the rules registered outside any rule set.
    #[must_use]
    pub fn include_rules_not_in_rule_set(self) -> Self {
        self.include_rule_set(DEFAULT_RULE_SET)
    }

    /// Runs every rule regardless of its rule sets.
    #[must_use]
    pub fn include_all_rule_sets(self) -> Self {
        self.include_rule_set(ALL_RULE_SETS)
    }

    /// Makes `validate` return [`ValidationError::Failed`](crate::ValidationError::Failed)
    /// (or the validator's raise hook error) instead of an invalid result.
    #[must_use]
    pub fn throw_on_failures(mut self) -> Self {
        self.throw_on_failures = true;
        self
    }

    #[inline]
    pub fn throws_on_failures(&self) -> bool {
        self.throw_on_failures
    }

    /// Rule sets that run, with the implicit default applied.
    pub fn effective_rule_sets(&self) -> Vec<&str> {
        if self.rule_sets.is_empty() {
            vec![DEFAULT_RULE_SET]
        } else {
            self.rule_sets.iter().map(|s| &**s).collect()
        }
    }

    /// Returns `true` if a rule tagged with `rule_sets` runs under these options.
    pub fn selects<'s, I>(&self, rule_sets: I) -> bool
    where
        I: IntoIterator<Item = &'s str>,
    {
        let requested = self.effective_rule_sets();
        if requested.contains(&ALL_RULE_SETS) {
            return true;
        }
        rule_sets.into_iter().any(|set| requested.contains(&set))
    }
}

static GLOBAL: LazyLock<ArcSwap<GlobalOptions>> =
    LazyLock::new(|| ArcSwap::from_pointee(GlobalOptions::default()));

/// Process-wide defaults read when a validator is built.
///
/// Reads are lock-free. Install options before building the validators that depend on them:
/// default messages, cascade defaults and display names are resolved at build time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rule_rail::messages::LanguageManager;
/// use rule_rail::GlobalOptions;
///
/// let catalog = Arc::new(LanguageManager::new().with_translation("en", "not_null", "'{PropertyName}' is required."));
/// GlobalOptions::update(|options| options.language_manager = catalog.clone());
/// # GlobalOptions::reset();
/// ```
#[derive(Clone)]
pub struct GlobalOptions {
    pub language_manager: Arc<dyn MessageCatalog>,
    /// Culture used for catalog lookups; `None` means the fallback culture.
    pub culture: Option<String>,
    pub default_rule_level_cascade: CascadeMode,
    pub default_class_level_cascade: CascadeMode,
    /// Maps a property name to the name shown in messages.
    pub display_name_resolver: fn(&str) -> String,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            language_manager: Arc::new(LanguageManager::new()),
            culture: None,
            default_rule_level_cascade: CascadeMode::Stop,
            default_class_level_cascade: CascadeMode::Continue,
            display_name_resolver: split_display_name,
        }
    }
}

impl GlobalOptions {
    /// Snapshot of the installed options.
    pub fn current() -> Arc<GlobalOptions> {
        GLOBAL.load_full()
    }

    /// Replaces the installed options.
    pub fn install(self) {
        GLOBAL.store(Arc::new(self));
    }

    /// Applies `f` to a copy of the installed options and installs the copy.
    ///
    /// Concurrent updates are not lost: when another thread installed options in between,
    /// `f` runs again on the newer snapshot.
    pub fn update(mut f: impl FnMut(&mut GlobalOptions)) {
        GLOBAL.rcu(|current| {
            let mut options = GlobalOptions::clone(current);
            f(&mut options);
            options
        });
    }

    /// Restores the built-in defaults.
    pub fn reset() {
        GlobalOptions::default().install();
    }
}

impl fmt::Debug for GlobalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalOptions")
            .field("culture", &self.culture)
            .field("default_rule_level_cascade", &self.default_rule_level_cascade)
            .field("default_class_level_cascade", &self.default_class_level_cascade)
            .finish_non_exhaustive()
    }
}
