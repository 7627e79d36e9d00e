use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::context::{ChainTarget, RunState};
use crate::macros::log_trace;
use crate::options::CascadeMode;
use crate::rules::entry::{run_chain, CheckEntry, Condition};
use crate::rules::nested::ElementFilter;
use crate::rules::traits::BuildEnv;
use crate::types::{ErrorVec, UsageError, ValidationError, ValidationFailure};

pub(crate) type Accessor<T, P> = Box<dyn for<'a> Fn(&'a T) -> &'a P + Send + Sync>;
pub(crate) type ItemsAccessor<T, E> = Box<dyn for<'a> Fn(&'a T) -> &'a [E] + Send + Sync>;

/// Where a rule reads the value(s) its chain runs on.
pub(crate) enum PropertySource<T, P> {
    Single(Accessor<T, P>),
    Each { items: ItemsAccessor<T, P>, filter: Option<ElementFilter<P>> },
    /// Element chain of a `for_each`; never executed as a rule.
    Detached { filter: Option<ElementFilter<P>> },
}

/// What executing a rule amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    /// A condition excluded the rule.
    Skipped,
    Passed,
    Failed,
}

/// A type-erased rule of a validator for `T`.
pub(crate) trait ValidationRule<T>: Send + Sync {
    fn property_name(&self) -> &str;

    fn rule_sets(&self) -> &BTreeSet<Cow<'static, str>>;

    fn assign_rule_set(&mut self, name: Cow<'static, str>);

    fn push_condition(&mut self, condition: Condition<T>);

    fn finalize(&mut self, env: &BuildEnv) -> Result<(), UsageError>;

    fn execute(
        &self,
        instance: &T,
        run: RunState<'_>,
        failures: &mut ErrorVec<ValidationFailure>,
    ) -> Result<RuleOutcome, ValidationError>;
}

/// A property accessor and the chain of checks run on its value.
pub(crate) struct PropertyRule<T, P> {
    pub(crate) property_name: Cow<'static, str>,
    pub(crate) display_name: Option<String>,
    pub(crate) source: PropertySource<T, P>,
    pub(crate) checks: Vec<CheckEntry<T, P>>,
    pub(crate) conditions: Vec<Condition<T>>,
    pub(crate) cascade: Option<CascadeMode>,
    pub(crate) rule_sets: BTreeSet<Cow<'static, str>>,
    pub(crate) dependents: Vec<Box<dyn ValidationRule<T>>>,
}

impl<T, P> PropertyRule<T, P> {
    pub(crate) fn new(property_name: Cow<'static, str>, source: PropertySource<T, P>) -> Self {
        Self {
            property_name,
            display_name: None,
            source,
            checks: Vec::new(),
            conditions: Vec::new(),
            cascade: None,
            rule_sets: BTreeSet::new(),
            dependents: Vec::new(),
        }
    }

    fn is_collection(&self) -> bool {
        !matches!(self.source, PropertySource::Single(_))
    }

    fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.property_name)
    }
}

impl<T, P> ValidationRule<T> for PropertyRule<T, P>
where
    T: 'static,
    P: Debug + 'static,
{
    fn property_name(&self) -> &str {
        &self.property_name
    }

    fn rule_sets(&self) -> &BTreeSet<Cow<'static, str>> {
        &self.rule_sets
    }

    fn assign_rule_set(&mut self, name: Cow<'static, str>) {
        self.rule_sets.insert(name);
    }

    fn push_condition(&mut self, condition: Condition<T>) {
        self.conditions.push(condition);
    }

    fn finalize(&mut self, env: &BuildEnv) -> Result<(), UsageError> {
        if self.display_name.is_none() {
            self.display_name = Some(env.display_name(&self.property_name));
        }
        self.cascade.get_or_insert(env.rule_cascade());

        let in_collection = self.is_collection();
        for entry in &mut self.checks {
            entry.finalize(env, &self.property_name, in_collection)?;
        }
        for dependent in &mut self.dependents {
            dependent.finalize(env)?;
        }
        Ok(())
    }

    fn execute(
        &self,
        instance: &T,
        run: RunState<'_>,
        failures: &mut ErrorVec<ValidationFailure>,
    ) -> Result<RuleOutcome, ValidationError> {
        if !self.conditions.iter().all(|condition| condition(instance)) {
            log_trace!(property = %self.property_name, "rule skipped by condition");
            return Ok(RuleOutcome::Skipped);
        }

        let cascade = self.cascade.unwrap_or_default();
        let path = run.child_path(&self.property_name);
        let display_name = self.display_name();
        let before = failures.len();

        match &self.source {
            PropertySource::Single(accessor) => {
                let target = ChainTarget { path: &path, display_name, index: None };
                run_chain(&self.checks, cascade, target, instance, accessor(instance), run, failures)?;
            }
            PropertySource::Each { items, filter } => {
                for (index, item) in items(instance).iter().enumerate() {
                    if filter.as_ref().is_some_and(|keep| !keep(item)) {
                        continue;
                    }
                    let element_path = format!("{path}[{index}]");
                    let target = ChainTarget { path: &element_path, display_name, index: Some(index) };
                    run_chain(&self.checks, cascade, target, instance, item, run, failures)?;
                }
            }
            PropertySource::Detached { .. } => {}
        }

        if failures.len() > before {
            return Ok(RuleOutcome::Failed);
        }

        for dependent in &self.dependents {
            dependent.execute(instance, run, failures)?;
        }

        Ok(if failures.len() > before { RuleOutcome::Failed } else { RuleOutcome::Passed })
    }
}
