//! One registered check and the loop that runs a chain of them.

use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

use crate::context::{ChainTarget, CheckContext, RunState};
use crate::messages::{MessageTemplate, BUILT_IN_PLACEHOLDERS, COLLECTION_INDEX};
use crate::options::CascadeMode;
use crate::rules::traits::{BuildEnv, PropertyCheck};
use crate::macros::{log_debug, log_trace};
use crate::types::{
    ErrorVec, MessageArguments, Severity, UsageError, ValidationError, ValidationFailure,
};

/// Predicate over the instance a validator runs on.
pub(crate) type Condition<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

pub(crate) enum MessageSource<T> {
    /// Catalog template, resolved at build time.
    Default,
    Template(MessageTemplate),
    Dynamic(Arc<dyn Fn(&T) -> String + Send + Sync>),
}

pub(crate) struct CheckEntry<T, P> {
    pub(crate) check: Box<dyn PropertyCheck<T, P>>,
    pub(crate) message: MessageSource<T>,
    pub(crate) conditions: Vec<Condition<T>>,
    pub(crate) error_code: Option<Cow<'static, str>>,
    pub(crate) severity: Severity,
}

impl<T, P> CheckEntry<T, P> {
    pub(crate) fn new(check: Box<dyn PropertyCheck<T, P>>) -> Self {
        Self {
            check,
            message: MessageSource::Default,
            conditions: Vec::new(),
            error_code: None,
            severity: Severity::Error,
        }
    }

    fn error_code(&self) -> Cow<'static, str> {
        self.error_code.clone().unwrap_or(Cow::Borrowed(self.check.kind().key()))
    }

    /// Resolves the default message and verifies every placeholder is resolvable.
    pub(crate) fn finalize(
        &mut self,
        env: &BuildEnv,
        property: &str,
        in_collection: bool,
    ) -> Result<(), UsageError> {
        self.check.prepare(env, property)?;

        if self.check.reports_own_failures() {
            return match self.message {
                MessageSource::Default => Ok(()),
                _ => Err(UsageError::MessageNotApplicable {
                    property: property.to_string(),
                    check: Cow::Borrowed(self.check.kind().key()),
                }),
            };
        }

        if let MessageSource::Default = self.message {
            let key = self.check.kind().key();
            let source = env
                .template(key)
                .map(|template| template.into_owned())
                .or_else(|| self.check.default_template().map(Cow::into_owned))
                .ok_or_else(|| UsageError::MissingDefaultMessage {
                    property: property.to_string(),
                    check: Cow::Borrowed(key),
                    culture: env.culture().unwrap_or(crate::messages::FALLBACK_CULTURE).to_string(),
                })?;
            self.message = MessageSource::Template(MessageTemplate::parse(&source)?);
        }

        if let MessageSource::Template(template) = &self.message {
            let arguments = self.check.arguments();
            let resolvable = |name: &str| {
                BUILT_IN_PLACEHOLDERS.iter().any(|known| *known == name)
                    || (in_collection && name == COLLECTION_INDEX)
                    || arguments.iter().any(|declared| *declared == name)
            };
            let unknown = template.placeholders().find(|name| !resolvable(name));
            if let Some(placeholder) = unknown {
                return Err(UsageError::UnresolvedPlaceholder {
                    property: property.to_string(),
                    placeholder: placeholder.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Runs `checks` against `value` in order.
///
/// Returns `true` when at least one check failed. With [`CascadeMode::Stop`] the chain ends
/// at the first failing check.
pub(crate) fn run_chain<T, P: Debug>(
    checks: &[CheckEntry<T, P>],
    cascade: CascadeMode,
    target: ChainTarget<'_>,
    instance: &T,
    value: &P,
    run: RunState<'_>,
    failures: &mut ErrorVec<ValidationFailure>,
) -> Result<bool, ValidationError> {
    let mut failed = false;

    for entry in checks {
        if !entry.conditions.iter().all(|condition| condition(instance)) {
            log_trace!(property = target.path, check = %entry.check.kind(), "check skipped by condition");
            continue;
        }

        let before = failures.len();
        let mut cx =
            CheckContext::new(instance, target, run, failures, entry.error_code(), entry.severity);
        let passed = entry.check.is_valid(&mut cx, value)?;
        let arguments = cx.into_arguments();
        let reported = failures.len() > before;

        if !passed && !reported {
            failures.push(build_failure(entry, target, instance, value, arguments));
        }

        if !passed || reported {
            failed = true;
            log_debug!(property = target.path, check = %entry.check.kind(), "check failed");
            if cascade == CascadeMode::Stop {
                break;
            }
        }
    }

    Ok(failed)
}

fn build_failure<T, P: Debug>(
    entry: &CheckEntry<T, P>,
    target: ChainTarget<'_>,
    instance: &T,
    value: &P,
    check_arguments: MessageArguments,
) -> ValidationFailure {
    let attempted = render_value(value);

    let mut arguments = MessageArguments::new();
    arguments.append("PropertyName", target.display_name);
    arguments.append("PropertyValue", &attempted);
    if let Some(index) = target.index {
        arguments.append(COLLECTION_INDEX, index);
    }
    for (name, value) in check_arguments.iter() {
        arguments.append(name.to_string(), value);
    }

    let message = match &entry.message {
        MessageSource::Dynamic(message) => message(instance),
        MessageSource::Template(template) => template.render(|name| match name {
            "PropertyPath" => Some(Cow::Borrowed(target.path)),
            other => arguments.get(other).map(Cow::Borrowed),
        }),
        // Unreachable after finalize; fall back to the raw check key.
        MessageSource::Default => entry.check.kind().key().to_string(),
    };

    ValidationFailure::new(target.path, message)
        .with_error_code(entry.error_code())
        .with_severity(entry.severity)
        .with_attempted_value(attempted)
        .with_arguments(arguments)
}

/// Renders a value for messages: its `Debug` form without `Some(..)` wrappers or string
/// quotes. `None` renders as an empty string.
pub(crate) fn render_value<P: Debug + ?Sized>(value: &P) -> String {
    let mut text = format!("{value:?}");
    loop {
        if text == "None" {
            return String::new();
        }
        match text.strip_prefix("Some(").and_then(|inner| inner.strip_suffix(')')) {
            Some(inner) => text = inner.to_string(),
            None => break,
        }
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = text[1..text.len() - 1].replace("\\\"", "\"");
    }
    text
}
