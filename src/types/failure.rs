use core::fmt::{self, Display};
use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::MessageArguments;

/// Severity attached to a failure.
///
/// Severity is informational: every failure, whatever its severity, makes a result invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        })
    }
}

/// A single failed check.
///
/// `property_path` locates the failing value from the root instance, using `.` between
/// nested properties and `[i]` for collection elements (`orders[0].total`). Failures
/// produced before any rule runs (pre-validation, absent instance) have an empty path.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationFailure {
    pub(crate) property_path: String,
    pub(crate) message: String,
    pub(crate) error_code: Cow<'static, str>,
    pub(crate) severity: Severity,
    pub(crate) attempted_value: Option<String>,
    pub(crate) arguments: MessageArguments,
}

impl ValidationFailure {
    /// Creates a failure for `property_path` with an already formatted message.
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
            error_code: Cow::Borrowed("custom"),
            severity: Severity::Error,
            attempted_value: None,
            arguments: MessageArguments::new(),
        }
    }

    #[inline]
    pub fn with_error_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.error_code = code.into();
        self
    }

    #[inline]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Records a rendering of the value that failed.
    #[inline]
    pub fn with_attempted_value(mut self, value: impl Into<String>) -> Self {
        self.attempted_value = Some(value.into());
        self
    }

    #[inline]
    pub fn with_arguments(mut self, arguments: MessageArguments) -> Self {
        self.arguments = arguments;
        self
    }

    #[inline]
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Code identifying the check that failed (`not_null`, `length`, ...), or a custom code.
    #[inline]
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Debug rendering of the value that failed, when known.
    #[inline]
    pub fn attempted_value(&self) -> Option<&str> {
        self.attempted_value.as_deref()
    }

    /// Arguments the message was rendered with.
    #[inline]
    pub fn formatted_arguments(&self) -> &MessageArguments {
        &self.arguments
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.property_path, self.message)
        }
    }
}
