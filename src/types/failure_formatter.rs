//! Failure list formatting utilities.

use crate::types::ValidationFailure;

/// Trait for customizing how a list of failures is rendered.
pub trait FailureFormatter {
    fn format_failure(&self, failure: &ValidationFailure) -> String {
        failure.to_string()
    }

    fn separator(&self) -> &str {
        "\n"
    }

    fn format_failures<'a>(&self, failures: impl Iterator<Item = &'a ValidationFailure>) -> String {
        failures.map(|failure| self.format_failure(failure)).collect::<Vec<_>>().join(self.separator())
    }
}

/// Configuration-based failure formatter.
///
/// The default configuration is what [`ValidationError::Failed`](crate::ValidationError)
/// displays:
///
/// ```text
/// Validation failed:
///  -- surname: Surname cannot be null.
///  -- postcode: Postcode must be between 5 and 10 characters.
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureFormatConfig {
    pub header: Option<String>,
    pub separator: String,
    pub item_prefix: Option<String>,
    pub last_item_prefix: Option<String>,
    pub show_path: bool,
    pub show_code: bool,
    pub show_severity: bool,
}

impl Default for FailureFormatConfig {
    fn default() -> Self {
        Self {
            header: Some("Validation failed:".into()),
            separator: "\n".into(),
            item_prefix: Some(" -- ".into()),
            last_item_prefix: None,
            show_path: true,
            show_code: false,
            show_severity: false,
        }
    }
}

impl FailureFormatConfig {
    #[inline]
    pub fn pretty() -> Self {
        Self {
            item_prefix: Some("├─ ".into()),
            last_item_prefix: Some("└─ ".into()),
            show_severity: true,
            ..Default::default()
        }
    }

    #[inline]
    pub fn compact() -> Self {
        Self { header: None, separator: " | ".into(), item_prefix: None, ..Default::default() }
    }

    #[inline]
    pub fn messages_only() -> Self {
        Self { header: None, item_prefix: None, show_path: false, ..Default::default() }
    }

    #[inline]
    pub fn with_codes(mut self) -> Self {
        self.show_code = true;
        self
    }
}

impl FailureFormatter for FailureFormatConfig {
    fn format_failure(&self, failure: &ValidationFailure) -> String {
        let mut line = String::new();
        if self.show_path && !failure.property_path().is_empty() {
            line.push_str(failure.property_path());
            line.push_str(": ");
        }
        line.push_str(failure.message());
        if self.show_code {
            line.push_str(" [");
            line.push_str(failure.error_code());
            line.push(']');
        }
        if self.show_severity {
            line.push_str(" Severity: ");
            line.push_str(&failure.severity().to_string());
        }
        line
    }

    fn separator(&self) -> &str {
        &self.separator
    }

    fn format_failures<'a>(&self, failures: impl Iterator<Item = &'a ValidationFailure>) -> String {
        let items: Vec<_> = failures.collect();
        let mut result = String::with_capacity(items.len() * 48);

        if let Some(header) = &self.header {
            result.push_str(header);
        }

        let last_idx = items.len().saturating_sub(1);
        for (i, failure) in items.iter().enumerate() {
            if i > 0 || self.header.is_some() {
                result.push_str(&self.separator);
            }

            let prefix = if i == last_idx {
                self.last_item_prefix.as_ref().or(self.item_prefix.as_ref())
            } else {
                self.item_prefix.as_ref()
            };
            if let Some(p) = prefix {
                result.push_str(p);
            }

            result.push_str(&self.format_failure(failure));
        }
        result
    }
}
