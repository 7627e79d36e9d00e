//! Declarative, rule-based validation of Rust values.
//!
//! Validators are assembled once from a fluent registration surface and then invoked any
//! number of times, from any number of threads. Each call returns a [`ValidationResult`]:
//! the ordered list of failures, each with a property path, a rendered message, an error
//! code and a severity.
//!
//! # Examples
//!
//! ## Property rules
//!
//! ```
//! use rule_rail::Validator;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     surname: Option<String>,
//!     forename: String,
//!     postcode: String,
//! }
//!
//! let validator = Validator::<Person>::builder()
//!     .rule_for("surname", |p| &p.surname, |rule| {
//!         rule.not_null().with_message("Surname cannot be null.")
//!     })
//!     .rule_for("forename", |p| &p.forename, |rule| rule.not_empty())
//!     .rule_for("postcode", |p| &p.postcode, |rule| rule.length(5, 10))
//!     .build()?;
//!
//! let person = Person { forename: "Jane".into(), postcode: "12345".into(), ..Person::default() };
//! let result = validator.validate(&person)?;
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.failures()[0].property_path(), "surname");
//! assert_eq!(result.failures()[0].message(), "Surname cannot be null.");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Collections and nested objects
//!
//! ```
//! use rule_rail::Validator;
//!
//! #[derive(Debug)]
//! struct Order { total: f64 }
//!
//! #[derive(Debug)]
//! struct Customer { orders: Vec<Order> }
//!
//! let order_validator = Validator::<Order>::builder()
//!     .rule_for("total", |o| &o.total, |rule| rule.greater_than(0.0))
//!     .build()?;
//!
//! let validator = Validator::<Customer>::builder()
//!     .rule_for_each("orders", |c| c.orders.as_slice(), |rule| rule.set_validator(order_validator))
//!     .build()?;
//!
//! let customer = Customer { orders: vec![Order { total: 5.0 }, Order { total: 0.0 }] };
//! let result = validator.validate(&customer)?;
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.failures()[0].property_path(), "orders[1].total");
//! assert_eq!(result.failures()[0].message(), "'Total' must be greater than '0.0'.");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Feature flags
//!
//! - `tracing` (default): structured logging of validation runs through `tracing`.
//! - `serde`: `Serialize`/`Deserialize` for results, failures and severities.
//! - `full`: everything above.

pub(crate) mod macros;

/// Per-call validation state and the context seen by checks
pub mod context;
/// Message templates, catalogs and display names
pub mod messages;
/// Per-call and process-wide configuration
pub mod options;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Rules, checks and the rule builder
pub mod rules;
/// Assertions for testing validators
pub mod test_helper;
/// Results, failures and errors
pub mod types;
/// Validators and their builder
pub mod validator;

pub use context::{CheckContext, RootContextData, ValidationContext};
pub use messages::{LanguageManager, MessageCatalog, MessageTemplate};
pub use options::{
    ApplyConditionTo, CascadeMode, GlobalOptions, ValidationOptions, ALL_RULE_SETS, DEFAULT_RULE_SET,
};
pub use rules::{
    AsVariant, BuildEnv, CheckKind, Emptiable, PolymorphicValidator, PropertyCheck, RuleBuilder, TextValue,
};
pub use types::{
    BoxError, ErrorVec, FailureFormatConfig, FailureFormatter, MessageArguments, Severity, UsageError,
    ValidationError, ValidationFailure, ValidationResult,
};
pub use validator::{Validator, ValidatorBuilder};
