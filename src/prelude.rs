//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use rule_rail::prelude::*;
//!
//! #[derive(Debug)]
//! struct Pet { name: String }
//!
//! let validator = Validator::<Pet>::builder()
//!     .rule_for("name", |p| &p.name, |rule| rule.not_empty().cascade(CascadeMode::Continue))
//!     .build()
//!     .expect("valid rules");
//!
//! validator.test_validate(&Pet { name: String::new() }).should_have_validation_error_for("name");
//! ```

pub use crate::context::{CheckContext, ValidationContext};
pub use crate::options::{ApplyConditionTo, CascadeMode, ValidationOptions};
pub use crate::rules::{AsVariant, PropertyCheck, RuleBuilder};
pub use crate::test_helper::TestValidate;
pub use crate::types::{Severity, UsageError, ValidationError, ValidationFailure, ValidationResult};
pub use crate::validator::{Validator, ValidatorBuilder};
