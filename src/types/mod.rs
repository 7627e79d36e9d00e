//! Result and error types.
//!
//! This module provides the data a validation run produces: [`ValidationFailure`]s collected
//! into a [`ValidationResult`], the [`MessageArguments`] failures were rendered with, and the
//! two error types of the engine, [`UsageError`] and [`ValidationError`].
//!
//! # Examples
//!
//! ```
//! use rule_rail::types::{FailureFormatConfig, ValidationFailure, ValidationResult};
//!
//! let result: ValidationResult = vec![
//!     ValidationFailure::new("surname", "Surname cannot be null."),
//!     ValidationFailure::new("postcode", "Postcode is too short."),
//! ]
//! .into_iter()
//! .collect();
//!
//! let text = result.to_string_with(&FailureFormatConfig::compact());
//! assert_eq!(text, "surname: Surname cannot be null. | postcode: Postcode is too short.");
//! ```
use smallvec::SmallVec;

pub mod arguments;
pub mod error;
pub mod failure;
pub mod failure_formatter;
pub mod result;

pub use arguments::*;
pub use error::*;
pub use failure::*;
pub use failure_formatter::*;
pub use result::*;

/// SmallVec-backed collection used for accumulating failures.
///
/// Uses inline storage for one element, the common case of a single failing check.
pub type ErrorVec<E> = SmallVec<[E; 1]>;
