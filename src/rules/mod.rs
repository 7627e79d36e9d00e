//! Rules and the checks they run.
//!
//! A rule binds one property accessor to an ordered chain of checks. Rules are registered
//! through [`RuleBuilder`], handed out by
//! [`ValidatorBuilder::rule_for`](crate::ValidatorBuilder::rule_for) and
//! [`rule_for_each`](crate::ValidatorBuilder::rule_for_each).
//!
//! # Evaluation
//!
//! - A rule whose condition is false is skipped along with all of its checks. A condition
//!   attached with [`ApplyConditionTo::CurrentCheck`](crate::ApplyConditionTo) skips only the
//!   check registered right before it.
//! - Checks run in declaration order. Under [`CascadeMode::Stop`](crate::CascadeMode) the
//!   chain ends at its first failing check. Cascade is per chain: sibling rules on the same
//!   property still run.
//! - Collection rules run the chain once per element, in index order, with the path
//!   `name[index]`.
//! - Dependent rules run right after their parent, only when the parent applied and
//!   produced no failure.

pub mod builder;
pub(crate) mod checks;
pub(crate) mod entry;
pub mod nested;
pub(crate) mod rule;
pub mod traits;

pub use builder::RuleBuilder;
pub use nested::PolymorphicValidator;
pub use traits::{AsVariant, BuildEnv, CheckKind, Emptiable, PropertyCheck, TextValue};
