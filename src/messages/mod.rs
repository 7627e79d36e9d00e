//! Message templates, the default catalog and display names.
//!
//! Every check carries a template resolved when its validator is built: an explicit
//! override given with `with_message`, or the catalog template for the check's key in the
//! configured culture. Templates are rendered only when a check fails.

pub mod catalog;
pub mod display_name;
pub mod template;

pub use catalog::{
    LanguageManager, MessageCatalog, FALLBACK_CULTURE, NULL_INSTANCE_MESSAGE, PRE_VALIDATE_MESSAGE,
};
pub use display_name::split_display_name;
pub use template::MessageTemplate;

/// Placeholders every check can use in addition to its own declared arguments.
pub const BUILT_IN_PLACEHOLDERS: &[&str] = &["PropertyName", "PropertyValue", "PropertyPath"];

/// Placeholder available in collection contexts only.
pub const COLLECTION_INDEX: &str = "CollectionIndex";
