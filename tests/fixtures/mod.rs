pub mod models;

pub use models::*;
pub use validators::*;
