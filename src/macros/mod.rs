//! Internal logging macros.
//!
//! The engine reports its progress through [`tracing`](https://docs.rs/tracing) when the
//! `tracing` feature is enabled (it is by default). With the feature disabled every macro
//! expands to an empty block, so call sites never need their own `#[cfg]` guards.
//!
//! | Macro | Level | Used for |
//! |-------|-------|----------|
//! | `log_trace!` | `TRACE` | skipped rules, skipped checks, unmatched variants |
//! | `log_debug!` | `DEBUG` | start and end of a validation run |
//! | `log_warn!` | `WARN` | engine faults aborting a run |

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
    }};
}

pub(crate) use {log_debug, log_trace, log_warn};
