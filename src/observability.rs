//! Logging infrastructure for benchtab.
//!
//! benchtab uses `tracing` for structured logging. All events use target
//! "benchtab" and include an `event` field for filtering.
//!
//! ## Library Integration
//!
//! The library never initializes a global subscriber. The `benchtab` binary
//! installs a `tracing_subscriber` fmt layer; other callers bring their own.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: module/subsystem (e.g., "extractor", "compare")
//! - Use `%` for Display, `?` for Debug formatting

/// Target for all benchtab log events.
pub(crate) const BENCHTAB_TARGET: &str = "benchtab";

/// Macro for info-level log events.
///
/// # Example
/// ```ignore
/// log_info!(
///     component = "collect",
///     event = "collect_completed",
///     root = %root.display(),
///     files = records.len(),
/// );
/// ```
macro_rules! log_info {
    ($($field:tt)*) => {
        ::tracing::info!(target: $crate::observability::BENCHTAB_TARGET, $($field)*)
    };
}

/// Macro for debug-level log events.
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::BENCHTAB_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::BENCHTAB_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
