//! # Bus configuration.
//!
//! Provides [`BusConfig`], the centralized knobs for an
//! [`EventBus`](crate::EventBus). The bus has deliberately few of them:
//! dispatch semantics (priority order, containment, cancellation) are
//! contracts, not configuration.

/// Configuration for an event bus instance.
///
/// ## Field semantics
/// - `warn_on_duplicate`: duplicate registrations are always rejected
///   (`register` returns `false`); this flag controls whether the rejection
///   is also logged at warn level.
/// - `trace_dispatch`: emit a debug-level line per post with the number of
///   consulted handler sets. Off by default; post is on the hot path.
#[derive(Clone, Copy, Debug)]
pub struct BusConfig {
    /// Log rejected duplicate registrations.
    pub warn_on_duplicate: bool,

    /// Log each post at debug level.
    pub trace_dispatch: bool,
}

impl Default for BusConfig {
    /// Defaults: duplicates are logged, per-post tracing is off.
    fn default() -> Self {
        Self {
            warn_on_duplicate: true,
            trace_dispatch: false,
        }
    }
}
