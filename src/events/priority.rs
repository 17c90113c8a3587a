//! # Dispatch priorities.
//!
//! [`Priority`] fixes the global phase order for event delivery. A posted
//! event walks **every** applicable handler set once per priority: all
//! `First` handlers run (across the whole type hierarchy) before any `Early`
//! handler, and so on down to `Monitor`.
//!
//! ## Rules
//! - The order is total and process-wide; it never depends on which event
//!   type a handler was registered against.
//! - Within one priority and one handler set, handlers run in registration
//!   order (insertion order of the baked snapshot).
//! - `Monitor` is the conventional "observe only" phase: it runs last and
//!   should not mutate the event.
//!
//! ## Example
//! ```rust
//! use typebus::Priority;
//!
//! assert!(Priority::First < Priority::Default);
//! assert!(Priority::Last < Priority::Monitor);
//! assert_eq!(Priority::ALL.len(), 6);
//! assert_eq!(Priority::default(), Priority::Default);
//! ```

/// Dispatch phase for a handler registration.
///
/// Variants are listed in dispatch order; the derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Runs before everything else (e.g. input validation, early veto).
    First,
    /// Runs early, after `First`.
    Early,
    /// Normal phase for most handlers.
    Default,
    /// Runs late, typically to react to what earlier handlers decided.
    Late,
    /// Runs after every mutating phase.
    Last,
    /// Observation phase; runs at the very end of dispatch.
    Monitor,
}

impl Priority {
    /// Number of priority levels.
    pub const COUNT: usize = 6;

    /// All priorities in dispatch order.
    pub const ALL: [Priority; Priority::COUNT] = [
        Priority::First,
        Priority::Early,
        Priority::Default,
        Priority::Late,
        Priority::Last,
        Priority::Monitor,
    ];

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::First => "first",
            Priority::Early => "early",
            Priority::Default => "default",
            Priority::Late => "late",
            Priority::Last => "last",
            Priority::Monitor => "monitor",
        }
    }

    /// Index of this priority inside [`Priority::ALL`].
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Default
    }
}
