//! # Cancellation capability.
//!
//! An event type may expose a mutable cancelled flag by implementing
//! [`Cancellable`]. Cancelling an event does **not** stop dispatch: the bus
//! always runs every applicable handler. The flag only gates handlers that
//! registered with `ignore_cancelled = true`, which skip themselves when the
//! event is already cancelled at their turn.
//!
//! Handlers receive events by shared reference, so the flag uses interior
//! mutability. [`CancelFlag`] is the ready-made atomic flag to embed in an
//! event struct; [`cancellable_via!`](crate::cancellable_via) delegates the
//! trait to that field (or to an embedded cancellable parent event).
//!
//! ## Example
//! ```rust
//! use typebus::{CancelFlag, Cancellable};
//!
//! let flag = CancelFlag::new();
//! assert!(!flag.is_cancelled());
//! flag.set_cancelled(true);
//! assert!(flag.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

/// Capability of an event that can be flagged as cancelled mid-dispatch.
///
/// Cancellation is advisory: dispatch runs to completion regardless, and
/// [`EventBus::post`](crate::EventBus::post) reports the final state.
pub trait Cancellable {
    /// Returns the current cancelled state.
    fn is_cancelled(&self) -> bool;

    /// Sets the cancelled state. Handlers at later priorities observe the
    /// update within the same dispatch.
    fn set_cancelled(&self, cancelled: bool);
}

/// Interior-mutable cancelled flag for embedding in event types.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }
}

impl Cancellable for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    #[inline]
    fn set_cancelled(&self, cancelled: bool) {
        self.0.store(cancelled, Ordering::SeqCst);
    }
}

/// Implements [`Cancellable`] for an event type by delegating to a field.
///
/// The field can be a [`CancelFlag`] or an embedded parent event that is
/// itself cancellable.
///
/// ```rust
/// use typebus::{cancellable_via, event_type, CancelFlag, Cancellable};
///
/// struct ChatMessage {
///     cancelled: CancelFlag,
/// }
/// cancellable_via!(ChatMessage, cancelled);
/// event_type!(ChatMessage: cancellable);
///
/// let msg = ChatMessage { cancelled: CancelFlag::new() };
/// msg.set_cancelled(true);
/// assert!(msg.is_cancelled());
/// ```
#[macro_export]
macro_rules! cancellable_via {
    ($ty:ty, $field:ident) => {
        impl $crate::Cancellable for $ty {
            #[inline]
            fn is_cancelled(&self) -> bool {
                $crate::Cancellable::is_cancelled(&self.$field)
            }

            #[inline]
            fn set_cancelled(&self, cancelled: bool) {
                $crate::Cancellable::set_cancelled(&self.$field, cancelled);
            }
        }
    };
}
