//! Error types used by the bus registration and dispatch paths.
//!
//! This module defines two error enums:
//!
//! - [`BusError`] — registration-path errors surfaced to callers.
//! - [`InvokeError`] — shape drift detected inside a specialized dispatch
//!   thunk; contained at the dispatch loop and logged, never propagated to
//!   the poster.
//!
//! Both types provide `as_label()` for short stable strings in logs.

use thiserror::Error;

/// # Errors surfaced by registration operations.
///
/// Dispatch itself never returns these: `post` contains every handler
/// failure internally. Registration rejects bad input before any state is
/// mutated.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// The registrant passed to `register_all` was not recognized by the
    /// configured [`OwnerLookup`](crate::OwnerLookup).
    #[error("registrant is not recognized by the owner lookup")]
    UnknownRegistrant,

    /// A subscription was declared for a listener type that does not match
    /// the scanned object, so no dispatch thunk can be specialized for it.
    #[error("listener type mismatch: subscription declared for {expected}")]
    ListenerMismatch {
        /// Type name the subscription was declared for.
        expected: &'static str,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use typebus::BusError;
    ///
    /// assert_eq!(BusError::UnknownRegistrant.as_label(), "bus_unknown_registrant");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::UnknownRegistrant => "bus_unknown_registrant",
            BusError::ListenerMismatch { .. } => "bus_listener_mismatch",
        }
    }
}

/// # Errors raised inside a specialized handler invocation.
///
/// These indicate that the listener or event no longer matches the shape
/// the thunk was specialized for. The dispatch loop catches them, logs a
/// warning, and continues with the next handler.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The bound listener instance is not of the expected type.
    #[error("listener shape drifted: expected {expected}")]
    ListenerShape {
        /// Expected listener type name.
        expected: &'static str,
    },

    /// The posted event does not expose a view of the subscribed type.
    #[error("event exposes no {expected} view")]
    EventView {
        /// Expected event type name.
        expected: &'static str,
    },
}

impl InvokeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            InvokeError::ListenerShape { .. } => "invoke_listener_shape",
            InvokeError::EventView { .. } => "invoke_event_view",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let mismatch = BusError::ListenerMismatch { expected: "Greeter" };
        assert_eq!(mismatch.as_label(), "bus_listener_mismatch");
        assert_eq!(
            InvokeError::EventView { expected: "Tick" }.as_label(),
            "invoke_event_view"
        );
    }

    #[test]
    fn test_display_names_the_expected_type() {
        let err = InvokeError::ListenerShape { expected: "Greeter" };
        assert!(err.to_string().contains("Greeter"));
    }
}
