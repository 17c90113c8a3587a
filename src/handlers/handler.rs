//! # Bound dispatch unit.
//!
//! A [`Handler`] binds one listener instance to one specialized invoke
//! thunk. The thunk is produced (and cached) by the
//! [`HandlerFactory`](crate::HandlerFactory); the instance is bound here,
//! at handler construction, so the same thunk serves every instance of a
//! listener type.
//!
//! ## Rules
//! - Identity is `(listener instance, callback)`; priority, owner and the
//!   ignore-cancelled flag do **not** participate. Identity drives
//!   de-duplication on register and matching on remove.
//! - `invoke` is cheap: one short-circuit check, two downcasts, one direct
//!   call. No lookup by name or signature happens per post.
//! - Handlers are freely cloneable; clones share the listener and thunk and
//!   compare equal.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::InvokeError;
use crate::events::Event;

/// Specialized invocation path shared by every handler of one
/// (listener type, callback, flag) key.
pub(crate) type InvokeFn =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &dyn Event) -> Result<(), InvokeError> + Send + Sync>;

/// Identity of a subscriber callback, derived from its function pointer.
///
/// Two subscriptions naming the same callback of the same listener type
/// produce equal ids; ids are stable for the lifetime of the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(usize);

impl CallbackId {
    /// Identity of `callback`.
    pub fn of<L, E>(callback: fn(&L, &E)) -> Self {
        CallbackId(callback as usize)
    }
}

impl fmt::Debug for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackId({:#x})", self.0)
    }
}

/// A directly invocable binding of one listener object to one callback for
/// one event type.
#[derive(Clone)]
pub struct Handler {
    listener: Arc<dyn Any + Send + Sync>,
    callback: CallbackId,
    invoke: InvokeFn,
    listener_name: &'static str,
    event_name: &'static str,
}

impl Handler {
    pub(crate) fn new(
        listener: Arc<dyn Any + Send + Sync>,
        callback: CallbackId,
        invoke: InvokeFn,
        listener_name: &'static str,
        event_name: &'static str,
    ) -> Self {
        Self {
            listener,
            callback,
            invoke,
            listener_name,
            event_name,
        }
    }

    /// Invokes the bound callback for `event`.
    ///
    /// Honors the ignore-cancelled short-circuit baked into the thunk.
    /// Errors indicate shape drift (see [`InvokeError`]); panics from the
    /// listener propagate to the caller, which is expected to contain them.
    #[inline]
    pub fn invoke(&self, event: &dyn Event) -> Result<(), InvokeError> {
        (self.invoke)(self.listener.as_ref(), event)
    }

    /// Listener type name, for diagnostics.
    #[inline]
    pub fn listener_name(&self) -> &'static str {
        self.listener_name
    }

    /// Subscribed event type name, for diagnostics.
    #[inline]
    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// Identity tuple: (listener instance address, callback id).
    fn identity(&self) -> (usize, CallbackId) {
        (
            Arc::as_ptr(&self.listener) as *const () as usize,
            self.callback,
        )
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Handler {}

impl std::hash::Hash for Handler {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("listener", &self.listener_name)
            .field("event", &self.event_name)
            .field("callback", &self.callback)
            .finish()
    }
}
