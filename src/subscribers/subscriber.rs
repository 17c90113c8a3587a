//! # Subscriber trait and subscription descriptors.
//!
//! Provides [`Subscriber`], the extension point a listener object
//! implements to declare which events it handles, and [`Subscription`],
//! the descriptor for one (event type, callback, priority, flag) tuple.
//!
//! Discovery of *which objects* are subscribers belongs to the host system;
//! this module owns the tuple shape and the validity predicate. A
//! subscription built for listener type `L` can only ever be attached to an
//! `L` instance — [`Subscription::declared_for`] is the check
//! `register_all` applies before handing the tuple to the factory, and
//! candidates that fail it are skipped with a warning rather than
//! registered.
//!
//! ## Example
//! ```rust
//! use typebus::{event_type, Priority, Subscriber, Subscription};
//!
//! struct PlayerJoined {
//!     pub name: String,
//! }
//! event_type!(PlayerJoined);
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     fn on_join(&self, event: &PlayerJoined) {
//!         let _ = &event.name;
//!     }
//! }
//!
//! impl Subscriber for Greeter {
//!     fn subscriptions(&self) -> Vec<Subscription> {
//!         vec![Subscription::new::<Greeter, PlayerJoined>(
//!             Priority::Default,
//!             false,
//!             Greeter::on_join,
//!         )]
//!     }
//! }
//!
//! let subs = Greeter.subscriptions();
//! assert_eq!(subs.len(), 1);
//! assert!(subs[0].declared_for::<Greeter>());
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::InvokeError;
use crate::events::{Event, Priority};
use crate::handlers::handler::{CallbackId, InvokeFn};

/// A listener object that declares subscriber callbacks.
///
/// `register_all` scans an implementation by calling
/// [`Subscriber::subscriptions`] and registers each declared tuple under
/// the registrant's owner.
pub trait Subscriber: Any + Send + Sync {
    /// The subscriber callbacks this listener exposes.
    ///
    /// Called on registration *and* unregistration; implementations should
    /// return the same set both times.
    fn subscriptions(&self) -> Vec<Subscription>;

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// One declared subscriber callback: the
/// (event type, callback, priority, ignore-cancelled) tuple, plus the
/// monomorphized specializer the factory consumes.
pub struct Subscription {
    event: TypeId,
    event_name: &'static str,
    listener: TypeId,
    listener_name: &'static str,
    kinds: fn() -> Vec<TypeId>,
    callback: CallbackId,
    priority: Priority,
    ignore_cancelled: bool,
    build_invoke: Arc<dyn Fn() -> InvokeFn + Send + Sync>,
}

impl Subscription {
    /// Declares that listener type `L` handles event type `E` through
    /// `callback`, at `priority`.
    ///
    /// With `ignore_cancelled = true` the specialized path returns before
    /// touching the listener whenever the posted event is cancellable and
    /// already cancelled.
    pub fn new<L, E>(priority: Priority, ignore_cancelled: bool, callback: fn(&L, &E)) -> Self
    where
        L: Any + Send + Sync,
        E: Event,
    {
        let build_invoke: Arc<dyn Fn() -> InvokeFn + Send + Sync> = Arc::new(move || {
            Arc::new(
                move |listener: &(dyn Any + Send + Sync), event: &dyn Event| {
                    if ignore_cancelled {
                        if let Some(cancellable) = event.as_cancellable() {
                            if cancellable.is_cancelled() {
                                return Ok(());
                            }
                        }
                    }
                    let listener =
                        listener
                            .downcast_ref::<L>()
                            .ok_or(InvokeError::ListenerShape {
                                expected: type_name::<L>(),
                            })?;
                    let view = event
                        .view(TypeId::of::<E>())
                        .and_then(|view| view.downcast_ref::<E>())
                        .ok_or(InvokeError::EventView {
                            expected: type_name::<E>(),
                        })?;
                    callback(listener, view);
                    Ok(())
                },
            )
        });

        Self {
            event: TypeId::of::<E>(),
            event_name: type_name::<E>(),
            listener: TypeId::of::<L>(),
            listener_name: type_name::<L>(),
            kinds: E::kinds,
            callback: CallbackId::of(callback),
            priority,
            ignore_cancelled,
            build_invoke,
        }
    }

    /// Subscribed event type.
    #[inline]
    pub fn event_kind(&self) -> TypeId {
        self.event
    }

    /// Subscribed event type name.
    #[inline]
    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// Declared listener type.
    #[inline]
    pub fn listener_kind(&self) -> TypeId {
        self.listener
    }

    /// Declared listener type name.
    #[inline]
    pub fn listener_name(&self) -> &'static str {
        self.listener_name
    }

    /// Callback identity.
    #[inline]
    pub fn callback(&self) -> CallbackId {
        self.callback
    }

    /// Dispatch priority.
    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Whether the handler skips already-cancelled events.
    #[inline]
    pub fn ignore_cancelled(&self) -> bool {
        self.ignore_cancelled
    }

    /// Validity predicate: was this subscription declared for `S`?
    ///
    /// A tuple failing this check cannot be attached to the scanned object
    /// and is skipped by `register_all`.
    #[inline]
    pub fn declared_for<S: Any>(&self) -> bool {
        self.listener == TypeId::of::<S>()
    }

    /// Static lineage of the subscribed event type; used to warm the
    /// hierarchy cache before the handler set is touched.
    #[inline]
    pub(crate) fn kinds_fn(&self) -> fn() -> Vec<TypeId> {
        self.kinds
    }

    /// Builds the specialized invoke thunk. Called by the factory exactly
    /// once per cache key.
    pub(crate) fn specialize(&self) -> InvokeFn {
        (self.build_invoke)()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener", &self.listener_name)
            .field("event", &self.event_name)
            .field("priority", &self.priority)
            .field("ignore_cancelled", &self.ignore_cancelled)
            .finish()
    }
}
