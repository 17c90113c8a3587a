//! # Event bus - registration and dispatch orchestration.
//!
//! [`EventBus`] is the public entry point: it owns the handler sets, the
//! hierarchy cache and the specialization factory, and drives dispatch.
//!
//! ## Architecture
//! ```text
//! register_all(plugin, listener)          post(&event)
//!     │ OwnerLookup::owner_of                 │ Hierarchy::resolve_posted
//!     │ listener.subscriptions()              ▼
//!     │ HandlerFactory::handler_for       [HandlerSet, ...]   (concrete + ancestors)
//!     ▼                                       │
//! HandlerSet::register (bakes snapshot)       │ for each Priority, for each set:
//!                                             ▼
//!                                    snapshot_for(priority) ─► Handler::invoke
//!                                             │
//!                                             └─► panic / shape drift: warn + continue
//! ```
//!
//! ## Rules
//! - Dispatch is synchronous and runs on the calling thread; `post` returns
//!   only after every applicable handler ran.
//! - Priority order is global: every `First` handler across the whole
//!   lattice runs before any `Early` handler, and so on.
//! - A failing handler (panic or shape drift) is logged and never aborts
//!   dispatch, never reaches the poster, and never changes the cancelled
//!   state by itself.
//! - Handlers may reenter the bus: nested `post` calls and
//!   register/unregister during dispatch are safe. No lock is held across a
//!   handler invocation; an in-flight snapshot never changes.

use std::any::{type_name, Any, TypeId};
use std::panic;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::builder::EventBusBuilder;
use crate::core::config::BusConfig;
use crate::error::BusError;
use crate::events::{Cancellable, Event, Priority};
use crate::handlers::{Handler, HandlerFactory};
use crate::registry::hierarchy::Hierarchy;
use crate::subscribers::{OwnerLookup, OwnerRef, Subscriber, Subscription};

/// Typed publish/subscribe dispatcher.
///
/// One instance is a process-wide service by convention; construct it
/// explicitly (see [`EventBus::builder`]) and share it via `Arc`.
pub struct EventBus {
    config: BusConfig,
    owners: Arc<dyn OwnerLookup>,
    factory: HandlerFactory,
    hierarchy: Hierarchy,
}

impl EventBus {
    pub(crate) fn new_internal(config: BusConfig, owners: Arc<dyn OwnerLookup>) -> Self {
        Self {
            config,
            owners,
            factory: HandlerFactory::new(),
            hierarchy: Hierarchy::new(),
        }
    }

    /// Returns a builder for configuring a bus.
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new()
    }

    /// Builds a [`Handler`] for `listener` from a subscription, using this
    /// bus's specialization cache.
    ///
    /// # Errors
    /// [`BusError::ListenerMismatch`] if `listener` is not an instance of
    /// the subscription's declared listener type.
    pub fn handler<S: Any + Send + Sync>(
        &self,
        listener: &Arc<S>,
        subscription: &Subscription,
    ) -> Result<Handler, BusError> {
        let erased: Arc<dyn Any + Send + Sync> = listener.clone();
        self.factory.handler_for(&erased, subscription)
    }

    /// Registers `handler` for event type `E`.
    ///
    /// Warms the hierarchy cache for `E` before touching the handler set,
    /// so the first post of any type in `E`'s subtree finds it resolved.
    /// Returns `false` if an equal handler is already registered for `E` —
    /// including under a different priority, which is left unchanged.
    pub fn register<E: Event>(&self, handler: Handler, priority: Priority, owner: OwnerRef) -> bool {
        self.hierarchy.resolve_kind::<E>();
        let added = self
            .hierarchy
            .set_for(TypeId::of::<E>())
            .register(handler, priority, owner);
        if !added && self.config.warn_on_duplicate {
            warn!(event = type_name::<E>(), "duplicate handler registration rejected");
        }
        added
    }

    /// Removes `handler` from event type `E`'s set, whatever priority or
    /// owner it was registered with. Returns `false` if it was not
    /// registered.
    pub fn unregister<E: Event>(&self, handler: &Handler) -> bool {
        self.hierarchy.set_for(TypeId::of::<E>()).remove(handler)
    }

    /// Scans `listener` for subscriber callbacks and registers each under
    /// `plugin`'s owner.
    ///
    /// Subscriptions declared for a different listener type are skipped
    /// with a warning; duplicates are rejected per-entry (and logged when
    /// [`BusConfig::warn_on_duplicate`] is set). Returns the number of
    /// effective (non-duplicate) registrations.
    ///
    /// # Errors
    /// - [`BusError::UnknownRegistrant`] if the owner lookup does not
    ///   recognize `plugin`; nothing is registered.
    /// - [`BusError::ListenerMismatch`] if specialization fails for an
    ///   otherwise accepted subscription.
    pub fn register_all<S: Subscriber>(
        &self,
        plugin: &dyn Any,
        listener: &Arc<S>,
    ) -> Result<usize, BusError> {
        let owner = self
            .owners
            .owner_of(plugin)
            .ok_or(BusError::UnknownRegistrant)?;
        let erased: Arc<dyn Any + Send + Sync> = listener.clone();

        let mut effective = 0;
        for subscription in listener.subscriptions() {
            if !subscription.declared_for::<S>() {
                warn!(
                    listener = listener.name(),
                    declared = subscription.listener_name(),
                    event = subscription.event_name(),
                    "subscription declared for a different listener type; skipped"
                );
                continue;
            }

            let handler = self.factory.handler_for(&erased, &subscription)?;
            self.hierarchy
                .resolve_keyed(subscription.event_kind(), subscription.kinds_fn());
            let added = self
                .hierarchy
                .set_for(subscription.event_kind())
                .register(handler, subscription.priority(), owner.clone());
            if added {
                effective += 1;
            } else if self.config.warn_on_duplicate {
                warn!(
                    listener = listener.name(),
                    event = subscription.event_name(),
                    "duplicate handler registration rejected"
                );
            }
        }
        Ok(effective)
    }

    /// Mirror of [`EventBus::register_all`]: re-scans `listener` and
    /// removes each of its handlers from every event type it was
    /// registered under. Returns the number of removed registrations.
    pub fn unregister_all<S: Subscriber>(&self, listener: &Arc<S>) -> usize {
        let erased: Arc<dyn Any + Send + Sync> = listener.clone();

        let mut removed = 0;
        for subscription in listener.subscriptions() {
            if !subscription.declared_for::<S>() {
                continue;
            }
            let handler = match self.factory.handler_for(&erased, &subscription) {
                Ok(handler) => handler,
                Err(_) => continue,
            };
            if self
                .hierarchy
                .set_for(subscription.event_kind())
                .remove(&handler)
            {
                removed += 1;
            }
        }
        removed
    }

    /// Posts `event` to every applicable handler, in priority-major order
    /// across the event's whole type lattice, on the calling thread.
    ///
    /// Returns `true` if the event ends in the cancelled state. Events
    /// without the cancellation capability always yield `false`.
    pub fn post(&self, event: &dyn Event) -> bool {
        let sets = self.hierarchy.resolve_posted(event);
        if self.config.trace_dispatch {
            debug!(sets = sets.len(), "dispatching event");
        }

        for priority in Priority::ALL {
            for set in sets.iter() {
                let snapshot = set.snapshot_for(priority);
                for handler in snapshot.iter() {
                    self.call_handler(handler, event);
                }
            }
        }

        event
            .as_cancellable()
            .map_or(false, Cancellable::is_cancelled)
    }

    fn call_handler(&self, handler: &Handler, event: &dyn Event) {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| handler.invoke(event))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(
                    handler = ?handler,
                    label = err.as_label(),
                    error = %err,
                    "handler skipped after shape drift"
                );
            }
            Err(payload) => {
                warn!(
                    handler = ?handler,
                    panic = panic_message(payload.as_ref()),
                    "a handler panicked while handling an event"
                );
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBusBuilder::new().build()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
