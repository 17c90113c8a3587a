//! # Handler specialization factory.
//!
//! Invoking a subscriber callback generically — resolve the listener type,
//! resolve the event view, check the cancelled flag — costs the same on
//! every post. The factory pays that cost **once** per distinct
//! (listener type, callback, ignore-cancelled) key: the
//! [`Subscription`](crate::Subscription) carries a monomorphized closure
//! that bakes the downcasts and the short-circuit into a single thunk, and
//! the factory memoizes the built thunk so later registrations of the same
//! shape reuse it.
//!
//! The listener *instance* is deliberately not part of the key: the
//! specialized path depends only on shapes. Instances are bound afterwards,
//! at [`Handler`] construction.
//!
//! ## Rules
//! - Lookups of already-specialized keys take the read lock and never block
//!   each other.
//! - Population takes the write lock and double-checks, so concurrent
//!   requests for the same new key specialize exactly once.
//! - A listener instance whose concrete type differs from the
//!   subscription's declared listener type is rejected before any cache
//!   mutation ([`BusError::ListenerMismatch`]) — that registration is
//!   unserviceable, not skippable.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::BusError;
use crate::handlers::handler::{CallbackId, Handler, InvokeFn};
use crate::subscribers::Subscription;

/// Cache key for one specialized invocation path.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct SpecKey {
    listener: std::any::TypeId,
    callback: CallbackId,
    ignore_cancelled: bool,
}

/// Memoizing factory for specialized dispatch thunks.
#[derive(Default)]
pub struct HandlerFactory {
    cache: RwLock<HashMap<SpecKey, InvokeFn>>,
}

impl HandlerFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a [`Handler`] binding `listener` to the subscription's
    /// callback, specializing the invocation path on first use of the
    /// (listener type, callback, flag) key.
    ///
    /// # Errors
    /// [`BusError::ListenerMismatch`] if `listener` is not an instance of
    /// the type the subscription was declared for.
    pub fn handler_for(
        &self,
        listener: &Arc<dyn Any + Send + Sync>,
        subscription: &Subscription,
    ) -> Result<Handler, BusError> {
        if (**listener).type_id() != subscription.listener_kind() {
            return Err(BusError::ListenerMismatch {
                expected: subscription.listener_name(),
            });
        }

        let key = SpecKey {
            listener: subscription.listener_kind(),
            callback: subscription.callback(),
            ignore_cancelled: subscription.ignore_cancelled(),
        };

        // Bind the read lookup in its own statement so the read guard is
        // released at the `;` — otherwise the `if let` scrutinee's temporary
        // guard would still be held in the `else` branch when we take the
        // write lock, deadlocking on the first cache miss.
        let cached = self.cache.read().get(&key).map(Arc::clone);
        let invoke = if let Some(hit) = cached {
            hit
        } else {
            let mut cache = self.cache.write();
            match cache.get(&key) {
                Some(hit) => Arc::clone(hit),
                None => {
                    let built = subscription.specialize();
                    cache.insert(key, Arc::clone(&built));
                    built
                }
            }
        };

        Ok(Handler::new(
            Arc::clone(listener),
            subscription.callback(),
            invoke,
            subscription.listener_name(),
            subscription.event_name(),
        ))
    }

    /// Number of specialized thunks currently cached. Diagnostic only.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CancelFlag, Priority};
    use crate::{cancellable_via, event_type};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ping;
    event_type!(Ping);

    struct Stoppable {
        cancelled: CancelFlag,
    }
    cancellable_via!(Stoppable, cancelled);
    event_type!(Stoppable: cancellable);

    static PING_HITS: AtomicUsize = AtomicUsize::new(0);
    static STOP_HITS: AtomicUsize = AtomicUsize::new(0);

    struct Probe;

    impl Probe {
        fn on_ping(&self, _event: &Ping) {
            PING_HITS.fetch_add(1, Ordering::SeqCst);
        }
        fn on_stoppable(&self, _event: &Stoppable) {
            STOP_HITS.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Imposter;

    fn erased<T: Any + Send + Sync>(value: T) -> Arc<dyn Any + Send + Sync> {
        Arc::new(value)
    }

    #[test]
    fn test_same_key_specializes_once() {
        let factory = HandlerFactory::new();
        let probe = erased(Probe);

        let sub = Subscription::new::<Probe, Ping>(Priority::Default, false, Probe::on_ping);
        factory.handler_for(&probe, &sub).unwrap();
        assert_eq!(factory.cached(), 1);

        let other_instance = erased(Probe);
        factory.handler_for(&other_instance, &sub).unwrap();
        assert_eq!(factory.cached(), 1, "instances must not widen the cache");
    }

    #[test]
    fn test_flag_is_part_of_the_key() {
        let factory = HandlerFactory::new();
        let probe = erased(Probe);

        let plain = Subscription::new::<Probe, Ping>(Priority::Default, false, Probe::on_ping);
        let skipping = Subscription::new::<Probe, Ping>(Priority::Default, true, Probe::on_ping);
        factory.handler_for(&probe, &plain).unwrap();
        factory.handler_for(&probe, &skipping).unwrap();
        assert_eq!(factory.cached(), 2);
    }

    #[test]
    fn test_listener_mismatch_is_fatal() {
        let factory = HandlerFactory::new();
        let imposter = erased(Imposter);

        let sub = Subscription::new::<Probe, Ping>(Priority::Default, false, Probe::on_ping);
        let err = factory.handler_for(&imposter, &sub).unwrap_err();
        assert!(matches!(err, BusError::ListenerMismatch { .. }));
        assert_eq!(factory.cached(), 0, "rejected keys must not populate the cache");
    }

    #[test]
    fn test_thunk_invokes_the_callback_directly() {
        let factory = HandlerFactory::new();
        let probe = erased(Probe);

        let sub = Subscription::new::<Probe, Ping>(Priority::Default, false, Probe::on_ping);
        let handler = factory.handler_for(&probe, &sub).unwrap();

        let before = PING_HITS.load(Ordering::SeqCst);
        handler.invoke(&Ping).unwrap();
        assert_eq!(PING_HITS.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn test_ignore_cancelled_short_circuits() {
        let factory = HandlerFactory::new();
        let probe = erased(Probe);

        let skipping =
            Subscription::new::<Probe, Stoppable>(Priority::Default, true, Probe::on_stoppable);
        let handler = factory.handler_for(&probe, &skipping).unwrap();

        let event = Stoppable { cancelled: CancelFlag::new() };
        let before = STOP_HITS.load(Ordering::SeqCst);

        handler.invoke(&event).unwrap();
        assert_eq!(STOP_HITS.load(Ordering::SeqCst), before + 1);

        crate::Cancellable::set_cancelled(&event, true);
        handler.invoke(&event).unwrap();
        assert_eq!(
            STOP_HITS.load(Ordering::SeqCst),
            before + 1,
            "cancelled event must skip an ignore-cancelled handler"
        );
    }

    #[test]
    fn test_event_without_subscribed_view_is_reported() {
        let factory = HandlerFactory::new();
        let probe = erased(Probe);

        let sub = Subscription::new::<Probe, Ping>(Priority::Default, false, Probe::on_ping);
        let handler = factory.handler_for(&probe, &sub).unwrap();

        let unrelated = Stoppable { cancelled: CancelFlag::new() };
        let err = handler.invoke(&unrelated).unwrap_err();
        assert_eq!(err.as_label(), "invoke_event_view");
    }

    #[test]
    fn test_concurrent_population_is_single() {
        let factory = Arc::new(HandlerFactory::new());
        let sub = Arc::new(Subscription::new::<Probe, Ping>(
            Priority::Default,
            false,
            Probe::on_ping,
        ));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let factory = Arc::clone(&factory);
                let sub = Arc::clone(&sub);
                scope.spawn(move || {
                    let probe = erased(Probe);
                    factory.handler_for(&probe, &sub).unwrap();
                });
            }
        });

        assert_eq!(factory.cached(), 1);
    }
}
