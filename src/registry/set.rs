//! # Per-event-type handler set with baked snapshots.
//!
//! A [`HandlerSet`] owns every registration for exactly one event type. The
//! full registration list lives behind a mutex; what dispatch iterates is a
//! *baked* table — one immutable, priority-partitioned snapshot that is
//! rebuilt on every successful register/remove and published whole by
//! swapping an `Arc`. Readers never take the mutex and never observe a
//! half-applied mutation; a dispatch loop holding an older snapshot simply
//! finishes against it.
//!
//! ## Rules
//! - Duplicate detection uses handler identity alone. Re-registering the
//!   same (listener, callback) under a *different* priority is still a
//!   duplicate and is rejected without updating the stored priority.
//! - `remove` matches by the same identity, regardless of the priority or
//!   owner the handler was registered with.
//! - Within one priority, the baked order is registration order.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::events::Priority;
use crate::handlers::Handler;
use crate::subscribers::OwnerRef;

/// One registered tuple. Owner is bookkeeping only; it never affects
/// dispatch order or equality.
struct Registration {
    handler: Handler,
    priority: Priority,
    #[allow(dead_code)]
    owner: OwnerRef,
}

/// Priority-partitioned immutable view of a handler set.
struct Baked {
    by_priority: [Arc<[Handler]>; Priority::COUNT],
}

impl Baked {
    fn empty() -> Self {
        Self {
            by_priority: std::array::from_fn(|_| Arc::<[Handler]>::from(Vec::new())),
        }
    }

    fn of(entries: &[Registration]) -> Self {
        let mut grouped: [Vec<Handler>; Priority::COUNT] = std::array::from_fn(|_| Vec::new());
        for registration in entries {
            grouped[registration.priority.index()].push(registration.handler.clone());
        }
        Self {
            by_priority: grouped.map(|level| Arc::<[Handler]>::from(level)),
        }
    }
}

/// Registry of all handlers for one event type.
pub(crate) struct HandlerSet {
    entries: Mutex<Vec<Registration>>,
    baked: ArcSwap<Baked>,
}

impl HandlerSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            baked: ArcSwap::from_pointee(Baked::empty()),
        }
    }

    /// Adds a registration and publishes a fresh snapshot.
    ///
    /// Returns `false` (and changes nothing) if an equal handler is already
    /// registered, whatever priority or owner it was registered with.
    pub(crate) fn register(&self, handler: Handler, priority: Priority, owner: OwnerRef) -> bool {
        let mut entries = self.entries.lock();
        if entries.iter().any(|existing| existing.handler == handler) {
            return false;
        }
        entries.push(Registration {
            handler,
            priority,
            owner,
        });
        self.baked.store(Arc::new(Baked::of(&entries)));
        true
    }

    /// Removes the registration equal to `handler` and publishes a fresh
    /// snapshot. Returns `false` if no such registration exists.
    pub(crate) fn remove(&self, handler: &Handler) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|existing| existing.handler != *handler);
        if entries.len() == before {
            return false;
        }
        self.baked.store(Arc::new(Baked::of(&entries)));
        true
    }

    /// Current baked handlers for `priority`, in registration order.
    ///
    /// Safe to iterate while registers/removes proceed on other threads;
    /// the returned slice never changes.
    pub(crate) fn snapshot_for(&self, priority: Priority) -> Arc<[Handler]> {
        Arc::clone(&self.baked.load().by_priority[priority.index()])
    }

    /// Total number of registrations, across all priorities.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
