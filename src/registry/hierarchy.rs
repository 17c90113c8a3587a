//! # Hierarchy cache: event kind → handler sets to consult.
//!
//! Posting an event must reach handlers registered for the concrete type
//! *and* for every ancestor in its lattice. Walking the lattice and looking
//! up each handler set on every post would dominate dispatch cost, so
//! [`Hierarchy`] memoizes the resolved sequence per concrete type: computed
//! once, reused forever. The lattice of a type is fixed at definition time,
//! so no invalidation exists.
//!
//! ## Rules
//! - First resolution of a type creates any missing handler sets, under one
//!   mutual-exclusion scope, so two racing threads cannot produce two
//!   distinct sets for the same kind. A set may therefore exist purely as
//!   an ancestor placeholder before anyone registers for it directly.
//! - Repeated resolution is a read-lock hit; resolutions of different
//!   types do not block each other.
//! - Duplicate kinds in a lineage (diamonds) collapse to their first
//!   occurrence: each set is consulted once per post.
//! - The resolved sequence is stable: repeated calls return the same
//!   sequence object.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::events::Event;
use crate::registry::set::HandlerSet;

/// Kind-keyed handler set map plus the memoized resolution cache.
pub(crate) struct Hierarchy {
    sets: Mutex<HashMap<TypeId, Arc<HandlerSet>>>,
    resolved: RwLock<HashMap<TypeId, Arc<[Arc<HandlerSet>]>>>,
}

impl Hierarchy {
    pub(crate) fn new() -> Self {
        Self {
            sets: Mutex::new(HashMap::new()),
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// The handler set for `kind`, created on first reference.
    pub(crate) fn set_for(&self, kind: TypeId) -> Arc<HandlerSet> {
        let mut sets = self.sets.lock();
        Arc::clone(
            sets.entry(kind)
                .or_insert_with(|| Arc::new(HandlerSet::new())),
        )
    }

    /// Resolves the sets consulted when the concrete type of `event` is
    /// posted.
    pub(crate) fn resolve_posted(&self, event: &dyn Event) -> Arc<[Arc<HandlerSet>]> {
        self.resolve_keyed(event.as_any().type_id(), || event.lineage())
    }

    /// Resolves (and warms) the sequence for a statically known event type.
    pub(crate) fn resolve_kind<E: Event>(&self) -> Arc<[Arc<HandlerSet>]> {
        self.resolve_keyed(TypeId::of::<E>(), E::kinds)
    }

    /// Key-level resolution for callers that carry the lineage separately
    /// (scan-driven registration).
    pub(crate) fn resolve_keyed(
        &self,
        concrete: TypeId,
        kinds: impl FnOnce() -> Vec<TypeId>,
    ) -> Arc<[Arc<HandlerSet>]> {
        if let Some(hit) = self.resolved.read().get(&concrete) {
            return Arc::clone(hit);
        }

        let mut resolved = self.resolved.write();
        if let Some(hit) = resolved.get(&concrete) {
            return Arc::clone(hit);
        }

        let mut lineage = kinds();
        let mut seen = HashSet::with_capacity(lineage.len());
        lineage.retain(|kind| seen.insert(*kind));

        let sequence: Vec<Arc<HandlerSet>> = {
            let mut sets = self.sets.lock();
            lineage
                .iter()
                .map(|kind| {
                    Arc::clone(
                        sets.entry(*kind)
                            .or_insert_with(|| Arc::new(HandlerSet::new())),
                    )
                })
                .collect()
        };

        let sequence: Arc<[Arc<HandlerSet>]> = sequence.into();
        resolved.insert(concrete, Arc::clone(&sequence));
        sequence
    }

    /// Number of known handler sets. Diagnostic only.
    #[cfg(test)]
    pub(crate) fn known_kinds(&self) -> usize {
        self.sets.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_type;

    struct Root;
    event_type!(Root);

    struct Left {
        base: Root,
    }
    event_type!(Left => base: Root);

    struct Right {
        base: Root,
    }
    event_type!(Right => base: Root);

    struct Diamond {
        left: Left,
        right: Right,
    }
    event_type!(Diamond => left: Left, right: Right);

    fn diamond() -> Diamond {
        Diamond {
            left: Left { base: Root },
            right: Right { base: Root },
        }
    }

    #[test]
    fn test_resolution_creates_placeholder_sets() {
        let hierarchy = Hierarchy::new();
        let sequence = hierarchy.resolve_posted(&Left { base: Root });
        assert_eq!(sequence.len(), 2, "Left and Root");
        assert_eq!(hierarchy.known_kinds(), 2);
    }

    #[test]
    fn test_resolution_is_memoized_and_stable() {
        let hierarchy = Hierarchy::new();
        let first = hierarchy.resolve_posted(&Left { base: Root });
        let second = hierarchy.resolve_posted(&Left { base: Root });
        assert!(
            Arc::ptr_eq(&first, &second),
            "repeated resolution must return the cached sequence"
        );
    }

    #[test]
    fn test_typed_and_posted_resolution_share_the_cache() {
        let hierarchy = Hierarchy::new();
        let typed = hierarchy.resolve_kind::<Left>();
        let posted = hierarchy.resolve_posted(&Left { base: Root });
        assert!(Arc::ptr_eq(&typed, &posted));
    }

    #[test]
    fn test_diamond_collapses_to_first_occurrence() {
        let hierarchy = Hierarchy::new();
        let sequence = hierarchy.resolve_posted(&diamond());
        assert_eq!(sequence.len(), 4, "Diamond, Left, Root, Right — Root once");

        let root = hierarchy.set_for(TypeId::of::<Root>());
        let hits = sequence.iter().filter(|set| Arc::ptr_eq(set, &root)).count();
        assert_eq!(hits, 1, "the shared ancestor must be consulted once");
    }

    #[test]
    fn test_set_for_returns_the_same_set_as_resolution() {
        let hierarchy = Hierarchy::new();
        let sequence = hierarchy.resolve_posted(&Left { base: Root });
        let direct = hierarchy.set_for(TypeId::of::<Root>());
        assert!(sequence.iter().any(|set| Arc::ptr_eq(set, &direct)));
    }

    #[test]
    fn test_concurrent_resolution_yields_one_set_per_kind() {
        let hierarchy = Arc::new(Hierarchy::new());

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let hierarchy = Arc::clone(&hierarchy);
                scope.spawn(move || {
                    hierarchy.resolve_posted(&diamond());
                });
            }
        });

        assert_eq!(hierarchy.known_kinds(), 4);
    }
}
