//! # Event trait and the event type lattice.
//!
//! Every postable type implements [`Event`]. Beyond the usual `Any`-style
//! erasure, the trait describes where the type sits in the event lattice:
//! the chain of base events it extends and the capability events it carries.
//! The bus consults the handler set of **every** type in that lattice when
//! an instance is posted, so a handler registered for a base event observes
//! all of its derivations.
//!
//! There is no inheritance to lean on, so the lattice is explicit: a derived
//! event embeds its parent events as fields and delegates to them. The
//! [`event_type!`](crate::event_type) macro generates the delegation.
//!
//! ## Architecture
//! ```text
//! struct ServerEvent;                          ServerEvent      (root)
//! struct TickEvent { base: ServerEvent }           │
//! struct WorldTick { base: TickEvent }         TickEvent
//!                                                  │
//! post(&WorldTick { .. })                      WorldTick        (posted)
//!   lineage() = [WorldTick, TickEvent, ServerEvent]
//!   view(TypeId::of::<TickEvent>()) = Some(&self.base)
//! ```
//!
//! ## Rules
//! - `lineage()` lists the concrete type first, then parents in field
//!   declaration order; the bus collapses duplicates (diamonds) to their
//!   first occurrence.
//! - `view(kind)` borrows the state slice for `kind`, so a handler declared
//!   for a parent type receives `&Parent` backed by the embedded field.
//! - The lattice of a type is fixed at definition time; resolution results
//!   are memoized per concrete type and never invalidated.
//!
//! ## Example
//! ```rust
//! use std::any::TypeId;
//! use typebus::{event_type, Event};
//!
//! struct ServerEvent;
//! event_type!(ServerEvent);
//!
//! struct TickEvent {
//!     base: ServerEvent,
//!     pub tick: u64,
//! }
//! event_type!(TickEvent => base: ServerEvent);
//!
//! let tick = TickEvent { base: ServerEvent, tick: 42 };
//! assert_eq!(tick.lineage()[0], TypeId::of::<TickEvent>());
//! assert!(tick.view(TypeId::of::<ServerEvent>()).is_some());
//! assert!(tick.as_cancellable().is_none());
//! ```

use std::any::{Any, TypeId};

use crate::events::cancellable::Cancellable;

/// A postable event.
///
/// Implement via [`event_type!`](crate::event_type); the methods are
/// mechanical and easy to get subtly wrong by hand (the bus relies on
/// `lineage()` starting with the concrete type).
pub trait Event: Any + Send + Sync {
    /// All types in this event's lattice, the concrete type first.
    ///
    /// Static counterpart of [`Event::lineage`] for typed registration
    /// paths that have no instance at hand.
    fn kinds() -> Vec<TypeId>
    where
        Self: Sized;

    /// Object-safe mirror of [`Event::kinds`], used when posting through
    /// `&dyn Event`.
    fn lineage(&self) -> Vec<TypeId>;

    /// The concrete instance as `Any`; keys the hierarchy cache.
    fn as_any(&self) -> &dyn Any;

    /// Borrows the state slice for `kind`, if `kind` is in this event's
    /// lineage. `view(TypeId::of::<Self>())` returns the instance itself.
    fn view(&self, kind: TypeId) -> Option<&dyn Any>;

    /// Cancellation capability, if this event supports it.
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }
}

/// Implements [`Event`] for a type, wiring its place in the event lattice.
///
/// Forms:
/// - `event_type!(Ty)` — root event with no parents.
/// - `event_type!(Ty => field: Parent, ...)` — derived event; each listed
///   field embeds a parent (or capability) event and is exposed through
///   `view`/`lineage` in declaration order.
/// - `event_type!(Ty: cancellable)` / `event_type!(Ty: cancellable => ...)`
///   — additionally wires [`Event::as_cancellable`]; the type must implement
///   [`Cancellable`] (see [`cancellable_via!`](crate::cancellable_via)).
#[macro_export]
macro_rules! event_type {
    ($ty:ty) => {
        $crate::event_type!(@impl $ty, []);
    };
    ($ty:ty : cancellable) => {
        $crate::event_type!(@impl_cancellable $ty, []);
    };
    ($ty:ty => $($field:ident : $parent:ty),+ $(,)?) => {
        $crate::event_type!(@impl $ty, [$($field : $parent),+]);
    };
    ($ty:ty : cancellable => $($field:ident : $parent:ty),+ $(,)?) => {
        $crate::event_type!(@impl_cancellable $ty, [$($field : $parent),+]);
    };
    (@impl $ty:ty, [$($field:ident : $parent:ty),*]) => {
        impl $crate::Event for $ty {
            fn kinds() -> ::std::vec::Vec<::std::any::TypeId>
            where
                Self: ::std::marker::Sized,
            {
                let mut kinds = ::std::vec![::std::any::TypeId::of::<$ty>()];
                $( kinds.extend(<$parent as $crate::Event>::kinds()); )*
                kinds
            }

            fn lineage(&self) -> ::std::vec::Vec<::std::any::TypeId> {
                <$ty as $crate::Event>::kinds()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn view(
                &self,
                kind: ::std::any::TypeId,
            ) -> ::std::option::Option<&dyn ::std::any::Any> {
                if kind == ::std::any::TypeId::of::<$ty>() {
                    return ::std::option::Option::Some(self);
                }
                $(
                    if let ::std::option::Option::Some(found) =
                        $crate::Event::view(&self.$field, kind)
                    {
                        return ::std::option::Option::Some(found);
                    }
                )*
                ::std::option::Option::None
            }
        }
    };
    (@impl_cancellable $ty:ty, [$($field:ident : $parent:ty),*]) => {
        impl $crate::Event for $ty {
            fn kinds() -> ::std::vec::Vec<::std::any::TypeId>
            where
                Self: ::std::marker::Sized,
            {
                let mut kinds = ::std::vec![::std::any::TypeId::of::<$ty>()];
                $( kinds.extend(<$parent as $crate::Event>::kinds()); )*
                kinds
            }

            fn lineage(&self) -> ::std::vec::Vec<::std::any::TypeId> {
                <$ty as $crate::Event>::kinds()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn view(
                &self,
                kind: ::std::any::TypeId,
            ) -> ::std::option::Option<&dyn ::std::any::Any> {
                if kind == ::std::any::TypeId::of::<$ty>() {
                    return ::std::option::Option::Some(self);
                }
                $(
                    if let ::std::option::Option::Some(found) =
                        $crate::Event::view(&self.$field, kind)
                    {
                        return ::std::option::Option::Some(found);
                    }
                )*
                ::std::option::Option::None
            }

            fn as_cancellable(&self) -> ::std::option::Option<&dyn $crate::Cancellable> {
                ::std::option::Option::Some(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellable_via;
    use crate::events::cancellable::CancelFlag;

    struct Root;
    event_type!(Root);

    struct Marker;
    event_type!(Marker);

    struct Branch {
        base: Root,
    }
    event_type!(Branch => base: Root);

    struct Leaf {
        branch: Branch,
        marker: Marker,
        payload: u32,
    }
    event_type!(Leaf => branch: Branch, marker: Marker);

    struct Stoppable {
        base: Root,
        cancelled: CancelFlag,
    }
    cancellable_via!(Stoppable, cancelled);
    event_type!(Stoppable: cancellable => base: Root);

    fn leaf() -> Leaf {
        Leaf {
            branch: Branch { base: Root },
            marker: Marker,
            payload: 9,
        }
    }

    #[test]
    fn test_lineage_starts_with_concrete_type() {
        assert_eq!(leaf().lineage()[0], TypeId::of::<Leaf>());
        assert_eq!(Root.lineage(), vec![TypeId::of::<Root>()]);
    }

    #[test]
    fn test_lineage_walks_parents_in_declaration_order() {
        assert_eq!(
            leaf().lineage(),
            vec![
                TypeId::of::<Leaf>(),
                TypeId::of::<Branch>(),
                TypeId::of::<Root>(),
                TypeId::of::<Marker>(),
            ]
        );
    }

    #[test]
    fn test_static_kinds_match_instance_lineage() {
        assert_eq!(Leaf::kinds(), leaf().lineage());
    }

    #[test]
    fn test_view_borrows_embedded_parent_state() {
        let event = leaf();
        let root = event.view(TypeId::of::<Root>());
        assert!(root.is_some(), "transitive parent must be viewable");
        assert!(root.unwrap().downcast_ref::<Root>().is_some());
        assert!(event.view(TypeId::of::<Stoppable>()).is_none());
    }

    #[test]
    fn test_view_of_own_kind_is_self() {
        let event = leaf();
        let own = event.view(TypeId::of::<Leaf>()).unwrap();
        assert_eq!(own.downcast_ref::<Leaf>().unwrap().payload, 9);
    }

    #[test]
    fn test_cancellable_wiring() {
        let event = Stoppable {
            base: Root,
            cancelled: CancelFlag::new(),
        };
        let cancellable = event.as_cancellable().expect("capability must be exposed");
        assert!(!cancellable.is_cancelled());
        cancellable.set_cancelled(true);
        assert!(event.cancelled.is_cancelled());

        assert!(Root.as_cancellable().is_none());
    }
}
