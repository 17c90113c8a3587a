//! Event data model: the event trait, the type lattice, priorities and
//! cancellation.
//!
//! This module groups everything a *producer* or *event author* touches:
//! defining event types and their lattice, choosing dispatch priorities,
//! and opting into the cancellation capability.
//!
//! ## Contents
//! - [`Event`] the postable trait; [`event_type!`](crate::event_type)
//!   generates its lattice plumbing
//! - [`Priority`] fixed global dispatch phases
//! - [`Cancellable`], [`CancelFlag`] advisory cancellation
//!
//! ## Quick reference
//! - **Authors** define event structs, embed parent events as fields, and
//!   invoke `event_type!`.
//! - **Producers** call [`EventBus::post`](crate::EventBus::post); the
//!   returned bool is the final cancelled state.

mod cancellable;
mod event;
mod priority;

pub use cancellable::{CancelFlag, Cancellable};
pub use event::Event;
pub use priority::Priority;
