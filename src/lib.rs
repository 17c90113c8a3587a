//! # typebus
//!
//! **typebus** is a typed, priority-ordered, in-process event bus for Rust.
//!
//! Listener objects declare subscriber callbacks, producers post event
//! instances, and the bus invokes every applicable handler synchronously,
//! in a fixed global priority order, honoring advisory cancellation. It is
//! designed as a building block for plugin hosts and modular applications
//! that need one dispatch point for loosely coupled components.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Subscriber  │   │  Subscriber  │   │   Producer   │
//!     │ (listener 1) │   │ (listener 2) │   │ (posts events)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ register_all     │ register_all     │ post(&event)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus                                                         │
//! │  - OwnerLookup (validates registrants, issues OwnerRef)           │
//! │  - HandlerFactory (specializes + caches invoke thunks)            │
//! │  - Hierarchy (event kind → handler sets, memoized per type)       │
//! └──────┬──────────────────────┬─────────────────────────┬──────────┘
//!        ▼                      ▼                         ▼
//! ┌──────────────┐       ┌──────────────┐          ┌──────────────┐
//! │  HandlerSet  │       │  HandlerSet  │          │  HandlerSet  │
//! │ (ChatEvent)  │       │ (PlayerEvent)│          │ (ServerEvent)│
//! │ baked by     │       │ baked by     │          │ baked by     │
//! │ priority     │       │ priority     │          │ priority     │
//! └──────────────┘       └──────────────┘          └──────────────┘
//! ```
//!
//! ### Dispatch
//! ```text
//! post(&event)
//!   ├─► resolve concrete type through Hierarchy (memoized)
//!   │     └─► [HandlerSet for event type + every lattice ancestor]
//!   ├─► for priority in First..=Monitor:
//!   │     for set in resolved sets:
//!   │       for handler in set.snapshot_for(priority):
//!   │         ├─ ignore_cancelled && event cancelled ─► skip
//!   │         ├─ invoke callback directly (specialized thunk)
//!   │         └─ panic / shape drift ─► warn + continue
//!   └─► return event cancelled state
//! ```
//!
//! ## Features
//! | Area             | Description                                                       | Key types / traits                    |
//! |------------------|-------------------------------------------------------------------|---------------------------------------|
//! | **Events**       | Typed events with an explicit lattice and advisory cancellation.  | [`Event`], [`Cancellable`], macros    |
//! | **Subscribers**  | Declare callbacks with priority and ignore-cancelled flags.       | [`Subscriber`], [`Subscription`]      |
//! | **Dispatch**     | Synchronous, priority-major, failure-contained delivery.          | [`EventBus`], [`Priority`]            |
//! | **Specialization**| One cached invoke thunk per (listener type, callback, flag).     | [`HandlerFactory`], [`Handler`]       |
//! | **Ownership**    | Opaque owner bookkeeping via a host-provided lookup.              | [`OwnerLookup`], [`OwnerRef`]         |
//! | **Errors**       | Typed registration errors; contained dispatch errors.             | [`BusError`], [`InvokeError`]         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use typebus::{event_type, EventBus, Priority, Subscriber, Subscription};
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
//!         println!("welcome, {}", event.name);
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
//! fn main() -> Result<(), typebus::BusError> {
//!     let bus = EventBus::builder().build();
//!     let greeter = Arc::new(Greeter);
//!     bus.register_all(&(), &greeter)?;
//!
//!     let cancelled = bus.post(&PlayerJoined { name: "alice".into() });
//!     assert!(!cancelled);
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//! - `post` runs on the calling thread and returns after the last handler;
//!   there are no internal threads or queues.
//! - All `First` handlers run before any `Early` handler, across every
//!   event type in the posted event's lattice.
//! - A handler failure is logged and contained; it never reaches the
//!   poster and never stops dispatch.
//! - Cancelling an event never stops dispatch; it only gates handlers
//!   registered with `ignore_cancelled = true`.
//! - Registration and unregistration are safe during dispatch; in-flight
//!   snapshots are immutable.

mod core;
mod error;
mod events;
mod handlers;
mod registry;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{BusConfig, EventBus, EventBusBuilder};
pub use error::{BusError, InvokeError};
pub use events::{CancelFlag, Cancellable, Event, Priority};
pub use handlers::{CallbackId, Handler, HandlerFactory};
pub use subscribers::{OwnerLookup, OwnerRef, Subscriber, Subscription, Unmanaged};
