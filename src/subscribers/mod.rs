//! # Registration-side surface: subscribers, subscriptions, owners.
//!
//! This module provides the [`Subscriber`] trait a listener implements to
//! declare its callbacks, the [`Subscription`] descriptor those
//! declarations produce, and the owner collaborator types that tag each
//! registration with its containing unit.
//!
//! ## Architecture
//! ```text
//! Registration flow:
//!   host ── register_all(plugin, listener) ──► EventBus
//!              │                                  │
//!              │ OwnerLookup::owner_of(plugin)    │ listener.subscriptions()
//!              ▼                                  ▼
//!           OwnerRef                       [Subscription, ...]
//!              │                                  │ declared_for::<L>()? ── no ─► warn + skip
//!              │                                  ▼
//!              └────────► HandlerSet ◄── HandlerFactory::handler_for
//! ```
//!
//! ## Implementing a subscriber
//! ```rust
//! use typebus::{event_type, Priority, Subscriber, Subscription};
//!
//! struct Tick;
//! event_type!(Tick);
//!
//! struct Metrics;
//!
//! impl Metrics {
//!     fn on_tick(&self, _tick: &Tick) {
//!         // increment a counter, etc.
//!     }
//! }
//!
//! impl Subscriber for Metrics {
//!     fn subscriptions(&self) -> Vec<Subscription> {
//!         vec![Subscription::new::<Metrics, Tick>(
//!             Priority::Monitor,
//!             true,
//!             Metrics::on_tick,
//!         )]
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

mod owner;
mod subscriber;

pub use owner::{OwnerLookup, OwnerRef, Unmanaged};
pub use subscriber::{Subscriber, Subscription};
