//! # Example: basic_post
//!
//! Smallest end-to-end flow: define an event type, implement a subscriber,
//! register it, post an event.
//!
//! Shows how to:
//! - Define an event with [`event_type!`].
//! - Implement the [`Subscriber`] trait.
//! - Register with [`EventBus::register_all`] and post.
//!
//! ## Flow
//! ```text
//! Greeter ──► register_all ──► EventBus
//! main    ──► post(&PlayerJoined) ──► Greeter::on_join
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_post
//! ```

use std::sync::Arc;

use typebus::{event_type, EventBus, Priority, Subscriber, Subscription};

struct PlayerJoined {
    pub name: String,
}
event_type!(PlayerJoined);

/// A simple console subscriber. In real life this would be a plugin's
/// listener object, discovered and registered by the host.
struct Greeter;

impl Greeter {
    fn on_join(&self, event: &PlayerJoined) {
        println!("[greeter] welcome, {}", event.name);
    }
}

impl Subscriber for Greeter {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<Greeter, PlayerJoined>(
            Priority::Default,
            false,
            Greeter::on_join,
        )]
    }

    fn name(&self) -> &'static str {
        "greeter"
    }
}

fn main() -> Result<(), typebus::BusError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bus = EventBus::builder().build();
    let greeter = Arc::new(Greeter);

    let registered = bus.register_all(&(), &greeter)?;
    println!("registered {registered} handler(s)");

    let cancelled = bus.post(&PlayerJoined { name: "alice".into() });
    println!("post returned cancelled={cancelled}");

    bus.unregister_all(&greeter);
    bus.post(&PlayerJoined { name: "bob".into() }); // nobody listens now
    Ok(())
}
