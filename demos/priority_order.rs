//! # Example: priority_order
//!
//! Demonstrates hierarchical dispatch and the global priority order.
//!
//! Shows how to:
//! - Build an event lattice with embedded parents (`WorldLoad` extends
//!   `WorldEvent` extends `ServerEvent`).
//! - Register handlers for base types and observe derived posts.
//! - See priorities interleave across listeners and event types.
//!
//! ## Flow
//! ```text
//! post(&WorldLoad)
//!   ├─ First:   Auditor::on_world_load   (registered for WorldLoad)
//!   ├─ Default: Tracker::on_world        (registered for WorldEvent)
//!   └─ Monitor: Console::on_server       (registered for ServerEvent)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example priority_order
//! ```

use std::sync::Arc;

use typebus::{event_type, EventBus, Priority, Subscriber, Subscription};

struct ServerEvent;
event_type!(ServerEvent);

struct WorldEvent {
    base: ServerEvent,
    pub world: &'static str,
}
event_type!(WorldEvent => base: ServerEvent);

struct WorldLoad {
    base: WorldEvent,
}
event_type!(WorldLoad => base: WorldEvent);

struct Auditor;

impl Auditor {
    fn on_world_load(&self, event: &WorldLoad) {
        println!("[first]   auditor: loading {}", event.base.world);
    }
}

impl Subscriber for Auditor {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<Auditor, WorldLoad>(
            Priority::First,
            false,
            Auditor::on_world_load,
        )]
    }
}

struct Tracker;

impl Tracker {
    fn on_world(&self, event: &WorldEvent) {
        println!("[default] tracker: world event for {}", event.world);
    }
}

impl Subscriber for Tracker {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<Tracker, WorldEvent>(
            Priority::Default,
            false,
            Tracker::on_world,
        )]
    }
}

struct Console;

impl Console {
    fn on_server(&self, _event: &ServerEvent) {
        println!("[monitor] console: server activity observed");
    }
}

impl Subscriber for Console {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<Console, ServerEvent>(
            Priority::Monitor,
            true,
            Console::on_server,
        )]
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

    // Registration order is deliberately the reverse of dispatch order.
    bus.register_all(&(), &Arc::new(Console))?;
    bus.register_all(&(), &Arc::new(Tracker))?;
    bus.register_all(&(), &Arc::new(Auditor))?;

    bus.post(&WorldLoad {
        base: WorldEvent {
            base: ServerEvent,
            world: "overworld",
        },
    });
    Ok(())
}
