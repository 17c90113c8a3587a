//! # Example: cancel_flow
//!
//! Demonstrates advisory cancellation: an early handler cancels the event,
//! an ignore-cancelled handler skips itself, a plain late handler still
//! runs, and `post` reports the final state.
//!
//! ## Flow
//! ```text
//! post(&ChatMessage)
//!   ├─ First: Moderator::on_chat      → set_cancelled(true)
//!   ├─ Last:  Broadcaster::on_chat    → skipped (ignore_cancelled)
//!   ├─ Last:  AuditLog::on_chat       → runs, sees cancelled=true
//!   └─ post returns true
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example cancel_flow
//! ```

use std::sync::Arc;

use typebus::{
    cancellable_via, event_type, CancelFlag, Cancellable, EventBus, Priority, Subscriber,
    Subscription,
};

struct ChatMessage {
    cancelled: CancelFlag,
    pub text: String,
}
cancellable_via!(ChatMessage, cancelled);
event_type!(ChatMessage: cancellable);

impl ChatMessage {
    fn new(text: impl Into<String>) -> Self {
        Self {
            cancelled: CancelFlag::new(),
            text: text.into(),
        }
    }
}

struct Moderator;

impl Moderator {
    fn on_chat(&self, event: &ChatMessage) {
        if event.text.contains("spam") {
            println!("[moderator] blocking message");
            event.set_cancelled(true);
        }
    }
}

impl Subscriber for Moderator {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<Moderator, ChatMessage>(
            Priority::First,
            false,
            Moderator::on_chat,
        )]
    }
}

/// Delivers messages; opts out of cancelled ones.
struct Broadcaster;

impl Broadcaster {
    fn on_chat(&self, event: &ChatMessage) {
        println!("[broadcast] {}", event.text);
    }
}

impl Subscriber for Broadcaster {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<Broadcaster, ChatMessage>(
            Priority::Last,
            true,
            Broadcaster::on_chat,
        )]
    }
}

/// Records everything, including cancelled messages.
struct AuditLog;

impl AuditLog {
    fn on_chat(&self, event: &ChatMessage) {
        println!(
            "[audit] text={:?} cancelled={}",
            event.text,
            event.is_cancelled()
        );
    }
}

impl Subscriber for AuditLog {
    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::new::<AuditLog, ChatMessage>(
            Priority::Last,
            false,
            AuditLog::on_chat,
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
    bus.register_all(&(), &Arc::new(Moderator))?;
    bus.register_all(&(), &Arc::new(Broadcaster))?;
    bus.register_all(&(), &Arc::new(AuditLog))?;

    let friendly = bus.post(&ChatMessage::new("hello there"));
    println!("friendly message cancelled: {friendly}\n");

    let blocked = bus.post(&ChatMessage::new("buy spam now"));
    println!("spam message cancelled: {blocked}");
    Ok(())
}
