use std::sync::Arc;

use crate::core::bus::EventBus;
use crate::core::config::BusConfig;
use crate::subscribers::{OwnerLookup, Unmanaged};

/// Builder for constructing an [`EventBus`] with optional collaborators.
pub struct EventBusBuilder {
    config: BusConfig,
    owners: Arc<dyn OwnerLookup>,
}

impl EventBusBuilder {
    /// Creates a new builder with default configuration and the
    /// [`Unmanaged`] owner lookup.
    pub fn new() -> Self {
        Self {
            config: BusConfig::default(),
            owners: Arc::new(Unmanaged),
        }
    }

    /// Sets the bus configuration.
    pub fn with_config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the owner lookup collaborator.
    ///
    /// The lookup decides which objects are valid registrants for
    /// [`EventBus::register_all`] and supplies the owner container attached
    /// to each registration.
    pub fn with_owners(mut self, owners: Arc<dyn OwnerLookup>) -> Self {
        self.owners = owners;
        self
    }

    /// Builds the bus.
    ///
    /// This consumes the builder and initializes the runtime components:
    /// the specialization factory, the kind-keyed handler sets, and the
    /// hierarchy cache.
    pub fn build(self) -> EventBus {
        EventBus::new_internal(self.config, self.owners)
    }
}

impl Default for EventBusBuilder {
    fn default() -> Self {
        Self::new()
    }
}
