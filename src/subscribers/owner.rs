//! # Owner bookkeeping collaborator.
//!
//! Every registration is tagged with an [`OwnerRef`]: an opaque reference
//! to the unit (plugin, module, component) the registration belongs to.
//! The bus stores it and never looks inside; it exists for bookkeeping and
//! host-side removal policies.
//!
//! The host system decides which objects are valid registrants by
//! implementing [`OwnerLookup`]. [`Unmanaged`] is the standalone lookup for
//! uses without a container system.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque reference to the unit that performed a registration.
#[derive(Clone)]
pub struct OwnerRef(Arc<dyn Any + Send + Sync>);

impl OwnerRef {
    /// Wraps an owner container.
    pub fn new(owner: impl Any + Send + Sync) -> Self {
        Self(Arc::new(owner))
    }

    /// Wraps an already-shared owner container.
    pub fn from_arc(owner: Arc<dyn Any + Send + Sync>) -> Self {
        Self(owner)
    }

    /// The wrapped container. The bus itself never calls this; it is for
    /// hosts that hand out typed containers.
    pub fn container(&self) -> &(dyn Any + Send + Sync) {
        self.0.as_ref()
    }
}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerRef({:p})", Arc::as_ptr(&self.0))
    }
}

/// Resolves a registrant object to its owner container.
///
/// `register_all` consults this before scanning a listener; an unrecognized
/// registrant is rejected with
/// [`BusError::UnknownRegistrant`](crate::BusError::UnknownRegistrant)
/// before any state is touched.
pub trait OwnerLookup: Send + Sync {
    /// Returns the owner container for `registrant`, or `None` if the
    /// object is not a recognized registration unit.
    fn owner_of(&self, registrant: &dyn Any) -> Option<OwnerRef>;
}

/// Owner lookup for standalone use: accepts every registrant and issues a
/// fresh anonymous owner per registration.
pub struct Unmanaged;

impl OwnerLookup for Unmanaged {
    fn owner_of(&self, _registrant: &dyn Any) -> Option<OwnerRef> {
        Some(OwnerRef::new(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HostPlugins {
        known: &'static str,
    }

    impl OwnerLookup for HostPlugins {
        fn owner_of(&self, registrant: &dyn Any) -> Option<OwnerRef> {
            let name = registrant.downcast_ref::<&'static str>()?;
            (*name == self.known).then(|| OwnerRef::new(*name))
        }
    }

    #[test]
    fn test_unmanaged_accepts_anything() {
        assert!(Unmanaged.owner_of(&42_u32).is_some());
    }

    #[test]
    fn test_host_lookup_filters_registrants() {
        let plugins = HostPlugins { known: "worldgen" };
        assert!(plugins.owner_of(&"worldgen").is_some());
        assert!(plugins.owner_of(&"stranger").is_none());
        assert!(plugins.owner_of(&7_i32).is_none());
    }

    #[test]
    fn test_container_round_trip() {
        let owner = OwnerRef::new("worldgen");
        let container = owner.container().downcast_ref::<&'static str>();
        assert_eq!(container.copied(), Some("worldgen"));
    }
}
