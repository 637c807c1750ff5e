use std::sync::Arc;

use crate::native::NativeSystem;
use crate::registry::EventRegistry;

/// Native layer plus the event registry every window of it shares.
///
/// Cheap to clone; each window keeps one.
#[derive(Clone)]
pub struct WindowSystem {
    native: Arc<dyn NativeSystem>,
    registry: Arc<EventRegistry>,
}

impl WindowSystem {
    pub fn new(native: Arc<dyn NativeSystem>) -> Self {
        Self {
            native,
            registry: Arc::new(EventRegistry::new()),
        }
    }

    #[inline]
    pub fn native(&self) -> &dyn NativeSystem {
        self.native.as_ref()
    }

    #[inline]
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }
}
