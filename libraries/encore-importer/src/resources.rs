//! Session-scoped resource registry

use encore_core::{ResourceHandle, ResourceReleaser};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// Prefix of minted handles (after the `blob:` scheme)
const HANDLE_PREFIX: &str = "encore/";

#[derive(Debug, Default)]
struct Registry {
    next: u64,
    live: HashMap<String, Rc<[u8]>>,
}

/// Registry of in-memory media bytes behind transient handles
///
/// Cloning shares the registry, so the importer can mint handles while the
/// player releases them. Bytes are dropped once their handle is released.
#[derive(Debug, Clone, Default)]
pub struct TransientResources {
    inner: Rc<RefCell<Registry>>,
}

impl TransientResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `bytes` alive and mint a `blob:` handle for them
    pub fn register(&self, bytes: impl Into<Rc<[u8]>>) -> ResourceHandle {
        let mut registry = self.inner.borrow_mut();
        registry.next += 1;
        let handle = ResourceHandle::transient(format!("{HANDLE_PREFIX}{}", registry.next));
        registry.live.insert(handle.uri().to_string(), bytes.into());
        debug!(handle = handle.uri(), "Registered transient resource");
        handle
    }

    /// Bytes behind a live handle
    pub fn get(&self, handle: &ResourceHandle) -> Option<Rc<[u8]>> {
        self.inner.borrow().live.get(handle.uri()).cloned()
    }

    pub fn contains(&self, handle: &ResourceHandle) -> bool {
        self.inner.borrow().live.contains_key(handle.uri())
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceReleaser for TransientResources {
    fn release(&self, handle: &ResourceHandle) {
        if self.inner.borrow_mut().live.remove(handle.uri()).is_some() {
            debug!(handle = handle.uri(), "Released transient resource");
        } else {
            warn!(handle = handle.uri(), "Release of unknown resource ignored");
        }
    }
}
