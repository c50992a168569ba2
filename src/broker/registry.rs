//! Resource registry
//!
//! Maps resource names to their lock state. Entries are created lazily on
//! first reference and never evicted: a resource's value survives unlock and
//! stays visible to every later owner for the life of the daemon. Access is
//! serialized by the dispatch loop that owns the registry, so no locking is
//! needed here.

use std::collections::{HashMap, VecDeque};

use crate::broker::router::ClientId;

/// Lock state for a single named resource
#[derive(Debug, Default)]
pub struct ResourceState {
    /// Current exclusive holder; `None` means unlocked
    pub owner: Option<ClientId>,
    /// Clients waiting for the lock, in arrival order
    pub waiters: VecDeque<ClientId>,
    /// Last-written payload; persists across lock/unlock cycles
    pub value: String,
}

impl ResourceState {
    pub fn is_unlocked(&self) -> bool {
        self.owner.is_none()
    }

    pub fn owned_by(&self, client: &ClientId) -> bool {
        self.owner.as_ref() == Some(client)
    }
}

/// All known resources, keyed by name
#[derive(Debug, Default)]
pub struct Registry {
    resources: HashMap<String, ResourceState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resource, creating it unlocked and empty on first reference
    pub fn get_or_create(&mut self, name: &str) -> &mut ResourceState {
        self.resources.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&ResourceState> {
        self.resources.get(name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
