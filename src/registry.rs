//! In-memory registry of known garden systems.
//!
//! The registry mirrors the server's view of every system: it is bulk-loaded
//! once per connection with [`SystemRegistry::initialize`] and then kept
//! current with [`SystemRegistry::apply_update`]. Ordering is first-seen
//! order; any sorting or filtering belongs to the display layer.

use crate::models::GardenSystem;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Capacity of the change notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Registry shared between the transport task and the display layer.
pub type SharedRegistry = Arc<RwLock<SystemRegistry>>;

/// What a mutation did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryChange {
    /// Contents were replaced by a full snapshot of `count` systems.
    Initialized { count: usize },
    /// An existing entry was replaced in place.
    Replaced { index: usize, id: String },
    /// A previously unknown system was added at the end.
    Appended { index: usize, id: String },
}

#[derive(Debug)]
pub struct SystemRegistry {
    systems: Vec<GardenSystem>,
    changes: broadcast::Sender<RegistryChange>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            systems: Vec::new(),
            changes,
        }
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Replace the whole collection with a snapshot, keeping its order.
    ///
    /// Duplicate ids inside `systems` are not checked; the source is trusted.
    pub fn initialize(&mut self, systems: Vec<GardenSystem>) -> RegistryChange {
        self.systems = systems;
        tracing::debug!(count = self.systems.len(), "Registry initialized");
        self.notify(RegistryChange::Initialized {
            count: self.systems.len(),
        })
    }

    /// Reconcile one full system snapshot.
    ///
    /// A known id is replaced wholesale at its current position; an unknown id
    /// is a newly joined system and is appended.
    pub fn apply_update(&mut self, system: GardenSystem) -> RegistryChange {
        let id = system.id.clone();

        let change = match self.position(&id) {
            Some(index) => {
                self.systems[index] = system;
                RegistryChange::Replaced { index, id }
            },
            None => {
                tracing::debug!(system_id = %id, "Registered new garden system");
                self.systems.push(system);
                RegistryChange::Appended {
                    index: self.systems.len() - 1,
                    id,
                }
            },
        };

        self.notify(change)
    }

    pub fn systems(&self) -> &[GardenSystem] {
        &self.systems
    }

    pub fn get(&self, id: &str) -> Option<&GardenSystem> {
        self.systems.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.systems.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Receive every change applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryChange> {
        self.changes.subscribe()
    }

    fn notify(&self, change: RegistryChange) -> RegistryChange {
        // Sending only fails when nobody is subscribed.
        let _ = self.changes.send(change.clone());
        change
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
