//! Service registry data source.
//!
//! The registry is the persisted list of configured services. The dispatcher
//! only reads it, to build the index listing.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::GateResult;

/// One row of the service registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Name used in request paths.
    pub api_name: String,
    /// Human-readable display name.
    pub name: String,
}

impl ServiceEntry {
    /// Creates a registry entry.
    #[must_use]
    pub fn new(api_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            name: name.into(),
        }
    }

    /// The service managers that exist without a registry row, in listing
    /// order: `user` then `system`.
    #[must_use]
    pub fn builtin() -> [Self; 2] {
        [
            Self::new("user", "User Login"),
            Self::new("system", "System Configuration"),
        ]
    }
}

/// Read access to the service registry.
#[async_trait]
pub trait ServiceRegistry: Send + Sync + 'static {
    /// Returns all registered services, ordered by `api_name` ascending.
    async fn list_services(&self) -> GateResult<Vec<ServiceEntry>>;
}

/// A registry held in memory.
///
/// ```
/// use restgate_core::{InMemoryRegistry, ServiceEntry};
///
/// let registry = InMemoryRegistry::new();
/// registry.insert(ServiceEntry::new("db", "Database"));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    entries: RwLock<Vec<ServiceEntry>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from a list of entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ServiceEntry>) -> Self {
        let registry = Self::new();
        for entry in entries {
            registry.insert(entry);
        }
        registry
    }

    /// Adds or replaces the entry with the same `api_name`.
    pub fn insert(&self, entry: ServiceEntry) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.api_name == entry.api_name) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl ServiceRegistry for InMemoryRegistry {
    async fn list_services(&self) -> GateResult<Vec<ServiceEntry>> {
        let mut rows = self.entries.read().clone();
        rows.sort_by(|a, b| a.api_name.cmp(&b.api_name));
        Ok(rows)
    }
}
