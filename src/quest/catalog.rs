//! Quest catalog
//!
//! The published, immutable map from quest id to assembled definition. The
//! catalog is the only artifact the rest of the server sees; a reload builds
//! a fresh snapshot and swaps it in wholesale.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::definition::QuestData;

/// Immutable snapshot of all assembled quests, keyed by quest id.
#[derive(Debug, Default)]
pub struct QuestCatalog {
    quests: HashMap<i32, Arc<QuestData>>,
}

impl QuestCatalog {
    pub fn new(quests: HashMap<i32, Arc<QuestData>>) -> Self {
        Self { quests }
    }

    /// Get a quest by id.
    pub fn get(&self, quest_id: i32) -> Option<Arc<QuestData>> {
        self.quests.get(&quest_id).cloned()
    }

    /// Enumerate all quests.
    pub fn all(&self) -> impl Iterator<Item = &Arc<QuestData>> {
        self.quests.values()
    }

    /// All quest ids.
    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.quests.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

/// Process-wide handle to the current catalog snapshot.
///
/// Readers clone the `Arc` once and then read lock-free; a load pass
/// publishes its finished catalog in a single swap.
pub struct CatalogHandle {
    current: RwLock<Arc<QuestCatalog>>,
    version: AtomicU64,
}

impl CatalogHandle {
    /// Starts out empty, version 0, until the first load pass publishes.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(QuestCatalog::default())),
            version: AtomicU64::new(0),
        }
    }

    /// The current immutable snapshot.
    pub fn snapshot(&self) -> Arc<QuestCatalog> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Replace the catalog wholesale. Returns the new version.
    pub fn publish(&self, catalog: QuestCatalog) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(catalog);
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(ids: &[i32]) -> QuestCatalog {
        let quests = ids
            .iter()
            .map(|&id| {
                let quest = QuestData::new(id, &id.to_string(), "title");
                (id, Arc::new(quest))
            })
            .collect();
        QuestCatalog::new(quests)
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = catalog_with(&[1001, 1002]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1001).unwrap().id, 1001);
        assert!(catalog.get(9999).is_none());

        let mut ids: Vec<i32> = catalog.ids().collect();
        ids.sort();
        assert_eq!(ids, vec![1001, 1002]);
    }

    #[test]
    fn test_handle_publish_replaces_wholesale() {
        let handle = CatalogHandle::new();
        assert_eq!(handle.version(), 0);
        assert!(handle.snapshot().is_empty());

        assert_eq!(handle.publish(catalog_with(&[1001])), 1);
        let first = handle.snapshot();
        assert!(first.get(1001).is_some());

        assert_eq!(handle.publish(catalog_with(&[2002])), 2);
        let second = handle.snapshot();
        assert!(second.get(1001).is_none());
        assert!(second.get(2002).is_some());

        // Snapshots taken earlier stay valid and unchanged.
        assert!(first.get(1001).is_some());
    }
}
