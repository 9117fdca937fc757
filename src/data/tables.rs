//! Symbol tables
//!
//! Read-only defines (symbol -> integer) and texts (key -> localized string)
//! mappings, built once by sibling loaders before quest assembly begins.
//! Every resolution site uses the same idiom: try the table first, then fall
//! back to interpreting the name itself as a literal. Table hits always win
//! over literal parses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Symbolic integer constants (`QUEST_FIRST = 1001`, say ids, job ids).
#[derive(Debug, Clone, Default)]
pub struct DefineTable {
    entries: HashMap<String, i32>,
}

impl DefineTable {
    pub fn new(entries: HashMap<String, i32>) -> Self {
        Self { entries }
    }

    /// Resolve a name to an integer: table lookup first, then literal parse.
    ///
    /// `None` means the name is neither defined nor numeric; the caller
    /// decides whether that drops the field, defaults it, or fails.
    pub fn resolve(&self, name: &str) -> Option<i32> {
        self.entries
            .get(name)
            .copied()
            .or_else(|| name.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Localized text table (`text001 -> "Find the lost sword"`).
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    entries: HashMap<String, String>,
}

impl TextTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Resolve a key to its localized text, falling back to the key itself.
    pub fn resolve(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pair of symbol tables consulted during quest assembly.
#[derive(Debug, Clone, Default)]
pub struct GameResources {
    pub defines: DefineTable,
    pub texts: TextTable,
}

impl GameResources {
    pub fn new(defines: HashMap<String, i32>, texts: HashMap<String, String>) -> Self {
        Self {
            defines: DefineTable::new(defines),
            texts: TextTable::new(texts),
        }
    }

    /// Empty tables; every resolution falls back to literal interpretation.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Process-wide handle to the current symbol-table snapshot.
///
/// A reload builds a complete `GameResources` and publishes it in one swap,
/// so a load pass never observes a partially rebuilt table. Readers take an
/// `Arc` clone and keep it for the duration of their pass.
pub struct ResourcesHandle {
    current: RwLock<Arc<GameResources>>,
    version: AtomicU64,
}

impl ResourcesHandle {
    pub fn new(resources: GameResources) -> Self {
        Self {
            current: RwLock::new(Arc::new(resources)),
            version: AtomicU64::new(1),
        }
    }

    /// The current immutable snapshot.
    pub fn snapshot(&self) -> Arc<GameResources> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Replace the tables wholesale. Returns the new version.
    pub fn publish(&self, resources: GameResources) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(resources);
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl Default for ResourcesHandle {
    fn default() -> Self {
        Self::new(GameResources::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defines() -> DefineTable {
        DefineTable::new(HashMap::from([
            ("QUEST_FIRST".to_string(), 1001),
            // A define whose name is itself a valid numeral.
            ("5".to_string(), 42),
        ]))
    }

    #[test]
    fn test_define_table_lookup() {
        assert_eq!(defines().resolve("QUEST_FIRST"), Some(1001));
    }

    #[test]
    fn test_define_literal_fallback() {
        assert_eq!(defines().resolve("1234"), Some(1234));
        assert_eq!(defines().resolve("-3"), Some(-3));
    }

    #[test]
    fn test_define_table_wins_over_literal() {
        assert_eq!(defines().resolve("5"), Some(42));
    }

    #[test]
    fn test_define_total_failure_is_none() {
        assert_eq!(defines().resolve("QUEST_UNKNOWN"), None);
    }

    #[test]
    fn test_text_table_resolution() {
        let texts = TextTable::new(HashMap::from([(
            "text001".to_string(),
            "Find the lost sword".to_string(),
        )]));
        assert_eq!(texts.resolve("text001"), "Find the lost sword");
        assert_eq!(texts.resolve("text999"), "text999");
    }

    #[test]
    fn test_handle_swaps_whole_snapshots() {
        let handle = ResourcesHandle::default();
        assert_eq!(handle.version(), 1);

        let before = handle.snapshot();
        assert_eq!(before.defines.resolve("QUEST_FIRST"), None);

        let version = handle.publish(GameResources::new(
            HashMap::from([("QUEST_FIRST".to_string(), 1001)]),
            HashMap::new(),
        ));
        assert_eq!(version, 2);

        // The old snapshot is unaffected; new readers see the new tables.
        assert_eq!(before.defines.resolve("QUEST_FIRST"), None);
        assert_eq!(handle.snapshot().defines.resolve("QUEST_FIRST"), Some(1001));
    }
}
