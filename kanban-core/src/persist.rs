/// Board persistence on top of a key-value store.
///
/// The whole board lives under a single key as a JSON object mapping column
/// key to card list. Loading never fails: absent, unreadable or
/// schema-incompatible data degrades to an empty board. Saving is
/// best-effort: failures are logged and the in-memory board stands.
use std::collections::BTreeSet;

use crate::color::random_color;
use crate::storage::KeyValueStore;
use crate::types::KanbanBoard;

/// Storage key for the serialized board.
pub const STORAGE_KEY: &str = "kanban-data-v1";

/// How the board returned by a load was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored data was valid for the current columns.
    Restored,
    /// Nothing was stored yet.
    Missing,
    /// Stored data was not a valid board.
    Corrupt,
    /// Stored data was for a different set of columns.
    SchemaMismatch,
    /// The store itself could not be read.
    Unavailable,
}

pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the board for exactly `expected` columns.
    pub fn load(&self, expected: &BTreeSet<String>) -> KanbanBoard {
        self.load_with_outcome(expected).0
    }

    /// Load the board and report how it was obtained.
    pub fn load_with_outcome(&self, expected: &BTreeSet<String>) -> (KanbanBoard, LoadOutcome) {
        let fresh = || KanbanBoard::empty(expected.iter().cloned());

        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("[kanban.persist.load] No saved board under {}, starting empty", self.key);
                return (fresh(), LoadOutcome::Missing);
            }
            Err(e) => {
                log::error!("[kanban.persist.load] Failed to read {}: {}", self.key, e);
                return (fresh(), LoadOutcome::Unavailable);
            }
        };

        let mut board: KanbanBoard = match serde_json::from_str(&raw) {
            Ok(board) => board,
            Err(e) => {
                log::warn!("[kanban.persist.load] Discarding unreadable board data: {}", e);
                return (fresh(), LoadOutcome::Corrupt);
            }
        };

        let stored = board.keys();
        if &stored != expected {
            log::warn!(
                "[kanban.persist.load] Saved columns {:?} do not match current columns {:?}, starting empty",
                stored,
                expected
            );
            return (fresh(), LoadOutcome::SchemaMismatch);
        }

        // Older data may lack a color; give those cards one so rendering stays stable.
        for card in board.all_cards_mut().filter(|c| c.color.is_empty()) {
            card.color = random_color();
        }

        (board, LoadOutcome::Restored)
    }

    /// Serialize and store the whole board. Returns whether the write landed.
    pub fn save(&mut self, board: &KanbanBoard) -> bool {
        let json = match serde_json::to_string(board) {
            Ok(json) => json,
            Err(e) => {
                log::error!("[kanban.persist.save] Failed to serialize board: {}", e);
                return false;
            }
        };
        match self.store.set(&self.key, &json) {
            Ok(()) => true,
            Err(e) => {
                log::error!("[kanban.persist.save] Failed to write {}: {}", self.key, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use crate::types::KanbanCard;

    fn keys(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn card(id: &str, title: &str) -> KanbanCard {
        KanbanCard {
            id: id.to_string(),
            title: title.to_string(),
            color: "hsl(1 70% 85%)".to_string(),
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_yields_empty_board() {
        let p = Persistence::new(MemoryStore::new());
        let (board, outcome) = p.load_with_outcome(&keys(&["todo", "done"]));
        assert_eq!(outcome, LoadOutcome::Missing);
        assert_eq!(board, KanbanBoard::empty(["todo", "done"]));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut p = Persistence::new(MemoryStore::new());
        let mut board = KanbanBoard::empty(["todo", "doing", "done"]);
        board.cards_mut("todo").unwrap().push(card("a", "First"));
        board.cards_mut("done").unwrap().push(card("b", ""));
        assert!(p.save(&board));

        let (loaded, outcome) = p.load_with_outcome(&keys(&["todo", "doing", "done"]));
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(loaded, board);
    }

    #[test]
    fn test_schema_mismatch_discards_stale_data() {
        let mut p = Persistence::new(MemoryStore::new());
        let mut old = KanbanBoard::empty(["backlog", "done"]);
        old.cards_mut("backlog").unwrap().push(card("a", "stale"));
        p.save(&old);

        let (board, outcome) = p.load_with_outcome(&keys(&["todo", "done"]));
        assert_eq!(outcome, LoadOutcome::SchemaMismatch);
        assert_eq!(board, KanbanBoard::empty(["todo", "done"]));
    }

    #[test]
    fn test_superset_of_columns_is_a_mismatch() {
        let mut p = Persistence::new(MemoryStore::new());
        p.save(&KanbanBoard::empty(["todo", "doing", "done"]));
        let (_, outcome) = p.load_with_outcome(&keys(&["todo", "done"]));
        assert_eq!(outcome, LoadOutcome::SchemaMismatch);
    }

    #[test]
    fn test_corrupt_json_yields_empty_board() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let p = Persistence::new(store);
        let (board, outcome) = p.load_with_outcome(&keys(&["todo"]));
        assert_eq!(outcome, LoadOutcome::Corrupt);
        assert_eq!(board, KanbanBoard::empty(["todo"]));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"todo": 5}"#).unwrap();
        let p = Persistence::new(store);
        assert_eq!(p.load_with_outcome(&keys(&["todo"])).1, LoadOutcome::Corrupt);
    }

    #[test]
    fn test_missing_color_is_filled_on_load() {
        let mut store = MemoryStore::new();
        store
            .set(STORAGE_KEY, r#"{"todo":[{"id":"a","title":"t"}]}"#)
            .unwrap();
        let p = Persistence::new(store);
        let board = p.load(&keys(&["todo"]));
        assert!(board.cards("todo")[0].color.starts_with("hsl("));
    }

    #[test]
    fn test_unreadable_store_degrades() {
        let mut p = Persistence::new(BrokenStore);
        let (board, outcome) = p.load_with_outcome(&keys(&["todo"]));
        assert_eq!(outcome, LoadOutcome::Unavailable);
        assert_eq!(board, KanbanBoard::empty(["todo"]));
        assert!(!p.save(&board));
    }

    #[test]
    fn test_quota_failure_is_swallowed() {
        let mut p = Persistence::new(MemoryStore::with_quota(8));
        let board = KanbanBoard::empty(["todo"]);
        assert!(!p.save(&board));
        assert_eq!(p.store().writes(), 0);
    }
}
