/// In-memory board model.
///
/// Owns the column sequence, the card lists and the per-column sort
/// directives. Every operation that changes card data saves the whole board
/// through the persistence adapter before returning. Sorting is render-only
/// and never saved.
use std::collections::BTreeSet;

use crate::color::random_color;
use crate::error::{KanbanError, Result};
use crate::id::generate_card_id;
use crate::persist::{LoadOutcome, Persistence};
use crate::storage::KeyValueStore;
use crate::types::{Direction, KanbanBoard, KanbanCard, KanbanColumn, SortDirective, SortDirectives};

/// Title given to newly added cards.
pub const DEFAULT_CARD_TITLE: &str = "New card";

/// Result of committing a title edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    NotFound,
    /// Trimmed title equals the current one; nothing was written.
    Unchanged,
    /// Title changed and the board was saved. Carries the owning column.
    Renamed { column: String },
}

/// Where a card currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocation {
    pub column_index: usize,
    pub card_index: usize,
}

pub struct BoardModel<S> {
    columns: Vec<KanbanColumn>,
    board: KanbanBoard,
    sort: SortDirectives,
    persistence: Persistence<S>,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> BoardModel<S> {
    /// Load the board for `columns` from `store`, falling back to an empty board.
    pub fn open(columns: Vec<KanbanColumn>, store: S) -> Self {
        Self::with_persistence(columns, Persistence::new(store))
    }

    pub fn with_persistence(columns: Vec<KanbanColumn>, persistence: Persistence<S>) -> Self {
        let keys: BTreeSet<String> = columns.iter().map(|c| c.key.clone()).collect();
        let (board, load_outcome) = persistence.load_with_outcome(&keys);
        log::debug!(
            "[kanban.model] Opened board with {} columns and {} cards ({:?})",
            columns.len(),
            board.total_cards(),
            load_outcome
        );
        Self {
            columns,
            board,
            sort: SortDirectives::default(),
            persistence,
            load_outcome,
        }
    }

    pub fn columns(&self) -> &[KanbanColumn] {
        &self.columns
    }

    pub fn board(&self) -> &KanbanBoard {
        &self.board
    }

    pub fn sort_directives(&self) -> &SortDirectives {
        &self.sort
    }

    pub fn sort_directive(&self, column_key: &str) -> SortDirective {
        self.sort.get(column_key)
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Give back the underlying store, ending the model.
    pub fn into_store(self) -> S {
        self.persistence.into_store()
    }

    pub fn column_index(&self, column_key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == column_key)
    }

    /// Find a card by scanning columns in sequence order.
    pub fn locate(&self, card_id: &str) -> Option<CardLocation> {
        self.columns.iter().enumerate().find_map(|(column_index, column)| {
            self.board
                .cards(&column.key)
                .iter()
                .position(|c| c.id == card_id)
                .map(|card_index| CardLocation {
                    column_index,
                    card_index,
                })
        })
    }

    /// The card with `card_id` and the key of the column holding it.
    pub fn find_card(&self, card_id: &str) -> Option<(&str, &KanbanCard)> {
        let loc = self.locate(card_id)?;
        let key = self.columns[loc.column_index].key.as_str();
        self.board.cards(key).get(loc.card_index).map(|card| (key, card))
    }

    fn card_mut(&mut self, loc: CardLocation) -> Option<&mut KanbanCard> {
        let key = &self.columns[loc.column_index].key;
        self.board.cards_mut(key)?.get_mut(loc.card_index)
    }

    fn save(&mut self) {
        self.persistence.save(&self.board);
    }

    /// Append a new card to `column_key`.
    pub fn add_card(&mut self, column_key: &str) -> Result<KanbanCard> {
        let card = KanbanCard {
            id: generate_card_id(),
            title: DEFAULT_CARD_TITLE.to_string(),
            color: random_color(),
        };
        let cards = self
            .board
            .cards_mut(column_key)
            .ok_or_else(|| KanbanError::UnknownColumn(column_key.to_string()))?;
        cards.push(card.clone());
        self.save();
        Ok(card)
    }

    /// Remove a card. Returns false if no card has this id.
    pub fn delete_card(&mut self, card_id: &str) -> bool {
        let Some(loc) = self.locate(card_id) else {
            return false;
        };
        let key = self.columns[loc.column_index].key.clone();
        if let Some(cards) = self.board.cards_mut(&key) {
            cards.remove(loc.card_index);
        }
        self.save();
        true
    }

    /// Move a card one column left or right, appending it to the target list.
    /// Returns false if the card is unknown or already at the edge.
    pub fn move_card(&mut self, card_id: &str, direction: Direction) -> bool {
        let Some(loc) = self.locate(card_id) else {
            return false;
        };
        let Some(target) = direction.step(loc.column_index, self.columns.len()) else {
            return false;
        };
        let from_key = self.columns[loc.column_index].key.clone();
        let to_key = self.columns[target].key.clone();

        let Some(card) = self
            .board
            .cards_mut(&from_key)
            .map(|cards| cards.remove(loc.card_index))
        else {
            return false;
        };
        match self.board.cards_mut(&to_key) {
            Some(cards) => cards.push(card),
            None => {
                // Target list missing: put the card back where it was.
                if let Some(cards) = self.board.cards_mut(&from_key) {
                    cards.insert(loc.card_index, card);
                }
                return false;
            }
        }
        self.save();
        true
    }

    /// Set a card's title to the trimmed `new_title`, saving only on change.
    pub fn rename_card(&mut self, card_id: &str, new_title: &str) -> RenameOutcome {
        let Some(loc) = self.locate(card_id) else {
            return RenameOutcome::NotFound;
        };
        let title = new_title.trim();
        let Some(card) = self.card_mut(loc) else {
            return RenameOutcome::NotFound;
        };
        if card.title == title {
            return RenameOutcome::Unchanged;
        }
        card.title = title.to_string();
        self.save();
        RenameOutcome::Renamed {
            column: self.columns[loc.column_index].key.clone(),
        }
    }

    /// Give one card a new random color.
    pub fn recolor_card(&mut self, card_id: &str) -> bool {
        let Some(loc) = self.locate(card_id) else {
            return false;
        };
        let Some(card) = self.card_mut(loc) else {
            return false;
        };
        card.color = random_color();
        self.save();
        true
    }

    /// Give every card in a column a new random color. Returns how many changed.
    pub fn recolor_column(&mut self, column_key: &str) -> Result<usize> {
        let cards = self
            .board
            .cards_mut(column_key)
            .ok_or_else(|| KanbanError::UnknownColumn(column_key.to_string()))?;
        for card in cards.iter_mut() {
            card.color = random_color();
        }
        let count = cards.len();
        self.save();
        Ok(count)
    }

    /// Advance a column's sort directive. Does not touch storage.
    pub fn toggle_sort(&mut self, column_key: &str) -> Result<SortDirective> {
        if self.column_index(column_key).is_none() {
            return Err(KanbanError::UnknownColumn(column_key.to_string()));
        }
        Ok(self.sort.toggle(column_key))
    }

    /// Read the persisted board again without replacing the live one.
    pub fn reload(&self) -> KanbanBoard {
        let keys: BTreeSet<String> = self.columns.iter().map(|c| c.key.clone()).collect();
        self.persistence.load(&keys)
    }

    /// Save the live board now. Returns whether the write landed.
    pub fn persist(&mut self) -> bool {
        self.persistence.save(&self.board)
    }
}
