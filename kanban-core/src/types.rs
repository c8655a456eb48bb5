use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A single unit of user content on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanCard {
    pub id: String,
    /// User-editable title; may be empty.
    #[serde(default)]
    pub title: String,
    /// CSS color value used as the card background.
    #[serde(default)]
    pub color: String,
}

/// A fixed, named bucket of the board as declared by the host markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub key: String,
    pub title: String,
}

impl KanbanColumn {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }
}

/// Ordered card lists keyed by column.
///
/// List order is insertion/move order. Display order is decided at render
/// time by the column's sort directive and never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KanbanBoard {
    lists: BTreeMap<String, Vec<KanbanCard>>,
}

impl KanbanBoard {
    /// A board with one empty list per key.
    pub fn empty<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            lists: keys.into_iter().map(|k| (k.into(), Vec::new())).collect(),
        }
    }

    pub fn keys(&self) -> BTreeSet<String> {
        self.lists.keys().cloned().collect()
    }

    /// Cards of a column in model order. Unknown keys yield an empty slice.
    pub fn cards(&self, key: &str) -> &[KanbanCard] {
        self.lists.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cards_mut(&mut self, key: &str) -> Option<&mut Vec<KanbanCard>> {
        self.lists.get_mut(key)
    }

    pub fn contains_column(&self, key: &str) -> bool {
        self.lists.contains_key(key)
    }

    pub fn total_cards(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    pub fn all_cards_mut(&mut self) -> impl Iterator<Item = &mut KanbanCard> {
        self.lists.values_mut().flat_map(|cards| cards.iter_mut())
    }
}

/// Direction of a card move across the column sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Target column index for a move starting at `from`, if it stays in range.
    pub fn step(self, from: usize, column_count: usize) -> Option<usize> {
        let target = match self {
            Direction::Left => from.checked_sub(1)?,
            Direction::Right => from + 1,
        };
        (target < column_count).then_some(target)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Per-column render ordering override. Transient, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirective {
    #[default]
    Unset,
    Ascending,
    Descending,
}

impl SortDirective {
    /// Next directive in the cycle. `Unset` is only ever the starting point.
    pub fn toggled(self) -> Self {
        match self {
            SortDirective::Ascending => SortDirective::Descending,
            SortDirective::Unset | SortDirective::Descending => SortDirective::Ascending,
        }
    }

    pub fn is_set(self) -> bool {
        self != SortDirective::Unset
    }
}

/// Sort directives for every column that has been toggled at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortDirectives {
    by_column: BTreeMap<String, SortDirective>,
}

impl SortDirectives {
    pub fn get(&self, key: &str) -> SortDirective {
        self.by_column.get(key).copied().unwrap_or_default()
    }

    pub fn toggle(&mut self, key: &str) -> SortDirective {
        let next = self.get(key).toggled();
        self.by_column.insert(key.to_string(), next);
        next
    }
}
