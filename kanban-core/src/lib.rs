//! Kanban board core: an in-memory board of ordered columns, persisted to a
//! key-value store after every change and painted into an element tree by a
//! full-rebuild renderer.
//!
//! ```rust
//! use kanban_core::markup::skeleton;
//! use kanban_core::session::Session;
//! use kanban_core::storage::MemoryStore;
//! use kanban_core::types::KanbanColumn;
//!
//! let columns = vec![KanbanColumn::new("todo", "To do"), KanbanColumn::new("done", "Done")];
//! let mut session = Session::init(skeleton(&columns), MemoryStore::new()).unwrap();
//! session.dispatch(kanban_core::action::Action::Add { column: "todo".into() });
//! assert_eq!(session.model().board().cards("todo").len(), 1);
//! ```

pub mod action;
pub mod color;
pub mod dom;
pub mod error;
pub mod id;
pub mod markup;
pub mod model;
pub mod persist;
pub mod render;
pub mod session;
pub mod storage;
pub mod types;

pub use error::{KanbanError, Result};
