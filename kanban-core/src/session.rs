/// Interaction controller.
///
/// A `Session` owns the DOM root and the board model. Clicks are delegated:
/// one listener per column element resolves the originating button into an
/// `Action`. Title edits are committed through one blur listener per
/// rendered title surface; those listeners are rebound on every repaint
/// because the surfaces themselves are rebuilt.
use crate::action::Action;
use crate::dom::{by_class, by_data, Element, NodePath};
use crate::error::{KanbanError, Result};
use crate::markup::{column_path, discover_columns};
use crate::model::{BoardModel, RenameOutcome};
use crate::render::{render, CARD_CLASS, CARD_TITLE_CLASS};
use crate::storage::KeyValueStore;
use crate::types::KanbanBoard;

/// A click on the element at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodePath,
}

/// Focus left the element at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurEvent {
    pub target: NodePath,
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Model data or a sort directive changed.
    pub changed: bool,
    /// The board was repainted.
    pub rendered: bool,
}

impl Dispatch {
    fn ignored() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
struct ColumnListener {
    path: NodePath,
    column: String,
}

#[derive(Debug, Clone)]
struct TitleListener {
    path: NodePath,
    card_id: String,
}

pub struct Session<S> {
    root: Element,
    model: BoardModel<S>,
    column_listeners: Vec<ColumnListener>,
    title_listeners: Vec<TitleListener>,
    focused: Option<NodePath>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a board on `root`: discover columns, load, bind, paint.
    pub fn init(root: Element, store: S) -> Result<Self> {
        let columns = discover_columns(&root)?;
        let model = BoardModel::open(columns, store);

        let mut column_listeners = Vec::new();
        for column in model.columns() {
            let Some(path) = column_path(&root, &column.key) else {
                continue;
            };
            column_listeners.push(ColumnListener {
                path,
                column: column.key.clone(),
            });
        }
        if column_listeners.is_empty() {
            return Err(KanbanError::NoColumns);
        }

        let mut session = Self {
            root,
            model,
            column_listeners,
            title_listeners: Vec::new(),
            focused: None,
        };
        session.repaint();
        log::info!(
            "[kanban.session] Board ready: {} columns, {} cards",
            session.model.columns().len(),
            session.model.board().total_cards()
        );
        Ok(session)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn model(&self) -> &BoardModel<S> {
        &self.model
    }

    pub fn into_store(self) -> S {
        self.model.into_store()
    }

    /// Title surface that should receive focus, set after a card is added.
    pub fn focused(&self) -> Option<&NodePath> {
        self.focused.as_ref()
    }

    /// Replace the text of an editable element, as typing into it would.
    /// Returns false if `target` is not an editable element.
    pub fn edit_text(&mut self, target: &NodePath, text: &str) -> bool {
        match self.root.get_mut(target) {
            Some(el) if el.attr("contenteditable") == Some("true") => {
                el.set_text(text);
                true
            }
            _ => false,
        }
    }

    /// Handle a click anywhere in the document.
    pub fn click(&mut self, event: &ClickEvent) -> Dispatch {
        let Some(listener) = self
            .column_listeners
            .iter()
            .find(|l| l.path.contains(&event.target))
        else {
            return Dispatch::ignored();
        };

        let button = self
            .root
            .closest(&event.target, |el| el.tag() == "button")
            .filter(|p| listener.path.contains(p));
        let Some(action) = button
            .and_then(|p| self.root.get(&p))
            .and_then(|el| Action::from_control(el, &listener.column))
        else {
            log::trace!("[kanban.session] Ignoring click without a known action");
            return Dispatch::ignored();
        };
        self.dispatch(action)
    }

    /// Handle focus leaving an element; commits title edits.
    pub fn blur(&mut self, event: &BlurEvent) -> Dispatch {
        let Some(listener) = self.title_listeners.iter().find(|l| l.path == event.target) else {
            return Dispatch::ignored();
        };
        let Some(el) = self.root.get(&listener.path) else {
            return Dispatch::ignored();
        };
        let action = Action::Rename {
            card_id: listener.card_id.clone(),
            title: el.text_content(),
        };
        self.dispatch(action)
    }

    /// Apply an action to the model and repaint when something changed.
    pub fn dispatch(&mut self, action: Action) -> Dispatch {
        log::debug!("[kanban.session] Dispatching {:?}", action);
        match action {
            Action::Add { column } => match self.model.add_card(&column) {
                Ok(card) => {
                    self.repaint();
                    self.focused = self.title_path(&card.id);
                    Dispatch {
                        changed: true,
                        rendered: true,
                    }
                }
                Err(e) => {
                    log::warn!("[kanban.session] Add failed: {}", e);
                    Dispatch::ignored()
                }
            },
            Action::Sort { column } => match self.model.toggle_sort(&column) {
                Ok(_) => self.changed_and_repaint(),
                Err(e) => {
                    log::warn!("[kanban.session] Sort failed: {}", e);
                    Dispatch::ignored()
                }
            },
            Action::RecolorColumn { column } => match self.model.recolor_column(&column) {
                Ok(_) => self.changed_and_repaint(),
                Err(e) => {
                    log::warn!("[kanban.session] Recolor failed: {}", e);
                    Dispatch::ignored()
                }
            },
            Action::Move { card_id, direction } => {
                let moved = self.model.move_card(&card_id, direction);
                self.repaint_if(moved)
            }
            Action::Recolor { card_id } => {
                let recolored = self.model.recolor_card(&card_id);
                self.repaint_if(recolored)
            }
            Action::Delete { card_id } => {
                let deleted = self.model.delete_card(&card_id);
                self.repaint_if(deleted)
            }
            Action::Rename { card_id, title } => match self.model.rename_card(&card_id, &title) {
                RenameOutcome::Renamed { column } => {
                    // Repaint only when the new title can change display order.
                    let rendered = self.model.sort_directive(&column).is_set();
                    if rendered {
                        self.repaint();
                    }
                    Dispatch {
                        changed: true,
                        rendered,
                    }
                }
                RenameOutcome::Unchanged | RenameOutcome::NotFound => Dispatch::ignored(),
            },
        }
    }

    /// Read the persisted board again, without touching the live one.
    pub fn reload_persisted(&self) -> KanbanBoard {
        self.model.reload()
    }

    /// Save the live board now.
    pub fn persist(&mut self) -> bool {
        self.model.persist()
    }

    fn changed_and_repaint(&mut self) -> Dispatch {
        self.repaint();
        Dispatch {
            changed: true,
            rendered: true,
        }
    }

    fn repaint_if(&mut self, changed: bool) -> Dispatch {
        if changed {
            self.changed_and_repaint()
        } else {
            Dispatch::ignored()
        }
    }

    fn repaint(&mut self) {
        render(
            &mut self.root,
            self.model.board(),
            self.model.columns(),
            self.model.sort_directives(),
        );
        self.focused = None;
        self.bind_titles();
    }

    fn bind_titles(&mut self) {
        let root = &self.root;
        self.title_listeners = root
            .find_all(by_class(CARD_TITLE_CLASS))
            .into_iter()
            .filter_map(|path| {
                let card = root.closest(&path, by_class(CARD_CLASS))?;
                let card_id = root.get(&card)?.data("id")?.to_string();
                Some(TitleListener { path, card_id })
            })
            .collect();
    }

    fn title_path(&self, card_id: &str) -> Option<NodePath> {
        let card = self.root.find_first(by_data("id", card_id))?;
        self.root.find_within(&card, by_class(CARD_TITLE_CLASS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::skeleton;
    use crate::storage::MemoryStore;
    use crate::types::{Direction, KanbanColumn, SortDirective};

    fn columns() -> Vec<KanbanColumn> {
        vec![
            KanbanColumn::new("todo", "To do"),
            KanbanColumn::new("doing", "Doing"),
            KanbanColumn::new("done", "Done"),
        ]
    }

    fn session() -> Session<MemoryStore> {
        Session::init(skeleton(&columns()), MemoryStore::new()).unwrap()
    }

    fn control(s: &Session<MemoryStore>, pred: impl Fn(&Element) -> bool) -> ClickEvent {
        ClickEvent {
            target: s.root().find_first(pred).unwrap(),
        }
    }

    fn column_button(s: &Session<MemoryStore>, key: &str, action: &str) -> ClickEvent {
        let col = column_path(s.root(), key).unwrap();
        ClickEvent {
            target: s
                .root()
                .find_within(&col, |el| el.data("action") == Some(action))
                .unwrap(),
        }
    }

    fn card_button(s: &Session<MemoryStore>, id: &str, action: &str, dir: Option<&str>) -> ClickEvent {
        control(s, |el| {
            el.tag() == "button"
                && el.data("id") == Some(id)
                && el.data("action") == Some(action)
                && el.data("dir") == dir
        })
    }

    fn only_card(s: &Session<MemoryStore>, key: &str) -> String {
        let cards = s.model().board().cards(key);
        assert_eq!(cards.len(), 1);
        cards[0].id.clone()
    }

    #[test]
    fn test_init_without_columns_fails() {
        let root = Element::new("div").with_attr("id", "kanban-root");
        assert!(matches!(
            Session::init(root, MemoryStore::new()),
            Err(KanbanError::NoColumns)
        ));
    }

    #[test]
    fn test_add_via_click_focuses_new_title() {
        let mut s = session();
        let result = s.click(&column_button(&s, "todo", "add"));
        assert_eq!(result, Dispatch { changed: true, rendered: true });
        let id = only_card(&s, "todo");

        let focused = s.focused().unwrap().clone();
        let card = s.root().closest(&focused, by_class(CARD_CLASS)).unwrap();
        assert_eq!(s.root().get(&card).unwrap().data("id"), Some(id.as_str()));
    }

    #[test]
    fn test_click_on_button_child_bubbles_to_button() {
        let mut root = skeleton(&columns());
        let col = column_path(&root, "doing").unwrap();
        let add = root
            .find_within(&col, |el| el.data("action") == Some("add"))
            .unwrap();
        root.get_mut(&add)
            .unwrap()
            .push_child(Element::new("span").with_text("+"));
        let mut s = Session::init(root, MemoryStore::new()).unwrap();

        s.click(&ClickEvent { target: add.child(0) });
        assert_eq!(s.model().board().cards("doing").len(), 1);
    }

    #[test]
    fn test_move_through_columns_by_clicks() {
        let mut s = session();
        s.click(&column_button(&s, "todo", "add"));
        let id = only_card(&s, "todo");

        s.click(&card_button(&s, &id, "move", Some("right")));
        assert_eq!(only_card(&s, "doing"), id);
        s.click(&card_button(&s, &id, "move", Some("right")));
        assert_eq!(only_card(&s, "done"), id);
        // No move-right control in the last column
        assert!(s
            .root()
            .find_first(|el| el.data("id") == Some(id.as_str()) && el.data("dir") == Some("right"))
            .is_none());

        s.click(&card_button(&s, &id, "move", Some("left")));
        assert_eq!(only_card(&s, "doing"), id);
        s.click(&card_button(&s, &id, "delete", None));
        assert_eq!(s.model().board().total_cards(), 0);
    }

    #[test]
    fn test_sort_click_toggles_directive() {
        let mut s = session();
        let r = s.click(&column_button(&s, "done", "sort"));
        assert_eq!(r, Dispatch { changed: true, rendered: true });
        assert_eq!(s.model().sort_directive("done"), SortDirective::Ascending);
        let col = column_path(s.root(), "done").unwrap();
        assert_eq!(s.root().get(&col).unwrap().data("sort"), Some("asc"));
        s.click(&column_button(&s, "done", "sort"));
        assert_eq!(s.model().sort_directive("done"), SortDirective::Descending);
    }

    #[test]
    fn test_recolor_clicks() {
        let mut s = session();
        s.click(&column_button(&s, "todo", "add"));
        let id = only_card(&s, "todo");
        let writes = s.model().persistence().store().writes();

        let r = s.click(&card_button(&s, &id, "recolor", None));
        assert!(r.changed);
        let r = s.click(&column_button(&s, "todo", "recolor-column"));
        assert!(r.changed);
        assert_eq!(s.model().persistence().store().writes(), writes + 2);
    }

    #[test]
    fn test_ignored_clicks() {
        let mut s = session();
        // Column title is not a control
        let col = column_path(s.root(), "todo").unwrap();
        let title = s.root().find_within(&col, by_class("col-title")).unwrap();
        assert_eq!(s.click(&ClickEvent { target: title }), Dispatch::default());
        // Board root is outside every column
        assert_eq!(
            s.click(&ClickEvent { target: NodePath::root() }),
            Dispatch::default()
        );
        assert_eq!(s.model().persistence().store().writes(), 0);
    }

    #[test]
    fn test_unknown_action_tag_is_ignored() {
        let mut root = skeleton(&columns());
        let col = column_path(&root, "todo").unwrap();
        root.get_mut(&col).unwrap().push_child(
            Element::new("button").with_attr("data-action", "archive"),
        );
        let mut s = Session::init(root, MemoryStore::new()).unwrap();
        let target = s
            .root()
            .find_first(|el| el.data("action") == Some("archive"))
            .unwrap();
        assert_eq!(s.click(&ClickEvent { target }), Dispatch::default());
    }

    #[test]
    fn test_rename_commit_on_blur() {
        let mut s = session();
        s.click(&column_button(&s, "todo", "add"));
        let id = only_card(&s, "todo");
        let title = s.focused().unwrap().clone();

        assert!(s.edit_text(&title, "  Plan release  "));
        let r = s.blur(&BlurEvent { target: title.clone() });
        // Unsorted column: saved but not repainted
        assert_eq!(r, Dispatch { changed: true, rendered: false });
        assert_eq!(s.model().find_card(&id).unwrap().1.title, "Plan release");
        assert_eq!(s.root().get(&title).unwrap().text(), "  Plan release  ");

        // Same trimmed title: nothing written
        let writes = s.model().persistence().store().writes();
        assert_eq!(s.blur(&BlurEvent { target: title }), Dispatch::default());
        assert_eq!(s.model().persistence().store().writes(), writes);
    }

    #[test]
    fn test_rename_in_sorted_column_repaints() {
        let mut s = session();
        s.click(&column_button(&s, "todo", "add"));
        s.click(&column_button(&s, "todo", "add"));
        s.click(&column_button(&s, "todo", "sort"));

        let first_title = s.root().find_first(by_class(CARD_TITLE_CLASS)).unwrap();
        s.edit_text(&first_title, "zzz");
        let r = s.blur(&BlurEvent { target: first_title });
        assert_eq!(r, Dispatch { changed: true, rendered: true });

        let titles: Vec<String> = s
            .root()
            .find_all(by_class(CARD_TITLE_CLASS))
            .into_iter()
            .map(|p| s.root().get(&p).unwrap().text().to_string())
            .collect();
        assert_eq!(titles, vec!["New card", "zzz"]);
    }

    #[test]
    fn test_blur_outside_titles_is_ignored() {
        let mut s = session();
        assert_eq!(
            s.blur(&BlurEvent { target: NodePath::root() }),
            Dispatch::default()
        );
        assert!(!s.edit_text(&NodePath::root(), "x"));
    }

    #[test]
    fn test_stale_card_action_is_noop() {
        let mut s = session();
        let r = s.dispatch(Action::Move {
            card_id: "gone".into(),
            direction: Direction::Right,
        });
        assert_eq!(r, Dispatch::default());
        assert_eq!(
            s.dispatch(Action::Delete { card_id: "gone".into() }),
            Dispatch::default()
        );
        assert_eq!(
            s.dispatch(Action::Add { column: "nope".into() }),
            Dispatch::default()
        );
    }

    #[test]
    fn test_state_survives_new_session() {
        let mut s = session();
        s.click(&column_button(&s, "doing", "add"));
        let id = only_card(&s, "doing");
        assert_eq!(s.reload_persisted(), *s.model().board());
        assert!(s.persist());

        let store = s.into_store();
        let restored = Session::init(skeleton(&columns()), store).unwrap();
        assert_eq!(only_card(&restored, "doing"), id);
        assert!(restored.root().find_first(by_data("id", &id)).is_some());
    }
}
