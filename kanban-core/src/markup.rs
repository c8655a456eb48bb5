/// Host markup contract.
///
/// The host page provides a `#kanban-root` container with one `.column`
/// element per column. Each column carries `data-key`, a `.col-title`, a
/// `.count-badge`, a `.cards` container and column-level buttons tagged with
/// `data-action`.
use std::collections::BTreeSet;

use crate::action::tags;
use crate::dom::{by_class, Element, NodePath};
use crate::error::{KanbanError, Result};
use crate::types::KanbanColumn;

pub const ROOT_ID: &str = "kanban-root";
pub const COLUMN_CLASS: &str = "column";
pub const COLUMN_TITLE_CLASS: &str = "col-title";
pub const COUNT_BADGE_CLASS: &str = "count-badge";
pub const CARDS_CLASS: &str = "cards";

/// Path of the `#kanban-root` container, which may be `root` itself.
pub fn board_root(root: &Element) -> Option<NodePath> {
    root.find_first(|el| el.attr("id") == Some(ROOT_ID))
}

/// Path of the column element for `key`.
pub fn column_path(root: &Element, key: &str) -> Option<NodePath> {
    let scope = board_root(root)?;
    root.find_within(&scope, |el| {
        el.has_class(COLUMN_CLASS) && el.data("key") == Some(key)
    })
}

/// Read the column sequence declared by the host markup.
///
/// Columns without `data-key` and repeated keys are skipped. Finding no usable
/// column is fatal for the board.
pub fn discover_columns(root: &Element) -> Result<Vec<KanbanColumn>> {
    let scope = board_root(root).ok_or(KanbanError::NoColumns)?;
    let Some(container) = root.get(&scope) else {
        return Err(KanbanError::NoColumns);
    };

    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();
    for rel in container.find_all(by_class(COLUMN_CLASS)) {
        let Some(el) = container.get(&rel) else {
            continue;
        };
        let Some(key) = el.data("key").filter(|k| !k.is_empty()) else {
            log::warn!("[kanban.markup] Found a column without data-key, skipping it");
            continue;
        };
        if !seen.insert(key.to_string()) {
            log::warn!("[kanban.markup] Duplicate column key {}, keeping the first", key);
            continue;
        }
        let title = el
            .find_first(by_class(COLUMN_TITLE_CLASS))
            .and_then(|p| el.get(&p))
            .map(|t| t.text_content().trim().to_string())
            .unwrap_or_else(|| key.to_string());
        columns.push(KanbanColumn::new(key, title));
    }

    if columns.is_empty() {
        log::error!("[kanban.markup] No columns found in host markup, the board cannot start");
        return Err(KanbanError::NoColumns);
    }
    Ok(columns)
}

/// Build host markup for a column list.
pub fn skeleton(columns: &[KanbanColumn]) -> Element {
    columns.iter().fold(
        Element::new("div").with_attr("id", ROOT_ID),
        |root, column| root.with_child(column_section(column)),
    )
}

fn column_section(column: &KanbanColumn) -> Element {
    let header = Element::new("header")
        .with_class("col-header")
        .with_child(
            Element::new("h2")
                .with_class(COLUMN_TITLE_CLASS)
                .with_text(column.title.clone()),
        )
        .with_child(
            Element::new("span")
                .with_class(COUNT_BADGE_CLASS)
                .with_text("0"),
        );

    let toolbar = Element::new("div")
        .with_class("col-actions")
        .with_child(toolbar_button(tags::ADD, "+", "Add card"))
        .with_child(toolbar_button(tags::SORT, "⇅", "Sort by title"))
        .with_child(toolbar_button(tags::RECOLOR_COLUMN, "🎨", "Recolor column"));

    Element::new("section")
        .with_class(COLUMN_CLASS)
        .with_attr("data-key", column.key.clone())
        .with_child(header)
        .with_child(toolbar)
        .with_child(Element::new("div").with_class(CARDS_CLASS))
}

fn toolbar_button(action: &str, label: &str, tooltip: &str) -> Element {
    Element::new("button")
        .with_attr("data-action", action)
        .with_attr("title", tooltip)
        .with_text(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_columns() -> Vec<KanbanColumn> {
        vec![
            KanbanColumn::new("todo", "To do"),
            KanbanColumn::new("doing", "Doing"),
            KanbanColumn::new("done", "Done"),
        ]
    }

    #[test]
    fn test_skeleton_roundtrips_through_discovery() {
        let root = skeleton(&three_columns());
        assert_eq!(discover_columns(&root).unwrap(), three_columns());
    }

    #[test]
    fn test_root_nested_in_page() {
        let page = Element::new("body")
            .with_child(Element::new("nav"))
            .with_child(skeleton(&three_columns()));
        assert_eq!(discover_columns(&page).unwrap().len(), 3);
        assert_eq!(
            column_path(&page, "doing"),
            Some(NodePath::from(vec![1, 1]))
        );
    }

    #[test]
    fn test_columns_without_key_are_skipped() {
        let root = skeleton(&three_columns())
            .with_child(Element::new("section").with_class(COLUMN_CLASS));
        let columns = discover_columns(&root).unwrap();
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let mut columns = three_columns();
        columns.push(KanbanColumn::new("todo", "Again"));
        let discovered = discover_columns(&skeleton(&columns)).unwrap();
        assert_eq!(discovered, three_columns());
    }

    #[test]
    fn test_missing_title_falls_back_to_key() {
        let root = Element::new("div").with_attr("id", ROOT_ID).with_child(
            Element::new("section")
                .with_class(COLUMN_CLASS)
                .with_attr("data-key", "inbox"),
        );
        let columns = discover_columns(&root).unwrap();
        assert_eq!(columns, vec![KanbanColumn::new("inbox", "inbox")]);
    }

    #[test]
    fn test_no_columns_is_fatal() {
        let empty = Element::new("div").with_attr("id", ROOT_ID);
        assert!(matches!(discover_columns(&empty), Err(KanbanError::NoColumns)));

        let no_root = Element::new("div");
        assert!(matches!(discover_columns(&no_root), Err(KanbanError::NoColumns)));

        let keyless = Element::new("div")
            .with_attr("id", ROOT_ID)
            .with_child(Element::new("section").with_class(COLUMN_CLASS));
        assert!(matches!(discover_columns(&keyless), Err(KanbanError::NoColumns)));
    }
}
