/// Full-rebuild renderer.
///
/// Each call updates every column's count badge and replaces the whole
/// content of its `.cards` container from the model. No diffing: the same
/// model and sort directives always produce the same tree.
use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::action::tags;
use crate::dom::{by_class, Element};
use crate::markup::{column_path, CARDS_CLASS, COUNT_BADGE_CLASS};
use crate::types::{Direction, KanbanBoard, KanbanCard, KanbanColumn, SortDirective, SortDirectives};

pub const CARD_CLASS: &str = "card";
pub const CARD_TITLE_CLASS: &str = "card-title";

/// Repaint every column of `columns` inside `root`.
pub fn render(
    root: &mut Element,
    board: &KanbanBoard,
    columns: &[KanbanColumn],
    sort: &SortDirectives,
) {
    let last = columns.len().saturating_sub(1);
    for (index, column) in columns.iter().enumerate() {
        let Some(path) = column_path(root, &column.key) else {
            log::warn!("[kanban.render] No element for column {}", column.key);
            continue;
        };
        let Some(column_el) = root.get_mut(&path) else {
            continue;
        };
        let directive = sort.get(&column.key);
        let cards = board.cards(&column.key);

        match directive {
            SortDirective::Unset => {
                column_el.remove_attr("data-sort");
            }
            SortDirective::Ascending => column_el.set_attr("data-sort", "asc"),
            SortDirective::Descending => column_el.set_attr("data-sort", "desc"),
        }

        if let Some(badge) = column_el.find_first(by_class(COUNT_BADGE_CLASS)) {
            if let Some(badge) = column_el.get_mut(&badge) {
                badge.set_text(cards.len().to_string());
            }
        }

        let Some(wrap) = column_el.find_first(by_class(CARDS_CLASS)) else {
            log::warn!("[kanban.render] Column {} has no card container", column.key);
            continue;
        };
        let Some(wrap) = column_el.get_mut(&wrap) else {
            continue;
        };
        wrap.clear_children();
        for card in display_order(cards, directive) {
            wrap.push_child(card_element(card, index > 0, index < last));
        }
    }
}

/// Cards in the order they are shown for `directive`. Model order when unset.
pub fn display_order(cards: &[KanbanCard], directive: SortDirective) -> Vec<&KanbanCard> {
    let mut shown: Vec<&KanbanCard> = cards.iter().collect();
    match directive {
        SortDirective::Unset => {}
        SortDirective::Ascending => shown.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortDirective::Descending => shown.sort_by(|a, b| compare_titles(&b.title, &a.title)),
    }
    shown
}

/// Title ordering in the manner of a locale collation: base letters first,
/// then accents (unaccented first), then case (lowercase first), with the
/// raw strings as the last tie break so the order is total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accent_key(s: &str) -> String {
    s.nfkd().flat_map(char::to_lowercase).collect()
}

fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

fn card_element(card: &KanbanCard, can_move_left: bool, can_move_right: bool) -> Element {
    let title = Element::new("div")
        .with_class(CARD_TITLE_CLASS)
        .with_attr("contenteditable", "true")
        .with_attr("spellcheck", "false")
        .with_text(card.title.clone());

    let mut controls = Element::new("div").with_class("card-controls");
    if can_move_left {
        controls.push_child(move_button(card, Direction::Left));
    }
    if can_move_right {
        controls.push_child(move_button(card, Direction::Right));
    }
    controls.push_child(card_button(card, tags::RECOLOR, "🎨", "Recolor card"));
    controls.push_child(card_button(card, tags::DELETE, "✕", "Delete"));

    Element::new("div")
        .with_class(CARD_CLASS)
        .with_attr("data-id", card.id.clone())
        .with_attr("style", format!("background-color: {}", card.color))
        .with_child(
            Element::new("div")
                .with_class("card-top")
                .with_child(title)
                .with_child(controls),
        )
}

fn move_button(card: &KanbanCard, direction: Direction) -> Element {
    let (label, tooltip) = match direction {
        Direction::Left => ("←", "Move left"),
        Direction::Right => ("→", "Move right"),
    };
    card_button(card, tags::MOVE, label, tooltip).with_attr("data-dir", direction.as_str())
}

fn card_button(card: &KanbanCard, action: &str, label: &str, tooltip: &str) -> Element {
    Element::new("button")
        .with_attr("data-action", action)
        .with_attr("data-id", card.id.clone())
        .with_attr("title", tooltip)
        .with_text(label)
}
