/// User actions on the board.
///
/// Controls in the rendered markup carry a `data-action` tag plus the payload
/// the action needs (`data-id`, `data-dir`). Resolution turns a control into
/// an `Action`; everything after that point matches on the enum.
use crate::dom::Element;
use crate::types::Direction;

/// `data-action` values understood by the board.
pub mod tags {
    pub const ADD: &str = "add";
    pub const SORT: &str = "sort";
    pub const RECOLOR_COLUMN: &str = "recolor-column";
    pub const MOVE: &str = "move";
    pub const RECOLOR: &str = "recolor";
    pub const DELETE: &str = "delete";

    /// Older markup used these names for the recolor controls.
    pub const LEGACY_RECOLOR_COLUMN: &str = "color-column";
    pub const LEGACY_RECOLOR: &str = "color-card";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { column: String },
    Sort { column: String },
    RecolorColumn { column: String },
    Move { card_id: String, direction: Direction },
    Recolor { card_id: String },
    Delete { card_id: String },
    Rename { card_id: String, title: String },
}

impl Action {
    /// Resolve a clicked control inside `column_key`'s column.
    ///
    /// Returns `None` for unknown tags and for controls missing their payload.
    pub fn from_control(control: &Element, column_key: &str) -> Option<Action> {
        let tag = control.data("action")?;
        let column = || column_key.to_string();
        let card_id = || control.data("id").filter(|id| !id.is_empty()).map(str::to_string);

        match tag {
            tags::ADD => Some(Action::Add { column: column() }),
            tags::SORT => Some(Action::Sort { column: column() }),
            tags::RECOLOR_COLUMN | tags::LEGACY_RECOLOR_COLUMN => {
                Some(Action::RecolorColumn { column: column() })
            }
            tags::MOVE => {
                let direction = control.data("dir")?.parse::<Direction>().ok()?;
                Some(Action::Move {
                    card_id: card_id()?,
                    direction,
                })
            }
            tags::RECOLOR | tags::LEGACY_RECOLOR => Some(Action::Recolor { card_id: card_id()? }),
            tags::DELETE => Some(Action::Delete { card_id: card_id()? }),
            _ => None,
        }
    }
}
