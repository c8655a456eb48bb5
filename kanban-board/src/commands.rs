/// Line commands for driving the board from a terminal.
///
/// Every command is carried out the way a user would in the page: by
/// locating the matching control in the rendered tree and clicking it, or
/// by editing a title surface and blurring it.
use std::fmt::Write as _;
use std::str::FromStr;

use kanban_core::action::tags;
use kanban_core::dom::{by_class, by_data, Element, NodePath};
use kanban_core::markup::column_path;
use kanban_core::render::{CARD_CLASS, CARD_TITLE_CLASS};
use kanban_core::session::{BlurEvent, ClickEvent, Dispatch, Session};
use kanban_core::storage::KeyValueStore;
use kanban_core::types::{Direction, SortDirective};

pub const HELP: &str = "\
Commands:
  add <column>                 add a card
  sort <column>                toggle title sort
  recolor-column <column>      recolor every card in a column
  move <card-id> <left|right>  move a card to the neighbouring column
  recolor <card-id>            recolor a card
  delete <card-id>             delete a card
  rename <card-id> <title...>  change a card's title
  show                         print the board
  help                         print this help
  quit                         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Sort(String),
    RecolorColumn(String),
    Move { card_id: String, direction: Direction },
    Recolor(String),
    Delete(String),
    Rename { card_id: String, title: String },
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Missing {0}")]
    MissingArgument(&'static str),

    #[error("Direction must be left or right, got {0}")]
    BadDirection(String),

    #[error("No {0} control on the board")]
    NoControl(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();
        let mut arg = |what: &'static str| {
            args.next()
                .map(str::to_string)
                .ok_or(CommandError::MissingArgument(what))
        };

        match name {
            "" => Err(CommandError::Empty),
            "add" => Ok(Command::Add(arg("column")?)),
            "sort" => Ok(Command::Sort(arg("column")?)),
            "recolor-column" => Ok(Command::RecolorColumn(arg("column")?)),
            "move" => {
                let card_id = arg("card id")?;
                let dir = arg("direction")?;
                let direction = dir.parse().map_err(|_| CommandError::BadDirection(dir))?;
                Ok(Command::Move { card_id, direction })
            }
            "recolor" => Ok(Command::Recolor(arg("card id")?)),
            "delete" => Ok(Command::Delete(arg("card id")?)),
            "rename" => {
                let card_id = arg("card id")?;
                let title = rest[card_id.len()..].trim().to_string();
                Ok(Command::Rename { card_id, title })
            }
            "show" => Ok(Command::Show),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Perform a board command through the rendered controls.
///
/// `Show`, `Help` and `Quit` are handled by the caller and do nothing here.
pub fn apply<S: KeyValueStore>(
    session: &mut Session<S>,
    command: &Command,
) -> Result<Dispatch, CommandError> {
    let root = session.root();
    let target = match command {
        Command::Add(column) => column_control(root, column, tags::ADD)?,
        Command::Sort(column) => column_control(root, column, tags::SORT)?,
        Command::RecolorColumn(column) => column_control(root, column, tags::RECOLOR_COLUMN)?,
        Command::Move { card_id, direction } => {
            card_control(root, card_id, tags::MOVE, Some(direction.as_str()))?
        }
        Command::Recolor(card_id) => card_control(root, card_id, tags::RECOLOR, None)?,
        Command::Delete(card_id) => card_control(root, card_id, tags::DELETE, None)?,
        Command::Rename { card_id, title } => {
            let surface = title_surface(root, card_id)
                .ok_or_else(|| CommandError::NoControl(format!("title for card {}", card_id)))?;
            session.edit_text(&surface, title);
            return Ok(session.blur(&BlurEvent { target: surface }));
        }
        Command::Show | Command::Help | Command::Quit => return Ok(Dispatch::default()),
    };
    Ok(session.click(&ClickEvent { target }))
}

fn column_control(root: &Element, column: &str, action: &str) -> Result<NodePath, CommandError> {
    column_path(root, column)
        .and_then(|col| root.find_within(&col, by_data("action", action)))
        .ok_or_else(|| CommandError::NoControl(format!("{} for column {}", action, column)))
}

fn card_control(
    root: &Element,
    card_id: &str,
    action: &str,
    dir: Option<&str>,
) -> Result<NodePath, CommandError> {
    root.find_first(|el| {
        el.tag() == "button"
            && el.data("action") == Some(action)
            && el.data("id") == Some(card_id)
            && el.data("dir") == dir
    })
    .ok_or_else(|| {
        let what = match dir {
            Some(dir) => format!("{} {}", action, dir),
            None => action.to_string(),
        };
        CommandError::NoControl(format!("{} for card {}", what, card_id))
    })
}

fn title_surface(root: &Element, card_id: &str) -> Option<NodePath> {
    let card = root.find_first(|el| el.has_class(CARD_CLASS) && el.data("id") == Some(card_id))?;
    root.find_within(&card, by_class(CARD_TITLE_CLASS))
}

/// Text view of the board as currently rendered.
pub fn summary<S: KeyValueStore>(session: &Session<S>) -> String {
    let root = session.root();
    let model = session.model();
    let mut out = String::new();

    for column in model.columns() {
        let marker = match model.sort_directive(&column.key) {
            SortDirective::Unset => "",
            SortDirective::Ascending => " [A-Z]",
            SortDirective::Descending => " [Z-A]",
        };
        let _ = writeln!(
            out,
            "{} ({}) [{}]{}",
            column.title,
            model.board().cards(&column.key).len(),
            column.key,
            marker
        );

        let Some(col) = column_path(root, &column.key) else {
            continue;
        };
        let Some(col_el) = root.get(&col) else {
            continue;
        };
        for card_path in col_el.find_all(by_class(CARD_CLASS)) {
            let Some(card) = col_el.get(&card_path) else {
                continue;
            };
            let title = card
                .find_first(by_class(CARD_TITLE_CLASS))
                .and_then(|p| card.get(&p))
                .map(Element::text)
                .unwrap_or("");
            let _ = writeln!(out, "  {}  {}", card.data("id").unwrap_or("?"), title);
        }
    }
    out
}
