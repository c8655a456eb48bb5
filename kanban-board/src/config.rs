/// Configuration for the board host.
/// Reads config.json from ~/.config/kanban-board/config.json (or platform equivalent).
use kanban_core::types::KanbanColumn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_columns")]
    pub columns: Vec<KanbanColumn>,
    /// Directory holding the persisted board.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Where to write the rendered board after every command.
    #[serde(default)]
    pub html_output: Option<PathBuf>,
}

fn default_columns() -> Vec<KanbanColumn> {
    vec![
        KanbanColumn::new("todo", "To do"),
        KanbanColumn::new("doing", "Doing"),
        KanbanColumn::new("done", "Done"),
    ]
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            data_dir: None,
            html_output: None,
        }
    }
}

/// Default config path: ~/.config/kanban-board/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban-board")
        .join("config.json")
}

/// Default board storage: ~/.local/share/kanban-board
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban-board")
}

/// Load config from path. Returns default if the file doesn't exist or can't be parsed.
pub fn load_config(path: &Path) -> BoardConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("[kanban.board] Failed to parse config {}: {}", path.display(), e);
            BoardConfig::default()
        }),
        Err(_) => {
            log::info!("[kanban.board] No config at {}, using defaults", path.display());
            BoardConfig::default()
        }
    }
}
