/// Writes the rendered board out as a standalone HTML page.
use std::fs;
use std::io::Write;
use std::path::Path;

use kanban_core::dom::Element;

/// Wrap the board markup in a minimal document.
pub fn board_document(root: &Element) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Kanban</title></head>\n<body>{}</body>\n</html>\n",
        root.to_html()
    )
}

/// Atomic write: write to .tmp, fsync, rename.
pub fn write_board_html(path: &Path, root: &Element) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("html.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(board_document(root).as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::markup::skeleton;
    use kanban_core::types::KanbanColumn;
    use tempfile::TempDir;

    #[test]
    fn test_write_board_html() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("board.html");
        let root = skeleton(&[KanbanColumn::new("todo", "To do")]);

        write_board_html(&path, &root).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("id=\"kanban-root\""));
        assert!(html.contains("data-key=\"todo\""));
        assert!(!path.with_extension("html.tmp").exists());
    }
}
