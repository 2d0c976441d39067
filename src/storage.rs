use crate::model::{Board, Task};
use crate::output::OutputLog;
use crate::render;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BoardFile {
    #[serde(default)]
    data: IndexMap<String, Vec<Task>>,
    #[serde(default)]
    remote: bool,
    #[serde(default)]
    board_visual: String,
}

pub fn normalize_path(name: &str) -> PathBuf {
    if name.to_lowercase().ends_with(".json") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.json"))
    }
}

// Writes the full document (structured data plus the derived HTML rendering)
// via temp file and rename, and hands back the serialized payload so a remote
// upload can reuse it without re-serializing.
pub fn save(path: &Path, board: &Board, remote: bool) -> Result<String> {
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    let file = BoardFile {
        data: board.columns.clone(),
        remote,
        board_visual: render::html_table(&title, board),
    };
    let payload = serde_json::to_string_pretty(&file).context("serializing board")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &payload).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(payload)
}

pub fn load(path: &Path, log: &mut OutputLog) -> Result<Board> {
    if !path.exists() {
        log.push(format!(
            "No existing {} found. Starting with a new board.",
            path.display()
        ));
        return Ok(Board::new());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: BoardFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    log.push(format!("Board loaded from {}.", path.display()));
    Ok(Board { columns: file.data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_board() -> Board {
        let mut board = Board::new();
        board.create_column("todo").unwrap();
        board.create_column("Done").unwrap();
        let stamp = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        board
            .add_task(
                "todo",
                Task {
                    id: "a".into(),
                    description: "fix bug".into(),
                    timestamp: stamp,
                    priority: Priority::High,
                    deadline: Some(stamp + chrono::Duration::days(3)),
                },
            )
            .unwrap();
        board
            .add_task(
                "Done",
                Task {
                    id: "b".into(),
                    description: "ship release".into(),
                    timestamp: stamp,
                    priority: Priority::Low,
                    deadline: None,
                },
            )
            .unwrap();
        board
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        let board = sample_board();
        save(&path, &board, false).unwrap();

        let mut log = OutputLog::default();
        let loaded = load(&path, &mut log).unwrap();
        let names: Vec<&str> = loaded.columns.keys().map(String::as_str).collect();
        assert_eq!(names, ["todo", "Done"]);
        let (column, task) = loaded.find_task("a").unwrap();
        assert_eq!(column, "todo");
        assert_eq!(task.description, "fix bug");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.deadline, board.columns["todo"][0].deadline);
        let (_, done_task) = loaded.find_task("b").unwrap();
        assert_eq!(done_task.deadline, None);
    }

    #[test]
    fn saved_document_has_expected_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        let payload = save(&path, &sample_board(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert!(value["data"]["todo"].is_array());
        assert_eq!(value["remote"], true);
        assert!(value["board_visual"].as_str().unwrap().contains("<table"));
        let task = &value["data"]["todo"][0];
        assert_eq!(task["id"], "a");
        assert_eq!(task["priority"], "high");
        assert_eq!(task["timestamp"], "2024-03-01 09:00:00");
        // Absent deadline is omitted entirely.
        assert!(value["data"]["Done"][0].get("deadline").is_none());
    }

    #[test]
    fn load_missing_file_starts_empty_and_logs() {
        let dir = tempdir().unwrap();
        let mut log = OutputLog::default();
        let board = load(&dir.path().join("nope.json"), &mut log).unwrap();
        assert!(board.columns.is_empty());
        assert!(log.last().unwrap().text.contains("Starting with a new board"));
    }

    #[test]
    fn load_tolerates_missing_data_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.json");
        fs::write(&path, "{}").unwrap();
        let mut log = OutputLog::default();
        let board = load(&path, &mut log).unwrap();
        assert!(board.columns.is_empty());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        save(&path, &sample_board(), false).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("board.json.tmp").exists());
    }

    #[test]
    fn normalize_path_appends_json_suffix() {
        assert_eq!(normalize_path("kanban"), PathBuf::from("kanban.json"));
        assert_eq!(normalize_path("kanban.json"), PathBuf::from("kanban.json"));
        assert_eq!(normalize_path("KANBAN.JSON"), PathBuf::from("KANBAN.JSON"));
    }
}
