use crate::fuzzy;
use crate::model::Board;
use crate::ops;
use crate::output::OutputLog;
use crate::remote::{self, RemoteConfig};
use crate::storage;
use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Destroy,
    Deadline,
    Add,
    Move,
    Remove,
    Priority,
    Rename,
    Clear,
    Save,
    Exit,
    Help,
    Swap,
    Edit,
}

const VOCABULARY: &[(&str, Op)] = &[
    ("create", Op::Create),
    ("c", Op::Create),
    ("destroy", Op::Destroy),
    ("deadline", Op::Deadline),
    ("due", Op::Deadline),
    ("add", Op::Add),
    ("move", Op::Move),
    ("mv", Op::Move),
    ("remove", Op::Remove),
    ("rm", Op::Remove),
    ("priority", Op::Priority),
    ("pr", Op::Priority),
    ("rename", Op::Rename),
    ("clear", Op::Clear),
    ("cl", Op::Clear),
    ("save", Op::Save),
    ("exit", Op::Exit),
    ("help", Op::Help),
    ("swap", Op::Swap),
    ("edit", Op::Edit),
];

pub fn resolve_command(token: &str) -> Option<Op> {
    let name = fuzzy::best_match(
        token,
        VOCABULARY.iter().map(|(name, _)| *name),
        fuzzy::DEFAULT_THRESHOLD,
    )?;
    VOCABULARY
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, op)| *op)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Engine {
    pub board: Board,
    pub log: OutputLog,
    path: PathBuf,
    remote: Option<RemoteConfig>,
    upload_tx: mpsc::Sender<String>,
    uploads: mpsc::Receiver<String>,
}

impl Engine {
    pub fn new(
        board: Board,
        log: OutputLog,
        path: PathBuf,
        remote: Option<RemoteConfig>,
    ) -> Self {
        let (upload_tx, uploads) = mpsc::channel();
        Engine {
            board,
            log,
            path,
            remote,
            upload_tx,
            uploads,
        }
    }

    pub fn execute(&mut self, raw: &str) -> Flow {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            self.log.push("No command entered.");
            return Flow::Continue;
        };
        let Some(op) = resolve_command(first) else {
            self.log.push(format!("Command not recognized: {first}"));
            return Flow::Continue;
        };
        self.log.push_bold(raw.trim());
        let flow = self.dispatch(op, &tokens[1..]);
        self.persist();
        flow
    }

    fn dispatch(&mut self, op: Op, params: &[&str]) -> Flow {
        let board = &mut self.board;
        let result = match op {
            Op::Create => ops::create_column(board, params),
            Op::Destroy => ops::destroy_column(board, params),
            Op::Deadline => ops::set_deadline(board, params),
            Op::Add => ops::add_task(board, params),
            Op::Move => ops::move_task(board, params),
            Op::Remove => ops::remove_task(board, params),
            Op::Priority => ops::prioritize_task(board, params),
            Op::Rename => ops::rename_column(board, params),
            Op::Swap => ops::swap_columns(board, params),
            Op::Edit => ops::edit_task(board, params),
            Op::Clear => {
                self.log.clear();
                return Flow::Continue;
            }
            Op::Save => Ok(format!("Board saved to {}.", self.path.display())),
            Op::Help => Ok(HELP.trim_end().to_string()),
            Op::Exit => return Flow::Exit,
        };
        match result {
            Ok(message) => self.log.push(message),
            Err(err) => self.log.push(err.to_string()),
        }
        Flow::Continue
    }

    // Unconditional after every dispatch. A failed write is reported but the
    // in-memory board is left as-is; the remote upload is fire-and-forget.
    fn persist(&mut self) {
        match storage::save(&self.path, &self.board, self.remote.is_some()) {
            Ok(payload) => {
                if let Some(config) = &self.remote {
                    let filename = self
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "board.json".to_string());
                    remote::spawn_upload(config.clone(), filename, payload, self.upload_tx.clone());
                }
            }
            Err(err) => self.log.push(format!("Failed to save board: {err:#}")),
        }
    }

    pub fn drain_uploads(&mut self) {
        while let Ok(message) = self.uploads.try_recv() {
            self.log.push(message);
        }
    }
}

const HELP: &str = "\
Commands:

General:
- help: show this message
- save: write the board to its .json file
- clear: clear the output history
- exit: quit

Board management:
- create <column name>: create a new column
- destroy <column name>: delete a column and its tasks
- rename <old column name> <new column name>: rename a column
- swap <column1> <column2>: exchange the contents of two columns

Task management:
- add <description> to <column name>: add a new task
- move <task id> <column name>: move a task to another column
- remove <task id>: delete a task
- edit <task id> <property> <new value>: edit description or deadline
- deadline <task id> <when>: set a deadline (\"tomorrow at 7pm\" works)
- priority <task id> <level>: set priority to low, medium or high
";

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn engine_at(dir: &std::path::Path) -> Engine {
        let mut board = Board::new();
        board.create_column("todo").unwrap();
        board.create_column("done").unwrap();
        Engine::new(board, OutputLog::default(), dir.join("test.json"), None)
    }

    #[test]
    fn resolves_exact_names_and_aliases() {
        assert_eq!(resolve_command("create"), Some(Op::Create));
        assert_eq!(resolve_command("mv"), Some(Op::Move));
        assert_eq!(resolve_command("due"), Some(Op::Deadline));
        assert_eq!(resolve_command("pr"), Some(Op::Priority));
    }

    #[test]
    fn resolves_near_misses_fuzzily() {
        // "creates" vs "create": one insertion over 13 chars, score 92.
        assert_eq!(resolve_command("creates"), Some(Op::Create));
        assert_eq!(resolve_command("deadlines"), Some(Op::Deadline));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(resolve_command("frobnicate"), None);
    }

    #[test]
    fn empty_input_logs_and_mutates_nothing() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        assert_eq!(engine.execute("   "), Flow::Continue);
        assert_eq!(engine.log.last().unwrap().text, "No command entered.");
        // Nothing dispatched, nothing persisted.
        assert!(!dir.path().join("test.json").exists());
    }

    #[test]
    fn unrecognized_command_logs_and_does_not_persist() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        engine.execute("frobnicate the widgets");
        assert!(engine
            .log
            .last()
            .unwrap()
            .text
            .starts_with("Command not recognized"));
        assert!(!dir.path().join("test.json").exists());
    }

    #[test]
    fn successful_command_logs_header_then_result_and_persists() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        engine.execute("add fix bug to todo");
        let entries = engine.log.tail(10);
        assert_eq!(entries[0].text, "add fix bug to todo");
        assert!(entries[0].bold);
        assert!(entries[1].text.contains("added to column 'todo'"));
        assert!(dir.path().join("test.json").exists());
    }

    #[test]
    fn failed_command_still_persists() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        engine.execute("move zz done");
        assert!(engine.log.last().unwrap().text.contains("not found"));
        assert!(dir.path().join("test.json").exists());
    }

    #[test]
    fn exit_signals_the_loop_after_a_final_save() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        assert_eq!(engine.execute("exit"), Flow::Exit);
        assert!(dir.path().join("test.json").exists());
    }

    #[test]
    fn clear_empties_the_log() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        engine.execute("create backlog");
        assert!(!engine.log.is_empty());
        engine.execute("clear");
        assert!(engine.log.is_empty());
    }

    #[test]
    fn remaining_tokens_pass_through_verbatim() {
        let dir = tempdir().unwrap();
        let mut engine = engine_at(dir.path());
        engine.execute("create code  review");
        assert!(engine.board.find_column_index("code review").is_some());
    }
}
