use crate::dates;
use crate::fuzzy;
use crate::model::{Board, BoardError, Priority, Task, TIME_FORMAT};
use chrono::Local;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum OpError {
    #[error("insufficient parameters. Usage: {0}")]
    Usage(&'static str),
    #[error("column '{0}' does not exist")]
    ColumnNotFound(String),
    #[error("a column named '{0}' already exists")]
    ColumnExists(String),
    #[error("task with id '{0}' not found")]
    TaskNotFound(String),
    #[error("column name not found or invalid")]
    ColumnUnresolved,
    #[error("target column not found or invalid: {0}")]
    TargetUnresolved(String),
    #[error("no task description provided")]
    EmptyDescription,
    #[error("cannot edit '{0}'; editable properties: description, deadline")]
    UneditableProperty(String),
    #[error("invalid priority level '{0}'; choose from high, medium, low")]
    InvalidPriority(String),
    #[error("invalid deadline format; provide a valid date")]
    InvalidDeadline,
}

impl From<BoardError> for OpError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::ColumnNotFound(name) => OpError::ColumnNotFound(name),
            BoardError::ColumnExists(name) => OpError::ColumnExists(name),
            BoardError::TaskNotFound(id) => OpError::TaskNotFound(id),
        }
    }
}

pub type OpResult = Result<String, OpError>;

pub fn create_column(board: &mut Board, params: &[&str]) -> OpResult {
    if params.is_empty() {
        return Err(OpError::Usage("create <column name>"));
    }
    let name = params.join(" ");
    board.create_column(&name)?;
    Ok(format!("Column '{name}' added."))
}

pub fn destroy_column(board: &mut Board, params: &[&str]) -> OpResult {
    if params.is_empty() {
        return Err(OpError::Usage("destroy <column name>"));
    }
    let name = params.join(" ");
    let removed = board.destroy_column(&name)?;
    Ok(format!("Column '{removed}' removed."))
}

pub fn rename_column(board: &mut Board, params: &[&str]) -> OpResult {
    if params.len() < 2 {
        return Err(OpError::Usage("rename <old column name> <new column name>"));
    }
    // Longest token prefix naming an existing column is the old name; what
    // remains is the new one.
    let (old, consumed) = match_column_prefix(board, params).ok_or(OpError::ColumnUnresolved)?;
    if consumed == params.len() {
        return Err(OpError::Usage("rename <old column name> <new column name>"));
    }
    let new = params[consumed..].join(" ");
    board.rename_column(&old, &new)?;
    Ok(format!("Column '{old}' renamed to '{new}'."))
}

pub fn swap_columns(board: &mut Board, params: &[&str]) -> OpResult {
    if params.len() < 2 {
        return Err(OpError::Usage("swap <column1> <column2>"));
    }
    let (first, consumed) = match_column_prefix(board, params).ok_or(OpError::ColumnUnresolved)?;
    let rest = &params[consumed..];
    let (second, rest_consumed) =
        match_column_prefix(board, rest).ok_or_else(|| OpError::ColumnNotFound(rest.join(" ")))?;
    if rest_consumed != rest.len() {
        return Err(OpError::ColumnNotFound(rest.join(" ")));
    }
    board.swap_columns(&first, &second)?;
    Ok(format!("Columns '{first}' and '{second}' have been swapped."))
}

pub fn add_task(board: &mut Board, params: &[&str]) -> OpResult {
    if params.is_empty() {
        return Err(OpError::EmptyDescription);
    }
    let (column, to_index) = find_target_column(board, params).ok_or(OpError::ColumnUnresolved)?;
    let description = params[..to_index].join(" ");
    if description.is_empty() {
        return Err(OpError::EmptyDescription);
    }
    let task = Task {
        id: board.generate_unique_id(),
        description,
        timestamp: Local::now().naive_local(),
        priority: Priority::default(),
        deadline: None,
    };
    let id = task.id.clone();
    board.add_task(&column, task)?;
    Ok(format!("Task '{id}' added to column '{column}'."))
}

pub fn move_task(board: &mut Board, params: &[&str]) -> OpResult {
    if params.len() < 2 {
        return Err(OpError::Usage("move <task id> <column name>"));
    }
    let id = params[0];
    if board.find_task(id).is_none() {
        return Err(OpError::TaskNotFound(id.to_string()));
    }
    let target_text = params[1..].join(" ");
    let dest = fuzzy::best_match(
        &target_text,
        board.columns.keys().map(String::as_str),
        fuzzy::DEFAULT_THRESHOLD,
    )
    .map(str::to_string)
    .ok_or_else(|| OpError::TargetUnresolved(target_text.clone()))?;
    board.move_task(id, &dest)?;
    Ok(format!("Task '{id}' moved to '{dest}'."))
}

pub fn remove_task(board: &mut Board, params: &[&str]) -> OpResult {
    if params.is_empty() {
        return Err(OpError::Usage("remove <task id>"));
    }
    let id = params[0];
    let column = board.remove_task(id)?;
    Ok(format!("Task '{id}' removed from '{column}'."))
}

pub fn edit_task(board: &mut Board, params: &[&str]) -> OpResult {
    if params.len() < 3 {
        return Err(OpError::Usage("edit <task id> <property> <new value>"));
    }
    let id = params[0];
    match params[1].to_ascii_lowercase().as_str() {
        "deadline" | "due" => {
            let mut delegated = vec![id];
            delegated.extend_from_slice(&params[2..]);
            set_deadline(board, &delegated)
        }
        "description" => {
            let value = params[2..].join(" ");
            let task = board
                .find_task_mut(id)
                .ok_or_else(|| OpError::TaskNotFound(id.to_string()))?;
            task.description = value.clone();
            Ok(format!("Task '{id}' updated: description set to '{value}'."))
        }
        other => Err(OpError::UneditableProperty(other.to_string())),
    }
}

pub fn set_deadline(board: &mut Board, params: &[&str]) -> OpResult {
    if params.len() < 2 {
        return Err(OpError::Usage("deadline <task id> <when>"));
    }
    let id = params[0];
    let text = params[1..].join(" ");
    let task = board
        .find_task_mut(id)
        .ok_or_else(|| OpError::TaskNotFound(id.to_string()))?;
    let parsed = dates::parse_date(&text).ok_or(OpError::InvalidDeadline)?;
    task.deadline = Some(parsed);
    Ok(format!(
        "Deadline for task '{id}' set to {}.",
        parsed.format(TIME_FORMAT)
    ))
}

pub fn prioritize_task(board: &mut Board, params: &[&str]) -> OpResult {
    if params.len() < 2 {
        return Err(OpError::Usage("priority <task id> <level>"));
    }
    let id = params[0];
    let level =
        Priority::parse(params[1]).ok_or_else(|| OpError::InvalidPriority(params[1].to_string()))?;
    let task = board
        .find_task_mut(id)
        .ok_or_else(|| OpError::TaskNotFound(id.to_string()))?;
    task.priority = level;
    Ok(format!("Priority of task '{id}' set to {level}."))
}

// Longest token prefix that names an existing column (case-insensitive,
// exact). Returns the canonical column name and how many tokens it consumed.
fn match_column_prefix(board: &Board, tokens: &[&str]) -> Option<(String, usize)> {
    let mut found = None;
    for take in 1..=tokens.len() {
        let candidate = tokens[..take].join(" ");
        if let Some(idx) = board.find_column_index(&candidate) {
            let name = board.column_name(idx)?.to_string();
            found = Some((name, take));
        }
    }
    found
}

// Splits "description... to <column>" by trying each "to" from the right and
// fuzzy-matching the text after it. Returns the canonical column name and the
// index of the winning "to" token.
fn find_target_column(board: &Board, tokens: &[&str]) -> Option<(String, usize)> {
    for (i, token) in tokens.iter().enumerate().rev() {
        if !token.eq_ignore_ascii_case("to") || i + 1 >= tokens.len() {
            continue;
        }
        let candidate = tokens[i + 1..].join(" ");
        if let Some(hit) = fuzzy::best_match(
            &candidate,
            board.columns.keys().map(String::as_str),
            fuzzy::DEFAULT_THRESHOLD,
        ) {
            return Some((hit.to_string(), i));
        }
    }
    None
}
