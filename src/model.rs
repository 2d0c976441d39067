use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Clone)]
pub struct Board {
    pub columns: IndexMap<String, Vec<Task>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(with = "ts")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "ts_opt")]
    pub deadline: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(label)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("column '{0}' does not exist")]
    ColumnNotFound(String),
    #[error("a column named '{0}' already exists")]
    ColumnExists(String),
    #[error("task with id '{0}' not found")]
    TaskNotFound(String),
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn find_column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .keys()
            .position(|k| k.eq_ignore_ascii_case(name))
    }

    pub fn column_name(&self, idx: usize) -> Option<&str> {
        self.columns.get_index(idx).map(|(k, _)| k.as_str())
    }

    pub fn create_column(&mut self, name: &str) -> Result<(), BoardError> {
        if self.find_column_index(name).is_some() {
            return Err(BoardError::ColumnExists(name.to_string()));
        }
        self.columns.insert(name.to_string(), Vec::new());
        Ok(())
    }

    pub fn destroy_column(&mut self, name: &str) -> Result<String, BoardError> {
        let idx = self
            .find_column_index(name)
            .ok_or_else(|| BoardError::ColumnNotFound(name.to_string()))?;
        let (removed, _) = self.columns.shift_remove_index(idx).expect("index in range");
        Ok(removed)
    }

    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<(), BoardError> {
        let idx = self
            .find_column_index(old)
            .ok_or_else(|| BoardError::ColumnNotFound(old.to_string()))?;
        if let Some(existing) = self.find_column_index(new) {
            if existing != idx {
                return Err(BoardError::ColumnExists(new.to_string()));
            }
        }
        let (_, tasks) = self.columns.shift_remove_index(idx).expect("index in range");
        self.columns.shift_insert(idx, new.to_string(), tasks);
        Ok(())
    }

    pub fn swap_columns(&mut self, a: &str, b: &str) -> Result<(), BoardError> {
        let ia = self
            .find_column_index(a)
            .ok_or_else(|| BoardError::ColumnNotFound(a.to_string()))?;
        let ib = self
            .find_column_index(b)
            .ok_or_else(|| BoardError::ColumnNotFound(b.to_string()))?;
        if ia == ib {
            return Ok(());
        }
        let a_tasks = std::mem::take(&mut self.columns[ia]);
        let b_tasks = std::mem::replace(&mut self.columns[ib], a_tasks);
        self.columns[ia] = b_tasks;
        Ok(())
    }

    pub fn add_task(&mut self, column: &str, task: Task) -> Result<(), BoardError> {
        let idx = self
            .find_column_index(column)
            .ok_or_else(|| BoardError::ColumnNotFound(column.to_string()))?;
        self.columns[idx].push(task);
        Ok(())
    }

    pub fn find_task(&self, id: &str) -> Option<(&str, &Task)> {
        for (name, tasks) in &self.columns {
            if let Some(task) = tasks.iter().find(|t| t.id == id) {
                return Some((name.as_str(), task));
            }
        }
        None
    }

    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.columns
            .values_mut()
            .flat_map(|tasks| tasks.iter_mut())
            .find(|t| t.id == id)
    }

    pub fn move_task(&mut self, id: &str, dest: &str) -> Result<(), BoardError> {
        let dest_idx = self
            .find_column_index(dest)
            .ok_or_else(|| BoardError::ColumnNotFound(dest.to_string()))?;
        let (_, task) = self.take_task(id)?;
        self.columns[dest_idx].push(task);
        Ok(())
    }

    pub fn remove_task(&mut self, id: &str) -> Result<String, BoardError> {
        let (column, _) = self.take_task(id)?;
        Ok(column)
    }

    fn take_task(&mut self, id: &str) -> Result<(String, Task), BoardError> {
        for (name, tasks) in self.columns.iter_mut() {
            if let Some(pos) = tasks.iter().position(|t| t.id == id) {
                return Ok((name.clone(), tasks.remove(pos)));
            }
        }
        Err(BoardError::TaskNotFound(id.to_string()))
    }

    pub fn is_id_used(&self, id: &str) -> bool {
        self.columns.values().flatten().any(|t| t.id == id)
    }

    // Shortest unused ID first, lexicographic within a length. Linear scan per
    // candidate, which is fine at the board sizes this tool is for.
    pub fn generate_unique_id(&self) -> String {
        for len in 1u32.. {
            for n in 0..26usize.pow(len) {
                let id = encode_id(n, len as usize);
                if !self.is_id_used(&id) {
                    return id;
                }
            }
        }
        unreachable!("id space exhausted")
    }
}

fn encode_id(mut n: usize, len: usize) -> String {
    let mut chars = vec![b'a'; len];
    for slot in chars.iter_mut().rev() {
        *slot = b'a' + (n % 26) as u8;
        n /= 26;
    }
    String::from_utf8(chars).expect("ascii")
}

mod ts {
    use super::TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

mod ts_opt {
    use super::TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_str(&dt.format(TIME_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        raw.map(|r| {
            NaiveDateTime::parse_from_str(&r, TIME_FORMAT).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
