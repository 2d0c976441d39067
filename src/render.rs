use crate::model::{Board, Priority, Task, TIME_FORMAT};
use chrono::{Local, NaiveDateTime};

const CELL_WIDTH: usize = 26;

pub fn text_table(board: &Board) -> String {
    if board.columns.is_empty() {
        return "(no columns yet -- try: create todo)".to_string();
    }

    let sorted: Vec<(&str, Vec<&Task>)> = board
        .columns
        .iter()
        .map(|(name, tasks)| {
            let mut tasks: Vec<&Task> = tasks.iter().collect();
            tasks.sort_by_key(|t| (t.priority, t.timestamp));
            (name.as_str(), tasks)
        })
        .collect();

    let now = Local::now().naive_local();
    let mut out = String::new();
    let divider = divider_line(sorted.len());

    out.push_str(&divider);
    out.push('|');
    for (name, _) in &sorted {
        out.push_str(&format!(" {:<width$}|", truncate(name, CELL_WIDTH - 2), width = CELL_WIDTH - 1));
    }
    out.push('\n');
    out.push_str(&divider);

    let max_tasks = sorted.iter().map(|(_, tasks)| tasks.len()).max().unwrap_or(0);
    for row in 0..max_tasks {
        let cells: Vec<Vec<String>> = sorted
            .iter()
            .map(|(_, tasks)| match tasks.get(row) {
                Some(task) => task_cell(task, now),
                None => Vec::new(),
            })
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(0);
        for line in 0..height {
            out.push('|');
            for cell in &cells {
                let text = cell.get(line).map(String::as_str).unwrap_or("");
                out.push_str(&format!(" {:<width$}|", text, width = CELL_WIDTH - 1));
            }
            out.push('\n');
        }
        out.push_str(&divider);
    }
    out
}

fn divider_line(columns: usize) -> String {
    let mut line = String::from("+");
    for _ in 0..columns {
        line.push_str(&"-".repeat(CELL_WIDTH));
        line.push('+');
    }
    line.push('\n');
    line
}

fn task_cell(task: &Task, now: NaiveDateTime) -> Vec<String> {
    let mut lines = Vec::new();
    let header = format!("[{}] ", task.id);
    let body_width = CELL_WIDTH - 2;
    for (i, line) in wrap(&task.description, body_width.saturating_sub(header.len())).into_iter().enumerate()
    {
        if i == 0 {
            lines.push(format!("{header}{line}"));
        } else {
            lines.push(format!("{:indent$}{line}", "", indent = header.len()));
        }
    }
    if task.priority != Priority::Low {
        lines.push(format!("    priority: {}", task.priority));
    }
    if let Some(deadline) = task.deadline {
        lines.push(format!("    {}", format_deadline(deadline, now)));
    }
    lines
}

pub fn format_deadline(deadline: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff = deadline - now;
    if diff.num_minutes() <= 0 {
        return "past due".to_string();
    }
    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let minutes = diff.num_minutes() % 60;
    if days == 0 {
        format!("due in {hours}h {minutes}m")
    } else {
        format!("due in {days}d {hours}h")
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        if word_len > width {
            // A single overlong word gets hard-split.
            for ch in word.chars() {
                if current_len == width {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(ch);
                current_len += 1;
            }
        } else {
            current.push_str(word);
            current_len += word_len;
        }
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= width {
            out.push('…');
            break;
        }
        out.push(ch);
    }
    out
}

// The derived rendering embedded in every save. Informational only; the
// structured "data" key is the source of truth.
pub fn html_table(title: &str, board: &Board) -> String {
    let mut html = format!("<h1>{}</h1>", escape(title));
    html.push_str("<table border='1'><tr>");
    for name in board.columns.keys() {
        html.push_str(&format!("<th>{}</th>", escape(name)));
    }
    html.push_str("</tr>");

    let max_tasks = board.columns.values().map(Vec::len).max().unwrap_or(0);
    for row in 0..max_tasks {
        html.push_str("<tr>");
        for tasks in board.columns.values() {
            match tasks.get(row) {
                Some(task) => {
                    let mut fields = vec![
                        format!("id: {}", escape(&task.id)),
                        format!("description: {}", escape(&task.description)),
                        format!("timestamp: {}", task.timestamp.format(TIME_FORMAT)),
                        format!("priority: {}", task.priority),
                    ];
                    if let Some(deadline) = task.deadline {
                        fields.push(format!("deadline: {}", deadline.format(TIME_FORMAT)));
                    }
                    html.push_str(&format!("<td>{}</td>", fields.join("<br>")));
                }
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>")
}
