#[derive(Debug, Clone)]
pub struct Entry {
    pub text: String,
    pub bold: bool,
}

// Append-only feedback channel. Everything a command has to say to the user
// lands here; the REPL renders only the most recent entries.
#[derive(Debug, Default)]
pub struct OutputLog {
    entries: Vec<Entry>,
}

impl OutputLog {
    pub const DISPLAY_LIMIT: usize = 10;

    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(Entry {
            text: text.into(),
            bold: false,
        });
    }

    pub fn push_bold(&mut self, text: impl Into<String>) {
        self.entries.push(Entry {
            text: text.into(),
            bold: true,
        });
    }

    pub fn tail(&self, n: usize) -> &[Entry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
