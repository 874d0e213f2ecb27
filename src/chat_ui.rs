use crate::conversation::Role;
use chrono::Local;
use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fmt;
use tokio::time::Duration;
use uuid::Uuid;

/// Correlation token pairing a request with its placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of line shown in the chat panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Assistant,
    Routine,
    Error,
    Notice,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::User => "You:",
            EntryKind::Assistant => "Assistant:",
            EntryKind::Routine => "Your Personalized Routine:",
            EntryKind::Error => "Error:",
            EntryKind::Notice => "Notice:",
        }
    }

    /// Which side of the conversation the line is drawn on
    pub fn role(&self) -> Role {
        match self {
            EntryKind::User => Role::User,
            _ => Role::Assistant,
        }
    }
}

/// A rendered chat line. What is shown may differ from what was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub kind: EntryKind,
    pub text: String,
}

impl ChatEntry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Surface the conversation manager renders into
pub trait ChatView {
    fn show_entry(&mut self, entry: ChatEntry);
    fn show_placeholder(&mut self, id: RequestId, text: &str);
    fn clear_placeholder(&mut self, id: RequestId);
}

/// A line in the in-memory panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelLine {
    Entry(ChatEntry),
    Placeholder { id: RequestId, text: String },
}

/// Scrolling chat panel kept in memory
///
/// Placeholders are removed by their own [`RequestId`], never by position, so
/// overlapping requests resolve independently.
#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    lines: Vec<PanelLine>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[PanelLine] {
        &self.lines
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.lines.iter().filter_map(|line| match line {
            PanelLine::Entry(entry) => Some(entry),
            PanelLine::Placeholder { .. } => None,
        })
    }

    pub fn placeholder_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, PanelLine::Placeholder { .. }))
            .count()
    }
}

impl ChatView for ChatPanel {
    fn show_entry(&mut self, entry: ChatEntry) {
        self.lines.push(PanelLine::Entry(entry));
    }

    fn show_placeholder(&mut self, id: RequestId, text: &str) {
        self.lines.push(PanelLine::Placeholder {
            id,
            text: text.to_string(),
        });
    }

    fn clear_placeholder(&mut self, id: RequestId) {
        self.lines
            .retain(|line| !matches!(line, PanelLine::Placeholder { id: other, .. } if *other == id));
    }
}

/// Chat panel printed to the terminal, with a spinner per outstanding request
pub struct TerminalChat {
    multi_progress: MultiProgress,
    spinners: HashMap<RequestId, ProgressBar>,
}

impl Default for TerminalChat {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalChat {
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            spinners: HashMap::new(),
        }
    }
}

impl ChatView for TerminalChat {
    fn show_entry(&mut self, entry: ChatEntry) {
        let timestamp = format!("[{}]", Local::now().format("%H:%M:%S")).dimmed();
        let label = match entry.kind {
            EntryKind::User => entry.kind.label().green().bold(),
            EntryKind::Assistant => entry.kind.label().blue().bold(),
            EntryKind::Routine => entry.kind.label().magenta().bold(),
            EntryKind::Error => entry.kind.label().red().bold(),
            EntryKind::Notice => entry.kind.label().yellow().bold(),
        };
        println!("{} {} {}", timestamp, label, entry.text);
    }

    fn show_placeholder(&mut self, id: RequestId, text: &str) {
        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{} {}", "Assistant:".blue().bold(), text));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinners.insert(id, pb);
    }

    fn clear_placeholder(&mut self, id: RequestId) {
        if let Some(pb) = self.spinners.remove(&id) {
            pb.finish_and_clear();
        }
    }
}
