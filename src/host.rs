//! Seams to the editor host.
//!
//! Commands never talk to a concrete editor, clipboard or notification area;
//! they go through these traits so the same logic runs inside an editor
//! integration, the `vls` binary, or a test.

use std::cell::RefCell;

use async_trait::async_trait;
use log::info;

use crate::{Provider, VideoMeta};

/// A cursor location: zero-based line and character within that line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// The editor of the active document
pub trait Editor {
    fn cursor(&self) -> Position;

    /// Currently selected text, empty when nothing is selected
    fn selection(&self) -> String;

    /// Replace the selection (or insert at the cursor when there is none)
    fn replace_selection(&mut self, text: &str);

    /// Insert `text` at `at`
    fn replace_range(&mut self, text: &str, at: Position);
}

/// System clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> eyre::Result<Option<String>>;
}

/// Transient user-visible messages
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Remote video metadata lookup; faults are reported as `None`
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, provider: Provider, url: &str) -> Option<VideoMeta>;
}

/// In-memory document with a cursor and an optional selection
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    cursor: Position,
    selection: Option<(Position, Position)>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: Position::default(),
            selection: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Position just past the last character
    pub fn end(&self) -> Position {
        self.position_of(self.text.len())
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
        self.selection = None;
    }

    pub fn select(&mut self, from: Position, to: Position) {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        self.selection = Some((from, to));
        self.cursor = to;
    }

    /// Select the whole of line `line`, excluding its newline
    pub fn select_line(&mut self, line: usize) {
        let len = self.text.split('\n').nth(line).map_or(0, |l| l.chars().count());
        self.select(Position::new(line, 0), Position::new(line, len));
    }

    fn offset_of(&self, pos: Position) -> usize {
        let mut offset = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            if i == pos.line {
                let within = line.char_indices().nth(pos.ch).map_or(line.len(), |(b, _)| b);
                return offset + within;
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }

    fn position_of(&self, offset: usize) -> Position {
        let before = &self.text[..offset];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Position::new(line, before[line_start..].chars().count())
    }

    fn splice(&mut self, start: usize, end: usize, text: &str) {
        self.text.replace_range(start..end, text);
        self.cursor = self.position_of(start + text.len());
        self.selection = None;
    }
}

impl Editor for TextBuffer {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn selection(&self) -> String {
        match self.selection {
            Some((from, to)) => self.text[self.offset_of(from)..self.offset_of(to)].to_string(),
            None => String::new(),
        }
    }

    fn replace_selection(&mut self, text: &str) {
        let (from, to) = self.selection.unwrap_or((self.cursor, self.cursor));
        let (start, end) = (self.offset_of(from), self.offset_of(to));
        self.splice(start, end, text);
    }

    fn replace_range(&mut self, text: &str, at: Position) {
        let offset = self.offset_of(at);
        self.splice(offset, offset, text);
    }
}

/// Clipboard holding fixed contents
#[derive(Debug, Clone, Default)]
pub struct StaticClipboard(pub Option<String>);

impl StaticClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }

    pub fn empty() -> Self {
        Self(None)
    }
}

#[async_trait]
impl Clipboard for StaticClipboard {
    async fn read_text(&self) -> eyre::Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Notifier printing to stderr and the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("notice: {message}");
        eprintln!("{message}");
    }
}

/// Notifier that keeps every message, for inspection afterwards
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Metadata source that never finds anything
#[derive(Debug, Default)]
pub struct NoMetadata;

#[async_trait]
impl MetadataSource for NoMetadata {
    async fn fetch(&self, _provider: Provider, _url: &str) -> Option<VideoMeta> {
        None
    }
}
