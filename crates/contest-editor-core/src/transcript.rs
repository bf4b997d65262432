//! Terminal transcript store.
//!
//! The transcript is the ordered log of everything the terminal view shows: echoed commands,
//! command output, submission progress and errors. It is append-only; the only destructive
//! operations are [`TranscriptStore::clear`] and [`TranscriptStore::replace_all`].
//!
//! Appending raises a *scroll request*. The view cannot scroll to the newest entry before it
//! has laid the entry out, so it consumes the request with
//! [`TranscriptStore::take_scroll_request`] after its next render pass.

use serde::{Deserialize, Serialize};

/// Kind of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular output (command replies, submission summaries).
    Output,
    /// Error output (judge errors, compile failures, transport failures).
    Error,
    /// An echoed user command, including the prompt.
    Command,
    /// Host-generated informational line.
    System,
}

/// A single immutable transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Entry kind (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Display text.
    pub content: String,
}

impl TranscriptEntry {
    /// Create an entry of the given kind.
    pub fn new(kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// Create an [`EntryKind::Output`] entry.
    pub fn output(content: impl Into<String>) -> Self {
        Self::new(EntryKind::Output, content)
    }

    /// Create an [`EntryKind::Error`] entry.
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(EntryKind::Error, content)
    }

    /// Create an [`EntryKind::Command`] entry.
    pub fn command(content: impl Into<String>) -> Self {
        Self::new(EntryKind::Command, content)
    }

    /// Create an [`EntryKind::System`] entry.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(EntryKind::System, content)
    }
}

/// Ordered, append-only transcript.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    entries: Vec<TranscriptEntry>,
    scroll_requested: bool,
}

impl TranscriptStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with host-supplied history.
    pub fn with_history(history: Vec<TranscriptEntry>) -> Self {
        let mut store = Self::new();
        store.replace_all(history);
        store
    }

    /// Append one entry at the tail.
    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
        self.scroll_requested = true;
    }

    /// Append entries at the tail, preserving their order.
    pub fn append_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = TranscriptEntry>,
    {
        let before = self.entries.len();
        self.entries.extend(entries);
        if self.entries.len() != before {
            self.scroll_requested = true;
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_requested = false;
    }

    /// Replace the whole sequence (initialization from host history).
    pub fn replace_all(&mut self, entries: Vec<TranscriptEntry>) {
        self.scroll_requested = !entries.is_empty();
        self.entries = entries;
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the transcript has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a scroll-to-end is pending.
    pub fn scroll_requested(&self) -> bool {
        self.scroll_requested
    }

    /// Consume the pending scroll-to-end request.
    ///
    /// Views call this after drawing, so the scroll lands on content that has been laid out.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Entry contents joined by newlines (what the terminal's copy action puts on the clipboard).
    pub fn plain_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_call_order() {
        let mut store = TranscriptStore::new();
        store.append(TranscriptEntry::output("a"));
        store.append_all(vec![
            TranscriptEntry::command("$ b"),
            TranscriptEntry::error("c"),
        ]);
        store.append(TranscriptEntry::system("d"));

        let contents: Vec<&str> = store.entries().iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "$ b", "c", "d"]);
    }

    #[test]
    fn test_clear_always_empties() {
        let mut store = TranscriptStore::with_history(vec![TranscriptEntry::output("x")]);
        store.append(TranscriptEntry::output("y"));
        store.clear();
        assert!(store.is_empty());
        assert!(!store.scroll_requested());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_scroll_request_is_consumed_once() {
        let mut store = TranscriptStore::new();
        assert!(!store.take_scroll_request());

        store.append(TranscriptEntry::output("line"));
        assert!(store.take_scroll_request());
        assert!(!store.take_scroll_request());

        // Appending nothing does not raise a request.
        store.append_all(Vec::new());
        assert!(!store.scroll_requested());
    }

    #[test]
    fn test_plain_text_joins_with_newlines() {
        let store = TranscriptStore::with_history(vec![
            TranscriptEntry::command("$ ls"),
            TranscriptEntry::output("main.rs"),
        ]);
        assert_eq!(store.plain_text(), "$ ls\nmain.rs");
    }

    #[test]
    fn test_entry_wire_format() {
        let entry: TranscriptEntry =
            serde_json::from_str(r#"{"type":"error","content":"boom"}"#).unwrap();
        assert_eq!(entry, TranscriptEntry::error("boom"));
        assert_eq!(
            serde_json::to_string(&TranscriptEntry::command("$ x")).unwrap(),
            r#"{"type":"command","content":"$ x"}"#
        );
    }
}
