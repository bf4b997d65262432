//! Imperative control handle for hosts.
//!
//! A [`ControlHandle`] is a short-lived mutable borrow of a [`ContestEditor`] exposing the
//! operations a host application may trigger directly: tab switching, transcript writes,
//! terminal folding, highlighting and forced re-layout. Each call delegates to the component
//! that owns the state, so the same invariants hold as for user-driven changes.

use crate::contest::ContestEditor;
use crate::surface::TextSurface;
use crate::transcript::TranscriptEntry;

/// Host-facing capability object.
pub struct ControlHandle<'a, S: TextSurface> {
    editor: &'a mut ContestEditor<S>,
}

impl<'a, S: TextSurface> ControlHandle<'a, S> {
    pub(crate) fn new(editor: &'a mut ContestEditor<S>) -> Self {
        Self { editor }
    }

    /// Activate tab `index`; out-of-range indices are ignored.
    pub fn switch_tab(&mut self, index: usize) -> bool {
        self.editor.switch_tab(index)
    }

    /// Index of the active tab.
    pub fn get_active_tab_index(&self) -> usize {
        self.editor.tabs().active_index()
    }

    /// Index of the first tab with `label`, or `-1`.
    pub fn find_tab_index_by_label(&self, label: &str) -> isize {
        self.editor.tabs().find_by_label(label)
    }

    /// Append one transcript entry.
    pub fn add_transcript_entry(&mut self, entry: TranscriptEntry) {
        self.editor.transcript_mut().append(entry);
    }

    /// Append several transcript entries in order.
    pub fn add_transcript_entries<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = TranscriptEntry>,
    {
        self.editor.transcript_mut().append_all(entries);
    }

    /// Empty the transcript.
    pub fn clear_transcript(&mut self) {
        self.editor.transcript_mut().clear();
    }

    /// Fold or unfold the terminal; returns the new state.
    pub fn toggle_terminal_fold(&mut self) -> bool {
        self.editor.toggle_terminal_fold()
    }

    /// Whether the terminal is folded.
    pub fn is_terminal_folded(&self) -> bool {
        self.editor.is_terminal_folded()
    }

    /// Highlight 1-based `lines` of `filename` and show that file.
    pub fn highlight(&mut self, filename: &str, lines: &[usize]) -> bool {
        self.editor.highlight(filename, lines)
    }

    /// Force a surface re-layout.
    pub fn refresh(&mut self) {
        self.editor.refresh();
    }
}
