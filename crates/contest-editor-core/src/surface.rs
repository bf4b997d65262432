//! Text-editing surface.
//!
//! The contest editor drives one multi-buffer editing surface through [`TextSurface`]: load the
//! contest files, switch the visible buffer, highlight lines, read buffers back for submission
//! and re-layout after a resize.
//!
//! [`MemorySurface`] is a rope-backed implementation with a cursor per buffer. It enforces the
//! `lock` flag and read-only lines of each [`FileDescriptor`] on every edit.

use ropey::Rope;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::SurfaceError;
use crate::files::{FileDescriptor, FileSnapshot};

/// Operations the contest editor needs from an editing surface.
pub trait TextSurface {
    /// Replace all buffers with the given files and select the first one.
    fn load(&mut self, files: &[FileDescriptor]);

    /// Show buffer `index`. Out-of-range indices are ignored.
    fn select(&mut self, index: usize) -> bool;

    /// Index of the visible buffer.
    fn selected(&self) -> usize;

    /// Highlight 1-based `lines` of `filename` and switch to that buffer.
    ///
    /// Returns `false` when no buffer has that name.
    fn highlight(&mut self, filename: &str, lines: &[usize]) -> bool;

    /// Current content of every buffer, in load order.
    fn contents(&self) -> Vec<FileSnapshot>;

    /// Re-layout for a new available height. Must be idempotent.
    fn relayout(&mut self, height: u32);
}

/// Cursor position (0-based line, 0-based char column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line index.
    pub line: usize,
    /// Char column within the line.
    pub column: usize,
}

impl Position {
    /// Create a position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// One grapheme left, wrapping to the previous line end.
    Left,
    /// One grapheme right, wrapping to the next line start.
    Right,
    /// One line up.
    Up,
    /// One line down.
    Down,
    /// Start of line.
    LineStart,
    /// End of line.
    LineEnd,
}

#[derive(Debug, Clone)]
struct Buffer {
    file: FileDescriptor,
    rope: Rope,
    cursor: Position,
    highlight: Vec<usize>,
}

impl Buffer {
    fn new(file: &FileDescriptor) -> Self {
        Self {
            rope: Rope::from_str(&file.content),
            file: file.clone(),
            cursor: Position::default(),
            highlight: Vec::new(),
        }
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let text = self.rope.line(line).to_string();
        text.trim_end_matches(is_line_break).to_string()
    }

    fn line_len(&self, line: usize) -> usize {
        self.line_text(line).chars().count()
    }

    fn ensure_editable(&self, line: usize) -> Result<(), SurfaceError> {
        if self.file.lock {
            return Err(SurfaceError::Locked(self.file.filename.clone()));
        }
        if !self.file.is_line_editable(line) {
            return Err(SurfaceError::ReadOnlyLine {
                filename: self.file.filename.clone(),
                line: line + 1,
            });
        }
        Ok(())
    }

    // Keep 1-based read-only markers attached to their text after lines were added or removed
    // below `after` (0-based).
    fn shift_read_only_lines(&mut self, after: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        self.file.read_only_lines = self
            .file
            .read_only_lines
            .iter()
            .map(|&line| {
                if line > after + 1 {
                    line.saturating_add_signed(delta)
                } else {
                    line
                }
            })
            .collect();
    }

    fn char_index(&self, position: Position) -> usize {
        self.rope.line_to_char(position.line) + position.column
    }

    fn insert(&mut self, text: &str) -> Result<(), SurfaceError> {
        let cursor = self.cursor;
        self.ensure_editable(cursor.line)?;

        // Ropey splits lines on every Unicode break, not only '\n'.
        let lines_before = self.rope.len_lines();
        let start = self.char_index(cursor);
        self.rope.insert(start, text);
        let added = self.rope.len_lines() - lines_before;
        self.shift_read_only_lines(cursor.line, added as isize);

        let end = start + text.chars().count();
        let line = self.rope.char_to_line(end);
        self.cursor = Position::new(line, end - self.rope.line_to_char(line));
        Ok(())
    }

    fn backspace(&mut self) -> Result<bool, SurfaceError> {
        let cursor = self.cursor;
        if cursor.column > 0 {
            self.ensure_editable(cursor.line)?;
            let start = previous_grapheme(&self.line_text(cursor.line), cursor.column);
            let line_start = self.rope.line_to_char(cursor.line);
            self.rope.remove(line_start + start..line_start + cursor.column);
            self.cursor.column = start;
            return Ok(true);
        }
        if cursor.line == 0 {
            return Ok(false);
        }

        self.ensure_editable(cursor.line - 1)?;
        self.ensure_editable(cursor.line)?;
        let previous_len = self.line_len(cursor.line - 1);
        let line_start = self.rope.line_to_char(cursor.line);
        let separator = self.rope.line(cursor.line - 1).len_chars() - previous_len;
        self.rope.remove(line_start - separator..line_start);
        self.shift_read_only_lines(cursor.line - 1, -1);
        self.cursor = Position::new(cursor.line - 1, previous_len);
        Ok(true)
    }

    fn move_cursor(&mut self, motion: Motion) {
        let Position { line, column } = self.cursor;
        let last_line = self.line_count().saturating_sub(1);
        self.cursor = match motion {
            Motion::Left if column > 0 => {
                Position::new(line, previous_grapheme(&self.line_text(line), column))
            }
            Motion::Left if line > 0 => Position::new(line - 1, self.line_len(line - 1)),
            Motion::Right if column < self.line_len(line) => {
                Position::new(line, next_grapheme(&self.line_text(line), column))
            }
            Motion::Right if line < last_line => Position::new(line + 1, 0),
            Motion::Up if line > 0 => Position::new(line - 1, column.min(self.line_len(line - 1))),
            Motion::Down if line < last_line => {
                Position::new(line + 1, column.min(self.line_len(line + 1)))
            }
            Motion::LineStart => Position::new(line, 0),
            Motion::LineEnd => Position::new(line, self.line_len(line)),
            _ => self.cursor,
        };
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

fn char_to_byte(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

fn byte_to_char(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

fn previous_grapheme(text: &str, column: usize) -> usize {
    let byte = char_to_byte(text, column);
    let start = text
        .grapheme_indices(true)
        .map(|(offset, _)| offset)
        .take_while(|&offset| offset < byte)
        .last()
        .unwrap_or(0);
    byte_to_char(text, start)
}

fn next_grapheme(text: &str, column: usize) -> usize {
    let byte = char_to_byte(text, column);
    let end = text
        .grapheme_indices(true)
        .map(|(offset, grapheme)| offset + grapheme.len())
        .find(|&end| end > byte)
        .unwrap_or(text.len());
    byte_to_char(text, end)
}

/// In-memory multi-buffer surface.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    buffers: Vec<Buffer>,
    selected: usize,
    relayout_count: usize,
    last_height: Option<u32>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loaded buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// File metadata of buffer `index`.
    pub fn file(&self, index: usize) -> Option<&FileDescriptor> {
        self.buffers.get(index).map(|buffer| &buffer.file)
    }

    /// Full text of buffer `index`.
    pub fn text(&self, index: usize) -> Option<String> {
        self.buffers.get(index).map(|buffer| buffer.rope.to_string())
    }

    /// Number of lines in buffer `index`.
    pub fn line_count(&self, index: usize) -> usize {
        self.buffers.get(index).map_or(0, Buffer::line_count)
    }

    /// Text of one line without its terminator.
    pub fn line(&self, index: usize, line: usize) -> Option<String> {
        let buffer = self.buffers.get(index)?;
        (line < buffer.line_count()).then(|| buffer.line_text(line))
    }

    /// Highlighted 1-based lines of buffer `index`.
    pub fn highlighted_lines(&self, index: usize) -> &[usize] {
        self.buffers
            .get(index)
            .map_or(&[][..], |buffer| buffer.highlight.as_slice())
    }

    /// Cursor of the visible buffer.
    pub fn cursor(&self) -> Position {
        self.buffers
            .get(self.selected)
            .map(|buffer| buffer.cursor)
            .unwrap_or_default()
    }

    /// How many times a re-layout was requested.
    pub fn relayout_count(&self) -> usize {
        self.relayout_count
    }

    /// Height passed to the most recent re-layout.
    pub fn last_relayout_height(&self) -> Option<u32> {
        self.last_height
    }

    fn current(&mut self) -> Result<&mut Buffer, SurfaceError> {
        let selected = self.selected;
        self.buffers
            .get_mut(selected)
            .ok_or(SurfaceError::BufferNotFound(selected))
    }

    /// Insert text at the cursor of the visible buffer.
    pub fn insert(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.current()?.insert(text)
    }

    /// Split the current line at the cursor.
    pub fn insert_newline(&mut self) -> Result<(), SurfaceError> {
        self.insert("\n")
    }

    /// Delete the grapheme before the cursor, joining lines at column 0.
    ///
    /// Returns `false` when the cursor is at the start of the buffer.
    pub fn backspace(&mut self) -> Result<bool, SurfaceError> {
        self.current()?.backspace()
    }

    /// Move the cursor of the visible buffer.
    pub fn move_cursor(&mut self, motion: Motion) {
        if let Ok(buffer) = self.current() {
            buffer.move_cursor(motion);
        }
    }

    /// Place the cursor, clamped to the buffer.
    pub fn set_cursor(&mut self, position: Position) {
        if let Ok(buffer) = self.current() {
            let line = position.line.min(buffer.line_count().saturating_sub(1));
            let column = position.column.min(buffer.line_len(line));
            buffer.cursor = Position::new(line, column);
        }
    }
}

impl TextSurface for MemorySurface {
    fn load(&mut self, files: &[FileDescriptor]) {
        self.buffers = files.iter().map(Buffer::new).collect();
        self.selected = 0;
        debug!(files = files.len(), "surface loaded");
    }

    fn select(&mut self, index: usize) -> bool {
        if index >= self.buffers.len() {
            return false;
        }
        self.selected = index;
        true
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn highlight(&mut self, filename: &str, lines: &[usize]) -> bool {
        let Some(index) = self
            .buffers
            .iter()
            .position(|buffer| buffer.file.filename == filename)
        else {
            warn!(filename, "file not found for highlighting");
            return false;
        };
        self.selected = index;
        self.buffers[index].highlight = lines.to_vec();
        true
    }

    fn contents(&self) -> Vec<FileSnapshot> {
        self.buffers
            .iter()
            .map(|buffer| FileSnapshot::new(buffer.file.filename.clone(), buffer.rope.to_string()))
            .collect()
    }

    fn relayout(&mut self, height: u32) {
        self.relayout_count += 1;
        self.last_height = Some(height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn surface(files: &[FileDescriptor]) -> MemorySurface {
        let mut surface = MemorySurface::new();
        surface.load(files);
        surface
    }

    #[test]
    fn test_insert_and_snapshot() {
        let mut s = surface(&[FileDescriptor::new("main.py", "python", "print(1)\n")]);
        s.set_cursor(Position::new(0, 8));
        s.insert_newline().unwrap();
        s.insert("x = 2").unwrap();
        assert_eq!(s.cursor(), Position::new(1, 5));
        assert_eq!(
            s.contents(),
            vec![FileSnapshot::new("main.py", "print(1)\nx = 2\n")]
        );
    }

    #[test]
    fn test_locked_file_rejects_edits() {
        let mut s = surface(&[FileDescriptor::new("lib.h", "cpp", "int f();\n").locked()]);
        assert_eq!(
            s.insert("x"),
            Err(SurfaceError::Locked("lib.h".to_string()))
        );
        assert_eq!(s.text(0).as_deref(), Some("int f();\n"));
    }

    #[test]
    fn test_read_only_lines_follow_their_text() {
        let file = FileDescriptor::new("a.cpp", "cpp", "// header\nint x;\n// footer\n")
            .with_read_only_lines([1, 3]);
        let mut s = surface(&[file]);

        assert_eq!(
            s.insert("y"),
            Err(SurfaceError::ReadOnlyLine {
                filename: "a.cpp".to_string(),
                line: 1
            })
        );

        s.set_cursor(Position::new(1, 6));
        s.insert_newline().unwrap();
        assert_eq!(s.line(0, 3).as_deref(), Some("// footer"));
        assert!(s.file(0).unwrap().read_only_lines.contains(&4));

        // Joining line 3 into line 2 is allowed; both are editable.
        assert!(s.backspace().unwrap());
        assert!(s.file(0).unwrap().read_only_lines.contains(&3));
    }

    #[test]
    fn test_lone_carriage_return_keeps_read_only_line_protected() {
        let file = FileDescriptor::new("a.txt", "text", "a\nLOCKED\n").with_read_only_lines([2]);
        let mut s = surface(&[file]);

        s.insert("\r").unwrap();
        assert_eq!(s.cursor(), Position::new(1, 0));
        assert!(s.file(0).unwrap().read_only_lines.contains(&3));

        s.set_cursor(Position::new(2, 0));
        assert_eq!(
            s.insert("X"),
            Err(SurfaceError::ReadOnlyLine {
                filename: "a.txt".to_string(),
                line: 3
            })
        );
        assert_eq!(s.text(0).as_deref(), Some("\ra\nLOCKED\n"));
    }

    #[test]
    fn test_unicode_line_separator_counts_as_line() {
        let mut s = surface(&[FileDescriptor::new("a.txt", "text", "ab")]);
        s.move_cursor(Motion::Right);
        s.insert("\u{2028}x").unwrap();
        assert_eq!(s.cursor(), Position::new(1, 1));
        assert_eq!(s.line(0, 0).as_deref(), Some("a"));

        s.set_cursor(Position::new(1, 0));
        assert!(s.backspace().unwrap());
        assert_eq!(s.text(0).as_deref(), Some("axb"));
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let mut s = surface(&[FileDescriptor::new("t.txt", "text", "ae\u{301}")]);
        s.move_cursor(Motion::LineEnd);
        assert_eq!(s.cursor(), Position::new(0, 3));
        assert!(s.backspace().unwrap());
        assert_eq!(s.text(0).as_deref(), Some("a"));
    }

    #[test]
    fn test_highlight_switches_buffer() {
        let mut s = surface(&[
            FileDescriptor::new("a.py", "python", ""),
            FileDescriptor::new("b.py", "python", ""),
        ]);
        assert!(s.highlight("b.py", &[2, 3]));
        assert_eq!(s.selected(), 1);
        assert_eq!(s.highlighted_lines(1), &[2, 3]);
        assert!(!s.highlight("missing.py", &[1]));
        assert_eq!(s.selected(), 1);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut s = surface(&[FileDescriptor::new("a.py", "python", "")]);
        assert!(!s.select(4));
        assert_eq!(s.selected(), 0);
    }
}
