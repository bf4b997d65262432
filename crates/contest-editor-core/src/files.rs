//! Submission files.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A file loaded into the editor surface.
///
/// Descriptors are immutable input; the live text is owned by the surface and read back as a
/// [`FileSnapshot`] when submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// File name, unique within one contest.
    pub filename: String,
    /// Initial content.
    #[serde(default, alias = "initialContent")]
    pub content: String,
    /// Language tag (e.g. `"cpp"`, `"python"`).
    #[serde(default)]
    pub language: String,
    /// A locked file cannot be edited at all.
    #[serde(default)]
    pub lock: bool,
    /// 1-based line numbers that cannot be edited.
    #[serde(default, alias = "readOnly")]
    pub read_only_lines: BTreeSet<usize>,
}

impl FileDescriptor {
    /// Create an editable file.
    pub fn new(
        filename: impl Into<String>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            language: language.into(),
            lock: false,
            read_only_lines: BTreeSet::new(),
        }
    }

    /// Builder-style: lock the whole file.
    pub fn locked(mut self) -> Self {
        self.lock = true;
        self
    }

    /// Builder-style: mark 1-based lines read-only.
    pub fn with_read_only_lines<I>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.read_only_lines.extend(lines);
        self
    }

    /// Whether a 0-based line may be edited.
    pub fn is_line_editable(&self, line: usize) -> bool {
        !self.lock && !self.read_only_lines.contains(&(line + 1))
    }
}

/// File name and current content, as sent to the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    /// File name.
    pub filename: String,
    /// Current buffer content.
    pub content: String,
}

impl FileSnapshot {
    /// Create a snapshot.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_aliases() {
        let file: FileDescriptor = serde_json::from_str(
            r#"{"filename":"main.cpp","language":"cpp","initialContent":"int main(){}","readOnly":[1,3]}"#,
        )
        .unwrap();
        assert_eq!(file.content, "int main(){}");
        assert!(!file.is_line_editable(0));
        assert!(file.is_line_editable(1));
        assert!(!file.is_line_editable(2));
    }

    #[test]
    fn test_locked_file_has_no_editable_lines() {
        let file = FileDescriptor::new("a.py", "python", "x = 1\n").locked();
        assert!(!file.is_line_editable(0));
        assert!(!file.is_line_editable(10));
    }
}
