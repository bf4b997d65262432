//! Contest information shown in the "Info" tab.

use serde::{Deserialize, Serialize};

/// Format of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Markdown source. Rendering is up to the frontend.
    Markdown,
    /// Anything else; frontends skip these.
    #[serde(other)]
    Unsupported,
}

/// One block of problem statement or hint text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block format (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Block source.
    pub content: String,
}

impl ContentBlock {
    /// Create a markdown block.
    pub fn markdown(content: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Markdown,
            content: content.into(),
        }
    }
}

/// Problem statement plus optional hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestInfo {
    /// Problem statement blocks.
    #[serde(default)]
    pub problem: Vec<ContentBlock>,
    /// Hint blocks, collapsed by default.
    #[serde(default)]
    pub hint: Vec<ContentBlock>,
}

impl ContestInfo {
    /// Problem blocks a frontend should render.
    pub fn problem_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.problem.iter().filter(|b| b.kind == BlockKind::Markdown)
    }

    /// Hint blocks a frontend should render when the hint section is open.
    pub fn hint_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.hint.iter().filter(|b| b.kind == BlockKind::Markdown)
    }

    /// Whether a hint section exists at all.
    pub fn has_hints(&self) -> bool {
        !self.hint.is_empty()
    }
}

/// Info tab view state.
#[derive(Debug, Clone, Default)]
pub struct InfoPanel {
    info: ContestInfo,
    hint_expanded: bool,
}

impl InfoPanel {
    /// Create a panel with the hint section collapsed.
    pub fn new(info: ContestInfo) -> Self {
        Self {
            info,
            hint_expanded: false,
        }
    }

    /// Contest content.
    pub fn info(&self) -> &ContestInfo {
        &self.info
    }

    /// Whether hints are shown.
    pub fn hint_expanded(&self) -> bool {
        self.hint_expanded
    }

    /// Open or close the hint section.
    pub fn toggle_hint(&mut self) -> bool {
        self.hint_expanded = !self.hint_expanded;
        self.hint_expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_markdown_blocks_are_rendered() {
        let info: ContestInfo = serde_json::from_str(
            r##"{"problem":[{"type":"Markdown","content":"# Sum"},{"type":"Video","content":"x"}],
                "hint":[{"type":"Markdown","content":"use i64"}]}"##,
        )
        .unwrap();

        let problem: Vec<&str> = info.problem_blocks().map(|b| b.content.as_str()).collect();
        assert_eq!(problem, vec!["# Sum"]);
        assert!(info.has_hints());
    }

    #[test]
    fn test_hint_toggle() {
        let mut panel = InfoPanel::new(ContestInfo::default());
        assert!(!panel.hint_expanded());
        assert!(panel.toggle_hint());
        assert!(!panel.toggle_hint());
    }
}
