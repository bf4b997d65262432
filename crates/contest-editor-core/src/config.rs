//! Host configuration and contest definitions.
//!
//! [`ContestEditorConfig`] holds the presentation options a host passes to the widget. Every
//! field has a default, so a TOML file only needs to name what it overrides:
//!
//! ```toml
//! theme = "github-light"
//! height = "720px"
//! terminal_prompt = "> "
//! ```
//!
//! [`ContestDefinition`] is the content of one contest (files, problem statement, optional
//! tabs and transcript history) and is read from JSON, the format judges serve it in.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::files::FileDescriptor;
use crate::info::ContestInfo;
use crate::layout::{DEFAULT_TERMINAL_HEADER_HEIGHT, SidePanelWidth, parse_height};
use crate::tabs::TabDescriptor;
use crate::transcript::TranscriptEntry;

fn default_theme() -> String {
    "github-dark".to_string()
}

fn default_submit_button_text() -> String {
    "Submit".to_string()
}

fn default_submitting_button_text() -> String {
    "Submitting...".to_string()
}

fn default_terminal_title() -> String {
    "Terminal".to_string()
}

fn default_terminal_prompt() -> String {
    "$ ".to_string()
}

fn default_tab_panel_width() -> u32 {
    450
}

fn default_tab_rail_width() -> u32 {
    48
}

fn default_height() -> String {
    "600px".to_string()
}

fn default_terminal_header_height() -> u32 {
    DEFAULT_TERMINAL_HEADER_HEIGHT
}

/// Presentation options of one contest editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestEditorConfig {
    /// Theme tag; names containing `"light"` select the light palette.
    pub theme: String,
    /// Submit button label.
    pub submit_button_text: String,
    /// Submit button label while a submission is in flight.
    pub submitting_button_text: String,
    /// Terminal header caption.
    pub terminal_title: String,
    /// Prompt echoed in front of commands.
    pub terminal_prompt: String,
    /// A read-only terminal shows output but takes no input.
    pub terminal_read_only: bool,
    /// Side panel width when expanded.
    pub tab_panel_width: u32,
    /// Side panel width when folded to its icon rail.
    pub tab_rail_width: u32,
    /// Tab shown first.
    pub initial_active_tab: usize,
    /// Container height, CSS style (`"600px"`).
    pub height: String,
    /// Terminal height when folded.
    pub terminal_header_height: u32,
}

impl Default for ContestEditorConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            submit_button_text: default_submit_button_text(),
            submitting_button_text: default_submitting_button_text(),
            terminal_title: default_terminal_title(),
            terminal_prompt: default_terminal_prompt(),
            terminal_read_only: false,
            tab_panel_width: default_tab_panel_width(),
            tab_rail_width: default_tab_rail_width(),
            initial_active_tab: 0,
            height: default_height(),
            terminal_header_height: default_terminal_header_height(),
        }
    }
}

impl ContestEditorConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    /// Whether the theme is a dark one.
    pub fn is_dark(&self) -> bool {
        !self.theme.contains("light")
    }

    /// Container height in host units.
    pub fn total_height(&self) -> u32 {
        parse_height(&self.height)
    }

    /// Side panel widths.
    pub fn side_panel_width(&self) -> SidePanelWidth {
        SidePanelWidth {
            expanded: self.tab_panel_width,
            rail: self.tab_rail_width,
        }
    }

    /// Submit button label for the current state.
    pub fn submit_label(&self, submitting: bool) -> &str {
        if submitting {
            &self.submitting_button_text
        } else {
            &self.submit_button_text
        }
    }
}

/// Content of one contest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestDefinition {
    /// Files loaded into the editor.
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    /// Problem statement and hints.
    #[serde(default)]
    pub contest: ContestInfo,
    /// Transcript shown before the first command.
    #[serde(default, alias = "terminalHistory")]
    pub initial_history: Vec<TranscriptEntry>,
    /// Custom tabs; the default Info / Test Cases pair when absent.
    #[serde(default)]
    pub tabs: Option<Vec<TabDescriptor>>,
}

impl ContestDefinition {
    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read and parse a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read(path.as_ref())?)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::EntryKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ContestEditorConfig::default();
        assert_eq!(config.total_height(), 600);
        assert_eq!(config.terminal_header_height, 40);
        assert!(config.is_dark());
        assert_eq!(config.submit_label(false), "Submit");
        assert_eq!(config.submit_label(true), "Submitting...");
        assert_eq!(ContestEditorConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_toml_overrides() {
        let config = ContestEditorConfig::from_toml_str(
            r#"
            theme = "github-light"
            height = "720px"
            terminal_prompt = "> "
            terminal_read_only = true
            "#,
        )
        .unwrap();
        assert!(!config.is_dark());
        assert_eq!(config.total_height(), 720);
        assert_eq!(config.terminal_prompt, "> ");
        assert!(config.terminal_read_only);
        assert_eq!(config.terminal_title, "Terminal");
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(
            ContestEditorConfig::from_toml_str("height = 12 ="),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ContestEditorConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_contest_definition_json() {
        let contest = ContestDefinition::from_json_str(
            r##"{
                "files": [{"filename": "main.py", "language": "python", "content": "print(1)"}],
                "contest": {"problem": [{"type": "Markdown", "content": "# A + B"}]},
                "terminalHistory": [{"type": "system", "content": "Welcome"}]
            }"##,
        )
        .unwrap();
        assert_eq!(contest.files.len(), 1);
        assert_eq!(contest.initial_history[0].kind, EntryKind::System);
        assert!(contest.tabs.is_none());
    }
}
