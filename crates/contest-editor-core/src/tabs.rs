//! Side panel tabs and the tab navigation controller.
//!
//! The tab sequence is supplied by the host once and is not edited at runtime. The navigator
//! only owns *which* tab is active; whether the side panel is folded is a separate
//! [`crate::panel::FoldState`].

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label of the default contest information tab.
pub const INFO_TAB_LABEL: &str = "Info";
/// Label of the default test results tab; submissions switch to it when it exists.
pub const TEST_CASES_TAB_LABEL: &str = "Test Cases";

/// What a tab renders. Opaque to the navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum TabContent {
    /// Contest problem statement and hints.
    Info,
    /// Results of the last submission.
    TestCases,
    /// Host-provided text.
    Text(String),
}

/// One tab of the side panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    /// Lookup key and tab bar caption.
    pub label: String,
    /// Short icon glyph shown in the tab bar and on the folded rail.
    #[serde(default)]
    pub icon: String,
    /// Tooltip / panel heading.
    #[serde(default)]
    pub title: String,
    /// Tab body.
    pub content: TabContent,
}

impl TabDescriptor {
    /// Create a tab descriptor.
    pub fn new(
        label: impl Into<String>,
        icon: impl Into<String>,
        title: impl Into<String>,
        content: TabContent,
    ) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            title: title.into(),
            content,
        }
    }
}

/// The tabs used when the host does not supply its own.
pub fn default_tabs() -> Vec<TabDescriptor> {
    vec![
        TabDescriptor::new(INFO_TAB_LABEL, "i", "Contest Information", TabContent::Info),
        TabDescriptor::new(
            TEST_CASES_TAB_LABEL,
            "✓",
            "Test Cases",
            TabContent::TestCases,
        ),
    ]
}

/// Tab change callback, invoked with the new index and its descriptor.
pub type TabChangeCallback = Box<dyn FnMut(usize, &TabDescriptor) + Send>;

/// Active tab controller.
pub struct TabNavigator {
    tabs: Vec<TabDescriptor>,
    active: usize,
    controlled: Option<usize>,
    callbacks: Vec<TabChangeCallback>,
}

impl std::fmt::Debug for TabNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabNavigator")
            .field("tabs", &self.tabs)
            .field("active", &self.active)
            .field("controlled", &self.controlled)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl TabNavigator {
    /// Create a navigator; `initial_index` is taken as-is, like the host's initial prop.
    pub fn new(tabs: Vec<TabDescriptor>, initial_index: usize) -> Self {
        Self {
            tabs,
            active: initial_index,
            controlled: None,
            callbacks: Vec::new(),
        }
    }

    /// All tabs in bar order.
    pub fn tabs(&self) -> &[TabDescriptor] {
        &self.tabs
    }

    /// Number of tabs.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns `true` when there are no tabs.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Effective active index (controlled value first).
    pub fn active_index(&self) -> usize {
        self.controlled.unwrap_or(self.active)
    }

    /// Descriptor of the active tab, if the index is in range.
    pub fn active_tab(&self) -> Option<&TabDescriptor> {
        self.tabs.get(self.active_index())
    }

    /// Supply or release a host-controlled active index.
    pub fn set_controlled(&mut self, controlled: Option<usize>) {
        self.controlled = controlled;
    }

    /// Register a tab change observer.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(usize, &TabDescriptor) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Switch to `index`. Out-of-range indices are ignored and return `false`.
    pub fn switch_to(&mut self, index: usize) -> bool {
        let Some(tab) = self.tabs.get(index) else {
            debug!(index, tab_count = self.tabs.len(), "ignoring out-of-range tab switch");
            return false;
        };
        self.active = index;
        debug!(index, label = %tab.label, "active tab changed");
        for callback in &mut self.callbacks {
            callback(index, tab);
        }
        true
    }

    /// Switch to the first tab with this label.
    pub fn switch_to_label(&mut self, label: &str) -> bool {
        match self.position_of(label) {
            Some(index) => self.switch_to(index),
            None => false,
        }
    }

    /// Index of the first tab with this label.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.label == label)
    }

    /// Index of the first tab with this label, or `-1`.
    pub fn find_by_label(&self, label: &str) -> isize {
        self.position_of(label)
            .and_then(|index| isize::try_from(index).ok())
            .unwrap_or(-1)
    }
}
