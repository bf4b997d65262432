//! Panel layout engine.
//!
//! The right-hand column of the contest editor stacks the editor surface over the terminal.
//! Its heights are derived from the container height and the terminal fold state:
//!
//! ```text
//! terminal = folded ? header_height : floor(total / 3)
//! editor   = total - terminal
//! ```
//!
//! The side tab panel does not take part in this computation; it only switches between an
//! expanded width and a narrow icon rail ([`SidePanelWidth`]).
//!
//! Units are whatever the host measures in: CSS pixels for a browser host, terminal rows for
//! the TUI frontend.

use serde::{Deserialize, Serialize};

/// Height of the terminal header strip used when the terminal is folded.
pub const DEFAULT_TERMINAL_HEADER_HEIGHT: u32 = 40;

/// Total height used when the host height cannot be parsed.
pub const DEFAULT_TOTAL_HEIGHT: u32 = 600;

/// Heights committed to the editor and terminal panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelHeights {
    /// Editor surface height.
    pub editor: u32,
    /// Terminal height (header only when folded).
    pub terminal: u32,
}

impl PanelHeights {
    /// Sum of both panels; always equals the total height it was computed from.
    pub fn total(&self) -> u32 {
        self.editor + self.terminal
    }
}

/// Compute panel heights for a total height and terminal fold state.
///
/// A header taller than the container is clamped to the container, so the invariant
/// `editor + terminal == total` holds for every input.
pub fn compute_heights(total_height: u32, terminal_folded: bool, header_height: u32) -> PanelHeights {
    let terminal = if terminal_folded {
        header_height.min(total_height)
    } else {
        total_height / 3
    };
    PanelHeights {
        editor: total_height - terminal,
        terminal,
    }
}

/// Parse a host height value such as `"600px"` or `"480"`.
///
/// Leading digits are taken (after optional whitespace); anything unparsable or zero falls
/// back to [`DEFAULT_TOTAL_HEIGHT`].
pub fn parse_height(value: &str) -> u32 {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_TOTAL_HEIGHT,
        Ok(height) => height,
    }
}

/// Stateful layout engine owned by one contest editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    total_height: u32,
    header_height: u32,
    terminal_folded: bool,
    heights: PanelHeights,
}

impl PanelLayout {
    /// Create a layout for an unfolded terminal.
    pub fn new(total_height: u32, header_height: u32) -> Self {
        Self {
            total_height,
            header_height,
            terminal_folded: false,
            heights: compute_heights(total_height, false, header_height),
        }
    }

    /// Current container height.
    pub fn total_height(&self) -> u32 {
        self.total_height
    }

    /// Configured folded-terminal header height.
    pub fn header_height(&self) -> u32 {
        self.header_height
    }

    /// Fold state the current heights were computed for.
    pub fn terminal_folded(&self) -> bool {
        self.terminal_folded
    }

    /// Currently committed heights.
    pub fn heights(&self) -> PanelHeights {
        self.heights
    }

    /// Record a container resize and recompute.
    pub fn set_total_height(&mut self, total_height: u32) -> PanelHeights {
        self.total_height = total_height;
        self.recompute()
    }

    /// Record a terminal fold transition and recompute.
    pub fn set_terminal_folded(&mut self, folded: bool) -> PanelHeights {
        self.terminal_folded = folded;
        self.recompute()
    }

    fn recompute(&mut self) -> PanelHeights {
        self.heights = compute_heights(self.total_height, self.terminal_folded, self.header_height);
        self.heights
    }
}

/// Horizontal sizing of the side tab panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePanelWidth {
    /// Width when unfolded.
    pub expanded: u32,
    /// Width of the icon rail shown when folded.
    pub rail: u32,
}

impl SidePanelWidth {
    /// Width for the given fold state.
    pub fn width(&self, folded: bool) -> u32 {
        if folded { self.rail } else { self.expanded }
    }
}
