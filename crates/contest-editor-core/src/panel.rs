//! Fold state for the collapsible panels (side tab panel and terminal).
//!
//! Each panel owns one [`FoldState`]. A host may mirror it through change callbacks, or drive
//! it by supplying a controlled value; a controlled value always wins when the state is read.

use tracing::debug;

/// Fold change callback (`true` = folded).
pub type FoldChangeCallback = Box<dyn FnMut(bool) + Send>;

/// Which foldable panel a state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    /// The side tab panel.
    TabPanel,
    /// The terminal under the editor.
    Terminal,
}

/// Folded/unfolded state of one panel plus its observers.
pub struct FoldState {
    kind: PanelKind,
    folded: bool,
    controlled: Option<bool>,
    callbacks: Vec<FoldChangeCallback>,
}

impl std::fmt::Debug for FoldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldState")
            .field("kind", &self.kind)
            .field("folded", &self.folded)
            .field("controlled", &self.controlled)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl FoldState {
    /// Create an unfolded panel state.
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            folded: false,
            controlled: None,
            callbacks: Vec::new(),
        }
    }

    /// Effective fold state (controlled value first).
    pub fn is_folded(&self) -> bool {
        self.controlled.unwrap_or(self.folded)
    }

    /// Supply or release a host-controlled fold value. Does not notify.
    pub fn set_controlled(&mut self, controlled: Option<bool>) {
        self.controlled = controlled;
    }

    /// Register a fold change observer.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Set the fold state. Returns `true` and notifies observers only if the state changed.
    pub fn set_folded(&mut self, folded: bool) -> bool {
        if self.is_folded() == folded {
            return false;
        }
        self.apply(folded);
        true
    }

    /// Flip the fold state, notify observers, and return the new value.
    pub fn toggle(&mut self) -> bool {
        let next = !self.is_folded();
        self.apply(next);
        next
    }

    fn apply(&mut self, folded: bool) {
        self.folded = folded;
        debug!(panel = ?self.kind, folded, "panel fold changed");
        for callback in &mut self.callbacks {
            callback(folded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording(state: &mut FoldState) -> Arc<Mutex<Vec<bool>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        state.subscribe(move |folded| sink.lock().unwrap().push(folded));
        seen
    }

    #[test]
    fn test_double_toggle_restores_state_with_two_notifications() {
        let mut state = FoldState::new(PanelKind::Terminal);
        let seen = recording(&mut state);

        assert!(state.toggle());
        assert!(!state.toggle());
        assert!(!state.is_folded());
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_set_folded_only_notifies_on_change() {
        let mut state = FoldState::new(PanelKind::TabPanel);
        let seen = recording(&mut state);

        assert!(!state.set_folded(false));
        assert!(state.set_folded(true));
        assert!(!state.set_folded(true));
        assert_eq!(*seen.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_controlled_value_wins() {
        let mut state = FoldState::new(PanelKind::Terminal);
        state.set_controlled(Some(true));
        assert!(state.is_folded());

        // Toggling is computed from the effective value.
        assert!(!state.toggle());
        assert!(state.is_folded(), "host has not released control yet");

        state.set_controlled(None);
        assert!(!state.is_folded());
    }
}
