//! The contest editor composite.
//!
//! [`ContestEditor`] owns every piece of widget state (transcript, panel layout, tab
//! navigation, both fold states, submission lifecycle, test results and contest info) and
//! keeps them consistent:
//!
//! - a terminal fold transition recomputes the panel heights and re-lays out the surface;
//! - a container resize does the same;
//! - a judge outcome is turned into transcript lines, an optional terminal unfold and a switch
//!   to the test results tab.
//!
//! Frontends read the state through accessors and drive it through the same methods the
//! host-facing [`ControlHandle`] uses.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::backend::JudgeBackend;
use crate::command::{CommandHandler, CommandResponse, normalize_command};
use crate::config::{ContestDefinition, ContestEditorConfig};
use crate::control::ControlHandle;
use crate::error::{JudgeError, SubmitError};
use crate::files::FileDescriptor;
use crate::info::InfoPanel;
use crate::layout::{PanelHeights, PanelLayout, SidePanelWidth};
use crate::panel::{FoldState, PanelKind};
use crate::report::TestCaseReport;
use crate::submission::{
    Interpretation, SubmissionCoordinator, SubmissionSession, SubmissionTicket, submitting_message,
};
use crate::surface::TextSurface;
use crate::tabs::{TEST_CASES_TAB_LABEL, TabDescriptor, TabNavigator, default_tabs};
use crate::transcript::{TranscriptEntry, TranscriptStore};
use crate::verdict::Verdict;

/// Returns the in-flight submission to `Idle` if the awaiting future is dropped.
struct AbandonOnDrop<'a> {
    coordinator: &'a mut SubmissionCoordinator,
    id: u64,
    armed: bool,
}

impl AbandonOnDrop<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.abandon(self.id);
        }
    }
}

/// A contest coding widget: editor surface, terminal, side tabs and submission workflow.
pub struct ContestEditor<S: TextSurface> {
    config: ContestEditorConfig,
    files: Vec<FileDescriptor>,
    surface: S,
    transcript: TranscriptStore,
    layout: PanelLayout,
    side_panel_width: SidePanelWidth,
    tabs: TabNavigator,
    tab_panel: FoldState,
    terminal: FoldState,
    coordinator: SubmissionCoordinator,
    report: TestCaseReport,
    info: InfoPanel,
    backend: Arc<dyn JudgeBackend>,
    command_handler: Option<Box<dyn CommandHandler>>,
    external_submitting: bool,
}

impl<S: TextSurface> ContestEditor<S> {
    /// Create an editor, loading the contest files into `surface`.
    pub fn new(
        config: ContestEditorConfig,
        contest: ContestDefinition,
        mut surface: S,
        backend: Arc<dyn JudgeBackend>,
    ) -> Self {
        let ContestDefinition {
            files,
            contest,
            initial_history,
            tabs,
        } = contest;

        let layout = PanelLayout::new(config.total_height(), config.terminal_header_height);
        surface.load(&files);
        surface.relayout(layout.heights().editor);

        Self {
            side_panel_width: config.side_panel_width(),
            tabs: TabNavigator::new(tabs.unwrap_or_else(default_tabs), config.initial_active_tab),
            config,
            files,
            surface,
            transcript: TranscriptStore::with_history(initial_history),
            layout,
            tab_panel: FoldState::new(PanelKind::TabPanel),
            terminal: FoldState::new(PanelKind::Terminal),
            coordinator: SubmissionCoordinator::new(),
            report: TestCaseReport::default(),
            info: InfoPanel::new(contest),
            backend,
            command_handler: None,
            external_submitting: false,
        }
    }

    /// Builder-style: handle terminal commands with `handler`.
    pub fn with_command_handler<H>(mut self, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        self.command_handler = Some(Box::new(handler));
        self
    }

    /// Observe tab changes.
    pub fn on_tab_change<F>(&mut self, callback: F)
    where
        F: FnMut(usize, &TabDescriptor) + Send + 'static,
    {
        self.tabs.subscribe(callback);
    }

    /// Observe side panel fold changes.
    pub fn on_tab_panel_fold_change<F>(&mut self, callback: F)
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.tab_panel.subscribe(callback);
    }

    /// Observe terminal fold changes.
    pub fn on_terminal_fold_change<F>(&mut self, callback: F)
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.terminal.subscribe(callback);
    }

    /// The host-facing control handle.
    pub fn control(&mut self) -> ControlHandle<'_, S> {
        ControlHandle::new(self)
    }

    /// Presentation options.
    pub fn config(&self) -> &ContestEditorConfig {
        &self.config
    }

    /// Files as loaded (metadata; live text lives in the surface).
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// The editing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the editing surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The terminal transcript.
    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    /// Mutable access to the transcript (scroll requests, history replacement).
    pub fn transcript_mut(&mut self) -> &mut TranscriptStore {
        &mut self.transcript
    }

    /// Current editor and terminal heights.
    pub fn heights(&self) -> PanelHeights {
        self.layout.heights()
    }

    /// Current side panel width.
    pub fn side_panel_width(&self) -> u32 {
        self.side_panel_width.width(self.tab_panel.is_folded())
    }

    /// Tab navigation state.
    pub fn tabs(&self) -> &TabNavigator {
        &self.tabs
    }

    /// Test results of the last submission.
    pub fn report(&self) -> &TestCaseReport {
        &self.report
    }

    /// Mutable access to the test results (row expansion).
    pub fn report_mut(&mut self) -> &mut TestCaseReport {
        &mut self.report
    }

    /// Info tab state.
    pub fn info_panel(&self) -> &InfoPanel {
        &self.info
    }

    /// Mutable access to the info tab state.
    pub fn info_panel_mut(&mut self) -> &mut InfoPanel {
        &mut self.info
    }

    /// Most recent submission session.
    pub fn session(&self) -> &SubmissionSession {
        self.coordinator.session()
    }

    /// Returns `true` while waiting for the judge.
    pub fn is_submitting(&self) -> bool {
        self.coordinator.is_submitting()
    }

    /// Mirror a submission the host runs itself into the submit button.
    ///
    /// Only the label follows this flag; coordinator submissions are unaffected.
    pub fn set_external_submitting(&mut self, submitting: bool) {
        self.external_submitting = submitting;
    }

    /// Whether the host reported its own submission in flight.
    pub fn is_externally_submitting(&self) -> bool {
        self.external_submitting
    }

    /// Submit button label for the current state.
    pub fn submit_label(&self) -> &str {
        self.config
            .submit_label(self.external_submitting || self.is_submitting())
    }

    /// A handle to the judge backend.
    pub fn backend(&self) -> Arc<dyn JudgeBackend> {
        Arc::clone(&self.backend)
    }

    /// Whether the side panel is folded.
    pub fn is_tab_panel_folded(&self) -> bool {
        self.tab_panel.is_folded()
    }

    /// Whether the terminal is folded.
    pub fn is_terminal_folded(&self) -> bool {
        self.terminal.is_folded()
    }

    /// Activate tab `index`; out-of-range indices are ignored.
    pub fn switch_tab(&mut self, index: usize) -> bool {
        self.tabs.switch_to(index)
    }

    /// Drive the active tab from the host; `None` hands control back.
    pub fn set_controlled_active_tab(&mut self, index: Option<usize>) {
        self.tabs.set_controlled(index);
    }

    /// Fold or unfold the side panel.
    pub fn toggle_tab_panel_fold(&mut self) -> bool {
        self.tab_panel.toggle()
    }

    /// Drive the side panel fold state from the host.
    pub fn set_controlled_tab_panel_fold(&mut self, folded: Option<bool>) {
        self.tab_panel.set_controlled(folded);
    }

    /// Fold or unfold the terminal and re-lay out.
    pub fn toggle_terminal_fold(&mut self) -> bool {
        let folded = self.terminal.toggle();
        self.sync_terminal_layout();
        folded
    }

    /// Set the terminal fold state; returns `true` if it changed.
    pub fn set_terminal_folded(&mut self, folded: bool) -> bool {
        let changed = self.terminal.set_folded(folded);
        if changed {
            self.sync_terminal_layout();
        }
        changed
    }

    /// Drive the terminal fold state from the host.
    pub fn set_controlled_terminal_fold(&mut self, folded: Option<bool>) {
        self.terminal.set_controlled(folded);
        self.sync_terminal_layout();
    }

    /// The container was resized to `total_height`.
    pub fn on_container_resize(&mut self, total_height: u32) -> PanelHeights {
        let heights = self.layout.set_total_height(total_height);
        debug!(total_height, editor = heights.editor, terminal = heights.terminal, "container resized");
        self.surface.relayout(heights.editor);
        heights
    }

    /// Force a surface re-layout with the current heights.
    pub fn refresh(&mut self) {
        self.surface.relayout(self.layout.heights().editor);
    }

    /// Highlight 1-based `lines` of `filename`, switching the surface to it.
    pub fn highlight(&mut self, filename: &str, lines: &[usize]) -> bool {
        self.surface.highlight(filename, lines)
    }

    fn sync_terminal_layout(&mut self) {
        let heights = self.layout.set_terminal_folded(self.terminal.is_folded());
        self.surface.relayout(heights.editor);
    }

    /// Process typed terminal input.
    ///
    /// Returns `false` when nothing was run: blank input, or a read-only terminal.
    pub fn handle_terminal_command(&mut self, input: &str) -> bool {
        if self.config.terminal_read_only {
            warn!("terminal is read-only, ignoring input");
            return false;
        }
        let Some(command) = normalize_command(input) else {
            return false;
        };

        self.transcript.append(TranscriptEntry::command(format!(
            "{}{}",
            self.config.terminal_prompt, command
        )));
        debug!(command, "terminal command");

        if let Some(handler) = self.command_handler.as_mut() {
            let response = handler.handle(command);
            self.deliver_command_response(response);
        }
        true
    }

    /// Append a (possibly deferred) command reply as output lines.
    pub fn deliver_command_response(&mut self, response: impl Into<CommandResponse>) {
        self.transcript.append_all(
            response
                .into()
                .into_lines()
                .into_iter()
                .map(TranscriptEntry::output),
        );
    }

    /// Start a submission of the current surface contents.
    ///
    /// Clears the previous test results and appends the timestamped progress line.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, SubmitError> {
        let ticket = self.coordinator.begin(self.surface.contents())?;
        self.report = TestCaseReport::default();
        let time = Local::now().format("%H:%M:%S").to_string();
        self.transcript
            .append(TranscriptEntry::output(submitting_message(&time)));
        Ok(ticket)
    }

    /// Complete a submission with the backend's outcome.
    ///
    /// Backend failures are written to the transcript and then returned as
    /// [`SubmitError::Judge`]. A ticket that is not the in-flight submission changes nothing.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<Verdict, JudgeError>,
    ) -> Result<Verdict, SubmitError> {
        let interpretation = self.coordinator.finish(&ticket, &outcome)?;
        self.apply(interpretation);
        outcome.map_err(SubmitError::from)
    }

    /// Submit the current surface contents and wait for the verdict.
    pub async fn submit(&mut self) -> Result<Verdict, SubmitError> {
        let ticket = self.begin_submission()?;
        let backend = Arc::clone(&self.backend);
        let files = ticket.files().to_vec();

        let guard = AbandonOnDrop {
            coordinator: &mut self.coordinator,
            id: ticket.id(),
            armed: true,
        };
        let outcome = backend.submit(files).await;
        guard.disarm();

        self.finish_submission(ticket, outcome)
    }

    fn apply(&mut self, interpretation: Interpretation) {
        let Interpretation {
            entries,
            unfold_terminal,
            show_test_cases,
            test_cases,
        } = interpretation;

        if unfold_terminal {
            self.set_terminal_folded(false);
        }
        self.transcript.append_all(entries);
        self.report = TestCaseReport::new(&test_cases);
        if show_test_cases {
            self.tabs.switch_to_label(TEST_CASES_TAB_LABEL);
        }
    }
}

impl<S: TextSurface + std::fmt::Debug> std::fmt::Debug for ContestEditor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContestEditor")
            .field("config", &self.config)
            .field("surface", &self.surface)
            .field("transcript", &self.transcript)
            .field("layout", &self.layout)
            .field("tabs", &self.tabs)
            .field("tab_panel", &self.tab_panel)
            .field("terminal", &self.terminal)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}
