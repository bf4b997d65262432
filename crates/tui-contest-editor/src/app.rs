//! Application state, key handling and rendering.

use contest_editor_core::{
    ContestEditor, DetailLine, EntryKind, JudgeError, MemorySurface, Motion, SubmissionTicket,
    SurfaceError, TabContent, TextSurface, Verdict,
    report::{EMPTY_REPORT_TEXT, EMPTY_REPORT_TITLE},
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::commands::{CLEAR_COMMAND, SUBMIT_COMMAND};

type Judged = (SubmissionTicket, Result<Verdict, JudgeError>);

/// Which pane receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Terminal,
    Tabs,
}

struct Palette {
    text: Color,
    dim: Color,
    accent: Color,
    highlight: Color,
    pass: Color,
    fail: Color,
}

impl Palette {
    fn new(dark: bool) -> Self {
        if dark {
            Self {
                text: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                highlight: Color::Rgb(60, 60, 20),
                pass: Color::Green,
                fail: Color::LightRed,
            }
        } else {
            Self {
                text: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                highlight: Color::Rgb(255, 245, 180),
                pass: Color::Green,
                fail: Color::Red,
            }
        }
    }
}

/// The terminal frontend.
pub struct App {
    editor: ContestEditor<MemorySurface>,
    runtime: Handle,
    verdict_tx: UnboundedSender<Judged>,
    verdict_rx: UnboundedReceiver<Judged>,
    palette: Palette,
    focus: Focus,
    input: String,
    editor_scroll: usize,
    transcript_offset: usize,
    selected_row: usize,
    clipboard: String,
    status_message: String,
    container_height: u16,
    /// Set when the user asked to quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(mut editor: ContestEditor<MemorySurface>, runtime: Handle) -> Self {
        editor.on_tab_change(|index, tab| info!(index, label = %tab.label, "tab changed"));
        editor.on_tab_panel_fold_change(|folded| debug!(folded, "tab panel fold changed"));
        editor.on_terminal_fold_change(|folded| debug!(folded, "terminal fold changed"));

        let (verdict_tx, verdict_rx) = mpsc::unbounded_channel();
        let palette = Palette::new(editor.config().is_dark());
        Self {
            editor,
            runtime,
            verdict_tx,
            verdict_rx,
            palette,
            focus: Focus::Editor,
            input: String::new(),
            editor_scroll: 0,
            transcript_offset: 0,
            selected_row: 0,
            clipboard: String::new(),
            status_message: String::new(),
            container_height: 0,
            should_quit: false,
        }
    }

    pub fn handle_paste(&mut self, text: String) {
        match self.focus {
            Focus::Editor => {
                let result = self.editor.surface_mut().insert(&text.replace("\r\n", "\n"));
                self.report_surface_error(result);
            }
            Focus::Terminal if !self.editor.config().terminal_read_only => {
                self.input.extend(text.chars().filter(|c| !c.is_control()));
            }
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => self.should_quit = true,
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.submit(),
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
                self.editor.control().toggle_terminal_fold();
                if self.editor.is_terminal_folded() && self.focus == Focus::Terminal {
                    self.focus = Focus::Editor;
                }
            }
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => {
                self.editor.toggle_tab_panel_fold();
                if self.editor.is_tab_panel_folded() && self.focus == Focus::Tabs {
                    self.focus = Focus::Editor;
                }
            }
            (KeyModifiers::CONTROL, KeyCode::Char('n')) => self.cycle_file(true),
            (KeyModifiers::CONTROL, KeyCode::Char('p')) => self.cycle_file(false),
            (KeyModifiers::CONTROL, KeyCode::Char('k')) => self.copy_transcript(),
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => self.editor.control().clear_transcript(),
            (_, KeyCode::Tab) => self.cycle_focus(),
            (_, KeyCode::F(n)) if n >= 1 => {
                let index = usize::from(n - 1);
                if !self.editor.control().switch_tab(index) {
                    self.status_message = format!("no tab F{n}");
                }
            }
            _ => match self.focus {
                Focus::Editor => self.handle_editor_key(key),
                Focus::Terminal => self.handle_terminal_key(key),
                Focus::Tabs => self.handle_tabs_key(key),
            },
        }
    }

    fn cycle_focus(&mut self) {
        let order = [Focus::Editor, Focus::Terminal, Focus::Tabs];
        let start = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        for step in 1..=order.len() {
            let next = order[(start + step) % order.len()];
            let available = match next {
                Focus::Editor => true,
                Focus::Terminal => !self.editor.is_terminal_folded(),
                Focus::Tabs => !self.editor.is_tab_panel_folded(),
            };
            if available {
                self.focus = next;
                return;
            }
        }
    }

    fn cycle_file(&mut self, forward: bool) {
        let count = self.editor.surface().buffer_count();
        if count == 0 {
            return;
        }
        let current = self.editor.surface().selected();
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.editor.surface_mut().select(next);
        self.editor_scroll = 0;
        self.editor.refresh();
    }

    fn copy_transcript(&mut self) {
        self.clipboard = self.editor.transcript().plain_text();
        self.status_message = format!("Copied {} lines", self.editor.transcript().len());
    }

    fn report_surface_error(&mut self, result: Result<(), SurfaceError>) {
        if let Err(err) = result {
            self.status_message = err.to_string();
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let surface = self.editor.surface_mut();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                let result = surface.insert(c.encode_utf8(&mut [0; 4]));
                self.report_surface_error(result);
            }
            KeyCode::Enter => {
                let result = surface.insert_newline();
                self.report_surface_error(result);
            }
            KeyCode::Backspace => {
                let result = surface.backspace().map(|_| ());
                self.report_surface_error(result);
            }
            KeyCode::Left => surface.move_cursor(Motion::Left),
            KeyCode::Right => surface.move_cursor(Motion::Right),
            KeyCode::Up => surface.move_cursor(Motion::Up),
            KeyCode::Down => surface.move_cursor(Motion::Down),
            KeyCode::Home => surface.move_cursor(Motion::LineStart),
            KeyCode::End => surface.move_cursor(Motion::LineEnd),
            KeyCode::PageUp => (0..10).for_each(|_| surface.move_cursor(Motion::Up)),
            KeyCode::PageDown => (0..10).for_each(|_| surface.move_cursor(Motion::Down)),
            _ => {}
        }
    }

    fn handle_terminal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if !self.editor.config().terminal_read_only {
                    self.input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.run_terminal_command(),
            KeyCode::PageUp => self.transcript_offset += 5,
            KeyCode::PageDown => self.transcript_offset = self.transcript_offset.saturating_sub(5),
            _ => {}
        }
    }

    fn handle_tabs_key(&mut self, key: KeyEvent) {
        let active = self.editor.tabs().active_index();
        match key.code {
            KeyCode::Left if active > 0 => {
                self.editor.control().switch_tab(active - 1);
            }
            KeyCode::Right => {
                self.editor.control().switch_tab(active + 1);
            }
            KeyCode::Up => self.selected_row = self.selected_row.saturating_sub(1),
            KeyCode::Down => {
                let rows = self.editor.report().rows().len();
                if self.selected_row + 1 < rows {
                    self.selected_row += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.editor.tabs().active_tab().map(|t| t.content.clone()) {
                Some(TabContent::TestCases) => {
                    let row = self.selected_row;
                    self.editor.report_mut().toggle_expanded(row);
                }
                Some(TabContent::Info) => {
                    self.editor.info_panel_mut().toggle_hint();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn run_terminal_command(&mut self) {
        let input = std::mem::take(&mut self.input);
        if input.trim() == CLEAR_COMMAND {
            self.editor.control().clear_transcript();
            return;
        }
        if self.editor.handle_terminal_command(&input) && input.trim() == SUBMIT_COMMAND {
            self.submit();
        }
    }

    /// Start a submission; the verdict arrives later through [`App::poll_verdicts`].
    pub fn submit(&mut self) {
        let ticket = match self.editor.begin_submission() {
            Ok(ticket) => ticket,
            Err(err) => {
                self.status_message = err.to_string();
                return;
            }
        };

        let backend = self.editor.backend();
        let files = ticket.files().to_vec();
        let tx = self.verdict_tx.clone();
        self.runtime.spawn(async move {
            let outcome = backend.submit(files).await;
            if tx.send((ticket, outcome)).is_err() {
                warn!("verdict dropped: the editor has shut down");
            }
        });
        self.status_message = self.editor.submit_label().to_string();
    }

    /// Apply verdicts that arrived since the last call.
    pub fn poll_verdicts(&mut self) {
        while let Ok((ticket, outcome)) = self.verdict_rx.try_recv() {
            self.selected_row = 0;
            self.status_message = match self.editor.finish_submission(ticket, outcome) {
                Ok(Verdict::Evaluated { .. }) => self.editor.report().summary(),
                Ok(Verdict::CompileFailure { .. }) => "Compilation error".to_string(),
                Ok(Verdict::JudgeError { message }) => message,
                Err(err) => format!("Submission failed: {err}"),
            };
        }
    }

    /// Track the container height and re-lay out on change.
    pub fn on_resize(&mut self, container_height: u16) {
        if container_height != self.container_height {
            self.container_height = container_height;
            self.editor.on_container_resize(u32::from(container_height));
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(size);
        let container = chunks[0];
        self.on_resize(container.height);

        let side_width = cells(self.editor.side_panel_width()).min(container.width / 2);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(side_width), Constraint::Min(1)])
            .split(container);

        let heights = self.editor.heights();
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(cells(heights.editor)),
                Constraint::Length(cells(heights.terminal)),
            ])
            .split(columns[1]);

        self.render_tab_panel(frame, columns[0]);
        self.render_editor(frame, right[0]);
        self.render_terminal(frame, right[1]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);

        // New entries are on screen now; the next frame shows the tail.
        if self.editor.transcript_mut().take_scroll_request() {
            self.transcript_offset = 0;
        }
    }

    fn pane_block(&self, focus: Focus) -> Block<'static> {
        let border = if self.focus == focus {
            self.palette.accent
        } else {
            self.palette.dim
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
    }

    fn render_tab_panel(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 {
            return;
        }
        let tabs = self.editor.tabs();
        let active = tabs.active_index();
        let block = self.pane_block(Focus::Tabs);

        if self.editor.is_tab_panel_folded() {
            let lines: Vec<Line> = tabs
                .tabs()
                .iter()
                .enumerate()
                .map(|(index, tab)| {
                    let style = if index == active {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default().fg(self.palette.dim)
                    };
                    Line::from(Span::styled(tab.icon.clone(), style))
                })
                .collect();
            frame.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let mut title = Vec::new();
        for (index, tab) in tabs.tabs().iter().enumerate() {
            let style = if index == active {
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.palette.dim)
            };
            title.push(Span::styled(format!(" {} ", tab.label), style));
        }

        let lines = match tabs.active_tab().map(|tab| &tab.content) {
            Some(TabContent::Info) => self.info_lines(),
            Some(TabContent::TestCases) => self.report_lines(),
            Some(TabContent::Text(text)) => text.lines().map(|l| Line::from(l.to_string())).collect(),
            None => Vec::new(),
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(block.title(Line::from(title)))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn info_lines(&self) -> Vec<Line<'static>> {
        let panel = self.editor.info_panel();
        let info = panel.info();
        let mut lines: Vec<Line> = info
            .problem_blocks()
            .flat_map(|block| block.content.lines().map(|l| Line::from(l.to_string())))
            .collect();

        if info.has_hints() {
            lines.push(Line::default());
            let marker = if panel.hint_expanded() { "▾" } else { "▸" };
            lines.push(Line::from(Span::styled(
                format!("{marker} Hint"),
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            if panel.hint_expanded() {
                lines.extend(
                    info.hint_blocks()
                        .flat_map(|block| block.content.lines().map(|l| Line::from(format!("  {l}")))),
                );
            }
        }
        lines
    }

    fn report_lines(&self) -> Vec<Line<'static>> {
        let report = self.editor.report();
        if report.is_empty() {
            return vec![
                Line::from(Span::styled(
                    EMPTY_REPORT_TITLE,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(EMPTY_REPORT_TEXT, Style::default().fg(self.palette.dim))),
            ];
        }

        let summary_color = if report.all_passed() {
            self.palette.pass
        } else {
            self.palette.fail
        };
        let mut lines = vec![
            Line::from(Span::styled(
                report.summary(),
                Style::default()
                    .fg(summary_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];

        for (index, row) in report.rows().iter().enumerate() {
            let (marker, color) = if row.is_pass {
                ("✓", self.palette.pass)
            } else {
                ("✗", self.palette.fail)
            };
            let mut title_style = Style::default().fg(self.palette.text);
            if self.focus == Focus::Tabs && index == self.selected_row {
                title_style = title_style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(color)),
                Span::styled(row.title.clone(), title_style),
            ]));
            if row.hidden {
                if let Some(description) = &row.description {
                    lines.push(Line::from(Span::styled(
                        format!("  {description}"),
                        Style::default().fg(self.palette.dim),
                    )));
                }
                continue;
            }
            if !report.is_expanded(index) {
                continue;
            }
            for detail in row.detail_lines() {
                let text_style = match &detail {
                    DetailLine::ReceivedOutput { matches: false, .. } | DetailLine::Error(_) => {
                        Style::default().fg(self.palette.fail)
                    }
                    _ => Style::default().fg(self.palette.text),
                };
                if let Some(label) = detail.label() {
                    lines.push(Line::from(Span::styled(
                        format!("  {label}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                }
                lines.extend(
                    detail
                        .text()
                        .lines()
                        .map(|l| Line::from(Span::styled(format!("    {l}"), text_style))),
                );
            }
        }
        lines
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let surface = self.editor.surface();
        let selected = surface.selected();

        let mut title = Vec::new();
        for (index, file) in self.editor.files().iter().enumerate() {
            let mut style = Style::default().fg(self.palette.dim);
            if index == selected {
                style = Style::default()
                    .fg(self.palette.text)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            let lock = if file.lock { " 🔒" } else { "" };
            title.push(Span::styled(format!(" {}{lock} ", file.filename), style));
        }
        let button_style = if self.editor.is_submitting() {
            Style::default().fg(self.palette.dim)
        } else {
            Style::default()
                .fg(self.palette.pass)
                .add_modifier(Modifier::BOLD)
        };
        let button = Line::from(Span::styled(
            format!("[ {} ]", self.editor.submit_label()),
            button_style,
        ))
        .right_aligned();

        let block = self
            .pane_block(Focus::Editor)
            .title(Line::from(title))
            .title_top(button);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let viewport = usize::from(inner.height);
        let cursor = surface.cursor();
        if cursor.line < self.editor_scroll {
            self.editor_scroll = cursor.line;
        } else if cursor.line >= self.editor_scroll + viewport {
            self.editor_scroll = cursor.line + 1 - viewport;
        }

        let surface = self.editor.surface();
        let file = surface.file(selected);
        let line_count = surface.line_count(selected);
        let gutter = line_count.max(1).to_string().len() + 1;
        let highlighted = surface.highlighted_lines(selected);

        let lines: Vec<Line> = (self.editor_scroll..line_count.min(self.editor_scroll + viewport))
            .map(|line| {
                let text = surface.line(selected, line).unwrap_or_default();
                let editable = file.is_some_and(|f| f.is_line_editable(line));
                let mut style = Style::default().fg(if editable {
                    self.palette.text
                } else {
                    self.palette.dim
                });
                if highlighted.contains(&(line + 1)) {
                    style = style.bg(self.palette.highlight);
                }
                Line::from(vec![
                    Span::styled(
                        format!("{:>width$} ", line + 1, width = gutter - 1),
                        Style::default().fg(self.palette.dim),
                    ),
                    Span::styled(text, style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if self.focus == Focus::Editor {
            let prefix: String = surface
                .line(selected, cursor.line)
                .unwrap_or_default()
                .chars()
                .take(cursor.column)
                .collect();
            let x = inner.x + cells_usize(gutter + prefix.width());
            let y = inner.y + cells_usize(cursor.line - self.editor_scroll);
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), y));
        }
    }

    fn render_terminal(&mut self, frame: &mut Frame, area: Rect) {
        let config = self.editor.config();
        let folded = self.editor.is_terminal_folded();
        let marker = if folded { "▸" } else { "▾" };
        let block = self
            .pane_block(Focus::Terminal)
            .title(format!(" {marker} {} ", config.terminal_title));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if folded || inner.height == 0 {
            return;
        }

        let read_only = config.terminal_read_only;
        let history_rows = usize::from(inner.height) - usize::from(!read_only);

        let mut lines: Vec<Line> = Vec::new();
        for entry in self.editor.transcript().entries() {
            let style = match entry.kind {
                EntryKind::Output => Style::default().fg(self.palette.text),
                EntryKind::Error => Style::default().fg(self.palette.fail),
                EntryKind::Command => Style::default().fg(self.palette.accent),
                EntryKind::System => Style::default()
                    .fg(self.palette.dim)
                    .add_modifier(Modifier::ITALIC),
            };
            lines.extend(
                entry
                    .content
                    .split('\n')
                    .map(|l| Line::from(Span::styled(l.to_string(), style))),
            );
        }

        self.transcript_offset = self
            .transcript_offset
            .min(lines.len().saturating_sub(history_rows));
        let end = lines.len() - self.transcript_offset;
        let start = end.saturating_sub(history_rows);
        let visible: Vec<Line> = lines.drain(start..end).collect();
        frame.render_widget(
            Paragraph::new(visible),
            Rect {
                height: cells_usize(history_rows),
                ..inner
            },
        );

        if !read_only {
            let prompt = &self.editor.config().terminal_prompt;
            let input_area = Rect {
                y: inner.bottom() - 1,
                height: 1,
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(prompt.clone(), Style::default().fg(self.palette.accent)),
                    Span::raw(self.input.clone()),
                ])),
                input_area,
            );
            if self.focus == Focus::Terminal {
                let x = input_area.x + cells_usize(prompt.width() + self.input.width());
                frame.set_cursor_position((x.min(input_area.right().saturating_sub(1)), input_area.y));
            }
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let surface = self.editor.surface();
        let cursor = surface.cursor();
        let state = if self.editor.is_submitting() {
            " | submitting"
        } else {
            ""
        };

        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "{:?} | file {}/{} | Ln {} Col {}{}",
                self.focus,
                surface.selected() + 1,
                surface.buffer_count(),
                cursor.line + 1,
                cursor.column + 1,
                state
            )
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "Ctrl-S:Submit  Ctrl-X:Quit  Tab:Focus  F1-F9:Tabs  Ctrl-T:Terminal  Ctrl-B:Panel  Ctrl-N/P:File  Ctrl-K:Copy  Ctrl-L:Clear";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn cells(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn cells_usize(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::demo_commands;
    use crate::judge::demo_judge;
    use contest_editor_core::{
        ContestDefinition, ContestEditorConfig, FileDescriptor, TestCase, TranscriptEntry,
    };
    use crossterm::event::KeyEventState;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    impl App {
        fn editor(&self) -> &ContestEditor<MemorySurface> {
            &self.editor
        }

        fn focus(&self) -> Focus {
            self.focus
        }

        fn status_message(&self) -> &str {
            &self.status_message
        }

        fn clipboard(&self) -> &str {
            &self.clipboard
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    fn app(runtime: &tokio::runtime::Runtime, verdict: Verdict) -> App {
        let contest = ContestDefinition {
            files: vec![FileDescriptor::new("main.cpp", "cpp", "int main() {}\n")],
            ..ContestDefinition::default()
        };
        let config = ContestEditorConfig {
            tab_panel_width: 30,
            tab_rail_width: 4,
            terminal_header_height: 2,
            ..ContestEditorConfig::default()
        };
        let editor = ContestEditor::new(
            config,
            contest,
            MemorySurface::new(),
            demo_judge(Some(verdict), Duration::ZERO),
        )
        .with_command_handler(demo_commands(vec!["main.cpp".into()]));
        App::new(editor, runtime.handle().clone())
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_terminal_command_echo() {
        let runtime = runtime();
        let mut app = app(&runtime, Verdict::evaluated(vec![]));
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Terminal);

        for c in "echo hi".chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
        app.handle_key_event(key(KeyCode::Enter));

        let contents: Vec<&str> = app
            .editor()
            .transcript()
            .entries()
            .iter()
            .map(|entry| entry.content.as_str())
            .collect();
        assert_eq!(contents, vec!["$ echo hi", "hi"]);
        assert!(screen(&mut app).contains("$ echo hi"));
    }

    #[test]
    fn test_submission_round_trip_through_channel() {
        let runtime = runtime();
        let mut app = app(
            &runtime,
            Verdict::evaluated(vec![TestCase::new("a", true), TestCase::new("b", true)]),
        );
        app.handle_key_event(ctrl('s'));
        assert!(app.editor().is_submitting());
        assert!(screen(&mut app).contains("[ Submitting... ]"));

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while app.editor().is_submitting() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            app.poll_verdicts();
        }

        assert!(!app.editor().is_submitting());
        assert_eq!(app.status_message(), "2/2 Tests Passed");
        assert_eq!(app.editor().tabs().active_index(), 1);
        assert!(screen(&mut app).contains("2/2 Tests Passed"));
    }

    #[test]
    fn test_fold_toggles_move_focus() {
        let runtime = runtime();
        let mut app = app(&runtime, Verdict::evaluated(vec![]));
        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(ctrl('t'));
        assert!(app.editor().is_terminal_folded());
        assert_eq!(app.focus(), Focus::Editor);

        app.handle_key_event(ctrl('b'));
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Editor);
    }

    #[test]
    fn test_copy_and_clear_transcript() {
        let runtime = runtime();
        let mut app = app(&runtime, Verdict::evaluated(vec![]));
        app.handle_key_event(key(KeyCode::Tab));
        app.handle_paste("echo copied".to_string());
        app.handle_key_event(key(KeyCode::Enter));

        app.handle_key_event(ctrl('k'));
        assert_eq!(app.clipboard(), "$ echo copied\ncopied");
        assert_eq!(app.status_message(), "Copied 2 lines");

        app.handle_key_event(ctrl('l'));
        assert!(app.editor().transcript().is_empty());
    }

    #[test]
    fn test_new_entries_scroll_to_tail_after_render() {
        let runtime = runtime();
        let mut app = app(&runtime, Verdict::evaluated(vec![]));
        app.editor
            .control()
            .add_transcript_entries((0..20).map(|i| TranscriptEntry::output(format!("line {i}"))));
        screen(&mut app);

        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::PageUp));
        screen(&mut app);
        assert_eq!(app.transcript_offset, 5);

        app.editor.control().add_transcript_entry(TranscriptEntry::output("tail"));
        let before = screen(&mut app);
        assert!(!before.contains("tail"));
        assert_eq!(app.transcript_offset, 0);
        assert!(screen(&mut app).contains("tail"));
    }

    #[test]
    fn test_editing_keys() {
        let runtime = runtime();
        let mut app = app(&runtime, Verdict::evaluated(vec![]));
        app.handle_key_event(key(KeyCode::End));
        app.handle_key_event(key(KeyCode::Backspace));
        app.handle_key_event(key(KeyCode::Backspace));
        for c in "{ return 0; }".chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
        assert_eq!(
            app.editor().surface().text(0).as_deref(),
            Some("int main() { return 0; }\n")
        );
    }
}
