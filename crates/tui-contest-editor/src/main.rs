//! Terminal contest editor demo.
//!
//! Built with crossterm and ratatui on top of `contest-editor-core`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-contest-editor
//! cargo run -p tui-contest-editor -- --contest contest.json --config editor.toml
//! cargo run -p tui-contest-editor -- --verdict verdict.json --latency-ms 2000
//! ```
//!
//! Without `--contest` the bundled A + B problem is loaded. Without `--verdict` submissions go to
//! an offline sample judge; with it every submission gets the verdict from that file. Logs go to
//! `tui-contest-editor.log`, filtered by `RUST_LOG`.
//!
//! # Keys
//!
//! - Ctrl+S: submit
//! - Ctrl+X: quit
//! - Tab: cycle focus between editor, terminal and side panel
//! - F1..F9: switch side panel tab
//! - Ctrl+T: fold / unfold the terminal
//! - Ctrl+B: fold / unfold the side panel
//! - Ctrl+N / Ctrl+P: next / previous file
//! - Ctrl+K: copy the transcript
//! - Ctrl+L: clear the transcript
//! - In the terminal: type a command and press Enter (`help` lists them), PageUp/PageDown scroll
//! - In the side panel: Left/Right switch tab, Up/Down select a test case, Enter expands it

mod app;
mod commands;
mod judge;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use contest_editor_core::{ContestDefinition, ContestEditor, ContestEditorConfig, MemorySurface, Verdict};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const BUNDLED_CONTEST: &str = include_str!("../demo/contest.json");
const LOG_FILE: &str = "tui-contest-editor.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tui-contest-editor", version, about = "Terminal contest editor")]
struct Args {
    /// Contest definition (JSON). The bundled A + B problem when omitted.
    #[arg(long)]
    contest: Option<PathBuf>,
    /// Editor configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Replay this judge response (JSON) for every submission.
    #[arg(long)]
    verdict: Option<PathBuf>,
    /// Simulated judge latency.
    #[arg(long, default_value_t = 800)]
    latency_ms: u64,
    /// Directory for the log file.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn configure_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

/// Terminal cells, not pixels.
fn terminal_config() -> ContestEditorConfig {
    ContestEditorConfig {
        tab_panel_width: 42,
        tab_rail_width: 5,
        terminal_header_height: 2,
        ..ContestEditorConfig::default()
    }
}

fn load_editor(args: &Args) -> Result<ContestEditor<MemorySurface>> {
    let config = match &args.config {
        Some(path) => ContestEditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => terminal_config(),
    };
    let contest = match &args.contest {
        Some(path) => ContestDefinition::load(path)
            .with_context(|| format!("loading contest {}", path.display()))?,
        None => ContestDefinition::from_json_str(BUNDLED_CONTEST).context("bundled contest")?,
    };
    let verdict = match &args.verdict {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading verdict {}", path.display()))?;
            Some(Verdict::from_json(&json).with_context(|| format!("parsing verdict {}", path.display()))?)
        }
        None => None,
    };

    let filenames = contest.files.iter().map(|f| f.filename.clone()).collect();
    let backend = judge::demo_judge(verdict, Duration::from_millis(args.latency_ms));
    info!(files = contest.files.len(), theme = %config.theme, "contest loaded");

    Ok(ContestEditor::new(config, contest, MemorySurface::new(), backend)
        .with_command_handler(commands::demo_commands(filenames)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting the async runtime")?;
    let editor = load_editor(&args)?;
    let mut app = App::new(editor, runtime.handle().clone());

    // Set up the terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutdown");
    result.context("terminal loop")
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_verdicts();
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                // Next draw picks up the new size.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
