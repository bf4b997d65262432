#![warn(missing_docs)]
//! Contest Editor Core - Headless Contest Coding Widget Kernel
//!
//! # Overview
//!
//! `contest-editor-core` holds the state and behavior of a contest coding widget: a multi-file
//! editor, a command terminal, a foldable side panel with tabs, and the submission workflow
//! that ties them together. It draws nothing; a frontend (such as the `tui-contest-editor`
//! binary) reads the state and forwards user input.
//!
//! # Core Features
//!
//! - **Submission Lifecycle**: `Idle -> Submitting -> Idle` with reentrancy rejection, stale
//!   ticket detection and cleanup when the awaiting future is dropped
//! - **Verdict Interpretation**: judge errors, compile failures and evaluations become
//!   transcript lines, terminal unfolds and a switch to the test results tab
//! - **Panel Layout**: editor/terminal heights from the container height and fold state
//! - **Tab Navigation**: index or label based, with host-controlled mode
//! - **Transcript**: append-only terminal log with deferred scroll requests
//! - **Text Surface**: rope-backed buffers enforcing locked files and read-only lines
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ControlHandle (host API)                   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  ContestEditor (composite state)            │  ← Orchestration
//! ├─────────────────────────────────────────────┤
//! │  SubmissionCoordinator + JudgeBackend       │  ← Submission
//! ├─────────────────────────────────────────────┤
//! │  Transcript · Layout · Tabs · FoldState     │  ← View State
//! ├─────────────────────────────────────────────┤
//! │  TextSurface (MemorySurface)                │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use contest_editor_core::{
//!     ContestDefinition, ContestEditor, ContestEditorConfig, FileDescriptor, MemorySurface,
//!     MockJudge, TestCase, Verdict,
//! };
//!
//! # tokio_test_block(async {
//! let judge = MockJudge::accepting(Verdict::evaluated(vec![TestCase::new("sample", true)]));
//! let contest = ContestDefinition {
//!     files: vec![FileDescriptor::new("main.py", "python", "print(input())\n")],
//!     ..ContestDefinition::default()
//! };
//! let mut editor = ContestEditor::new(
//!     ContestEditorConfig::default(),
//!     contest,
//!     MemorySurface::new(),
//!     Arc::new(judge),
//! );
//!
//! let verdict = editor.submit().await.unwrap();
//! assert!(verdict.is_accepted());
//! assert_eq!(editor.tabs().active_index(), 1);
//! assert_eq!(
//!     editor.transcript().last().unwrap().content,
//!     "✅ All test cases passed!"
//! );
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread()
//! #         .enable_all()
//! #         .build()
//! #         .unwrap()
//! #         .block_on(f)
//! # }
//! ```

pub mod backend;
pub mod command;
pub mod config;
pub mod contest;
pub mod control;
pub mod error;
pub mod files;
pub mod info;
pub mod layout;
pub mod panel;
pub mod report;
pub mod submission;
pub mod surface;
pub mod tabs;
pub mod transcript;
pub mod verdict;

pub use backend::{FnJudge, JudgeBackend, MockJudge};
pub use command::{CommandHandler, CommandResponse};
pub use config::{ContestDefinition, ContestEditorConfig};
pub use contest::ContestEditor;
pub use control::ControlHandle;
pub use error::{ConfigError, JudgeError, SubmitError, SurfaceError};
pub use files::{FileDescriptor, FileSnapshot};
pub use info::{BlockKind, ContentBlock, ContestInfo, InfoPanel};
pub use layout::{PanelHeights, PanelLayout, SidePanelWidth, compute_heights, parse_height};
pub use panel::{FoldState, PanelKind};
pub use report::{DetailLine, TestCaseReport, TestCaseRow};
pub use submission::{SubmissionCoordinator, SubmissionSession, SubmissionState, SubmissionTicket};
pub use surface::{MemorySurface, Motion, Position, TextSurface};
pub use tabs::{TabContent, TabDescriptor, TabNavigator, default_tabs};
pub use transcript::{EntryKind, TranscriptEntry, TranscriptStore};
pub use verdict::{TestCase, Verdict};
