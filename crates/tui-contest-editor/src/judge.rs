//! Demo judges.
//!
//! The TUI never talks to a real judge. It either replays a verdict file (`--verdict`) or runs
//! [`SampleJudge`], which "compiles" by checking bracket balance and "runs" the A + B tests by
//! looking for a 64-bit integer type in the submission.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use contest_editor_core::{FileSnapshot, FnJudge, JudgeBackend, JudgeError, TestCase, Verdict};
use tracing::debug;

const WIDE_TYPES: [&str; 4] = ["long long", "int64_t", "i64", "int64"];

/// Build the judge for the given options.
pub fn demo_judge(verdict: Option<Verdict>, latency: Duration) -> Arc<dyn JudgeBackend> {
    match verdict {
        Some(verdict) => Arc::new(FnJudge::new(move |_files: Vec<FileSnapshot>| {
            let verdict = verdict.clone();
            async move {
                tokio::time::sleep(latency).await;
                Ok(verdict)
            }
        })),
        None => Arc::new(SampleJudge { latency }),
    }
}

/// Offline judge for the bundled A + B contest.
pub struct SampleJudge {
    latency: Duration,
}

#[async_trait]
impl JudgeBackend for SampleJudge {
    async fn submit(&self, files: Vec<FileSnapshot>) -> Result<Verdict, JudgeError> {
        tokio::time::sleep(self.latency).await;
        judge(&files)
    }
}

fn judge(files: &[FileSnapshot]) -> Result<Verdict, JudgeError> {
    if files.iter().all(|file| file.content.trim().is_empty()) {
        return Err(JudgeError::Rejected("empty submission".to_string()));
    }

    for file in files.iter().filter(|file| is_source(&file.filename)) {
        if let Some(problem) = unbalanced(&file.content) {
            debug!(filename = %file.filename, problem, "sample compile failure");
            return Ok(Verdict::CompileFailure {
                message: Some(format!("{}: {}", file.filename, problem)),
            });
        }
    }

    let wide = files
        .iter()
        .any(|file| WIDE_TYPES.iter().any(|ty| file.content.contains(ty)));

    Ok(Verdict::evaluated(vec![
        case("Sample 1", "1 2", "3", true, 1_204_000),
        case("Sample 2", "-5 5", "0", true, 1_187_500),
        case("Large values", "1000000000000000000 1", "1000000000000000001", wide, 1_310_250)
            .hidden(),
    ]))
}

fn case(title: &str, stdin: &str, expected: &str, pass: bool, nanos: u64) -> TestCase {
    TestCase {
        stdin: Some(stdin.to_string()),
        expected_stdout: Some(expected.to_string()),
        stdout: Some(if pass { expected.to_string() } else { "1410065409".to_string() }),
        execution_time: Some(nanos),
        ..TestCase::new(title, pass)
    }
}

fn is_source(filename: &str) -> bool {
    [".c", ".cc", ".cpp", ".h", ".hpp", ".rs", ".java", ".py"]
        .iter()
        .any(|ext| filename.ends_with(ext))
}

fn unbalanced(source: &str) -> Option<String> {
    let mut stack = Vec::new();
    for (line, text) in source.lines().enumerate() {
        for c in text.chars() {
            match c {
                '(' | '[' | '{' => stack.push((c, line + 1)),
                ')' | ']' | '}' => {
                    let open = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match stack.pop() {
                        Some((top, _)) if top == open => {}
                        _ => return Some(format!("line {}: unexpected '{c}'", line + 1)),
                    }
                }
                _ => {}
            }
        }
    }
    stack
        .pop()
        .map(|(c, line)| format!("line {line}: unclosed '{c}'"))
}
