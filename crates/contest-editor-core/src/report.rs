//! View model for the "Test Cases" tab.
//!
//! The report reorders the last submission's cases (visible ones first, then hidden ones) and
//! strips everything but the pass flag from hidden cases, so no frontend can leak their
//! input, output or description by accident.

use std::collections::BTreeSet;

use crate::verdict::TestCase;

/// Description shown for every hidden test case.
pub const HIDDEN_TEST_DESCRIPTION: &str = "This test case is hidden and cannot be expanded.";
/// Empty-state heading.
pub const EMPTY_REPORT_TITLE: &str = "No Test Results";
/// Empty-state body.
pub const EMPTY_REPORT_TEXT: &str = "Test results will appear here after you run your code.";

/// One displayable row of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseRow {
    /// Title (`"Hidden Test {n}"` for hidden cases).
    pub title: String,
    /// Whether the case passed.
    pub is_pass: bool,
    /// Hidden rows carry no detail and cannot be expanded.
    pub hidden: bool,
    /// Description (the fixed hidden text for hidden cases).
    pub description: Option<String>,
    /// Execution time in milliseconds.
    pub execution_time_ms: Option<f64>,
    /// Program input.
    pub stdin: Option<String>,
    /// Expected output.
    pub expected_stdout: Option<String>,
    /// Received output.
    pub stdout: Option<String>,
    /// Error output.
    pub stderr: Option<String>,
}

impl TestCaseRow {
    fn visible(case: &TestCase) -> Self {
        Self {
            title: case.title.clone(),
            is_pass: case.is_pass,
            hidden: false,
            description: case.description.clone(),
            execution_time_ms: case.execution_time_ms(),
            stdin: case.stdin.clone(),
            expected_stdout: case.expected_stdout.clone(),
            stdout: case.stdout.clone(),
            stderr: case.stderr.clone(),
        }
    }

    fn hidden(case: &TestCase, ordinal: usize) -> Self {
        Self {
            title: format!("Hidden Test {ordinal}"),
            is_pass: case.is_pass,
            hidden: true,
            description: Some(HIDDEN_TEST_DESCRIPTION.to_string()),
            execution_time_ms: None,
            stdin: None,
            expected_stdout: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Whether received output equals the expected output.
    pub fn output_matches(&self) -> bool {
        self.stdout == self.expected_stdout
    }

    /// Detail lines for an expanded row. Hidden rows have none.
    pub fn detail_lines(&self) -> Vec<DetailLine> {
        if self.hidden {
            return Vec::new();
        }

        let mut lines = Vec::new();
        if let Some(description) = &self.description {
            lines.push(DetailLine::Description(description.clone()));
        }
        if let Some(ms) = self.execution_time_ms {
            lines.push(DetailLine::ExecutionTime(format!("Execution Time: {ms} ms")));
        }
        if let Some(stdin) = &self.stdin {
            lines.push(DetailLine::Input(stdin.clone()));
        }
        if let Some(expected) = &self.expected_stdout {
            lines.push(DetailLine::ExpectedOutput(expected.clone()));
        }
        if let Some(stdout) = &self.stdout {
            lines.push(DetailLine::ReceivedOutput {
                text: stdout.clone(),
                matches: self.output_matches(),
            });
        }
        if let Some(stderr) = &self.stderr {
            lines.push(DetailLine::Error(stderr.clone()));
        }
        lines
    }
}

/// A labelled detail block of an expanded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLine {
    /// Free description.
    Description(String),
    /// Pre-formatted execution time.
    ExecutionTime(String),
    /// "Input:" block.
    Input(String),
    /// "Expected Output:" block.
    ExpectedOutput(String),
    /// "Received Output:" block, flagged when it differs from the expectation.
    ReceivedOutput {
        /// Output text.
        text: String,
        /// Whether it equals the expected output.
        matches: bool,
    },
    /// "Error:" block.
    Error(String),
}

impl DetailLine {
    /// Label shown in front of the block, if any.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            DetailLine::Description(_) | DetailLine::ExecutionTime(_) => None,
            DetailLine::Input(_) => Some("Input:"),
            DetailLine::ExpectedOutput(_) => Some("Expected Output:"),
            DetailLine::ReceivedOutput { .. } => Some("Received Output:"),
            DetailLine::Error(_) => Some("Error:"),
        }
    }

    /// Block text.
    pub fn text(&self) -> &str {
        match self {
            DetailLine::Description(text)
            | DetailLine::ExecutionTime(text)
            | DetailLine::Input(text)
            | DetailLine::ExpectedOutput(text)
            | DetailLine::Error(text)
            | DetailLine::ReceivedOutput { text, .. } => text,
        }
    }
}

/// Test-case list with per-row expansion state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCaseReport {
    rows: Vec<TestCaseRow>,
    expanded: BTreeSet<usize>,
}

impl TestCaseReport {
    /// Build the report for a submission's cases.
    pub fn new(cases: &[TestCase]) -> Self {
        let visible = cases.iter().filter(|case| !case.hidden).map(TestCaseRow::visible);
        let hidden = cases
            .iter()
            .filter(|case| case.hidden)
            .enumerate()
            .map(|(index, case)| TestCaseRow::hidden(case, index + 1));
        Self {
            rows: visible.chain(hidden).collect(),
            expanded: BTreeSet::new(),
        }
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[TestCaseRow] {
        &self.rows
    }

    /// Returns `true` when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of passing cases.
    pub fn passed(&self) -> usize {
        self.rows.iter().filter(|row| row.is_pass).count()
    }

    /// Total number of cases.
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Whether every case passed.
    pub fn all_passed(&self) -> bool {
        self.rows.iter().all(|row| row.is_pass)
    }

    /// `"{passed}/{total} Tests Passed"`.
    pub fn summary(&self) -> String {
        format!("{}/{} Tests Passed", self.passed(), self.total())
    }

    /// Toggle a row open or closed. Hidden and out-of-range rows are ignored.
    pub fn toggle_expanded(&mut self, index: usize) -> bool {
        match self.rows.get(index) {
            Some(row) if !row.hidden => {
                if !self.expanded.remove(&index) {
                    self.expanded.insert(index);
                }
                true
            }
            _ => false,
        }
    }

    /// Whether a row is expanded.
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn secret(stdin: &str) -> TestCase {
        TestCase {
            title: "secret".into(),
            description: Some("tricky".into()),
            is_pass: false,
            stdin: Some(stdin.into()),
            stdout: Some("x".into()),
            stderr: Some("trace".into()),
            hidden: true,
            ..TestCase::default()
        }
    }

    #[test]
    fn test_hidden_cases_are_redacted_and_sorted_last() {
        let cases = vec![
            secret("42"),
            TestCase::new("sample 1", true),
            secret("7"),
            TestCase::new("sample 2", false),
        ];
        let report = TestCaseReport::new(&cases);

        let titles: Vec<&str> = report.rows().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["sample 1", "sample 2", "Hidden Test 1", "Hidden Test 2"]
        );

        for row in report.rows().iter().filter(|r| r.hidden) {
            assert_eq!(row.stdin, None);
            assert_eq!(row.stdout, None);
            assert_eq!(row.stderr, None);
            assert_eq!(row.description.as_deref(), Some(HIDDEN_TEST_DESCRIPTION));
            assert!(row.detail_lines().is_empty());
        }
    }

    #[test]
    fn test_hidden_rows_do_not_expand() {
        let mut report = TestCaseReport::new(&[TestCase::new("a", true), secret("1")]);
        assert!(report.toggle_expanded(0));
        assert!(report.is_expanded(0));
        assert!(report.toggle_expanded(0));
        assert!(!report.is_expanded(0));

        assert!(!report.toggle_expanded(1));
        assert!(!report.is_expanded(1));
        assert!(!report.toggle_expanded(9));
    }

    #[test]
    fn test_summary_and_details() {
        let case = TestCase {
            title: "sum".into(),
            is_pass: false,
            execution_time: Some(2_500_000),
            stdin: Some("1 2".into()),
            stdout: Some("4".into()),
            expected_stdout: Some("3".into()),
            ..TestCase::default()
        };
        let report = TestCaseReport::new(&[case, TestCase::new("ok", true)]);
        assert_eq!(report.summary(), "1/2 Tests Passed");
        assert!(!report.all_passed());

        let details = report.rows()[0].detail_lines();
        assert_eq!(
            details,
            vec![
                DetailLine::ExecutionTime("Execution Time: 2.5 ms".into()),
                DetailLine::Input("1 2".into()),
                DetailLine::ExpectedOutput("3".into()),
                DetailLine::ReceivedOutput {
                    text: "4".into(),
                    matches: false
                },
            ]
        );
        assert_eq!(details[3].label(), Some("Received Output:"));
    }

    #[test]
    fn test_empty_report() {
        let report = TestCaseReport::new(&[]);
        assert!(report.is_empty());
        assert!(report.all_passed());
        assert_eq!(report.summary(), "0/0 Tests Passed");
    }
}
