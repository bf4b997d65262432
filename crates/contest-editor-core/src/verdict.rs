//! Judge verdicts.
//!
//! A judge answers a submission with one of three shapes:
//!
//! ```text
//! { error }                                              judge-reported error
//! { compile: { isPass: false }, error? }                 compile failure
//! { compile: { isPass: true }, evaluate: { isPass, testcases } }
//! ```
//!
//! The wire form is loosely typed, so [`Verdict`] deserializes through a raw struct and is
//! classified with a fixed precedence: a non-empty top-level `error` wins, then a failed (or
//! missing) compile stage, then the evaluation.

use serde::{Deserialize, Deserializer, Serialize};

/// A single judged test case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the case passed.
    #[serde(default)]
    pub is_pass: bool,
    /// Execution time in nanoseconds. Judges send either a number or a numeric string.
    #[serde(
        default,
        deserialize_with = "deserialize_execution_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_time: Option<u64>,
    /// Program input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
    /// Program output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// Expected program output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_stdout: Option<String>,
    /// Program error output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    /// Hidden cases only reveal pass/fail.
    #[serde(default)]
    pub hidden: bool,
}

impl TestCase {
    /// Create a visible test case with just a title and a result.
    pub fn new(title: impl Into<String>, is_pass: bool) -> Self {
        Self {
            title: title.into(),
            is_pass,
            ..Self::default()
        }
    }

    /// Builder-style: mark the case hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Execution time converted to milliseconds.
    pub fn execution_time_ms(&self) -> Option<f64> {
        self.execution_time.map(|ns| ns as f64 / 1_000_000.0)
    }
}

fn deserialize_execution_time<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(u64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Wire>::deserialize(deserializer)? {
        None => None,
        Some(Wire::Number(ns)) => Some(ns),
        Some(Wire::Float(ns)) if ns.is_finite() && ns >= 0.0 => Some(ns.trunc() as u64),
        Some(Wire::Float(_)) => None,
        Some(Wire::Text(text)) => {
            let digits: String = text
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStage {
    #[serde(default)]
    is_pass: bool,
    /// Compiler output; only read for a failed stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluate {
    #[serde(default)]
    is_pass: bool,
    #[serde(default)]
    testcases: Vec<TestCase>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawVerdict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compile: Option<RawStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    evaluate: Option<RawEvaluate>,
}

/// Classified judge response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVerdict", into = "RawVerdict")]
pub enum Verdict {
    /// The judge reported an error (opaque text, shown verbatim).
    JudgeError {
        /// Error text.
        message: String,
    },
    /// The submission did not compile.
    CompileFailure {
        /// Compiler output, when the judge sends it.
        message: Option<String>,
    },
    /// The submission compiled and was run against test cases.
    Evaluated {
        /// The judge's overall pass flag.
        all_passed: bool,
        /// Per-case results, in judge order.
        test_cases: Vec<TestCase>,
    },
}

impl From<RawVerdict> for Verdict {
    fn from(raw: RawVerdict) -> Self {
        let error = raw.error.filter(|message| !message.is_empty());
        if let Some(message) = error {
            return Verdict::JudgeError { message };
        }

        match raw.compile {
            Some(RawStage { is_pass: true, .. }) => {}
            Some(RawStage { error, .. }) => {
                return Verdict::CompileFailure {
                    message: error.filter(|message| !message.is_empty()),
                };
            }
            None => return Verdict::CompileFailure { message: None },
        }

        let evaluate = raw.evaluate.unwrap_or_default();
        Verdict::Evaluated {
            all_passed: evaluate.is_pass,
            test_cases: evaluate.testcases,
        }
    }
}

impl From<Verdict> for RawVerdict {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::JudgeError { message } => RawVerdict {
                error: Some(message),
                ..RawVerdict::default()
            },
            Verdict::CompileFailure { message } => RawVerdict {
                error: None,
                compile: Some(RawStage {
                    is_pass: false,
                    error: message,
                }),
                evaluate: None,
            },
            Verdict::Evaluated {
                all_passed,
                test_cases,
            } => RawVerdict {
                error: None,
                compile: Some(RawStage {
                    is_pass: true,
                    error: None,
                }),
                evaluate: Some(RawEvaluate {
                    is_pass: all_passed,
                    testcases: test_cases,
                }),
            },
        }
    }
}

impl Verdict {
    /// Parse a verdict from judge JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build an evaluated verdict whose overall flag is derived from the cases.
    pub fn evaluated(test_cases: Vec<TestCase>) -> Self {
        let all_passed = test_cases.iter().all(|case| case.is_pass);
        Verdict::Evaluated {
            all_passed,
            test_cases,
        }
    }

    /// Test cases of an evaluated verdict (empty otherwise).
    pub fn test_cases(&self) -> &[TestCase] {
        match self {
            Verdict::Evaluated { test_cases, .. } => test_cases,
            _ => &[],
        }
    }

    /// Number of passing test cases.
    pub fn passed_count(&self) -> usize {
        self.test_cases().iter().filter(|case| case.is_pass).count()
    }

    /// Returns `true` for an evaluated verdict with the overall pass flag set.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Evaluated { all_passed: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_top_level_error_takes_precedence() {
        let verdict = Verdict::from_json(
            r#"{"error":"SyntaxError: unexpected token","compile":{"isPass":true},"evaluate":{"isPass":true,"testcases":[]}}"#,
        )
        .unwrap();
        assert_eq!(
            verdict,
            Verdict::JudgeError {
                message: "SyntaxError: unexpected token".to_string()
            }
        );
    }

    #[test]
    fn test_empty_error_is_ignored() {
        let verdict =
            Verdict::from_json(r#"{"error":"","compile":{"isPass":false}}"#).unwrap();
        assert_eq!(verdict, Verdict::CompileFailure { message: None });
    }

    #[test]
    fn test_missing_compile_stage_is_a_compile_failure() {
        let verdict = Verdict::from_json(r#"{"evaluate":{"isPass":true,"testcases":[]}}"#).unwrap();
        assert_eq!(verdict, Verdict::CompileFailure { message: None });
    }

    #[test]
    fn test_evaluated_verdict() {
        let verdict = Verdict::from_json(
            r#"{
                "compile": {"isPass": true},
                "evaluate": {
                    "isPass": false,
                    "testcases": [
                        {"title": "sample", "isPass": true, "executionTime": "1500000", "stdin": "1 2", "stdout": "3", "expectedStdout": "3"},
                        {"title": "edge", "isPass": false, "executionTime": 2000000, "stderr": "panic"},
                        {"title": "secret", "isPass": true, "hidden": true}
                    ]
                }
            }"#,
        )
        .unwrap();

        assert!(!verdict.is_accepted());
        assert_eq!(verdict.passed_count(), 2);
        let cases = verdict.test_cases();
        assert_eq!(cases[0].execution_time, Some(1_500_000));
        assert_eq!(cases[0].execution_time_ms(), Some(1.5));
        assert_eq!(cases[1].execution_time, Some(2_000_000));
        assert_eq!(cases[1].stderr.as_deref(), Some("panic"));
        assert!(cases[2].hidden);
    }

    #[test]
    fn test_evaluate_missing_yields_empty_cases() {
        let verdict = Verdict::from_json(r#"{"compile":{"isPass":true}}"#).unwrap();
        assert_eq!(
            verdict,
            Verdict::Evaluated {
                all_passed: false,
                test_cases: Vec::new()
            }
        );
    }

    #[test]
    fn test_compile_failure_serializes_to_wire_shape() {
        let verdict = Verdict::CompileFailure {
            message: Some("main.c:1: error".to_string()),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"compile": {"isPass": false, "error": "main.c:1: error"}})
        );
    }

    #[test]
    fn test_compiler_output_is_read_from_compile_stage() {
        let verdict =
            Verdict::from_json(r#"{"compile":{"isPass":false,"error":"expected ';'"}}"#).unwrap();
        assert_eq!(
            verdict,
            Verdict::CompileFailure {
                message: Some("expected ';'".to_string())
            }
        );
    }

    #[test]
    fn test_every_variant_survives_serialization() {
        let verdicts = [
            Verdict::JudgeError {
                message: "judge offline".to_string(),
            },
            Verdict::CompileFailure {
                message: Some("main.c:1: error".to_string()),
            },
            Verdict::CompileFailure { message: None },
            Verdict::Evaluated {
                all_passed: false,
                test_cases: vec![
                    TestCase::new("sample", true),
                    TestCase {
                        execution_time: Some(2_000_000),
                        stderr: Some("panic".to_string()),
                        ..TestCase::new("edge", false)
                    },
                    TestCase::new("secret", true).hidden(),
                ],
            },
        ];
        for verdict in verdicts {
            let json = serde_json::to_string(&verdict).unwrap();
            assert_eq!(Verdict::from_json(&json).unwrap(), verdict, "{json}");
        }
    }
}
