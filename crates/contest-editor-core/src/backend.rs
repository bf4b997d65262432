//! Judge backend abstraction.
//!
//! The contest editor never talks to a judge directly. It hands a snapshot of the files to a
//! [`JudgeBackend`] and waits for exactly one outcome: a [`Verdict`] or a [`JudgeError`].
//! Transport, retries and timeouts are the backend's business.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::files::FileSnapshot;
use crate::verdict::Verdict;

/// The submission backend interface.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    /// Judge a set of files.
    async fn submit(&self, files: Vec<FileSnapshot>) -> Result<Verdict, JudgeError>;
}

/// Backend built from an async closure.
pub struct FnJudge<F> {
    f: F,
}

impl<F> FnJudge<F> {
    /// Wrap a closure `Fn(Vec<FileSnapshot>) -> impl Future<Output = Result<Verdict, JudgeError>>`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> JudgeBackend for FnJudge<F>
where
    F: Fn(Vec<FileSnapshot>) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Verdict, JudgeError>> + Send,
{
    async fn submit(&self, files: Vec<FileSnapshot>) -> Result<Verdict, JudgeError> {
        (self.f)(files).await
    }
}

/// Configurable judge for tests and demos.
///
/// Outcomes are queued and handed out in order; once the queue is empty the fallback outcome
/// is repeated. Every submission is recorded.
pub struct MockJudge {
    queue: Mutex<Vec<Result<Verdict, JudgeError>>>,
    fallback: Result<Verdict, JudgeError>,
    latency: Option<Duration>,
    calls: Mutex<Vec<Vec<FileSnapshot>>>,
}

impl MockJudge {
    /// A judge that always answers with `verdict`.
    pub fn accepting(verdict: Verdict) -> Self {
        Self::with_fallback(Ok(verdict))
    }

    /// A judge that always fails with `error`.
    pub fn failing(error: JudgeError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<Verdict, JudgeError>) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            fallback,
            latency: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-off outcome ahead of the fallback.
    pub fn then(self, outcome: Result<Verdict, JudgeError>) -> Self {
        match self.queue.lock() {
            Ok(mut queue) => queue.push(outcome),
            Err(poisoned) => poisoned.into_inner().push(outcome),
        }
        self
    }

    /// Sleep this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// All recorded submissions, oldest first.
    pub fn calls(&self) -> Vec<Vec<FileSnapshot>> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded submissions.
    pub fn call_count(&self) -> usize {
        match self.calls.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn next_outcome(&self) -> Result<Verdict, JudgeError> {
        let mut queue = match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if queue.is_empty() {
            self.fallback.clone()
        } else {
            queue.remove(0)
        }
    }
}

#[async_trait]
impl JudgeBackend for MockJudge {
    async fn submit(&self, files: Vec<FileSnapshot>) -> Result<Verdict, JudgeError> {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(files),
            Err(poisoned) => poisoned.into_inner().push(files),
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.next_outcome()
    }
}
