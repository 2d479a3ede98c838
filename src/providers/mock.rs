//! Mock vision provider for testing.
//!
//! Provides deterministic, queue-based outcomes so unit and e2e tests can
//! exercise the fallback chain and the pipeline without any network calls.
//! Call counters let tests assert that no request was attempted when no
//! credential is available.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, SketchError};
use crate::traits::{SketchImage, VisionProvider};

/// One scripted outcome of a describe or narrate call.
#[derive(Debug, Clone)]
enum MockOutcome {
    Text(String),
    Timeout,
    ApiError(String),
    Empty,
}

/// Mock vision backend with scripted outcomes.
///
/// When a queue runs dry the provider keeps repeating its last outcome, so a
/// single `fail_describe_with_timeout()` is enough to model a dead backend.
#[derive(Debug, Clone)]
pub struct MockVision {
    name: String,
    describe_outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    narrate_outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    describe_calls: Arc<AtomicUsize>,
    narrate_calls: Arc<AtomicUsize>,
    narration_capable: bool,
}

impl MockVision {
    /// Create a mock provider with the given name and no scripted outcomes.
    /// Unscripted describe calls return a placeholder description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            describe_outcomes: Arc::new(Mutex::new(Vec::new())),
            narrate_outcomes: Arc::new(Mutex::new(Vec::new())),
            describe_calls: Arc::new(AtomicUsize::new(0)),
            narrate_calls: Arc::new(AtomicUsize::new(0)),
            narration_capable: false,
        }
    }

    /// Enable the narration capability (comic-mode story generation).
    pub fn with_narration(mut self) -> Self {
        self.narration_capable = true;
        self
    }

    /// Queue a successful description.
    pub fn queue_description(&self, text: impl Into<String>) {
        self.push_describe(MockOutcome::Text(text.into()));
    }

    /// Queue a timeout failure for the next describe call.
    pub fn fail_describe_with_timeout(&self) {
        self.push_describe(MockOutcome::Timeout);
    }

    /// Queue an API error for the next describe call.
    pub fn fail_describe_with_api_error(&self, body: impl Into<String>) {
        self.push_describe(MockOutcome::ApiError(body.into()));
    }

    /// Queue a successful-but-empty response for the next describe call.
    pub fn queue_empty_description(&self) {
        self.push_describe(MockOutcome::Empty);
    }

    /// Queue a successful story.
    pub fn queue_story(&self, text: impl Into<String>) {
        self.push_narrate(MockOutcome::Text(text.into()));
    }

    /// Queue an API error for the next narrate call.
    pub fn fail_narrate_with_api_error(&self, body: impl Into<String>) {
        self.push_narrate(MockOutcome::ApiError(body.into()));
    }

    /// Number of describe calls made against this provider.
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Number of narrate calls made against this provider.
    pub fn narrate_calls(&self) -> usize {
        self.narrate_calls.load(Ordering::SeqCst)
    }

    // Queue locks are only held across a push or a pop; a poisoned lock
    // still yields the queue rather than losing a scripted outcome.
    fn lock(queue: &Mutex<Vec<MockOutcome>>) -> MutexGuard<'_, Vec<MockOutcome>> {
        queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push_describe(&self, outcome: MockOutcome) {
        Self::lock(&self.describe_outcomes).push(outcome);
    }

    fn push_narrate(&self, outcome: MockOutcome) {
        Self::lock(&self.narrate_outcomes).push(outcome);
    }

    fn resolve(&self, outcome: MockOutcome) -> Result<String> {
        match outcome {
            MockOutcome::Text(text) => Ok(text),
            MockOutcome::Timeout => Err(SketchError::Timeout),
            MockOutcome::ApiError(body) => Err(SketchError::ApiError(body)),
            MockOutcome::Empty => Err(SketchError::EmptyDescription(self.name.clone())),
        }
    }

    fn next(&self, queue: &Mutex<Vec<MockOutcome>>, fallback: MockOutcome) -> MockOutcome {
        let mut outcomes = Self::lock(queue);
        if outcomes.is_empty() {
            fallback
        } else if outcomes.len() == 1 {
            // Keep repeating the final outcome for later calls.
            outcomes[0].clone()
        } else {
            outcomes.remove(0)
        }
    }
}

#[async_trait]
impl VisionProvider for MockVision {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock-vision"
    }

    async fn describe(&self, _image: &SketchImage, _instruction: &str) -> Result<String> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.next(
            &self.describe_outcomes,
            MockOutcome::Text("Mock sketch description".to_string()),
        );
        self.resolve(outcome)
    }

    fn supports_narration(&self) -> bool {
        self.narration_capable
    }

    async fn narrate(&self, _instruction: &str) -> Result<String> {
        if !self.narration_capable {
            return Err(SketchError::NotSupported("narration".to_string()));
        }
        self.narrate_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.next(
            &self.narrate_outcomes,
            MockOutcome::Text("Mock story".to_string()),
        );
        self.resolve(outcome)
    }
}
