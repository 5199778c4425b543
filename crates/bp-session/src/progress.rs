//! Progress reporting for object creation.
//!
//! Reporters are cosmetic: nothing in the engine depends on what they do.

use tracing::info;

/// Sink notified when an object's creation starts and finishes.
pub trait ProgressReporter: Send + Sync {
    fn step_started(&mut self, message: &str);

    fn step_completed(&mut self, message: &str);

    fn step_failed(&mut self, _message: &str) {}
}

/// Reports progress through `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn step_started(&mut self, message: &str) {
        info!(step = "started", "{message}");
    }

    fn step_completed(&mut self, message: &str) {
        info!(step = "completed", "{message}");
    }

    fn step_failed(&mut self, message: &str) {
        info!(step = "failed", "{message}");
    }
}

/// One event seen by a [`RecordingProgress`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(String),
    Completed(String),
    Failed(String),
}

/// Collects progress events in memory, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgress {
    events: std::sync::Arc<std::sync::Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn push(&self, event: ProgressEvent) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}

impl ProgressReporter for RecordingProgress {
    fn step_started(&mut self, message: &str) {
        self.push(ProgressEvent::Started(message.to_string()));
    }

    fn step_completed(&mut self, message: &str) {
        self.push(ProgressEvent::Completed(message.to_string()));
    }

    fn step_failed(&mut self, message: &str) {
        self.push(ProgressEvent::Failed(message.to_string()));
    }
}
