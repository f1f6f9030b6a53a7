use std::sync::Mutex;

use tracing::info;

/// Lifecycle of a generation run; each event fires once, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Connecting,
    FetchingSchema,
    Generating { tables: usize },
    Done,
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Connecting => info!(event = "connecting", "connecting to database"),
            ProgressEvent::FetchingSchema => info!(event = "fetching_schema", "reading catalog"),
            ProgressEvent::Generating { tables } => {
                info!(event = "generating", tables, "generating schemas")
            }
            ProgressEvent::Done => info!(event = "done", "generation finished"),
        }
    }
}

/// Records events for later inspection.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
