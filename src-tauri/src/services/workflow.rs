use crate::error::AppError;
use crate::models::classify_types::ClassifyOutput;
use crate::models::history_types::HistoryItem;
use crate::services::classifier::Classifier;
use crate::services::history_service::HistoryStore;
use crate::services::image_service;
use crate::services::telemetry_service::{self, LogEntry, TelemetrySink};
use futures::future::{AbortHandle, Abortable};
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowStatus {
    Idle,
    Pending,
    Success(ClassifyOutput),
    Error(AppError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// Classified and recorded in history.
    Completed(HistoryItem),
    Failed(AppError),
    /// A classification was already in flight.
    Ignored,
    /// `reset()` ran before the result arrived.
    Discarded,
}

/// Status and displayed item, read together.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSnapshot {
    pub status: WorkflowStatus,
    /// History item whose report is on screen.
    pub active_id: Option<String>,
}

struct Inner {
    status: WorkflowStatus,
    active_id: Option<String>,
    generation: u64,
    abort: Option<AbortHandle>,
}

/// Capture -> classify -> record, one request at a time.
pub struct ClassificationWorkflow {
    classifier: Arc<dyn Classifier>,
    telemetry: Arc<dyn TelemetrySink>,
    history: HistoryStore,
    inner: Mutex<Inner>,
}

impl ClassificationWorkflow {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        telemetry: Arc<dyn TelemetrySink>,
        history: HistoryStore,
    ) -> Self {
        Self {
            classifier,
            telemetry,
            history,
            inner: Mutex::new(Inner {
                status: WorkflowStatus::Idle,
                active_id: None,
                generation: 0,
                abort: None,
            }),
        }
    }

    pub fn status(&self) -> WorkflowStatus {
        self.lock().status.clone()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let inner = self.lock();
        WorkflowSnapshot {
            status: inner.status.clone(),
            active_id: inner.active_id.clone(),
        }
    }

    /// Put a past result on screen.
    pub fn show(&self, id: String) {
        self.lock().active_id = Some(id);
    }

    /// Take `id` off screen if it is the one shown.
    pub fn hide(&self, id: &str) {
        let mut inner = self.lock();
        if inner.active_id.as_deref() == Some(id) {
            inner.active_id = None;
        }
    }

    pub fn hide_all(&self) {
        self.lock().active_id = None;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.lock().status, WorkflowStatus::Pending)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Run one classification for `path`. Triggers while one is pending are ignored.
    pub async fn trigger(&self, path: &Path) -> TriggerOutcome {
        let (generation, registration) = {
            let mut inner = self.lock();
            if matches!(inner.status, WorkflowStatus::Pending) {
                tracing::debug!("Classification already pending, ignoring trigger");
                return TriggerOutcome::Ignored;
            }
            let (handle, registration) = AbortHandle::new_pair();
            inner.generation += 1;
            inner.status = WorkflowStatus::Pending;
            inner.abort = Some(handle);
            (inner.generation, registration)
        };

        tracing::info!(path = %path.display(), "Classification started");
        let outcome = Abortable::new(self.run(path), registration).await;

        let item = {
            let mut inner = self.lock();
            if inner.generation != generation {
                tracing::debug!("Classification result discarded after reset");
                return TriggerOutcome::Discarded;
            }
            inner.abort = None;

            match outcome {
                Err(_aborted) => {
                    inner.status = WorkflowStatus::Idle;
                    return TriggerOutcome::Discarded;
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "Classification failed");
                    inner.status = WorkflowStatus::Error(err.clone());
                    drop(inner);
                    telemetry_service::report(
                        self.telemetry.clone(),
                        LogEntry::new("A mutation has failed", json!({ "error": err })),
                    );
                    return TriggerOutcome::Failed(err);
                }
                Ok(Ok(output)) => {
                    // Recorded, shown and marked successful in one step.
                    let item = self.history.insert(
                        output.image_data_url.clone(),
                        output.result.clone(),
                        output.top_predictions.clone(),
                    );
                    tracing::info!(
                        class = %output.result.class_name,
                        confidence = output.result.confidence,
                        "Classification finished"
                    );
                    telemetry_service::report(
                        self.telemetry.clone(),
                        LogEntry::new(
                            "Classification successful",
                            json!({ "topPredictions": output.top_predictions }),
                        ),
                    );
                    inner.active_id = Some(item.id.clone());
                    inner.status = WorkflowStatus::Success(output);
                    item
                }
            }
        };

        self.history.persist().await;
        TriggerOutcome::Completed(item)
    }

    /// Back to idle from any state with nothing shown. An in-flight request
    /// is aborted and its result, should it still arrive, is dropped.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        if let Some(handle) = inner.abort.take() {
            handle.abort();
        }
        inner.status = WorkflowStatus::Idle;
        inner.active_id = None;
    }

    async fn run(&self, path: &Path) -> Result<ClassifyOutput, AppError> {
        let captured = image_service::capture(path).await?;
        let classification = self.classifier.classify(&captured.base64).await?;
        Ok(ClassifyOutput {
            result: classification.result,
            top_predictions: classification.top_predictions,
            image_data_url: captured.data_url,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
