use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::dashboard_types::{DashboardView, HistoryEntryView, StatusView};
use crate::models::history_types::HistoryItem;
use crate::services::history_service::HistoryStore;
use crate::services::image_service;
use crate::services::workflow::{ClassificationWorkflow, WorkflowSnapshot, WorkflowStatus};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Selection {
    file: Option<PathBuf>,
    preview_url: Option<String>,
    /// Read/decode failure of the last selected file.
    error: Option<AppError>,
}

/// State behind the dashboard screen. The frontend only ever renders
/// [`Dashboard::view`].
pub struct Dashboard {
    workflow: ClassificationWorkflow,
    selection: Mutex<Selection>,
    threshold: Mutex<u8>,
}

impl Dashboard {
    pub fn new(workflow: ClassificationWorkflow, config: &AppConfig) -> Self {
        Self {
            workflow,
            selection: Mutex::new(Selection::default()),
            threshold: Mutex::new(config.confidence_threshold.min(100)),
        }
    }

    pub fn workflow(&self) -> &ClassificationWorkflow {
        &self.workflow
    }

    fn history(&self) -> &HistoryStore {
        self.workflow.history()
    }

    /// Drop or browse. Non-images are refused with a read error.
    pub async fn select_file(&self, path: &Path) -> DashboardView {
        let captured = match tokio::fs::read(path).await {
            Ok(bytes) if image_service::is_image(&bytes) => {
                Ok(image_service::capture_bytes(path, &bytes))
            }
            Ok(_) => Err(AppError::Read(format!(
                "{} is not a supported image",
                path.display()
            ))),
            Err(e) => Err(AppError::Read(format!("{}: {}", path.display(), e))),
        };

        {
            let mut sel = self.lock_selection();
            match captured {
                Ok(image) => {
                    sel.file = Some(path.to_path_buf());
                    sel.preview_url = Some(image.data_url);
                    sel.error = None;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Rejected selected file");
                    sel.file = None;
                    sel.preview_url = None;
                    sel.error = Some(err);
                }
            }
        }
        self.view()
    }

    /// Show a past result. Its image becomes the preview; nothing is selected
    /// for analysis.
    pub fn preview_history_item(&self, id: &str) -> DashboardView {
        if let Some(item) = self.history().get(id) {
            let mut sel = self.lock_selection();
            sel.file = None;
            sel.error = None;
            sel.preview_url = Some(item.image_data_url);
            drop(sel);
            self.workflow.show(item.id);
        }
        self.view()
    }

    pub async fn analyze(&self) -> DashboardView {
        let file = self.lock_selection().file.clone();
        let Some(path) = file else {
            return self.view();
        };

        // A completed classification is made active by the workflow itself.
        self.workflow.trigger(&path).await;
        self.view()
    }

    /// Clear the selection and the current result; history is untouched.
    pub fn clear(&self) -> DashboardView {
        *self.lock_selection() = Selection::default();
        self.workflow.reset();
        self.view()
    }

    pub fn set_confidence_threshold(&self, threshold: u8) -> DashboardView {
        *self.lock_threshold() = threshold.min(100);
        self.view()
    }

    pub async fn remove_history_item(&self, id: &str) -> DashboardView {
        self.workflow.hide(id);
        self.history().remove(id).await;
        self.view()
    }

    pub async fn clear_history(&self) -> DashboardView {
        self.workflow.hide_all();
        self.history().clear().await;
        self.view()
    }

    pub fn view(&self) -> DashboardView {
        let threshold = *self.lock_threshold();
        let sel = self.lock_selection();
        let WorkflowSnapshot {
            status: workflow_status,
            active_id,
        } = self.workflow.snapshot();

        let status = match (&sel.error, &workflow_status) {
            (Some(err), _) => StatusView::Error {
                message: err.user_message(),
            },
            (None, WorkflowStatus::Idle) => StatusView::Idle,
            (None, WorkflowStatus::Pending) => StatusView::Pending,
            (None, WorkflowStatus::Success(_)) => StatusView::Success,
            (None, WorkflowStatus::Error(err)) => StatusView::Error {
                message: err.user_message(),
            },
        };
        let busy = matches!(status, StatusView::Pending | StatusView::Error { .. });

        let history = self.history().list();
        let active: Option<HistoryItem> = active_id
            .as_deref()
            .and_then(|id| history.iter().find(|item| item.id == id).cloned());
        let show_report = !busy
            && active
                .as_ref()
                .is_some_and(|item| item.result.confidence >= f64::from(threshold));

        let entries = history
            .iter()
            .map(|item| HistoryEntryView {
                id: item.id.clone(),
                timestamp: item.timestamp,
                image_data_url: item.image_data_url.clone(),
                display_name: item.result.class_name.replace('_', " "),
                confidence: item.result.confidence,
                is_healthy: item.result.is_healthy,
                is_active: active_id.as_deref() == Some(item.id.as_str()),
            })
            .collect();

        DashboardView {
            can_analyze: sel.file.is_some() && !matches!(workflow_status, WorkflowStatus::Pending),
            can_clear: sel.file.is_some() || active.is_some(),
            preview_url: sel.preview_url.clone(),
            confidence_threshold: threshold,
            status,
            active,
            show_report,
            history: entries,
        }
    }

    fn lock_selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_threshold(&self) -> MutexGuard<'_, u8> {
        self.threshold.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
