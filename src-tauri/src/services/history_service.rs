use crate::error::AppError;
use crate::models::classify_types::{ClassificationResult, TopPrediction};
use crate::models::history_types::HistoryItem;
use crate::services::db::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard};

pub const HISTORY_STORAGE_KEY: &str = "plant-disease-history";

/// Newest-first, capped log of past classifications.
///
/// The only writer of the persisted history. Every mutation re-serializes the
/// whole list under [`HISTORY_STORAGE_KEY`] on the blocking pool.
#[derive(Clone)]
pub struct HistoryStore {
    items: Arc<Mutex<Vec<HistoryItem>>>,
    storage: Arc<dyn KeyValueStore>,
    /// Held across snapshot and write so stored payloads land in mutation order.
    writer: Arc<tokio::sync::Mutex<()>>,
    cap: usize,
}

impl HistoryStore {
    /// Hydrate from storage. A corrupt or unreadable payload yields an empty history.
    pub fn open(storage: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        let mut items = match load(storage.as_ref()) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load history, starting empty");
                Vec::new()
            }
        };
        items.truncate(cap);

        Self {
            items: Arc::new(Mutex::new(items)),
            storage,
            writer: Arc::new(tokio::sync::Mutex::new(())),
            cap,
        }
    }

    pub async fn add(
        &self,
        image_data_url: String,
        result: ClassificationResult,
        top_predictions: Vec<TopPrediction>,
    ) -> HistoryItem {
        let item = self.insert(image_data_url, result, top_predictions);
        self.persist().await;
        item
    }

    /// Prepend a new item in memory only. Callers follow up with [`Self::persist`].
    pub fn insert(
        &self,
        image_data_url: String,
        result: ClassificationResult,
        top_predictions: Vec<TopPrediction>,
    ) -> HistoryItem {
        let item = HistoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            image_data_url,
            result,
            top_predictions,
        };

        let mut items = self.lock();
        items.insert(0, item.clone());
        items.truncate(self.cap);

        tracing::debug!(id = %item.id, len = items.len(), "History item added");
        item
    }

    pub fn list(&self) -> Vec<HistoryItem> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<HistoryItem> {
        self.lock().iter().find(|item| item.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// No-op when `id` is unknown.
    pub async fn remove(&self, id: &str) {
        let changed = {
            let mut items = self.lock();
            let before = items.len();
            items.retain(|item| item.id != id);
            items.len() != before
        };
        if changed {
            self.persist().await;
        }
    }

    pub async fn clear(&self) {
        self.lock().clear();
        self.persist().await;
    }

    /// Write the current list to storage. An empty list removes the key.
    pub async fn persist(&self) {
        let _writer = self.writer.lock().await;
        let snapshot = self.list();
        let storage = self.storage.clone();

        let task = tokio::task::spawn_blocking(move || write(storage.as_ref(), &snapshot));
        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(AppError::Storage(format!("History write task failed: {}", e))),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to persist history");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryItem>> {
        // Every critical section leaves the list consistent, so a poisoned
        // lock still holds valid data.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load(storage: &dyn KeyValueStore) -> Result<Vec<HistoryItem>, AppError> {
    match storage.get(HISTORY_STORAGE_KEY)? {
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|e| AppError::StorageParse(e.to_string()))
        }
        None => Ok(Vec::new()),
    }
}

fn write(storage: &dyn KeyValueStore, items: &[HistoryItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return storage.remove(HISTORY_STORAGE_KEY);
    }
    let json = serde_json::to_string(items).map_err(|e| AppError::Storage(e.to_string()))?;
    storage.set(HISTORY_STORAGE_KEY, &json)
}
