use crate::models::classify_types::{ClassificationResult, TopPrediction};
use serde::{Deserialize, Serialize};

/// A persisted classification. Never mutated after creation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub image_data_url: String,
    pub result: ClassificationResult,
    pub top_predictions: Vec<TopPrediction>,
}
