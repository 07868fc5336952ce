use crate::models::history_types::HistoryItem;
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum StatusView {
    Idle,
    Pending,
    Success,
    Error { message: String },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    pub id: String,
    pub timestamp: i64,
    pub image_data_url: String,
    pub display_name: String,
    pub confidence: f64,
    pub is_healthy: bool,
    pub is_active: bool,
}

/// Everything the frontend renders, derived from the current state.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: StatusView,
    pub preview_url: Option<String>,
    pub can_analyze: bool,
    pub can_clear: bool,
    pub confidence_threshold: u8,
    pub active: Option<HistoryItem>,
    pub show_report: bool,
    pub history: Vec<HistoryEntryView>,
}
