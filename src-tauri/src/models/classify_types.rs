use serde::{Deserialize, Serialize};

/// One classification outcome, shaped for the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub class_name: String,
    /// 0-100.
    pub confidence: f64,
    pub is_healthy: bool,
    pub plant_name: String,
    pub plant_name_pt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_pt: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopPrediction {
    pub class_name: String,
    pub confidence: f64,
    /// 1-based, 1 = most confident.
    pub rank: u32,
}

/// What the classification client hands back on success.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub result: ClassificationResult,
    pub top_predictions: Vec<TopPrediction>,
}

/// A finished classification together with the image it was made from.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyOutput {
    pub result: ClassificationResult,
    pub top_predictions: Vec<TopPrediction>,
    pub image_data_url: String,
}
