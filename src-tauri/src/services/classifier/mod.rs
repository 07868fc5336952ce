pub mod client;
pub mod response;

use crate::error::AppError;
use crate::models::classify_types::Classification;
use async_trait::async_trait;

/// Anything that can turn a base64 image into a classification.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, base64_image: &str) -> Result<Classification, AppError>;
}
