use crate::config::AppConfig;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogEntry {
    pub message: String,
    pub metadata: Value,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, metadata: Value) -> Self {
        Self {
            message: message.into(),
            metadata,
        }
    }
}

#[derive(Serialize)]
struct TelemetryPayload<'a> {
    message: &'a str,
    metadata: &'a Value,
    timestamp: String,
}

#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn send(&self, entry: &LogEntry) -> Result<(), AppError>;
}

/// Posts entries to a remote log collector.
pub struct HttpTelemetry {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTelemetry {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TelemetrySink for HttpTelemetry {
    async fn send(&self, entry: &LogEntry) -> Result<(), AppError> {
        let payload = TelemetryPayload {
            message: &entry.message,
            metadata: &entry.metadata,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Telemetry(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Telemetry(format!("HTTP {}", response.status())));
        }
        Ok(())
    }
}

/// Keeps telemetry on the local log.
pub struct LocalTelemetry;

#[async_trait]
impl TelemetrySink for LocalTelemetry {
    async fn send(&self, entry: &LogEntry) -> Result<(), AppError> {
        tracing::info!(target: "telemetry", metadata = %entry.metadata, "{}", entry.message);
        Ok(())
    }
}

pub fn from_config(config: &AppConfig) -> Arc<dyn TelemetrySink> {
    match &config.telemetry_endpoint {
        Some(endpoint) => match reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
        {
            Ok(client) => Arc::new(HttpTelemetry::new(client, endpoint.clone())),
            Err(e) => {
                tracing::warn!(error = %e, "Telemetry client unavailable, logging locally");
                Arc::new(LocalTelemetry)
            }
        },
        None => Arc::new(LocalTelemetry),
    }
}

/// Fire-and-forget. Failures only reach the local log.
pub fn report(sink: Arc<dyn TelemetrySink>, entry: LogEntry) {
    tokio::spawn(async move {
        if let Err(e) = sink.send(&entry).await {
            tracing::warn!(error = %e, message = %entry.message, "Error sending telemetry");
        }
    });
}
