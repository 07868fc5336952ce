use super::response::map_response;
use super::Classifier;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::api_types::{ClassificationRequest, ClassificationResponse};
use crate::models::classify_types::Classification;
use async_trait::async_trait;

/// Talks to the remote classification endpoint.
#[derive(Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    retries: u32,
}

impl HttpClassifier {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(
            client,
            config.classify_endpoint.clone(),
            config.transport_retries,
        ))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>, retries: u32) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            retries,
        }
    }

    async fn send_once(&self, base64_image: &str) -> Result<Classification, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ClassificationRequest { image: base64_image })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "{} - {}",
                status.canonical_reason().unwrap_or(status.as_str()),
                body
            )));
        }

        let text = response.text().await?;
        let parsed: ClassificationResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::Transport(format!("Failed to parse response: {}", e)))?;

        map_response(parsed)
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, base64_image: &str) -> Result<Classification, AppError> {
        let mut attempt = 0;
        loop {
            match self.send_once(base64_image).await {
                Err(AppError::Transport(msg)) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %msg, "Classification request failed, retrying");
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classifier::response::tests::wire_response;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn classifier(endpoint: String, retries: u32) -> HttpClassifier {
        HttpClassifier::with_client(reqwest::Client::new(), endpoint, retries)
    }

    #[tokio::test]
    async fn posts_the_image_and_maps_the_reply() {
        let router = Router::new().route(
            "/",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "image": "aGVsbG8=" }));
                Json(wire_response(7))
            }),
        );
        let endpoint = serve(router).await;

        let out = classifier(endpoint, 0).classify("aGVsbG8=").await.unwrap();
        assert_eq!(out.result.class_name, "Tomate_-_Requeima");
        assert_eq!(out.top_predictions.len(), 5);
    }

    #[tokio::test]
    async fn http_failure_carries_status_and_body() {
        let router = Router::new().route(
            "/",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
        );
        let endpoint = serve(router).await;

        let err = classifier(endpoint, 0).classify("x").await.unwrap_err();
        match err {
            AppError::Transport(msg) => {
                assert!(msg.contains("Bad Gateway"), "{}", msg);
                assert!(msg.contains("upstream exploded"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unsuccessful_reply_with_200_is_semantic_and_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "sucesso": false, "mensagem": "Imagem inválida" }))
                }
            }),
        );
        let endpoint = serve(router).await;

        let err = classifier(endpoint, 1).classify("x").await.unwrap_err();
        assert!(matches!(err, AppError::Semantic(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_retried_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
                    } else {
                        (StatusCode::OK, Json(wire_response(2)))
                    }
                }
            }),
        );
        let endpoint = serve(router).await;

        let out = classifier(endpoint, 1).classify("x").await.unwrap();
        assert_eq!(out.top_predictions.len(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_the_retry_budget() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
                }
            }),
        );
        let endpoint = serve(router).await;

        let err = classifier(endpoint, 1).classify("x").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_error() {
        let router = Router::new().route("/", post(|| async { "<html>oops</html>" }));
        let endpoint = serve(router).await;

        let err = classifier(endpoint, 0).classify("x").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(ref m) if m.contains("parse")));
    }
}
