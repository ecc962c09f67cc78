//! Prediction API Client
//!
//! HTTP client for the traffic classification endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::EventSource;
use crate::config::Config;
use crate::error::{DashboardError, DashboardResult};
use crate::logic::event::{ClassificationEvent, EventId};

/// Body of `GET /predict`
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub id: Option<EventId>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub prediction: String,
    pub confidence: f64,
    pub probabilities: BTreeMap<String, f64>,
    #[serde(default)]
    pub features: Vec<f64>,
}

impl PredictResponse {
    /// Fill in id/timestamp the endpoint left out
    pub fn into_event(self, received_at: DateTime<Utc>) -> ClassificationEvent {
        ClassificationEvent {
            id: self.id.unwrap_or_else(|| EventId::generate(received_at)),
            timestamp: self.timestamp.unwrap_or(received_at),
            label: self.prediction,
            confidence: self.confidence,
            class_probabilities: self.probabilities,
            features: self.features,
        }
    }
}

/// Live classification source
pub struct PredictClient {
    predict_url: String,
    http_client: reqwest::Client,
}

impl PredictClient {
    /// Create new client
    pub fn new(config: &Config) -> DashboardResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                DashboardError::SourceUnavailable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            predict_url: config.predict_url(),
            http_client,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Fetch one prediction
    pub async fn predict(&self) -> DashboardResult<ClassificationEvent> {
        let response = self.http_client.get(&self.predict_url).send().await?;

        if !response.status().is_success() {
            return Err(DashboardError::SourceUnavailable(format!(
                "server error: {}",
                response.status().as_u16()
            )));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::SourceUnavailable(format!("parse error: {}", e)))?;

        log::debug!("Prediction received: {} ({:.3})", body.prediction, body.confidence);
        Ok(body.into_event(Utc::now()))
    }
}

impl EventSource for PredictClient {
    async fn fetch_next(&mut self) -> DashboardResult<ClassificationEvent> {
        self.predict().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config_for(api_url: String) -> Config {
        Config {
            api_url,
            request_timeout: Duration::from_secs(2),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_predict_success() {
        let app = Router::new().route(
            "/predict",
            get(|| async {
                Json(json!({
                    "prediction": "Port Scan",
                    "confidence": 0.81,
                    "probabilities": {"BENIGN": 0.19, "Port Scan": 0.81},
                    "features": [0.5, 1.5]
                }))
            }),
        );
        let url = serve(app).await;

        let mut client = PredictClient::new(&config_for(url)).unwrap();
        let event = client.fetch_next().await.unwrap();

        assert_eq!(event.label, "Port Scan");
        assert_eq!(event.confidence, 0.81);
        assert!(!event.id.as_str().is_empty());
        assert!(event.validate().is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_source_unavailable() {
        let app = Router::new().route(
            "/predict",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let url = serve(app).await;

        let client = PredictClient::new(&config_for(url)).unwrap();
        let err = client.predict().await.unwrap_err();
        assert!(err.is_source_unavailable());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_bad_body_is_source_unavailable() {
        let app = Router::new().route("/predict", get(|| async { "not json" }));
        let url = serve(app).await;

        let client = PredictClient::new(&config_for(url)).unwrap();
        assert!(client.predict().await.unwrap_err().is_source_unavailable());
    }

    #[tokio::test]
    async fn test_unreachable_is_source_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PredictClient::new(&config_for(format!("http://{}", addr))).unwrap();
        assert!(client.predict().await.unwrap_err().is_source_unavailable());
    }

    #[test]
    fn test_response_keeps_endpoint_id() {
        let body: PredictResponse = serde_json::from_value(json!({
            "id": "abc",
            "timestamp": "2024-12-28T15:33:20Z",
            "prediction": "BENIGN",
            "confidence": 1.0,
            "probabilities": {"BENIGN": 1.0}
        }))
        .unwrap();

        let event = body.into_event(Utc::now());
        assert_eq!(event.id.as_str(), "abc");
        assert_eq!(event.timestamp.to_rfc3339(), "2024-12-28T15:33:20+00:00");
        assert!(event.features.is_empty());
    }
}
