use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{ModelProvider, TranslationModel};
use crate::config::ProviderConfig;
use crate::error::{Result, TolkaError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub model: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub text: String,
}

/// Provider backed by an HTTP inference server hosting the per-pair
/// models.
pub struct HttpProvider {
    client: Client,
    endpoint: String,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl ModelProvider for HttpProvider {
    /// Ask the inference server to materialize the model. The server
    /// downloads or memory-maps the artifact on its side; a missing or
    /// broken artifact surfaces here as a load failure.
    async fn load(&self, model_id: &str) -> Result<Arc<dyn TranslationModel>> {
        let url = format!("{}/api/show", self.endpoint);
        let request = json!({ "name": model_id });

        info!("Loading model: {}", model_id);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TolkaError::LoadFailure {
                model: model_id.to_string(),
                cause: format!("Failed to connect to inference server: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TolkaError::LoadFailure {
                model: model_id.to_string(),
                cause: format!("Inference server error {}: {}", status, error_text),
            });
        }

        info!("Successfully loaded model: {}", model_id);

        Ok(Arc::new(HttpModel {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            model: model_id.to_string(),
        }))
    }
}

/// Handle to a model materialized on the inference server
pub struct HttpModel {
    client: Client,
    endpoint: String,
    model: String,
}

#[async_trait]
impl TranslationModel for HttpModel {
    async fn translate(&self, text: &str) -> Result<String> {
        let request = TranslateRequest {
            model: self.model.clone(),
            text: text.to_string(),
        };

        let url = format!("{}/api/translate", self.endpoint);

        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TolkaError::Inference(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TolkaError::Inference(format!(
                "Inference server error {}: {}",
                status, error_text
            )));
        }

        let translate_response: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TolkaError::Inference(format!("Failed to parse response: {}", e)))?;

        let translated = translate_response.text.trim().to_string();

        if translated.is_empty() {
            return Err(TolkaError::Inference(
                "Empty translation received".to_string(),
            ));
        }

        Ok(translated)
    }
}
