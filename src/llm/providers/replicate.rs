//! Replicate-style prediction provider.
//!
//! Generation is asynchronous on the upstream side: a `POST /predictions`
//! creates a prediction and returns its id, then `GET /predictions/{id}` is
//! polled at a fixed interval until the prediction reaches a terminal status
//! or the attempt budget runs out. Wire types are private to this module.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::core::config::ReplicateConfig;
use crate::llm::ProviderError;

/// Fixed-interval, bounded polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSchedule {
    pub fn from_config(config: &ReplicateConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_poll_attempts.max(1),
        }
    }
}

/// Sampling parameters sent with every prediction.
#[derive(Debug, Clone, Copy, Serialize)]
struct Sampling {
    max_length: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Clone)]
pub struct ReplicateProvider {
    client: Client,
    api_base_url: String,
    model_version: String,
    sampling: Sampling,
    schedule: PollSchedule,
    api_key: String,
}

impl ReplicateProvider {
    pub fn new(config: &ReplicateConfig, api_key: String) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model_version: config.model_version.clone(),
            sampling: Sampling {
                max_length: config.max_length,
                temperature: config.temperature,
                top_p: config.top_p,
            },
            schedule: PollSchedule::from_config(config),
            api_key,
        })
    }

    /// Create a prediction for `prompt` and wait for its output.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let created = self.create_prediction(prompt).await?;
        debug!(prediction_id = %created.id, status = %created.status, "prediction created");

        if let Some(outcome) = created.outcome() {
            return outcome;
        }
        self.await_prediction(&created.id).await
    }

    fn predictions_url(&self) -> String {
        format!("{}/predictions", self.api_base_url)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.api_key)
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, ProviderError> {
        let payload = CreatePrediction {
            version: &self.model_version,
            input: PredictionInput { prompt, sampling: self.sampling },
        };

        debug!(
            version = %self.model_version,
            prompt_len = prompt.len(),
            "creating prediction"
        );

        let response = self
            .client
            .post(self.predictions_url())
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.api_base_url, error = %e, "prediction request failed (transport)");
                ProviderError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response)
                .await
                .unwrap_or_else(|| "Error creating prediction".to_string());
            error!(%status, %message, "prediction creation returned HTTP error");
            return Err(ProviderError::Upstream { status: status.as_u16(), message });
        }

        parse_prediction(response).await
    }

    async fn fetch_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(format!("{}/{id}", self.predictions_url()))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(|e| {
                error!(prediction_id = %id, error = %e, "status poll failed (transport)");
                ProviderError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response)
                .await
                .unwrap_or_else(|| "Error checking prediction status".to_string());
            warn!(prediction_id = %id, %status, %message, "status poll returned HTTP error");
            return Err(ProviderError::Request(message));
        }

        parse_prediction(response).await
    }

    /// Poll until the prediction settles or `max_attempts` polls have gone by.
    async fn await_prediction(&self, id: &str) -> Result<String, ProviderError> {
        let PollSchedule { interval, max_attempts } = self.schedule;

        for attempt in 1..=max_attempts {
            let prediction = self.fetch_prediction(id).await?;
            debug!(prediction_id = %id, attempt, status = %prediction.status, "polled prediction");

            if let Some(outcome) = prediction.outcome() {
                return outcome;
            }
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        warn!(prediction_id = %id, attempts = max_attempts, "prediction did not settle in time");
        Err(ProviderError::TimedOut { attempts: max_attempts })
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreatePrediction<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    sampling: Sampling,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<String>,
}

/// Language models stream tokens, so output arrives either whole or chunked.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Text(String),
    Chunks(Vec<String>),
}

impl PredictionOutput {
    fn into_text(self) -> String {
        match self {
            PredictionOutput::Text(text) => text,
            PredictionOutput::Chunks(chunks) => chunks.concat(),
        }
    }
}

impl Prediction {
    /// `Some` once the prediction is terminal; `None` while it is still
    /// `starting` / `processing` (or any status this client does not know).
    fn outcome(&self) -> Option<Result<String, ProviderError>> {
        match self.status.as_str() {
            "succeeded" => Some(
                self.output
                    .clone()
                    .map(PredictionOutput::into_text)
                    .filter(|text| !text.trim().is_empty())
                    .ok_or(ProviderError::EmptyOutput),
            ),
            "failed" => Some(Err(ProviderError::PredictionFailed(
                self.error
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Prediction failed".to_string()),
            ))),
            "canceled" => Some(Err(ProviderError::Canceled)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

async fn parse_prediction(response: reqwest::Response) -> Result<Prediction, ProviderError> {
    response.json::<Prediction>().await.map_err(|e| {
        error!(error = %e, "failed to deserialize prediction");
        ProviderError::Request(format!("failed to parse prediction: {e}"))
    })
}

/// The `detail` field of an error body, if there is one.
async fn error_detail(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_empty())
}
