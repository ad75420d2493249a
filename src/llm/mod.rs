//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities; clone them freely.
//! Enum dispatch keeps `complete` an ordinary `async fn`, so callers need no
//! trait-object machinery.

pub mod providers;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Upstream failure. `Display` strings are what the UI shows the user.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key is not configured")]
    MissingApiKey,
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    /// Transport failure, unreadable body, or a failed status poll.
    #[error("{0}")]
    Request(String),
    /// The upstream API refused the generation request itself.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("{0}")]
    PredictionFailed(String),
    #[error("Prediction was canceled")]
    Canceled,
    #[error("Prediction timed out")]
    TimedOut { attempts: u32 },
    #[error("No output received from model")]
    EmptyOutput,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    Replicate(providers::replicate::ReplicateProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Short name used in logs and `/api/health`.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Dummy(_) => "dummy",
            LlmProvider::Replicate(_) => "replicate",
            LlmProvider::OpenAiCompatible(_) => "openai",
        }
    }

    /// Send `prompt` upstream and return the model's raw text.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(prompt).await,
            LlmProvider::Replicate(p) => p.complete(prompt).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(ProviderError::Canceled.to_string(), "Prediction was canceled");
        assert_eq!(
            ProviderError::TimedOut { attempts: 60 }.to_string(),
            "Prediction timed out"
        );
        assert_eq!(
            ProviderError::Upstream { status: 422, message: "bad version".into() }.to_string(),
            "bad version"
        );
    }

    #[tokio::test]
    async fn dummy_dispatch() {
        let p = LlmProvider::Dummy(providers::dummy::DummyProvider);
        assert_eq!(p.name(), "dummy");
        assert!(p.complete("hi").await.unwrap().contains("hi"));
    }
}
