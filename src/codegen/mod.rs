//! Prompt-to-code pipeline.
//!
//! ```text
//! prompt ─► detect_language ─► format_prompt ─► LlmProvider::complete ─► clean_output
//! ```
//!
//! Everything here except the provider call is pure string processing.

pub mod cleanup;
pub mod detect;
pub mod language;
pub mod prompt;

use serde::Serialize;
use tracing::{debug, info};

use crate::llm::{LlmProvider, ProviderError};

pub use cleanup::clean_output;
pub use detect::detect_language;
pub use language::Language;
pub use prompt::format_prompt;

/// Successful generation, serialized as the `/api/generate` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    pub code: String,
    pub language: Language,
}

/// Run the whole pipeline for one user prompt.
pub async fn generate(
    provider: &LlmProvider,
    prompt: &str,
) -> Result<GeneratedCode, ProviderError> {
    let language = detect_language(prompt);
    let formatted = format_prompt(prompt, language);

    info!(%language, provider = provider.name(), prompt_len = prompt.len(), "generating code");

    let raw = provider.complete(&formatted).await?;
    let code = clean_output(&raw, language);

    debug!(raw_len = raw.len(), code_len = code.len(), "model output cleaned");

    Ok(GeneratedCode { code, language })
}
