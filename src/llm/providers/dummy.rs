//! Dummy LLM provider — returns the prompt inside a markdown fence.
//! Used to exercise the full request path without an API key.

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(format!("```\n{prompt}\n```"))
    }
}
