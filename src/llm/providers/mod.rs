//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory, called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod openai_compatible;
pub mod replicate;

use crate::core::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct the configured `LlmProvider`.
///
/// `api_key` comes from the environment (never TOML). The prediction
/// provider cannot run without one and reports `MissingApiKey`; the chat
/// provider also accepts keyless local endpoints.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "replicate" => {
            let key = api_key.ok_or(ProviderError::MissingApiKey)?;
            let p = replicate::ReplicateProvider::new(&config.replicate, key)?;
            Ok(LlmProvider::Replicate(p))
        }
        "openai" | "openai-compatible" => {
            let p = openai_compatible::OpenAiCompatibleProvider::new(&config.openai, api_key)?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn llm_config(provider: &str) -> LlmConfig {
        let mut llm = Config::test_default().llm;
        llm.provider = provider.into();
        llm
    }

    #[test]
    fn builds_dummy_without_key() {
        let p = build(&llm_config("dummy"), None).unwrap();
        assert_eq!(p.name(), "dummy");
    }

    #[test]
    fn replicate_requires_key() {
        let err = build(&llm_config("replicate"), None).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));

        let p = build(&llm_config("replicate"), Some("r8_x".into())).unwrap();
        assert_eq!(p.name(), "replicate");
    }

    #[test]
    fn openai_accepts_keyless() {
        let p = build(&llm_config("openai-compatible"), None).unwrap();
        assert_eq!(p.name(), "openai");
    }

    #[test]
    fn unknown_provider_rejected() {
        let err = build(&llm_config("bard"), None).unwrap_err();
        assert!(err.to_string().contains("bard"));
    }
}
