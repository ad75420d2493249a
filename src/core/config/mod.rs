//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the path given with `-f`), then applies `CODEGEN_BIND` and
//! `CODEGEN_LOG_LEVEL` env overrides. The upstream API key only ever comes
//! from the environment.
//!
//! # Module layout
//!
//! - **types** — Public configuration structs (`Config`, `ServerConfig`,
//!   `LlmConfig`, …).
//! - **raw** — Raw TOML deserialization types with serde defaults; private.
//! - **load** — `load`, `load_from`, `[meta] base` inheritance,
//!   `expand_home`.

mod load;
mod raw;
mod types;

pub use load::{API_KEY_VARS, Overrides, api_key_from_env, expand_home, load, load_from};
pub use types::*;

impl Config {
    /// Safe `Config` for tests: dummy LLM, no API key, no external calls.
    pub fn test_default() -> Self {
        Self {
            server: ServerConfig {
                bind: raw::default_bind(),
                log_level: "info".into(),
                log_file: None,
                request_timeout_seconds: 5,
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                replicate: ReplicateConfig {
                    api_base_url: "http://127.0.0.1:0/v1".into(),
                    model_version: raw::default_replicate_model_version(),
                    max_length: 1000,
                    temperature: 0.1,
                    top_p: 0.9,
                    timeout_seconds: 1,
                    poll_interval_ms: 1,
                    max_poll_attempts: 3,
                },
                openai: OpenAiConfig {
                    api_base_url: "http://127.0.0.1:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    max_tokens: None,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
        }
    }
}
