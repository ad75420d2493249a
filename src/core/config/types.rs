//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs the server and providers
//! consume. Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    /// Upstream API key. Sourced from `LLM_API_KEY` (or `REPLICATE_API_KEY`)
    /// in the environment, never from TOML.
    pub llm_api_key: Option<String>,
}

// ── Server ──────────────────────────────────────────────────────────────────

/// Inbound HTTP server configuration (`[server]`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the axum listener binds to.
    pub bind: String,
    pub log_level: String,
    /// When set, logs are appended to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Overall deadline for one `/api/generate` request, polling included.
    pub request_timeout_seconds: u64,
}

// ── LLM ─────────────────────────────────────────────────────────────────────

/// LLM configuration (`[llm]`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"replicate"`, `"openai"`, `"dummy"`).
    /// Maps to `default` in `[llm]` so other provider sections can coexist.
    pub provider: String,
    pub replicate: ReplicateConfig,
    pub openai: OpenAiConfig,
}

/// Poll-based prediction API settings (`[llm.replicate]`).
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    /// API root; predictions live under `{api_base_url}/predictions`.
    pub api_base_url: String,
    /// Model version hash sent as `version` when creating a prediction.
    pub model_version: String,
    pub max_length: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Per-HTTP-call timeout in seconds.
    pub timeout_seconds: u64,
    /// Delay between two status polls.
    pub poll_interval_ms: u64,
    /// Polls before giving up with a timeout.
    pub max_poll_attempts: u32,
}

/// Synchronous chat-completions API settings (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}
