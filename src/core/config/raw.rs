//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! Every section is optional, so an empty file is a valid config.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape — serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub llm: RawLlm,
}

// ── Server ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            log_file: None,
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

// ── LLM ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub replicate: RawReplicateConfig,
    #[serde(default)]
    pub openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            replicate: RawReplicateConfig::default(),
            openai: RawOpenAiConfig::default(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawReplicateConfig {
    #[serde(default = "default_replicate_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_replicate_model_version")]
    pub model_version: String,
    #[serde(default = "default_replicate_max_length")]
    pub max_length: u32,
    #[serde(default = "default_replicate_temperature")]
    pub temperature: f32,
    #[serde(default = "default_replicate_top_p")]
    pub top_p: f32,
    #[serde(default = "default_http_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for RawReplicateConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_replicate_api_base_url(),
            model_version: default_replicate_model_version(),
            max_length: default_replicate_max_length(),
            temperature: default_replicate_temperature(),
            top_p: default_replicate_top_p(),
            timeout_seconds: default_http_timeout_seconds(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_http_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            max_tokens: None,
            timeout_seconds: default_http_timeout_seconds(),
        }
    }
}

// ── Defaults ────────────────────────────────────────────────────────────────

pub(super) fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_request_timeout_seconds() -> u64 {
    120
}

fn default_llm_provider() -> String {
    "replicate".into()
}

fn default_replicate_api_base_url() -> String {
    "https://api.replicate.com/v1".into()
}

pub(super) fn default_replicate_model_version() -> String {
    "d24902e3fa9b698cc208b5e63136c4e26e828659a9f09827ca6ec5bb83014381".into()
}

fn default_replicate_max_length() -> u32 {
    1000
}

fn default_replicate_temperature() -> f32 {
    0.1
}

fn default_replicate_top_p() -> f32 {
    0.9
}

fn default_http_timeout_seconds() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    60
}

fn default_openai_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions".into()
}

fn default_openai_model() -> String {
    "gemini-1.5-flash".into()
}

fn default_openai_temperature() -> f32 {
    0.2
}
