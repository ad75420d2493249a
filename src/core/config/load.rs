//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! and applies `CODEGEN_BIND` and `CODEGEN_LOG_LEVEL` env overrides.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::AppError;

use super::raw::RawConfig;
use super::types::*;

/// Environment variables consulted for the upstream API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["LLM_API_KEY", "REPLICATE_API_KEY"];

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Values that win over whatever the TOML says.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub log_level: Option<String>,
}

impl Overrides {
    /// Read `CODEGEN_BIND` / `CODEGEN_LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self {
            bind: non_empty_var("CODEGEN_BIND"),
            log_level: non_empty_var("CODEGEN_LOG_LEVEL"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// First non-empty API key among [`API_KEY_VARS`].
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS.iter().find_map(|name| non_empty_var(name))
}

/// Deep-merge two TOML values.
/// Tables merge key by key; any other overlay value replaces the base value.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file and every `[meta] base` it names, returning the merged
/// value. `seen` holds canonical paths already on the chain.
fn read_chain(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !seen.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let value: toml::Value = toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let base = value
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
        .map(|b| {
            if Path::new(b).is_absolute() {
                PathBuf::from(b)
            } else {
                path.parent().unwrap_or(Path::new(".")).join(b)
            }
        });

    match base {
        Some(base_path) => Ok(merge_toml(read_chain(&base_path, seen)?, value)),
        None => Ok(value),
    }
}

/// Load config from `config_path`, else `config/default.toml`, else built-in
/// defaults; env overrides and the env API key are applied in every case.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        Ok(resolve(RawConfig::default(), &overrides))
    }
}

/// Load a specific file. Tests pass overrides directly instead of mutating
/// env vars.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let merged = read_chain(path, &mut HashSet::new())?;

    let raw = RawConfig::deserialize(merged).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    let config = resolve(raw, overrides);
    validate(&config)?;
    Ok(config)
}

fn resolve(raw: RawConfig, overrides: &Overrides) -> Config {
    let server = raw.server;
    let llm = raw.llm;

    Config {
        server: ServerConfig {
            bind: overrides.bind.clone().unwrap_or(server.bind),
            log_level: overrides.log_level.clone().unwrap_or(server.log_level),
            log_file: server.log_file.as_deref().map(expand_home),
            request_timeout_seconds: server.request_timeout_seconds,
        },
        llm: LlmConfig {
            provider: llm.provider,
            replicate: ReplicateConfig {
                api_base_url: llm.replicate.api_base_url.trim_end_matches('/').to_string(),
                model_version: llm.replicate.model_version,
                max_length: llm.replicate.max_length,
                temperature: llm.replicate.temperature,
                top_p: llm.replicate.top_p,
                timeout_seconds: llm.replicate.timeout_seconds,
                poll_interval_ms: llm.replicate.poll_interval_ms,
                max_poll_attempts: llm.replicate.max_poll_attempts,
            },
            openai: OpenAiConfig {
                api_base_url: llm.openai.api_base_url,
                model: llm.openai.model,
                temperature: llm.openai.temperature,
                max_tokens: llm.openai.max_tokens,
                timeout_seconds: llm.openai.timeout_seconds,
            },
        },
        llm_api_key: api_key_from_env(),
    }
}

fn validate(config: &Config) -> Result<(), AppError> {
    if config.server.request_timeout_seconds == 0 {
        return Err(AppError::Config(
            "server.request_timeout_seconds must be greater than zero".into(),
        ));
    }
    if config.llm.replicate.max_poll_attempts == 0 {
        return Err(AppError::Config(
            "llm.replicate.max_poll_attempts must be greater than zero".into(),
        ));
    }
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
