//! codegen-relay — server entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config) and init logger
//!   5. Build the configured LLM provider
//!   6. Spawn Ctrl-C → shutdown signal watcher
//!   7. Serve HTTP until shutdown

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use codegen_relay::error::AppError;
use codegen_relay::llm::{ProviderError, providers};
use codegen_relay::server::{AppState, Server};
use codegen_relay::{config, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.server.log_level.as_str());
    logger::init(
        effective_log_level,
        args.log_level.is_some(),
        config.server.log_file.as_deref(),
    )?;

    info!(
        bind = %config.server.bind,
        provider = %config.llm.provider,
        configured_log_level = %config.server.log_level,
        effective_log_level = %effective_log_level,
        request_timeout_seconds = config.server.request_timeout_seconds,
        "config loaded"
    );

    let provider = match providers::build(&config.llm, config.llm_api_key.clone()) {
        Ok(provider) => Some(provider),
        Err(ProviderError::MissingApiKey) => {
            warn!(
                provider = %config.llm.provider,
                "no API key in environment, /api/generate will answer 500 until one is set"
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(provider) = &provider {
        info!(provider = provider.name(), "llm provider ready");
    }

    let state = AppState::new(
        provider,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    Server::new(config.server.bind, state).run(shutdown).await
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn print_help() {
    println!("Usage: codegen-relay [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -h, --help                 Print help");
    println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
    println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
    println!();
    println!("Environment:");
    println!("  LLM_API_KEY                Upstream API key (REPLICATE_API_KEY also accepted)");
    println!("  CODEGEN_BIND               Override server.bind");
    println!("  CODEGEN_LOG_LEVEL          Override server.log_level");
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.len() > 1 && a.starts_with('-') && a.chars().skip(1).all(|c| c == 'v') => {
                let count = u8::try_from(a.len() - 1).unwrap_or(u8::MAX);
                verbosity = verbosity.saturating_add(count);
            }
            other => eprintln!("warning: ignoring unknown argument '{other}'"),
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
    }
}
