//! hass-tools - query and edit a Home Assistant instance through the tool registry
//!
//! Usage:
//!   hass-tools tools                                   List registered tools
//!   hass-tools call list_automations --args '{"state":"on"}'
//!   hass-tools config                                  Show the resolved configuration
//!   hass-tools init --url URL --token TOKEN            Write the config file
//!   hass-tools --help                                  Show all commands

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use hass_tools_core::logging::ConsoleLevel;
use hass_tools_core::{
    register_builtin_tools, Backend, CallContext, CancellationToken, ConsoleLogger, EnvOverrides,
    FileConfig, Logger, QueryEngine, RestBackend, RestBackendConfig, ToolRegistry, ToolsConfig,
};

#[derive(Parser)]
#[command(name = "hass-tools")]
#[command(about = "Home Assistant tools for language-model clients", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/hass-tools/config.yaml)
    #[arg(short, long, env = "HASS_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tools
    Tools {
        /// Print full definitions (with input schemas) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call a tool and print its result
    Call {
        /// Tool name, e.g. list_automations
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Show the resolved configuration
    Config,

    /// Write connection settings to the config file, backing up the old one
    Init {
        /// Base URL, e.g. http://homeassistant.local:8123
        #[arg(long)]
        url: Option<String>,

        /// Long-lived access token
        #[arg(long)]
        token: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<(FileConfig, ToolsConfig)> {
    let file = match &cli.config {
        Some(path) => FileConfig::new(path),
        None => FileConfig::user(),
    };
    let mut config = file
        .load()
        .with_context(|| format!("loading {}", file.path().display()))?;
    config.apply_env(EnvOverrides::from_env());
    Ok((file, config))
}

fn build_registry(
    config: &ToolsConfig,
    settings: RestBackendConfig,
    logger: Arc<dyn Logger>,
) -> Result<ToolRegistry> {
    let backend: Arc<dyn Backend> = Arc::new(RestBackend::new(settings)?);
    let engine = Arc::new(
        QueryEngine::new(backend.clone(), logger.clone())
            .with_fetch_concurrency(config.query.fetch_concurrency),
    );

    let mut registry = ToolRegistry::new(logger).with_validation(config.tools.validation);
    register_builtin_tools(&mut registry, backend, engine, &config.tool_filter())?;
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { ConsoleLevel::Debug } else { ConsoleLevel::Warn };
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new().with_level(level));
    let (file, config) = load_config(&cli)?;

    match &cli.command {
        Commands::Tools { json } => {
            let registry = build_registry(&config, config.discovery_settings(), logger)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&registry.list())?);
            } else {
                for definition in registry.list() {
                    println!("{:<24} {}", definition.name, definition.description);
                }
            }
        }
        Commands::Call { name, args } => {
            let args: Value = serde_json::from_str(args).context("--args must be valid JSON")?;
            let registry = build_registry(&config, config.backend_settings()?, logger)?;

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let result = registry
                .dispatch_with(name, args, CallContext::with_cancel(cancel))
                .await;
            if result.is_error {
                eprintln!("{}", result.text());
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", result.text());
        }
        Commands::Config => {
            let mut shown = config.clone();
            if shown.backend.token.is_some() {
                shown.backend.token = Some("********".to_string());
            }
            println!("# {}", file.path().display());
            print!("{}", shown.to_yaml()?);
        }
        Commands::Init { url, token } => {
            let mut stored = file.load()?;
            if url.is_some() {
                stored.backend.url = url.clone();
            }
            if token.is_some() {
                stored.backend.token = token.clone();
            }
            if let Some(backup) = file.replace(&stored)? {
                eprintln!("Previous config saved to {}", backup.display());
            }
            println!("Wrote {}", file.path().display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
