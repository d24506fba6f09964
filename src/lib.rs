pub mod api;
pub mod cli;
pub mod core;
pub mod providers;
pub mod service;

use crate::core::config::AppConfig;
use crate::core::{Period, ProviderKind, StatementKind, Symbol};
use crate::service::StatementService;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Serve {
        host: Option<String>,
        port: Option<u16>,
    },
    Fetch {
        symbol: Symbol,
        kind: Option<StatementKind>,
        provider: ProviderKind,
        period: Period,
    },
}

/// Loads config from `config_path`, or the default location.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        financial = %config.providers.financial.base_url,
        alphavantage = %config.providers.alphavantage.base_url,
        "Loaded config"
    );
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;

    match command {
        AppCommand::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            api::serve(&config).await
        }
        AppCommand::Fetch {
            symbol,
            kind,
            provider,
            period,
        } => {
            info!(%symbol, %provider, "Fetching statements");
            let service = StatementService::from_config(&config)?;
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => StatementKind::ALL.to_vec(),
            };
            cli::statements::run(&service, provider, &kinds, &symbol, period).await
        }
    }
}
