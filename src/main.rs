use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use findash::core::log::init_logging;
use findash::core::{Period, ProviderKind, StatementKind, Symbol};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the REST API server
    Serve {
        /// Address to bind, overrides the configured host
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch statements for a symbol and print headline metrics
    Fetch {
        /// Ticker symbol, e.g. IBM
        symbol: Symbol,
        /// income-statement, balance-sheet or cash-flow; all three when omitted
        kind: Option<StatementKind>,
        /// financial or alphavantage
        #[arg(long, default_value = "financial")]
        provider: ProviderKind,
        /// annual or quarter
        #[arg(long, default_value = "annual")]
        period: Period,
    },
}

impl From<Commands> for findash::AppCommand {
    fn from(cmd: Commands) -> findash::AppCommand {
        match cmd {
            Commands::Serve { host, port } => findash::AppCommand::Serve { host, port },
            Commands::Fetch {
                symbol,
                kind,
                provider,
                period,
            } => findash::AppCommand::Fetch {
                symbol,
                kind,
                provider,
                period,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (&cli.command, cli.verbose) {
        (_, true) => LevelFilter::DEBUG,
        (Some(Commands::Serve { .. }), false) => LevelFilter::INFO,
        _ => LevelFilter::OFF,
    };
    init_logging(level);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => findash::cli::setup::setup_at_path(path),
            None => findash::cli::setup::setup(),
        },
        Some(cmd) => findash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
