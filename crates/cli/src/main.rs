mod config_commands;

use {
    clap::{Parser, Subcommand},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use roster_config::{RosterConfig, Severity};

#[derive(Parser)]
#[command(name = "roster", about = "Roster: agent, skill and tool registry")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Custom config directory (overrides default ~/.config/roster/).
    #[arg(long, global = true, env = "ROSTER_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the registry server (default when no subcommand is provided).
    Gateway,
    /// Configuration inspection.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load config from disk and environment, then apply command line overrides.
fn load_config(cli: &Cli) -> RosterConfig {
    if let Some(ref dir) = cli.config_dir {
        roster_config::set_config_dir(dir.clone());
    }
    let mut config = roster_config::discover_and_load();
    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = load_config(&cli);

    match cli.command {
        // Default: start the server when no subcommand is provided
        None | Some(Commands::Gateway) => {
            info!(version = env!("CARGO_PKG_VERSION"), "roster starting");

            let result = roster_config::validate(&config);
            for d in &result.diagnostics {
                match d.severity {
                    Severity::Error => tracing::error!(path = d.path, "{}", d.message),
                    Severity::Warning => warn!(path = d.path, "{}", d.message),
                }
            }
            if result.has_errors() {
                anyhow::bail!("invalid configuration, run `roster config check` for details");
            }

            roster_gateway::start_gateway(&config).await
        },
        Some(Commands::Config { action }) => config_commands::handle_config(action, &config),
    }
}
