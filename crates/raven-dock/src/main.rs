mod daemon;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use raven_dock::client::{self, ClientCommand};
use raven_dock_core::ConfigPaths;

#[derive(Parser)]
#[command(name = "raven-dock")]
#[command(about = "Auto-hiding application dock for Hyprland")]
#[command(version)]
struct Cli {
    /// Directory holding dock-settings.json, pinned.json and the socket
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run as daemon (default)
    Daemon,
    #[command(flatten)]
    Client(ClientCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("raven_dock=info".parse()?)
                .add_directive("raven_dock_core=info".parse()?)
                .add_directive("raven_dock_components=info".parse()?)
                .add_directive("hyprland=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let paths = match &cli.config_dir {
        Some(dir) => ConfigPaths::in_dir(dir),
        None => ConfigPaths::new(),
    };

    match cli.command {
        Some(Command::Daemon) | None => {
            info!("Starting Raven dock daemon");
            daemon::run(paths)
        }
        Some(Command::Client(command)) => client::run(&paths.socket, command),
    }
}
