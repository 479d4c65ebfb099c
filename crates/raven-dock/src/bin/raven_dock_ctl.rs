use clap::Parser;
use std::path::PathBuf;

use raven_dock::client::{self, ClientCommand};
use raven_dock_core::ConfigPaths;

#[derive(Parser)]
#[command(name = "raven-dock-ctl")]
#[command(about = "Control utility for the Raven dock")]
#[command(version)]
struct Cli {
    /// Socket of the dock (defaults to $XDG_RUNTIME_DIR/raven-dock.sock)
    #[arg(long)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: ClientCommand,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let socket = cli.socket.unwrap_or_else(|| ConfigPaths::new().socket);
    client::run(&socket, cli.command)
}
