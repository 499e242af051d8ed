//! Bottom elevation CLI - water level interpolation for bathymetric surveys.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bathy-cli",
    version,
    about = "Bottom elevation from depth soundings and water level loggers"
)]
struct Cli {
    #[command(subcommand)]
    command: bathy_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    bathy_cmd::run(cli.command)
}
