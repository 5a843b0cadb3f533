use api_logs_lambda::{telemetry, Settings};
use clap::Parser;
use std::path::PathBuf;

mod cli;

#[derive(Debug, clap::Parser)]
#[command(version, about = "Run the api logs handlers outside of Lambda")]
struct Cli {
    /// Optional settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, clap::Subcommand)]
enum Cmd {
    Activate(cli::activate::Cmd),
    Poll(cli::poll::Cmd),
    Enrich(cli::enrich::Cmd),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_ref())?;
    telemetry::init_local(&settings);

    match cli.cmd {
        Cmd::Activate(cmd) => cmd.run(&settings).await,
        Cmd::Poll(cmd) => cmd.run(&settings).await,
        Cmd::Enrich(cmd) => cmd.run(&settings).await,
    }
}
