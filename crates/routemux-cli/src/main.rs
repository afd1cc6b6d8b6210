//! routemux CLI - offline front end for routemux mux/demux components.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "routemux")]
#[command(author, version, about = "Channel routing for audio pipelines", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route WAV files through a mux or demux component
    Run(commands::run::RunArgs),

    /// Encode a route into a control blob
    Encode(commands::encode::EncodeArgs),

    /// Decode a control blob or construction descriptor
    Decode(commands::decode::DecodeArgs),

    /// List frame formats and their routing kernels
    Formats(commands::formats::FormatsArgs),

    /// List and inspect routes
    Routes(commands::routes::RoutesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Encode(args) => commands::encode::run(args),
        Commands::Decode(args) => commands::decode::run(args),
        Commands::Formats(args) => commands::formats::run(args),
        Commands::Routes(args) => commands::routes::run(args),
    }
}
