//! abx CLI - fetches ABX market-data packets and fills sequence gaps.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

mod commands;
mod display;
mod logging;

use commands::EndpointArgs;
use display::Format;

#[derive(Parser)]
#[command(name = "abx")]
#[command(about = "Fetches ABX market-data packets and recovers missing sequences", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all packets once and export them
    Fetch {
        #[command(flatten)]
        endpoint: EndpointArgs,

        /// Output file path. Defaults to output.<format> in the home directory
        #[arg(short, long, env = "ABX_OUTPUT")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },

    /// Serve the GetDataPackets HTTP endpoint
    Serve {
        #[command(flatten)]
        endpoint: EndpointArgs,

        /// Address to listen on
        #[arg(short, long, env = "ABX_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// JSON file written after each request. Defaults to output.json in the home directory
        #[arg(short, long, env = "ABX_OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fetch {
            endpoint,
            output,
            format,
        } => commands::fetch::fetch(&endpoint, output, format, cli.quiet).await,
        Commands::Serve {
            endpoint,
            bind,
            output,
        } => commands::serve::serve(&endpoint, bind, output).await,
    }
}
