//! packagecloud command-line client.

mod commands;
mod config;
mod logging;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{distro, promote, push, search, versions};
use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "packagecloud", version, about = "Command-line client for packagecloud")]
struct Cli {
    /// Config file (JSON with `url` and `token` keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service URL
    #[arg(long, env = "PACKAGECLOUD_URL", global = true)]
    url: Option<String>,

    /// API token
    #[arg(long, env = "PACKAGECLOUD_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage distros
    Distro {
        #[command(subcommand)]
        action: distro::DistroAction,
    },
    /// Search for packages matching given search parameters
    Search(search::SearchArgs),
    /// Push package(s) to a repository
    Push(push::PushArgs),
    /// Promote a package or packages
    Promote {
        #[command(subcommand)]
        action: promote::PromoteAction,
    },
    /// Perform various actions related to versions
    Versions {
        #[command(subcommand)]
        action: versions::VersionsAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_tracing(cli.verbose, cli.log_format);

    // Comparing versions needs no credentials.
    if let Command::Versions {
        action: versions::VersionsAction::Compare(args),
    } = &cli.command
    {
        return versions::compare(args);
    }

    let client_config = config::resolve(cli.config.as_deref(), cli.url, cli.token)?;
    let client = packagecloud_client::Client::new(client_config)?;

    match cli.command {
        Command::Distro { action } => distro::run(&client, action).await,
        Command::Search(args) => search::run(&client, args).await,
        Command::Push(args) => push::run(&client, args).await,
        Command::Promote { action } => promote::run(&client, action).await,
        Command::Versions { action } => versions::run(&client, action).await,
    }
}
