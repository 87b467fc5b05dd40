use std::time::Duration;

use clap::Args;

use packagecloud_client::{all_indexed, Client, Repo, DEFAULT_PER_PAGE};

use super::FilterArgs;
use crate::output::{package_rows, print_json, render_table, Format, PACKAGE_HEADER};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Repository, as user/repo
    pub repo: Repo,

    /// Search string matched against package filenames
    #[arg(short, long, default_value = "")]
    pub query: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Wait for matching packages to be indexed
    #[arg(short, long)]
    pub wait_for_indexing: bool,

    /// Seconds to wait between indexing checks
    #[arg(short = 's', long, default_value_t = 5)]
    pub wait_seconds: u64,

    /// Maximum number of indexing checks to retry
    #[arg(short = 'r', long, default_value_t = 12)]
    pub wait_max_retries: u32,
}

pub async fn run(client: &Client, args: SearchArgs) -> anyhow::Result<()> {
    let options = args
        .filters
        .search_options(args.repo, &args.query)
        .with_per_page(DEFAULT_PER_PAGE);

    let mut retries = 0;
    loop {
        let packages = client.search(&options).await?;

        if args.format == Format::Json {
            return print_json(&packages);
        }
        print!("{}", render_table(PACKAGE_HEADER, &package_rows(&packages)));

        if !args.wait_for_indexing || all_indexed(&packages) || retries >= args.wait_max_retries {
            return Ok(());
        }

        println!();
        println!("One or more packages have not yet been indexed.");
        println!("Waiting {} seconds before trying again.", args.wait_seconds);
        tracing::debug!(retry = retries + 1, max = args.wait_max_retries, "Waiting for indexing");
        tokio::time::sleep(Duration::from_secs(args.wait_seconds)).await;
        retries += 1;
    }
}
