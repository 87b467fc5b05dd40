use clap::{Args, Subcommand};

use packagecloud_client::{Client, Distro, PromotionReport, Repo};

use super::FilterArgs;

#[derive(Subcommand, Debug)]
pub enum PromoteAction {
    /// Promote a single package from one repository to another by filename
    ByFilename {
        /// Source repository, as user/repo
        source: Repo,
        /// Destination repository, as user/repo
        destination: Repo,
        /// Distro, as name/version
        distro: Distro,
        /// Exact package filename
        filename: String,
    },
    /// Search for packages matching search options and promote all matches
    BySearch(BySearchArgs),
}

#[derive(Args, Debug)]
pub struct BySearchArgs {
    /// Source repository, as user/repo
    pub source: Repo,
    /// Destination repository, as user/repo
    pub destination: Repo,

    /// Search string matched against package filenames
    #[arg(short, long, default_value = "")]
    pub query: String,

    #[command(flatten)]
    pub filters: FilterArgs,
}

pub async fn run(client: &Client, action: PromoteAction) -> anyhow::Result<()> {
    let report = match action {
        PromoteAction::ByFilename {
            source,
            destination,
            distro,
            filename,
        } => {
            client
                .promote_by_filename(&source, &destination, &distro, &filename)
                .await?
        }
        PromoteAction::BySearch(args) => {
            let options = args.filters.search_options(args.source, &args.query);
            client.promote_by_search(&args.destination, &options).await?
        }
    };
    print_report(&report);
    Ok(())
}

fn print_report(report: &PromotionReport) {
    for package in &report.packages {
        println!("Promoted package");
        println!("  - Source repository:      {}", report.source);
        println!("  - Destination repository: {}", report.destination);
        if !package.name.is_empty() {
            println!("  - Name:                   {}", package.name);
            println!("  - Type:                   {}", package.package_type);
            println!("  - Version:                {}", package.version);
            println!("  - Release:                {}", package.release);
            println!("  - Epoch:                  {}", package.epoch);
            println!("  - Architecture:           {}", package.architecture);
        }
        println!("  - Filename:               {}", package.filename);
        println!("  - Distro:                 {}", package.distro_version);
        println!();
    }
    println!("Successfully promoted {} package(s)", report.count());
}
