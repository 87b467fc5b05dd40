use std::cmp::Ordering;

use clap::{Args, Subcommand};

use packagecloud_client::{compare_versions, Client, ListVersionsOptions, Repo};

use super::FilterArgs;
use crate::output::{print_json, render_table, Format};

const DEFAULT_VERSIONS_PER_PAGE: u32 = 256;

#[derive(Subcommand, Debug)]
pub enum VersionsAction {
    /// List all versions of packages with a given name in a repository
    List {
        #[command(flatten)]
        package: PackageArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Show the latest version of a package
    Latest(PackageArgs),
    /// Show the version preceding the latest one
    Previous(PackageArgs),
    /// Compare semantic version 'a' to semantic version 'b'
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Repository, as user/repo
    pub repo: Repo,
    /// Package name
    pub name: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of packages to request per page
    #[arg(short, long, default_value_t = DEFAULT_VERSIONS_PER_PAGE)]
    pub per_page: u32,
}

impl PackageArgs {
    fn options(self) -> ListVersionsOptions {
        ListVersionsOptions {
            repo: self.repo,
            package_name: self.name,
            filter: self.filters.filter,
            dist: self.filters.dist,
            arch: self.filters.arch,
            per_page: Some(self.per_page),
        }
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    pub a: String,
    pub b: String,
}

pub async fn run(client: &Client, action: VersionsAction) -> anyhow::Result<()> {
    match action {
        VersionsAction::List { package, format } => {
            let versions = client.list_versions(&package.options()).await?;
            match format {
                Format::Json => print_json(&versions)?,
                Format::Table => {
                    let rows: Vec<Vec<String>> = versions
                        .iter()
                        .map(|(version, count)| vec![version.to_string(), count.to_string()])
                        .collect();
                    print!("{}", render_table(&["Version", "Packages"], &rows));
                }
            }
        }
        VersionsAction::Latest(package) => {
            println!("{}", client.latest_version(&package.options()).await?);
        }
        VersionsAction::Previous(package) => {
            println!("{}", client.previous_version(&package.options()).await?);
        }
        VersionsAction::Compare(args) => compare(&args)?,
    }
    Ok(())
}

/// Print `equal`, `greater` or `lesser` for `a` relative to `b`.
pub fn compare(args: &CompareArgs) -> anyhow::Result<()> {
    let verdict = match compare_versions(&args.a, &args.b)? {
        Ordering::Less => "lesser",
        Ordering::Equal => "equal",
        Ordering::Greater => "greater",
    };
    println!("{}", verdict);
    Ok(())
}
