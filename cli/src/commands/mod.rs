pub mod distro;
pub mod promote;
pub mod push;
pub mod search;
pub mod versions;

use clap::Args;

use packagecloud_client::{Repo, SearchOptions};

/// Search constraints shared by `search`, `promote by-search` and the
/// `versions` commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Name of package type to search for packages (ignored when --dist is set)
    #[arg(short = 'i', long, default_value = "")]
    pub filter: String,

    /// Name of the distribution to filter packages by (overrides --filter)
    #[arg(short, long, default_value = "")]
    pub dist: String,

    /// Architecture to filter packages by (alpine/rpm/debian only)
    #[arg(short, long, default_value = "")]
    pub arch: String,
}

impl FilterArgs {
    pub fn search_options(&self, repo: Repo, query: &str) -> SearchOptions {
        SearchOptions::new(repo)
            .with_query(query)
            .with_filter(self.filter.as_str())
            .with_dist(self.dist.as_str())
            .with_arch(self.arch.as_str())
    }
}
