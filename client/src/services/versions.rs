//! Version resolution for a named package.

use std::sync::{Arc, Mutex};

use crate::error::{Result, ResultExt};
use crate::http::Client;
use crate::models::package::PackageFragment;
use crate::models::repo::Repo;
use crate::models::versions::PackageVersions;
use crate::services::search::SearchOptions;
use crate::validation::{is_blank, require};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListVersionsOptions {
    pub repo: Repo,
    /// Exact package name to count versions of.
    pub package_name: String,
    pub filter: String,
    pub dist: String,
    pub arch: String,
    pub per_page: Option<u32>,
}

impl ListVersionsOptions {
    pub fn new(repo: Repo, package_name: impl Into<String>) -> Self {
        Self {
            repo,
            package_name: package_name.into(),
            filter: String::new(),
            dist: String::new(),
            arch: String::new(),
            per_page: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.repo.validate()?;
        require(&self.package_name, "package name")
    }

    /// Whether any search constraint is set, which routes the lookup through
    /// the search endpoint instead of the full listing.
    pub fn is_filtered(&self) -> bool {
        !is_blank(&self.filter) || !is_blank(&self.dist) || !is_blank(&self.arch)
    }

    /// Search options carrying only the filter constraints.
    ///
    /// No free-text query is sent; the package name is matched exactly on
    /// the returned fragments.
    pub fn to_search_options(&self) -> SearchOptions {
        SearchOptions {
            repo: self.repo.clone(),
            query: String::new(),
            filter: self.filter.clone(),
            dist: self.dist.clone(),
            arch: self.arch.clone(),
            per_page: self.per_page,
        }
    }
}

impl Client {
    /// Count package units per version key for `options.package_name`.
    ///
    /// Fragments of other packages returned by a fuzzy search are ignored.
    pub async fn list_versions(&self, options: &ListVersionsOptions) -> Result<PackageVersions> {
        options.validate()?;

        let versions = Arc::new(Mutex::new(PackageVersions::new()));
        let sink = Arc::clone(&versions);
        let name = options.package_name.clone();
        let record = move |packages: Vec<PackageFragment>| {
            let mut versions = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            for package in packages.iter().filter(|p| p.name == name) {
                versions.record(package);
            }
        };

        let streamed = if options.is_filtered() {
            self.search_stream(&options.to_search_options(), record).await
        } else {
            self.list_packages_stream(&options.repo, options.per_page, record)
                .await
        };
        streamed.during("list versions")?;

        let versions = std::mem::take(&mut *versions.lock().unwrap_or_else(|p| p.into_inner()));
        tracing::debug!(
            repo = %options.repo,
            package = %options.package_name,
            distinct = versions.len(),
            "Resolved package versions"
        );
        Ok(versions)
    }

    /// Highest version of the package.
    pub async fn latest_version(&self, options: &ListVersionsOptions) -> Result<String> {
        self.list_versions(options)
            .await?
            .latest_version()
            .during("latest version")
    }

    /// Second-highest version of the package.
    pub async fn previous_version(&self, options: &ListVersionsOptions) -> Result<String> {
        self.list_versions(options)
            .await?
            .previous_version()
            .during("previous version")
    }
}
