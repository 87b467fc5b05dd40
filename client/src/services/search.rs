//! Package search and repository listing.
//!
//! Both endpoints are paginated; results are available materialized
//! ([`Client::search`], [`Client::list_packages`]) or streamed page by page
//! ([`Client::search_stream`], [`Client::list_packages_stream`]).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use url::Url;

use crate::error::{ClientError, Result, ResultExt};
use crate::http::pagination::Page;
use crate::http::Client;
use crate::models::package::PackageFragment;
use crate::models::repo::Repo;
use crate::validation::is_blank;

/// Page size the CLI sends when the caller gives none.
pub const DEFAULT_PER_PAGE: u32 = 250;

/// Search request shape.
///
/// At least one of `query`, `filter`, `dist` or `arch` must be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub repo: Repo,
    /// Free-text query matched against package filenames.
    pub query: String,
    /// Package type (`deb`, `rpm`, `gem`, ...). Dropped when `dist` is set.
    pub filter: String,
    /// Distribution, e.g. `ubuntu` or `el/8`.
    pub dist: String,
    /// Architecture (`x86_64`, `amd64`, `arm64`, ...).
    pub arch: String,
    pub per_page: Option<u32>,
}

impl SearchOptions {
    pub fn new(repo: Repo) -> Self {
        Self {
            repo,
            query: String::new(),
            filter: String::new(),
            dist: String::new(),
            arch: String::new(),
            per_page: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_dist(mut self, dist: impl Into<String>) -> Self {
        self.dist = dist.into();
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Reject malformed repos and unconstrained searches, which would fetch
    /// the whole repository.
    pub fn validate(&self) -> Result<()> {
        self.repo.validate()?;
        if is_blank(&self.query) && is_blank(&self.filter) && is_blank(&self.dist) && is_blank(&self.arch)
        {
            return Err(ClientError::Validation(
                "one or more of query, filter, dist and/or arch must be specified".to_string(),
            ));
        }
        Ok(())
    }

    /// Query parameters in the order they are sent. `dist` overrides
    /// `filter`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        if !self.query.is_empty() {
            pairs.push(("q", self.query.clone()));
        }
        if !self.dist.is_empty() {
            pairs.push(("dist", self.dist.clone()));
        } else if !self.filter.is_empty() {
            pairs.push(("filter", self.filter.clone()));
        }
        if !self.arch.is_empty() {
            pairs.push(("arch", self.arch.clone()));
        }
        pairs
    }
}

fn search_path(repo: &Repo) -> String {
    format!("/api/v1/repos/{}/{}/search.json", repo.user(), repo.name())
}

fn packages_path(repo: &Repo) -> String {
    format!("/api/v1/repos/{}/{}/packages.json", repo.user(), repo.name())
}

fn decode_page(page: &Page) -> Result<Vec<PackageFragment>> {
    serde_json::from_slice(&page.body).map_err(|e| ClientError::unmarshal("package list", e, &page.body))
}

impl Client {
    fn search_url(&self, options: &SearchOptions) -> Result<Url> {
        let mut url = self.resolve(&search_path(&options.repo))?;
        url.query_pairs_mut()
            .extend_pairs(options.query_pairs().iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    fn packages_url(&self, repo: &Repo, per_page: Option<u32>) -> Result<Url> {
        let mut url = self.resolve(&packages_path(repo))?;
        if let Some(per_page) = per_page {
            url.query_pairs_mut()
                .append_pair("per_page", &per_page.to_string());
        }
        Ok(url)
    }

    /// Decode every page of `start` and feed it to `callback` with its page
    /// number.
    async fn stream_fragments<F>(&self, start: Url, callback: F) -> Result<()>
    where
        F: Fn(usize, Vec<PackageFragment>) + Send + Sync + 'static,
    {
        self.paginate(start, move |page| {
            let packages = decode_page(&page)?;
            callback(page.number, packages);
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Collect all fragments from `start`, reassembled in document order.
    async fn collect_fragments(&self, start: Url) -> Result<Vec<PackageFragment>> {
        let pages: Arc<Mutex<BTreeMap<usize, Vec<PackageFragment>>>> = Arc::default();

        let sink = Arc::clone(&pages);
        self.stream_fragments(start, move |number, packages| {
            sink.lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(number, packages);
        })
        .await?;

        let pages = std::mem::take(&mut *pages.lock().unwrap_or_else(|p| p.into_inner()));
        Ok(pages.into_values().flatten().collect())
    }

    /// Every package matching `options`, across all pages.
    pub async fn search(&self, options: &SearchOptions) -> Result<Vec<PackageFragment>> {
        options.validate()?;
        let url = self.search_url(options)?;
        let packages = self.collect_fragments(url).await.during("search")?;
        tracing::debug!(repo = %options.repo, count = packages.len(), "Search complete");
        Ok(packages)
    }

    /// Like [`Client::search`], but hands each decoded page to `callback`
    /// instead of materializing the result. Pages may arrive out of order.
    pub async fn search_stream<F>(&self, options: &SearchOptions, callback: F) -> Result<()>
    where
        F: Fn(Vec<PackageFragment>) + Send + Sync + 'static,
    {
        options.validate()?;
        let url = self.search_url(options)?;
        self.stream_fragments(url, move |_, packages| callback(packages))
            .await
            .during("search")
    }

    /// Every package in `repo`, across all pages.
    pub async fn list_packages(&self, repo: &Repo) -> Result<Vec<PackageFragment>> {
        repo.validate()?;
        let url = self.packages_url(repo, None)?;
        self.collect_fragments(url).await.during("list packages")
    }

    /// Streaming form of [`Client::list_packages`].
    pub async fn list_packages_stream<F>(
        &self,
        repo: &Repo,
        per_page: Option<u32>,
        callback: F,
    ) -> Result<()>
    where
        F: Fn(Vec<PackageFragment>) + Send + Sync + 'static,
    {
        repo.validate()?;
        let url = self.packages_url(repo, per_page)?;
        self.stream_fragments(url, move |_, packages| callback(packages))
            .await
            .during("list packages")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn options() -> SearchOptions {
        SearchOptions::new(Repo::new("ecorp", "staging"))
    }

    #[test]
    fn test_validate_rejects_unconstrained_search() {
        let err = options().validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("query, filter, dist"));
    }

    #[test]
    fn test_validate_rejects_blank_constraints() {
        assert!(options().with_query("  ").validate().is_err());
    }

    #[test]
    fn test_validate_any_single_constraint() {
        assert!(options().with_query("sensu").validate().is_ok());
        assert!(options().with_filter("rpm").validate().is_ok());
        assert!(options().with_dist("el/8").validate().is_ok());
        assert!(options().with_arch("x86_64").validate().is_ok());
    }

    #[test]
    fn test_validate_checks_repo() {
        let options = SearchOptions::new(Repo::new("", "staging")).with_query("x");
        assert!(options.validate().unwrap_err().to_string().contains("user cannot be empty"));
    }

    #[test]
    fn test_dist_overrides_filter() {
        let pairs = options().with_filter("rpm").with_dist("el/8").query_pairs();
        assert!(pairs.contains(&("dist", "el/8".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "filter"));
    }

    #[test]
    fn test_filter_without_dist() {
        let pairs = options().with_filter("deb").query_pairs();
        assert_eq!(pairs, vec![("filter", "deb".to_string())]);
    }

    #[test]
    fn test_all_pairs() {
        let pairs = options()
            .with_query("agent")
            .with_arch("amd64")
            .with_dist("ubuntu/focal")
            .with_per_page(DEFAULT_PER_PAGE)
            .query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("per_page", "250".to_string()),
                ("q", "agent".to_string()),
                ("dist", "ubuntu/focal".to_string()),
                ("arch", "amd64".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_encodes_parameters() {
        let client = Client::new(ClientConfig::new("https://pc.example.com", "t")).unwrap();
        let url = client
            .search_url(&options().with_query("sensu go").with_dist("el/8"))
            .unwrap();
        assert_eq!(url.path(), "/api/v1/repos/ecorp/staging/search.json");
        assert_eq!(url.query(), Some("q=sensu+go&dist=el%2F8"));
    }

    #[test]
    fn test_packages_url() {
        let client = Client::new(ClientConfig::new("https://pc.example.com", "t")).unwrap();
        let repo = Repo::new("ecorp", "staging");
        let url = client.packages_url(&repo, Some(100)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://pc.example.com/api/v1/repos/ecorp/staging/packages.json?per_page=100"
        );
        assert_eq!(client.packages_url(&repo, None).unwrap().query(), None);
    }

    #[test]
    fn test_decode_page_keeps_bad_body() {
        let page = Page {
            number: 0,
            body: bytes::Bytes::from_static(b"{\"error\": 1}"),
        };
        match decode_page(&page).unwrap_err() {
            ClientError::Unmarshal { body, .. } => assert_eq!(body, b"{\"error\": 1}"),
            other => panic!("expected Unmarshal, got {:?}", other),
        }
    }
}
