//! Copy packages between repositories without re-uploading them.
//!
//! A malformed fragment or destination reaching the shared promote call means
//! upstream validation was skipped, so it panics with a `BUG:` message rather
//! than returning an error.

use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::{Result, ResultExt, PAYMENT_REQUIRED};
use crate::http::{Client, RequestBody, ACCEPT_JSON};
use crate::models::distro::Distro;
use crate::models::package::PackageFragment;
use crate::models::repo::Repo;
use crate::services::search::SearchOptions;
use crate::validation::{is_blank, require};

/// Outcome of a completed promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionReport {
    pub source: Repo,
    pub destination: Repo,
    /// Every package promoted, in promotion order.
    pub packages: Vec<PackageFragment>,
}

impl PromotionReport {
    pub fn count(&self) -> usize {
        self.packages.len()
    }
}

/// Abort with a precondition-violation message.
fn bug(message: impl std::fmt::Display) -> ! {
    panic!("BUG: {}", message)
}

/// Relative promote endpoint for `fragment` in `repo`:
/// `/api/v1/repos/{user}/{repo}/{distro}/{version}/{filename}/promote.json`.
///
/// # Panics
///
/// If `repo` is invalid or the fragment lacks a distro version or filename.
pub fn build_promote_url(repo: &Repo, fragment: &PackageFragment) -> String {
    if let Err(e) = repo.validate() {
        bug(format_args!("repo validation failed: {}", e));
    }
    if is_blank(&fragment.distro_version) {
        bug("package has empty distro version");
    }
    if is_blank(&fragment.filename) {
        bug("package has empty filename");
    }

    format!(
        "/api/v1/repos/{}/{}/{}/promote.json",
        repo, fragment.distro_version, fragment.filename
    )
}

impl Client {
    /// Promote one package, identified by distro and exact filename, from
    /// `source` to `destination`.
    ///
    /// Every input is validated before any request is made.
    pub async fn promote_by_filename(
        &self,
        source: &Repo,
        destination: &Repo,
        distro: &Distro,
        filename: &str,
    ) -> Result<PromotionReport> {
        source.validate()?;
        destination.validate()?;
        distro.validate()?;
        require(filename, "filename")?;

        let mut fragment = PackageFragment {
            distro_version: distro.to_string(),
            filename: filename.to_string(),
            ..Default::default()
        };
        fragment.promote_url = build_promote_url(source, &fragment);

        self.promote(&fragment, source, destination)
            .await
            .during("promote by filename")?;

        Ok(PromotionReport {
            source: source.clone(),
            destination: destination.clone(),
            packages: vec![fragment],
        })
    }

    /// Promote every package matching `options` from `options.repo` to
    /// `destination`.
    ///
    /// The batch stops at the first failed promotion; packages promoted before
    /// it stay promoted.
    pub async fn promote_by_search(
        &self,
        destination: &Repo,
        options: &SearchOptions,
    ) -> Result<PromotionReport> {
        destination.validate()?;
        options.validate()?;
        let source = options.repo.clone();

        let packages = self.search(options).await.during("promote by search")?;

        for (promoted, fragment) in packages.iter().enumerate() {
            if let Err(e) = self.promote(fragment, &source, destination).await {
                tracing::warn!(
                    source = %source,
                    destination = %destination,
                    promoted,
                    remaining = packages.len() - promoted,
                    error = %e,
                    "Aborting batch promotion"
                );
                return Err::<PromotionReport, _>(e).during("promote by search");
            }
        }

        tracing::info!(
            source = %source,
            destination = %destination,
            count = packages.len(),
            "Promotion complete"
        );
        Ok(PromotionReport {
            source,
            destination: destination.clone(),
            packages,
        })
    }

    /// POST the fragment's promote endpoint with `destination` appended.
    async fn promote(&self, fragment: &PackageFragment, source: &Repo, destination: &Repo) -> Result<()> {
        let url = self.promote_endpoint(fragment, destination);

        tracing::info!(
            source = %source,
            destination = %destination,
            name = %fragment.name,
            version = %fragment.version,
            release = %fragment.release,
            epoch = fragment.epoch,
            architecture = %fragment.architecture,
            distro = %fragment.distro_version,
            filename = %fragment.filename,
            "Promoting package"
        );

        self.request(Method::POST, url, RequestBody::Empty, ACCEPT_JSON)
            .await?
            .error_for_status(&[PAYMENT_REQUIRED])?;
        Ok(())
    }

    /// # Panics
    ///
    /// If `destination` is invalid or the fragment's promote URL is missing
    /// or unparseable.
    fn promote_endpoint(&self, fragment: &PackageFragment, destination: &Repo) -> Url {
        if let Err(e) = destination.validate() {
            bug(format_args!("destination repo validation failed: {}", e));
        }
        if is_blank(&fragment.promote_url) {
            bug("package has empty promote url");
        }

        let mut url = match self.resolve(&fragment.promote_url) {
            Ok(url) => url,
            Err(e) => bug(format_args!("failed to parse promote url: {}", e)),
        };
        url.query_pairs_mut()
            .append_pair("destination", &destination.to_string());
        url
    }
}
