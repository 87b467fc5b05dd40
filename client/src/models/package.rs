//! Package rows returned by the search and listing endpoints.

use serde::{Deserialize, Serialize};

/// The RPM package type. RPM builds are distinguished by their release.
pub const RPM_PACKAGE_TYPE: &str = "rpm";

/// A lightweight package record from `search.json` or `packages.json`.
///
/// Produced only by API responses. Fields the server omits default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageFragment {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub created_at: String,
    /// Distro and version label, e.g. `ubuntu/focal`.
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub distro_version: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub version: String,
    /// RPM release, empty for other types.
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub release: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub architecture: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub epoch: i64,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub scope: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub private: bool,
    /// Package type: `deb`, `rpm`, `gem`, ...
    #[serde(rename = "type", deserialize_with = "crate::models::null_as_default")]
    pub package_type: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub filename: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub uploader_name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub indexed: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub repository_html_url: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub package_url: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub package_html_url: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub downloads_detail_url: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub downloads_series_url: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub total_downloads_count: i64,
    /// Server-supplied relative endpoint for promoting this package.
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub promote_url: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub destroy_url: String,
}

impl PackageFragment {
    /// The key this package contributes to a version count.
    ///
    /// RPM packages append the release (`version-release`) so that builds of
    /// the same version stay distinct.
    pub fn version_key(&self) -> String {
        if self.package_type == RPM_PACKAGE_TYPE {
            format!("{}-{}", self.version, self.release)
        } else {
            self.version.clone()
        }
    }
}

/// True when every fragment has been indexed by the service.
pub fn all_indexed(packages: &[PackageFragment]) -> bool {
    packages.iter().all(|p| p.indexed)
}
