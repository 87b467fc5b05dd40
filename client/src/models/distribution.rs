//! Distribution catalog from `/api/v1/distributions.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::models::distro::Distro;

/// A distribution supported for one package type, e.g. `ubuntu` for `deb`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistroEntry {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub index_name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub versions: Vec<DistroVersion>,
}

/// One release of a distribution with the id the upload API requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistroVersion {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub index_name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub version_number: String,
}

/// Package type (`deb`, `rpm`, ...) to supported distributions.
///
/// Fetched fresh per invocation and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionCatalog(BTreeMap<String, Vec<DistroEntry>>);

impl DistributionCatalog {
    pub fn new(entries: BTreeMap<String, Vec<DistroEntry>>) -> Self {
        Self(entries)
    }

    pub fn package_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn distros(&self, package_type: &str) -> Option<&[DistroEntry]> {
        self.0.get(package_type).map(Vec::as_slice)
    }

    /// Every `(package type, distro/version)` pair in catalog order.
    pub fn iter_versions(&self) -> impl Iterator<Item = (&str, &DistroEntry, &DistroVersion)> {
        self.0.iter().flat_map(|(package_type, distros)| {
            distros.iter().flat_map(move |distro| {
                distro
                    .versions
                    .iter()
                    .map(move |version| (package_type.as_str(), distro, version))
            })
        })
    }

    /// Resolve a human `name/version` pair to the numeric distro-version id.
    pub fn distro_version_id(&self, package_type: &str, distro: &Distro) -> Result<u64> {
        let distros = self.distros(package_type).ok_or_else(|| {
            ClientError::Validation(format!(
                "package type was not found in distributions: {}",
                package_type
            ))
        })?;

        let entry = distros
            .iter()
            .find(|d| d.index_name == distro.name())
            .ok_or_else(|| {
                ClientError::Validation(format!(
                    "distro was not found for given name: {}",
                    distro.name()
                ))
            })?;

        entry
            .versions
            .iter()
            .find(|v| v.index_name == distro.version())
            .map(|v| v.id)
            .ok_or_else(|| {
                ClientError::Validation(format!(
                    "distro version was not found for given name and version: {}",
                    distro
                ))
            })
    }
}
