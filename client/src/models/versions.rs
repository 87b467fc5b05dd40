//! Version multiset and semantic-version ordering.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::models::package::PackageFragment;

/// Version key to the number of package units (e.g. per-architecture builds)
/// carrying it.
///
/// Keys are semantic versions, or `version-release` for RPM packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageVersions(BTreeMap<String, u64>);

impl PackageVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn increment(&mut self, key: impl Into<String>) {
        *self.0.entry(key.into()).or_insert(0) += 1;
    }

    /// Count `fragment` under its version key.
    pub fn record(&mut self, fragment: &PackageFragment) {
        self.increment(fragment.version_key());
    }

    pub fn count(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Every key parsed as a semantic version, newest first.
    ///
    /// Fails if any key is not valid semver, or if there are no keys.
    pub fn reverse_sorted(&self) -> Result<Vec<(semver::Version, &str)>> {
        let mut versions = Vec::with_capacity(self.0.len());
        for key in self.0.keys() {
            let version = parse_version(key)?;
            versions.push((version, key.as_str()));
        }
        if versions.is_empty() {
            return Err(ClientError::Validation("no versions available".to_string()));
        }

        versions.sort_by(|(a, _), (b, _)| b.cmp_precedence(a));
        Ok(versions)
    }

    /// The highest version key.
    pub fn latest_version(&self) -> Result<String> {
        let versions = self.reverse_sorted()?;
        Ok(versions[0].1.to_string())
    }

    /// The second-highest version key. Needs at least two distinct versions.
    pub fn previous_version(&self) -> Result<String> {
        let versions = self.reverse_sorted()?;
        match versions.get(1) {
            Some((_, key)) => Ok(key.to_string()),
            None => Err(ClientError::Validation(
                "no previous version available: only one version exists".to_string(),
            )),
        }
    }
}

impl FromIterator<(String, u64)> for PackageVersions {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_version(key: &str) -> Result<semver::Version> {
    semver::Version::parse(key).map_err(|e| {
        ClientError::Validation(format!("error parsing version {}: {}", key, e))
    })
}

/// Compare two semantic versions by precedence (build metadata ignored).
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    Ok(a.cmp_precedence(&b))
}
