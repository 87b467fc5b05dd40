//! Distribution identifier (`name/version`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ClientError, Result};
use crate::validation::is_blank;

/// A distribution and release, e.g. `ubuntu/focal` or `el/8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Distro {
    name: String,
    version: String,
}

impl Distro {
    /// Build a distro without validating it.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `"name/version"`. Both halves must be non-blank.
    pub fn parse(s: &str) -> Result<Self> {
        let (name, version) = super::split_pair(s, "name/version").map_err(|e| match e {
            ClientError::Validation(msg) => ClientError::Validation(format!("invalid distro: {}", msg)),
            other => other,
        })?;
        Ok(Self { name, version })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.name) {
            return Err(ClientError::Validation(format!(
                "invalid distro: {}, name cannot be empty",
                self
            )));
        }
        if is_blank(&self.version) {
            return Err(ClientError::Validation(format!(
                "invalid distro: {}, version cannot be empty",
                self
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Distro {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Distro {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Distro {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
