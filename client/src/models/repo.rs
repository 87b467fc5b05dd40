//! Repository identifier (`user/name`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ClientError, Result};
use crate::validation::is_blank;

/// A packagecloud repository, identified by its owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    user: String,
    name: String,
}

impl Repo {
    /// Build a repository without validating it. Call [`Repo::validate`]
    /// before using it in a request, or use [`Repo::parse`].
    pub fn new(user: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            name: name.into(),
        }
    }

    /// Parse `"user/name"`. Both halves must be non-blank.
    pub fn parse(s: &str) -> Result<Self> {
        let (user, name) = super::split_pair(s, "user/repo").map_err(|e| match e {
            ClientError::Validation(msg) => {
                ClientError::Validation(format!("invalid repository: {}", msg))
            }
            other => other,
        })?;
        Ok(Self { user, name })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.user) {
            return Err(ClientError::Validation(format!(
                "invalid repository: {}, user cannot be empty",
                self
            )));
        }
        if is_blank(&self.name) {
            return Err(ClientError::Validation(format!(
                "invalid repository: {}, name cannot be empty",
                self
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.name)
    }
}

impl FromStr for Repo {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Repo {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Repo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
