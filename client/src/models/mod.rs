//! Value types exchanged with the packagecloud API.

pub mod distribution;
pub mod distro;
pub mod package;
pub mod repo;
pub mod versions;

use serde::{Deserialize, Deserializer};

use crate::error::{ClientError, Result};
use crate::validation::is_blank;

/// Read an explicit JSON `null` as the field's default value.
///
/// The API sends `null` for fields that do not apply to a package type,
/// such as `release` on debs.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Split `"left/right"`, rejecting blank halves and extra slashes.
///
/// `format` is the human-readable shape used in the error message.
fn split_pair(s: &str, format: &str) -> Result<(String, String)> {
    match s.split_once('/') {
        Some((left, right)) if !is_blank(left) && !is_blank(right) && !right.contains('/') => {
            Ok((left.to_string(), right.to_string()))
        }
        _ => Err(ClientError::Validation(format!(
            "must be in the format '{}', got '{}'",
            format, s
        ))),
    }
}
