//! Shared input validation helpers.
//!
//! Centralizes the blank-field and URL rules used by the identifier types,
//! the option structs and the client configuration.

use crate::error::{ClientError, Result};

/// True when the string is empty or only whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Fail with a validation error naming `label` when `value` is blank.
pub fn require(value: &str, label: &str) -> Result<()> {
    if is_blank(value) {
        return Err(ClientError::Validation(format!("{} cannot be empty", label)));
    }
    Ok(())
}

/// Validate that a service URL is absolute, uses http(s) and has a host.
///
/// `label` is used in error messages (e.g. "Service URL").
pub fn validate_service_url(url_str: &str, label: &str) -> Result<url::Url> {
    if is_blank(url_str) {
        return Err(ClientError::Config(format!("{} must not be empty", label)));
    }

    let parsed = url::Url::parse(url_str)
        .map_err(|e| ClientError::Config(format!("Invalid {}: {}", label, e)))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ClientError::Config(format!(
            "{} must use http or https",
            label
        )));
    }

    if parsed.host_str().is_none() {
        return Err(ClientError::Config(format!("{} must have a host", label)));
    }

    Ok(parsed)
}
