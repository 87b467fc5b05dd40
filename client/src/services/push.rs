//! Package upload.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::error::{ClientError, Result, ResultExt, FILENAME_TAKEN, PAYMENT_REQUIRED};
use crate::http::{Client, RequestBody, ACCEPT_JSON};
use crate::models::repo::Repo;

const SUPPORTED_EXTENSIONS: &[&str] = &["deb", "rpm"];

/// Package file extensions the upload workflow accepts, with leading dot.
pub fn supported_file_extensions() -> Vec<String> {
    SUPPORTED_EXTENSIONS.iter().map(|e| format!(".{}", e)).collect()
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Package type (`deb`, `rpm`) implied by the file extension.
pub fn package_type_for(path: &Path) -> Result<&'static str> {
    let ext = extension(path).unwrap_or_default();
    SUPPORTED_EXTENSIONS
        .iter()
        .copied()
        .find(|supported| *supported == ext)
        .ok_or_else(|| {
            ClientError::Validation(format!(
                "invalid file extension: '{}', supported extensions: {}",
                ext,
                supported_file_extensions().join(", ")
            ))
        })
}

/// Reject unsupported extensions and batches mixing package types.
pub fn validate_file_extensions<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    let mut types = BTreeSet::new();
    for path in paths {
        types.insert(package_type_for(path.as_ref())?);
    }
    if types.len() > 1 {
        return Err(ClientError::Validation(
            "cannot push multiple packages of different types at the same time".to_string(),
        ));
    }
    Ok(())
}

/// Upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPackageOptions {
    pub repo: Repo,
    /// Numeric id from the distribution catalog.
    pub distro_version_id: u64,
    pub file_path: PathBuf,
}

impl PushPackageOptions {
    pub fn validate(&self) -> Result<()> {
        self.repo.validate()?;
        if self.file_path.file_name().is_none() {
            return Err(ClientError::Validation(format!(
                "file path has no file name: {}",
                self.file_path.display()
            )));
        }
        Ok(())
    }
}

impl Client {
    /// Upload one package file.
    ///
    /// A duplicate filename fails with [`ClientError::AlreadyExists`] so that
    /// callers may skip it. Returns the raw response body.
    pub async fn push_package(&self, options: &PushPackageOptions) -> Result<Bytes> {
        options.validate()?;
        self.upload(options).await.during("push package")
    }

    async fn upload(&self, options: &PushPackageOptions) -> Result<Bytes> {
        let filename = options
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = tokio::fs::read(&options.file_path).await?;
        let size = content.len();

        let form = Form::new()
            .text("package[distro_version_id]", options.distro_version_id.to_string())
            .part(
                "package[package_file]",
                Part::bytes(content).file_name(filename.clone()),
            );

        let url = self.resolve(&format!(
            "/api/v1/repos/{}/{}/packages.json",
            options.repo.user(),
            options.repo.name()
        ))?;

        let response = self
            .request(Method::POST, url, RequestBody::Multipart(form), ACCEPT_JSON)
            .await?
            .error_for_status(&[FILENAME_TAKEN, PAYMENT_REQUIRED])?;

        tracing::info!(
            repo = %options.repo,
            distro_version_id = options.distro_version_id,
            filename = %filename,
            bytes = size,
            "Package uploaded"
        );
        Ok(response.body)
    }
}
