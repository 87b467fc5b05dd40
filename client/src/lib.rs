//! Client library for the packagecloud REST API.
//!
//! Covers the distribution catalog, package search and listing, version
//! resolution, promotion between repositories and package upload.
//!
//! ```no_run
//! use packagecloud_client::{Client, ClientConfig, Repo, SearchOptions};
//!
//! # async fn run() -> packagecloud_client::Result<()> {
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let options = SearchOptions::new(Repo::parse("ecorp/staging")?).with_query("agent");
//! for package in client.search(&options).await? {
//!     println!("{} {}", package.name, package.version_key());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod validation;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::pagination::{Page, PaginationStats};
pub use http::Client;
pub use models::distribution::{DistributionCatalog, DistroEntry, DistroVersion};
pub use models::distro::Distro;
pub use models::package::{all_indexed, PackageFragment};
pub use models::repo::Repo;
pub use models::versions::{compare_versions, PackageVersions};
pub use services::promote::PromotionReport;
pub use services::push::{
    package_type_for, supported_file_extensions, validate_file_extensions, PushPackageOptions,
};
pub use services::search::{SearchOptions, DEFAULT_PER_PAGE};
pub use services::versions::ListVersionsOptions;

pub use tokio_util::sync::CancellationToken;
