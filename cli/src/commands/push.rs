use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;

use packagecloud_client::{
    package_type_for, validate_file_extensions, Client, Distro, PushPackageOptions, Repo,
};

/// `user/repo/distro/version` push target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub repo: Repo,
    pub distro: Distro,
}

impl FromStr for PushTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(format!(
                "invalid target, use format user/repo/distro/version, got '{}'",
                s
            ));
        }
        Ok(Self {
            repo: Repo::new(parts[0], parts[1]),
            distro: Distro::new(parts[2], parts[3]),
        })
    }
}

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Destination, as user/repo/distro/version
    pub target: PushTarget,

    /// Package files (.deb or .rpm, one type per push)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Skip over packages that already exist
    #[arg(long)]
    pub skip_exists: bool,
}

pub async fn run(client: &Client, args: PushArgs) -> anyhow::Result<()> {
    validate_file_extensions(args.files.as_slice())?;
    let package_type = package_type_for(&args.files[0])?;

    let catalog = client
        .distributions()
        .await
        .context("failed to fetch distributions")?;
    let distro_version_id = catalog.distro_version_id(package_type, &args.target.distro)?;

    for file_path in args.files {
        println!("uploading package: {}", file_path.display());
        let options = PushPackageOptions {
            repo: args.target.repo.clone(),
            distro_version_id,
            file_path,
        };
        match client.push_package(&options).await {
            Ok(_) => {}
            Err(e) if args.skip_exists && e.is_already_exists() => {
                println!("package already exists, skipping...");
            }
            Err(e) => return Err(anyhow::Error::new(e).context("failed to upload package")),
        }
    }
    Ok(())
}
