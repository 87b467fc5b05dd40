use clap::Subcommand;

use packagecloud_client::Client;

use crate::output::{print_json, render_table, Format};

#[derive(Subcommand, Debug)]
pub enum DistroAction {
    /// List available distros and versions per package type
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
}

pub async fn run(client: &Client, action: DistroAction) -> anyhow::Result<()> {
    match action {
        DistroAction::List { format } => {
            let catalog = client.distributions().await?;
            match format {
                Format::Json => print_json(&catalog)?,
                Format::Table => {
                    let rows: Vec<Vec<String>> = catalog
                        .iter_versions()
                        .map(|(package_type, distro, version)| {
                            vec![
                                package_type.to_string(),
                                distro.display_name.clone(),
                                version.display_name.clone(),
                                format!("{}/{}", distro.index_name, version.index_name),
                                version.id.to_string(),
                            ]
                        })
                        .collect();
                    print!(
                        "{}",
                        render_table(&["Type", "Distro", "Version", "Index Name", "ID"], &rows)
                    );
                }
            }
        }
    }
    Ok(())
}
