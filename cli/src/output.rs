//! Table and JSON rendering.

use clap::ValueEnum;
use serde::Serialize;

use packagecloud_client::PackageFragment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned columns sized to the widest cell.
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header.to_vec());
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub fn package_rows(packages: &[PackageFragment]) -> Vec<Vec<String>> {
    packages
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.distro_version.clone(),
                p.version.clone(),
                p.release.clone(),
                p.epoch.to_string(),
                p.indexed.to_string(),
            ]
        })
        .collect()
}

pub const PACKAGE_HEADER: &[&str] = &["Name", "Distro", "Version", "Release", "Epoch", "Indexed"];
