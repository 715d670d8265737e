//! Checksum command

use anyhow::{Context, Result};
use corekit_package::digest_directory;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ChecksumArgs;
use crate::output;

#[derive(Tabled)]
struct DigestRow {
    #[tabled(rename = "Filename")]
    name: String,
    #[tabled(rename = "Size (bytes)")]
    size: u64,
    #[tabled(rename = "SHA-256 checksum")]
    sha256: String,
}

pub fn run(args: ChecksumArgs) -> Result<i32> {
    let digests = digest_directory(args.dir.as_std_path())
        .with_context(|| format!("Failed to list {}", args.dir))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&digests)?);
        return Ok(0);
    }

    if digests.is_empty() {
        output::info(&format!("No files in {}", args.dir));
        return Ok(0);
    }

    let rows: Vec<DigestRow> = digests
        .into_iter()
        .map(|d| DigestRow {
            name: d.name,
            size: d.size,
            sha256: d.sha256,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(0)
}
