//! List command

use anyhow::Result;
use corekit_core::Registry;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ListArgs;

#[derive(Tabled, Serialize)]
struct PlatformRow {
    name: String,
    board: String,
    #[tabled(rename = "board OPN")]
    board_opn: String,
    stack: String,
    prebuilt: String,
    ai: String,
}

#[derive(Tabled, Serialize)]
struct GroupRow {
    name: String,
    members: usize,
    description: String,
}

#[derive(Serialize)]
struct Listing {
    groups: Vec<GroupRow>,
    platforms: Vec<PlatformRow>,
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

pub fn run(args: ListArgs) -> Result<i32> {
    let registry = Registry::builtin()?;

    let groups: Vec<GroupRow> = registry
        .groups()
        .iter()
        .map(|g| GroupRow {
            name: g.name.to_string(),
            members: registry.filter(&g.filter).len(),
            description: g.description.to_string(),
        })
        .collect();

    let platforms: Vec<PlatformRow> = registry
        .platforms()
        .iter()
        .map(|p| PlatformRow {
            name: p.name.to_string(),
            board: p.arduino_variant_name.to_string(),
            board_opn: p.board_opn.to_string(),
            stack: p.protocol_stack.to_string(),
            prebuilt: yes_no(p.prebuild),
            ai: yes_no(p.ai_capable),
        })
        .collect();

    if args.json {
        let listing = Listing { groups, platforms };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(0);
    }

    println!("{}", "Groups".bold());
    println!("{}", Table::new(&groups).with(Style::rounded()));
    println!();
    println!("{}", "Platform configurations".bold());
    println!("{}", Table::new(&platforms).with(Style::rounded()));
    println!(
        "\n{} groups, {} platform configurations",
        groups.len().cyan(),
        platforms.len().cyan()
    );
    Ok(0)
}
