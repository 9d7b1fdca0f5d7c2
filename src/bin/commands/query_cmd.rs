use anyhow::Result;
use qqwry::parse_ipv4;
use serde_json::json;
use std::path::PathBuf;

use crate::cli_utils::open_database;

pub fn cmd_query(database: PathBuf, mmap: bool, ip: String, quiet: bool) -> Result<()> {
    let db = open_database(&database, mmap)?;

    let Some(addr) = parse_ipv4(&ip) else {
        if !quiet {
            println!("{}", serde_json::to_string_pretty(&json!({ "error": "Error ip input." }))?);
        }
        std::process::exit(1);
    };

    let result = db.lookup(addr);
    let found = !result.is_empty();

    if quiet {
        std::process::exit(if found { 0 } else { 1 });
    }

    let output = json!({
        "ip": ip,
        "country": result.country,
        "area": result.area,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    std::process::exit(if found { 0 } else { 1 });
}
