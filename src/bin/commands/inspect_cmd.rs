use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use crate::cli_utils::{format_bytes, format_number, open_database};

pub fn cmd_inspect(database: PathBuf, mmap: bool, json_output: bool) -> Result<()> {
    let db = open_database(&database, mmap)?;

    let stats = db.stats();
    let version = db.version();
    let first = db.records().next();
    let last = db.records().last();

    if json_output {
        let output = json!({
            "file": database.display().to_string(),
            "file_size": stats.file_size,
            "mmap": stats.mmap,
            "index_start": stats.index_start,
            "index_end": stats.index_end,
            "record_count": stats.record_count,
            "first_ip": first.map(|r| r.addr().to_string()),
            "last_ip": last.map(|r| r.addr().to_string()),
            "version": version,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Database: {}", database.display());
        println!(
            "Size:     {} ({})",
            format_bytes(stats.file_size),
            if stats.mmap { "memory-mapped" } else { "in memory" }
        );
        println!();
        println!("Index:");
        println!("  Start:           {:#010x}", stats.index_start);
        println!("  End:             {:#010x}", stats.index_end);
        println!(
            "  Records:         {}",
            format_number(stats.record_count as usize)
        );
        if let (Some(first), Some(last)) = (first, last) {
            println!("  Address space:   {} - {}", first.addr(), last.addr());
        }
        println!();
        match version {
            Some(version) => println!("Version:  {}", version),
            None => println!("Version:  (none)"),
        }
    }

    Ok(())
}
