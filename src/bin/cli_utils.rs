use anyhow::{bail, Context, Result};
use qqwry::Database;
use std::path::Path;

/// Output format shared by the line-oriented commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => bail!("Invalid output format: '{}'. Must be: json or csv", s),
        }
    }
}

/// Open the database, failing with the path in the error chain
pub fn open_database(path: &Path, mmap: bool) -> Result<Database> {
    let db = Database::from(path)
        .mmap(mmap)
        .open()
        .with_context(|| format!("Failed to load database: {}", path.display()))?;
    log::info!(
        "Loaded {} ({} records)",
        path.display(),
        format_number(db.record_count() as usize)
    );
    Ok(db)
}

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

pub fn format_qps(qps: f64) -> String {
    if qps >= 1_000_000.0 {
        format!("{:.2}M", qps / 1_000_000.0)
    } else if qps >= 1_000.0 {
        format!("{:.2}K", qps / 1_000.0)
    } else {
        format!("{:.2}", qps)
    }
}
