use anyhow::Result;
use qqwry::format::{u32_le, ENTRY_IP_LEN};
use qqwry::{Database, IndexRecord};
use serde::Serialize;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::path::PathBuf;

use crate::cli_utils::{open_database, OutputFormat};

#[derive(Serialize)]
struct DumpRow {
    start: Ipv4Addr,
    end: Ipv4Addr,
    country: String,
    area: String,
}

pub fn cmd_dump(
    database: PathBuf,
    mmap: bool,
    limit: Option<usize>,
    format: String,
) -> Result<()> {
    let format = OutputFormat::parse(&format)?;
    let db = open_database(&database, mmap)?;
    let rows = ranges(&db).take(limit.unwrap_or(usize::MAX));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut written = 0usize;
    match format {
        OutputFormat::Json => {
            for row in rows {
                serde_json::to_writer(&mut out, &row)?;
                writeln!(out)?;
                written += 1;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            for row in rows {
                writer.serialize(&row)?;
                written += 1;
            }
            writer.flush()?;
        }
    }
    out.flush()?;
    log::info!("Dumped {} ranges", written);

    Ok(())
}

/// Every index range with its decoded location
fn ranges(db: &Database) -> impl Iterator<Item = DumpRow> + '_ {
    let mut records = db.records().peekable();
    std::iter::from_fn(move || {
        let record = records.next()?;
        let end = match records.peek() {
            Some(next) => Ipv4Addr::from(next.ip().saturating_sub(1)),
            None => entry_end(db, &record),
        };
        let location = db.entry(record.pointer());
        Some(DumpRow {
            start: record.addr(),
            end,
            country: location.country,
            area: location.area,
        })
    })
}

/// End address stored at the head of the record's data entry
fn entry_end(db: &Database, record: &IndexRecord) -> Ipv4Addr {
    let bytes = db.as_bytes();
    let pointer = (record.pointer() as usize).min(bytes.len());
    let end = pointer.saturating_add(ENTRY_IP_LEN).min(bytes.len());
    Ipv4Addr::from(u32_le(&bytes[pointer..end]))
}
