use anyhow::{Context, Result};
use lru::LruCache;
use qqwry::{file_reader, Database, LookupResult};
use rayon::prelude::*;
use rustc_hash::FxHasher;
use serde::Serialize;
use std::hash::BuildHasherDefault;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli_utils::{format_number, format_qps, open_database, OutputFormat};

type ResultCache = LruCache<String, LookupResult, BuildHasherDefault<FxHasher>>;

#[derive(Serialize)]
struct BatchRow<'a> {
    ip: &'a str,
    country: &'a str,
    area: &'a str,
}

pub fn cmd_batch(
    database: PathBuf,
    mmap: bool,
    inputs: Vec<PathBuf>,
    format: String,
    threads: Option<usize>,
    cache_size: usize,
) -> Result<()> {
    let format = OutputFormat::parse(&format)?;
    let db = open_database(&database, mmap)?;

    let mut addresses = Vec::new();
    for input in &inputs {
        let reader = file_reader::open(input)
            .with_context(|| format!("Failed to open input: {}", input.display()))?;
        let lines = file_reader::read_addresses(reader)
            .with_context(|| format!("Failed to read input: {}", input.display()))?;
        log::debug!("{}: {} addresses", input.display(), lines.len());
        addresses.extend(lines);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .build()
        .context("Failed to start worker pool")?;
    log::info!(
        "Looking up {} addresses on {} threads (cache: {})",
        format_number(addresses.len()),
        pool.current_num_threads(),
        if cache_size == 0 {
            "disabled".to_string()
        } else {
            format!("{} entries per worker", format_number(cache_size))
        }
    );

    let start = Instant::now();
    let results = pool.install(|| lookup_all(&db, &addresses, cache_size));
    let elapsed = start.elapsed().as_secs_f64();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    match format {
        OutputFormat::Json => {
            for (ip, result) in addresses.iter().zip(&results) {
                let row = BatchRow {
                    ip,
                    country: &result.country,
                    area: &result.area,
                };
                serde_json::to_writer(&mut out, &row)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            for (ip, result) in addresses.iter().zip(&results) {
                writer.serialize(BatchRow {
                    ip,
                    country: &result.country,
                    area: &result.area,
                })?;
            }
            writer.flush()?;
        }
    }
    out.flush()?;

    let found = results.iter().filter(|r| !r.is_empty()).count();
    log::info!(
        "{} of {} found in {:.3}s ({} queries/s)",
        format_number(found),
        format_number(results.len()),
        elapsed,
        format_qps(results.len() as f64 / elapsed.max(f64::EPSILON))
    );

    Ok(())
}

/// Order-preserving parallel lookup with one LRU cache per worker
fn lookup_all(db: &Database, addresses: &[String], cache_size: usize) -> Vec<LookupResult> {
    addresses
        .par_iter()
        .map_init(
            || {
                NonZeroUsize::new(cache_size)
                    .map(|cap| ResultCache::with_hasher(cap, BuildHasherDefault::default()))
            },
            |cache, address| match cache {
                Some(cache) => {
                    if let Some(hit) = cache.get(address) {
                        return hit.clone();
                    }
                    let result = db.find(address);
                    cache.put(address.clone(), result.clone());
                    result
                }
                None => db.find(address),
            },
        )
        .collect()
}
