mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_batch, cmd_dump, cmd_inspect, cmd_query, cmd_validate};

#[derive(Parser)]
#[command(name = "qqwry")]
#[command(
    about = "IPv4 location lookups against a QQwry database",
    long_about = "qqwry - IPv4 location lookups against the legacy QQwry (qqwry.dat) database\n\n\
    Maps an IPv4 address to a country and area string. The database file is\n\
    loaded once; lookups are read-only and run in parallel for batch input.\n\n\
    Examples:\n\
      qqwry query 8.8.8.8\n\
      qqwry --database /srv/qqwry.dat query 1.2.3.4\n\
      qqwry batch addresses.txt --format csv\n\
      qqwry inspect --json\n\
      qqwry validate --level strict"
)]
#[command(version)]
struct Cli {
    /// Path to the QQwry database (.dat, or .dat.gz)
    #[arg(
        short,
        long,
        global = true,
        env = "QQWRY_DB",
        default_value = "qqwry/qqwry.dat",
        value_name = "PATH"
    )]
    database: PathBuf,

    /// Memory-map the database instead of reading it into memory
    #[arg(long, global = true)]
    mmap: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a single IPv4 address
    Query {
        /// Dotted-quad address, e.g. 1.2.3.4
        #[arg(value_name = "IP")]
        ip: String,

        /// Quiet mode - no output, only exit code (0 = found, 1 = not found)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Look up every address in one or more files (one per line)
    Batch {
        /// Input files, "-" for stdin; .gz files are decompressed
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output format: json (default, NDJSON) or csv
        #[arg(long, default_value = "json")]
        format: String,

        /// Number of worker threads (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// LRU cache capacity per worker (default: 10000, use 0 to disable)
        #[arg(long, default_value = "10000")]
        cache_size: usize,
    },

    /// Show header, record count and data version
    Inspect {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List every index range with its location
    Dump {
        /// Stop after this many ranges
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format: json (default, NDJSON) or csv
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Validate a database file for safety and correctness
    Validate {
        /// Validation level: standard or strict (default)
        #[arg(short, long, default_value = "strict")]
        level: String,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let database = cli.database;
    let mmap = cli.mmap;

    match cli.command {
        Commands::Query { ip, quiet } => cmd_query(database, mmap, ip, quiet),
        Commands::Batch {
            inputs,
            format,
            threads,
            cache_size,
        } => cmd_batch(database, mmap, inputs, format, threads, cache_size),
        Commands::Inspect { json } => cmd_inspect(database, mmap, json),
        Commands::Dump { limit, format } => cmd_dump(database, mmap, limit, format),
        Commands::Validate { level, json } => cmd_validate(database, level, json, cli.verbose > 0),
    }
}
