//! rangefetch CLI: fetch, plan, and status commands.
//!
//! Commands:
//! - `fetch`: download every symbol (or the given ones) into the data directory
//! - `plan`: print the sub-ranges and export URLs for one symbol, no network
//! - `symbols`: list the symbol table
//! - `status`: report each symbol directory and its manifest

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rangefetch_core::data::{
    build_requests, fetch_symbols, partition, units_for, ArtifactStore, CsvStore, ExportClient,
    FetchContext, StdoutProgress,
};
use rangefetch_core::domain::Granularity;
use rangefetch_core::FetchConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rangefetch",
    about = "rangefetch: historical US equity bars from the Finam export endpoint"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides shared by every command that reads the run configuration.
#[derive(Args)]
struct ConfigArgs {
    /// Path to a TOML config file. Every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Years of history to attempt.
    #[arg(long)]
    years: Option<u32>,

    /// Bar granularity: minute or tick.
    #[arg(long)]
    granularity: Option<Granularity>,

    /// Output root; one directory per symbol.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download symbols into the data directory.
    Fetch {
        /// Symbols to fetch. Defaults to the configured universe.
        symbols: Vec<String>,

        #[command(flatten)]
        overrides: ConfigArgs,

        /// Do not ask the export for a header row.
        #[arg(long, default_value_t = false)]
        no_headers: bool,
    },
    /// Print the sub-ranges and export URLs for a symbol without fetching.
    Plan {
        symbol: String,

        #[command(flatten)]
        overrides: ConfigArgs,
    },
    /// List the symbol table.
    Symbols {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Report symbol directories and their manifests.
    Status {
        #[command(flatten)]
        overrides: ConfigArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            symbols,
            overrides,
            no_headers,
        } => run_fetch(symbols, &overrides, no_headers),
        Commands::Plan { symbol, overrides } => run_plan(&symbol, &overrides),
        Commands::Symbols { config } => run_symbols(config.as_deref()),
        Commands::Status { overrides } => run_status(&overrides),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FetchConfig> {
    match path {
        Some(path) => FetchConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(FetchConfig::default()),
    }
}

impl ConfigArgs {
    /// The config file (or defaults) with the command-line overrides applied.
    fn resolve(&self) -> Result<FetchConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(years) = self.years {
            config.lookback_years = years;
        }
        if let Some(granularity) = self.granularity {
            config.granularity = granularity;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_fetch(symbols: Vec<String>, overrides: &ConfigArgs, no_headers: bool) -> Result<()> {
    let mut config = overrides.resolve()?;
    if no_headers {
        config.include_headers = false;
    }
    if !symbols.is_empty() {
        config.symbols = Some(symbols);
    }

    let table = config.load_symbol_table()?;
    let base_url = config.base_url()?;
    let client = ExportClient::from_config(&config)?;
    let store = CsvStore::new(&config.data_dir);

    let units = units_for(config.lookback_years, config.granularity)?;
    let ranges = partition(today(), units, config.granularity)?;
    info!(
        years = config.lookback_years,
        granularity = %config.granularity,
        ranges = ranges.len(),
        data_dir = %config.data_dir.display(),
        "starting run"
    );

    let universe = config.universe(&table);
    let sym_refs: Vec<&str> = universe.iter().map(|s| s.as_str()).collect();

    let ctx = FetchContext {
        transport: &client,
        store: &store,
        table: &table,
        base_url: &base_url,
        granularity: config.granularity,
        include_headers: config.include_headers,
        ranges: &ranges,
    };
    let summary = fetch_symbols(&ctx, &sym_refs, &StdoutProgress);

    if !summary.all_succeeded() {
        for (sym, err) in summary.failures() {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_plan(symbol: &str, overrides: &ConfigArgs) -> Result<()> {
    let config = overrides.resolve()?;
    let table = config.load_symbol_table()?;
    let base_url = config.base_url()?;

    let units = units_for(config.lookback_years, config.granularity)?;
    let ranges = partition(today(), units, config.granularity)?;
    let requests = build_requests(
        &table,
        &base_url,
        symbol,
        &ranges,
        config.granularity,
        config.include_headers,
    )?;

    println!(
        "{symbol}: {} {} range(s) over {} year(s), oldest first",
        requests.len(),
        config.granularity,
        config.lookback_years
    );
    println!("Output: {}", config.data_dir.join(symbol).display());
    println!();
    for (i, request) in requests.iter().enumerate() {
        println!("{i:>4}  {:<24}  {}", request.range().to_string(), request.file_stem());
        println!("      {}", request.url());
    }

    Ok(())
}

fn run_symbols(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let table = config.load_symbol_table()?;

    println!("{:<8} {:>10}", "Symbol", "Code");
    println!("{}", "-".repeat(19));
    for (ticker, code) in table.iter() {
        println!("{ticker:<8} {code:>10}");
    }
    println!();
    println!("{} symbol(s)", table.len());

    Ok(())
}

fn run_status(overrides: &ConfigArgs) -> Result<()> {
    let config = overrides.resolve()?;
    let data_dir = &config.data_dir;
    if !data_dir.exists() {
        println!("Data directory does not exist: {}", data_dir.display());
        return Ok(());
    }

    let store = CsvStore::new(data_dir);
    let symbols = store.list_symbols()?;
    if symbols.is_empty() {
        println!("Data directory is empty: {}", data_dir.display());
        return Ok(());
    }

    let mut total_size: u64 = 0;
    let mut rows: Vec<(String, String, String, String, u64)> = Vec::new();

    for symbol in &symbols {
        let size = dir_size(&store.symbol_dir(symbol));
        total_size += size;

        let (status, range, bars) = match store.read_manifest(symbol) {
            Some(m) => (
                m.status.to_string(),
                m.first_viable
                    .map(|r| format!("from {}", r.start()))
                    .unwrap_or_else(|| "-".into()),
                format!("{} bars", m.total_rows()),
            ),
            None => ("(no manifest)".into(), "-".into(), "-".into()),
        };
        rows.push((symbol.clone(), status, range, bars, size));
    }

    println!("Data: {}", data_dir.display());
    println!("Symbols: {}", symbols.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!(
        "{:<8} {:<14} {:<16} {:<14} {:>10}",
        "Symbol", "Status", "First Viable", "Bars", "Size"
    );
    println!("{}", "-".repeat(66));
    for (sym, status, range, bars, size) in &rows {
        println!(
            "{:<8} {:<14} {:<16} {:<14} {:>10}",
            sym,
            status,
            range,
            bars,
            format_size(*size)
        );
    }

    Ok(())
}

fn dir_size(path: &Path) -> u64 {
    let mut size = 0u64;
    if let Ok(entries) = std::fs::read_dir(path) {
        for entry in entries.flatten() {
            if let Ok(meta) = entry.metadata() {
                size += meta.len();
            }
        }
    }
    size
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
