use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;

use price_catalog::logging::init_logging;
use price_catalog::{export, get_exporter, Catalog, ExportFormat, IngestOptions, Session};

#[derive(Parser)]
#[command(name = "price-catalog")]
#[command(about = "Aggregate price lists and compare products by price per kilogram")]
#[command(version)]
struct Cli {
    /// Directory containing the price files (*price*.csv)
    #[arg(env = "PRICE_DIR", default_value = ".")]
    dir: PathBuf,

    /// Export destination (default: output.html / output.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export document format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Skip unparseable rows instead of aborting the load
    #[arg(long)]
    lenient: bool,

    /// Keyword that ends the interactive session
    #[arg(long, default_value = price_catalog::DEFAULT_EXIT_KEYWORD)]
    exit_keyword: String,

    /// Answer these queries and export without prompting (repeatable)
    #[arg(short, long)]
    query: Vec<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => ExportFormat::Html,
            Format::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // 1. Load every price file
    let options = if cli.lenient {
        IngestOptions::lenient()
    } else {
        IngestOptions::default()
    };

    let mut catalog = Catalog::new();
    let report = catalog
        .ingest_with(&cli.dir, &options)
        .with_context(|| format!("Failed to load price files from {}", cli.dir.display()))?;

    println!(
        "✓ Загружено {} позиций из {} файлов (пропущено строк: {})",
        catalog.len(),
        report.files_ingested(),
        report.row_errors().count()
    );

    // 2. Search
    let session = Session::new(&catalog).with_exit_keyword(&cli.exit_keyword);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.query.is_empty() {
        session
            .run(io::stdin().lock(), &mut out)
            .context("Interactive session failed")?;
    } else {
        for query in &cli.query {
            session.answer(query, &mut out)?;
        }
    }

    // 3. Export
    let format = ExportFormat::from(cli.format);
    let destination = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("output.{}", get_exporter(format).extension())));

    export(catalog.all(), &destination, format)
        .with_context(|| format!("Failed to export to {}", destination.display()))?;
    println!("Данные успешно экспортированы в {}", destination.display());

    Ok(())
}
