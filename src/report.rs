// Reporter - sorted listings for the console and export documents

use askama::Template;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{CatalogError, Result};
use crate::record::Record;

// ============================================================================
// SORTING & CONSOLE LINES
// ============================================================================

/// Sort records ascending by price per kilogram.
///
/// The sort is stable: records with equal price per unit keep their
/// relative input order.
pub fn render_sorted<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sorted: Vec<&Record> = records.into_iter().collect();
    sorted.sort_by(|a, b| a.price_per_unit().total_cmp(&b.price_per_unit()));
    sorted
}

/// One-line rendering for interactive display
pub fn format_line(rank: usize, record: &Record) -> String {
    format!(
        "{} - {}, Цена: {}, Вес: {}, Файл: {}, Цена за кг.: {:.2}",
        rank,
        record.name(),
        record.price(),
        record.weight(),
        record.source(),
        record.price_per_unit()
    )
}

// ============================================================================
// EXPORTERS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Html,
    Json,
}

/// Exporter - renders an already sorted listing as a self-contained document
pub trait Exporter {
    /// Render `records` (already in rank order)
    fn render(&self, records: &[&Record]) -> Result<String>;

    /// File extension conventionally used for this format
    fn extension(&self) -> &str;
}

/// Factory: exporter for a format
pub fn get_exporter(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Html => Box::new(HtmlExporter::new()),
        ExportFormat::Json => Box::new(JsonExporter::new()),
    }
}

/// Sort `records` and write them to `destination`, replacing any existing file
pub fn export<'a, I>(records: I, destination: &Path, format: ExportFormat) -> Result<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let sorted = render_sorted(records);
    let document = get_exporter(format).render(&sorted)?;

    let file = File::create(destination).map_err(|e| CatalogError::io(destination, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(document.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| CatalogError::io(destination, e))?;

    info!(
        path = %destination.display(),
        rows = sorted.len(),
        "export written"
    );
    Ok(sorted.len())
}

/// One table row, formatted for display
struct HtmlRow<'a> {
    rank: usize,
    name: &'a str,
    price: f64,
    weight: f64,
    source: &'a str,
    price_per_unit: String,
}

#[derive(Template)]
#[template(path = "export.html")]
struct ExportTemplate<'a> {
    title: &'a str,
    rows: Vec<HtmlRow<'a>>,
    generated_at: String,
}

/// HTML table: №, name, price, weight, file, price per kg
pub struct HtmlExporter {
    title: String,
}

impl HtmlExporter {
    pub fn new() -> Self {
        HtmlExporter {
            title: "Позиции продуктов".to_string(),
        }
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for HtmlExporter {
    fn render(&self, records: &[&Record]) -> Result<String> {
        let template = ExportTemplate {
            title: &self.title,
            rows: records
                .iter()
                .enumerate()
                .map(|(idx, record)| HtmlRow {
                    rank: idx + 1,
                    name: record.name(),
                    price: record.price(),
                    weight: record.weight(),
                    source: record.source(),
                    price_per_unit: format!("{:.2}", record.price_per_unit()),
                })
                .collect(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Ok(template.render()?)
    }

    fn extension(&self) -> &str {
        "html"
    }
}

/// JSON document with ranked rows
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        JsonExporter
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    rank: usize,
    name: &'a str,
    price: f64,
    weight: f64,
    source: &'a str,
    /// Two decimals, as shown in every other listing
    price_per_unit: String,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: DateTime<Local>,
    rows: Vec<JsonRow<'a>>,
}

impl Exporter for JsonExporter {
    fn render(&self, records: &[&Record]) -> Result<String> {
        let document = JsonDocument {
            generated_at: Local::now(),
            rows: records
                .iter()
                .enumerate()
                .map(|(idx, record)| JsonRow {
                    rank: idx + 1,
                    name: record.name(),
                    price: record.price(),
                    weight: record.weight(),
                    source: record.source(),
                    price_per_unit: format!("{:.2}", record.price_per_unit()),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn extension(&self) -> &str {
        "json"
    }
}

// ============================================================================
// TESTS
// ============================================================================
