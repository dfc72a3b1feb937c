// Price Catalog - Core Library
// Aggregates supplier price lists into one catalog comparable by price per kg

pub mod error;
pub mod headers;    // Column discovery from header synonyms
pub mod record;     // Row normalization
pub mod catalog;    // Directory ingest, search
pub mod report;     // Sorting, console lines, HTML/JSON export
pub mod repl;       // Interactive search session
pub mod logging;

// Re-export commonly used types
pub use error::{CatalogError, Result};
pub use headers::{resolve, role_of, ColumnMapping, Role, SYNONYMS};
pub use record::{normalize, price_per_unit, ParsePolicy, Record, RowError, RowErrorKind};
pub use catalog::{is_price_file, Catalog, FileReport, IngestOptions, IngestReport};
pub use report::{
    export, format_line, get_exporter, render_sorted,
    ExportFormat, Exporter, HtmlExporter, JsonExporter,
};
pub use repl::{Session, DEFAULT_EXIT_KEYWORD};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
