// Catalog - the in-memory aggregate of every normalized price record
//
// The catalog is an explicitly owned, append-only container. Ingest walks one
// directory (no recursion), picks the price files, resolves each file's
// header once and appends every normalized row.

use csv::ReaderBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::headers::{resolve, ColumnMapping, Role};
use crate::record::{normalize, ParsePolicy, Record, RowError};

/// Substring a file name must contain to be treated as a price list
pub const PRICE_FILE_MARKER: &str = "price";

/// Extension of the delimited-text price lists
pub const PRICE_FILE_EXTENSION: &str = ".csv";

/// Check whether a file name selects a price list (case-sensitive)
pub fn is_price_file(file_name: &str) -> bool {
    file_name.contains(PRICE_FILE_MARKER) && file_name.ends_with(PRICE_FILE_EXTENSION)
}

// ============================================================================
// INGEST OPTIONS & REPORTS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub policy: ParsePolicy,
}

impl IngestOptions {
    pub fn lenient() -> Self {
        IngestOptions {
            policy: ParsePolicy::Lenient,
        }
    }
}

/// Outcome of ingesting one price file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub mapping: ColumnMapping,
    pub records: usize,
    /// Rows skipped under the lenient policy
    pub row_errors: Vec<RowError>,
}

impl FileReport {
    pub fn is_resolved(&self) -> bool {
        self.mapping.is_resolved()
    }
}

/// Outcome of one ingest pass over a directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Directory entries looked at (files and subdirectories)
    pub entries_scanned: usize,
    pub files: Vec<FileReport>,
}

impl IngestReport {
    /// Files whose columns resolved (unresolved files are not counted)
    pub fn files_ingested(&self) -> usize {
        self.files.iter().filter(|f| f.is_resolved()).count()
    }

    pub fn records_added(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    /// Files that contributed nothing because a column role was missing
    pub fn unresolved_files(&self) -> Vec<(&str, &[Role])> {
        self.files
            .iter()
            .filter(|f| !f.is_resolved())
            .map(|f| (f.file.as_str(), f.mapping.missing()))
            .collect()
    }

    pub fn row_errors(&self) -> impl Iterator<Item = &RowError> {
        self.files.iter().flat_map(|f| f.row_errors.iter())
    }

    pub fn summary(&self) -> String {
        format!(
            "Files: {} ingested, {} unresolved; records: {}; skipped rows: {}",
            self.files_ingested(),
            self.unresolved_files().len(),
            self.records_added(),
            self.row_errors().count()
        )
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full contents in insertion order
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Case-insensitive substring search over product names.
    ///
    /// Results keep insertion order; sorting belongs to the reporter.
    pub fn search(&self, text: &str) -> Vec<&Record> {
        let needle = text.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Ingest a directory with the reference (strict) policy
    pub fn ingest(&mut self, dir: &Path) -> Result<IngestReport> {
        self.ingest_with(dir, &IngestOptions::default())
    }

    /// Ingest every price file directly inside `dir`.
    ///
    /// Matching files are processed in file-name order so the catalog's
    /// insertion order does not depend on the platform's directory listing.
    pub fn ingest_with(&mut self, dir: &Path, options: &IngestOptions) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut candidates: Vec<(String, PathBuf)> = Vec::new();

        let entries = fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
            report.entries_scanned += 1;

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();

            if !is_price_file(&file_name) {
                debug!(file = %file_name, "ignoring non-price file");
                continue;
            }
            if !path.is_file() {
                debug!(file = %file_name, "ignoring directory entry that is not a file");
                continue;
            }

            candidates.push((file_name, path));
        }

        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        for (_, path) in candidates {
            let file_report = self.ingest_file(&path, options.policy)?;
            report.files.push(file_report);
        }

        info!(dir = %dir.display(), "{}", report.summary());
        Ok(report)
    }

    /// Ingest a single price file.
    ///
    /// The file's rows are appended only once the whole file has been read;
    /// under `ParsePolicy::Strict` the first bad row returns an error and the
    /// catalog is left as it was before this file.
    pub fn ingest_file(&mut self, path: &Path, policy: ParsePolicy) -> Result<FileReport> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| CatalogError::csv(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| CatalogError::csv(path, e))?
            .clone();
        let mapping = resolve(&headers.iter().collect::<Vec<_>>());

        if !mapping.is_resolved() {
            let missing: Vec<&str> = mapping.missing().iter().map(|r| r.label()).collect();
            warn!(file = %file_name, missing = ?missing, "no usable columns, file skipped");
            return Ok(FileReport {
                file: file_name,
                mapping,
                records: 0,
                row_errors: Vec::new(),
            });
        }

        let mut buffered = Vec::new();
        let mut row_errors = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let row = result.map_err(|e| CatalogError::csv(path, e))?;
            // Header is line 1
            let line = row
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            match normalize(&row.iter().collect::<Vec<_>>(), &mapping, &file_name, line) {
                Ok(Some(record)) => buffered.push(record),
                Ok(None) => {}
                Err(err) => match policy {
                    ParsePolicy::Strict => return Err(err.into()),
                    ParsePolicy::Lenient => {
                        warn!("skipping row: {}", err);
                        row_errors.push(err);
                    }
                },
            }
        }

        debug!(file = %file_name, records = buffered.len(), "file ingested");

        let records = buffered.len();
        self.records.extend(buffered);

        Ok(FileReport {
            file: file_name,
            mapping,
            records,
            row_errors,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
