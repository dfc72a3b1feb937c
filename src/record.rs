// Row normalization: one resolved CSV row -> one comparable Record

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::headers::{ColumnMapping, Role};

// ============================================================================
// RECORD
// ============================================================================

/// Record - one product position, normalized to price per kilogram
///
/// Immutable once built: fields are private and `price_per_unit` is always
/// derived from `price` and `weight` in the constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    name: String,
    price: f64,
    weight: f64,
    source: String,
    price_per_unit: f64,
}

impl Record {
    pub fn new(name: impl Into<String>, price: f64, weight: f64, source: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            price,
            weight,
            source: source.into(),
            price_per_unit: price_per_unit(price, weight),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Weight as written in the source file, treated as kilograms
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// File name the record came from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }
}

/// Price per kilogram; zero weight yields 0 rather than an error.
pub fn price_per_unit(price: f64, weight: f64) -> f64 {
    if weight != 0.0 {
        price / weight
    } else {
        0.0
    }
}

// ============================================================================
// PARSE POLICY & ROW ERRORS
// ============================================================================

/// What to do with a data row that cannot be normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsePolicy {
    /// First bad row aborts the whole ingest
    #[default]
    Strict,
    /// Bad rows are skipped and collected in the ingest report
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowErrorKind {
    /// Row is shorter than the resolved column index
    MissingField { role: Role, column: usize },
    /// Value is not a finite, non-negative number
    InvalidNumber { role: Role, value: String },
    /// Name cell is blank after trimming
    EmptyName,
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowErrorKind::MissingField { role, column } => {
                write!(f, "missing {} field (column {})", role, column + 1)
            }
            RowErrorKind::InvalidNumber { role, value } => {
                write!(f, "invalid {} value {:?}", role, value)
            }
            RowErrorKind::EmptyName => f.write_str("empty product name"),
        }
    }
}

/// A data row that could not become a Record
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{source_file}, line {line}: {kind}")]
pub struct RowError {
    pub source_file: String,
    /// 1-based line in the source file (the header is line 1)
    pub line: usize,
    pub kind: RowErrorKind,
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Normalize one data row.
///
/// Returns `Ok(None)` when the mapping is unresolved (the row is skipped
/// silently), `Err` when a resolved field is missing or unparseable.
pub fn normalize<S: AsRef<str>>(
    row: &[S],
    mapping: &ColumnMapping,
    source: &str,
    line: usize,
) -> Result<Option<Record>, RowError> {
    let (name_col, price_col, weight_col) = match mapping {
        ColumnMapping::Resolved {
            name,
            price,
            weight,
        } => (*name, *price, *weight),
        ColumnMapping::Unresolved { .. } => return Ok(None),
    };

    let fail = |kind: RowErrorKind| RowError {
        source_file: source.to_string(),
        line,
        kind,
    };

    let name = cell(row, Role::Name, name_col).map_err(fail)?.trim();

    let raw_price = cell(row, Role::Price, price_col).map_err(fail)?;
    let price = parse_amount(raw_price).ok_or_else(|| {
        fail(RowErrorKind::InvalidNumber {
            role: Role::Price,
            value: raw_price.to_string(),
        })
    })?;

    let raw_weight = cell(row, Role::Weight, weight_col).map_err(fail)?;
    let weight = parse_amount(raw_weight).ok_or_else(|| {
        fail(RowErrorKind::InvalidNumber {
            role: Role::Weight,
            value: raw_weight.to_string(),
        })
    })?;

    if name.is_empty() {
        return Err(fail(RowErrorKind::EmptyName));
    }

    Ok(Some(Record::new(name, price, weight, source)))
}

fn cell<S: AsRef<str>>(row: &[S], role: Role, column: usize) -> Result<&str, RowErrorKind> {
    row.get(column)
        .map(|value| value.as_ref())
        .ok_or(RowErrorKind::MissingField { role, column })
}

/// Parse a price or weight cell: trimmed, finite, non-negative.
/// `-0` is folded into `0` so it sorts and prints like zero.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value + 0.0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::resolve;

    fn mapping() -> ColumnMapping {
        resolve(&["товар", "цена", "вес"])
    }

    #[test]
    fn test_record_derives_price_per_unit() {
        let record = Record::new("Яблоко", 100.0, 2.0, "price.csv");
        assert_eq!(record.price_per_unit(), 50.0);
        assert_eq!(record.name(), "Яблоко");
        assert_eq!(record.source(), "price.csv");
    }

    #[test]
    fn test_zero_weight_gives_zero_price_per_unit() {
        let record = Record::new("Соль", 25.0, 0.0, "price.csv");
        assert_eq!(record.price_per_unit(), 0.0);
        assert_eq!(price_per_unit(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_normalize_trims_name_and_numbers() {
        let record = normalize(&["  Хлеб ", " 40 ", "0.5 "], &mapping(), "price1.csv", 2)
            .unwrap()
            .unwrap();
        assert_eq!(record.name(), "Хлеб");
        assert_eq!(record.price(), 40.0);
        assert_eq!(record.weight(), 0.5);
        assert_eq!(record.price_per_unit(), 80.0);
    }

    #[test]
    fn test_normalize_unresolved_mapping_skips_row() {
        let unresolved = resolve(&["товар", "цена"]);
        let result = normalize(&["Хлеб", "40", "0.5"], &unresolved, "price.csv", 2);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_normalize_rejects_non_numeric_price() {
        let err = normalize(&["Хлеб", "сорок", "0.5"], &mapping(), "price.csv", 7).unwrap_err();
        assert_eq!(err.line, 7);
        assert_eq!(
            err.kind,
            RowErrorKind::InvalidNumber {
                role: Role::Price,
                value: "сорок".to_string()
            }
        );
        assert!(err.to_string().contains("price.csv, line 7"));
    }

    #[test]
    fn test_normalize_rejects_negative_and_non_finite_weight() {
        for bad in ["-1", "NaN", "inf", ""] {
            let err = normalize(&["Хлеб", "40", bad], &mapping(), "price.csv", 3).unwrap_err();
            assert!(
                matches!(err.kind, RowErrorKind::InvalidNumber { role: Role::Weight, .. }),
                "{:?} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_normalize_negative_zero_becomes_zero() {
        let record = normalize(&["Акция", "-0", "-0.0"], &mapping(), "price.csv", 2)
            .unwrap()
            .unwrap();
        assert!(record.price().is_sign_positive());
        assert!(record.weight().is_sign_positive());
        assert!(record.price_per_unit().is_sign_positive());
    }

    #[test]
    fn test_normalize_short_row() {
        let err = normalize(&["Хлеб", "40"], &mapping(), "price.csv", 4).unwrap_err();
        assert_eq!(
            err.kind,
            RowErrorKind::MissingField {
                role: Role::Weight,
                column: 2
            }
        );
    }

    #[test]
    fn test_normalize_empty_name() {
        let err = normalize(&["   ", "40", "1"], &mapping(), "price.csv", 5).unwrap_err();
        assert_eq!(err.kind, RowErrorKind::EmptyName);
    }

    #[test]
    fn test_parse_policy_default_is_strict() {
        assert_eq!(ParsePolicy::default(), ParsePolicy::Strict);
    }
}
