//! Loading of metadata and data files.
//!
//! Metadata is a CSV file with one row per column. Only `column_name` and
//! `data_type` are required; every other field is optional:
//!
//! ```text
//! column_name,data_type,min_value,max_value,unique_flag,allowed_values,business_rule
//! user_id,integer,,,true,,
//! age,integer,0,120,,,
//! income,float,0,,,,Correlates with age
//! category,categorical,,,,A|B|C,
//! ```

use once_cell::sync::Lazy;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ImputeError, InputKind, Result, ResultExt};
use crate::types::ColumnMetadata;
use crate::utils::{parse_flag, parse_numeric_string, series_to_strings};

// Separator for list-valued metadata fields - compiled once
static LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[|;]\s*").expect("Invalid regex: list separator"));

const REQUIRED_FIELDS: [&str; 2] = ["column_name", "data_type"];

/// Load column metadata from a CSV file.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<Vec<ColumnMetadata>> {
    let path = path.as_ref();
    ensure_exists(path, InputKind::Metadata)?;

    info!("Loading metadata from: {}", path.display());
    // Every field is read as text and parsed here
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context("Reading metadata file")?
        .finish()
        .context("Reading metadata file")?;

    let metadata = parse_metadata_frame(&raw)?;
    debug!("Loaded {} metadata records", metadata.len());
    Ok(metadata)
}

/// Load the dataset from a CSV file, letting polars infer the schema.
pub fn load_data(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    ensure_exists(path, InputKind::Data)?;

    info!("Loading dataset from: {}", path.display());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context("Reading data file")?
        .finish()
        .context("Reading data file")?;

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Check a metadata set before analysis.
///
/// Rejects an empty set, blank or duplicated names and inverted bounds.
pub fn validate_metadata(metadata: &[ColumnMetadata]) -> Result<()> {
    if metadata.is_empty() {
        return Err(ImputeError::EmptyMetadata);
    }

    let mut seen = HashSet::new();
    for (idx, meta) in metadata.iter().enumerate() {
        let row = idx + 1;
        if meta.column_name.trim().is_empty() {
            return Err(ImputeError::InvalidMetadata {
                row,
                reason: "column name is empty".to_string(),
            });
        }
        if !seen.insert(meta.column_name.as_str()) {
            return Err(ImputeError::DuplicateColumn(meta.column_name.clone()));
        }
        if let (Some(min), Some(max)) = (meta.min_value, meta.max_value)
            && min > max
        {
            return Err(ImputeError::InvalidMetadata {
                row,
                reason: format!(
                    "min_value {} is greater than max_value {} for '{}'",
                    min, max, meta.column_name
                ),
            });
        }
    }

    Ok(())
}

fn ensure_exists(path: &Path, kind: InputKind) -> Result<()> {
    if !path.exists() {
        return Err(ImputeError::FileNotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Turn an all-text metadata frame into records.
fn parse_metadata_frame(raw: &DataFrame) -> Result<Vec<ColumnMetadata>> {
    // normalized header -> values
    let mut fields: HashMap<String, Vec<Option<String>>> = HashMap::new();
    for column in raw.get_columns() {
        let key = column.name().trim().to_ascii_lowercase();
        let values = series_to_strings(column.as_materialized_series())?;
        fields.insert(key, values);
    }

    for required in REQUIRED_FIELDS {
        if !fields.contains_key(required) {
            return Err(ImputeError::InvalidMetadata {
                row: 0,
                reason: format!("missing required header '{}'", required),
            });
        }
    }

    let cell = |name: &str, idx: usize| -> Option<&str> {
        fields
            .get(name)
            .and_then(|values| values.get(idx))
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let mut records = Vec::with_capacity(raw.height());
    for idx in 0..raw.height() {
        let row = idx + 1;

        let name = cell("column_name", idx).ok_or_else(|| ImputeError::InvalidMetadata {
            row,
            reason: "column_name is empty".to_string(),
        })?;
        let type_name = cell("data_type", idx).ok_or_else(|| ImputeError::InvalidMetadata {
            row,
            reason: format!("data_type is empty for '{}'", name),
        })?;
        let mut meta = ColumnMetadata::from_type_name(name, type_name)?;
        meta.min_value = parse_number_field(cell("min_value", idx), "min_value", row)?;
        meta.max_value = parse_number_field(cell("max_value", idx), "max_value", row)?;
        meta.max_length = match cell("max_length", idx) {
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| ImputeError::InvalidMetadata {
                row,
                reason: format!("max_length '{}' is not a non-negative integer", raw),
            })?),
            None => None,
        };
        if let Some(flag) = parse_flag_field(cell("unique_flag", idx), "unique_flag", row)? {
            meta.unique_flag = flag;
        }
        if let Some(flag) = parse_flag_field(cell("nullable", idx), "nullable", row)? {
            meta.nullable = flag;
        }
        meta.description = cell("description", idx).map(str::to_string);
        meta.dependent_column = cell("dependent_column", idx).map(str::to_string);
        meta.business_rule = cell("business_rule", idx).map(str::to_string);
        meta.allowed_values = cell("allowed_values", idx)
            .map(|raw| {
                LIST_SEPARATOR
                    .split(raw)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        records.push(meta);
    }

    Ok(records)
}

fn parse_number_field(raw: Option<&str>, field: &str, row: usize) -> Result<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(raw) => parse_numeric_string(raw)
            .map(Some)
            .ok_or_else(|| ImputeError::InvalidMetadata {
                row,
                reason: format!("{} '{}' is not a number", field, raw),
            }),
    }
}

fn parse_flag_field(raw: Option<&str>, field: &str, row: usize) -> Result<Option<bool>> {
    match raw {
        None => Ok(None),
        Some(raw) => parse_flag(raw)
            .map(Some)
            .ok_or_else(|| ImputeError::InvalidMetadata {
                row,
                reason: format!("{} '{}' is not a boolean flag", field, raw),
            }),
    }
}
