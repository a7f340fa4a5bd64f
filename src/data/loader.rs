use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use flate2::read::MultiGzDecoder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{Dataset, NameRecord, Sex};

/// Columns every input file must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["year", "sex", "name", "n", "proportion"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to produce a [`Dataset`]. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type '{0}' (expected .csv.zip, .csv.gz, .csv, .parquet or .json)")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("dataset contains no rows")]
    Empty,

    #[error("zip archive must hold exactly one CSV file, found {0} entries")]
    ZipEntries(usize),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    ZipCsv,
    GzipCsv,
    Csv,
    Parquet,
    Json,
}

fn detect_format(path: &Path) -> Result<Format, LoadError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if file_name.ends_with(".zip") {
        Ok(Format::ZipCsv)
    } else if file_name.ends_with(".gz") {
        Ok(Format::GzipCsv)
    } else if file_name.ends_with(".csv") {
        Ok(Format::Csv)
    } else if file_name.ends_with(".parquet") || file_name.ends_with(".pq") {
        Ok(Format::Parquet)
    } else if file_name.ends_with(".json") {
        Ok(Format::Json)
    } else {
        Err(LoadError::UnsupportedFormat(file_name))
    }
}

/// Load the name table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv.zip` – zip archive holding a single CSV (the distributed form)
/// * `.csv.gz` – gzip-compressed CSV with a header row; every gzip member is read
/// * `.csv`    – the same, uncompressed
/// * `.parquet` – Parquet with the five columns; numeric widths are normalised
/// * `.json`   – `[{ "year": 1880, "sex": "F", "name": "Mary", "n": 7065, "proportion": 0.07 }, ...]`
///
/// Row order of the file is preserved.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let format = detect_format(path)?;
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = match format {
        Format::ZipCsv => read_zip(file)?,
        Format::GzipCsv => read_csv(MultiGzDecoder::new(file))?,
        Format::Csv => read_csv(file)?,
        Format::Parquet => read_parquet(file)?,
        Format::Json => read_json(file)?,
    };

    let dataset = Dataset::from_records(records);
    if dataset.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(dataset)
}

fn check_proportion(proportion: f64, row: usize) -> Result<f64, LoadError> {
    if proportion.is_finite() && (0.0..=1.0).contains(&proportion) {
        Ok(proportion)
    } else {
        Err(LoadError::InvalidRow {
            row,
            message: format!("proportion {proportion} is outside [0, 1]"),
        })
    }
}

fn parse_sex(s: &str, row: usize) -> Result<Sex, LoadError> {
    s.parse()
        .map_err(|message| LoadError::InvalidRow { row, message })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least the five required columns, in any
/// order. Extra columns (e.g. a pandas index) are ignored.
fn read_csv<R: Read>(source: R) -> Result<Vec<NameRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();

    let mut idx = [0usize; 5];
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or(LoadError::MissingColumn(column))?;
    }
    let [year_idx, sex_idx, name_idx, n_idx, prop_idx] = idx;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();
        let invalid = |col: &str, value: &str| LoadError::InvalidRow {
            row,
            message: format!("'{value}' is not a valid {col}"),
        };

        let year = field(year_idx)
            .parse::<i32>()
            .map_err(|_| invalid("year", field(year_idx)))?;
        let n = field(n_idx)
            .parse::<u64>()
            .map_err(|_| invalid("count", field(n_idx)))?;
        let proportion = field(prop_idx)
            .parse::<f64>()
            .map_err(|_| invalid("proportion", field(prop_idx)))?;

        records.push(NameRecord {
            year,
            sex: parse_sex(field(sex_idx), row)?,
            name: field(name_idx).to_string(),
            n,
            proportion: check_proportion(proportion, row)?,
        });
    }
    Ok(records)
}

/// The archive must contain exactly one file entry; directories are skipped.
fn read_zip(file: File) -> Result<Vec<NameRecord>, LoadError> {
    let mut archive = zip::ZipArchive::new(file)?;
    let mut files = Vec::new();
    for i in 0..archive.len() {
        if !archive.by_index(i)?.is_dir() {
            files.push(i);
        }
    }
    let &[entry_idx] = files.as_slice() else {
        return Err(LoadError::ZipEntries(files.len()));
    };

    let entry = archive.by_index(entry_idx)?;
    log::debug!("Reading '{}' from zip archive", entry.name());
    let records = read_csv(entry)?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn read_json(file: File) -> Result<Vec<NameRecord>, LoadError> {
    let records: Vec<NameRecord> = serde_json::from_reader(BufReader::new(file))?;
    for (i, rec) in records.iter().enumerate() {
        check_proportion(rec.proportion, i + 1)?;
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by pandas, Polars or Arrow directly: integer
/// columns of any width and Float32/Float64 proportions are accepted.
fn read_parquet(file: File) -> Result<Vec<NameRecord>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let mut idx = [0usize; 5];
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = schema
            .index_of(column)
            .map_err(|_| LoadError::MissingColumn(column))?;
    }
    let [year_idx, sex_idx, name_idx, n_idx, prop_idx] = idx;

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch in reader {
        let batch = batch?;
        let years = cast(batch.column(year_idx), &DataType::Int64)?;
        let sexes = cast(batch.column(sex_idx), &DataType::Utf8)?;
        let names = cast(batch.column(name_idx), &DataType::Utf8)?;
        let counts = cast(batch.column(n_idx), &DataType::Int64)?;
        let props = cast(batch.column(prop_idx), &DataType::Float64)?;

        let years = years.as_primitive::<Int64Type>();
        let sexes = sexes.as_string::<i32>();
        let names = names.as_string::<i32>();
        let counts = counts.as_primitive::<Int64Type>();
        let props = props.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let columns: [&ArrayRef; 5] = [
                batch.column(year_idx),
                batch.column(sex_idx),
                batch.column(name_idx),
                batch.column(n_idx),
                batch.column(prop_idx),
            ];
            if let Some(pos) = columns.iter().position(|c| c.is_null(i)) {
                return Err(LoadError::InvalidRow {
                    row,
                    message: format!("null value in column '{}'", REQUIRED_COLUMNS[pos]),
                });
            }

            let year = i32::try_from(years.value(i)).map_err(|_| LoadError::InvalidRow {
                row,
                message: format!("year {} out of range", years.value(i)),
            })?;
            let n = u64::try_from(counts.value(i)).map_err(|_| LoadError::InvalidRow {
                row,
                message: format!("negative count {}", counts.value(i)),
            })?;

            records.push(NameRecord {
                year,
                sex: parse_sex(sexes.value(i), row)?,
                name: names.value(i).to_string(),
                n,
                proportion: check_proportion(props.value(i), row)?,
            });
        }
    }
    Ok(records)
}
