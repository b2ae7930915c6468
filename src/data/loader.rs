use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// How the column names of a delimited file are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderMode {
    /// The first record after the skipped rows names the columns.
    #[default]
    FromFile,
    /// The first record is a header, but its names are replaced by
    /// `Column1`, `Column2`, ...
    Positional,
    /// There is no header record; names are positional.
    Absent,
}

/// Everything that identifies one load of a file. Doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    pub path: PathBuf,
    pub skip_rows: usize,
    pub header: HeaderMode,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            skip_rows: 0,
            header: HeaderMode::FromFile,
            delimiter: b',',
        }
    }
}

impl LoadOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / no extension – delimited text, configured delimiter
/// * `.tsv`  – tab-delimited text
/// * `.json` – `[{ "col": value, ... }, ...]`
///
/// Any failure aborts the whole load; no partial table is returned.
pub fn load_file(options: &LoadOptions) -> Result<Table> {
    let path = options.path.as_path();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" | "" => load_delimited(path, options, options.delimiter),
        "tsv" => load_delimited(path, options, b'\t'),
        "json" => load_json(path),
        other => Err(DataError::UnsupportedFormat(other.to_string()).into()),
    };
    table.with_context(|| format!("loading {}", path.display()))
}

/// Synthesized names for columns without usable headers.
pub fn positional_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Column{i}")).collect()
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, options: &LoadOptions, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening delimited file")?;

    let mut records = reader.records().enumerate().skip(options.skip_rows);

    let (names, first_data) = match options.header {
        HeaderMode::FromFile | HeaderMode::Positional => {
            let (_, header) = records
                .next()
                .ok_or(DataError::MissingHeader(options.skip_rows))?;
            let header = header.context("reading header row")?;
            let names = if options.header == HeaderMode::FromFile {
                header_names(&header)?
            } else {
                positional_names(header.len())
            };
            (names, None)
        }
        HeaderMode::Absent => {
            let (line, first) = records
                .next()
                .ok_or(DataError::MissingHeader(options.skip_rows))?;
            let first = first.with_context(|| format!("reading row {}", line + 1))?;
            (positional_names(first.len()), Some((line, first)))
        }
    };

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    let rest = records.map(|(line, rec)| rec.map(|r| (line, r)));
    for item in first_data.map(Ok).into_iter().chain(rest) {
        let (line, record) = item.context("reading delimited record")?;
        if record.len() != names.len() {
            return Err(DataError::RaggedRow {
                row: line + 1,
                expected: names.len(),
                found: record.len(),
            }
            .into());
        }
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(typed_table(names, raw_rows))
}

fn header_names(header: &csv::StringRecord) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::with_capacity(header.len());
    for (i, raw) in header.iter().enumerate() {
        let trimmed = raw.trim();
        let name = if trimmed.is_empty() {
            format!("Column{}", i + 1)
        } else {
            trimmed.to_string()
        };
        if !seen.insert(name.clone()) {
            return Err(DataError::DuplicateColumn(name).into());
        }
        names.push(name);
    }
    Ok(names)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RawKind {
    Integer,
    Float,
    Bool,
    Text,
}

fn is_null_token(s: &str) -> bool {
    let s = s.trim();
    s.is_empty()
        || ["na", "n/a", "nan", "null"]
            .iter()
            .any(|tok| s.eq_ignore_ascii_case(tok))
}

/// Pick one type per column so a column never mixes numbers and text.
fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> RawKind {
    let (mut any_value, mut ints, mut floats, mut bools) = (false, true, true, true);
    for cell in cells.filter(|c| !is_null_token(c)) {
        let cell = cell.trim();
        any_value = true;
        ints &= cell.parse::<i64>().is_ok();
        floats &= cell.parse::<f64>().is_ok();
        bools &= cell == "true" || cell == "false";
        if !(ints || floats || bools) {
            return RawKind::Text;
        }
    }
    match (any_value, ints, floats, bools) {
        (false, ..) => RawKind::Text,
        (true, true, _, _) => RawKind::Integer,
        (true, _, true, _) => RawKind::Float,
        (true, _, _, true) => RawKind::Bool,
        _ => RawKind::Text,
    }
}

fn parse_cell(raw: String, kind: RawKind) -> CellValue {
    if is_null_token(&raw) {
        return CellValue::Null;
    }
    let trimmed = raw.trim();
    match kind {
        RawKind::Integer => trimmed
            .parse()
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Text(raw)),
        RawKind::Float => trimmed
            .parse()
            .map(CellValue::Float)
            .unwrap_or(CellValue::Text(raw)),
        RawKind::Bool => CellValue::Bool(trimmed == "true"),
        RawKind::Text => CellValue::Text(raw),
    }
}

fn typed_table(names: Vec<String>, raw_rows: Vec<Vec<String>>) -> Table {
    let kinds: Vec<RawKind> = (0..names.len())
        .map(|col| infer_kind(raw_rows.iter().map(|row| row[col].as_str())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(raw, &kind)| parse_cell(raw, kind))
                .collect()
        })
        .collect();

    Table::new(names, rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country_Region": "UK", "Treatment_Cost_USD": 1520.5 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys; a record missing a key gets a null.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::JsonShape("top-level value is not an array".into()))?;

    let mut parsed: Vec<BTreeMap<String, CellValue>> = Vec::with_capacity(records.len());
    let mut names: Vec<String> = Vec::new();
    let mut seen = BTreeSet::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::JsonShape(format!("row {i} is not an object")))?;

        let mut row = BTreeMap::new();
        for (key, val) in obj {
            if seen.insert(key.clone()) {
                names.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        parsed.push(row);
    }

    let rows = parsed
        .into_iter()
        .map(|mut row| {
            names
                .iter()
                .map(|name| row.remove(name).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Table::new(names, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
