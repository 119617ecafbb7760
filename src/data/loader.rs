use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value as JsonValue;

use crate::config::TableConfig;
use crate::error::{DataError, Result};

use super::model::{AnnotationTable, CellValue};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the annotation sheet sitting next to the frames in `directory`.
///
/// No sheet at all is not an error: the result is an empty table.
pub fn load_annotations(directory: &Path, cfg: &TableConfig) -> Result<AnnotationTable> {
    match find_spreadsheet(directory, cfg)? {
        Some(path) => {
            let table = load_file(&path, cfg)?;
            log::info!(
                "Loaded {} annotation rows with columns {:?} from {}",
                table.len(),
                table.columns(),
                path.display()
            );
            Ok(table)
        }
        None => {
            log::info!("No spreadsheet in {}", directory.display());
            Ok(AnnotationTable::empty())
        }
    }
}

/// Pick the sheet to use in `directory`.
///
/// Extensions are ranked by their position in `cfg.extensions`; ties go to
/// the lexicographically smallest file name.
pub fn find_spreadsheet(directory: &Path, cfg: &TableConfig) -> Result<Option<PathBuf>> {
    let import_err = |source| DataError::Import {
        path: directory.to_path_buf(),
        source,
    };

    let mut best: Option<(usize, String, PathBuf)> = None;
    for entry in std::fs::read_dir(directory).map_err(import_err)? {
        let entry = entry.map_err(import_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(rank) = extension_rank(&path, cfg) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let candidate = (rank, name, path);
        if best.as_ref().map_or(true, |b| candidate < *b) {
            best = Some(candidate);
        }
    }
    Ok(best.map(|(_, _, path)| path))
}

/// Load one sheet file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – first worksheet, first row is the header
/// * `.csv`           – header row, cell types guessed per cell
/// * `.json`          – `[{ "Frame": "Frame1", "A": 1, ... }, ...]`
pub fn load_file(path: &Path, cfg: &TableConfig) -> Result<AnnotationTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "xlsx" | "xls" => load_workbook(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    };
    let (columns, rows) = parsed.map_err(|source| DataError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    })?;

    AnnotationTable::from_rows(path, dedup_headers(columns), rows, &cfg.frame_column)
}

type RawTable = (Vec<String>, Vec<Vec<CellValue>>);

/// Rename repeated headers the way data-frame readers do: the second `A`
/// becomes `A.1`, the third `A.2`, skipping names already in use.
fn dedup_headers(columns: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(columns.len());
    columns
        .into_iter()
        .map(|name| {
            let mut unique = name.clone();
            let mut n = 1;
            while taken.contains(&unique) {
                unique = format!("{name}.{n}");
                n += 1;
            }
            taken.insert(unique.clone());
            unique
        })
        .collect()
}

fn extension_rank(path: &Path, cfg: &TableConfig) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    cfg.extensions
        .iter()
        .position(|known| known.eq_ignore_ascii_case(ext))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First worksheet only, like a data-frame reader with default arguments.
fn load_workbook(path: &Path) -> anyhow::Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(idx, cell))
        .collect();
    let rows = rows
        .map(|row| row.iter().map(cell_from_excel).collect())
        .collect();

    Ok((columns, rows))
}

fn header_name(idx: usize, cell: &Data) -> String {
    match cell_from_excel(cell) {
        CellValue::Null => format!("Unnamed: {idx}"),
        CellValue::Float(v) if v.fract() == 0.0 => format!("{}", v as i64),
        other => other.to_string(),
    }
}

fn cell_from_excel(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Date(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one row per frame.
fn load_csv(path: &Path) -> anyhow::Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > columns.len() {
            bail!(
                "CSV row {row_no}: {} fields but only {} columns",
                record.len(),
                columns.len()
            );
        }
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok((columns, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return CellValue::Bool(s.eq_ignore_ascii_case("true"));
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Frame": "Frame0", "Moving": 1, "Bright": 0 },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen key order; keys missing from a record are
/// empty cells.
fn load_json(path: &Path) -> anyhow::Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok((columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}
