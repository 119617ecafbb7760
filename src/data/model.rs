use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the annotation sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a spreadsheet reader hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date/time kept as text for simplicity.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Whether the cell equals numeric 1, the "flag set" marker.
    ///
    /// Booleans count as 0/1, text never matches even if it reads "1".
    pub fn is_marker(&self) -> bool {
        match self {
            CellValue::Integer(i) => *i == 1,
            CellValue::Float(v) => *v == 1.0,
            CellValue::Bool(b) => *b,
            _ => false,
        }
    }

    /// Text used when matching the key column.
    pub fn key_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// AnnotationTable – the loaded sheet
// ---------------------------------------------------------------------------

/// Row-major annotation sheet keyed by its frame column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    /// File the table was read from (None for the empty table).
    source: Option<PathBuf>,
    /// Column names in sheet order, key column included.
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    /// Index of the key column; None only for the empty table.
    frame_column: Option<usize>,
}

impl AnnotationTable {
    /// A table with no rows; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and build a table from parsed rows.
    ///
    /// Short rows are padded with [`CellValue::Null`]. The key column must
    /// exist and its non-empty values must be unique.
    pub fn from_rows(
        source: &Path,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        frame_column: &str,
    ) -> Result<Self> {
        let key_idx = columns
            .iter()
            .position(|c| c == frame_column)
            .ok_or_else(|| DataError::MissingFrameColumn {
                path: source.to_path_buf(),
                column: frame_column.to_string(),
            })?;

        let width = columns.len();
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for row in &rows {
            if let Some(key) = row[key_idx].key_text() {
                if !seen.insert(key.clone()) {
                    return Err(DataError::DuplicateFrameKey {
                        path: source.to_path_buf(),
                        key,
                    });
                }
            }
        }

        Ok(Self {
            source: Some(source.to_path_buf()),
            columns,
            rows,
            frame_column: Some(key_idx),
        })
    }

    /// First row whose key cell equals `frame_key` exactly.
    pub fn row_for(&self, frame_key: &str) -> Option<Row<'_>> {
        let key_idx = self.frame_column?;
        self.rows
            .iter()
            .find(|cells| cells[key_idx].key_text().as_deref() == Some(frame_key))
            .map(|cells| Row { table: self, cells })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A borrowed row of an [`AnnotationTable`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a AnnotationTable,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell under `column`, if the column exists.
    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let idx = self.table.columns.iter().position(|c| c == column)?;
        self.cells.get(idx)
    }

    /// Names of the non-key columns holding the marker, in sheet order.
    pub fn flagged_columns(&self) -> Vec<String> {
        self.table
            .columns
            .iter()
            .zip(self.cells)
            .enumerate()
            .filter(|(idx, (_, cell))| Some(*idx) != self.table.frame_column && cell.is_marker())
            .map(|(_, (name, _))| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn marker_is_numeric_one() {
        assert!(CellValue::Integer(1).is_marker());
        assert!(CellValue::Float(1.0).is_marker());
        assert!(CellValue::Bool(true).is_marker());
        assert!(!CellValue::Integer(0).is_marker());
        assert!(!CellValue::Float(0.5).is_marker());
        assert!(!CellValue::String("1".into()).is_marker());
        assert!(!CellValue::Null.is_marker());
    }

    #[test]
    fn row_for_matches_key_exactly() -> anyhow::Result<()> {
        let table = AnnotationTable::from_rows(
            Path::new("sheet.csv"),
            cols(&["Frame", "A"]),
            vec![
                vec![CellValue::String("Frame1".into()), CellValue::Integer(1)],
                vec![CellValue::String("Frame10".into()), CellValue::Integer(0)],
            ],
            "Frame",
        )?;

        let row = table.row_for("Frame10").expect("row present");
        assert_eq!(row.get("A"), Some(&CellValue::Integer(0)));
        assert!(table.row_for("frame1").is_none());
        assert!(table.row_for("Frame").is_none());
        Ok(())
    }

    #[test]
    fn short_rows_are_padded() -> anyhow::Result<()> {
        let table = AnnotationTable::from_rows(
            Path::new("sheet.csv"),
            cols(&["Frame", "A", "B"]),
            vec![vec![CellValue::String("Frame2".into()), CellValue::Integer(1)]],
            "Frame",
        )?;
        let row = table.row_for("Frame2").expect("row present");
        assert_eq!(row.get("B"), Some(&CellValue::Null));
        assert_eq!(row.flagged_columns(), vec!["A"]);
        Ok(())
    }

    #[test]
    fn missing_key_column_is_rejected() {
        let err = AnnotationTable::from_rows(
            Path::new("sheet.csv"),
            cols(&["Name", "A"]),
            Vec::new(),
            "Frame",
        )
        .unwrap_err();
        assert!(matches!(err, DataError::MissingFrameColumn { ref column, .. } if column == "Frame"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = AnnotationTable::from_rows(
            Path::new("sheet.csv"),
            cols(&["Frame", "A"]),
            vec![
                vec![CellValue::String("Frame4".into()), CellValue::Integer(1)],
                vec![CellValue::String("Frame4".into()), CellValue::Integer(0)],
            ],
            "Frame",
        )
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateFrameKey { ref key, .. } if key == "Frame4"));
    }

    #[test]
    fn empty_table_never_matches() {
        let table = AnnotationTable::empty();
        assert!(table.is_empty());
        assert!(table.row_for("Frame0").is_none());
        assert!(table.source().is_none());
    }
}
