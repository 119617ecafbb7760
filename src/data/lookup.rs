use std::path::Path;

use crate::config::FrameNaming;
use crate::error::{DataError, Result};

use super::model::AnnotationTable;

/// Turn a frame file into the key used by the sheet:
/// `some/dir/frame3.png` becomes `Frame3`.
pub fn frame_key(path: &Path, naming: &FrameNaming) -> Result<String> {
    let raw = || DataError::FrameKey(path.display().to_string());
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(raw)?;
    let rest = stem.strip_prefix(naming.prefix.as_str()).ok_or_else(raw)?;
    if rest.is_empty() {
        return Err(raw());
    }
    Ok(format!("{}{rest}", naming.key_prefix))
}

/// Columns flagged with the marker for `frame`, in sheet order.
///
/// An empty table or a frame without a row gives an empty list.
pub fn flagged_columns(
    table: &AnnotationTable,
    frame: &Path,
    naming: &FrameNaming,
) -> Result<Vec<String>> {
    let key = frame_key(frame, naming)?;
    let flagged = table
        .row_for(&key)
        .map(|row| row.flagged_columns())
        .unwrap_or_default();
    log::debug!("Lookup {key}: {flagged:?}");
    Ok(flagged)
}
