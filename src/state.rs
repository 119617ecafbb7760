use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::data::frames::{FrameSet, Step};
use crate::data::loader::load_annotations;
use crate::data::lookup::flagged_columns;
use crate::data::model::AnnotationTable;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn title(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// One browsed sequence and the directory it came from.
#[derive(Debug, Default)]
struct SideState {
    frames: FrameSet,
    directory: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// What the shell gets to see
// ---------------------------------------------------------------------------

/// Read-only projection of one side, rebuilt by the shell every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SideView<'a> {
    pub image_path: Option<&'a Path>,
    /// File name without extension.
    pub filename_label: Option<String>,
    /// Newline-joined flagged columns; always None for the right side.
    pub annotation_text: Option<String>,
    /// 1-based position and total.
    pub position: Option<(usize, usize)>,
    pub directory: Option<&'a Path>,
}

/// What an import found besides the frames themselves.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub frame_count: usize,
    /// Files that looked like frames but were skipped.
    pub rejected: Vec<DataError>,
    /// Sheet in use after a left import.
    pub spreadsheet: Option<PathBuf>,
    /// Sheet that existed but could not be used; the table was cleared.
    pub spreadsheet_error: Option<DataError>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Canonical viewer state, independent of rendering.
///
/// Both sides browse independently. Only the left side has an annotation
/// table and the cached lookup result for its current frame.
pub struct ViewerController {
    config: ViewerConfig,
    left: SideState,
    right: SideState,
    table: AnnotationTable,
    /// Flagged columns for the current left frame.
    annotations: Vec<String>,
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewerController {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            left: SideState::default(),
            right: SideState::default(),
            table: AnnotationTable::empty(),
            annotations: Vec::new(),
        }
    }

    /// Replace one side's frames with the contents of `directory`.
    ///
    /// An unreadable directory leaves the side (and the left table)
    /// untouched. Otherwise the frames are replaced, even by an empty scan,
    /// and a left import also replaces the table.
    pub fn import(&mut self, side: Side, directory: &Path) -> Result<ImportReport> {
        let scan = FrameSet::load(directory, &self.config.naming)?;
        let mut report = ImportReport {
            frame_count: scan.frames.len(),
            rejected: scan.rejected,
            ..ImportReport::default()
        };

        if side == Side::Left {
            // Read the sheet before touching state so an unreadable directory
            // cannot leave frames and table out of step.
            let table = match load_annotations(directory, &self.config.table) {
                Ok(table) => table,
                Err(e @ DataError::Import { .. }) => return Err(e),
                Err(e) => {
                    log::warn!("Ignoring spreadsheet: {e:#}");
                    report.spreadsheet_error = Some(e);
                    AnnotationTable::empty()
                }
            };
            report.spreadsheet = table.source().map(Path::to_path_buf);
            self.table = table;
        }

        log::info!(
            "{} side: {} frames from {} ({} skipped)",
            side.title(),
            report.frame_count,
            directory.display(),
            report.rejected.len()
        );

        let state = self.side_mut(side);
        state.frames = scan.frames;
        state.frames.reset();
        state.directory = Some(directory.to_path_buf());

        if side == Side::Left {
            self.refresh_annotations();
        }
        Ok(report)
    }

    /// Step one side; no-op while it is empty.
    pub fn navigate(&mut self, side: Side, step: Step) {
        let state = self.side_mut(side);
        if state.frames.is_empty() {
            return;
        }
        state.frames.advance(step);
        log::debug!(
            "{} side -> {:?}",
            side.title(),
            state.frames.current().map(|f| f.number)
        );
        if side == Side::Left {
            self.refresh_annotations();
        }
    }

    pub fn view(&self, side: Side) -> SideView<'_> {
        let state = self.side(side);
        let current = state.frames.current();
        SideView {
            image_path: current.map(|f| f.path.as_path()),
            filename_label: current.map(|f| f.label()),
            annotation_text: match side {
                Side::Left => Some(self.annotations.join("\n")),
                Side::Right => None,
            },
            position: state.frames.position(),
            directory: state.directory.as_deref(),
        }
    }

    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }

    pub fn frames(&self, side: Side) -> &FrameSet {
        &self.side(side).frames
    }

    /// Recompute the lookup for the current left frame.
    fn refresh_annotations(&mut self) {
        self.annotations = match self.left.frames.current() {
            Some(frame) => {
                match flagged_columns(&self.table, &frame.path, &self.config.naming) {
                    Ok(cols) => cols,
                    Err(e) => {
                        log::warn!("Lookup skipped: {e}");
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };
    }

    fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
