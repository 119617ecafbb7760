use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::FrameNaming;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Frame – one numbered image file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub number: u64,
    pub path: PathBuf,
}

impl Frame {
    /// File name without directory and extension (`frame12`).
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Step direction for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

// ---------------------------------------------------------------------------
// FrameSet – ordered frames plus a cursor
// ---------------------------------------------------------------------------

/// Frames of one side, sorted by frame number, with a wrapping cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSet {
    frames: Vec<Frame>,
    index: usize,
}

/// Outcome of scanning a directory: the usable frames plus every file that
/// looked like a frame but could not be used.
#[derive(Debug, Default)]
pub struct FrameScan {
    pub frames: FrameSet,
    pub rejected: Vec<DataError>,
}

impl FrameSet {
    /// Build a set from frames in any order. Duplicate numbers keep the
    /// first occurrence.
    #[cfg(test)]
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        let mut by_number: BTreeMap<u64, Frame> = BTreeMap::new();
        for frame in frames {
            by_number.entry(frame.number).or_insert(frame);
        }
        Self {
            frames: by_number.into_values().collect(),
            index: 0,
        }
    }

    /// Scan `directory` (non-recursive) for frame images.
    ///
    /// Only an unreadable directory fails the whole scan; badly named files
    /// end up in [`FrameScan::rejected`].
    pub fn load(directory: &Path, naming: &FrameNaming) -> Result<FrameScan> {
        let import_err = |source| DataError::Import {
            path: directory.to_path_buf(),
            source,
        };

        let mut candidates: Vec<(String, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(import_err)? {
            let entry = entry.map_err(import_err)?;
            let path = entry.path();
            if !path.is_file() || !has_extension(&path, &naming.extension) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            candidates.push((file_name, path));
        }
        // Make duplicate resolution independent of read_dir order.
        candidates.sort();

        let mut by_number: BTreeMap<u64, Frame> = BTreeMap::new();
        let mut rejected = Vec::new();
        for (file_name, path) in candidates {
            let number = match parse_frame_number(&path, naming) {
                Ok(n) => n,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    rejected.push(e);
                    continue;
                }
            };
            if by_number.contains_key(&number) {
                log::warn!("Skipping {}: frame {number} already present", path.display());
                rejected.push(DataError::DuplicateFrameNumber { file_name, number });
                continue;
            }
            by_number.insert(number, Frame { number, path });
        }

        Ok(FrameScan {
            frames: FrameSet {
                frames: by_number.into_values().collect(),
                index: 0,
            },
            rejected,
        })
    }

    /// Frame under the cursor.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.index)
    }

    /// Move the cursor one step, wrapping at both ends.
    pub fn advance(&mut self, step: Step) {
        let len = self.frames.len();
        if len == 0 {
            return;
        }
        self.index = match step {
            Step::Next => (self.index + 1) % len,
            Step::Previous => (self.index + len - 1) % len,
        };
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// 1-based position and total, for display.
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.frames.is_empty()).then(|| (self.index + 1, self.frames.len()))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// ---------------------------------------------------------------------------
// File-name helpers
// ---------------------------------------------------------------------------

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Extract the number from `<prefix><digits>.<ext>`.
pub fn parse_frame_number(path: &Path, naming: &FrameNaming) -> Result<u64> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bad_name = || DataError::FrameName {
        file_name: file_name.clone(),
        expected: format!("{}<number>.{}", naming.prefix, naming.extension),
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(bad_name)?;
    let digits = stem.strip_prefix(naming.prefix.as_str()).ok_or_else(bad_name)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_name());
    }
    digits.parse::<u64>().map_err(|_| bad_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> anyhow::Result<()> {
        File::create(dir.join(name))?;
        Ok(())
    }

    fn numbers(set: &FrameSet) -> Vec<u64> {
        set.frames().iter().map(|f| f.number).collect()
    }

    #[rstest]
    #[case("frame0.png", 0)]
    #[case("frame12.png", 12)]
    #[case("frame007.png", 7)]
    #[case("frame3.PNG", 3)]
    fn parses_valid_names(#[case] name: &str, #[case] expected: u64) {
        let n = parse_frame_number(Path::new(name), &FrameNaming::default()).unwrap();
        assert_eq!(n, expected);
    }

    #[rstest]
    #[case("frameX.png")]
    #[case("frame.png")]
    #[case("Frame3.png")]
    #[case("img3.png")]
    #[case("frame+3.png")]
    #[case("frame-3.png")]
    #[case("frame3a.png")]
    #[case("frame99999999999999999999999.png")]
    fn rejects_invalid_names(#[case] name: &str) {
        let err = parse_frame_number(Path::new(name), &FrameNaming::default()).unwrap_err();
        assert!(matches!(err, DataError::FrameName { ref file_name, .. } if file_name == name));
    }

    #[test]
    fn load_sorts_numerically_not_lexically() -> anyhow::Result<()> {
        let dir = tempdir()?;
        for name in ["frame10.png", "frame2.png", "frame1.png", "frame0.png", "frame21.png"] {
            touch(dir.path(), name)?;
        }

        let scan = FrameSet::load(dir.path(), &FrameNaming::default())?;
        assert_eq!(numbers(&scan.frames), vec![0, 1, 2, 10, 21]);
        assert!(scan.rejected.is_empty());
        Ok(())
    }

    #[test]
    fn load_ignores_other_files_and_subdirectories() -> anyhow::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "frame1.png")?;
        touch(dir.path(), "notes.txt")?;
        touch(dir.path(), "labels.xlsx")?;
        std::fs::create_dir(dir.path().join("frame2.png"))?;

        let scan = FrameSet::load(dir.path(), &FrameNaming::default())?;
        assert_eq!(numbers(&scan.frames), vec![1]);
        assert!(scan.rejected.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_name_is_reported_and_rest_still_loads() -> anyhow::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "frame1.png")?;
        touch(dir.path(), "frameX.png")?;
        touch(dir.path(), "frame3.png")?;

        let scan = FrameSet::load(dir.path(), &FrameNaming::default())?;
        assert_eq!(numbers(&scan.frames), vec![1, 3]);
        assert_eq!(scan.rejected.len(), 1);
        assert!(matches!(
            &scan.rejected[0],
            DataError::FrameName { file_name, .. } if file_name == "frameX.png"
        ));
        Ok(())
    }

    #[test]
    fn duplicate_numbers_keep_first_file_name() -> anyhow::Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "frame7.png")?;
        touch(dir.path(), "frame007.png")?;

        let scan = FrameSet::load(dir.path(), &FrameNaming::default())?;
        assert_eq!(scan.frames.len(), 1);
        assert_eq!(scan.frames.current().unwrap().label(), "frame007");
        assert!(matches!(
            &scan.rejected[0],
            DataError::DuplicateFrameNumber { file_name, number: 7 } if file_name == "frame7.png"
        ));
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_import_error() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        let err = FrameSet::load(&gone, &FrameNaming::default()).unwrap_err();
        assert!(matches!(err, DataError::Import { .. }));
    }

    #[test]
    fn advance_wraps_both_ways() {
        let mut set = FrameSet::from_frames(
            (0..3)
                .map(|n| Frame {
                    number: n,
                    path: PathBuf::from(format!("frame{n}.png")),
                })
                .collect(),
        );
        set.advance(Step::Previous);
        assert_eq!(set.current().unwrap().number, 2);
        set.advance(Step::Next);
        assert_eq!(set.current().unwrap().number, 0);
        set.advance(Step::Next);
        set.advance(Step::Next);
        assert_eq!(set.position(), Some((3, 3)));
        set.reset();
        assert_eq!(set.position(), Some((1, 3)));
    }

    #[test]
    fn next_then_previous_is_identity_from_every_index() {
        for len in 1..6u64 {
            let mut set = FrameSet::from_frames(
                (0..len)
                    .map(|n| Frame {
                        number: n * 5,
                        path: PathBuf::from(format!("frame{}.png", n * 5)),
                    })
                    .collect(),
            );
            for _ in 0..len {
                let before = set.position();
                set.advance(Step::Next);
                set.advance(Step::Previous);
                assert_eq!(set.position(), before);
                set.advance(Step::Next);
            }
        }
    }

    #[test]
    fn advance_on_empty_set_is_a_no_op() {
        let mut set = FrameSet::default();
        set.advance(Step::Next);
        set.advance(Step::Previous);
        assert!(set.current().is_none());
        assert_eq!(set.position(), None);
    }
}
