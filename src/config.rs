use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Naming conventions
// ---------------------------------------------------------------------------

/// How frame files are named on disk and how their names map onto the
/// `Frame` keys used in the annotation sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNaming {
    /// Literal, case-sensitive prefix before the frame number (`frame12.png`).
    pub prefix: String,
    /// Prefix used by the sheet's key column (`Frame12`).
    pub key_prefix: String,
    /// Image extension without the dot, compared ASCII case-insensitively.
    pub extension: String,
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            prefix: "frame".to_string(),
            key_prefix: "Frame".to_string(),
            extension: "png".to_string(),
        }
    }
}

/// Where annotation sheets are looked for and how they are keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Name of the key column.
    pub frame_column: String,
    /// Accepted sheet extensions, highest priority first.
    pub extensions: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            frame_column: "Frame".to_string(),
            extensions: ["xlsx", "xls", "csv", "json"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Everything the controller and window need to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub naming: FrameNaming,
    pub table: TableConfig,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            naming: FrameNaming::default(),
            table: TableConfig::default(),
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}

// ---------------------------------------------------------------------------
// Session memory
// ---------------------------------------------------------------------------

/// Storage key inside eframe's persistence store.
pub const DIRS_KEY: &str = "frame_pair_dirs";

/// Last directory imported on each side, used to start the folder dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDirs {
    #[serde(default)]
    pub left: Option<PathBuf>,
    #[serde(default)]
    pub right: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_extensions_keep_priority_order() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.extensions, vec!["xlsx", "xls", "csv", "json"]);
    }

    #[test]
    fn persisted_dirs_tolerate_missing_fields() -> anyhow::Result<()> {
        let dirs: PersistedDirs = serde_json::from_str(r#"{ "left": "/data/run1" }"#)?;
        assert_eq!(dirs.left, Some(PathBuf::from("/data/run1")));
        assert_eq!(dirs.right, None);
        Ok(())
    }
}
