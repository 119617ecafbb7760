use std::path::{Path, PathBuf};

use eframe::egui;

use crate::config::PersistedDirs;
use crate::state::Side;

pub mod pane;
pub mod panels;

// ---------------------------------------------------------------------------
// Shell state: widget content that is not part of the viewer model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

/// Free-text notes, the status line, dialog start folders and the images
/// currently on screen.
#[derive(Debug, Default)]
pub struct ShellState {
    pub left_notes: String,
    pub right_notes: String,
    pub status: Option<Status>,
    pub dirs: PersistedDirs,
    pub images: ShownImages,
}

impl ShellState {
    pub fn with_dirs(dirs: PersistedDirs) -> Self {
        Self {
            dirs,
            ..Self::default()
        }
    }

    pub fn notes_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Left => &mut self.left_notes,
            Side::Right => &mut self.right_notes,
        }
    }

    pub fn last_dir(&self, side: Side) -> Option<&Path> {
        match side {
            Side::Left => self.dirs.left.as_deref(),
            Side::Right => self.dirs.right.as_deref(),
        }
    }

    pub fn remember_dir(&mut self, side: Side, dir: PathBuf) {
        match side {
            Side::Left => self.dirs.left = Some(dir),
            Side::Right => self.dirs.right = Some(dir),
        }
    }
}

// ---------------------------------------------------------------------------
// Image cache bookkeeping
// ---------------------------------------------------------------------------

/// URI egui's loaders use for a frame on disk.
pub fn frame_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// The image URI each pane displays.
///
/// egui's loaders cache every decoded image until told to forget it, so the
/// previous frame of a pane is dropped as soon as the pane moves on.
#[derive(Debug, Default)]
pub struct ShownImages {
    left: Option<String>,
    right: Option<String>,
}

impl ShownImages {
    /// Record what `side` displays now and return the URI that is no longer
    /// on screen anywhere.
    pub fn replace(&mut self, side: Side, uri: Option<String>) -> Option<String> {
        let (slot, other) = match side {
            Side::Left => (&mut self.left, &self.right),
            Side::Right => (&mut self.right, &self.left),
        };
        if *slot == uri {
            return None;
        }
        let old = std::mem::replace(slot, uri)?;
        (other.as_ref() != Some(&old)).then_some(old)
    }

    /// Like [`ShownImages::replace`], evicting the stale image from `ctx`.
    pub fn show(&mut self, ctx: &egui::Context, side: Side, uri: Option<String>) {
        if let Some(old) = self.replace(side, uri) {
            log::debug!("Forgetting {old}");
            ctx.forget_image(&old);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frames::Step;
    use crate::state::ViewerController;
    use eframe::egui::load::BytesLoader;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn replace_returns_the_previous_uri_once() {
        let mut shown = ShownImages::default();
        assert_eq!(shown.replace(Side::Left, Some("file:///a/frame0.png".into())), None);
        assert_eq!(shown.replace(Side::Left, Some("file:///a/frame0.png".into())), None);
        assert_eq!(
            shown.replace(Side::Left, Some("file:///a/frame1.png".into())),
            Some("file:///a/frame0.png".into())
        );
        assert_eq!(
            shown.replace(Side::Left, None),
            Some("file:///a/frame1.png".into())
        );
        assert_eq!(shown.replace(Side::Left, None), None);
    }

    #[test]
    fn image_shown_on_the_other_side_is_kept() {
        let mut shown = ShownImages::default();
        let uri = Some("file:///a/frame0.png".to_string());
        shown.replace(Side::Left, uri.clone());
        shown.replace(Side::Right, uri);
        assert_eq!(shown.replace(Side::Left, Some("file:///a/frame1.png".into())), None);
    }

    #[test]
    fn browsing_keeps_only_the_visible_frame_cached() -> anyhow::Result<()> {
        const FRAME_BYTES: usize = 4096;
        let dir = tempdir()?;
        for i in 0..40 {
            fs::write(dir.path().join(format!("frame{i}.png")), b"")?;
        }
        let mut controller = ViewerController::default();
        controller.import(Side::Left, dir.path())?;

        let ctx = egui::Context::default();
        let mut shown = ShownImages::default();
        for _ in 0..40 {
            let uri = controller.view(Side::Left).image_path.map(frame_uri);
            if let Some(uri) = &uri {
                // Stand-in for the decoded frame the loaders would hold.
                ctx.include_bytes(uri.clone(), vec![0u8; FRAME_BYTES]);
            }
            shown.show(&ctx, Side::Left, uri);
            assert!(ctx.loaders().include.byte_size() <= FRAME_BYTES);
            controller.navigate(Side::Left, Step::Next);
        }
        Ok(())
    }
}
