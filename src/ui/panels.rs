use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{ImportReport, Side, ViewerController};
use crate::ui::{ShellState, Status, StatusLevel};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, controller: &mut ViewerController, shell: &mut ShellState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Import left…").clicked() {
                import_dialog(controller, shell, Side::Left);
                ui.close_menu();
            }
            if ui.button("Import right…").clicked() {
                import_dialog(controller, shell, Side::Right);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        for side in [Side::Left, Side::Right] {
            let frames = controller.frames(side).frames();
            match (frames.first(), frames.last()) {
                (Some(first), Some(last)) => ui.label(format!(
                    "{}: {} frames ({}–{})",
                    side.title(),
                    frames.len(),
                    first.number,
                    last.number
                )),
                _ => ui.label(format!("{}: empty", side.title())),
            };
            ui.separator();
        }

        let table = controller.table();
        match table.source().and_then(|p| p.file_name()) {
            Some(name) => ui.label(format!(
                "Annotations: {} ({} rows)",
                name.to_string_lossy(),
                table.len()
            )),
            None => ui.label("Annotations: none"),
        };
    });
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

pub fn status_bar(ui: &mut Ui, shell: &ShellState) {
    ui.horizontal(|ui: &mut Ui| match &shell.status {
        Some(status) => {
            let text = RichText::new(&status.text);
            let text = match status.level {
                StatusLevel::Info => text,
                StatusLevel::Warning => text.color(Color32::YELLOW),
                StatusLevel::Error => text.color(Color32::RED),
            };
            ui.label(text);
        }
        None => {
            ui.weak("A/D: step left   ←/→: step right");
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn import_dialog(controller: &mut ViewerController, shell: &mut ShellState, side: Side) {
    let mut dialog =
        rfd::FileDialog::new().set_title(format!("Select {} frame folder", side.title()));
    if let Some(dir) = shell.last_dir(side).filter(|d| d.is_dir()) {
        dialog = dialog.set_directory(dir);
    }

    if let Some(dir) = dialog.pick_folder() {
        import_directory(controller, shell, side, dir);
    }
}

/// Import `dir` into `side` and report the outcome on the status line.
pub fn import_directory(
    controller: &mut ViewerController,
    shell: &mut ShellState,
    side: Side,
    dir: PathBuf,
) {
    match controller.import(side, &dir) {
        Ok(report) => {
            shell.status = Some(report_status(side, &report));
            shell.remember_dir(side, dir);
        }
        Err(e) => {
            log::error!("Failed to import {}: {e:#}", dir.display());
            shell.status = Some(Status {
                level: StatusLevel::Error,
                text: format!("Error: {e}"),
            });
        }
    }
}

fn report_status(side: Side, report: &ImportReport) -> Status {
    let mut parts = vec![format!("{}: {} frames", side.title(), report.frame_count)];
    if side == Side::Left {
        match report.spreadsheet.as_deref().and_then(Path::file_name) {
            Some(name) => parts.push(format!("annotations from {}", name.to_string_lossy())),
            None if report.spreadsheet_error.is_none() => parts.push("no spreadsheet".into()),
            None => {}
        }
    }
    if let Some(e) = &report.spreadsheet_error {
        parts.push(format!("spreadsheet ignored: {e}"));
    }
    if let Some(first) = report.rejected.first() {
        parts.push(format!("{} file(s) skipped, e.g. {first}", report.rejected.len()));
    }

    let level = if report.frame_count == 0
        || report.spreadsheet_error.is_some()
        || !report.rejected.is_empty()
    {
        StatusLevel::Warning
    } else {
        StatusLevel::Info
    };
    Status {
        level,
        text: parts.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn clean_left_import_is_info() {
        let report = ImportReport {
            frame_count: 12,
            spreadsheet: Some(PathBuf::from("/runs/a/labels.xlsx")),
            ..ImportReport::default()
        };
        let status = report_status(Side::Left, &report);
        assert_eq!(status.level, StatusLevel::Info);
        assert_eq!(status.text, "Left: 12 frames, annotations from labels.xlsx");
    }

    #[test]
    fn skipped_files_raise_a_warning() {
        let report = ImportReport {
            frame_count: 2,
            rejected: vec![DataError::FrameName {
                file_name: "frameX.png".into(),
                expected: "frame<number>.png".into(),
            }],
            ..ImportReport::default()
        };
        let status = report_status(Side::Right, &report);
        assert_eq!(status.level, StatusLevel::Warning);
        assert!(status.text.starts_with("Right: 2 frames, 1 file(s) skipped"));
        assert!(status.text.contains("frameX.png"));
    }

    #[test]
    fn failed_import_keeps_last_dir_and_shows_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("frame0.png"), b"")?;

        let mut controller = ViewerController::default();
        let mut shell = ShellState::default();
        import_directory(&mut controller, &mut shell, Side::Right, dir.path().to_path_buf());
        assert_eq!(shell.last_dir(Side::Right), Some(dir.path()));
        assert_eq!(shell.status.as_ref().map(|s| s.level), Some(StatusLevel::Info));

        import_directory(
            &mut controller,
            &mut shell,
            Side::Right,
            dir.path().join("gone"),
        );
        assert_eq!(shell.last_dir(Side::Right), Some(dir.path()));
        assert_eq!(shell.status.as_ref().map(|s| s.level), Some(StatusLevel::Error));
        assert_eq!(controller.frames(Side::Right).len(), 1);
        Ok(())
    }
}
