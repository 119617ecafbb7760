use eframe::egui::{self, Ui};

use crate::data::frames::Step;
use crate::state::{Side, ViewerController};
use crate::ui::{frame_uri, panels, ShellState};

enum PaneAction {
    Step(Step),
    Import,
}

// ---------------------------------------------------------------------------
// One frame pane: image, file name, annotations, notes, navigation
// ---------------------------------------------------------------------------

/// Render one side and apply whatever button was pressed.
pub fn frame_pane(
    ui: &mut Ui,
    controller: &mut ViewerController,
    shell: &mut ShellState,
    side: Side,
) {
    let mut action = None;
    {
        let view = controller.view(side);

        ui.horizontal(|ui: &mut Ui| {
            ui.heading(side.title());
            if let Some(dir) = view.directory {
                ui.weak(dir.display().to_string());
            }
        });

        // ---- Image ----
        let uri = view.image_path.map(frame_uri);
        shell.images.show(ui.ctx(), side, uri.clone());
        let image_height = (ui.available_height() * 0.55).max(160.0);
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), image_height));
            match uri {
                Some(uri) => {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.add(
                            egui::Image::new(uri)
                                .max_width(ui.available_width())
                                .max_height(image_height)
                                .maintain_aspect_ratio(true),
                        );
                    });
                }
                None => {
                    ui.centered_and_justified(|ui: &mut Ui| {
                        ui.label("Import a folder of frames");
                    });
                }
            }
        });

        // ---- File name ----
        let mut name = view.filename_label.as_deref().unwrap_or("");
        ui.add(egui::TextEdit::singleline(&mut name).desired_width(f32::INFINITY));

        // ---- Annotations (left only) ----
        if let Some(text) = &view.annotation_text {
            ui.strong("Annotations");
            let mut text = text.as_str();
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
        }

        // ---- Notes ----
        ui.strong("Notes");
        ui.add(
            egui::TextEdit::multiline(shell.notes_mut(side))
                .hint_text("Free-text notes (not saved)")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );

        // ---- Navigation ----
        ui.horizontal(|ui: &mut Ui| {
            let has_frames = view.position.is_some();
            if ui.add_enabled(has_frames, egui::Button::new("◀")).clicked() {
                action = Some(PaneAction::Step(Step::Previous));
            }
            if ui.button("Import…").clicked() {
                action = Some(PaneAction::Import);
            }
            if ui.add_enabled(has_frames, egui::Button::new("▶")).clicked() {
                action = Some(PaneAction::Step(Step::Next));
            }
            if let Some((i, n)) = view.position {
                ui.label(format!("{i} / {n}"));
            }
        });
    }

    match action {
        Some(PaneAction::Step(step)) => controller.navigate(side, step),
        Some(PaneAction::Import) => panels::import_dialog(controller, shell, side),
        None => {}
    }
}
