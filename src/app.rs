use eframe::egui::{self, Key};

use crate::config::{PersistedDirs, ViewerConfig, DIRS_KEY};
use crate::data::frames::Step;
use crate::state::{Side, ViewerController};
use crate::ui::{pane, panels, ShellState};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FramePairApp {
    pub controller: ViewerController,
    pub shell: ShellState,
}

impl FramePairApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let dirs: PersistedDirs = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, DIRS_KEY))
            .unwrap_or_default();
        Self {
            controller: ViewerController::new(config),
            shell: ShellState::with_dirs(dirs),
        }
    }

    /// A/D step the left pane, arrow keys the right one.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let steps = ctx.input(|i| {
            [
                (Key::A, Side::Left, Step::Previous),
                (Key::D, Side::Left, Step::Next),
                (Key::ArrowLeft, Side::Right, Step::Previous),
                (Key::ArrowRight, Side::Right, Step::Next),
            ]
            .into_iter()
            .filter(|(key, _, _)| i.key_pressed(*key))
            .map(|(_, side, step)| (side, step))
            .collect::<Vec<_>>()
        });
        for (side, step) in steps {
            self.controller.navigate(side, step);
        }
    }
}

impl eframe::App for FramePairApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.controller, &mut self.shell);
        });

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.shell);
        });

        // ---- Central panel: the two frame panes ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                pane::frame_pane(&mut columns[0], &mut self.controller, &mut self.shell, Side::Left);
                pane::frame_pane(&mut columns[1], &mut self.controller, &mut self.shell, Side::Right);
            });
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, DIRS_KEY, &self.shell.dirs);
    }
}
