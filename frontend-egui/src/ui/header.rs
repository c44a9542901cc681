//! Header component with title, filter controls, and kill buttons.

use backend::{validate_cwd_pattern, FilterKind, ViewConfig};
use eframe::egui;

/// What the header asked the app to do this frame.
#[derive(Debug, Default)]
pub struct HeaderAction {
    pub view_changed: bool,
    pub refresh: bool,
    /// `Some(force)` when a kill button was clicked.
    pub kill: Option<bool>,
}

#[derive(Default)]
pub struct Header {
    cwd_text: String,
    cwd_error: Option<String>,
}

impl Header {
    pub fn new(view: &ViewConfig) -> Self {
        Self {
            cwd_text: view.cwd.clone().unwrap_or_default(),
            cwd_error: None,
        }
    }

    pub fn set_cwd(&mut self, cwd: &str) {
        self.cwd_text = cwd.to_string();
        self.cwd_error = None;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        view: &mut ViewConfig,
        process_table: &mut crate::ui::process_table::ProcessTable,
        selected_count: usize,
        killing: bool,
    ) -> HeaderAction {
        let mut action = HeaderAction::default();

        ui.horizontal(|ui| {
            ui.heading("procclean");
            ui.add_space(20.0);

            egui::ComboBox::from_label("Filter")
                .selected_text(view.filter.as_str())
                .show_ui(ui, |ui| {
                    for kind in FilterKind::ALL {
                        if ui
                            .selectable_value(&mut view.filter, kind, kind.as_str())
                            .changed()
                        {
                            action.view_changed = true;
                        }
                    }
                });

            ui.label("High memory:");
            let threshold = ui.add_enabled(
                view.filter == FilterKind::HighMemory,
                egui::DragValue::new(&mut view.high_memory_threshold_mb)
                    .speed(10.0)
                    .clamp_range(0.0..=1_048_576.0)
                    .suffix(" MB"),
            );
            if threshold.changed() {
                action.view_changed = true;
            }

            ui.label("Min:");
            ui.add(
                egui::DragValue::new(&mut view.min_memory_mb)
                    .speed(1.0)
                    .clamp_range(0.0..=1_048_576.0)
                    .suffix(" MB"),
            )
            .on_hover_text("Processes below this RSS are skipped. Applied on refresh.");

            ui.add_space(10.0);
            if ui.button("Refresh")
                .on_hover_text("Take a new snapshot.\nCPU % is a lifetime average until two snapshots are at least half a second apart.")
                .clicked() {
                action.refresh = true;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.menu_button("Menu", |ui| {
                    ui.set_min_width(120.0);

                    ui.label("Show columns:");
                    ui.checkbox(&mut process_table.show_cwd, "CWD");
                    ui.checkbox(&mut process_table.show_ppid, "PPID");
                    ui.checkbox(&mut process_table.show_parent, "Parent");
                });

                let can_kill = selected_count > 0 && !killing;
                let force = ui.add_enabled(
                    can_kill,
                    egui::Button::new("Force kill").fill(egui::Color32::from_rgb(200, 40, 40)),
                );
                if force.on_hover_text("SIGKILL").clicked() {
                    action.kill = Some(true);
                }
                let label = if killing {
                    "Killing...".to_string()
                } else {
                    format!("Kill {selected_count} selected")
                };
                if ui
                    .add_enabled(can_kill, egui::Button::new(label))
                    .on_hover_text("SIGTERM")
                    .clicked()
                {
                    action.kill = Some(false);
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label("CWD:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.cwd_text)
                    .hint_text("/home/me/project or /tmp/*")
                    .desired_width(320.0),
            );
            if response.changed() && self.apply_cwd(view) {
                action.view_changed = true;
            }

            if !self.cwd_text.is_empty() && ui.button("Clear").clicked() {
                self.cwd_text.clear();
                if self.apply_cwd(view) {
                    action.view_changed = true;
                }
            }

            if let Some(err) = &self.cwd_error {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
            }
        });

        action
    }

    /// Copies the text box into `view.cwd`. A malformed glob leaves the view as it was.
    fn apply_cwd(&mut self, view: &mut ViewConfig) -> bool {
        let text = self.cwd_text.trim();
        let next = if text.is_empty() {
            None
        } else {
            match validate_cwd_pattern(text) {
                Ok(()) => Some(text.to_string()),
                Err(e) => {
                    self.cwd_error = Some(e);
                    return false;
                }
            }
        };
        self.cwd_error = None;
        if view.cwd == next {
            return false;
        }
        view.cwd = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_glob_keeps_previous_cwd() {
        let mut view = ViewConfig {
            cwd: Some("/srv".to_string()),
            ..Default::default()
        };
        let mut header = Header::new(&view);

        header.cwd_text = "/tmp/[a".to_string();
        assert!(!header.apply_cwd(&mut view));
        assert_eq!(view.cwd.as_deref(), Some("/srv"));
        assert!(header.cwd_error.is_some());

        header.cwd_text = " /tmp/* ".to_string();
        assert!(header.apply_cwd(&mut view));
        assert_eq!(view.cwd.as_deref(), Some("/tmp/*"));
        assert!(header.cwd_error.is_none());

        header.cwd_text.clear();
        assert!(header.apply_cwd(&mut view));
        assert_eq!(view.cwd, None);
    }
}
