//! Confirmation window shown before any signal is sent.

use backend::{ProcessRecord, CONFIRM_PREVIEW_LIMIT};
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    Cancelled,
}

pub struct ConfirmDialog {
    targets: Vec<ProcessRecord>,
    force: bool,
}

impl ConfirmDialog {
    pub fn new(targets: Vec<ProcessRecord>, force: bool) -> Self {
        Self { targets, force }
    }

    pub fn pids(&self) -> Vec<i32> {
        self.targets.iter().map(|p| p.pid).collect()
    }

    pub fn force(&self) -> bool {
        self.force
    }

    fn total_rss_mb(&self) -> f64 {
        self.targets.iter().map(|p| p.rss_mb).sum()
    }

    fn title(&self) -> String {
        let action = if self.force { "Force kill" } else { "Terminate" };
        format!("{} {} process(es)?", action, self.targets.len())
    }

    /// One line per listed target, plus a trailing "... and N more" when truncated.
    fn preview_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .targets
            .iter()
            .take(CONFIRM_PREVIEW_LIMIT)
            .map(|p| format!("PID {} - {} ({:.1} MB)", p.pid, p.name, p.rss_mb))
            .collect();
        if self.targets.len() > CONFIRM_PREVIEW_LIMIT {
            lines.push(format!(
                "... and {} more",
                self.targets.len() - CONFIRM_PREVIEW_LIMIT
            ));
        }
        lines
    }

    /// Returns an outcome once the user has decided; `None` while the window stays open.
    pub fn show(&self, ctx: &egui::Context) -> Option<ConfirmOutcome> {
        let mut outcome = None;

        egui::Window::new(self.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                for line in self.preview_lines() {
                    ui.monospace(line);
                }
                ui.add_space(6.0);
                ui.label(format!("Will free ~{:.1} MB", self.total_rss_mb()));
                if self.force {
                    ui.colored_label(
                        egui::Color32::from_rgb(220, 80, 80),
                        "SIGKILL: processes get no chance to clean up.",
                    );
                }
                ui.separator();
                ui.horizontal(|ui| {
                    let yes = egui::Button::new("Yes").fill(egui::Color32::from_rgb(200, 40, 40));
                    if ui.add(yes).clicked() {
                        outcome = Some(ConfirmOutcome::Confirmed);
                    }
                    if ui.button("No").clicked() {
                        outcome = Some(ConfirmOutcome::Cancelled);
                    }
                });
            });

        if outcome.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            outcome = Some(ConfirmOutcome::Cancelled);
        }
        outcome
    }
}
