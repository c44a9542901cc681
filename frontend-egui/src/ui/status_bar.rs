//! Status bar component showing counts, memory and the last kill outcome.

use backend::{KillResult, KillSummary, MemorySummary, ProcessRecord};
use eframe::egui;
use std::collections::BTreeSet;

pub struct StatusBar;

impl StatusBar {
    pub fn show(
        ui: &mut egui::Ui,
        snapshot: &[ProcessRecord],
        visible: &[ProcessRecord],
        selected: &BTreeSet<i32>,
        memory: Option<&MemorySummary>,
        last_results: &[KillResult],
    ) {
        ui.horizontal(|ui| {
            ui.label(format!("Processes: {}", snapshot.len()));

            if visible.len() != snapshot.len() {
                ui.separator();
                ui.label(format!("Shown: {}", visible.len()));
            }

            ui.separator();
            let orphans = snapshot.iter().filter(|p| p.is_orphan).count();
            ui.label(format!("Orphans: {}", orphans));

            ui.separator();
            let selected_rss: f64 = visible
                .iter()
                .filter(|p| selected.contains(&p.pid))
                .map(|p| p.rss_mb)
                .sum();
            ui.label(format!(
                "Selected: {} ({:.1} MB)",
                selected.len(),
                selected_rss
            ));

            if let Some(mem) = memory {
                ui.separator();
                ui.label(format!(
                    "RAM: {:.1} / {:.1} GB ({:.0}%)",
                    mem.used_gb, mem.total_gb, mem.percent
                ));
            }

            if !last_results.is_empty() {
                ui.separator();
                let summary = KillSummary::from_results(last_results);
                let text = format!(
                    "Last kill: {} ok, {} failed",
                    summary.succeeded, summary.failed
                );
                if summary.is_success() {
                    ui.label(text);
                } else {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), text);
                }
            }
        });

        if !last_results.is_empty() {
            egui::CollapsingHeader::new("Kill results")
                .default_open(false)
                .show(ui, |ui| {
                    for result in last_results {
                        let color = if result.success {
                            egui::Color32::from_rgb(90, 200, 90)
                        } else {
                            egui::Color32::from_rgb(220, 80, 80)
                        };
                        ui.colored_label(color, result.to_string());
                    }
                });
        }
    }
}
