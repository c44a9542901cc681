use backend::{
    get_memory_summary, kill_processes, list_processes, KillResult, MemorySummary,
    ProcessRecord, ViewConfig,
};
use eframe::{egui, App};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use ui::confirm::{ConfirmDialog, ConfirmOutcome};
use ui::header::Header;
use ui::status_bar::StatusBar;

mod ui;
use ui::process_table::{ProcessTable, TableAction};

/// Honours `RUST_LOG`, defaulting to `info`.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> eframe::Result<()> {
    setup_logging();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "procclean",
        native_options,
        Box::new(|cc| {
            // Global black theme
            let mut visuals = egui::Visuals::dark();
            visuals.override_text_color = Some(egui::Color32::WHITE);
            visuals.panel_fill = egui::Color32::BLACK;
            visuals.window_fill = egui::Color32::BLACK;
            cc.egui_ctx.set_visuals(visuals);

            let mut style = (*cc.egui_ctx.style()).clone();
            style.spacing.item_spacing = egui::vec2(10.0, 8.0);
            style.spacing.button_padding = egui::vec2(12.0, 8.0);
            cc.egui_ctx.set_style(style);

            Box::new(ProcessManagerApp::new(ViewConfig::default()))
        }),
    )
}

struct ProcessManagerApp {
    view: ViewConfig,
    snapshot: Vec<ProcessRecord>,
    /// `view` applied to `snapshot`; rebuilt whenever either changes.
    visible: Vec<ProcessRecord>,
    selected: BTreeSet<i32>,
    memory: Option<MemorySummary>,
    load_error: Option<String>,
    header: Header,
    process_table: ProcessTable,
    confirm: Option<ConfirmDialog>,
    /// Filled by the background kill task, drained on the next frame.
    pending_results: Arc<Mutex<Option<Vec<KillResult>>>>,
    killing: bool,
    last_results: Vec<KillResult>,
}

impl ProcessManagerApp {
    fn new(view: ViewConfig) -> Self {
        let mut app = Self {
            header: Header::new(&view),
            view,
            snapshot: Vec::new(),
            visible: Vec::new(),
            selected: BTreeSet::new(),
            memory: None,
            load_error: None,
            process_table: ProcessTable::default(),
            confirm: None,
            pending_results: Arc::new(Mutex::new(None)),
            killing: false,
            last_results: Vec::new(),
        };
        app.refresh();
        app
    }

    fn refresh(&mut self) {
        match list_processes(&self.view.snapshot_options()) {
            Ok(list) => {
                info!(count = list.len(), "snapshot refreshed");
                self.snapshot = list;
                self.load_error = None;
            }
            Err(e) => {
                error!(error = %e, "failed to read process table");
                self.load_error = Some(e.to_string());
            }
        }
        self.memory = get_memory_summary()
            .map_err(|e| debug!(error = %e, "memory summary unavailable"))
            .ok();
        self.rebuild_view();
    }

    /// Re-runs the filter/sort pipeline and drops selections that are no longer shown.
    fn rebuild_view(&mut self) {
        self.visible = self.view.apply(&self.snapshot);
        let shown: BTreeSet<i32> = self.visible.iter().map(|p| p.pid).collect();
        self.selected.retain(|pid| shown.contains(pid));
    }

    /// Opens the confirmation window. Ignored while a previous batch is running.
    fn request_kill(&mut self, pids: &[i32], force: bool) {
        if self.killing {
            return;
        }
        let targets: Vec<ProcessRecord> = self
            .visible
            .iter()
            .filter(|p| pids.contains(&p.pid))
            .cloned()
            .collect();
        if !targets.is_empty() {
            self.confirm = Some(ConfirmDialog::new(targets, force));
        }
    }

    fn start_kill(&mut self, ctx: &egui::Context, dialog: ConfirmDialog) {
        let pids = dialog.pids();
        let force = dialog.force();
        info!(count = pids.len(), force, "killing selected processes");

        self.killing = true;
        let pending = self.pending_results.clone();
        let ctx = ctx.clone();
        tokio::task::spawn_blocking(move || {
            let results = kill_processes(&pids, force);
            pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_or_insert_with(Vec::new)
                .extend(results);
            ctx.request_repaint();
        });
    }

    fn collect_kill_results(&mut self) {
        let finished = self
            .pending_results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(results) = finished {
            self.killing = false;
            self.last_results = results;
            self.refresh();
        }
    }
}

impl App for ProcessManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_kill_results();

        if let Some(dialog) = &self.confirm {
            match dialog.show(ctx) {
                Some(ConfirmOutcome::Confirmed) => {
                    if let Some(dialog) = self.confirm.take() {
                        self.start_kill(ctx, dialog);
                    }
                }
                Some(ConfirmOutcome::Cancelled) => self.confirm = None,
                None => {}
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = self.header.show(
                ui,
                &mut self.view,
                &mut self.process_table,
                self.selected.len(),
                self.killing,
            );
            ui.add_space(6.0);

            if let Some(err) = &self.load_error {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
            }

            if action.refresh {
                self.refresh();
            } else if action.view_changed {
                self.rebuild_view();
            }
            if let Some(force) = action.kill {
                let pids: Vec<i32> = self.selected.iter().copied().collect();
                self.request_kill(&pids, force);
            }

            // Status bar first so the table can take the remaining height.
            egui::TopBottomPanel::bottom("status_bar").show_inside(ui, |ui| {
                StatusBar::show(
                    ui,
                    &self.snapshot,
                    &self.visible,
                    &self.selected,
                    self.memory.as_ref(),
                    &self.last_results,
                );
            });

            let table_action = self.process_table.show(
                ui,
                &self.visible,
                &mut self.selected,
                &mut self.view.sort,
                &mut self.view.ascending,
                self.killing,
            );
            match table_action {
                Some(TableAction::Resort) => self.rebuild_view(),
                Some(TableAction::Kill { pid, force }) => self.request_kill(&[pid], force),
                Some(TableAction::ScopeToCwd(cwd)) => {
                    self.header.set_cwd(&cwd);
                    self.view.cwd = Some(cwd);
                    self.rebuild_view();
                }
                None => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_app() -> ProcessManagerApp {
        let mut app = ProcessManagerApp::new(ViewConfig {
            user: Some("no-such-user-for-procclean-tests".into()),
            ..Default::default()
        });
        app.visible = vec![ProcessRecord {
            pid: 4_194_304 + 77,
            name: "job".into(),
            ..Default::default()
        }];
        app
    }

    #[test]
    fn no_second_confirmation_while_killing() {
        let mut app = idle_app();
        app.killing = true;
        app.request_kill(&[4_194_304 + 77], false);
        assert!(app.confirm.is_none());

        app.killing = false;
        app.request_kill(&[4_194_304 + 77], true);
        assert!(app.confirm.as_ref().is_some_and(ConfirmDialog::force));
    }

    #[test]
    fn finished_batches_are_collected_together() {
        let mut app = idle_app();
        app.killing = true;
        for pid in [1_i32, 2] {
            app.pending_results
                .lock()
                .unwrap()
                .get_or_insert_with(Vec::new)
                .push(KillResult {
                    pid,
                    success: true,
                    message: format!("Process {pid} terminated"),
                });
        }
        app.collect_kill_results();
        assert!(!app.killing);
        let pids: Vec<i32> = app.last_results.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![1, 2]);
    }
}
