//! Process table component with selection, sorting and per-row actions.

use backend::{ProcessRecord, SortKey};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::collections::BTreeSet;

/// Row-level requests handed back to the app.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    /// A sort header was clicked.
    Resort,
    Kill { pid: i32, force: bool },
    /// Restrict the view to this working directory.
    ScopeToCwd(String),
}

pub struct ProcessTable {
    pub show_cwd: bool,
    pub show_ppid: bool,
    pub show_parent: bool,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self {
            show_cwd: true,
            show_ppid: false,
            show_parent: true,
        }
    }
}

impl ProcessTable {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        processes: &[ProcessRecord],
        selected: &mut BTreeSet<i32>,
        sort: &mut SortKey,
        ascending: &mut bool,
        killing: bool,
    ) -> Option<TableAction> {
        let text_sz = 15.0;
        let row_height = 28.0;
        let mut action = None;

        let mut table_builder = TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(32.0)) // selection
            .column(Column::exact(80.0)) // PID
            .column(Column::initial(180.0).at_least(80.0)) // Name
            .column(Column::exact(100.0)) // RAM
            .column(Column::exact(70.0)); // CPU
        if self.show_cwd {
            table_builder = table_builder.column(Column::initial(260.0).at_least(80.0));
        }
        if self.show_ppid {
            table_builder = table_builder.column(Column::exact(80.0));
        }
        if self.show_parent {
            table_builder = table_builder.column(Column::initial(120.0).at_least(60.0));
        }
        table_builder = table_builder.column(Column::remainder()); // Status

        table_builder
            .header(row_height, |mut header| {
                header.col(|ui| {
                    let all_selected =
                        !processes.is_empty() && processes.iter().all(|p| selected.contains(&p.pid));
                    let mut check = all_selected;
                    if ui.checkbox(&mut check, "").on_hover_text("Select all shown").changed() {
                        if check {
                            selected.extend(processes.iter().map(|p| p.pid));
                        } else {
                            selected.clear();
                        }
                    }
                });
                for (title, key) in [
                    ("PID", SortKey::Pid),
                    ("Name", SortKey::Name),
                    ("RAM (MB)", SortKey::Memory),
                    ("CPU %", SortKey::Cpu),
                ] {
                    header.col(|ui| {
                        if sort_header(ui, title, key, sort, ascending) {
                            action = Some(TableAction::Resort);
                        }
                    });
                }
                if self.show_cwd {
                    header.col(|ui| {
                        if sort_header(ui, "CWD", SortKey::Cwd, sort, ascending) {
                            action = Some(TableAction::Resort);
                        }
                    });
                }
                if self.show_ppid {
                    header.col(|ui| {
                        ui.strong("PPID");
                    });
                }
                if self.show_parent {
                    header.col(|ui| {
                        ui.strong("Parent");
                    });
                }
                header.col(|ui| {
                    ui.strong("Status");
                });
            })
            .body(|body| {
                body.rows(row_height, processes.len(), |mut row| {
                    let p = &processes[row.index()];

                    row.col(|ui| {
                        let mut checked = selected.contains(&p.pid);
                        if ui.checkbox(&mut checked, "").changed() {
                            toggle(selected, p.pid, checked);
                        }
                    });

                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(p.pid.to_string())
                                .size(text_sz)
                                .monospace(),
                        );
                    });

                    // Name carries the hover details and the context menu.
                    row.col(|ui| {
                        let response = ui.add(
                            egui::Label::new(egui::RichText::new(&p.name).size(text_sz))
                                .truncate(true)
                                .sense(egui::Sense::click()),
                        );
                        response.clone().on_hover_text(format!(
                            "{}\nPID: {}\n{}\nRight-click for options",
                            p.name, p.pid, p.cmdline
                        ));
                        if response.clicked() {
                            let checked = !selected.contains(&p.pid);
                            toggle(selected, p.pid, checked);
                        }
                        response.context_menu(|ui| {
                            if let Some(a) = context_menu(ui, p, selected, killing) {
                                action = Some(a);
                            }
                        });
                    });

                    row.col(|ui| {
                        ui.label(egui::RichText::new(format!("{:.1}", p.rss_mb)).size(text_sz));
                    });

                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{:.1}", p.cpu_percent)).size(text_sz),
                        );
                    });

                    if self.show_cwd {
                        row.col(|ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(p.cwd.to_string()).size(text_sz),
                                )
                                .truncate(true),
                            );
                        });
                    }

                    if self.show_ppid {
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new(p.ppid.to_string())
                                    .size(text_sz)
                                    .monospace(),
                            );
                        });
                    }

                    if self.show_parent {
                        row.col(|ui| {
                            ui.label(egui::RichText::new(&p.parent_name).size(text_sz));
                        });
                    }

                    row.col(|ui| {
                        let mut text = egui::RichText::new(p.display_status()).size(text_sz);
                        if p.is_orphan && !p.in_tmux {
                            text = text.color(egui::Color32::from_rgb(230, 170, 60));
                        }
                        ui.label(text);
                    });
                });
            });

        action
    }
}

fn toggle(selected: &mut BTreeSet<i32>, pid: i32, checked: bool) {
    if checked {
        selected.insert(pid);
    } else {
        selected.remove(&pid);
    }
}

fn context_menu(
    ui: &mut egui::Ui,
    p: &ProcessRecord,
    selected: &mut BTreeSet<i32>,
    killing: bool,
) -> Option<TableAction> {
    ui.set_min_width(200.0);
    let mut action = None;

    let is_selected = selected.contains(&p.pid);
    if ui
        .button(if is_selected { "Deselect" } else { "Select" })
        .clicked()
    {
        toggle(selected, p.pid, !is_selected);
        ui.close_menu();
    }

    if ui
        .add_enabled(!killing, egui::Button::new("Terminate"))
        .clicked()
    {
        action = Some(TableAction::Kill {
            pid: p.pid,
            force: false,
        });
        ui.close_menu();
    }

    let kill_button = ui.add_enabled(
        !killing,
        egui::Button::new("Force kill")
            .fill(egui::Color32::from_rgb(200, 40, 40))
            .min_size(egui::vec2(180.0, 25.0)),
    );
    if kill_button.clicked() {
        action = Some(TableAction::Kill {
            pid: p.pid,
            force: true,
        });
        ui.close_menu();
    }

    if let Some(cwd) = p.cwd.as_path() {
        if ui.button("Show only this directory").clicked() {
            action = Some(TableAction::ScopeToCwd(cwd.to_string()));
            ui.close_menu();
        }
    }

    ui.separator();
    ui.label(format!("PID: {}", p.pid));
    ui.label(format!("Parent: {} ({})", p.parent_name, p.ppid));
    ui.label(format!("User: {}", p.username));
    ui.label(format!("Memory: {:.1} MB", p.rss_mb));
    ui.label(format!("Status: {}", p.display_status()));

    action
}

/// Draws a clickable column title. Returns true when the sort changed.
fn sort_header(
    ui: &mut egui::Ui,
    title: &str,
    key: SortKey,
    sort: &mut SortKey,
    ascending: &mut bool,
) -> bool {
    let active = *sort == key;
    let arrow = if !active {
        ""
    } else if *ascending {
        " ↑"
    } else {
        " ↓"
    };
    let btn = egui::Button::new(
        egui::RichText::new(format!("{title}{arrow}"))
            .strong()
            .size(15.0),
    )
    .frame(false);

    if !ui.add(btn).clicked() {
        return false;
    }
    if active {
        *ascending = !*ascending;
    } else {
        *sort = key;
        *ascending = default_ascending(key);
    }
    true
}

/// Text columns start A to Z, numeric columns start with the largest.
fn default_ascending(key: SortKey) -> bool {
    matches!(key, SortKey::Pid | SortKey::Name | SortKey::Cwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_columns_start_descending() {
        assert!(!default_ascending(SortKey::Memory));
        assert!(!default_ascending(SortKey::Cpu));
        assert!(default_ascending(SortKey::Name));
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selected = BTreeSet::new();
        toggle(&mut selected, 42, true);
        toggle(&mut selected, 7, true);
        toggle(&mut selected, 42, false);
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec![7]);
    }
}
