use eframe::egui;

use crate::ui::state::GoalsState;

pub enum GoalsAction {
    Refresh,
    Save,
    Analyze(String),
    ViewReport(String),
    DeleteReport(String),
}

pub fn render(ui: &mut egui::Ui, state: &mut GoalsState) -> Option<GoalsAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Financial goal");
        if ui.button("Refresh").clicked() {
            action = Some(GoalsAction::Refresh);
        }
    });
    ui.separator();

    ui.columns(2, |columns| {
        let ui = &mut columns[0];
        numeric_field(ui, "Age", &mut state.goal.age);
        ui.label("Job");
        let mut job = state.goal.job.clone().unwrap_or_default();
        if ui.text_edit_singleline(&mut job).changed() {
            state.goal.job = Some(job);
        }
        numeric_field(ui, "Capital (KRW)", &mut state.goal.capital);
        numeric_field(ui, "Monthly income", &mut state.goal.monthly_income);
        numeric_field(ui, "Fixed expenses", &mut state.goal.fixed_expenses);
        if ui.button("Save").clicked() {
            action = Some(GoalsAction::Save);
        }

        let ui = &mut columns[1];
        ui.label("Ask the analyst");
        ui.text_edit_multiline(&mut state.question);
        ui.add_enabled_ui(!state.analyzing, |ui| {
            if ui.button("Analyze").clicked() && !state.question.trim().is_empty() {
                action = Some(GoalsAction::Analyze(state.question.trim().to_string()));
            }
        });
        if state.analyzing {
            ui.weak("Analyzing...");
        }
    });
    ui.separator();

    ui.label("Past reports");
    egui::ScrollArea::vertical().show(ui, |ui| {
        if state.reports.is_empty() {
            ui.weak("No reports yet");
        }
        for report in &state.reports {
            ui.horizontal(|ui| {
                let question = report.question.as_deref().unwrap_or("(report)");
                ui.label(question);
                if let Some(at) = &report.created_at {
                    ui.weak(at.date_label());
                }
                let Some(id) = &report.report_id else { return };
                if ui.small_button("View").clicked() {
                    action = Some(GoalsAction::ViewReport(id.clone()));
                }
                if ui.small_button("Delete").clicked() {
                    action = Some(GoalsAction::DeleteReport(id.clone()));
                }
            });
        }

        if let Some(open) = &state.open_report {
            ui.separator();
            ui.group(|ui| {
                ui.strong(open.question.as_deref().unwrap_or("Report"));
                ui.label(open.result_report.as_deref().unwrap_or("(empty)"));
            });
        }
    });

    action
}

fn numeric_field(ui: &mut egui::Ui, label: &str, value: &mut Option<i64>) {
    ui.label(label);
    let mut text = value.map(|v| v.to_string()).unwrap_or_default();
    if ui.text_edit_singleline(&mut text).changed() {
        *value = text.trim().parse::<i64>().ok();
    }
}
