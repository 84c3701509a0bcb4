use eframe::egui;

use crate::ui::state::PointsState;

pub enum PointsAction {
    Refresh,
}

pub fn render(ui: &mut egui::Ui, state: &PointsState) -> Option<PointsAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("My points");
        if ui.button("Refresh").clicked() {
            action = Some(PointsAction::Refresh);
        }
    });
    ui.separator();

    if let Some(summary) = &state.summary {
        ui.label(format!("Balance: {} points", summary.total_points));
        if let Some(count) = summary.earned_count {
            ui.weak(format!("earned in {count} promotions"));
        }
    } else {
        ui.weak("Loading...");
    }
    ui.separator();

    ui.label("History");
    egui::ScrollArea::vertical().show(ui, |ui| {
        if state.history.is_empty() {
            ui.weak("Nothing earned yet");
        }
        for entry in &state.history {
            ui.horizontal(|ui| {
                let name = entry.promotion_name.as_deref().unwrap_or("promotion");
                ui.label(format!("+{} · {name}", entry.amount));
                if let Some(at) = &entry.earned_at {
                    ui.weak(at.date_label());
                }
            });
        }
    });

    action
}
