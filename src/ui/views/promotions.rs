use eframe::egui;

use crate::common::types::PromotionState;
use crate::ui::state::PromotionsState;

pub enum PromotionsAction {
    Refresh,
    Join(String),
    CheckResult(String),
}

pub fn render(ui: &mut egui::Ui, state: &mut PromotionsState) -> Option<PromotionsAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Point promotions");
        if ui.button("Refresh").clicked() {
            action = Some(PromotionsAction::Refresh);
        }
    });
    if let Some(notice) = &state.notice {
        ui.colored_label(egui::Color32::LIGHT_BLUE, notice);
    }
    if let Some(participation) = &state.participation {
        match participation.is_winner {
            Some(true) => {
                let points = participation.point_amount.unwrap_or_default();
                ui.colored_label(
                    egui::Color32::GREEN,
                    format!("You won {points} points!"),
                );
            }
            Some(false) => {
                ui.weak("Not a winner this time");
            }
            None => {
                let position = participation.queue_position.unwrap_or_default();
                ui.weak(format!("In queue, position {position}"));
            }
        }
    }
    ui.separator();

    if state.loading {
        ui.weak("Loading...");
        return action;
    }
    if state.promotions.is_empty() {
        ui.weak("No promotions right now");
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for promo in &state.promotions {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(&promo.name);
                    ui.weak(promo.status.as_str());
                });
                ui.label(format!(
                    "{} points, {} total",
                    promo.point_amount, promo.total_stock
                ));
                if let Some(remaining) = promo.remaining_stock {
                    ui.weak(format!("{remaining} remaining"));
                }
                let Some(id) = &promo.id else { return };
                ui.horizontal(|ui| {
                    if promo.status == PromotionState::Active && ui.button("Join").clicked() {
                        action = Some(PromotionsAction::Join(id.clone()));
                    }
                    if ui.button("My result").clicked() {
                        action = Some(PromotionsAction::CheckResult(id.clone()));
                    }
                });
            });
        }
    });

    action
}
