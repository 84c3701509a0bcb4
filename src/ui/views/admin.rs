use eframe::egui;

use crate::common::types::PromotionState;
use crate::ui::state::AdminState;

pub enum AdminAction {
    Refresh,
    ApproveAdvisor(String),
    CreatePromotion,
    StartPromotion(String),
    EndPromotion(String),
    Monitor(String),
    ShowWinners { id: String, name: String },
    SendManualReport,
    SendSlackTest,
}

/// Admin console: advisor approvals, promotion lifecycle and live
/// monitoring, reservations overview.
pub fn render(
    ui: &mut egui::Ui,
    state: &mut AdminState,
    promotions: &[crate::common::types::Promotion],
) -> Option<AdminAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Admin");
        if ui.button("Refresh").clicked() {
            action = Some(AdminAction::Refresh);
        }
        if ui.button("Slack report now").clicked() {
            action = Some(AdminAction::SendManualReport);
        }
        if ui.button("Slack test").clicked() {
            action = Some(AdminAction::SendSlackTest);
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.collapsing("Pending advisor applications", |ui| {
            if state.pending_advisors.is_empty() {
                ui.weak("None pending");
            }
            for user in &state.pending_advisors {
                ui.horizontal(|ui| {
                    ui.label(user.name.as_deref().unwrap_or("(unnamed)"));
                    ui.weak(user.user_name.as_deref().unwrap_or(""));
                    let Some(id) = &user.user_id else { return };
                    if ui.button("Approve").clicked() {
                        action = Some(AdminAction::ApproveAdvisor(id.clone()));
                    }
                });
            }
        });

        ui.collapsing("New promotion", |ui| {
            let form = &mut state.new_promotion;
            ui.label("Name");
            ui.text_edit_singleline(&mut form.name);
            ui.label("Points per winner");
            ui.text_edit_singleline(&mut form.point_amount);
            ui.label("Winner count");
            ui.text_edit_singleline(&mut form.total_stock);
            ui.label("Starts (ISO-8601)");
            ui.text_edit_singleline(&mut form.start_time);
            ui.label("Ends (ISO-8601)");
            ui.text_edit_singleline(&mut form.end_time);
            if ui.button("Create").clicked() && !form.name.trim().is_empty() {
                action = Some(AdminAction::CreatePromotion);
            }
        });

        ui.separator();
        ui.label("Promotions");
        for promo in promotions {
            let Some(id) = &promo.id else { continue };
            ui.horizontal(|ui| {
                ui.strong(&promo.name);
                ui.weak(promo.status.as_str());
                match promo.status {
                    PromotionState::Scheduled => {
                        if ui.button("Start").clicked() {
                            action = Some(AdminAction::StartPromotion(id.clone()));
                        }
                    }
                    PromotionState::Active => {
                        if ui.button("End").clicked() {
                            action = Some(AdminAction::EndPromotion(id.clone()));
                        }
                        if ui.button("Monitor").clicked() {
                            action = Some(AdminAction::Monitor(id.clone()));
                        }
                    }
                    PromotionState::Ended => {
                        if ui.button("Winners").clicked() {
                            action = Some(AdminAction::ShowWinners {
                                id: id.clone(),
                                name: promo.name.clone(),
                            });
                        }
                    }
                }
            });
        }

        if let Some(live) = &state.live_status {
            ui.separator();
            ui.group(|ui| {
                ui.strong("Live status");
                ui.label(format!(
                    "participants {} · winners {} · stock left {}",
                    live.participant_count.unwrap_or_default(),
                    live.winner_count.unwrap_or_default(),
                    live.remaining_stock.unwrap_or_default(),
                ));
                if let Some(status) = &live.status {
                    ui.weak(status);
                }
            });
        }

        if let Some(name) = &state.winners_of {
            ui.separator();
            ui.label(format!("Winners of {name}"));
            if state.winners.is_empty() {
                ui.weak("No winners recorded");
            }
            for winner in &state.winners {
                ui.horizontal(|ui| {
                    ui.label(winner.name.as_deref().unwrap_or("(user)"));
                    if let Some(position) = winner.queue_position {
                        ui.weak(format!("#{position}"));
                    }
                });
            }
        }

        if !state.all_reservations.is_empty() {
            ui.separator();
            ui.label("All reservations");
            for reservation in &state.all_reservations {
                ui.horizontal(|ui| {
                    ui.label(reservation.product_name.as_deref().unwrap_or("(product)"));
                    ui.weak(reservation.status.as_deref().unwrap_or(""));
                });
            }
        }
    });

    action
}
