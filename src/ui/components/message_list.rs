use eframe::egui;

use crate::chat::RoomSession;

/// Scrollable message area. Returns true when the user has scrolled to the
/// top edge and an older page should be requested.
pub fn render(ui: &mut egui::Ui, session: &RoomSession, my_user_id: Option<&str>) -> bool {
    let output = egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if session.is_loading() {
                ui.vertical_centered(|ui| ui.weak("Loading..."));
            } else if !session.has_more() && !session.messages().is_empty() {
                ui.vertical_centered(|ui| ui.weak("Beginning of conversation"));
            }

            let mut last_day = String::new();
            for message in session.messages() {
                if let Some(ts) = &message.created_at {
                    let day = ts.date_label();
                    if !day.is_empty() && day != last_day {
                        ui.vertical_centered(|ui| ui.weak(&day));
                        ui.separator();
                        last_day = day;
                    }
                }

                if message.is_enter {
                    let who = message.sender_name.as_deref().unwrap_or("Someone");
                    ui.vertical_centered(|ui| {
                        ui.weak(format!("— {who} {} —", message.content));
                    });
                    continue;
                }

                let mine = my_user_id.is_some()
                    && message.sender_id.as_deref() == my_user_id;
                let layout = if mine {
                    egui::Layout::right_to_left(egui::Align::TOP)
                } else {
                    egui::Layout::left_to_right(egui::Align::TOP)
                };
                ui.with_layout(layout, |ui| {
                    let time = message
                        .created_at
                        .as_ref()
                        .map(|ts| ts.time_label())
                        .unwrap_or_default();
                    if mine {
                        ui.weak(time);
                        ui.label(&message.content);
                    } else {
                        let name = message.sender_name.as_deref().unwrap_or("?");
                        ui.strong(name);
                        ui.label(&message.content);
                        ui.weak(time);
                    }
                });
            }
        });

    // At the very top of the scroll range with more pages available. Skip
    // when the content fits the viewport, otherwise short conversations
    // would page themselves all the way back.
    let scrollable = output.content_size.y > output.inner_rect.height();
    scrollable && output.state.offset.y <= 1.0 && session.has_more() && !session.messages().is_empty()
}
