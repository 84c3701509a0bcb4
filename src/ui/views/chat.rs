use eframe::egui;

use crate::ui::components::{input_bar, message_list};
use crate::ui::state::ChatState;

pub enum ChatAction {
    Send(String),
    LoadOlder,
    Leave,
    CreateGroup(String),
    StartDirect { user_id: String, user_name: String },
    StartAi,
    CloseNewRoom,
}

/// Central chat panel: the active conversation, or the new-room picker.
pub fn render(
    ui: &mut egui::Ui,
    chat: &mut ChatState,
    connected: bool,
    my_user_id: Option<&str>,
) -> Option<ChatAction> {
    if chat.show_new_room {
        return render_new_room(ui, chat);
    }

    let Some(room) = chat.session.room() else {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.weak("Pick a room from the list");
        });
        return None;
    };
    let room_title = room.title.clone();

    let mut action = None;

    ui.horizontal(|ui| {
        let dot = if connected {
            egui::Color32::GREEN
        } else {
            egui::Color32::RED
        };
        ui.colored_label(dot, "●");
        ui.heading(&room_title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Leave").clicked() {
                action = Some(ChatAction::Leave);
            }
        });
    });
    ui.separator();

    let bottom = egui::TopBottomPanel::bottom("chat_input")
        .show_inside(ui, |ui| input_bar::render(ui, &mut chat.input_text, connected));
    if let Some(content) = bottom.inner {
        action = Some(ChatAction::Send(content));
    }

    let wants_older = message_list::render(ui, &chat.session, my_user_id);
    if wants_older && action.is_none() {
        action = Some(ChatAction::LoadOlder);
    }

    action
}

fn render_new_room(ui: &mut egui::Ui, chat: &mut ChatState) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Start a conversation");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Close").clicked() {
                action = Some(ChatAction::CloseNewRoom);
            }
        });
    });
    ui.separator();

    ui.label("Group channel");
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut chat.new_group_title);
        if ui.button("Create").clicked() && !chat.new_group_title.trim().is_empty() {
            action = Some(ChatAction::CreateGroup(
                chat.new_group_title.trim().to_string(),
            ));
            chat.new_group_title.clear();
        }
    });
    ui.separator();

    if ui.button("Ask the AI advisor").clicked() {
        action = Some(ChatAction::StartAi);
    }
    ui.separator();

    ui.label("Direct message");
    if chat.users.is_empty() {
        ui.weak("No users loaded");
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        for user in &chat.users {
            let name = user.name.as_deref().unwrap_or("(unnamed)");
            ui.horizontal(|ui| {
                ui.label(name);
                if ui.button("Chat").clicked() {
                    if let Some(user_id) = &user.user_id {
                        action = Some(ChatAction::StartDirect {
                            user_id: user_id.clone(),
                            user_name: name.to_string(),
                        });
                    }
                }
            });
        }
    });

    action
}
