use eframe::egui;

use crate::common::types::{ChatRoom, RoomType};
use crate::ui::state::ChatState;

pub enum RoomListAction {
    Open(ChatRoom),
    SwitchTab(RoomType),
    NewRoom,
    Refresh,
}

/// Room sidebar: tabs per room kind plus the room list with previews.
pub fn render(ui: &mut egui::Ui, chat: &ChatState) -> Option<RoomListAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        for tab in [RoomType::Group, RoomType::Direct, RoomType::Ai] {
            if ui
                .selectable_label(chat.active_tab == tab, tab.as_str())
                .clicked()
                && chat.active_tab != tab
            {
                action = Some(RoomListAction::SwitchTab(tab));
            }
        }
    });
    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("New").clicked() {
            action = Some(RoomListAction::NewRoom);
        }
        if ui.button("Refresh").clicked() {
            action = Some(RoomListAction::Refresh);
        }
    });
    ui.separator();

    if chat.rooms_loading {
        ui.weak("Loading rooms...");
        return action;
    }
    if chat.rooms.is_empty() {
        ui.weak("No rooms yet");
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for room in &chat.rooms {
            let active = chat.session.room_id() == Some(room.id.as_str());
            let response = ui.selectable_label(active, &room.title);
            if let Some(preview) = chat.preview_for(room) {
                ui.weak(truncate(preview, 32));
            }
            ui.separator();
            if response.clicked() && !active {
                action = Some(RoomListAction::Open(room.clone()));
            }
        }
    });

    action
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}…")
}
