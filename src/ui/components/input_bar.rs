use eframe::egui;

/// Message composer. Returns the trimmed text when the user sends; the bar
/// is disabled while the broker connection is down.
pub fn render(ui: &mut egui::Ui, input_text: &mut String, enabled: bool) -> Option<String> {
    let mut send = false;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(input_text)
                    .desired_width(ui.available_width() - 64.0)
                    .hint_text(if enabled { "Message" } else { "Reconnecting..." }),
            );
            if ui.button("Send").clicked() {
                send = true;
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send = true;
            }
        });
    });

    if send && !input_text.trim().is_empty() {
        let message = input_text.trim().to_string();
        input_text.clear();
        return Some(message);
    }

    None
}
