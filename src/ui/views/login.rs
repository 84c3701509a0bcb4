use eframe::egui;

use crate::ui::state::LoginState;

pub enum LoginAction {
    Login { user_name: String, password: String },
    Signup { user_name: String, password: String, name: String },
}

pub fn render(ui: &mut egui::Ui, state: &mut LoginState) -> Option<LoginAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("FinMate");
        ui.add_space(20.0);

        ui.group(|ui| {
            ui.set_max_width(320.0);

            ui.label("Username");
            ui.text_edit_singleline(&mut state.user_name);
            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut state.password).password(true));
            if state.signup_mode {
                ui.label("Display name");
                ui.text_edit_singleline(&mut state.name);
            }

            if let Some(error) = &state.error {
                ui.colored_label(egui::Color32::RED, error);
            }

            ui.add_space(8.0);
            ui.add_enabled_ui(!state.busy, |ui| {
                ui.horizontal(|ui| {
                    let label = if state.signup_mode { "Sign up" } else { "Sign in" };
                    if ui.button(label).clicked() && !state.user_name.is_empty() {
                        state.busy = true;
                        state.error = None;
                        action = Some(if state.signup_mode {
                            LoginAction::Signup {
                                user_name: state.user_name.clone(),
                                password: state.password.clone(),
                                name: state.name.clone(),
                            }
                        } else {
                            LoginAction::Login {
                                user_name: state.user_name.clone(),
                                password: state.password.clone(),
                            }
                        });
                    }
                    let toggle = if state.signup_mode {
                        "Have an account? Sign in"
                    } else {
                        "New here? Sign up"
                    };
                    if ui.small_button(toggle).clicked() {
                        state.signup_mode = !state.signup_mode;
                        state.error = None;
                    }
                });
            });
            if state.busy {
                ui.weak("Working...");
            }
        });
    });

    action
}
