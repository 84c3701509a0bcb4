use eframe::egui;

use crate::ui::state::AccountsState;

pub enum AccountsAction {
    Refresh,
    Link { organization: String, bank_id: String },
}

pub fn render(ui: &mut egui::Ui, state: &mut AccountsState) -> Option<AccountsAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Linked accounts");
        if ui.button("Refresh").clicked() {
            action = Some(AccountsAction::Refresh);
        }
    });
    ui.separator();

    ui.collapsing("Link a bank account", |ui| {
        ui.label("Institution code");
        ui.text_edit_singleline(&mut state.organization);
        ui.label("Bank-side account id");
        ui.text_edit_singleline(&mut state.bank_id);
        if ui.button("Link").clicked()
            && !state.organization.trim().is_empty()
            && !state.bank_id.trim().is_empty()
        {
            action = Some(AccountsAction::Link {
                organization: state.organization.trim().to_string(),
                bank_id: state.bank_id.trim().to_string(),
            });
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        if state.accounts.is_empty() {
            ui.weak("No accounts linked");
        }
        for account in &state.accounts {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(account.account_number.as_deref().unwrap_or("(account)"));
                    ui.weak(account.organization.as_deref().unwrap_or(""));
                });
                if let Some(balance) = account.balance {
                    ui.label(format!("{balance} KRW"));
                }
                if account.is_transaction_sync == Some(true) {
                    ui.weak("syncing transactions");
                }
            });
        }

        if !state.transactions.is_empty() {
            ui.separator();
            ui.label("Recent transactions");
            for tran in &state.transactions {
                ui.horizontal(|ui| {
                    let amount = tran.amount.unwrap_or_default();
                    ui.label(format!("{amount}"));
                    ui.label(tran.description.as_deref().unwrap_or(""));
                    if let Some(at) = &tran.occurred_at {
                        ui.weak(at.date_label());
                    }
                });
            }
        }
    });

    action
}
