use eframe::egui;

use crate::ui::state::ProductsState;

pub enum ProductsAction {
    Refresh,
    Buy { product_name: String, amount: i64 },
    ConfirmPayment { payment_key: String, order_id: String, amount: i64 },
    CancelPayment { order_id: String },
    CreateProduct { name: String, price: i64, description: String },
}

/// Consultation products: browse and reserve as a user, publish as an
/// advisor. Payment settles through a hosted checkout; the payment key is
/// pasted back here to confirm.
pub fn render(
    ui: &mut egui::Ui,
    state: &mut ProductsState,
    is_advisor: bool,
) -> Option<ProductsAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Consultations");
        if ui.button("Refresh").clicked() {
            action = Some(ProductsAction::Refresh);
        }
    });
    ui.separator();

    if let Some(pending) = &state.pending_payment {
        ui.group(|ui| {
            ui.strong("Payment in progress");
            ui.label(format!("Order {} · {} KRW", pending.order_id, pending.amount));
            if let Some(url) = &pending.checkout_url {
                ui.hyperlink(url);
            }
            ui.label("Payment key from checkout:");
            ui.text_edit_singleline(&mut state.payment_key_input);
            ui.horizontal(|ui| {
                if ui.button("Confirm").clicked() && !state.payment_key_input.is_empty() {
                    action = Some(ProductsAction::ConfirmPayment {
                        payment_key: state.payment_key_input.clone(),
                        order_id: pending.order_id.clone(),
                        amount: pending.amount,
                    });
                }
                if ui.button("Cancel order").clicked() {
                    action = Some(ProductsAction::CancelPayment {
                        order_id: pending.order_id.clone(),
                    });
                }
            });
        });
        ui.separator();
    }

    if is_advisor {
        ui.collapsing("Publish a product", |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut state.new_name);
            ui.label("Price (KRW)");
            ui.text_edit_singleline(&mut state.new_price);
            ui.label("Description");
            ui.text_edit_multiline(&mut state.new_description);
            if ui.button("Publish").clicked() {
                if let Ok(price) = state.new_price.trim().parse::<i64>() {
                    action = Some(ProductsAction::CreateProduct {
                        name: state.new_name.trim().to_string(),
                        price,
                        description: state.new_description.clone(),
                    });
                    state.new_name.clear();
                    state.new_price.clear();
                    state.new_description.clear();
                }
            }
        });
        ui.separator();
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        if state.products.is_empty() {
            ui.weak("No products on offer");
        }
        for product in &state.products {
            ui.group(|ui| {
                let name = product.product_name.as_deref().unwrap_or("(unnamed)");
                ui.strong(name);
                if let Some(advisor) = &product.advisor_name {
                    ui.weak(format!("by {advisor}"));
                }
                if let Some(description) = &product.description {
                    ui.label(description);
                }
                let price = product.price.unwrap_or_default();
                ui.horizontal(|ui| {
                    ui.label(format!("{price} KRW"));
                    if ui.button("Reserve").clicked() {
                        action = Some(ProductsAction::Buy {
                            product_name: name.to_string(),
                            amount: price,
                        });
                    }
                });
            });
        }

        ui.separator();
        ui.label("My reservations");
        if state.my_reservations.is_empty() {
            ui.weak("None yet");
        }
        for reservation in &state.my_reservations {
            ui.horizontal(|ui| {
                ui.label(reservation.product_name.as_deref().unwrap_or("(product)"));
                ui.weak(reservation.status.as_deref().unwrap_or(""));
            });
        }
    });

    action
}
