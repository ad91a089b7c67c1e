//! Swap card rendering from the `SwapForm` in state.

use whsk_core::SwapForm;

use crate::dom::{self, Elements};
use crate::state;

pub fn top_placeholder(form: &SwapForm) -> String {
    format!("Enter {} amount", form.top_token())
}

pub fn bottom_placeholder(form: &SwapForm) -> String {
    format!("Receive {}", form.bottom_token())
}

pub fn balance_line(balance: &str, token: impl std::fmt::Display) -> String {
    format!("Balance: {balance} {token}")
}

pub fn render(els: &Elements) {
    let connected = state::is_connected();
    state::with(|s| {
        let form = &s.form;
        dom::set_text(&els.heading_from, form.top_token().as_str());
        dom::set_text(&els.heading_to, form.bottom_token().as_str());

        dom::set_text(&els.top_balance, &balance_line(form.top_balance(), form.top_token()));
        dom::set_text(&els.bottom_balance, &balance_line(form.bottom_balance(), form.bottom_token()));
        dom::sync_input_value(&els.top_amount, form.top_amount());
        dom::sync_input_value(&els.bottom_amount, form.bottom_amount());
        els.top_amount.set_placeholder(&top_placeholder(form));
        els.bottom_amount.set_placeholder(&bottom_placeholder(form));

        let button = form.submit_button(connected);
        dom::set_text(&els.swap_label, button.label);
        dom::set_hidden(&els.swap_spinner, !button.busy);
        dom::toggle_class(&els.swap_btn, "disabled", button.disabled);
        if button.disabled {
            let _ = els.swap_btn.set_attribute("disabled", "");
        } else {
            let _ = els.swap_btn.remove_attribute("disabled");
        }
    });
}
