//! Header: title, network badge and the connect / disconnect control.

use whsk_core::Session;
use whsk_core::content::APP_TITLE;
use whsk_types::ChainId;

use crate::dom::{self, Elements};
use crate::state::{self, Wallet};

/// What the network slot of the header shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkBadge {
    Hidden,
    Logo,
    SwitchButton,
}

impl NetworkBadge {
    pub fn new(connected: bool, on_target_chain: bool) -> Self {
        match (connected, on_target_chain) {
            (false, _) => NetworkBadge::Hidden,
            (true, true) => NetworkBadge::Logo,
            (true, false) => NetworkBadge::SwitchButton,
        }
    }

    pub fn for_wallet(wallet: &Wallet) -> Self {
        Self::new(wallet.session().is_connected(), wallet.is_on_target_chain())
    }
}

pub fn switch_label(target: ChainId) -> String {
    format!("Switch to {target}")
}

pub fn render(els: &Elements) {
    let (session, badge, target) = state::with(|s| match &s.wallet {
        Some(wallet) => (wallet.session(), NetworkBadge::for_wallet(wallet), wallet.target_chain()),
        None => (Session::default(), NetworkBadge::Hidden, s.config.target_chain()),
    });

    dom::set_text(&els.app_title, APP_TITLE);

    dom::set_text(&els.switch_network_btn, &switch_label(target));
    dom::set_hidden(&els.switch_network_btn, badge != NetworkBadge::SwitchButton);
    dom::set_hidden(&els.network_badge, badge != NetworkBadge::Logo);

    match &session.account {
        Some(account) => {
            dom::set_text(&els.connect_btn, &account.short());
            dom::add_class(&els.account_wrap, "connected");
        }
        None => {
            dom::set_text(&els.connect_btn, "Connect Wallet");
            dom::remove_class(&els.account_wrap, "connected");
            show_disconnect(els, false);
        }
    }
}

/// Reveal the disconnect popup; only ever shown while connected.
pub fn show_disconnect(els: &Elements, show: bool) {
    dom::set_hidden(&els.disconnect_popup, !(show && state::is_connected()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_follows_connection_and_chain() {
        assert_eq!(NetworkBadge::new(false, false), NetworkBadge::Hidden);
        assert_eq!(NetworkBadge::new(false, true), NetworkBadge::Hidden);
        assert_eq!(NetworkBadge::new(true, true), NetworkBadge::Logo);
        assert_eq!(NetworkBadge::new(true, false), NetworkBadge::SwitchButton);
        assert_eq!(switch_label(ChainId(133)), "Switch to 133");
    }
}
