//! Wallet and swap operations.
//!
//! Each function is an event-handler body; wiring lives in `events.rs`.
//! State borrows are released before every `.await`.

use futures::future::{AbortHandle, Abortable};
use gloo_timers::future::TimeoutFuture;
use tracing::{debug, info, warn};
use whsk_contract::{ContractError, WrappedToken};
use whsk_core::{Balances, SessionError, SwapError, fetch_balances};
use whsk_provider::ProviderError;

use crate::dom::{self, Elements};
use crate::header;
use crate::messages;
use crate::state::{self, AppState};
use crate::swap_card;

pub fn render_all(els: &Elements) {
    header::render(els);
    swap_card::render(els);
    messages::render(els);
}

/// `eth_requestAccounts` + `eth_chainId`; alerts when no wallet is installed.
pub async fn on_connect(els: &Elements) {
    let Some(wallet) = state::wallet() else {
        return;
    };
    if wallet.session().is_connected() {
        return;
    }
    match wallet.connect().await {
        Ok(_) => {
            render_all(els);
            refresh_balances(els).await;
        }
        Err(SessionError::ProviderMissing) => {
            let _ = dom::window().alert_with_message(&SessionError::ProviderMissing.to_string());
        }
        Err(err) => warn!("failed to connect wallet: {err}"),
    }
}

pub fn on_disconnect(els: &Elements) {
    if let Some(wallet) = state::wallet() {
        wallet.disconnect();
    }
    state::with_mut(|s| s.form.set_balances(Balances::default()));
    header::show_disconnect(els, false);
    render_all(els);
}

pub async fn on_switch_network(els: &Elements) {
    let Some(wallet) = state::wallet() else {
        return;
    };
    if wallet.switch_network().await {
        info!(chain_id = %wallet.target_chain(), "network switch requested");
    }
    header::render(els);
}

/// Wrap or unwrap the top amount, then refresh balances.
pub async fn on_swap(els: &Elements) {
    let Some(wallet) = state::wallet() else {
        return;
    };
    let account = wallet.account();
    let Some(submission) = state::with_mut(|s| {
        let AppState { form, log, .. } = s;
        form.begin(account.as_ref(), log)
    }) else {
        return;
    };
    render_all(els);

    let (contract, poll_ms) = state::with(|s| (s.config.contract_address.clone(), s.config.receipt_poll_ms));
    let outcome = match wallet.provider() {
        Some(provider) => {
            let token = WrappedToken::new(provider, contract);
            submission.execute(&token, || TimeoutFuture::new(poll_ms)).await
        }
        None => Err(SwapError::from(ContractError::from(ProviderError::Missing))),
    };

    state::with_mut(|s| {
        let AppState { form, log, .. } = s;
        form.finish(log, &submission.id, outcome);
    });
    render_all(els);
    refresh_balances(els).await;
}

/// Fetch native and wrapped balances of the connected account. Without an
/// account the displayed balances reset to zero.
pub async fn refresh_balances(els: &Elements) {
    let Some(wallet) = state::wallet() else {
        return;
    };
    let (Some(provider), Some(account)) = (wallet.provider(), wallet.account()) else {
        state::with_mut(|s| s.form.set_balances(Balances::default()));
        swap_card::render(els);
        return;
    };

    let contract = state::with(|s| s.config.contract_address.clone());
    let token = WrappedToken::new(provider, contract);
    match fetch_balances(&token, &account).await {
        // The account may have changed while the calls were in flight.
        Ok(balances) if wallet.account().as_ref() == Some(&account) => {
            debug!(hsk = %balances.hsk, whsk = %balances.whsk, "balances refreshed");
            state::with_mut(|s| s.form.set_balances(balances));
        }
        Ok(_) => debug!("discarding balances of a previous account"),
        Err(err) => warn!("failed to fetch balances: {err}"),
    }
    swap_card::render(els);
}

pub fn on_dismiss(els: &Elements, id: &str) {
    if state::with_mut(|s| s.log.dismiss(id)) {
        messages::render(els);
    }
}

pub fn on_toggle_messages(els: &Elements) {
    state::with_mut(|s| s.log.toggle_expanded());
    messages::render(els);
}

/// Follow `accountsChanged` / `chainChanged` until the page is hidden.
pub fn watch_provider_events(els: &Elements) {
    let Some(wallet) = state::wallet() else {
        return;
    };
    let mut subscription = match wallet.subscribe() {
        Ok(subscription) => subscription,
        Err(err) => {
            debug!("provider events unavailable: {err}");
            return;
        }
    };

    let els = els.clone();
    let (handle, registration) = AbortHandle::new_pair();
    let task = async move {
        while let Some(event) = subscription.next().await {
            wallet.apply_event(&event);
            header::render(&els);
            refresh_balances(&els).await;
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        if Abortable::new(task, registration).await.is_err() {
            debug!("provider event loop stopped");
        }
    });
    state::set_provider_events(handle);
}
