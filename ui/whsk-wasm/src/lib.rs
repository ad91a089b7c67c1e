//! WHSK swap page, WASM front end.
//!
//! Browser glue around `whsk-core`: DOM bindings, the injected EIP-1193
//! provider, `localStorage` persistence and rendering. Each concern lives in
//! its own module.

pub mod api;
pub mod dom;
pub mod events;
pub mod faq;
pub mod header;
pub mod logging;
pub mod messages;
pub mod provider;
pub mod state;
pub mod swap_card;
pub mod wallet_ops;

use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use whsk_core::SessionManager;
use whsk_storage::SessionStore;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence.
async fn init() -> Result<(), JsValue> {
    let (config, config_note) = api::load_config().await;
    logging::init(&config.log_level);
    if let Some(note) = config_note {
        info!("using default configuration: {note}");
    }

    let els = dom::Elements::bind()?;
    for logo in &els.logos {
        logo.set_src(&config.logo_url);
    }

    let provider = provider::BrowserProvider::detect();
    if provider.is_none() {
        warn!("no injected wallet provider");
    }
    let store = SessionStore::new(state::BrowserStorage, config.session_keys());
    let wallet = Rc::new(SessionManager::new(provider, store, config.target_chain()));
    let restored = wallet.restore();
    info!(account = ?restored.account, chain_id = ?restored.chain_id, "session restored");

    state::set_config(config);
    state::set_wallet(wallet.clone());

    faq::render(&els);
    wallet_ops::render_all(&els);
    events::bind_events(&els);
    wallet_ops::watch_provider_events(&els);

    // Balances only when the wallet still authorizes an account.
    if wallet.authorized_account().await.is_some() && restored.account.is_some() {
        wallet_ops::refresh_balances(&els).await;
    }

    Ok(())
}
