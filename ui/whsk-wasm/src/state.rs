//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Borrows taken through `with` / `with_mut` must never span an `.await`.

use futures::future::AbortHandle;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use whsk_core::{AppConfig, OperationLog, SessionManager, SwapForm};
use whsk_storage::{KeyValueStore, StorageError};

use crate::dom;
use crate::provider::BrowserProvider;

pub type Wallet = SessionManager<BrowserProvider, BrowserStorage>;

/// Central application state.
#[derive(Default)]
pub struct AppState {
    pub config: AppConfig,
    pub wallet: Option<Rc<Wallet>>,
    pub form: SwapForm,
    pub log: OperationLog,
    pub provider_events: Option<AbortHandle>,
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn set_config(config: AppConfig) {
    with_mut(|s| s.config = config);
}

pub fn wallet() -> Option<Rc<Wallet>> {
    with(|s| s.wallet.clone())
}

pub fn set_wallet(wallet: Rc<Wallet>) {
    with_mut(|s| s.wallet = Some(wallet));
}

pub fn is_connected() -> bool {
    with(|s| s.wallet.as_ref().is_some_and(|w| w.session().is_connected()))
}

/// Replace the provider event loop handle, aborting the previous loop.
pub fn set_provider_events(handle: AbortHandle) {
    if let Some(previous) = with_mut(|s| s.provider_events.replace(handle)) {
        previous.abort();
    }
}

pub fn stop_provider_events() {
    if let Some(handle) = with_mut(|s| s.provider_events.take()) {
        handle.abort();
    }
}

// ── localStorage ──

/// `KeyValueStore` over `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    dom::window()
        .local_storage()
        .map_err(storage_error)?
        .ok_or_else(|| StorageError("localStorage unavailable".to_owned()))
}

fn storage_error(err: JsValue) -> StorageError {
    StorageError(format!("{err:?}"))
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?.remove_item(key).map_err(storage_error)
    }
}
