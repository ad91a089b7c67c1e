//! EIP-1193 provider over the injected `window.ethereum` object.

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::Serializer;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use whsk_provider::{EventSubscription, Provider, ProviderError, ProviderEvent, event_channel};

use crate::dom;

const ACCOUNTS_CHANGED: &str = "accountsChanged";
const CHAIN_CHANGED: &str = "chainChanged";

pub struct BrowserProvider {
    ethereum: Object,
}

impl BrowserProvider {
    /// The injected provider, if a wallet extension is installed.
    pub fn detect() -> Option<Self> {
        let ethereum = Reflect::get(&dom::window(), &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        ethereum.dyn_into::<Object>().ok().map(|ethereum| Self { ethereum })
    }

    fn method(&self, name: &str) -> Result<Function, ProviderError> {
        Reflect::get(&self.ethereum, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ProviderError::rpc(format!("provider has no {name}()")))
    }
}

/// Map a thrown JS value (usually `{ code, message }`) to a provider error.
fn js_error(err: JsValue) -> ProviderError {
    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|c| c.as_f64()).map(|c| c as i64);
    let message = field("message")
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    ProviderError::Rpc { code, message }
}

#[async_trait(?Send)]
impl Provider for BrowserProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = Object::new();
        let params = params
            .serialize(&Serializer::json_compatible())
            .map_err(|e| ProviderError::invalid(method, e.to_string()))?;
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method)).map_err(js_error)?;
        Reflect::set(&args, &JsValue::from_str("params"), &params).map_err(js_error)?;

        debug!(method, "provider request");
        let promise: Promise = self
            .method("request")?
            .call1(&self.ethereum, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ProviderError::invalid(method, "request() did not return a promise"))?;
        let result = JsFuture::from(promise).await.map_err(js_error)?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|e| ProviderError::invalid(method, e.to_string()))
    }

    fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        let on = self.method("on")?;
        let remove = self.method("removeListener")?;
        let (tx, rx) = event_channel();

        let accounts_tx = tx.clone();
        let on_accounts = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            forward(&accounts_tx, payload, ProviderEvent::accounts_changed);
        });
        let on_chain = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            forward(&tx, payload, ProviderEvent::chain_changed);
        });

        let listener_for = |event: &str| {
            if event == ACCOUNTS_CHANGED { &on_accounts } else { &on_chain }
        };
        // A listener left registered after a failed attach would outlive its closure.
        attach_all(
            &[ACCOUNTS_CHANGED, CHAIN_CHANGED],
            |event| {
                on.call2(&self.ethereum, &JsValue::from_str(event), listener_for(event).as_ref())
                    .map(drop)
                    .map_err(js_error)
            },
            |event| detach(&self.ethereum, &remove, event, listener_for(event)),
        )?;
        debug!("provider listeners attached");

        let ethereum = self.ethereum.clone();
        Ok(EventSubscription::new(rx, move || {
            detach(&ethereum, &remove, ACCOUNTS_CHANGED, &on_accounts);
            detach(&ethereum, &remove, CHAIN_CHANGED, &on_chain);
            debug!("provider listeners removed");
        }))
    }
}

/// Attach `events` in order. When one fails, the ones already attached are
/// detached (last first) and the error is returned.
fn attach_all<E>(
    events: &[&str],
    mut attach: impl FnMut(&str) -> Result<(), E>,
    mut detach: impl FnMut(&str),
) -> Result<(), E> {
    for (i, &event) in events.iter().enumerate() {
        if let Err(err) = attach(event) {
            events[..i].iter().rev().for_each(|&attached| detach(attached));
            return Err(err);
        }
    }
    Ok(())
}

fn detach(ethereum: &Object, remove: &Function, event: &str, listener: &Closure<dyn FnMut(JsValue)>) {
    if let Err(err) = remove.call2(ethereum, &JsValue::from_str(event), listener.as_ref()) {
        warn!(event, "removeListener failed: {}", js_error(err));
    }
}

fn forward(tx: &UnboundedSender<ProviderEvent>, payload: JsValue, decode: fn(&Value) -> Option<ProviderEvent>) {
    let payload: Value = match serde_wasm_bindgen::from_value(payload) {
        Ok(v) => v,
        Err(err) => {
            warn!("undecodable provider event: {err}");
            return;
        }
    };
    if let Some(event) = decode(&payload) {
        let _ = tx.unbounded_send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn failed_attach_detaches_earlier_listeners() {
        let log = RefCell::new(Vec::new());
        let result = attach_all(
            &[ACCOUNTS_CHANGED, CHAIN_CHANGED],
            |event| {
                log.borrow_mut().push(format!("on {event}"));
                if event == CHAIN_CHANGED { Err("on() threw") } else { Ok(()) }
            },
            |event| log.borrow_mut().push(format!("off {event}")),
        );
        assert_eq!(result, Err("on() threw"));
        assert_eq!(
            log.into_inner(),
            vec!["on accountsChanged", "on chainChanged", "off accountsChanged"]
        );
    }

    #[test]
    fn successful_attach_detaches_nothing() {
        let detached = RefCell::new(0);
        let result: Result<(), ()> = attach_all(
            &[ACCOUNTS_CHANGED, CHAIN_CHANGED],
            |_| Ok(()),
            |_| *detached.borrow_mut() += 1,
        );
        assert_eq!(result, Ok(()));
        assert_eq!(detached.into_inner(), 0);
    }
}
