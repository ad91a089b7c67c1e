//! Event binding.
//!
//! Wires all UI event listeners. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, HtmlInputElement, PageTransitionEvent};

use crate::dom::Elements;
use crate::header;
use crate::state;
use crate::swap_card;
use crate::wallet_ops;

/// Attach `cb` for `event` on `target` for the lifetime of the page.
fn listen(target: &EventTarget, event: &str, cb: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(cb);
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        warn!(event, "failed to bind listener: {err:?}");
    }
    cb.forget();
}

/// Helper: attach async click handler.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        listen(&$el, "click", move |_| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        });
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        listen(&$el, "click", move |_| $handler(&els));
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Header ──
    on_click_async!(els.connect_btn, els, wallet_ops::on_connect);
    on_click!(els.disconnect_btn, els, wallet_ops::on_disconnect);
    on_click_async!(els.switch_network_btn, els, wallet_ops::on_switch_network);
    {
        let els2 = els.clone();
        listen(&els.account_wrap, "mouseenter", move |_| header::show_disconnect(&els2, true));
    }
    {
        let els2 = els.clone();
        listen(&els.account_wrap, "mouseleave", move |_| header::show_disconnect(&els2, false));
    }

    // ── Amount fields ──
    bind_amount(els, &els.top_amount, |form, value| form.set_top_amount(value));
    bind_amount(els, &els.bottom_amount, |form, value| form.set_bottom_amount(value));

    // ── Direction / Max ──
    on_click!(els.direction_btn, els, |els: &Elements| {
        state::with_mut(|s| s.form.toggle_direction());
        swap_card::render(els);
    });
    on_click!(els.top_max_btn, els, |els: &Elements| {
        state::with_mut(|s| s.form.max_top());
        swap_card::render(els);
    });
    on_click!(els.bottom_max_btn, els, |els: &Elements| {
        state::with_mut(|s| s.form.max_bottom());
        swap_card::render(els);
    });

    // ── Submit ──
    on_click_async!(els.swap_btn, els, wallet_ops::on_swap);

    // ── Operation overlay ──
    on_click!(els.message_badge, els, wallet_ops::on_toggle_messages);
    {
        let els2 = els.clone();
        listen(&els.message_list, "click", move |ev| {
            let id = ev
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-dismiss]").ok().flatten())
                .and_then(|el| el.get_attribute("data-dismiss"));
            if let Some(id) = id {
                wallet_ops::on_dismiss(&els2, &id);
            }
        });
    }

    // ── Page lifetime ──
    for kind in ["pagehide", "pageshow"] {
        let els2 = els.clone();
        listen(&crate::dom::window(), kind, move |ev| {
            let persisted = ev
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|ev| ev.persisted());
            match page_transition(kind, persisted) {
                EventLoopAction::Stop => state::stop_provider_events(),
                EventLoopAction::Restart => {
                    wallet_ops::watch_provider_events(&els2);
                    let els3 = els2.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        wallet_ops::refresh_balances(&els3).await;
                    });
                }
                EventLoopAction::Keep => {}
            }
        });
    }
}

/// What a page transition means for the provider event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventLoopAction {
    Stop,
    Restart,
    Keep,
}

/// The loop stops whenever the page is hidden and restarts when the page
/// comes back from the back-forward cache. A fresh load starts it in `init`.
fn page_transition(kind: &str, persisted: bool) -> EventLoopAction {
    match (kind, persisted) {
        ("pagehide", _) => EventLoopAction::Stop,
        ("pageshow", true) => EventLoopAction::Restart,
        _ => EventLoopAction::Keep,
    }
}

fn bind_amount(els: &Elements, input: &HtmlInputElement, apply: fn(&mut whsk_core::SwapForm, &str)) {
    let els2 = els.clone();
    let input2 = input.clone();
    listen(input, "input", move |_| {
        let value = input2.value();
        state::with_mut(|s| apply(&mut s.form, &value));
        swap_card::render(&els2);
    });
}
