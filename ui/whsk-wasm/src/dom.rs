//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add a
//! field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nl) = document().query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

/// Only writes when the value differs, so typing does not lose the caret.
pub fn sync_input_value(el: &HtmlInputElement, val: &str) {
    if el.value() != val {
        el.set_value(val);
    }
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_hidden(el: &Element, hidden: bool) {
    toggle_class(el, "hidden", hidden);
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

// ── Elements struct ──

/// All DOM element references used by the swap page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Header
    pub app_title: Element,
    pub switch_network_btn: HtmlElement,
    pub network_badge: Element,
    pub account_wrap: Element,
    pub connect_btn: HtmlElement,
    pub disconnect_popup: Element,
    pub disconnect_btn: HtmlElement,

    // Swap card
    pub heading_from: Element,
    pub heading_to: Element,
    pub top_balance: Element,
    pub top_max_btn: HtmlElement,
    pub top_amount: HtmlInputElement,
    pub direction_btn: HtmlElement,
    pub bottom_balance: Element,
    pub bottom_max_btn: HtmlElement,
    pub bottom_amount: HtmlInputElement,
    pub swap_btn: HtmlElement,
    pub swap_label: Element,
    pub swap_spinner: Element,

    // Operation overlay
    pub message_badge: HtmlElement,
    pub message_count: Element,
    pub message_list: Element,

    // FAQ
    pub faq_heading: Element,
    pub faq_list: Element,

    // Every <img class="hsk-logo">
    pub logos: Vec<HtmlImageElement>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            app_title: get_el!("appTitle"),
            switch_network_btn: get_html!("switchNetworkBtn"),
            network_badge: get_el!("networkBadge"),
            account_wrap: get_el!("accountWrap"),
            connect_btn: get_html!("connectBtn"),
            disconnect_popup: get_el!("disconnectPopup"),
            disconnect_btn: get_html!("disconnectBtn"),

            heading_from: get_el!("headingFrom"),
            heading_to: get_el!("headingTo"),
            top_balance: get_el!("topBalance"),
            top_max_btn: get_html!("topMaxBtn"),
            top_amount: get_input!("topAmount"),
            direction_btn: get_html!("directionBtn"),
            bottom_balance: get_el!("bottomBalance"),
            bottom_max_btn: get_html!("bottomMaxBtn"),
            bottom_amount: get_input!("bottomAmount"),
            swap_btn: get_html!("swapBtn"),
            swap_label: get_el!("swapLabel"),
            swap_spinner: get_el!("swapSpinner"),

            message_badge: get_html!("messageBadge"),
            message_count: get_el!("messageCount"),
            message_list: get_el!("messageList"),

            faq_heading: get_el!("faqHeading"),
            faq_list: get_el!("faqList"),

            logos: query_all("img.hsk-logo")
                .into_iter()
                .filter_map(|e| e.dyn_into::<HtmlImageElement>().ok())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b a="1">'x' & y</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&#39;x&#39; &amp; y&lt;/b&gt;"
        );
        assert_eq!(escape_html("user rejected"), "user rejected");
    }
}
