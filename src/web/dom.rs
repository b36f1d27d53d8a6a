//! Small web-sys helpers: element lookup, class and text updates, button
//! semantics and a per-element "already wired" marker.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, window};

pub fn document() -> Result<Document, JsValue> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn now_ms() -> u64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
        .max(0.0) as u64
}

pub fn html_by_id(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

/// Every element matching `selector`, in document order.
pub fn html_all(doc: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = doc.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

pub fn set_text(el: Option<&Element>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    el.class_list().toggle_with_force(class, on).ok();
}

/// Mark an element as a keyboard-reachable button.
pub fn make_button(el: &Element, label: &str) {
    el.set_attribute("role", "button").ok();
    el.set_attribute("tabindex", "0").ok();
    el.set_attribute("aria-label", label).ok();
}

const BOUND_ATTR: &str = "data-wam-bound";

/// True the first time it sees `el`; marks it so later calls return false.
pub fn claim(el: &Element) -> bool {
    if el.has_attribute(BOUND_ATTR) {
        return false;
    }
    el.set_attribute(BOUND_ATTR, "").ok();
    true
}
