//! `HostDom` over the live browser document (web-sys)

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, Window};

use crate::dom::{CaptureHandler, ClickDisposition, ClickHandler, HostDom, Selector, Task};
use crate::error::{PluginError, Result};
use crate::log;

pub struct WebDom {
    window: Window,
    document: Document,
    /// JS functions built for click handlers, reused when the same handler
    /// is attached to a fresh element
    listeners: RefCell<Vec<(ClickHandler, Closure<dyn FnMut(Event)>)>>,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(PluginError::MissingDocument("window"))?;
        let document = window
            .document()
            .ok_or(PluginError::MissingDocument("document"))?;
        Ok(Self {
            window,
            document,
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn js_err(context: &str, err: JsValue) -> PluginError {
    PluginError::Dom(format!("{}: {:?}", context, err))
}

impl HostDom for WebDom {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn value(&self, node: &Element) -> Option<String> {
        node.dyn_ref::<HtmlInputElement>().map(|input| input.value())
    }

    fn set_value(&self, node: &Element, value: &str) -> Result<()> {
        let input = node
            .dyn_ref::<HtmlInputElement>()
            .ok_or_else(|| PluginError::Dom(format!("<{}> is not an input", self.tag_name(node))))?;
        input.set_value(value);
        Ok(())
    }

    fn dispatch_bubbling(&self, node: &Element, event_type: &str) -> Result<()> {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict(event_type, &init)
            .map_err(|e| js_err("failed to create event", e))?;
        node.dispatch_event(&event)
            .map_err(|e| js_err("failed to dispatch event", e))?;
        Ok(())
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| js_err("failed to create element", e))
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<()> {
        node.set_attribute(name, value)
            .map_err(|e| js_err("failed to set attribute", e))
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| js_err("failed to append element", e))
    }

    fn on_click(&self, node: &Element, handler: ClickHandler) -> Result<()> {
        let mut listeners = self.listeners.borrow_mut();
        let existing = listeners
            .iter()
            .position(|(known, _)| std::ptr::addr_eq(Rc::as_ptr(known), Rc::as_ptr(&handler)));
        let index = match existing {
            Some(index) => index,
            None => {
                let run = handler.clone();
                let cb = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| run()));
                listeners.push((handler, cb));
                listeners.len() - 1
            }
        };
        node.add_event_listener_with_callback("click", listeners[index].1.as_ref().unchecked_ref())
            .map_err(|e| js_err("failed to add click listener", e))
    }

    fn on_capture_click(&self, node: &Element, handler: CaptureHandler) -> Result<()> {
        let cb = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            if handler() == ClickDisposition::Block {
                e.prevent_default();
                e.stop_immediate_propagation();
            }
        }));
        node.add_event_listener_with_callback_and_bool("click", cb.as_ref().unchecked_ref(), true)
            .map_err(|e| js_err("failed to add capture listener", e))?;
        cb.forget();
        Ok(())
    }

    fn click(&self, node: &Element) {
        match node.dyn_ref::<HtmlElement>() {
            Some(element) => element.click(),
            None => log::warn(&format!("<{}> cannot be clicked", self.tag_name(node))),
        }
    }

    fn schedule(&self, delay_ms: u32, task: Task) {
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            task();
        });
    }

    fn alert(&self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            log::error(message);
        }
    }

    fn query_all(&self, scope: &Element, selector: &Selector<'_>) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(&selector.css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_first(&self, scope: &Element, selector: &Selector<'_>) -> Option<Element> {
        scope.query_selector(&selector.css()).ok().flatten()
    }
}
