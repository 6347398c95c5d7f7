//! Injection Controller: keeps exactly one trigger button in the document
//!
//! The button's id is the injection marker. Only its presence in the live
//! document counts; the host can destroy it along with the form at any time.

use crate::config::PluginConfig;
use crate::dom::{ClickHandler, HostDom};
use crate::error::Result;

/// Result of one injection attempt
#[derive(Debug, Clone, PartialEq)]
pub enum InjectOutcome<N> {
    /// A new trigger was appended
    Injected(N),
    /// The marker already exists; nothing changed
    AlreadyPresent,
}

pub struct InjectionController {
    marker_id: String,
    label: String,
    title: String,
    /// Insertions over the script lifetime (diagnostics only)
    injected: u32,
    /// Shared by every button this controller inserts
    handler: Option<ClickHandler>,
}

impl InjectionController {
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            marker_id: config.ids.trigger.clone(),
            label: config.trigger_label.clone(),
            title: config.trigger_title.clone(),
            injected: 0,
            handler: None,
        }
    }

    pub fn marker_id(&self) -> &str {
        &self.marker_id
    }

    pub fn injected_count(&self) -> u32 {
        self.injected
    }

    /// Whether the marker is currently in the document
    pub fn is_present<D: HostDom>(&self, dom: &D) -> bool {
        dom.element_by_id(&self.marker_id).is_some()
    }

    /// Append the trigger to `container` unless the marker exists.
    /// `handler` is built on the first insertion and reused after that, so
    /// the host can register a single listener for every re-injection.
    pub fn ensure<D, F>(&mut self, dom: &D, container: &D::Node, handler: F) -> Result<InjectOutcome<D::Node>>
    where
        D: HostDom,
        F: FnOnce() -> ClickHandler,
    {
        if self.is_present(dom) {
            return Ok(InjectOutcome::AlreadyPresent);
        }

        let button = dom.create_element("button")?;
        dom.set_attribute(&button, "id", &self.marker_id)?;
        // never submit the host form
        dom.set_attribute(&button, "type", "button")?;
        dom.set_attribute(&button, "title", &self.title)?;
        dom.set_text(&button, &self.label);
        let handler = self.handler.get_or_insert_with(handler).clone();
        dom.on_click(&button, handler)?;
        dom.append_child(container, &button)?;

        self.injected += 1;
        Ok(InjectOutcome::Injected(button))
    }
}
