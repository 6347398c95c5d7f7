//! Modal Controller: owns the dialog container and its visibility
//!
//! The dialog itself is an external component mounted into the container.
//! It learns about visibility through the registered listener and reports
//! back through `close` and `fill_cover`.

use std::rc::Rc;

use crate::config::PluginConfig;
use crate::dom::HostDom;
use crate::error::{PluginError, Result};
use crate::locator::{Locator, Target};

/// Receives every visibility transition
pub type VisibilityListener = Rc<dyn Fn(bool)>;

/// Notification events the host form layer listens for, in dispatch order
pub const NOTIFY_EVENTS: [&str; 2] = ["input", "change"];

/// A visibility change waiting for delivery. The owner of the controller
/// sends it after releasing any borrow of its own state, since the
/// listener is free to call straight back in.
#[must_use]
pub struct Notification {
    listener: Option<VisibilityListener>,
    visible: bool,
}

impl Notification {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn send(self) {
        if let Some(listener) = self.listener {
            listener(self.visible);
        }
    }
}

pub struct ModalController {
    container_id: String,
    visible: bool,
    mounted: bool,
    listener: Option<VisibilityListener>,
}

impl ModalController {
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            container_id: config.ids.modal_container.clone(),
            visible: false,
            mounted: false,
            listener: None,
        }
    }

    /// Append the dialog container to `<body>` once per document.
    /// Returns true when this call created it.
    pub fn mount<D: HostDom>(&mut self, dom: &D) -> Result<bool> {
        if dom.element_by_id(&self.container_id).is_some() {
            self.mounted = true;
            return Ok(false);
        }
        let body = dom.body().ok_or(PluginError::MissingDocument("document body"))?;
        let container = dom.create_element("div")?;
        dom.set_attribute(&container, "id", &self.container_id)?;
        dom.append_child(&body, &container)?;
        self.mounted = true;
        Ok(true)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Register the dialog. The returned notification carries the current
    /// state so the dialog starts in sync.
    pub fn set_listener(&mut self, listener: VisibilityListener) -> Notification {
        self.listener = Some(listener.clone());
        Notification {
            listener: Some(listener),
            visible: self.visible,
        }
    }

    pub fn open(&mut self) -> Option<Notification> {
        self.set_visible(true)
    }

    /// Cancel: hide without touching the host form
    pub fn close(&mut self) -> Option<Notification> {
        self.set_visible(false)
    }

    /// `None` when the visibility did not change
    pub fn set_visible(&mut self, visible: bool) -> Option<Notification> {
        if self.visible == visible {
            return None;
        }
        self.visible = visible;
        Some(Notification {
            listener: self.listener.clone(),
            visible,
        })
    }
}

/// Write a chosen image into a freshly resolved cover field.
///
/// Touches no controller state: the writes dispatch host events that may
/// call back into the script. When the field cannot be found the user is
/// told to copy the link by hand.
pub fn fill_cover<D: HostDom>(dom: &D, config: &PluginConfig, url: &str) -> Result<()> {
    let Some(cover) = Locator::new(config).cover_field(dom) else {
        dom.alert(&config.not_found_message);
        return Err(PluginError::TargetNotFound(Target::CoverField));
    };
    write_cover(dom, &cover.node, url)
}

/// Assign the value, then notify the host's reactive layer
pub fn write_cover<D: HostDom>(dom: &D, input: &D::Node, url: &str) -> Result<()> {
    dom.set_value(input, url)?;
    for event in NOTIFY_EVENTS {
        dom.dispatch_bubbling(input, event)?;
    }
    Ok(())
}
