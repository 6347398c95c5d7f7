//! In-memory host document for native tests.
//!
//! Nodes live in an arena and are addressed by index. Detached nodes stay in
//! the arena but are invisible to id lookups, like a garbage DOM subtree.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{CaptureHandler, ClickDisposition, ClickHandler, HostDom, Task};
use crate::error::{PluginError, Result};

pub type NodeId = usize;

/// Host-page listener for dispatched events; receives the event type
pub type EventListener = Rc<dyn Fn(&str)>;

const ROOT: NodeId = 0;
const HEAD: NodeId = 1;
const BODY: NodeId = 2;

#[derive(Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    handlers: Vec<ClickHandler>,
    capture: Vec<CaptureHandler>,
    events: Vec<String>,
    listeners: Vec<EventListener>,
    /// Clicks that reached the host's own handling
    activations: u32,
}

pub struct FakeDom {
    nodes: RefCell<Vec<NodeData>>,
    alerts: RefCell<Vec<String>>,
    timers: RefCell<Vec<(u32, Task)>>,
    /// `children` calls, i.e. how much tree walking callers did
    child_reads: Cell<usize>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    pub fn new() -> Self {
        let dom = Self {
            nodes: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            child_reads: Cell::new(0),
        };
        dom.alloc("html");
        dom.alloc("head");
        dom.alloc("body");
        dom.attach(ROOT, HEAD);
        dom.attach(ROOT, BODY);
        dom
    }

    pub fn body_id(&self) -> NodeId {
        BODY
    }

    fn alloc(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let value = matches!(tag, "input" | "textarea" | "select").then(String::new);
        nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            value,
            ..NodeData::default()
        });
        nodes.len() - 1
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[parent].children.push(child);
        nodes[child].parent = Some(parent);
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node].parent.take() {
            nodes[parent].children.retain(|c| *c != node);
        }
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ROOT {
                return true;
            }
            current = nodes[id].parent;
        }
        false
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    /// Append a new element under `parent`
    pub fn el(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.alloc(tag);
        {
            let mut nodes = self.nodes.borrow_mut();
            for (name, value) in attrs {
                nodes[node].attrs.insert(name.to_string(), value.to_string());
            }
        }
        self.attach(parent, node);
        node
    }

    /// Append a new element with text content
    pub fn text_el(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let node = self.el(parent, tag, attrs);
        self.nodes.borrow_mut()[node].text = text.to_string();
        node
    }

    /// Host-side removal, e.g. SPA navigation tearing a form down
    pub fn remove(&self, node: NodeId) {
        self.detach(node);
    }

    pub fn set_host_value(&self, node: NodeId, value: &str) {
        self.nodes.borrow_mut()[node].value = Some(value.to_string());
    }

    /// Host listener on `node`, reached by events bubbling from below
    pub fn listen(&self, node: NodeId, listener: EventListener) {
        self.nodes.borrow_mut()[node].listeners.push(listener);
    }

    pub fn set_host_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Connected elements carrying `id`
    pub fn count_id(&self, id: &str) -> usize {
        let nodes = self.nodes.borrow();
        (0..nodes.len())
            .filter(|n| nodes[*n].attrs.get("id").map(String::as_str) == Some(id))
            .filter(|n| self.is_connected(*n))
            .count()
    }

    /// Events dispatched on `node`, in order
    pub fn events(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node].events.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node].parent
    }

    /// Clicks on `node` no capturing listener blocked
    pub fn activations(&self, node: NodeId) -> u32 {
        self.nodes.borrow()[node].activations
    }

    /// Tree reads since the last call
    pub fn take_child_reads(&self) -> usize {
        self.child_reads.replace(0)
    }

    pub fn pending_timers(&self) -> Vec<u32> {
        self.timers.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    /// Fire every scheduled task, shortest delay first, including tasks
    /// scheduled while running. Returns how many ran.
    pub fn run_timers(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let index = (0..timers.len()).min_by_key(|i| timers[*i].0);
                index.map(|i| timers.remove(i))
            };
            let Some((_, task)) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl HostDom for FakeDom {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn head(&self) -> Option<NodeId> {
        Some(HEAD)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        // indexed lookup, like the browser's
        let candidates: Vec<NodeId> = {
            let nodes = self.nodes.borrow();
            (0..nodes.len())
                .filter(|n| nodes[*n].attrs.get("id").map(String::as_str) == Some(id))
                .collect()
        };
        candidates.into_iter().find(|n| self.is_connected(*n))
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[*node].parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.child_reads.set(self.child_reads.get() + 1);
        self.nodes.borrow()[*node].children.clone()
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes.borrow()[*node].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[*node].attrs.get(name).cloned()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = self.nodes.borrow()[*node].text.clone();
        let children = self.nodes.borrow()[*node].children.clone();
        for child in children {
            text.push_str(&self.text_content(&child));
        }
        text
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        self.nodes.borrow()[*node].value.clone()
    }

    fn set_value(&self, node: &NodeId, value: &str) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[*node];
        if data.value.is_none() {
            return Err(PluginError::Dom(format!("<{}> has no value", data.tag)));
        }
        data.value = Some(value.to_string());
        Ok(())
    }

    fn dispatch_bubbling(&self, node: &NodeId, event_type: &str) -> Result<()> {
        self.nodes.borrow_mut()[*node].events.push(event_type.to_string());
        // target first, then each ancestor; listeners run unborrowed
        let mut current = Some(*node);
        while let Some(id) = current {
            let (listeners, parent) = {
                let nodes = self.nodes.borrow();
                (nodes[id].listeners.clone(), nodes[id].parent)
            };
            for listener in listeners {
                listener(event_type);
            }
            current = parent;
        }
        Ok(())
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        Ok(self.alloc(tag))
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        self.set_host_attribute(*node, name, value);
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.nodes.borrow_mut()[*node].text = text.to_string();
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.attach(*parent, *child);
        Ok(())
    }

    fn on_click(&self, node: &NodeId, handler: ClickHandler) -> Result<()> {
        self.nodes.borrow_mut()[*node].handlers.push(handler);
        Ok(())
    }

    fn on_capture_click(&self, node: &NodeId, handler: CaptureHandler) -> Result<()> {
        self.nodes.borrow_mut()[*node].capture.push(handler);
        Ok(())
    }

    fn click(&self, node: &NodeId) {
        // Handlers may re-enter the document, so run them unborrowed
        let capture = self.nodes.borrow()[*node].capture.clone();
        for handler in capture {
            if handler() == ClickDisposition::Block {
                return;
            }
        }
        self.nodes.borrow_mut()[*node].activations += 1;
        let handlers = self.nodes.borrow()[*node].handlers.clone();
        for handler in handlers {
            handler();
        }
    }

    fn schedule(&self, delay_ms: u32, task: Task) {
        self.timers.borrow_mut().push((delay_ms, task));
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

// =============================================================================
// Host Page Fixtures
// =============================================================================

/// Handles into a fixture settings form
pub struct EditorFixture {
    pub panel: NodeId,
    pub group: NodeId,
    pub inner: NodeId,
    pub cover: NodeId,
    pub publish: NodeId,
}

/// Settings panel shaped like the host editor: a form group holding the
/// labelled cover input, and a publish button in the panel footer.
pub fn editor_page(dom: &FakeDom) -> EditorFixture {
    let panel = dom.el(dom.body_id(), "div", &[("class", "modal-wrapper")]);
    let form = dom.el(panel, "form", &[]);
    let group = dom.el(form, "div", &[("class", "formkit-outer"), ("data-type", "text")]);
    dom.text_el(group, "label", &[("for", "input_cover"), ("class", "formkit-label")], "封面图");
    let inner = dom.el(group, "div", &[("class", "formkit-inner")]);
    let cover = dom.el(
        inner,
        "input",
        &[("id", "input_cover"), ("name", "cover"), ("type", "text")],
    );
    let footer = dom.el(panel, "div", &[("class", "modal-footer")]);
    let publish = dom.el(footer, "button", &[("type", "button")]);
    dom.text_el(publish, "span", &[], "发布");
    EditorFixture {
        panel,
        group,
        inner,
        cover,
        publish,
    }
}
