//! Host document abstraction
//!
//! `HostDom` is the narrow slice of the DOM the script needs. `WebDom`
//! implements it over web-sys in the browser; tests use an in-memory
//! document. Node handles are cheap clones that must not outlive one
//! reaction: the host may replace any node between two calls.

use std::rc::Rc;

use crate::error::Result;

/// Handler attached to an injected control
pub type ClickHandler = Rc<dyn Fn()>;

/// Capturing listener on a host control; decides whether the click goes on
pub type CaptureHandler = Rc<dyn Fn() -> ClickDisposition>;

/// Deferred continuation run by the host event loop
pub type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Leave the event alone
    Allow,
    /// Prevent the default action and stop every later listener,
    /// including other capturing ones
    Block,
}

/// The handful of selector shapes the script queries with. The browser
/// answers them natively through `css`; other hosts walk the tree with
/// `matches`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `tag`
    Tag(&'a str),
    /// `.a, .b`: elements carrying any of the classes
    AnyClass(&'a [String]),
    /// `tag[name="value"]`
    Attribute {
        tag: &'a str,
        name: &'a str,
        value: &'a str,
    },
}

impl Selector<'_> {
    pub fn css(&self) -> String {
        match self {
            Selector::Tag(tag) => css_ident(tag),
            Selector::AnyClass(classes) => classes
                .iter()
                .map(|class| format!(".{}", css_ident(class)))
                .collect::<Vec<_>>()
                .join(", "),
            Selector::Attribute { tag, name, value } => {
                format!("{}[{}={}]", css_ident(tag), css_ident(name), css_string(value))
            }
        }
    }

    pub fn matches<D: HostDom + ?Sized>(&self, dom: &D, node: &D::Node) -> bool {
        match self {
            Selector::Tag(tag) => dom.tag_name(node) == *tag,
            Selector::AnyClass(classes) => classes.iter().any(|c| dom.has_class(node, c)),
            Selector::Attribute { tag, name, value } => {
                dom.tag_name(node) == *tag && dom.attribute(node, name).as_deref() == Some(*value)
            }
        }
    }
}

/// Escape an identifier (tag, attribute or class name)
fn css_ident(ident: &str) -> String {
    let mut escaped = String::with_capacity(ident.len());
    for c in ident.chars() {
        if !(c.is_alphanumeric() || c == '-' || c == '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Quote a value for use inside an attribute selector
fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

pub trait HostDom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn body(&self) -> Option<Self::Node>;
    fn head(&self) -> Option<Self::Node>;
    /// Lookup over the connected document only
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Element children in document order
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    /// Lower-case tag name
    fn tag_name(&self, node: &Self::Node) -> String;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn text_content(&self, node: &Self::Node) -> String;
    /// Current value of a form control, `None` for anything else
    fn value(&self, node: &Self::Node) -> Option<String>;
    fn set_value(&self, node: &Self::Node, value: &str) -> Result<()>;
    /// Dispatch a bubbling `Event` of the given type on the node
    fn dispatch_bubbling(&self, node: &Self::Node, event_type: &str) -> Result<()>;
    fn create_element(&self, tag: &str) -> Result<Self::Node>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<()>;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
    fn on_click(&self, node: &Self::Node, handler: ClickHandler) -> Result<()>;
    /// Register a listener that runs in the capture phase, before the
    /// host's own handlers on the same control
    fn on_capture_click(&self, node: &Self::Node, handler: CaptureHandler) -> Result<()>;
    /// Programmatic activation, dispatched like a real click
    fn click(&self, node: &Self::Node);
    /// Run `task` after `delay_ms` on the event loop; never blocks
    fn schedule(&self, delay_ms: u32, task: Task);
    /// Blocking user-facing message
    fn alert(&self, message: &str);

    /// Elements below `scope` matching `selector`, in document order
    fn query_all(&self, scope: &Self::Node, selector: &Selector<'_>) -> Vec<Self::Node> {
        find_all(self, scope, |node| selector.matches(self, node))
    }

    /// First element below `scope` matching `selector`
    fn query_first(&self, scope: &Self::Node, selector: &Selector<'_>) -> Option<Self::Node> {
        find_first(self, scope, |node| selector.matches(self, node))
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    fn is_disabled(&self, node: &Self::Node) -> bool {
        self.attribute(node, "disabled").is_some()
            || self.attribute(node, "aria-disabled").as_deref() == Some("true")
    }
}

// =============================================================================
// Tree Walks
// =============================================================================

/// Pre-order search below `scope` (the scope itself is not tested)
pub fn find_first<D, F>(dom: &D, scope: &D::Node, mut pred: F) -> Option<D::Node>
where
    D: HostDom + ?Sized,
    F: FnMut(&D::Node) -> bool,
{
    let mut stack: Vec<D::Node> = dom.children(scope).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if pred(&node) {
            return Some(node);
        }
        stack.extend(dom.children(&node).into_iter().rev());
    }
    None
}

/// All matches below `scope`, in document order
pub fn find_all<D, F>(dom: &D, scope: &D::Node, mut pred: F) -> Vec<D::Node>
where
    D: HostDom + ?Sized,
    F: FnMut(&D::Node) -> bool,
{
    let mut found = Vec::new();
    let mut stack: Vec<D::Node> = dom.children(scope).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if pred(&node) {
            found.push(node.clone());
        }
        stack.extend(dom.children(&node).into_iter().rev());
    }
    found
}

/// Nearest inclusive ancestor matching `pred`
pub fn closest<D, F>(dom: &D, node: &D::Node, mut pred: F) -> Option<D::Node>
where
    D: HostDom + ?Sized,
    F: FnMut(&D::Node) -> bool,
{
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if pred(&candidate) {
            return Some(candidate);
        }
        current = dom.parent(&candidate);
    }
    None
}

/// True when `node` is `ancestor` or lies below it
pub fn contains<D: HostDom + ?Sized>(dom: &D, ancestor: &D::Node, node: &D::Node) -> bool {
    closest(dom, node, |candidate| candidate == ancestor).is_some()
}
