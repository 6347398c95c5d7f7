//! Element Locator: layered heuristic search over the host document
//!
//! Each target has an ordered list of named strategies. They run in
//! priority order inside the active search scope and the first hit wins.
//! Nothing is cached: every call resolves fresh handles. All searches go
//! through `HostDom` selector queries, which the browser answers natively.

use crate::config::PluginConfig;
use crate::dom::{closest, contains, HostDom, Selector};

// =============================================================================
// Types
// =============================================================================

/// Host elements the script looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    CoverField,
    PublishControl,
    InjectionAnchor,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Target::CoverField => "cover field",
            Target::PublishControl => "publish control",
            Target::InjectionAnchor => "injection anchor",
        };
        f.write_str(name)
    }
}

/// One named attempt at finding a target inside a scope
pub struct LocatorStrategy<D: HostDom> {
    pub name: &'static str,
    pub run: fn(&D, &D::Node, &PluginConfig) -> Option<D::Node>,
}

/// A resolved element and how it was found
#[derive(Debug, Clone, PartialEq)]
pub struct Located<N> {
    pub node: N,
    pub strategy: &'static str,
    /// Found inside a bounded scope rather than the whole body
    pub scoped: bool,
}

// =============================================================================
// Cover Field Strategies
// =============================================================================

pub fn cover_strategies<D: HostDom>() -> [LocatorStrategy<D>; 3] {
    [
        LocatorStrategy {
            name: "by-attribute",
            run: cover_by_attribute::<D>,
        },
        LocatorStrategy {
            name: "by-label",
            run: cover_by_label::<D>,
        },
        LocatorStrategy {
            name: "by-form-group",
            run: cover_by_form_group::<D>,
        },
    ]
}

fn cover_by_attribute<D: HostDom>(dom: &D, scope: &D::Node, config: &PluginConfig) -> Option<D::Node> {
    let attr = config.cover.attribute.as_ref()?;
    dom.query_first(
        scope,
        &Selector::Attribute {
            tag: "input",
            name: &attr.name,
            value: &attr.value,
        },
    )
}

fn cover_by_label<D: HostDom>(dom: &D, scope: &D::Node, config: &PluginConfig) -> Option<D::Node> {
    labels(dom, scope, &config.cover.label_text)
        .into_iter()
        .filter_map(|label| dom.attribute(&label, "for"))
        .filter_map(|id| dom.element_by_id(&id))
        .find(|input| dom.tag_name(input) == "input" && contains(dom, scope, input))
}

fn cover_by_form_group<D: HostDom>(dom: &D, scope: &D::Node, config: &PluginConfig) -> Option<D::Node> {
    let groups = &config.cover.group_classes;
    labels(dom, scope, &config.cover.label_text)
        .into_iter()
        .filter_map(|label| closest(dom, &label, |n| groups.iter().any(|c| dom.has_class(n, c))))
        .find_map(|group| {
            dom.query_all(&group, &Selector::Tag("input"))
                .into_iter()
                .find(|input| is_accepted_input(dom, input, config))
        })
}

fn labels<D: HostDom>(dom: &D, scope: &D::Node, text: &str) -> Vec<D::Node> {
    dom.query_all(scope, &Selector::Tag("label"))
        .into_iter()
        .filter(|label| dom.text_content(label).trim() == text)
        .collect()
}

/// Input types a browser recognizes; anything else behaves as `text`
const INPUT_TYPES: [&str; 22] = [
    "button", "checkbox", "color", "date", "datetime-local", "email", "file", "hidden", "image",
    "month", "number", "password", "radio", "range", "reset", "search", "submit", "tel", "text",
    "time", "url", "week",
];

/// Effective type of an `<input>`: missing, empty or unknown mean `text`
pub fn input_type(raw: Option<&str>) -> String {
    let kind = raw.unwrap_or_default().trim().to_ascii_lowercase();
    if INPUT_TYPES.contains(&kind.as_str()) {
        kind
    } else {
        "text".to_string()
    }
}

fn is_accepted_input<D: HostDom>(dom: &D, node: &D::Node, config: &PluginConfig) -> bool {
    if dom.tag_name(node) != "input" {
        return false;
    }
    let kind = input_type(dom.attribute(node, "type").as_deref());
    config.cover.input_types.iter().any(|t| t.eq_ignore_ascii_case(&kind))
}

// =============================================================================
// Publish Control Strategies
// =============================================================================

pub fn publish_strategies<D: HostDom>() -> [LocatorStrategy<D>; 2] {
    [
        LocatorStrategy {
            name: "by-attribute",
            run: publish_by_attribute::<D>,
        },
        LocatorStrategy {
            name: "by-text",
            run: publish_by_text::<D>,
        },
    ]
}

fn publish_by_attribute<D: HostDom>(dom: &D, scope: &D::Node, config: &PluginConfig) -> Option<D::Node> {
    let attr = config.publish.attribute.as_ref()?;
    dom.query_first(
        scope,
        &Selector::Attribute {
            tag: &config.publish.tag,
            name: &attr.name,
            value: &attr.value,
        },
    )
    .filter(|node| !dom.is_disabled(node))
}

fn publish_by_text<D: HostDom>(dom: &D, scope: &D::Node, config: &PluginConfig) -> Option<D::Node> {
    let publish = &config.publish;
    dom.query_all(scope, &Selector::Tag(&publish.tag))
        .into_iter()
        .find(|n| dom.text_content(n).trim() == publish.text && !dom.is_disabled(n))
}

// =============================================================================
// Locator
// =============================================================================

/// Stateless search front-end over a config
pub struct Locator<'a> {
    config: &'a PluginConfig,
}

impl<'a> Locator<'a> {
    pub fn new(config: &'a PluginConfig) -> Self {
        Self { config }
    }

    /// Bounded scopes present in the document, in document order.
    /// Empty when none is open.
    pub fn scopes<D: HostDom>(&self, dom: &D) -> Vec<D::Node> {
        let Some(body) = dom.body() else {
            return Vec::new();
        };
        let classes = &self.config.scope_classes;
        if classes.is_empty() {
            return Vec::new();
        }
        dom.query_all(&body, &Selector::AnyClass(classes))
    }

    pub fn cover_field<D: HostDom>(&self, dom: &D) -> Option<Located<D::Node>> {
        self.run(dom, &cover_strategies::<D>())
    }

    pub fn publish_control<D: HostDom>(&self, dom: &D) -> Option<Located<D::Node>> {
        self.run(dom, &publish_strategies::<D>())
    }

    /// Container the trigger is appended to: the cover input's nearest
    /// wrapper with the configured class, else its parent
    pub fn injection_anchor<D: HostDom>(&self, dom: &D) -> Option<Located<D::Node>> {
        let cover = self.cover_field(dom)?;
        let class = &self.config.cover.container_class;
        let anchor = closest(dom, &cover.node, |n| dom.has_class(n, class))
            .or_else(|| dom.parent(&cover.node))?;
        Some(Located { node: anchor, ..cover })
    }

    fn run<D: HostDom>(&self, dom: &D, strategies: &[LocatorStrategy<D>]) -> Option<Located<D::Node>> {
        let scopes = self.scopes(dom);
        let scoped = !scopes.is_empty();
        let scopes = if scoped { scopes } else { vec![dom.body()?] };

        for strategy in strategies {
            for scope in &scopes {
                if let Some(node) = (strategy.run)(dom, scope, self.config) {
                    return Some(Located {
                        node,
                        strategy: strategy.name,
                        scoped,
                    });
                }
            }
        }
        None
    }
}
