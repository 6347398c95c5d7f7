//! Configuration types and defaults
//!
//! Defaults describe the Halo console post editor. Every field can be
//! overridden from `window.__AI_COVER_CONFIG__` (camelCase keys); missing
//! keys keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, Result};

/// Name of the window property holding optional overrides
pub const CONFIG_GLOBAL: &str = "__AI_COVER_CONFIG__";

// =============================================================================
// Element Specs
// =============================================================================

/// `name="value"` attribute match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMatch {
    pub name: String,
    pub value: String,
}

impl AttributeMatch {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How the cover image input is recognised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverFieldSpec {
    /// Stable attribute on the input. Default: `name="cover"`
    pub attribute: Option<AttributeMatch>,
    /// Exact label text. Default: `封面图`
    pub label_text: String,
    /// Classes marking a form-group wrapper
    pub group_classes: Vec<String>,
    /// Accepted `type` values; a missing, empty or unknown `type` counts as `text`
    pub input_types: Vec<String>,
    /// Class of the wrapper the trigger is appended to. Default: `formkit-inner`
    pub container_class: String,
}

impl Default for CoverFieldSpec {
    fn default() -> Self {
        Self {
            attribute: Some(AttributeMatch::new("name", "cover")),
            label_text: "封面图".to_string(),
            group_classes: vec![
                "formkit-outer".to_string(),
                "form-group".to_string(),
                "ant-form-item".to_string(),
            ],
            input_types: vec!["text".to_string(), "url".to_string()],
            container_class: "formkit-inner".to_string(),
        }
    }
}

/// How the publish control is recognised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublishControlSpec {
    /// Optional stable attribute, tried before the text match
    pub attribute: Option<AttributeMatch>,
    /// Exact visible text. Default: `发布`
    pub text: String,
    /// Element tag carrying the text. Default: `button`
    pub tag: String,
}

impl Default for PublishControlSpec {
    fn default() -> Self {
        Self {
            attribute: None,
            text: "发布".to_string(),
            tag: "button".to_string(),
        }
    }
}

/// Ids of everything the script inserts into the host document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    /// Trigger button; its presence is the injection marker
    pub trigger: String,
    pub styles: String,
    pub modal_container: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            trigger: "ai-cover-trigger-btn".to_string(),
            styles: "ai-cover-button-styles".to_string(),
            modal_container: "ai-cover-modal-container".to_string(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Keep an "AI" trigger next to the cover field. Default: true
    pub trigger_button: bool,
    /// Require a cover before publishing. Default: true
    pub publish_guard: bool,
    pub cover: CoverFieldSpec,
    pub publish: PublishControlSpec,
    /// Classes of a bounded search scope (open settings panel)
    pub scope_classes: Vec<String>,
    pub ids: ElementIds,
    pub trigger_label: String,
    pub trigger_title: String,
    /// Alert shown when a generated image cannot be written back
    pub not_found_message: String,
    /// Delay before re-resolving a cover field that was not rendered yet. Default: 150
    pub retry_delay_ms: u32,
    /// Delay between writing the cover and replaying publish. Default: 100
    pub replay_delay_ms: u32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            trigger_button: true,
            publish_guard: true,
            cover: CoverFieldSpec::default(),
            publish: PublishControlSpec::default(),
            scope_classes: vec!["modal-wrapper".to_string()],
            ids: ElementIds::default(),
            trigger_label: "AI".to_string(),
            trigger_title: "AI 生成封面图".to_string(),
            not_found_message: "未能找到封面输入框，请手动复制图片链接。".to_string(),
            retry_delay_ms: 150,
            replay_delay_ms: 100,
        }
    }
}

impl PluginConfig {
    /// Injection only, no publish interception
    pub fn trigger_only() -> Self {
        Self {
            publish_guard: false,
            ..Self::default()
        }
    }

    /// Publish interception only, no trigger button
    pub fn guard_only() -> Self {
        Self {
            trigger_button: false,
            ..Self::default()
        }
    }

    /// Decode overrides from a JSON string on top of the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PluginError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("ids.trigger", &self.ids.trigger),
            ("ids.styles", &self.ids.styles),
            ("ids.modalContainer", &self.ids.modal_container),
            ("cover.labelText", &self.cover.label_text),
            ("publish.text", &self.publish.text),
            ("publish.tag", &self.publish.tag),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(PluginError::InvalidConfig(format!("{} must not be empty", key)));
            }
        }
        if self.cover.input_types.is_empty() {
            return Err(PluginError::InvalidConfig(
                "cover.inputTypes must list at least one type".to_string(),
            ));
        }
        if !self.trigger_button && !self.publish_guard {
            return Err(PluginError::InvalidConfig(
                "at least one of triggerButton and publishGuard must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}
