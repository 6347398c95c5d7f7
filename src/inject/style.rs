//! Style Injector: one `<style>` element in `<head>`, inserted at most once

use crate::config::ElementIds;
use crate::dom::HostDom;
use crate::error::{PluginError, Result};

/// Stylesheet for the trigger button (animated gradient text) and the
/// modal container (kept above host overlays)
pub fn stylesheet(ids: &ElementIds) -> String {
    format!(
        r#"
@keyframes ai-cover-gradient {{
  0% {{ background-position: 0% 50%; }}
  50% {{ background-position: 100% 50%; }}
  100% {{ background-position: 0% 50%; }}
}}

#{trigger} {{
  height: 100%;
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 0 16px;
  border: none;
  border-left: 1px solid #e5e7eb;
  background-color: transparent;
  font-weight: 600;
  font-size: 1rem;
  cursor: pointer;
  transition: transform 0.2s ease;
  background-image: linear-gradient(-45deg, #a881ff, #66a6ff, #89f7fe, #e178ff);
  background-size: 200% auto;
  -webkit-background-clip: text;
  background-clip: text;
  color: transparent;
  animation: ai-cover-gradient 5s ease infinite;
}}

#{trigger}:hover {{
  transform: scale(1.05);
}}

#{modal} {{
  position: relative;
  z-index: 2000;
}}
"#,
        trigger = ids.trigger,
        modal = ids.modal_container,
    )
}

/// Insert the stylesheet unless an element with its id already exists.
/// Returns true when this call inserted it.
pub fn ensure_styles<D: HostDom>(dom: &D, ids: &ElementIds) -> Result<bool> {
    if dom.element_by_id(&ids.styles).is_some() {
        return Ok(false);
    }
    let head = dom.head().ok_or(PluginError::MissingDocument("document head"))?;
    let style = dom.create_element("style")?;
    dom.set_attribute(&style, "id", &ids.styles)?;
    dom.set_text(&style, &stylesheet(ids));
    dom.append_child(&head, &style)?;
    Ok(true)
}
