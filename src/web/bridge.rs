//! Dialog bridge exported to JavaScript
//!
//! The dialog UI itself is rendered by the page into the container the
//! script mounts. It talks to the script only through these calls:
//!
//! ```javascript,ignore
//! import { onCoverDialogVisibility, useCoverImage, closeCoverDialog } from './aicover_ui';
//!
//! onCoverDialogVisibility((visible) => dialog.toggle(visible));
//! dialog.onUse = (url) => {
//!   try {
//!     useCoverImage(url);
//!   } catch (err) {
//!     console.warn(err);   // cover field is gone
//!   }
//! };
//! dialog.onClose = () => closeCoverDialog();
//! ```

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::{current, WebDom};
use crate::log;
use crate::plugin::PluginHandle;

fn running() -> Result<PluginHandle<WebDom>, JsValue> {
    current().ok_or_else(|| JsValue::from_str("AI cover script is not running"))
}

/// Subscribe to dialog visibility. The callback receives the current state
/// right away and then every change. Calls are deferred to a microtask so
/// the callback may call back into the bridge.
#[wasm_bindgen(js_name = onCoverDialogVisibility)]
pub fn on_cover_dialog_visibility(callback: js_sys::Function) -> Result<(), JsValue> {
    let handle = running()?;
    handle.set_visibility_listener(Rc::new(move |visible| {
        let callback = callback.clone();
        spawn_local(async move {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_bool(visible)) {
                log::error(&format!("visibility callback failed: {:?}", e));
            }
        });
    }));
    Ok(())
}

#[wasm_bindgen(js_name = openCoverDialog)]
pub fn open_cover_dialog() -> Result<(), JsValue> {
    running()?.open_dialog();
    Ok(())
}

#[wasm_bindgen(js_name = closeCoverDialog)]
pub fn close_cover_dialog() -> Result<(), JsValue> {
    running()?.close_dialog();
    Ok(())
}

/// Write `url` into the cover field and close the dialog. A publish that
/// was held back is replayed shortly after.
#[wasm_bindgen(js_name = useCoverImage)]
pub fn use_cover_image(url: &str) -> Result<(), JsValue> {
    running()?
        .use_image(url)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = coverDialogVisible)]
pub fn cover_dialog_visible() -> bool {
    current().map(|h| h.is_dialog_visible()).unwrap_or(false)
}

/// Debug snapshot of the script state, as a JSON string
#[wasm_bindgen(js_name = coverPluginState)]
pub fn cover_plugin_state() -> Result<String, JsValue> {
    let snapshot = running()?.snapshot();
    serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
}
