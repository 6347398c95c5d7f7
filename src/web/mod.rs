//! Browser runtime: the live document, the mutation observers and the
//! JavaScript-facing dialog bridge. Only compiled for `wasm32`.

mod bridge;
mod dom;
mod observer;

pub use bridge::*;
pub use dom::WebDom;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;

use crate::config::{PluginConfig, CONFIG_GLOBAL};
use crate::dom::HostDom;
use crate::error::{PluginError, Result};
use crate::log;
use crate::plugin::PluginHandle;
use crate::watcher::{WatchPolicy, WatchSubscription};

thread_local! {
    static PLUGIN: RefCell<Option<PluginHandle<WebDom>>> = const { RefCell::new(None) };
}

pub(crate) fn current() -> Option<PluginHandle<WebDom>> {
    PLUGIN.with(|slot| slot.borrow().clone())
}

/// Read `window.__AI_COVER_CONFIG__`, falling back to the defaults when it
/// is absent or unusable.
fn load_config() -> PluginConfig {
    let Some(window) = web_sys::window() else {
        return PluginConfig::default();
    };
    let raw = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return PluginConfig::default(),
    };

    let config = match serde_wasm_bindgen::from_value::<PluginConfig>(raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn(&format!("ignoring {}: {}", CONFIG_GLOBAL, e));
            return PluginConfig::default();
        }
    };
    match config.validate() {
        Ok(()) => {
            log::info(&format!("using configuration from {}", CONFIG_GLOBAL));
            config
        }
        Err(e) => {
            log::warn(&format!("ignoring {}: {}", CONFIG_GLOBAL, e));
            PluginConfig::default()
        }
    }
}

/// Script entry: mount the dialog and start watching the page
pub fn boot() -> Result<()> {
    if current().is_some() {
        log::warn("script already running");
        return Ok(());
    }

    let config = load_config();
    let dom = Rc::new(WebDom::new()?);
    let body = dom
        .body()
        .ok_or(PluginError::MissingDocument("document body"))?;

    let handle = PluginHandle::new(dom, config.clone());
    handle.start()?;
    PLUGIN.with(|slot| *slot.borrow_mut() = Some(handle.clone()));

    if config.trigger_button {
        let h = handle.clone();
        observer::watch(
            &body,
            WatchSubscription::new("trigger", WatchPolicy::Persistent),
            Rc::new(move || h.trigger_reaction()),
        )?;
    }
    if config.publish_guard {
        let h = handle.clone();
        observer::watch(
            &body,
            WatchSubscription::new("publish", WatchPolicy::UntilFound),
            Rc::new(move || h.publish_reaction()),
        )?;
    }

    log::info("script loaded, watching the page");
    Ok(())
}
