//! Mutation Watcher over the browser `MutationObserver`

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MutationObserver, MutationObserverInit, Node};

use crate::error::{PluginError, Result};
use crate::log;
use crate::watcher::{WatchControl, WatchSubscription};

pub type Reaction = Rc<dyn Fn() -> WatchControl>;

/// Observe child-list changes anywhere under `root` and run `reaction` once
/// per delivered batch. One pass runs immediately for content rendered
/// before the script loaded.
pub fn watch(root: &Node, mut subscription: WatchSubscription, reaction: Reaction) -> Result<()> {
    let name = subscription.name();
    if !subscription.deliver(|| reaction()) {
        log::info(&format!("{} watcher finished on the initial pass", name));
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::wrap(Box::new(
        move |_records: js_sys::Array, observer: MutationObserver| {
            if !subscription.deliver(|| reaction()) {
                observer.disconnect();
                log::info(&format!(
                    "{} watcher disconnected after {} batches",
                    name,
                    subscription.batches()
                ));
            }
        },
    ));

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| PluginError::Dom(format!("failed to create observer: {:?}", e)))?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer
        .observe_with_options(root, &init)
        .map_err(|e| PluginError::Dom(format!("failed to observe: {:?}", e)))?;

    callback.forget();
    Ok(())
}
