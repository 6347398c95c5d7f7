//! AI Cover UI: client-side companion script for the Halo post editor
//!
//! A Rust/WASM script injected into the editor page. It adds an "AI" cover
//! generator trigger next to the cover image field and guards the publish
//! button so that a post without a cover prompts for one first.
//!
//! # Architecture
//!
//! ## Core (platform-free)
//! - `config.rs` - PluginConfig: element specs, ids, delays, feature switches
//! - `dom.rs` - HostDom: the slice of the DOM the script touches
//! - `locator.rs` - Locator: ordered strategies for the cover field and publish control
//! - `inject/` - Trigger button and stylesheet, idempotent across mutation batches
//! - `modal.rs` - ModalController: dialog container, visibility, use-image
//! - `intercept.rs` - Interceptor: publish suppression and replay state machine
//! - `watcher.rs` - WatchSubscription: observer unsubscription policy
//! - `plugin.rs` - CoverPlugin / PluginHandle: owns all state, wires the parts
//!
//! ## Browser runtime (`wasm32` only)
//! - `web/dom.rs` - WebDom over web-sys
//! - `web/observer.rs` - MutationObserver subscriptions
//! - `web/bridge.rs` - Dialog bridge exported to JavaScript
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! // optional overrides, read once at start
//! window.__AI_COVER_CONFIG__ = { retryDelayMs: 200, ids: { trigger: 'my-ai-btn' } };
//!
//! import init, { onCoverDialogVisibility, coverPluginState } from 'aicover-ui';
//!
//! await init();   // mounts the dialog container and starts watching
//!
//! onCoverDialogVisibility((visible) => renderDialog(visible));
//! console.log(JSON.parse(coverPluginState()));
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod inject;
pub mod intercept;
pub mod locator;
pub mod log;
pub mod modal;
pub mod plugin;
pub mod watcher;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use config::PluginConfig;
pub use dom::{ClickDisposition, HostDom};
pub use error::{PluginError, Result};
pub use intercept::{Activity, Interceptor, Phase, Verdict};
pub use locator::{Locator, Target};
pub use modal::ModalController;
pub use plugin::{CoverPlugin, PluginHandle, PluginSnapshot};
pub use watcher::{WatchControl, WatchPolicy, WatchSubscription};

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Install the panic hook and start the script
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    if let Err(e) = web::boot() {
        log::error(&format!("failed to start: {}", e));
    }
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("aicover-ui v{}", env!("CARGO_PKG_VERSION"))
}
