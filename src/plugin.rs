//! CoverPlugin: the single owner of all script state
//!
//! `CoverPlugin` holds the modal visibility, the injection controller and
//! the interception machine. `PluginHandle` shares it with the callbacks
//! the host document invokes (mutation batches, clicks, timers) and keeps
//! the borrow discipline in one place: no borrow is held while clicking a
//! host control, dispatching events into the host form, alerting, or
//! notifying the dialog. Any of those may call straight back in.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::config::PluginConfig;
use crate::dom::{CaptureHandler, ClickDisposition, ClickHandler, HostDom};
use crate::error::Result;
use crate::inject::{ensure_styles, InjectOutcome, InjectionController};
use crate::intercept::{Interceptor, Phase, Verdict};
use crate::locator::Locator;
use crate::log;
use crate::modal::{fill_cover, ModalController, VisibilityListener};
use crate::watcher::WatchControl;

// =============================================================================
// CoverPlugin
// =============================================================================

pub struct CoverPlugin {
    config: PluginConfig,
    modal: ModalController,
    injection: InjectionController,
    interceptor: Interceptor,
}

/// Debug view exported to the browser console
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSnapshot {
    pub phase: Phase,
    pub guard_set: bool,
    pub dialog_mounted: bool,
    pub dialog_visible: bool,
    pub trigger_present: bool,
    pub injections: u32,
}

impl CoverPlugin {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            modal: ModalController::new(&config),
            injection: InjectionController::new(&config),
            interceptor: Interceptor::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    pub fn snapshot<D: HostDom>(&self, dom: &D) -> PluginSnapshot {
        PluginSnapshot {
            phase: self.interceptor.phase(),
            guard_set: self.interceptor.is_guard_set(),
            dialog_mounted: self.modal.is_mounted(),
            dialog_visible: self.modal.is_visible(),
            trigger_present: self.injection.is_present(dom),
            injections: self.injection.injected_count(),
        }
    }
}

// =============================================================================
// PluginHandle
// =============================================================================

pub struct PluginHandle<D: HostDom> {
    plugin: Rc<RefCell<CoverPlugin>>,
    dom: Rc<D>,
}

impl<D: HostDom> Clone for PluginHandle<D> {
    fn clone(&self) -> Self {
        Self {
            plugin: self.plugin.clone(),
            dom: self.dom.clone(),
        }
    }
}

impl<D: HostDom + 'static> PluginHandle<D> {
    pub fn new(dom: Rc<D>, config: PluginConfig) -> Self {
        Self {
            plugin: Rc::new(RefCell::new(CoverPlugin::new(config))),
            dom,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn config(&self) -> PluginConfig {
        self.plugin.borrow().config.clone()
    }

    pub fn snapshot(&self) -> PluginSnapshot {
        self.plugin.borrow().snapshot(&*self.dom)
    }

    pub fn is_dialog_visible(&self) -> bool {
        self.plugin.borrow().modal.is_visible()
    }

    /// Mount the dialog container and, when the trigger is enabled, the
    /// trigger stylesheet. Safe to call again.
    pub fn start(&self) -> Result<()> {
        let mut guard = self.plugin.borrow_mut();
        let plugin = &mut *guard;
        if plugin.modal.mount(&*self.dom)? {
            log::info("dialog container mounted");
        }
        if plugin.config.trigger_button && ensure_styles(&*self.dom, &plugin.config.ids)? {
            log::info("trigger styles injected");
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Mutation reactions
    // -------------------------------------------------------------------------

    /// Trigger injection for one mutation batch. Always continues: the host
    /// may tear the form down and rebuild it at any time.
    pub fn trigger_reaction(&self) -> WatchControl {
        let mut guard = self.plugin.borrow_mut();
        let plugin = &mut *guard;
        // one id lookup per batch while the trigger is in place
        if plugin.injection.is_present(&*self.dom) {
            return WatchControl::Continue;
        }
        let locator = Locator::new(&plugin.config);
        let Some(anchor) = locator.injection_anchor(&*self.dom) else {
            return WatchControl::Continue;
        };

        let handle = self.clone();
        let outcome = plugin.injection.ensure(&*self.dom, &anchor.node, move || {
            let handler: ClickHandler = Rc::new(move || handle.open_dialog());
            handler
        });
        match outcome {
            Ok(InjectOutcome::Injected(_)) => log::info(&format!(
                "trigger injected next to the cover field (found {})",
                anchor.strategy
            )),
            Ok(InjectOutcome::AlreadyPresent) => {}
            Err(e) => log::error(&format!("trigger injection failed: {}", e)),
        }
        WatchControl::Continue
    }

    /// Publish guard attachment for one mutation batch. Disconnects once
    /// the capturing listener is registered.
    pub fn publish_reaction(&self) -> WatchControl {
        let control = {
            let plugin = self.plugin.borrow();
            if plugin.interceptor.is_attached() {
                return WatchControl::Disconnect;
            }
            match Locator::new(&plugin.config).publish_control(&*self.dom) {
                Some(found) => found,
                None => return WatchControl::Continue,
            }
        };

        let handle = self.clone();
        let listener: CaptureHandler = Rc::new(move || handle.on_publish_invoked());
        if let Err(e) = self.dom.on_capture_click(&control.node, listener) {
            log::error(&format!("could not guard the publish control: {}", e));
            return WatchControl::Continue;
        }
        self.plugin.borrow_mut().interceptor.attach();
        log::info(&format!("publish control guarded (found {})", control.strategy));
        WatchControl::Disconnect
    }

    // -------------------------------------------------------------------------
    // Publish interception
    // -------------------------------------------------------------------------

    /// Capturing listener body for a click on the publish control
    pub fn on_publish_invoked(&self) -> ClickDisposition {
        let (verdict, note) = {
            let mut guard = self.plugin.borrow_mut();
            let plugin = &mut *guard;
            let verdict = plugin
                .interceptor
                .on_invocation(&*self.dom, &Locator::new(&plugin.config));
            let note = match verdict {
                Verdict::Suppress => plugin.modal.open(),
                _ => None,
            };
            (verdict, note)
        };
        if let Some(note) = note {
            note.send();
        }

        match verdict {
            Verdict::Proceed => ClickDisposition::Allow,
            Verdict::ReplayPassThrough => {
                log::info("replayed publish passing through");
                ClickDisposition::Allow
            }
            Verdict::Suppress => {
                log::info("publish held back: cover image is empty");
                ClickDisposition::Block
            }
            Verdict::ProceedAndRecheck { delay_ms } => {
                log::warn("cover field not rendered yet, checking again shortly");
                let handle = self.clone();
                self.dom.schedule(delay_ms, Box::new(move || handle.run_retry()));
                ClickDisposition::Allow
            }
        }
    }

    /// Bounded retry after a click that found no cover field
    pub fn run_retry(&self) {
        let note = {
            let mut guard = self.plugin.borrow_mut();
            let plugin = &mut *guard;
            if !plugin
                .interceptor
                .on_retry(&*self.dom, &Locator::new(&plugin.config))
            {
                return;
            }
            plugin.modal.open()
        };
        log::info("cover field is empty, prompting after the fact");
        if let Some(note) = note {
            note.send();
        }
    }

    /// Programmatic publish after the cover was written
    pub fn run_replay(&self) {
        let control = {
            let mut guard = self.plugin.borrow_mut();
            let plugin = &mut *guard;
            if !plugin.interceptor.begin_replay() {
                return;
            }
            match Locator::new(&plugin.config).publish_control(&*self.dom) {
                Some(found) => found.node,
                None => {
                    plugin.interceptor.end_replay();
                    log::warn("publish control vanished before replay; publish manually");
                    return;
                }
            }
        };

        log::info("replaying publish");
        self.dom.click(&control);
        self.plugin.borrow_mut().interceptor.end_replay();
    }

    // -------------------------------------------------------------------------
    // Dialog bridge
    // -------------------------------------------------------------------------

    pub fn open_dialog(&self) {
        let note = {
            let mut plugin = self.plugin.borrow_mut();
            if !plugin.modal.is_mounted() {
                log::error("dialog is not mounted yet");
                return;
            }
            plugin.modal.open()
        };
        if let Some(note) = note {
            note.send();
        }
    }

    /// Dialog close signal: hide, no side effects on the host form
    pub fn close_dialog(&self) {
        let note = {
            let mut plugin = self.plugin.borrow_mut();
            plugin.interceptor.on_cancel();
            plugin.modal.close()
        };
        if let Some(note) = note {
            note.send();
        }
    }

    /// Dialog use-image signal. The cover write runs unborrowed; state is
    /// only touched again once the host has seen its events.
    pub fn use_image(&self, url: &str) -> Result<()> {
        let config = self.config();
        fill_cover(&*self.dom, &config, url)?;

        let (note, replay_delay) = {
            let mut guard = self.plugin.borrow_mut();
            let plugin = &mut *guard;
            (plugin.modal.close(), plugin.interceptor.on_image_applied())
        };
        log::info("cover image filled in");
        if let Some(note) = note {
            note.send();
        }

        if let Some(delay_ms) = replay_delay {
            let handle = self.clone();
            self.dom.schedule(delay_ms, Box::new(move || handle.run_replay()));
        }
        Ok(())
    }

    pub fn set_visibility_listener(&self, listener: VisibilityListener) {
        let note = self.plugin.borrow_mut().modal.set_listener(listener);
        note.send();
    }
}
