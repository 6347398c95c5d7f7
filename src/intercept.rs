//! Interception State Machine: require a cover before publishing
//!
//! ```text
//! Watching ──attach──▶ Attached(Idle)
//!                        │  invocation, cover empty      ▲ cancel
//!                        ▼                               │
//!                      Attached(Prompting) ──────────────┘
//!                        │  image applied
//!                        ▼
//!                      Attached(Replaying) ──replay seen / replay done──▶ Attached(Idle)
//! ```
//!
//! The machine never touches events itself. Each transition returns a
//! verdict and the browser glue applies it (suppress the click, schedule
//! a retry, click the control again).

use serde::Serialize;

use crate::config::PluginConfig;
use crate::dom::HostDom;
use crate::locator::Locator;

// =============================================================================
// States
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    /// Listener registered, nothing in flight
    Idle,
    /// Publish suppressed, dialog open, waiting for an image
    Prompting,
    /// Image written, programmatic publish scheduled
    Replaying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Watcher active, publish control not found yet
    Watching,
    /// Capturing listener registered on the publish control
    Attached(Activity),
}

/// What the capturing listener does with one publish click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the host act untouched
    Proceed,
    /// Our own replay passing through
    ReplayPassThrough,
    /// Prevent default, stop immediate propagation, open the dialog
    Suppress,
    /// Cover field not rendered yet. The click proceeds and the field is
    /// checked again after `delay_ms`.
    ProceedAndRecheck { delay_ms: u32 },
}

impl Verdict {
    /// True when the host's publish action runs
    pub fn proceeds(&self) -> bool {
        !matches!(self, Verdict::Suppress)
    }
}

/// Cover field as seen by one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverState {
    Missing,
    Empty,
    Filled,
}

pub fn cover_state<D: HostDom>(dom: &D, locator: &Locator<'_>) -> CoverState {
    match locator.cover_field(dom) {
        None => CoverState::Missing,
        Some(cover) => match dom.value(&cover.node) {
            Some(value) if !value.trim().is_empty() => CoverState::Filled,
            _ => CoverState::Empty,
        },
    }
}

// =============================================================================
// Interceptor
// =============================================================================

pub struct Interceptor {
    phase: Phase,
    /// Reentrancy guard: set right before a programmatic replay
    guard: bool,
    retry_pending: bool,
    retry_delay_ms: u32,
    replay_delay_ms: u32,
}

impl Interceptor {
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            phase: Phase::Watching,
            guard: false,
            retry_pending: false,
            retry_delay_ms: config.retry_delay_ms,
            replay_delay_ms: config.replay_delay_ms,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_guard_set(&self) -> bool {
        self.guard
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.phase, Phase::Attached(_))
    }

    /// Publish control found and listener registered. Only the first call
    /// transitions; the caller must not attach twice.
    pub fn attach(&mut self) -> bool {
        if self.phase != Phase::Watching {
            return false;
        }
        self.phase = Phase::Attached(Activity::Idle);
        true
    }

    /// A click reached the capturing listener
    pub fn on_invocation<D: HostDom>(&mut self, dom: &D, locator: &Locator<'_>) -> Verdict {
        if !self.is_attached() {
            return Verdict::Proceed;
        }

        if self.guard {
            self.guard = false;
            self.phase = Phase::Attached(Activity::Idle);
            return Verdict::ReplayPassThrough;
        }

        match cover_state(dom, locator) {
            CoverState::Filled => {
                self.phase = Phase::Attached(Activity::Idle);
                Verdict::Proceed
            }
            CoverState::Empty => {
                self.phase = Phase::Attached(Activity::Prompting);
                Verdict::Suppress
            }
            CoverState::Missing => {
                self.phase = Phase::Attached(Activity::Idle);
                self.retry_pending = true;
                Verdict::ProceedAndRecheck {
                    delay_ms: self.retry_delay_ms,
                }
            }
        }
    }

    /// The bounded retry fired. Returns true when the dialog should open as
    /// a late prompt; the click it belongs to has already gone through.
    pub fn on_retry<D: HostDom>(&mut self, dom: &D, locator: &Locator<'_>) -> bool {
        if !self.retry_pending {
            return false;
        }
        self.retry_pending = false;
        cover_state(dom, locator) == CoverState::Empty
    }

    /// The cover was written from the dialog. Returns the replay delay when
    /// a suppressed click is waiting for it.
    pub fn on_image_applied(&mut self) -> Option<u32> {
        if self.phase != Phase::Attached(Activity::Prompting) {
            return None;
        }
        self.phase = Phase::Attached(Activity::Replaying);
        Some(self.replay_delay_ms)
    }

    /// Replay timer fired. Sets the guard and returns true when the
    /// publish control should now be clicked.
    pub fn begin_replay(&mut self) -> bool {
        if self.phase != Phase::Attached(Activity::Replaying) {
            return false;
        }
        self.guard = true;
        true
    }

    /// After the programmatic click. Clears a guard the listener never saw
    /// (the host swapped the control) so it cannot swallow the next check.
    pub fn end_replay(&mut self) {
        self.guard = false;
        if self.phase == Phase::Attached(Activity::Replaying) {
            self.phase = Phase::Attached(Activity::Idle);
        }
    }

    /// Dialog dismissed. A suppressed click stays suppressed.
    pub fn on_cancel(&mut self) {
        if self.phase == Phase::Attached(Activity::Prompting) {
            self.phase = Phase::Attached(Activity::Idle);
        }
    }
}
