//! Mutation Watcher bookkeeping
//!
//! The browser `MutationObserver` lives in `web::observer`; this is the
//! platform-free part: the unsubscription policy and per-batch accounting.
//! A batch may stand for any number of DOM edits, so reactions have to be
//! idempotent.

use serde::Serialize;

/// When a subscription ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WatchPolicy {
    /// Never disconnect; SPA navigation can rebuild the target any time
    Persistent,
    /// Disconnect right after the reaction first reports success
    UntilFound,
}

/// Returned by a reaction for each batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchControl {
    Continue,
    Disconnect,
}

#[derive(Debug, Clone)]
pub struct WatchSubscription {
    name: &'static str,
    policy: WatchPolicy,
    active: bool,
    batches: u64,
}

impl WatchSubscription {
    pub fn new(name: &'static str, policy: WatchPolicy) -> Self {
        Self {
            name,
            policy,
            active: true,
            batches: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> WatchPolicy {
        self.policy
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    /// Run the reaction for one batch. Returns false once the subscription
    /// has ended; the caller then disconnects the observer.
    pub fn deliver<F>(&mut self, reaction: F) -> bool
    where
        F: FnOnce() -> WatchControl,
    {
        if !self.active {
            return false;
        }
        self.batches += 1;
        if reaction() == WatchControl::Disconnect && self.policy == WatchPolicy::UntilFound {
            self.active = false;
        }
        self.active
    }
}
