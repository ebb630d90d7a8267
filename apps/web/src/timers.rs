//! Bookkeeping for browser timers.
//!
//! Each live timer is keyed by the session token it was scheduled for and
//! owns its callback. Cancelling or finishing a timer moves the callback to a
//! retired list instead of dropping it, since the callback may still be
//! running when its timer ends. The driver drains that list between events.

use std::collections::HashMap;

use memory_core::Token;

/// Browser-side timer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub id: i32,
    /// `setInterval` rather than `setTimeout`.
    pub repeats: bool,
}

struct LiveTimer<C> {
    handle: TimerHandle,
    callback: C,
}

pub struct TimerTable<C> {
    live: HashMap<Token, LiveTimer<C>>,
    retired: Vec<C>,
}

impl<C> Default for TimerTable<C> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            retired: Vec::new(),
        }
    }
}

impl<C> TimerTable<C> {
    pub fn insert(&mut self, token: Token, handle: TimerHandle, callback: C) {
        if let Some(old) = self.live.insert(token, LiveTimer { handle, callback }) {
            self.retired.push(old.callback);
        }
    }

    /// Stop tracking `token`. Returns the handle the browser has to clear.
    pub fn cancel(&mut self, token: Token) -> Option<TimerHandle> {
        let timer = self.live.remove(&token)?;
        self.retired.push(timer.callback);
        Some(timer.handle)
    }

    /// Stop tracking every timer.
    pub fn cancel_all(&mut self) -> Vec<TimerHandle> {
        let mut handles = Vec::with_capacity(self.live.len());
        for (_, timer) in self.live.drain() {
            handles.push(timer.handle);
            self.retired.push(timer.callback);
        }
        handles
    }

    /// A one-shot timer ran; nothing is left to clear in the browser.
    pub fn finish(&mut self, token: Token) {
        if let Some(timer) = self.live.remove(&token) {
            self.retired.push(timer.callback);
        }
    }

    /// Callbacks that no timer can invoke any more.
    pub fn take_retired(&mut self) -> Vec<C> {
        std::mem::take(&mut self.retired)
    }

    pub fn is_live(&self, token: Token) -> bool {
        self.live.contains_key(&token)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }
}
