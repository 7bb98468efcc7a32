//! Two-way value synchronization between the host value and the editor document.
//!
//! `Idle`: document changes are forwarded to the host.
//! `Suppressed`: a host-sourced value is being written; its changes are not forwarded.
//! The window closes as soon as the write's dispatch returns.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::bus::{WidgetEvent, WidgetEventSender, WidgetId};
use crate::engine::{ChangeSpec, EditorView, Transaction, UpdateListener, ViewUpdate};
use crate::error::Result;

pub const USER_EVENT_EXTERNAL: &str = "set.external";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Suppressed,
}

pub struct ValueSync {
    widget: WidgetId,
    state: Mutex<SyncState>,
    events: WidgetEventSender,
    suppressed_writes: AtomicUsize,
    emitted: AtomicUsize,
}

impl ValueSync {
    pub fn new(widget: WidgetId, events: WidgetEventSender) -> Self {
        Self {
            widget,
            state: Mutex::new(SyncState::Idle),
            events,
            suppressed_writes: AtomicUsize::new(0),
            emitted: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> SyncState {
        *self.lock()
    }

    /// Completed suppressed write cycles.
    pub fn suppressed_writes(&self) -> usize {
        self.suppressed_writes.load(Ordering::Relaxed)
    }

    /// Value-changed events handed to the host.
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Replaces the whole document with `value` unless it already matches.
    /// Returns whether a write happened.
    pub fn write_external(&self, view: &mut EditorView, value: &str) -> Result<bool> {
        if view.doc_eq(value) {
            tracing::trace!(widget = %self.widget, "external value matches document");
            return Ok(false);
        }

        let _window = self.suppress();
        let tr = Transaction::changes([ChangeSpec::replace(0, view.doc_len(), value)])
            .with_user_event(USER_EVENT_EXTERNAL);
        view.dispatch(tr)?;
        self.suppressed_writes.fetch_add(1, Ordering::Relaxed);
        Ok(true)
    }

    pub fn observe(&self, update: &ViewUpdate) {
        if !update.doc_changed {
            return;
        }
        if self.state() == SyncState::Suppressed {
            tracing::trace!(widget = %self.widget, "echo of external write suppressed");
            return;
        }

        let event = WidgetEvent::ValueChanged {
            widget: self.widget,
            changes: update.changes.clone(),
        };
        if self.events.send(event).is_err() {
            tracing::debug!(widget = %self.widget, "value change dropped: no event receiver");
            return;
        }
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    fn suppress(&self) -> SuppressionWindow<'_> {
        self.transition(SyncState::Suppressed);
        SuppressionWindow { sync: self }
    }

    fn transition(&self, to: SyncState) {
        let mut state = self.lock();
        tracing::trace!(widget = %self.widget, from = ?*state, to = ?to, "sync state");
        *state = to;
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SuppressionWindow<'a> {
    sync: &'a ValueSync,
}

impl Drop for SuppressionWindow<'_> {
    fn drop(&mut self) {
        self.sync.transition(SyncState::Idle);
    }
}

/// Update listener installed in the editor; routes document changes through the synchronizer.
pub struct ChangeForwarder {
    sync: Arc<ValueSync>,
}

impl ChangeForwarder {
    pub fn new(sync: Arc<ValueSync>) -> Self {
        Self { sync }
    }
}

impl UpdateListener for ChangeForwarder {
    fn update(&self, update: &ViewUpdate) {
        self.sync.observe(update);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/sync.rs"]
mod tests;
