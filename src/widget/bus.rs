use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SendError, Sender, TryRecvError};

use crate::engine::ChangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget-{}", self.0)
    }
}

/// Outbound notifications for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// A user edit; carries the applied delta, not a document snapshot.
    ValueChanged { widget: WidgetId, changes: ChangeSet },
}

#[derive(Clone)]
pub struct WidgetEventSender {
    tx: Sender<WidgetEvent>,
}

pub struct WidgetEventReceiver {
    rx: Receiver<WidgetEvent>,
}

pub fn widget_events() -> (WidgetEventSender, WidgetEventReceiver) {
    let (tx, rx) = mpsc::channel();
    (WidgetEventSender { tx }, WidgetEventReceiver { rx })
}

impl WidgetEventSender {
    pub fn send(&self, event: WidgetEvent) -> Result<(), SendError<WidgetEvent>> {
        self.tx.send(event)
    }
}

impl WidgetEventReceiver {
    pub fn try_recv(&mut self) -> Result<WidgetEvent, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn drain(&mut self) -> Vec<WidgetEvent> {
        self.rx.try_iter().collect()
    }
}
