use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use super::bus::WidgetId;
use super::loader::ModuleLoader;
use super::CodeWidget;
use crate::engine::{EngineModule, LanguageDescription, LanguageSupport};

/// Asynchronous work requested by a widget.
#[derive(Debug, Clone)]
pub enum Effect {
    LoadModule { location: String },
    LoadLanguage { descriptor: Arc<LanguageDescription> },
}

#[derive(Debug)]
pub enum WidgetMessage {
    ModuleLoaded(Arc<EngineModule>),
    ModuleFailed {
        location: String,
        error: String,
    },
    LanguageLoaded {
        name: String,
        support: Arc<LanguageSupport>,
    },
    LanguageFailed {
        name: String,
        error: String,
    },
}

#[derive(Debug)]
pub struct Envelope {
    pub widget: WidgetId,
    pub message: WidgetMessage,
}

pub async fn execute(effect: Effect, loader: Arc<dyn ModuleLoader>) -> WidgetMessage {
    match effect {
        Effect::LoadModule { location } => match loader.load(&location).await {
            Ok(module) => WidgetMessage::ModuleLoaded(module),
            Err(e) => WidgetMessage::ModuleFailed {
                location,
                error: e.to_string(),
            },
        },
        Effect::LoadLanguage { descriptor } => {
            let name = descriptor.name().to_string();
            match descriptor.load().await {
                Ok(support) => WidgetMessage::LanguageLoaded { name, support },
                Err(e) => WidgetMessage::LanguageFailed {
                    name,
                    error: e.to_string(),
                },
            }
        }
    }
}

pub struct WidgetRuntime {
    runtime: tokio::runtime::Runtime,
    loader: Arc<dyn ModuleLoader>,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    /// Envelopes received while settling a different widget.
    deferred: RefCell<VecDeque<Envelope>>,
}

impl WidgetRuntime {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            runtime,
            loader,
            tx,
            rx,
            deferred: RefCell::new(VecDeque::new()),
        })
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn run(&self, widget: WidgetId, effect: Effect) {
        let tx = self.tx.clone();
        let loader = self.loader.clone();
        self.runtime.spawn(async move {
            let message = execute(effect, loader).await;
            if tx.send(Envelope { widget, message }).is_err() {
                tracing::debug!(widget = %widget, "runtime channel closed; message dropped");
            }
        });
    }

    pub fn run_all(&self, widget: WidgetId, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.run(widget, effect);
        }
    }

    /// Deferred envelopes come out first, in arrival order.
    pub fn try_recv(&self) -> Option<Envelope> {
        self.deferred
            .borrow_mut()
            .pop_front()
            .or_else(|| self.rx.try_recv().ok())
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Envelope> {
        if let Some(envelope) = self.deferred.borrow_mut().pop_front() {
            return Some(envelope);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(envelope) => Some(envelope),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Feeds messages to `widget` and runs the effects they produce until no message
    /// arrives within `idle`. Messages for other widgets are kept for their own
    /// `settle`. Returns the number of messages handled.
    pub fn settle(&self, widget: &mut CodeWidget, idle: Duration) -> usize {
        let mut handled = 0;
        loop {
            let envelope = match self.take_deferred(widget.id()) {
                Some(envelope) => envelope,
                None => match self.rx.recv_timeout(idle) {
                    Ok(envelope) => envelope,
                    Err(_) => break,
                },
            };
            if envelope.widget != widget.id() {
                tracing::trace!(
                    widget = %envelope.widget,
                    settling = %widget.id(),
                    "message for another widget deferred"
                );
                self.deferred.borrow_mut().push_back(envelope);
                continue;
            }
            let effects = widget.handle_message(envelope.message);
            self.run_all(widget.id(), effects);
            handled += 1;
        }
        handled
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.borrow().len()
    }

    fn take_deferred(&self, widget: WidgetId) -> Option<Envelope> {
        let mut deferred = self.deferred.borrow_mut();
        let index = deferred.iter().position(|e| e.widget == widget)?;
        deferred.remove(index)
    }
}
