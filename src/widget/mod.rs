//! The embeddable code widget: property watchers routed into compartment
//! reconfiguration and value synchronization on a live editor view.

pub mod bus;
pub mod compartments;
pub mod extensions;
pub mod highlight;
pub mod loader;
pub mod props;
pub mod resolver;
pub mod runtime;
pub mod sync;

use std::future::Future;
use std::ops::Range;
use std::sync::Arc;

pub use bus::{widget_events, WidgetEvent, WidgetEventReceiver, WidgetEventSender, WidgetId};
pub use compartments::{CompartmentRegistry, Slot};
pub use highlight::HighlightManager;
pub use loader::{
    module_location, BuiltinModuleLoader, ManifestModuleLoader, ModuleLoader, ReadyHandle,
};
pub use props::{PropChange, WidgetProps};
pub use resolver::Catalogs;
pub use runtime::{execute, Effect, Envelope, WidgetMessage, WidgetRuntime};
pub use sync::{ChangeForwarder, SyncState, ValueSync};

use crate::engine::{EditorView, EngineModule, Extension, LanguageSupport};
use crate::error::{Error, Result};
use loader::Readiness;

enum Lifecycle {
    Detached,
    Loading,
    Ready {
        view: EditorView,
        catalogs: Arc<Catalogs>,
    },
    Destroyed,
}

impl Lifecycle {
    fn name(&self) -> &'static str {
        match self {
            Lifecycle::Detached => "detached",
            Lifecycle::Loading => "loading",
            Lifecycle::Ready { .. } => "ready",
            Lifecycle::Destroyed => "destroyed",
        }
    }
}

pub struct CodeWidget {
    id: WidgetId,
    props: WidgetProps,
    path_prefix: String,
    lifecycle: Lifecycle,
    readiness: Readiness,
    sync: Arc<ValueSync>,
    registry: CompartmentRegistry,
    highlight: HighlightManager,
    requested_language: Option<String>,
}

impl CodeWidget {
    pub fn new(
        props: WidgetProps,
        path_prefix: impl Into<String>,
        events: WidgetEventSender,
    ) -> Self {
        let id = WidgetId::next();
        Self {
            id,
            props,
            path_prefix: path_prefix.into(),
            lifecycle: Lifecycle::Detached,
            readiness: Readiness::new(),
            sync: Arc::new(ValueSync::new(id, events)),
            registry: CompartmentRegistry::new(),
            highlight: HighlightManager::new(),
            requested_language: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn props(&self) -> &WidgetProps {
        &self.props
    }

    pub fn sync(&self) -> &ValueSync {
        &self.sync
    }

    pub fn registry(&self) -> &CompartmentRegistry {
        &self.registry
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready { .. })
    }

    pub fn ready(&self) -> ReadyHandle {
        self.readiness.handle()
    }

    pub fn module_location(&self) -> String {
        module_location(&self.path_prefix, &self.props.resource_path)
    }

    /// Attaches the widget. Only the first call requests the module.
    pub fn mount(&mut self) -> Option<Effect> {
        if !matches!(self.lifecycle, Lifecycle::Detached) {
            tracing::debug!(widget = %self.id, state = self.lifecycle.name(), "mount ignored");
            return None;
        }
        self.lifecycle = Lifecycle::Loading;
        let location = self.module_location();
        tracing::info!(widget = %self.id, location = %location, "loading editor module");
        Some(Effect::LoadModule { location })
    }

    pub fn unmount(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Destroyed) {
            return;
        }
        tracing::info!(widget = %self.id, "unmounted");
        self.lifecycle = Lifecycle::Destroyed;
        self.readiness.close();
    }

    pub fn handle_message(&mut self, message: WidgetMessage) -> Vec<Effect> {
        match message {
            WidgetMessage::ModuleLoaded(module) => self.on_module_loaded(module),
            WidgetMessage::ModuleFailed { location, error } => {
                tracing::error!(
                    widget = %self.id,
                    location = %location,
                    error = %error,
                    "editor module failed to load"
                );
                Vec::new()
            }
            WidgetMessage::LanguageLoaded { name, support } => {
                self.on_language_loaded(&name, support);
                Vec::new()
            }
            WidgetMessage::LanguageFailed { name, error } => {
                tracing::error!(
                    widget = %self.id,
                    language = %name,
                    error = %error,
                    "language failed to load"
                );
                Vec::new()
            }
        }
    }

    fn on_module_loaded(&mut self, module: Arc<EngineModule>) -> Vec<Effect> {
        if !matches!(self.lifecycle, Lifecycle::Loading) {
            tracing::debug!(
                widget = %self.id,
                state = self.lifecycle.name(),
                "module result ignored"
            );
            return Vec::new();
        }

        let catalogs = Arc::new(Catalogs::from_module(module));
        let forwarder = Arc::new(ChangeForwarder::new(self.sync.clone()));
        let extensions = extensions::assemble(&self.props, &self.registry, forwarder);
        let view = EditorView::new(&self.props.value, extensions);
        self.lifecycle = Lifecycle::Ready {
            view,
            catalogs: catalogs.clone(),
        };
        self.readiness.publish(catalogs);
        tracing::info!(widget = %self.id, "editor ready");

        let language = self.props.language.clone();
        let effects = self.set_language(language.as_deref()).into_iter().collect();
        let theme = self.props.theme.clone();
        self.set_theme(&theme);
        self.set_disabled(self.props.disable);
        effects
    }

    fn on_language_loaded(&mut self, name: &str, support: Arc<LanguageSupport>) {
        if !self.is_ready() {
            return;
        }
        if self.requested_language.as_deref() != Some(name) {
            tracing::debug!(
                widget = %self.id,
                language = %name,
                requested = ?self.requested_language,
                "applying language load that resolved after a newer request"
            );
        }
        self.reconfigure(Slot::Language, Extension::Language(support));
    }

    /// Single entry point for watched property changes.
    pub fn set_prop(&mut self, change: PropChange) -> Vec<Effect> {
        match change {
            PropChange::Value(value) => {
                self.set_value(&value);
                Vec::new()
            }
            PropChange::Language(language) => {
                self.set_language(language.as_deref()).into_iter().collect()
            }
            PropChange::Theme(theme) => {
                self.set_theme(&theme);
                Vec::new()
            }
            PropChange::Disable(disable) => {
                self.set_disabled(disable);
                Vec::new()
            }
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.props.value = value.to_string();
        let Lifecycle::Ready { view, .. } = &mut self.lifecycle else {
            return;
        };
        if let Err(e) = self.sync.write_external(view, value) {
            tracing::error!(widget = %self.id, error = %e, "external value write failed");
        }
    }

    /// An empty or absent name returns the editor to plain text. A language whose
    /// grammar is not loaded yet yields a load effect; the slot changes when it lands.
    pub fn set_language(&mut self, name: Option<&str>) -> Option<Effect> {
        let name = name.filter(|name| !name.is_empty());
        self.props.language = name.map(str::to_string);
        let catalogs = match &self.lifecycle {
            Lifecycle::Ready { catalogs, .. } => catalogs.clone(),
            _ => return None,
        };

        let Some(name) = name else {
            self.requested_language = None;
            self.reconfigure(Slot::Language, self.registry.initial(Slot::Language));
            return None;
        };

        let descriptor = match catalogs.resolve_language(name) {
            Ok(descriptor) => descriptor,
            Err(Error::LanguageNotFound { name, known }) => {
                tracing::error!(
                    widget = %self.id,
                    language = %name,
                    known = %known.join(", "),
                    "language not found"
                );
                return None;
            }
            Err(e) => {
                tracing::error!(widget = %self.id, error = %e, "language lookup failed");
                return None;
            }
        };

        self.requested_language = Some(descriptor.name().to_string());
        match descriptor.loaded() {
            Some(support) => {
                self.reconfigure(Slot::Language, Extension::Language(support));
                None
            }
            None => Some(Effect::LoadLanguage { descriptor }),
        }
    }

    pub fn set_theme(&mut self, name: &str) {
        self.props.theme = name.to_string();
        let theme = match &self.lifecycle {
            Lifecycle::Ready { catalogs, .. } => catalogs.resolve_theme(name),
            _ => return,
        };
        match theme {
            Ok(theme) => self.reconfigure(Slot::Theme, Extension::Theme(theme)),
            Err(e) => {
                tracing::error!(widget = %self.id, theme = %name, error = %e, "theme not found")
            }
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.props.disable = disabled;
        let state = self.registry.editable_state(!disabled);
        self.reconfigure(Slot::Editable, state);
    }

    /// Sorted canonical language names; waits for the editor.
    pub fn languages(&self) -> impl Future<Output = Result<Vec<String>>> + Send + 'static {
        let ready = self.ready();
        async move { Ok(ready.wait().await?.language_names()) }
    }

    /// Sorted theme names, excluding non-theme exports; waits for the editor.
    pub fn themes(&self) -> impl Future<Output = Result<Vec<String>>> + Send + 'static {
        let ready = self.ready();
        async move { Ok(ready.wait().await?.theme_names()) }
    }

    /// Marks `[from, to)`, replacing any previous highlight. Does nothing before the
    /// editor is ready.
    pub fn highlight_text(&mut self, from: usize, to: usize) {
        let Lifecycle::Ready { view, .. } = &mut self.lifecycle else {
            tracing::debug!(widget = %self.id, "highlight before ready ignored");
            return;
        };
        if let Err(e) = self.highlight.highlight(view, &self.registry, from, to) {
            tracing::error!(widget = %self.id, error = %e, "highlight failed");
        }
    }

    pub fn clear_highlight(&mut self) {
        let Lifecycle::Ready { view, .. } = &mut self.lifecycle else {
            return;
        };
        if let Err(e) = self.highlight.clear(view, &self.registry) {
            tracing::error!(widget = %self.id, error = %e, "clearing highlight failed");
        }
    }

    pub fn highlighted(&self) -> Option<Range<usize>> {
        self.highlight.active()
    }

    /// The live document when ready, otherwise the last value pushed by the host.
    pub fn value(&self) -> String {
        match &self.lifecycle {
            Lifecycle::Ready { view, .. } => view.doc_string(),
            _ => self.props.value.clone(),
        }
    }

    pub fn editor(&self) -> Option<&EditorView> {
        match &self.lifecycle {
            Lifecycle::Ready { view, .. } => Some(view),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorView> {
        match &mut self.lifecycle {
            Lifecycle::Ready { view, .. } => Some(view),
            _ => None,
        }
    }

    fn reconfigure(&mut self, slot: Slot, extension: Extension) {
        let Lifecycle::Ready { view, .. } = &mut self.lifecycle else {
            return;
        };
        if let Err(e) = self.registry.reconfigure(view, slot, extension) {
            tracing::error!(widget = %self.id, slot = %slot, error = %e, "reconfigure failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/widget.rs"]
mod tests;
