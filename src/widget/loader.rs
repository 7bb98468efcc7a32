//! Deferred loading of the editor module, and the readiness signal that callers
//! await until the editor exists.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use tokio::sync::{watch, OnceCell};

use super::resolver::Catalogs;
use crate::engine::{EngineModule, ModuleManifest};
use crate::error::{Error, Result};

pub type ModuleFuture = Pin<Box<dyn Future<Output = Result<Arc<EngineModule>>> + Send>>;

pub trait ModuleLoader: Send + Sync {
    /// `location` is opaque to the widget; each loader decides what it means.
    fn load(&self, location: &str) -> ModuleFuture;
}

/// `{path_prefix}{resource_path}/editor`.
pub fn module_location(path_prefix: &str, resource_path: &str) -> String {
    format!("{path_prefix}{resource_path}/editor")
}

/// Serves the compiled-in module, built once per process.
#[derive(Default)]
pub struct BuiltinModuleLoader {
    module: Arc<OnceCell<Arc<EngineModule>>>,
}

impl BuiltinModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<BuiltinModuleLoader>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }
}

impl ModuleLoader for BuiltinModuleLoader {
    fn load(&self, location: &str) -> ModuleFuture {
        let cell = self.module.clone();
        let location = location.to_string();
        Box::pin(async move {
            cell.get_or_try_init(|| async {
                tracing::debug!(location = %location, "building builtin editor module");
                EngineModule::builtin().map(Arc::new)
            })
            .await
            .cloned()
        })
    }
}

/// Reads `{location}.json` and narrows the builtin module to what the manifest names.
#[derive(Debug, Default, Clone)]
pub struct ManifestModuleLoader;

impl ManifestModuleLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn manifest_path(location: &str) -> PathBuf {
        PathBuf::from(format!("{location}.json"))
    }
}

impl ModuleLoader for ManifestModuleLoader {
    fn load(&self, location: &str) -> ModuleFuture {
        let path = Self::manifest_path(location);
        Box::pin(async move {
            let data = tokio::fs::read_to_string(&path).await.map_err(|e| {
                Error::ModuleLoad(format!("{}: {e}", path.display()))
            })?;
            let manifest: ModuleManifest = serde_json::from_str(&data)?;
            tracing::debug!(
                path = %path.display(),
                languages = manifest.languages.len(),
                themes = manifest.themes.len(),
                "module manifest read"
            );
            EngineModule::from_manifest(&manifest).map(Arc::new)
        })
    }
}

#[derive(Debug, Clone)]
enum ReadyState {
    Pending,
    Ready(Arc<Catalogs>),
    Closed,
}

/// Publishing side of the readiness signal; owned by the widget.
pub(crate) struct Readiness {
    tx: watch::Sender<ReadyState>,
}

impl Readiness {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(ReadyState::Pending);
        Self { tx }
    }

    pub(crate) fn handle(&self) -> ReadyHandle {
        ReadyHandle {
            rx: self.tx.subscribe(),
        }
    }

    pub(crate) fn publish(&self, catalogs: Arc<Catalogs>) {
        self.tx.send_replace(ReadyState::Ready(catalogs));
    }

    pub(crate) fn close(&self) {
        self.tx.send_replace(ReadyState::Closed);
    }
}

/// Resolves once the editor exists. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct ReadyHandle {
    rx: watch::Receiver<ReadyState>,
}

impl ReadyHandle {
    pub fn is_ready(&self) -> bool {
        matches!(*self.rx.borrow(), ReadyState::Ready(_))
    }

    pub async fn wait(mut self) -> Result<Arc<Catalogs>> {
        let state = self
            .rx
            .wait_for(|state| !matches!(state, ReadyState::Pending))
            .await
            .map_err(|_| Error::Unmounted)?;
        match &*state {
            ReadyState::Ready(catalogs) => Ok(catalogs.clone()),
            ReadyState::Closed | ReadyState::Pending => Err(Error::Unmounted),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/loader.rs"]
mod tests;
