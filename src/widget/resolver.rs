//! Name resolution against the loaded language and theme catalogs.

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use crate::engine::theme::one_dark;
use crate::engine::{EngineModule, LanguageDescription, Theme, ThemeExport};
use crate::error::{Error, Result};

pub const ONE_DARK: &str = "oneDark";

/// Read-only view over a loaded module's catalogs, plus the built-in `oneDark`.
#[derive(Debug, Clone)]
pub struct Catalogs {
    module: Arc<EngineModule>,
}

/// Built once per process; every catalog shares it.
fn shared_one_dark() -> &'static Arc<Theme> {
    static ONE_DARK_THEME: OnceLock<Arc<Theme>> = OnceLock::new();
    ONE_DARK_THEME.get_or_init(|| Arc::new(one_dark()))
}

impl Catalogs {
    pub fn from_module(module: Arc<EngineModule>) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &Arc<EngineModule> {
        &self.module
    }

    pub fn languages(&self) -> &[Arc<LanguageDescription>] {
        self.module.languages()
    }

    /// Case-insensitive match on canonical names and aliases; first match in catalog order.
    pub fn resolve_language(&self, name: &str) -> Result<Arc<LanguageDescription>> {
        let wanted = name.to_lowercase();
        self.languages()
            .iter()
            .find(|language| {
                std::iter::once(language.name())
                    .chain(language.alias().iter().map(String::as_str))
                    .any(|candidate| candidate.to_lowercase() == wanted)
            })
            .cloned()
            .ok_or_else(|| Error::LanguageNotFound {
                name: name.to_string(),
                known: self.languages().iter().map(|l| l.name().to_string()).collect(),
            })
    }

    /// Exact lookup among the theme entries; helper exports never match.
    pub fn resolve_theme(&self, name: &str) -> Result<Arc<Theme>> {
        if name == ONE_DARK {
            return Ok(shared_one_dark().clone());
        }
        self.module
            .themes()
            .get(name)
            .and_then(ThemeExport::as_theme)
            .cloned()
            .ok_or_else(|| Error::ThemeNotFound {
                name: name.to_string(),
            })
    }

    pub fn language_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .languages()
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        names.sort_by(|a, b| collate(a, b));
        names
    }

    pub fn theme_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .module
            .themes()
            .iter()
            .filter(|(name, export)| export.as_theme().is_some() && name.as_str() != ONE_DARK)
            .map(|(name, _)| name.clone())
            .chain(std::iter::once(ONE_DARK.to_string()))
            .collect();
        names.sort_by(|a, b| collate(a, b));
        names
    }
}

/// Case-insensitive order; among names equal ignoring case, lowercase sorts first.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
#[path = "../../tests/unit/widget/resolver.rs"]
mod tests;
