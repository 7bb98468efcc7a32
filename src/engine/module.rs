//! The loadable editor module: language descriptions and the theme export table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use super::syntax::LanguageSupport;
use super::theme::{create_theme, Theme, ThemeSpec};
use crate::error::Result;

pub type GrammarFn = fn() -> tree_sitter::Language;
pub type ThemeFactory = fn(&str, &ThemeSpec) -> Result<Theme>;

const BUILTIN_THEMES: &str = include_str!("themes.json");

/// Static metadata for one language; the grammar is loaded on first use and memoized.
pub struct LanguageDescription {
    name: String,
    alias: Vec<String>,
    extensions: Vec<String>,
    grammar: GrammarFn,
    support: OnceCell<Arc<LanguageSupport>>,
}

impl fmt::Debug for LanguageDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDescription")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("loaded", &self.support.initialized())
            .finish()
    }
}

impl LanguageDescription {
    pub fn new(name: &str, alias: &[&str], extensions: &[&str], grammar: GrammarFn) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.iter().map(|a| a.to_string()).collect(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            grammar,
            support: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &[String] {
        &self.alias
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn loaded(&self) -> Option<Arc<LanguageSupport>> {
        self.support.get().cloned()
    }

    pub async fn load(&self) -> Result<Arc<LanguageSupport>> {
        self.support
            .get_or_try_init(|| async {
                tracing::debug!(language = %self.name, "loading grammar");
                LanguageSupport::new(self.name.clone(), (self.grammar)()).map(Arc::new)
            })
            .await
            .cloned()
    }
}

/// A theme export table entry: either a theme or a helper that is not itself a theme.
#[derive(Clone)]
pub enum ThemeExport {
    Theme(Arc<Theme>),
    Factory(ThemeFactory),
}

impl ThemeExport {
    pub fn as_theme(&self) -> Option<&Arc<Theme>> {
        match self {
            Self::Theme(theme) => Some(theme),
            Self::Factory(_) => None,
        }
    }
}

impl fmt::Debug for ThemeExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theme(theme) => f.debug_tuple("Theme").field(&theme.name()).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// JSON manifest describing a module: a subset of the built-in languages plus extra themes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub themes: BTreeMap<String, ThemeSpec>,
}

#[derive(Debug)]
pub struct EngineModule {
    languages: Vec<Arc<LanguageDescription>>,
    themes: BTreeMap<String, ThemeExport>,
}

impl EngineModule {
    pub fn new(
        languages: Vec<Arc<LanguageDescription>>,
        themes: BTreeMap<String, ThemeExport>,
    ) -> Self {
        Self { languages, themes }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(builtin_languages(), builtin_themes()?))
    }

    pub fn from_manifest(manifest: &ModuleManifest) -> Result<Self> {
        let mut languages = builtin_languages();
        if !manifest.languages.is_empty() {
            for wanted in &manifest.languages {
                if !languages.iter().any(|l| l.name().eq_ignore_ascii_case(wanted)) {
                    tracing::warn!(language = %wanted, "manifest names an unknown language");
                }
            }
            languages.retain(|l| {
                manifest
                    .languages
                    .iter()
                    .any(|wanted| l.name().eq_ignore_ascii_case(wanted))
            });
        }

        let mut themes = builtin_themes()?;
        for (name, spec) in &manifest.themes {
            let theme = create_theme(name, spec)?;
            themes.insert(name.clone(), ThemeExport::Theme(Arc::new(theme)));
        }

        Ok(Self::new(languages, themes))
    }

    pub fn languages(&self) -> &[Arc<LanguageDescription>] {
        &self.languages
    }

    pub fn themes(&self) -> &BTreeMap<String, ThemeExport> {
        &self.themes
    }
}

pub fn builtin_themes() -> Result<BTreeMap<String, ThemeExport>> {
    let specs: BTreeMap<String, ThemeSpec> = serde_json::from_str(BUILTIN_THEMES)?;
    let mut themes = BTreeMap::new();
    for (name, spec) in &specs {
        let theme = create_theme(name, spec)?;
        themes.insert(name.clone(), ThemeExport::Theme(Arc::new(theme)));
    }
    themes.insert("createTheme".to_string(), ThemeExport::Factory(create_theme));
    Ok(themes)
}

fn typescript() -> tree_sitter::Language {
    tree_sitter_typescript::language_typescript()
}

fn tsx() -> tree_sitter::Language {
    tree_sitter_typescript::language_tsx()
}

fn xml() -> tree_sitter::Language {
    tree_sitter_xml::language_xml()
}

pub fn builtin_languages() -> Vec<Arc<LanguageDescription>> {
    let descriptions = [
        LanguageDescription::new("bash", &["sh", "shell", "zsh"], &["sh", "bash", "zsh"], tree_sitter_bash::language),
        LanguageDescription::new("c", &[], &["c", "h"], tree_sitter_c::language),
        LanguageDescription::new("cpp", &["c++"], &["cpp", "cc", "cxx", "hpp", "hh"], tree_sitter_cpp::language),
        LanguageDescription::new("css", &[], &["css"], tree_sitter_css::language),
        LanguageDescription::new("go", &["golang"], &["go"], tree_sitter_go::language),
        LanguageDescription::new("html", &["xhtml"], &["html", "htm"], tree_sitter_html::language),
        LanguageDescription::new("java", &[], &["java"], tree_sitter_java::language),
        LanguageDescription::new("javascript", &["js", "ecmascript", "node"], &["js", "mjs", "cjs", "jsx"], tree_sitter_javascript::language),
        LanguageDescription::new("json", &[], &["json"], tree_sitter_json::language),
        LanguageDescription::new("python", &["py", "python3"], &["py", "pyi", "pyw"], tree_sitter_python::language),
        LanguageDescription::new("rust", &["rs"], &["rs"], tree_sitter_rust::language),
        LanguageDescription::new("toml", &[], &["toml"], tree_sitter_toml::language),
        LanguageDescription::new("tsx", &[], &["tsx"], tsx),
        LanguageDescription::new("typescript", &["ts"], &["ts", "mts", "cts"], typescript),
        LanguageDescription::new("xml", &["rss", "svg", "xsd"], &["xml", "xsl", "svg"], xml),
        LanguageDescription::new("yaml", &["yml"], &["yaml", "yml"], tree_sitter_yaml::language),
    ];
    descriptions.into_iter().map(Arc::new).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/engine/module.rs"]
mod tests;
