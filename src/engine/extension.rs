//! Editor behaviors and the reconfigurable slots that hold them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::decoration::DecorationSet;
use super::keymap::{standard_keymap, KeyBinding};
use super::syntax::LanguageSupport;
use super::theme::{BaseTheme, Theme};
use super::view::ViewUpdate;

/// Observer notified after every dispatched transaction.
pub trait UpdateListener: Send + Sync {
    fn update(&self, update: &ViewUpdate);
}

#[derive(Clone)]
pub enum Extension {
    /// Undo history plus the standard editing keymap.
    BasicSetup,
    UpdateListener(Arc<dyn UpdateListener>),
    Keymap(Vec<KeyBinding>),
    IndentUnit(String),
    Language(Arc<LanguageSupport>),
    Theme(Arc<Theme>),
    BaseTheme(BaseTheme),
    Editable(bool),
    Decorations(DecorationSet),
    LineWrapping,
    HighlightWhitespace,
    Compartment(Compartment, Box<Extension>),
    Group(Vec<Extension>),
}

impl Extension {
    pub fn empty() -> Self {
        Self::Group(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Group(items) if items.iter().all(Extension::is_empty))
    }
}

impl From<Vec<Extension>> for Extension {
    fn from(items: Vec<Extension>) -> Self {
        Self::Group(items)
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BasicSetup => f.write_str("BasicSetup"),
            Self::UpdateListener(_) => f.write_str("UpdateListener(..)"),
            Self::Keymap(bindings) => f.debug_tuple("Keymap").field(&bindings.len()).finish(),
            Self::IndentUnit(unit) => f.debug_tuple("IndentUnit").field(unit).finish(),
            Self::Language(support) => f.debug_tuple("Language").field(&support.name()).finish(),
            Self::Theme(theme) => f.debug_tuple("Theme").field(&theme.name()).finish(),
            Self::BaseTheme(_) => f.write_str("BaseTheme(..)"),
            Self::Editable(editable) => f.debug_tuple("Editable").field(editable).finish(),
            Self::Decorations(set) => f.debug_tuple("Decorations").field(&set.len()).finish(),
            Self::LineWrapping => f.write_str("LineWrapping"),
            Self::HighlightWhitespace => f.write_str("HighlightWhitespace"),
            Self::Compartment(c, inner) => f.debug_tuple("Compartment").field(c).field(inner).finish(),
            Self::Group(items) => f.debug_list().entries(items).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Compartment(u64);

impl Compartment {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn of(&self, extension: Extension) -> Extension {
        Extension::Compartment(*self, Box::new(extension))
    }

    pub fn reconfigure(&self, extension: Extension) -> StateEffect {
        StateEffect::Reconfigure {
            compartment: *self,
            extension,
        }
    }
}

impl Default for Compartment {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub enum StateEffect {
    Reconfigure {
        compartment: Compartment,
        extension: Extension,
    },
}

/// Facet values resolved from the extension tree. Single-valued facets take the first value.
#[derive(Clone)]
pub(crate) struct Configuration {
    pub(crate) history: bool,
    pub(crate) listeners: Vec<Arc<dyn UpdateListener>>,
    pub(crate) keymap: Vec<KeyBinding>,
    pub(crate) indent_unit: Option<String>,
    pub(crate) language: Option<Arc<LanguageSupport>>,
    pub(crate) theme: Option<Arc<Theme>>,
    pub(crate) base_themes: Vec<BaseTheme>,
    pub(crate) editable: Option<bool>,
    pub(crate) decorations: Vec<DecorationSet>,
    pub(crate) line_wrapping: bool,
    pub(crate) highlight_whitespace: bool,
    pub(crate) compartments: Vec<Compartment>,
}

impl Configuration {
    pub(crate) fn resolve(
        extensions: &[Extension],
        slots: &FxHashMap<Compartment, Extension>,
    ) -> Self {
        let mut config = Self {
            history: false,
            listeners: Vec::new(),
            keymap: Vec::new(),
            indent_unit: None,
            language: None,
            theme: None,
            base_themes: Vec::new(),
            editable: None,
            decorations: Vec::new(),
            line_wrapping: false,
            highlight_whitespace: false,
            compartments: Vec::new(),
        };
        for extension in extensions {
            config.collect(extension, slots);
        }
        config
    }

    fn collect(&mut self, extension: &Extension, slots: &FxHashMap<Compartment, Extension>) {
        match extension {
            Extension::BasicSetup => {
                self.history = true;
                self.keymap.extend(standard_keymap());
            }
            Extension::UpdateListener(listener) => self.listeners.push(Arc::clone(listener)),
            Extension::Keymap(bindings) => self.keymap.extend(bindings.iter().copied()),
            Extension::IndentUnit(unit) => {
                self.indent_unit.get_or_insert_with(|| unit.clone());
            }
            Extension::Language(support) => {
                self.language.get_or_insert_with(|| Arc::clone(support));
            }
            Extension::Theme(theme) => {
                self.theme.get_or_insert_with(|| Arc::clone(theme));
            }
            Extension::BaseTheme(rules) => self.base_themes.push(rules.clone()),
            Extension::Editable(editable) => {
                self.editable.get_or_insert(*editable);
            }
            Extension::Decorations(set) => self.decorations.push(set.clone()),
            Extension::LineWrapping => self.line_wrapping = true,
            Extension::HighlightWhitespace => self.highlight_whitespace = true,
            Extension::Compartment(compartment, initial) => {
                self.compartments.push(*compartment);
                let active = slots.get(compartment).unwrap_or(initial);
                self.collect(active, slots);
            }
            Extension::Group(items) => {
                for item in items {
                    self.collect(item, slots);
                }
            }
        }
    }
}
