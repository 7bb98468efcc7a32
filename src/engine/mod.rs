//! In-process editor engine: the document, transaction and extension machinery that the
//! widget drives. It knows nothing about widgets, hosts, or echo suppression.

pub mod decoration;
pub mod extension;
pub mod keymap;
pub mod module;
pub mod selection;
pub mod syntax;
pub mod text;
pub mod theme;
pub mod view;

pub use decoration::{Decoration, DecorationRange, DecorationSet};
pub use extension::{Compartment, Extension, StateEffect, UpdateListener};
pub use keymap::{indent_with_tab, Command, Key, KeyBinding, KeyCode};
pub use module::{EngineModule, LanguageDescription, ModuleManifest, ThemeExport};
pub use selection::Selection;
pub use syntax::{HighlightSpan, LanguageSupport};
pub use text::{Assoc, ChangeSet, ChangeSpec};
pub use theme::{BaseTheme, Color, Style, Tag, Theme, ThemeSpec};
pub use view::{EditorView, StyledSpan, Transaction, ViewUpdate};
