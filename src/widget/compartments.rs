use std::fmt;

use crate::engine::{Compartment, DecorationSet, EditorView, Extension, Transaction, ViewUpdate};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Language,
    Theme,
    Editable,
    Highlight,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Theme, Slot::Language, Slot::Editable, Slot::Highlight];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Language => "language",
            Slot::Theme => "theme",
            Slot::Editable => "editable",
            Slot::Highlight => "highlight",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four swappable configuration slots of one widget, plus the two precomputed
/// editability states.
pub struct CompartmentRegistry {
    language: Compartment,
    theme: Compartment,
    editable: Compartment,
    highlight: Compartment,
    editable_states: [Extension; 2],
}

impl CompartmentRegistry {
    pub fn new() -> Self {
        Self {
            language: Compartment::new(),
            theme: Compartment::new(),
            editable: Compartment::new(),
            highlight: Compartment::new(),
            editable_states: [Extension::Editable(false), Extension::Editable(true)],
        }
    }

    pub fn compartment(&self, slot: Slot) -> Compartment {
        match slot {
            Slot::Language => self.language,
            Slot::Theme => self.theme,
            Slot::Editable => self.editable,
            Slot::Highlight => self.highlight,
        }
    }

    /// Empty language/theme/editable slots fall back to plain text, default styling and
    /// an editable view; the highlight slot starts with no decorations.
    pub fn initial(&self, slot: Slot) -> Extension {
        match slot {
            Slot::Highlight => Extension::Decorations(DecorationSet::none()),
            Slot::Language | Slot::Theme | Slot::Editable => Extension::empty(),
        }
    }

    /// Slot extensions in assembly order.
    pub fn extensions(&self) -> Vec<Extension> {
        Slot::ALL
            .iter()
            .map(|slot| self.compartment(*slot).of(self.initial(*slot)))
            .collect()
    }

    pub fn editable_state(&self, editable: bool) -> Extension {
        self.editable_states[usize::from(editable)].clone()
    }

    /// Swaps the content of one slot in a single transaction. Document, history and
    /// every other slot are left alone.
    pub fn reconfigure(
        &self,
        view: &mut EditorView,
        slot: Slot,
        extension: Extension,
    ) -> Result<ViewUpdate> {
        tracing::debug!(slot = %slot, extension = ?extension, "reconfigure");
        let effect = self.compartment(slot).reconfigure(extension);
        view.dispatch(Transaction::effect(effect))
    }
}

impl Default for CompartmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/compartments.rs"]
mod tests;
