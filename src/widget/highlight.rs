use std::ops::Range;

use super::compartments::{CompartmentRegistry, Slot};
use crate::engine::{Decoration, DecorationSet, EditorView, Extension};
use crate::error::Result;

pub const HIGHLIGHT_CLASS: &str = "cm-highlight-selection";
pub const HIGHLIGHT_BACKGROUND: &str = "#ffeb3b50";

/// Tracks the single ad-hoc highlight. Ranges are not validated against the document.
#[derive(Debug, Default)]
pub struct HighlightManager {
    active: Option<Range<usize>>,
}

impl HighlightManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<Range<usize>> {
        self.active.clone()
    }

    /// Replaces any existing highlight with a mark over `[from, to)`.
    pub fn highlight(
        &mut self,
        view: &mut EditorView,
        registry: &CompartmentRegistry,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let mark = Decoration::mark(HIGHLIGHT_CLASS);
        let set = DecorationSet::of(vec![mark.range(from, to)]);
        registry.reconfigure(view, Slot::Highlight, Extension::Decorations(set))?;
        self.active = Some(from..to);
        Ok(())
    }

    pub fn clear(&mut self, view: &mut EditorView, registry: &CompartmentRegistry) -> Result<()> {
        if self.active.is_none() {
            return Ok(());
        }
        registry.reconfigure(view, Slot::Highlight, registry.initial(Slot::Highlight))?;
        self.active = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/highlight.rs"]
mod tests;
