use std::ops::Range;
use std::sync::Arc;

use ropey::Rope;
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

use super::decoration::Decoration;
use super::extension::{Compartment, Configuration, Extension, StateEffect};
use super::keymap::{Command, Key};
use super::selection::Selection;
use super::syntax::{HighlightSpan, SyntaxState};
use super::text::{Assoc, ChangeSet, ChangeSpec};
use super::theme::{Style, Tag, Theme};
use crate::error::Result;

const DEFAULT_INDENT_UNIT: &str = "  ";
pub const USER_EVENT_UNDO: &str = "undo";

#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub changes: Vec<ChangeSpec>,
    pub selection: Option<Selection>,
    pub effects: Vec<StateEffect>,
    pub user_event: Option<&'static str>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(changes: impl IntoIterator<Item = ChangeSpec>) -> Self {
        Self {
            changes: changes.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn effect(effect: StateEffect) -> Self {
        Self {
            effects: vec![effect],
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_user_event(mut self, event: &'static str) -> Self {
        self.user_event = Some(event);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ViewUpdate {
    pub changes: ChangeSet,
    pub doc_changed: bool,
    pub reconfigured: bool,
    pub selection: Selection,
    pub user_event: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub from: usize,
    pub to: usize,
    pub tag: Tag,
    pub style: Option<Style>,
}

/// A live editor: document, selection, resolved configuration and syntax tree.
///
/// The extension list is fixed at construction; later behavior changes go through
/// compartment reconfiguration in dispatched transactions.
pub struct EditorView {
    doc: Rope,
    selection: Selection,
    extensions: Vec<Extension>,
    slots: FxHashMap<Compartment, Extension>,
    config: Configuration,
    syntax: Option<SyntaxState>,
    done: Vec<ChangeSet>,
}

impl EditorView {
    pub fn new(doc: &str, extensions: Vec<Extension>) -> Self {
        let doc = Rope::from_str(doc);
        let slots = FxHashMap::default();
        let config = Configuration::resolve(&extensions, &slots);
        let syntax = config
            .language
            .as_ref()
            .and_then(|support| SyntaxState::new(Arc::clone(support), &doc));
        Self {
            doc,
            selection: Selection::default(),
            extensions,
            slots,
            config,
            syntax,
            done: Vec::new(),
        }
    }

    pub fn doc(&self) -> &Rope {
        &self.doc
    }

    pub fn doc_string(&self) -> String {
        self.doc.to_string()
    }

    pub fn doc_len(&self) -> usize {
        self.doc.len_chars()
    }

    pub fn doc_eq(&self, value: &str) -> bool {
        self.doc == value
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_editable(&self) -> bool {
        self.config.editable.unwrap_or(true)
    }

    pub fn indent_unit(&self) -> &str {
        self.config
            .indent_unit
            .as_deref()
            .unwrap_or(DEFAULT_INDENT_UNIT)
    }

    pub fn line_wrapping(&self) -> bool {
        self.config.line_wrapping
    }

    pub fn highlights_whitespace(&self) -> bool {
        self.config.highlight_whitespace
    }

    pub fn language_name(&self) -> Option<&str> {
        self.config.language.as_ref().map(|support| support.name())
    }

    pub fn theme(&self) -> Option<&Arc<Theme>> {
        self.config.theme.as_ref()
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.config.theme.as_ref().map(|theme| theme.name())
    }

    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    pub fn has_compartment(&self, compartment: Compartment) -> bool {
        self.config.compartments.contains(&compartment)
    }

    pub fn dispatch(&mut self, tr: Transaction) -> Result<ViewUpdate> {
        let changes = ChangeSet::new(self.doc.len_chars(), tr.changes)?;

        let mut reconfigured = false;
        for effect in tr.effects {
            match effect {
                StateEffect::Reconfigure {
                    compartment,
                    extension,
                } => {
                    if !self.has_compartment(compartment) {
                        tracing::warn!(?compartment, "reconfigure of unknown compartment ignored");
                        continue;
                    }
                    self.slots.insert(compartment, extension);
                    reconfigured = true;
                }
            }
        }

        let doc_changed = !changes.is_empty();
        if doc_changed {
            if self.config.history && tr.user_event != Some(USER_EVENT_UNDO) {
                self.done.push(changes.invert(&self.doc));
            }
            changes.apply(&mut self.doc);
        }

        self.selection = match tr.selection {
            Some(selection) => selection.clamp(self.doc.len_chars()),
            None => self.selection.map(&changes),
        };

        if reconfigured {
            self.config = Configuration::resolve(&self.extensions, &self.slots);
        }
        self.sync_syntax(doc_changed);

        let update = ViewUpdate {
            changes,
            doc_changed,
            reconfigured,
            selection: self.selection,
            user_event: tr.user_event,
        };
        for listener in &self.config.listeners {
            listener.update(&update);
        }
        Ok(update)
    }

    fn sync_syntax(&mut self, doc_changed: bool) {
        let same_language = match (&self.config.language, &self.syntax) {
            (Some(language), Some(syntax)) => Arc::ptr_eq(language, syntax.support()),
            (None, None) => true,
            _ => false,
        };

        if !same_language {
            self.syntax = self
                .config
                .language
                .as_ref()
                .and_then(|support| SyntaxState::new(Arc::clone(support), &self.doc));
        } else if doc_changed {
            if let Some(syntax) = self.syntax.as_mut() {
                syntax.reparse(&self.doc);
            }
        }
    }

    /// Replaces the selection with typed text. Returns `None` when the view is read-only.
    pub fn insert_text(&mut self, text: &str) -> Result<Option<ViewUpdate>> {
        if !self.is_editable() {
            return Ok(None);
        }
        let from = self.selection.from();
        let cursor = from + text.chars().count();
        let tr = Transaction::changes([ChangeSpec::replace(from, self.selection.to(), text)])
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input.type");
        self.dispatch(tr).map(Some)
    }

    pub fn handle_key(&mut self, key: Key) -> Result<Option<ViewUpdate>> {
        let Some(binding) = self.config.keymap.iter().find(|b| b.key == key).copied() else {
            return Ok(None);
        };
        self.run_command(binding.run)
    }

    pub fn run_command(&mut self, command: Command) -> Result<Option<ViewUpdate>> {
        if command.edits() && !self.is_editable() {
            return Ok(None);
        }

        let tr = match command {
            Command::IndentMore => self.indent_more(),
            Command::IndentLess => self.indent_less(),
            Command::InsertNewline => Some(self.insert_newline()),
            Command::DeleteCharBackward => self.delete_char(false),
            Command::DeleteCharForward => self.delete_char(true),
            Command::CursorCharLeft => {
                let pos = self.step_grapheme(self.selection.head, false);
                Some(Transaction::new().with_selection(Selection::cursor(pos)))
            }
            Command::CursorCharRight => {
                let pos = self.step_grapheme(self.selection.head, true);
                Some(Transaction::new().with_selection(Selection::cursor(pos)))
            }
            Command::Undo => return self.undo(),
        };

        match tr {
            Some(tr) => self.dispatch(tr).map(Some),
            None => Ok(None),
        }
    }

    pub fn undo(&mut self) -> Result<Option<ViewUpdate>> {
        let Some(inverse) = self.done.pop() else {
            return Ok(None);
        };
        let tr = Transaction::changes(inverse.changes().iter().cloned())
            .with_user_event(USER_EVENT_UNDO);
        self.dispatch(tr).map(Some)
    }

    fn selected_lines(&self) -> Range<usize> {
        let from = self.selection.from();
        let to = self.selection.to();
        let first = self.doc.char_to_line(from);
        let mut last = self.doc.char_to_line(to);
        if to > from && last > first && self.doc.line_to_char(last) == to {
            last -= 1;
        }
        first..last + 1
    }

    fn indent_more(&self) -> Option<Transaction> {
        let unit = self.indent_unit().to_string();
        let changes: Vec<_> = self
            .selected_lines()
            .map(|line| ChangeSpec::insert(self.doc.line_to_char(line), unit.clone()))
            .collect();
        let set = ChangeSet::new(self.doc.len_chars(), changes.clone()).ok()?;
        let selection = Selection::range(
            set.map_pos(self.selection.anchor, Assoc::After),
            set.map_pos(self.selection.head, Assoc::After),
        );
        Some(
            Transaction::changes(changes)
                .with_selection(selection)
                .with_user_event("input.indent"),
        )
    }

    fn indent_less(&self) -> Option<Transaction> {
        let width = self.indent_unit().chars().count().max(1);
        let mut changes = Vec::new();
        for line in self.selected_lines() {
            let start = self.doc.line_to_char(line);
            let text = self.doc.line(line);
            let mut remove = 0;
            for ch in text.chars() {
                if ch == '\t' && remove == 0 {
                    remove = 1;
                    break;
                }
                if ch != ' ' || remove == width {
                    break;
                }
                remove += 1;
            }
            if remove > 0 {
                changes.push(ChangeSpec::delete(start, start + remove));
            }
        }
        if changes.is_empty() {
            return None;
        }
        Some(Transaction::changes(changes).with_user_event("delete.dedent"))
    }

    fn insert_newline(&self) -> Transaction {
        let from = self.selection.from();
        let line = self.doc.line(self.doc.char_to_line(from));
        let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        let insert = format!("\n{indent}");
        let cursor = from + insert.chars().count();
        Transaction::changes([ChangeSpec::replace(from, self.selection.to(), insert)])
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input")
    }

    fn delete_char(&self, forward: bool) -> Option<Transaction> {
        let (from, to) = if self.selection.is_empty() {
            let head = self.selection.head;
            let other = self.step_grapheme(head, forward);
            (head.min(other), head.max(other))
        } else {
            (self.selection.from(), self.selection.to())
        };
        if from == to {
            return None;
        }
        let event = if forward {
            "delete.forward"
        } else {
            "delete.backward"
        };
        Some(
            Transaction::changes([ChangeSpec::delete(from, to)])
                .with_selection(Selection::cursor(from))
                .with_user_event(event),
        )
    }

    /// Moves one grapheme cluster within the current line, or across a line break.
    fn step_grapheme(&self, pos: usize, forward: bool) -> usize {
        let len = self.doc.len_chars();
        let pos = pos.min(len);
        let line_idx = self.doc.char_to_line(pos);
        let line_start = self.doc.line_to_char(line_idx);
        let line = self.doc.line(line_idx).to_string();
        let col = pos - line_start;

        if forward {
            let rest: String = line.chars().skip(col).collect();
            let step = rest
                .graphemes(true)
                .next()
                .map(|g| g.chars().count())
                .unwrap_or(0);
            (pos + step).min(len)
        } else if col == 0 {
            if line_idx == 0 {
                return 0;
            }
            // a line break is one grapheme, `\r\n` included
            let prev = self.doc.line(line_idx - 1);
            let n = prev.len_chars();
            let crlf = n >= 2 && prev.char(n - 2) == '\r' && prev.char(n - 1) == '\n';
            pos.saturating_sub(if crlf { 2 } else { 1 })
        } else {
            let head: String = line.chars().take(col).collect();
            let step = head
                .graphemes(true)
                .next_back()
                .map(|g| g.chars().count())
                .unwrap_or(1);
            pos - step
        }
    }

    pub fn highlight_spans(&self) -> Vec<HighlightSpan> {
        match &self.syntax {
            Some(syntax) => syntax.highlight(&self.doc),
            None => Vec::new(),
        }
    }

    /// Syntax spans with styles resolved through the active theme.
    pub fn styled_spans(&self) -> Vec<StyledSpan> {
        let theme = self.config.theme.as_deref();
        self.highlight_spans()
            .into_iter()
            .map(|span| StyledSpan {
                from: span.from,
                to: span.to,
                tag: span.tag,
                style: theme.and_then(|t| t.style_for(span.tag)),
            })
            .collect()
    }

    /// Active decorations clipped to the document; empty or out-of-bounds ranges are skipped.
    pub fn decorations(&self) -> Vec<(Range<usize>, &Decoration)> {
        let len = self.doc.len_chars();
        self.config
            .decorations
            .iter()
            .flat_map(|set| set.iter())
            .filter_map(|range| range.clipped(len).map(|r| (r, &range.decoration)))
            .collect()
    }

    pub fn style_for_class(&self, class: &str) -> Option<Style> {
        self.config
            .base_themes
            .iter()
            .find_map(|rules| rules.class_style(class))
    }

    pub fn whitespace_ranges(&self) -> Vec<Range<usize>> {
        if !self.config.highlight_whitespace {
            return Vec::new();
        }

        let mut ranges = Vec::new();
        let mut start: Option<usize> = None;
        for (i, ch) in self.doc.chars().enumerate() {
            match (ch == ' ' || ch == '\t', start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    ranges.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            ranges.push(s..self.doc.len_chars());
        }
        ranges
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/view.rs"]
mod tests;
