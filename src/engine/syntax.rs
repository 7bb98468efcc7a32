//! Language support backed by tree-sitter grammars.

use std::fmt;
use std::sync::Arc;

use ropey::Rope;
use tree_sitter::{Language, Node, Parser, Tree};

use super::theme::Tag;
use crate::error::{Error, Result};

pub struct LanguageSupport {
    name: String,
    grammar: Language,
}

impl fmt::Debug for LanguageSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageSupport")
            .field("name", &self.name)
            .finish()
    }
}

impl LanguageSupport {
    pub fn new(name: impl Into<String>, grammar: Language) -> Result<Self> {
        let name = name.into();
        let mut parser = Parser::new();
        parser
            .set_language(grammar)
            .map_err(|e| Error::Grammar {
                name: name.clone(),
                message: format!("{e:?}"),
            })?;
        Ok(Self { name, grammar })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Highlighted region in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub from: usize,
    pub to: usize,
    pub tag: Tag,
}

pub(crate) struct SyntaxState {
    support: Arc<LanguageSupport>,
    parser: Parser,
    tree: Option<Tree>,
}

impl SyntaxState {
    pub(crate) fn new(support: Arc<LanguageSupport>, rope: &Rope) -> Option<Self> {
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(support.grammar) {
            tracing::warn!(language = %support.name, error = ?e, "grammar rejected by parser");
            return None;
        }
        let tree = parse_rope(&mut parser, rope);
        Some(Self {
            support,
            parser,
            tree,
        })
    }

    pub(crate) fn support(&self) -> &Arc<LanguageSupport> {
        &self.support
    }

    pub(crate) fn reparse(&mut self, rope: &Rope) {
        self.tree = parse_rope(&mut self.parser, rope);
    }

    pub(crate) fn highlight(&self, rope: &Rope) -> Vec<HighlightSpan> {
        match &self.tree {
            Some(tree) => collect_highlights(tree, rope),
            None => Vec::new(),
        }
    }
}

fn parse_rope(parser: &mut Parser, rope: &Rope) -> Option<Tree> {
    let mut cache = RopeChunkCache::new(rope);
    parser.parse_with(&mut |byte_offset, _| cache.bytes_from(byte_offset), None)
}

struct RopeChunkCache<'a> {
    rope: &'a Rope,
    chunk: &'a str,
    start: usize,
    end: usize,
}

impl<'a> RopeChunkCache<'a> {
    fn new(rope: &'a Rope) -> Self {
        Self {
            rope,
            chunk: "",
            start: 0,
            end: 0,
        }
    }

    fn bytes_from(&mut self, byte_offset: usize) -> &'a [u8] {
        if byte_offset >= self.rope.len_bytes() {
            return &[];
        }

        if byte_offset < self.start || byte_offset >= self.end {
            let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(byte_offset);
            self.chunk = chunk;
            self.start = chunk_start;
            self.end = chunk_start + chunk.len();
        }

        let rel = byte_offset.saturating_sub(self.start);
        &self.chunk.as_bytes()[rel..]
    }
}

/// Walks the tree in document order; a classified node hides its children, so spans never overlap.
fn collect_highlights(tree: &Tree, rope: &Rope) -> Vec<HighlightSpan> {
    let mut stack = vec![tree.root_node()];
    let mut spans = Vec::new();
    let len_bytes = rope.len_bytes();

    while let Some(node) = stack.pop() {
        if let Some(tag) = classify(node) {
            let (start, end) = (node.start_byte(), node.end_byte());
            if start < end && end <= len_bytes {
                spans.push(HighlightSpan {
                    from: rope.byte_to_char(start),
                    to: rope.byte_to_char(end),
                    tag,
                });
            }
            continue;
        }

        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    spans
}

fn classify(node: Node<'_>) -> Option<Tag> {
    let kind = node.kind();
    if is_comment_kind(kind) {
        return Some(Tag::Comment);
    }
    if is_string_kind(kind) {
        return Some(Tag::String);
    }
    if !node.is_named() {
        return classify_token(kind);
    }

    match kind {
        "integer" | "float" | "number" | "integer_literal" | "float_literal"
        | "number_literal" | "int_literal" | "float_value" | "decimal_integer_literal"
        | "decimal_floating_point_literal" | "hex_integer_literal" => Some(Tag::Number),
        "true" | "false" | "none" | "null" | "nil" | "boolean" | "boolean_literal"
        | "null_literal" | "boolean_scalar" | "null_scalar" => Some(Tag::Atom),
        "type_identifier" | "primitive_type" | "predefined_type" | "builtin_type"
        | "sized_type_specifier" | "integral_type" | "floating_point_type" => Some(Tag::Type),
        "identifier" | "field_identifier" | "property_identifier" => classify_identifier(node),
        _ => None,
    }
}

fn classify_token(kind: &str) -> Option<Tag> {
    if kind.is_empty() {
        return None;
    }
    if kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return Some(Tag::Keyword);
    }
    if kind
        .chars()
        .all(|c| matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' | '.' | ':'))
    {
        return Some(Tag::Punctuation);
    }
    if kind.chars().all(|c| c.is_ascii_punctuation()) {
        return Some(Tag::Operator);
    }
    None
}

fn classify_identifier(node: Node<'_>) -> Option<Tag> {
    let parent = node.parent()?;
    match parent.kind() {
        "call" | "call_expression" | "method_invocation"
            if node_is_field(parent, "function", node) || node_is_field(parent, "name", node) =>
        {
            Some(Tag::Function)
        }
        "function_definition" | "function_item" | "function_declaration"
        | "method_declaration" | "method_definition"
            if node_is_field(parent, "name", node) =>
        {
            Some(Tag::Function)
        }
        _ => None,
    }
}

fn node_is_field(parent: Node<'_>, field_name: &str, node: Node<'_>) -> bool {
    parent
        .child_by_field_name(field_name)
        .is_some_and(|field| same_node(field, node))
}

fn same_node(left: Node<'_>, right: Node<'_>) -> bool {
    left.start_byte() == right.start_byte() && left.end_byte() == right.end_byte()
}

fn is_comment_kind(kind: &str) -> bool {
    kind.contains("comment")
}

fn is_string_kind(kind: &str) -> bool {
    kind.contains("string") || matches!(kind, "char_literal" | "byte_literal")
}

#[cfg(test)]
#[path = "../../tests/unit/engine/syntax.rs"]
mod tests;
