use super::*;
use crate::engine::decoration::DecorationSet;
use crate::engine::extension::UpdateListener;
use crate::engine::keymap::{indent_with_tab, KeyCode};
use crate::engine::syntax::LanguageSupport;
use crate::engine::theme::one_dark;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder {
    updates: Mutex<Vec<ViewUpdate>>,
}

impl Recorder {
    fn doc_changes(&self) -> usize {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.doc_changed)
            .count()
    }
}

impl UpdateListener for Recorder {
    fn update(&self, update: &ViewUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}

fn python() -> Arc<LanguageSupport> {
    Arc::new(LanguageSupport::new("python", tree_sitter_python::language()).unwrap())
}

fn editor(doc: &str) -> (EditorView, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let view = EditorView::new(
        doc,
        vec![
            Extension::BasicSetup,
            Extension::UpdateListener(recorder.clone()),
            Extension::Keymap(indent_with_tab()),
            Extension::IndentUnit("    ".to_string()),
        ],
    );
    (view, recorder)
}

#[test]
fn test_dispatch_applies_changes_and_notifies() {
    let (mut view, recorder) = editor("hello");
    let update = view
        .dispatch(Transaction::changes([ChangeSpec::insert(5, " world")]))
        .unwrap();

    assert!(update.doc_changed);
    assert!(!update.reconfigured);
    assert_eq!(view.doc_string(), "hello world");
    assert_eq!(recorder.doc_changes(), 1);
    assert_eq!(view.undo_depth(), 1);
}

#[test]
fn test_invalid_transaction_leaves_document_untouched() {
    let (mut view, recorder) = editor("abc");
    let err = view
        .dispatch(Transaction::changes([ChangeSpec::delete(2, 9)]))
        .unwrap_err();
    assert!(matches!(err, crate::error::Error::InvalidChange { .. }));
    assert_eq!(view.doc_string(), "abc");
    assert!(recorder.updates.lock().unwrap().is_empty());
}

#[test]
fn test_compartment_reconfigure_keeps_doc_and_history() {
    let language = Compartment::new();
    let theme = Compartment::new();
    let mut view = EditorView::new(
        "x = 1",
        vec![
            Extension::BasicSetup,
            language.of(Extension::empty()),
            theme.of(Extension::empty()),
        ],
    );
    view.dispatch(Transaction::changes([ChangeSpec::insert(5, "0")]))
        .unwrap();
    assert!(view.highlight_spans().is_empty());

    let update = view
        .dispatch(Transaction::effect(
            language.reconfigure(Extension::Language(python())),
        ))
        .unwrap();
    assert!(update.reconfigured);
    assert!(!update.doc_changed);
    assert_eq!(view.language_name(), Some("python"));
    assert_eq!(view.theme_name(), None);
    assert_eq!(view.doc_string(), "x = 10");
    assert_eq!(view.undo_depth(), 1);
    assert!(view
        .highlight_spans()
        .iter()
        .any(|s| s.tag == Tag::Number));

    view.dispatch(Transaction::effect(
        theme.reconfigure(Extension::Theme(Arc::new(one_dark()))),
    ))
    .unwrap();
    assert_eq!(view.language_name(), Some("python"));
    assert_eq!(view.theme_name(), Some("oneDark"));
    assert!(view.styled_spans().iter().any(|s| s.style.is_some()));
}

#[test]
fn test_unknown_compartment_is_ignored() {
    let (mut view, _) = editor("abc");
    let stranger = Compartment::new();
    let update = view
        .dispatch(Transaction::effect(stranger.reconfigure(Extension::Editable(false))))
        .unwrap();
    assert!(!update.reconfigured);
    assert!(view.is_editable());
}

#[test]
fn test_read_only_refuses_user_input_but_not_dispatch() {
    let editable = Compartment::new();
    let mut view = EditorView::new(
        "abc",
        vec![Extension::BasicSetup, editable.of(Extension::Editable(false))],
    );
    assert!(!view.is_editable());
    assert!(view.insert_text("x").unwrap().is_none());
    assert!(view
        .handle_key(Key::new(KeyCode::Backspace))
        .unwrap()
        .is_none());

    view.dispatch(Transaction::changes([ChangeSpec::insert(0, "!")]))
        .unwrap();
    assert_eq!(view.doc_string(), "!abc");
}

#[test]
fn test_typing_moves_cursor() {
    let (mut view, recorder) = editor("");
    view.insert_text("ab").unwrap();
    view.insert_text("c").unwrap();
    assert_eq!(view.doc_string(), "abc");
    assert_eq!(view.selection(), Selection::cursor(3));
    assert_eq!(recorder.doc_changes(), 2);
}

#[test]
fn test_tab_indents_with_unit_and_shift_tab_dedents() {
    let (mut view, _) = editor("fn");
    view.handle_key(Key::new(KeyCode::Tab)).unwrap();
    assert_eq!(view.doc_string(), "    fn");
    view.handle_key(Key::new(KeyCode::Tab).with_shift()).unwrap();
    assert_eq!(view.doc_string(), "fn");
}

#[test]
fn test_enter_keeps_indentation() {
    let (mut view, _) = editor("  a");
    view.dispatch(Transaction::new().with_selection(Selection::cursor(3)))
        .unwrap();
    view.handle_key(Key::new(KeyCode::Enter)).unwrap();
    assert_eq!(view.doc_string(), "  a\n  ");
    assert_eq!(view.selection(), Selection::cursor(6));
}

#[test]
fn test_backspace_removes_grapheme() {
    let (mut view, _) = editor("");
    view.insert_text("ae\u{301}").unwrap();
    view.handle_key(Key::new(KeyCode::Backspace)).unwrap();
    assert_eq!(view.doc_string(), "a");
}

#[test]
fn test_backspace_and_left_treat_crlf_as_one_break() {
    let (mut view, _) = editor("a\r\nb");
    view.dispatch(Transaction::new().with_selection(Selection::cursor(3)))
        .unwrap();
    view.handle_key(Key::new(KeyCode::ArrowLeft)).unwrap();
    assert_eq!(view.selection(), Selection::cursor(1));

    view.dispatch(Transaction::new().with_selection(Selection::cursor(3)))
        .unwrap();
    view.handle_key(Key::new(KeyCode::Backspace)).unwrap();
    assert_eq!(view.doc_string(), "ab");
    assert_eq!(view.selection(), Selection::cursor(1));
}

#[test]
fn test_undo_restores_previous_document() {
    let (mut view, _) = editor("one");
    view.dispatch(Transaction::changes([ChangeSpec::replace(0, 3, "two")]))
        .unwrap();
    let update = view.undo().unwrap().unwrap();
    assert_eq!(update.user_event, Some(USER_EVENT_UNDO));
    assert_eq!(view.doc_string(), "one");
    assert_eq!(view.undo_depth(), 0);
    assert!(view.undo().unwrap().is_none());
}

#[test]
fn test_decorations_are_clipped() {
    let marks = Compartment::new();
    let mut view = EditorView::new("abc", vec![marks.of(Extension::Decorations(DecorationSet::none()))]);
    let mark = Decoration::mark("cm-test");
    view.dispatch(Transaction::effect(marks.reconfigure(Extension::Decorations(
        DecorationSet::of(vec![mark.range(1, 10), mark.range(7, 9)]),
    ))))
    .unwrap();

    let decorations = view.decorations();
    assert_eq!(decorations.len(), 1);
    assert_eq!(decorations[0].0, 1..3);
    assert_eq!(decorations[0].1.class(), "cm-test");
}

#[test]
fn test_whitespace_ranges_only_when_enabled() {
    let plain = EditorView::new("a  b\tc", Vec::new());
    assert!(plain.whitespace_ranges().is_empty());

    let view = EditorView::new("a  b\tc ", vec![Extension::HighlightWhitespace]);
    assert_eq!(view.whitespace_ranges(), vec![1..3, 4..5, 6..7]);
}

#[test]
fn test_defaults_without_extensions() {
    let view = EditorView::new("", Vec::new());
    assert!(view.is_editable());
    assert_eq!(view.indent_unit(), DEFAULT_INDENT_UNIT);
    assert!(!view.line_wrapping());
    assert!(view.theme().is_none());
}
