use super::*;

fn python() -> Arc<LanguageSupport> {
    Arc::new(LanguageSupport::new("python", tree_sitter_python::language()).unwrap())
}

fn tags(spans: &[HighlightSpan], rope: &Rope) -> Vec<(String, Tag)> {
    spans
        .iter()
        .map(|span| (rope.slice(span.from..span.to).to_string(), span.tag))
        .collect()
}

#[test]
fn test_python_call_highlights() {
    let rope = Rope::from_str("print(1)");
    let state = SyntaxState::new(python(), &rope).unwrap();
    let spans = tags(&state.highlight(&rope), &rope);

    assert!(spans.contains(&("print".to_string(), Tag::Function)));
    assert!(spans.contains(&("1".to_string(), Tag::Number)));
    assert!(spans.contains(&("(".to_string(), Tag::Punctuation)));
}

#[test]
fn test_comments_strings_and_keywords() {
    let rope = Rope::from_str("def f():\n    return 'x'  # done\n");
    let state = SyntaxState::new(python(), &rope).unwrap();
    let spans = tags(&state.highlight(&rope), &rope);

    assert!(spans.contains(&("def".to_string(), Tag::Keyword)));
    assert!(spans.contains(&("f".to_string(), Tag::Function)));
    assert!(spans.contains(&("return".to_string(), Tag::Keyword)));
    assert!(spans.contains(&("'x'".to_string(), Tag::String)));
    assert!(spans.contains(&("# done".to_string(), Tag::Comment)));
}

#[test]
fn test_spans_use_char_offsets() {
    let rope = Rope::from_str("s = 'é'\nn = 2");
    let state = SyntaxState::new(python(), &rope).unwrap();
    let spans = state.highlight(&rope);
    let number = spans.iter().find(|s| s.tag == Tag::Number).unwrap();
    assert_eq!(rope.slice(number.from..number.to).to_string(), "2");
    assert_eq!(number.from, 12);
}

#[test]
fn test_spans_do_not_overlap() {
    let rope = Rope::from_str("x = [1, 'a', None]\n");
    let state = SyntaxState::new(python(), &rope).unwrap();
    let spans = state.highlight(&rope);
    for pair in spans.windows(2) {
        assert!(pair[0].to <= pair[1].from);
    }
}

#[test]
fn test_reparse_after_edit() {
    let mut rope = Rope::from_str("a = 1");
    let mut state = SyntaxState::new(python(), &rope).unwrap();
    rope.insert(5, "  # c");
    state.reparse(&rope);
    let spans = tags(&state.highlight(&rope), &rope);
    assert!(spans.contains(&("# c".to_string(), Tag::Comment)));
}

#[test]
fn test_classify_token() {
    assert_eq!(classify_token("while"), Some(Tag::Keyword));
    assert_eq!(classify_token("{"), Some(Tag::Punctuation));
    assert_eq!(classify_token("+="), Some(Tag::Operator));
    assert_eq!(classify_token(""), None);
}
