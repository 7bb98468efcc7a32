use super::*;
use crate::engine::{EditorView, Key, KeyCode, ViewUpdate};

struct Silent;

impl UpdateListener for Silent {
    fn update(&self, _update: &ViewUpdate) {}
}

#[test]
fn test_assembly_order() {
    let registry = CompartmentRegistry::new();
    let extensions = assemble(&WidgetProps::default(), &registry, Arc::new(Silent));

    assert_eq!(extensions.len(), 9);
    assert!(matches!(extensions[0], Extension::BasicSetup));
    assert!(matches!(extensions[1], Extension::UpdateListener(_)));
    assert!(matches!(extensions[2], Extension::Keymap(_)));
    assert!(matches!(&extensions[3], Extension::IndentUnit(unit) if unit == "    "));
    for (i, slot) in crate::widget::compartments::Slot::ALL.iter().enumerate() {
        assert!(
            matches!(&extensions[4 + i], Extension::Compartment(c, _) if *c == registry.compartment(*slot))
        );
    }
    assert!(matches!(extensions[8], Extension::BaseTheme(_)));
}

#[test]
fn test_optional_behaviors_are_appended() {
    let registry = CompartmentRegistry::new();
    let props = WidgetProps {
        line_wrapping: true,
        highlight_whitespace: true,
        ..WidgetProps::default()
    };
    let extensions = assemble(&props, &registry, Arc::new(Silent));
    assert_eq!(extensions.len(), 11);
    assert!(matches!(extensions[9], Extension::LineWrapping));
    assert!(matches!(extensions[10], Extension::HighlightWhitespace));
}

#[test]
fn test_assembled_view() {
    let registry = CompartmentRegistry::new();
    let props = WidgetProps {
        indent: "\t".to_string(),
        line_wrapping: true,
        ..WidgetProps::default()
    };
    let mut view = EditorView::new("x", assemble(&props, &registry, Arc::new(Silent)));

    assert!(view.line_wrapping());
    assert!(!view.highlights_whitespace());
    assert_eq!(view.indent_unit(), "\t");
    let style = view.style_for_class(HIGHLIGHT_CLASS).unwrap();
    assert!(style.bg.is_some());

    view.handle_key(Key::new(KeyCode::Tab)).unwrap();
    assert_eq!(view.doc_string(), "\tx");
}
