use std::sync::Arc;

use super::compartments::CompartmentRegistry;
use super::highlight::{HIGHLIGHT_BACKGROUND, HIGHLIGHT_CLASS};
use super::props::WidgetProps;
use crate::engine::{indent_with_tab, BaseTheme, Extension, UpdateListener};

/// Builds the fixed extension list handed to the editor at creation.
pub fn assemble(
    props: &WidgetProps,
    registry: &CompartmentRegistry,
    forwarder: Arc<dyn UpdateListener>,
) -> Vec<Extension> {
    let mut extensions = vec![
        Extension::BasicSetup,
        Extension::UpdateListener(forwarder),
        Extension::Keymap(indent_with_tab()),
        Extension::IndentUnit(props.indent.clone()),
    ];
    extensions.extend(registry.extensions());
    extensions.push(Extension::BaseTheme(base_theme()));

    if props.line_wrapping {
        extensions.push(Extension::LineWrapping);
    }
    if props.highlight_whitespace {
        extensions.push(Extension::HighlightWhitespace);
    }

    extensions
}

fn base_theme() -> BaseTheme {
    BaseTheme::new()
        .rule("&", &[("height", "100%")])
        .rule(".cm-scroller", &[("overflow", "auto")])
        .rule(
            &format!(".{HIGHLIGHT_CLASS}"),
            &[("backgroundColor", HIGHLIGHT_BACKGROUND)],
        )
}

#[cfg(test)]
#[path = "../../tests/unit/widget/extensions.rs"]
mod tests;
