use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "basicLight";
pub const DEFAULT_INDENT: &str = "    ";
pub const DEFAULT_RESOURCE_PATH: &str = "codemirror";

/// Host-visible widget properties. `resource_path`, `line_wrapping`, `indent` and
/// `highlight_whitespace` are only read when the editor is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetProps {
    pub value: String,
    pub language: Option<String>,
    pub theme: String,
    pub resource_path: String,
    pub line_wrapping: bool,
    pub disable: bool,
    pub indent: String,
    pub highlight_whitespace: bool,
}

impl Default for WidgetProps {
    fn default() -> Self {
        Self {
            value: String::new(),
            language: None,
            theme: DEFAULT_THEME.to_string(),
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            line_wrapping: false,
            disable: false,
            indent: DEFAULT_INDENT.to_string(),
            highlight_whitespace: false,
        }
    }
}

/// A change to one of the watched properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropChange {
    Value(String),
    Language(Option<String>),
    Theme(String),
    Disable(bool),
}
