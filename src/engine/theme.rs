//! Color themes: tag style rules plus inline selector rules for editor chrome.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

pub fn parse_color(value: &str) -> Option<Color> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    if let Some(hex) = v.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return match hex.len() {
            6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        };
    }

    let c = match v.to_ascii_lowercase().as_str() {
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(0xFF, 0xFF, 0xFF),
        "red" => Color::rgb(0xFF, 0, 0),
        "green" => Color::rgb(0, 0x80, 0),
        "blue" => Color::rgb(0, 0, 0xFF),
        "yellow" => Color::rgb(0xFF, 0xFF, 0),
        "gray" | "grey" => Color::rgb(0x80, 0x80, 0x80),
        "transparent" => Color::rgba(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

/// Syntax categories produced by the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tag {
    Comment,
    String,
    Number,
    Keyword,
    Atom,
    Type,
    Function,
    Operator,
    Punctuation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub tag: Tag,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    dark: bool,
    background: Color,
    foreground: Color,
    selection: Color,
    rules: Vec<StyleRule>,
}

impl Theme {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn selection(&self) -> Color {
        self.selection
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// First matching rule wins.
    pub fn style_for(&self, tag: Tag) -> Option<Style> {
        self.rules.iter().find(|r| r.tag == tag).map(|r| r.style)
    }
}

/// Serialized theme shape, as found in the embedded catalog and in module manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSpec {
    #[serde(default)]
    pub dark: bool,
    pub background: String,
    pub foreground: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(default)]
    pub styles: Vec<TagStyleSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStyleSpec {
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

pub fn create_theme(name: &str, spec: &ThemeSpec) -> Result<Theme> {
    let color = |value: &str| {
        parse_color(value).ok_or_else(|| {
            Error::Config(format!("theme {name}: invalid color {value:?}"))
        })
    };
    let optional = |value: &Option<String>| value.as_deref().map(|v| color(v)).transpose();

    let background = color(spec.background.as_str())?;
    let foreground = color(spec.foreground.as_str())?;
    let selection = match &spec.selection {
        Some(value) => color(value.as_str())?,
        None if spec.dark => Color::rgb(0x3E, 0x44, 0x51),
        None => Color::rgb(0xD7, 0xD4, 0xF0),
    };

    let mut rules = Vec::with_capacity(spec.styles.len());
    for style in &spec.styles {
        rules.push(StyleRule {
            tag: style.tag,
            style: Style {
                fg: optional(&style.color)?,
                bg: optional(&style.background)?,
                bold: style.font_weight.as_deref() == Some("bold"),
                italic: style.font_style.as_deref() == Some("italic"),
            },
        });
    }

    Ok(Theme {
        name: name.to_string(),
        dark: spec.dark,
        background,
        foreground,
        selection,
        rules,
    })
}

pub fn one_dark() -> Theme {
    let fg = |c: Color| Style {
        fg: Some(c),
        ..Style::default()
    };
    let rules = vec![
        StyleRule {
            tag: Tag::Comment,
            style: Style {
                italic: true,
                ..fg(Color::rgb(0x7D, 0x87, 0x99))
            },
        },
        StyleRule {
            tag: Tag::Keyword,
            style: fg(Color::rgb(0xC6, 0x78, 0xDD)),
        },
        StyleRule {
            tag: Tag::String,
            style: fg(Color::rgb(0x98, 0xC3, 0x79)),
        },
        StyleRule {
            tag: Tag::Number,
            style: fg(Color::rgb(0xD1, 0x9A, 0x66)),
        },
        StyleRule {
            tag: Tag::Atom,
            style: fg(Color::rgb(0xD1, 0x9A, 0x66)),
        },
        StyleRule {
            tag: Tag::Type,
            style: fg(Color::rgb(0xE5, 0xC0, 0x7B)),
        },
        StyleRule {
            tag: Tag::Function,
            style: fg(Color::rgb(0x61, 0xAF, 0xEF)),
        },
        StyleRule {
            tag: Tag::Operator,
            style: fg(Color::rgb(0x56, 0xB6, 0xC2)),
        },
    ];

    Theme {
        name: "oneDark".to_string(),
        dark: true,
        background: Color::rgb(0x28, 0x2C, 0x34),
        foreground: Color::rgb(0xAB, 0xB2, 0xBF),
        selection: Color::rgb(0x3E, 0x44, 0x51),
        rules,
    }
}

/// Inline selector rules (`&`, `.cm-scroller`, `.cm-<class>`) with CSS-like properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTheme {
    rules: Vec<(String, Vec<(String, String)>)>,
}

impl BaseTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, selector: &str, properties: &[(&str, &str)]) -> Self {
        let properties = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.rules.push((selector.to_string(), properties));
        self
    }

    pub fn properties(&self, selector: &str) -> Option<&[(String, String)]> {
        self.rules
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, props)| props.as_slice())
    }

    pub fn class_style(&self, class: &str) -> Option<Style> {
        let props = self.properties(&format!(".{class}"))?;
        let mut style = Style::default();
        for (key, value) in props {
            match key.as_str() {
                "color" => style.fg = parse_color(value),
                "backgroundColor" => style.bg = parse_color(value),
                "fontWeight" => style.bold = value == "bold",
                "fontStyle" => style.italic = value == "italic",
                _ => {}
            }
        }
        Some(style)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/theme.rs"]
mod tests;
