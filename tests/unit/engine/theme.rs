use super::*;

fn spec(background: &str) -> ThemeSpec {
    ThemeSpec {
        dark: false,
        background: background.to_string(),
        foreground: "#000000".to_string(),
        selection: None,
        styles: vec![
            TagStyleSpec {
                tag: Tag::Keyword,
                color: Some("#0000ff".to_string()),
                background: None,
                font_weight: Some("bold".to_string()),
                font_style: None,
            },
            TagStyleSpec {
                tag: Tag::Keyword,
                color: Some("red".to_string()),
                background: None,
                font_weight: None,
                font_style: None,
            },
        ],
    }
}

#[test]
fn test_parse_color() {
    assert_eq!(parse_color("#ff0080"), Some(Color::rgb(0xFF, 0, 0x80)));
    assert_eq!(parse_color("#ffeb3b50"), Some(Color::rgba(0xFF, 0xEB, 0x3B, 0x50)));
    assert_eq!(parse_color(" White "), Some(Color::rgb(0xFF, 0xFF, 0xFF)));
    assert_eq!(parse_color("#fff"), None);
    assert_eq!(parse_color("#zzzzzz"), None);
    assert_eq!(parse_color("chartreuse"), None);
    assert_eq!(parse_color(""), None);
}

#[test]
fn test_create_theme_first_rule_wins() {
    let theme = create_theme("plain", &spec("#ffffff")).unwrap();
    assert_eq!(theme.name(), "plain");
    assert!(!theme.is_dark());
    let style = theme.style_for(Tag::Keyword).unwrap();
    assert_eq!(style.fg, Some(Color::rgb(0, 0, 0xFF)));
    assert!(style.bold);
    assert_eq!(theme.style_for(Tag::Comment), None);
    assert_eq!(theme.selection(), Color::rgb(0xD7, 0xD4, 0xF0));
}

#[test]
fn test_create_theme_rejects_bad_color() {
    let err = create_theme("broken", &spec("nope")).unwrap_err();
    assert!(matches!(err, Error::Config(msg) if msg.contains("broken")));
}

#[test]
fn test_one_dark() {
    let theme = one_dark();
    assert_eq!(theme.name(), "oneDark");
    assert!(theme.is_dark());
    assert!(theme.style_for(Tag::Comment).unwrap().italic);
}

#[test]
fn test_base_theme_class_style() {
    let base = BaseTheme::new()
        .rule("&", &[("height", "100%")])
        .rule(".cm-mark", &[("backgroundColor", "#ffeb3b50"), ("fontStyle", "italic")]);

    assert_eq!(
        base.properties("&"),
        Some(&[("height".to_string(), "100%".to_string())][..])
    );
    let style = base.class_style("cm-mark").unwrap();
    assert_eq!(style.bg, Some(Color::rgba(0xFF, 0xEB, 0x3B, 0x50)));
    assert!(style.italic);
    assert_eq!(base.class_style("cm-other"), None);
}
