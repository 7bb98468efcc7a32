use super::*;

fn current_thread() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn test_builtin_catalog_names_are_unique() {
    let module = EngineModule::builtin().unwrap();
    let mut names: Vec<&str> = module.languages().iter().map(|l| l.name()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
    assert!(names.contains(&"python"));
    assert!(names.contains(&"rust"));
}

#[test]
fn test_builtin_themes_include_factory() {
    let themes = builtin_themes().unwrap();
    assert!(themes["basicLight"].as_theme().is_some());
    assert!(themes["basicDark"].as_theme().unwrap().is_dark());
    assert!(themes["createTheme"].as_theme().is_none());
}

#[test]
fn test_language_load_is_memoized() {
    let rt = current_thread();
    let python = builtin_languages()
        .into_iter()
        .find(|l| l.name() == "python")
        .unwrap();
    assert!(python.loaded().is_none());

    let first = rt.block_on(python.load()).unwrap();
    let second = rt.block_on(python.load()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&python.loaded().unwrap(), &first));
    assert_eq!(first.name(), "python");
}

#[test]
fn test_every_builtin_grammar_loads() {
    let rt = current_thread();
    for language in builtin_languages() {
        let support = rt.block_on(language.load());
        assert!(support.is_ok(), "{} failed to load", language.name());
    }
}

#[test]
fn test_manifest_narrows_languages_and_adds_themes() {
    let manifest: ModuleManifest = serde_json::from_str(
        r##"{
            "languages": ["Python", "JSON", "cobol"],
            "themes": {
                "paper": { "background": "#fafafa", "foreground": "#111111" }
            }
        }"##,
    )
    .unwrap();
    let module = EngineModule::from_manifest(&manifest).unwrap();

    let names: Vec<&str> = module.languages().iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["json", "python"]);
    assert!(module.themes()["paper"].as_theme().is_some());
    assert!(module.themes().contains_key("basicLight"));
}

#[test]
fn test_empty_manifest_keeps_everything() {
    let module = EngineModule::from_manifest(&ModuleManifest::default()).unwrap();
    assert_eq!(module.languages().len(), builtin_languages().len());
}

#[test]
fn test_manifest_with_bad_theme_fails() {
    let manifest: ModuleManifest = serde_json::from_str(
        r##"{ "themes": { "broken": { "background": "nope", "foreground": "#000000" } } }"##,
    )
    .unwrap();
    assert!(EngineModule::from_manifest(&manifest).is_err());
}
