use std::path::PathBuf;
use std::time::Duration;

use codepane::config;
use codepane::engine::{Key, KeyCode};
use codepane::logging;
use codepane::{widget_events, BuiltinModuleLoader, CodeWidget, WidgetEvent, WidgetRuntime};

const SETTLE: Duration = Duration::from_millis(200);

fn main() -> std::io::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_or_default(config_path.as_deref());
    let _logging = logging::init(config.log_dir.as_deref());

    let runtime = WidgetRuntime::new(BuiltinModuleLoader::shared())?;
    let (events_tx, mut events_rx) = widget_events();
    let mut widget = CodeWidget::new(config.props.clone(), config.path_prefix.clone(), events_tx);

    if let Some(effect) = widget.mount() {
        runtime.run(widget.id(), effect);
    }
    runtime.settle(&mut widget, SETTLE);

    let languages = runtime.block_on(widget.languages()).map_err(std::io::Error::other)?;
    let themes = runtime.block_on(widget.themes()).map_err(std::io::Error::other)?;
    println!("languages: {}", languages.join(", "));
    println!("themes: {}", themes.join(", "));

    if let Some(view) = widget.editor_mut() {
        view.insert_text("// codepane\n").map_err(std::io::Error::other)?;
        view.handle_key(Key::new(KeyCode::Tab)).map_err(std::io::Error::other)?;
    }

    for event in events_rx.drain() {
        match event {
            WidgetEvent::ValueChanged { widget, changes } => {
                let delta = serde_json::to_string(&changes).map_err(std::io::Error::other)?;
                println!("{widget}: {delta}");
            }
        }
    }
    println!("{}", widget.value());

    widget.unmount();
    Ok(())
}
