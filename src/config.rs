use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::widget::WidgetProps;

const CONFIG_DIR: &str = "codepane";
const CONFIG_FILE: &str = "widget.json";

/// Host-side widget configuration. Props are flattened into the top-level object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub path_prefix: String,
    pub log_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub props: WidgetProps,
}

pub fn default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn load_config(path: &Path) -> Result<WidgetConfig> {
    let data = std::fs::read_to_string(path)?;
    let config: WidgetConfig = serde_json::from_str(&data)?;
    if config.props.indent.is_empty() {
        return Err(Error::Config(format!(
            "{}: indent must not be empty",
            path.display()
        )));
    }
    Ok(config)
}

/// Reads `path` (or the default location); any failure yields the defaults.
pub fn load_or_default(path: Option<&Path>) -> WidgetConfig {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => return WidgetConfig::default(),
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no widget config; using defaults");
        return WidgetConfig::default();
    }
    match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "invalid widget config; using defaults"
            );
            WidgetConfig::default()
        }
    }
}

fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"));
    }

    #[cfg(target_os = "windows")]
    {
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
