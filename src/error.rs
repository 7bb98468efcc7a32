use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("language not found: {name}")]
    LanguageNotFound { name: String, known: Vec<String> },
    #[error("theme not found: {name}")]
    ThemeNotFound { name: String },
    #[error("editor is not ready")]
    NotReady,
    #[error("widget was unmounted")]
    Unmounted,
    #[error("invalid change {from}..{to} for document of length {len}")]
    InvalidChange { from: usize, to: usize, len: usize },
    #[error("failed to load editor module: {0}")]
    ModuleLoad(String),
    #[error("failed to load grammar for {name}: {message}")]
    Grammar { name: String, message: String },
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
