//! codepane - embeddable code editing widget core
//!
//! Modules:
//! - engine: the editor engine (document, transactions, compartments, syntax, themes)
//! - widget: the widget surface (module loading, compartments, resolver, value sync, highlight)
//! - config: host-side widget configuration
//! - logging: tracing setup

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod widget;

pub use error::{Error, Result};
pub use widget::{
    widget_events, BuiltinModuleLoader, CodeWidget, Effect, PropChange, WidgetEvent,
    WidgetMessage, WidgetProps, WidgetRuntime,
};
