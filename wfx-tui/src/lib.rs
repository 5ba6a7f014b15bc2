//! Terminal preview for WFX - matrix widget, status bar, themes

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, AudioStatus, MessageType};
pub use theme::{Theme, ALL_THEMES, AMBER, MIDNIGHT, PHOSPHOR};
pub use widgets::{HelpWidget, MatrixWidget, SpectrumWidget, StatusBarWidget};
