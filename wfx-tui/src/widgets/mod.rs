//! UI widgets for WFX

mod matrix;
mod spectrum;
pub mod status_bar;

pub use matrix::{cell_colors, MatrixWidget};
pub use spectrum::SpectrumWidget;
pub use status_bar::{capability_badges, HelpWidget, StatusBarWidget};
