//! ImGui-based user interface.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{control_panel, ViewerCommand};
