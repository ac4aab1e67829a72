//! # User Interface Module
//!
//! Dear ImGui overlay for the showcase.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture and
//!   frame rendering
//! - [`panel`] - the settings window with the material and mesh selectors
//!
//! When the UI wants the mouse or keyboard, camera input is withheld so dragging a
//! combo box does not spin the view.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{settings_panel, OverlayStats, Selection, SettingsChange};
