//! # User Interface Module
//!
//! User-facing surfaces of the viewer: the [`StatusSurface`] the AR
//! orchestrator reports through, a recording [`StatusBoard`] implementation,
//! and a Dear ImGui [`debug_panel`] that draws the board next to the detected
//! capability profile.

pub mod panel;
pub mod status;

pub use panel::{debug_panel, DebugInfo};
pub use status::{StatusBoard, StatusSurface};
