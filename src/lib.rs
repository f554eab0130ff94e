// src/lib.rs
//! arview
//!
//! A 3D asset viewer with drag-to-rotate input that hands off to an
//! augmented-reality presentation on the current device: a native AR viewer
//! on platforms that have one, an immersive session everywhere else that
//! supports it.

pub mod app;
pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod gfx;
pub mod input;
pub mod prelude;
pub mod ui;
pub mod xr;

// Re-export main types for convenience
pub use app::ArViewerApp;
pub use config::ViewerConfig;
