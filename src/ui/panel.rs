//! Debug panel for the viewer
//!
//! Mirrors the detected capability profile and the AR activation status so
//! field failures can be read off the screen.

use crate::xr::capability::{CapabilityProfile, HostEnvironment};
use crate::xr::session::SessionPhase;

use super::status::StatusBoard;

/// Snapshot of everything the debug panel shows
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub platform: String,
    pub user_agent: String,
    pub viewer_only: bool,
    pub has_xr: bool,
    pub phase: SessionPhase,
}

impl DebugInfo {
    pub fn new(env: &HostEnvironment, profile: &CapabilityProfile, phase: SessionPhase) -> Self {
        Self {
            platform: env.platform.clone(),
            user_agent: env.user_agent.clone(),
            viewer_only: profile.is_viewer_only(),
            has_xr: profile.has_immersive_api,
            phase,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Platform: {}", self.platform),
            format!("UserAgent: {}", self.user_agent),
            format!("Viewer only: {}", self.viewer_only),
            format!("hasXR: {}", self.has_xr),
            format!("AR phase: {}", self.phase),
        ]
    }
}

/// Draws the device info window, the loading indicator and any pending
/// failure report
pub fn debug_panel(ui: &imgui::Ui, info: &DebugInfo, status: &StatusBoard) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("Device Info")
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .size([360.0, 220.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            for line in info.lines() {
                ui.text_wrapped(&line);
            }
            for line in status.debug_lines() {
                ui.text_colored([1.0, 0.4, 0.4, 1.0], &line);
            }
            if status.is_loading() {
                ui.separator();
                ui.text("Starting AR...");
            }
        });

    if let Some(report) = status.failure() {
        let mut dismissed = false;
        ui.window("AR unavailable")
            .position(
                [display_size[0] * 0.5, display_size[1] * 0.5],
                imgui::Condition::Always,
            )
            .position_pivot([0.5, 0.5])
            .always_auto_resize(true)
            .build(|| {
                ui.text(&report);
                if ui.button("OK") {
                    dismissed = true;
                }
            });
        if dismissed {
            status.dismiss_failure();
        }
    }
}
