//! User-facing status surfaces: the loading indicator, the blocking failure
//! report and the debug panel's appended lines.

use std::cell::{Cell, RefCell};

/// Where the orchestrator reports progress and failures
pub trait StatusSurface {
    /// Toggles the non-blocking loading indicator
    fn set_loading(&self, visible: bool);

    /// Presents a blocking failure report
    fn show_failure(&self, report: &str);

    /// Appends a line to the live debug panel
    fn append_debug(&self, line: &str);
}

/// Records the surfaces' state for the imgui panel to draw
#[derive(Debug, Default)]
pub struct StatusBoard {
    loading: Cell<bool>,
    failure: RefCell<Option<String>>,
    debug_lines: RefCell<Vec<String>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn failure(&self) -> Option<String> {
        self.failure.borrow().clone()
    }

    /// Clears the failure report once the user dismissed it
    pub fn dismiss_failure(&self) {
        self.failure.borrow_mut().take();
    }

    pub fn debug_lines(&self) -> Vec<String> {
        self.debug_lines.borrow().clone()
    }
}

impl StatusSurface for StatusBoard {
    fn set_loading(&self, visible: bool) {
        self.loading.set(visible);
    }

    fn show_failure(&self, report: &str) {
        log::error!("{report}");
        *self.failure.borrow_mut() = Some(report.to_string());
    }

    fn append_debug(&self, line: &str) {
        self.debug_lines.borrow_mut().push(line.to_string());
    }
}
