//! # Diagnostics
//!
//! Append-only, timestamped trail of AR activation steps. The trail is reset
//! at the start of every activation and only ever read to build the failure
//! report shown to the user; it never drives control flow.

use std::fmt::Write;
use std::time::{Duration, Instant};

use crate::xr::error::ArFailure;
use crate::xr::session::Milestones;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    /// Time since the activation started
    pub at: Duration,
    pub message: String,
}

#[derive(Debug)]
pub struct DiagnosticsLog {
    started: Instant,
    entries: Vec<DiagnosticEntry>,
}

impl DiagnosticsLog {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Vec::new(),
        }
    }

    /// Starts a new trail for the next activation attempt
    pub fn reset(&mut self) {
        self.started = Instant::now();
        self.entries.clear();
    }

    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("[ar] {message}");

        // Instant is monotonic, but keep the ordering invariant explicit.
        let last = self.entries.last().map_or(Duration::ZERO, |e| e.at);
        let at = self.started.elapsed().max(last);
        self.entries.push(DiagnosticEntry { at, message });
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the user-facing failure report: message, classification, cause,
/// every recorded step with its timestamp and the milestone snapshot.
pub fn compose_failure_report(
    failure: &ArFailure,
    log: &DiagnosticsLog,
    milestones: &Milestones,
) -> String {
    let mut report = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(report, "{}", failure.message);
    let _ = writeln!(report, "Classification: {}", failure.kind);
    if let Some(cause) = &failure.cause {
        let _ = writeln!(report, "Cause: {cause}");
    }

    report.push_str("Steps:\n");
    for entry in log.entries() {
        let _ = writeln!(report, "  [+{}ms] {}", entry.at.as_millis(), entry.message);
    }

    report.push_str("Milestones:\n");
    for (name, reached) in milestones.entries() {
        let _ = writeln!(report, "  {name}: {reached}");
    }

    report
}
