//! Progress indicators for the Splunk CLI.
//!
//! Responsibilities:
//! - Render job polling progress as an `indicatif` bar fed by the poller's
//!   `ProgressSink` callbacks.
//! - Provide a spinner for operations of unknown length (exports, uploads).
//! - Write ALL progress output to STDERR so command output on stdout stays
//!   machine-readable.
//!
//! Non-responsibilities:
//! - This module does not decide *when* progress should be shown; callers
//!   pass `enabled = !quiet`.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use splunk_as_client::{JobProgress, ProgressSink};
use std::time::Duration;

/// Percent-based progress bar for a search job (0-100%).
///
/// No-op when disabled.
pub(crate) struct SearchProgress {
    pb: Option<ProgressBar>,
}

impl SearchProgress {
    pub(crate) fn new(enabled: bool, sid: &str) -> Self {
        if !enabled {
            return Self { pb: None };
        }

        let pb = ProgressBar::new(100);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template("{spinner} {prefix} {msg} [{bar:40.cyan/blue}] {pos:>3}%")
                .expect("template is a compile-time constant with valid syntax")
                .progress_chars("=>-"),
        );
        pb.set_prefix(sid.to_string());
        pb.set_message("QUEUED");
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb: Some(pb) }
    }

    /// Finish with a stable final line (on STDERR).
    pub(crate) fn finish(&self, progress: &JobProgress) {
        let Some(pb) = &self.pb else {
            return;
        };

        if progress.is_done() {
            pb.set_position(100);
        }
        pb.finish_with_message(format!(
            "{} ({} results, {:.1}s)",
            progress.state, progress.result_count, progress.run_duration
        ));
    }
}

impl ProgressSink for SearchProgress {
    fn on_progress(&mut self, progress: &JobProgress) {
        let Some(pb) = &self.pb else {
            return;
        };

        pb.set_position(percent(progress.progress_percent));
        pb.set_message(format!(
            "{} {} events",
            progress.state, progress.event_count
        ));
    }
}

impl Drop for SearchProgress {
    fn drop(&mut self) {
        // An error or Ctrl-C skipped `finish`; clear the line before the message prints.
        if let Some(pb) = &self.pb
            && !pb.is_finished()
        {
            pb.finish_and_clear();
        }
    }
}

/// Splunk's `doneProgress` fraction as a whole percentage.
fn percent(fraction: f64) -> u64 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u64
}

/// An indefinite spinner for short or unknown-duration operations.
///
/// Always draws to STDERR; no-op when disabled.
pub(crate) struct Spinner {
    label: String,
    pb: Option<ProgressBar>,
}

impl Spinner {
    pub(crate) fn new(enabled: bool, label: impl Into<String>) -> Self {
        let label = label.into();

        if !enabled {
            return Self { label, pb: None };
        }

        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("template is a compile-time constant with valid syntax"),
        );
        pb.set_message(label.clone());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            label,
            pb: Some(pb),
        }
    }

    /// Replace the spinner message.
    pub(crate) fn set_message(&self, message: impl Into<String>) {
        if let Some(pb) = &self.pb {
            pb.set_message(message.into());
        }
    }

    pub(crate) fn finish(&self) {
        let Some(pb) = &self.pb else {
            return;
        };

        pb.finish_with_message(format!("{} done", self.label));
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = &self.pb
            && !pb.is_finished()
        {
            pb.finish_and_clear();
        }
    }
}
