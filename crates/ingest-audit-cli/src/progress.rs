use indicatif::{ProgressBar, ProgressStyle};
use ingest_audit_core::ProgressReporter;
use std::path::Path;
use std::sync::Mutex;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Load phase: spinner
/// - Detect phase: progress bar over sources
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_load_start(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message("Loading file listing and source profiles...");
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_load_complete(&self, files: usize, profiles: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Load complete: {} files, {} source profiles in {:.2}s",
            files, profiles, duration_secs
        );
    }

    fn on_detect_start(&self, total_sources: usize) {
        let pb = ProgressBar::new(total_sources as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Auditing [{bar:30.cyan/dim}] {pos}/{len} sources",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_source_audited(&self, _source_id: &str, _incidents: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn on_detect_complete(&self, total_incidents: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Detection complete: {} incidents in {:.2}s",
            total_incidents, duration_secs
        );
    }

    fn on_report_written(&self, path: &Path, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Report written to {} in {:.2}s",
            path.display(),
            duration_secs
        );
    }
}
