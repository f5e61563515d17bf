//! Run reports printed to the terminal.
//!
//! Everything goes to stderr so `encode`/`decode` output on stdout stays
//! pipeable.

use std::fmt::Write;
use std::path::Path;

use console::{Style, Term};
use documl_diagrams::RenderError;
use documl_plugin::RunStats;

/// Terminal reporter for documl runs.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    warn: Style,
    failed: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            failed: Style::new().red(),
        }
    }

    fn line(&self, style: Option<&Style>, msg: &str) {
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }

    /// Announce what a command is about to process.
    pub(crate) fn start(&self, msg: &str) {
        self.line(None, msg);
    }

    /// Summary of `documl resolve`.
    pub(crate) fn resolved(&self, stats: RunStats, target: &Path) {
        self.line(Some(&self.ok), &resolve_summary(stats, target));
    }

    /// One image of a page that could not be rendered.
    pub(crate) fn image_failed(&self, page: &Path, failure: &RenderError) {
        self.line(Some(&self.warn), &format!("  {}: {failure}", page.display()));
    }

    /// Summary of `documl render`, green only when every image was written.
    pub(crate) fn rendered(&self, stats: RunStats) {
        let style = if stats.image_failures == 0 {
            &self.ok
        } else {
            &self.warn
        };
        self.line(Some(style), &render_summary(stats));
    }

    /// A command failed.
    pub(crate) fn error(&self, msg: &str) {
        self.line(Some(&self.failed), &format!("Error: {msg}"));
    }
}

fn resolve_summary(stats: RunStats, target: &Path) -> String {
    format!(
        "Injected {} class diagrams, converted {} <uml> tags -> {}",
        stats.diagrams_injected,
        stats.tags_converted,
        target.display()
    )
}

fn render_summary(stats: RunStats) -> String {
    let mut summary = format!(
        "Rewrote {} pages, wrote {} images",
        stats.pages_rewritten, stats.images_written
    );
    if stats.image_failures > 0 {
        let _ = write!(summary, ", {} failed", stats.image_failures);
    }
    summary
}
