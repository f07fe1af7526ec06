/*!
 * Progress reporting for export and import
 */

use std::fmt;

use indicatif::ProgressBar;

/// One advisory event per processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A file was written into the export document
    Exported(String),
    /// A file was restored from an export document
    Imported(String),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exported(path) => write!(f, "Exported: {}", path),
            Self::Imported(path) => write!(f, "Imported: {}", path),
        }
    }
}

/// Trait for observing per-file progress
pub trait ProgressReporter {
    /// Called once for each processed file
    fn report(&self, event: &ProgressEvent);
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

// Implement ProgressReporter for closures
impl<F> ProgressReporter for F
where
    F: Fn(&ProgressEvent),
{
    fn report(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Drives an indicatif bar: one tick and a status message per event
#[derive(Clone)]
pub struct BarReporter(pub ProgressBar);

impl ProgressReporter for BarReporter {
    fn report(&self, event: &ProgressEvent) {
        self.0.inc(1);
        let message = event.to_string();
        // Keep long paths from wrapping the bar
        let display = if message.chars().count() > 60 {
            let tail: String = message
                .chars()
                .rev()
                .take(57)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            message
        };
        self.0.set_message(display);
    }
}
